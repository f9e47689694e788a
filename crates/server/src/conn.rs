use crate::{RequestHandler, wrap_handler};
use futures_lite::{AsyncReadExt, AsyncWriteExt};
use plover_http::{Buffer, Error, HttpConfig, Parse, Request, Response, Result, Transport};
use std::time::SystemTime;
use swansong::Swansong;

/// Drives one accepted transport: read until a request parses,
/// dispatch it, write the response, then either close or loop for the
/// next request on the same connection.
///
/// A response without a `Content-Length` header (a chunked body, or an
/// empty body with no length written) closes the connection after the
/// write; the close is what frames the body for the peer. Responses
/// with a length keep the connection alive, and any pipelined bytes
/// already buffered are served before the next read.
pub(crate) async fn serve<T: Transport>(
    mut transport: T,
    handler: &dyn RequestHandler,
    config: HttpConfig,
    swansong: Swansong,
) -> Result<()> {
    let mut buffer = Buffer::with_capacity(config.read_buffer_len());

    loop {
        let request = match read_request(&mut transport, &mut buffer, &config, &swansong).await {
            Ok(Some(request)) => request,
            Ok(None) => {
                transport.close().await.ok();
                return Ok(());
            }
            Err(error) => return reject(&mut transport, error).await,
        };

        let response = wrap_handler(handler, request);
        let keep_alive = write_response(&mut transport, response).await?;

        if !keep_alive {
            transport.close().await.ok();
            return Ok(());
        }
    }
}

/// Reads until the buffer parses as one complete request, consuming
/// exactly the bytes the request occupied. `Ok(None)` is a clean end:
/// the peer disconnected between messages, or the stop signal tripped
/// while this connection was idle.
async fn read_request<T: Transport>(
    transport: &mut T,
    buffer: &mut Buffer,
    config: &HttpConfig,
    swansong: &Swansong,
) -> Result<Option<Request>> {
    loop {
        if !buffer.is_empty() {
            if let Parse::Complete { message, consumed } = Request::parse(buffer, config)? {
                buffer.ignore_front(consumed);
                return Ok(Some(message));
            }
        }

        let len = buffer.len();
        buffer.expand(config.read_buffer_len());
        let bytes = if len == 0 {
            match swansong.interrupt(transport.read(&mut buffer[len..])).await {
                None => {
                    buffer.truncate(len);
                    return Ok(None);
                }
                Some(read) => read?,
            }
        } else {
            // mid-message, shutdown waits for the request to finish
            transport.read(&mut buffer[len..]).await?
        };
        buffer.truncate(len + bytes);

        if bytes == 0 {
            return if buffer.is_empty() {
                Ok(None)
            } else {
                Err(Error::Closed)
            };
        }
    }
}

/// Serializes and writes a response. The head and a fixed body go out
/// in a single write; a chunked body is pulled and written chunk by
/// chunk until the producer finishes. Returns whether the connection
/// may be kept alive.
async fn write_response<T: Transport>(transport: &mut T, mut response: Response) -> Result<bool> {
    finalize_headers(&mut response);
    log::trace!(
        "sending response head: {} {} {}",
        response.version(),
        response.status(),
        response.status_text()
    );

    let mut output = Vec::with_capacity(512);
    response.write_head(&mut output)?;

    if response.body().is_chunked() {
        transport.write_all(&output).await?;
        while let Some(chunk) = response.body_mut().read_chunk() {
            transport.write_all(&chunk).await?;
        }
    } else {
        output.extend_from_slice(response.body().bytes());
        transport.write_all(&output).await?;
    }
    transport.flush().await?;

    Ok(response.headers().has_header("Content-Length"))
}

fn finalize_headers(response: &mut Response) {
    response
        .headers_mut()
        .try_insert_with("Date", || httpdate::fmt_http_date(SystemTime::now()));

    // 204 and 304 must not carry a body, so no length is written for
    // them and the connection closes after the head
    if !matches!(response.status(), 204 | 304)
        && let Some(len) = response.body().len()
    {
        response
            .headers_mut()
            .try_insert("Content-Length", len.to_string());
    }
}

/// A request that can never parse gets a best-effort status response
/// before the connection drops: 413 when the declared body was over
/// the ceiling, 400 for everything else. Transport-level failures get
/// nothing.
async fn reject<T: Transport>(transport: &mut T, error: Error) -> Result<()> {
    match &error {
        Error::Io(_) | Error::Closed => return Err(error),
        Error::RequestBodyTooLong(len) => {
            log::debug!("rejecting request with declared content length {len}");
            respond_and_close(transport, 413).await;
        }
        _ => {
            log::debug!("rejecting unparseable request: {error}");
            respond_and_close(transport, 400).await;
        }
    }
    Err(error)
}

async fn respond_and_close<T: Transport>(transport: &mut T, status: u16) {
    let mut response = Response::new(status);
    response.set_body(format!("{}\n", response.status_text()), "text/plain");
    // this write is best-effort; the connection is closing either way
    write_response(transport, response).await.ok();
    transport.close().await.ok();
}

#[cfg(test)]
mod test {
    use super::*;
    use plover_http::{DEFAULT_CONFIG, HttpError};
    use plover_testing::{TestTransport, block_on, spawn};

    fn handler(request: Request) -> std::result::Result<Response, HttpError> {
        match request.target() {
            "/" => {
                let mut response = Response::new(200);
                response.set_body("Hello world", "text/plain");
                Ok(response)
            }
            "/empty" => Ok(Response::new(204)),
            "/stream" => {
                let mut n = 0;
                let mut response = Response::new(200);
                response.set_chunked_body(
                    move || {
                        n += 1;
                        (n <= 3).then(|| format!("{n}\n").into_bytes())
                    },
                    "text/plain",
                );
                Ok(response)
            }
            _ => Err(HttpError::not_found()),
        }
    }

    fn serve_in_background() -> TestTransport {
        let (client, server) = TestTransport::new();
        spawn(async move {
            serve(server, &handler, DEFAULT_CONFIG, Swansong::new())
                .await
                .ok();
        });
        client
    }

    async fn read_to_close(client: &mut TestTransport) -> String {
        let mut received = String::new();
        AsyncReadExt::read_to_string(client, &mut received)
            .await
            .unwrap();
        received
    }

    #[test]
    fn fixed_body_response_keeps_the_connection_open() {
        block_on(async {
            let client = serve_in_background();
            client.write_all("GET / HTTP/1.1\r\n\r\n");
            let first = client.read_available_string().await;
            assert!(first.starts_with("HTTP/1.1 200 OK\r\n"), "{first}");
            assert!(first.contains("Content-Length: 11\r\n"), "{first}");
            assert!(first.ends_with("Hello world"), "{first}");

            // same connection serves a second request
            client.write_all("GET /empty HTTP/1.1\r\n\r\n");
            let second = client.read_available_string().await;
            assert!(second.starts_with("HTTP/1.1 204 No Content\r\n"), "{second}");
        });
    }

    #[test]
    fn no_content_closes_the_connection() {
        block_on(async {
            let mut client = serve_in_background();
            client.write_all("GET /empty HTTP/1.1\r\n\r\n");
            let raw = read_to_close(&mut client).await;
            assert!(raw.starts_with("HTTP/1.1 204 No Content\r\n"), "{raw}");
            assert!(!raw.contains("Content-Length"), "{raw}");
        });
    }

    #[test]
    fn chunked_body_is_framed_by_close() {
        block_on(async {
            let mut client = serve_in_background();
            client.write_all("GET /stream HTTP/1.1\r\n\r\n");
            let raw = read_to_close(&mut client).await;
            assert!(!raw.contains("Content-Length"), "{raw}");
            assert!(raw.ends_with("\r\n\r\n1\n2\n3\n"), "{raw}");
        });
    }

    #[test]
    fn pipelined_requests_are_both_served() {
        block_on(async {
            let client = serve_in_background();
            client.write_all("GET / HTTP/1.1\r\n\r\nGET / HTTP/1.1\r\n\r\n");
            let mut raw = client.read_available_string().await;
            while raw.matches("Hello world").count() < 2 {
                raw.push_str(&client.read_available_string().await);
            }
            assert_eq!(raw.matches("HTTP/1.1 200 OK").count(), 2, "{raw}");
        });
    }

    #[test]
    fn unparseable_input_gets_a_400() {
        block_on(async {
            let mut client = serve_in_background();
            client.write_all("GET / HTTP/4.2\r\n\r\n");
            let raw = read_to_close(&mut client).await;
            assert!(raw.starts_with("HTTP/1.1 400 Bad Request\r\n"), "{raw}");
        });
    }

    #[test]
    fn oversized_content_length_gets_a_413() {
        block_on(async {
            let mut client = serve_in_background();
            client.write_all("PUT / HTTP/1.1\r\nContent-Length: 10000000\r\n\r\n");
            let raw = read_to_close(&mut client).await;
            assert!(
                raw.starts_with("HTTP/1.1 413 Request Entity Too Large\r\n"),
                "{raw}"
            );
        });
    }

    #[test]
    fn handler_errors_surface_as_status_responses() {
        block_on(async {
            let mut client = serve_in_background();
            client.write_all("GET /missing HTTP/1.1\r\n\r\n");
            // the 404 carries a length, so the connection would stay
            // open; close our side to let the serve loop finish
            client.close();
            let raw = read_to_close(&mut client).await;
            assert!(raw.starts_with("HTTP/1.1 404 Not Found\r\n"), "{raw}");
            assert!(raw.contains("Method: GET\nPath: /missing"), "{raw}");
        });
    }
}
