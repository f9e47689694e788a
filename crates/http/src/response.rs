use crate::{
    Body, Error, Headers, Parse, Result, Version,
    config::DEFAULT_CONFIG,
    parse::{content_length, headers_from, map_head_error, version_from},
    reason_phrase,
    util::encoding,
};
use std::io::Write;

/// An http response: status code and reason, version, headers, and a
/// [`Body`].
#[derive(Debug)]
pub struct Response {
    status: u16,
    status_text: String,
    version: Version,
    headers: Headers,
    body: Body,
}

impl Response {
    /// constructs a response with the canonical reason phrase for
    /// `status`, no headers, and an empty body
    pub fn new(status: u16) -> Self {
        Self {
            status,
            status_text: reason_phrase(status).to_string(),
            version: Version::default(),
            headers: Headers::new(),
            body: Body::empty(),
        }
    }

    /// the status code
    pub fn status(&self) -> u16 {
        self.status
    }

    /// the reason phrase, verbatim from the wire for parsed responses
    pub fn status_text(&self) -> &str {
        &self.status_text
    }

    /// the http version from the status line
    pub fn version(&self) -> Version {
        self.version
    }

    /// predicate for 2xx statuses
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// a read-only reference to the response headers
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// a mutable reference to the response headers
    pub fn headers_mut(&mut self) -> &mut Headers {
        &mut self.headers
    }

    /// a read-only reference to the response body
    pub fn body(&self) -> &Body {
        &self.body
    }

    /// a mutable reference to the response body
    pub fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    /// Sets a fixed body, along with `Content-Type` and
    /// `Content-Length` headers.
    pub fn set_body(&mut self, body: impl Into<Vec<u8>>, content_type: &str) {
        let content = body.into();
        self.headers.insert("Content-Type", content_type);
        self.headers
            .insert("Content-Length", content.len().to_string());
        self.body = Body::fixed(content);
    }

    /// Sets a chunked body from a producer function, along with a
    /// `Content-Type` header. No `Content-Length` is set, so the
    /// serving connection will close after the last chunk; that close
    /// is what frames the body for the peer.
    pub fn set_chunked_body(
        &mut self,
        produce: impl FnMut() -> Option<Vec<u8>> + Send + Sync + 'static,
        content_type: &str,
    ) {
        self.headers.insert("Content-Type", content_type);
        self.headers.remove("Content-Length");
        self.body = Body::from_chunk_fn(produce);
    }

    /// drains a chunked body into fixed content and borrows it. see
    /// [`Body::gather`]
    pub fn gather_body(&mut self) -> &[u8] {
        self.body.gather()
    }

    /// the body decoded as text, using the `Content-Type` charset when
    /// one is declared
    pub fn body_string(&mut self) -> String {
        let encoding = encoding(&self.headers);
        let (decoded, _, _) = encoding.decode(self.body.gather());
        decoded.into_owned()
    }

    /// serializes the status line and headers, terminated by the blank
    /// line
    pub fn write_head(&self, buf: &mut Vec<u8>) -> Result<()> {
        write!(
            buf,
            "{} {} {}\r\n{}\r\n",
            self.version, self.status, self.status_text, self.headers
        )?;
        Ok(())
    }

    /// # Serializes the whole response
    ///
    /// # Panics
    ///
    /// Panics on a chunked body; the serving connection pulls chunks
    /// instead of serializing them up front.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(128);
        self.write_head(&mut buf)
            .expect("writing to a vec cannot fail");
        buf.extend_from_slice(self.body.bytes());
        buf
    }

    /// # Parses one response from the front of `buf`
    ///
    /// `eof` reports whether the transport can still produce bytes.
    /// With a `Content-Length` header the body is that many bytes past
    /// the head; without one, framing is read-to-close: the parse
    /// stays [`Parse::Partial`] until the caller passes `eof = true`,
    /// at which point the rest of the buffer is accepted as the body.
    ///
    /// # Errors
    ///
    /// [`Error::Closed`] when `eof` arrives before any input,
    /// [`Error::InvalidHead`] when it arrives mid-head, and parse
    /// errors as for requests.
    pub fn parse(buf: &[u8], eof: bool) -> Result<Parse<Self>> {
        let mut headers = vec![httparse::EMPTY_HEADER; DEFAULT_CONFIG.max_headers()];
        let mut head = httparse::Response::new(&mut headers);

        let head_len = match head.parse(buf).map_err(map_head_error)? {
            httparse::Status::Complete(head_len) => head_len,
            httparse::Status::Partial if !eof => return Ok(Parse::Partial),
            httparse::Status::Partial if buf.is_empty() => return Err(Error::Closed),
            httparse::Status::Partial => return Err(Error::InvalidHead),
        };

        let status = head.code.ok_or(Error::InvalidStatus)?;
        let status_text = head.reason.unwrap_or_default().trim_end().to_string();
        let version = version_from(head.version)?;
        let response_headers = headers_from(head.headers)?;

        let consumed;
        let body;
        match content_length(&response_headers)? {
            Some(length) => {
                let length = length as usize;
                if buf.len() < head_len + length {
                    return if eof { Err(Error::Closed) } else { Ok(Parse::Partial) };
                }
                consumed = head_len + length;
                body = if length == 0 {
                    Body::empty()
                } else {
                    Body::fixed(buf[head_len..consumed].to_vec())
                };
            }
            // no Content-Length: the connection close delimits the body
            None if !eof => return Ok(Parse::Partial),
            None => {
                consumed = buf.len();
                body = if buf.len() == head_len {
                    Body::empty()
                } else {
                    Body::fixed(buf[head_len..].to_vec())
                };
            }
        }

        log::trace!("received response head: {version} {status} {status_text}");

        Ok(Parse::Complete {
            message: Self {
                status,
                status_text,
                version,
                headers: response_headers,
                body,
            },
            consumed,
        })
    }
}
