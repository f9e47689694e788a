use crate::{Connector, TcpConnector};
use async_io::Timer;
use futures_lite::{AsyncReadExt, AsyncWriteExt, future};
use plover_http::{Buffer, DEFAULT_CONFIG, Error, Parse, Request, Response, Result};
use std::{
    fmt::{self, Debug, Formatter},
    sync::{Arc, Mutex},
    time::Duration,
};
use swansong::Swansong;

/// # An http client for sequential transactions.
///
/// One [`Client::do_request`] call is one transaction: resolve,
/// connect, optionally handshake, write the request, read until the
/// response parses. The socket is closed and released on every exit
/// path, so a client may be reused for the next transaction — but
/// never for two at once.
///
/// The deadline set with [`Client::set_timeout`] covers the whole
/// transaction end to end, not individual operations. An in-flight
/// transaction can also be cancelled from any thread with
/// [`Client::abort`].
pub struct Client<C: Connector = TcpConnector> {
    connector: C,
    timeout: Option<Duration>,
    progress: Option<Arc<dyn Fn(usize) + Send + Sync>>,
    current: Mutex<Swansong>,
}

/// One-shot entry point: a throwaway [`Client`] with the given
/// timeout. Only plain `http` requests; build a client over the
/// rustls connector for `https`.
///
/// # Errors
///
/// See [`Client::do_request`].
pub async fn request(
    request: Request,
    host: &str,
    port: Option<u16>,
    timeout: Option<Duration>,
) -> Result<Response> {
    let mut client = Client::new();
    client.timeout = timeout;
    client.do_request(request, host, port).await
}

impl Client<TcpConnector> {
    /// constructs a plain-tcp client with no timeout
    pub fn new() -> Self {
        Self::with_connector(TcpConnector)
    }
}

impl Default for Client<TcpConnector> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Connector> Client<C> {
    /// constructs a client over a specific connector, such as the
    /// rustls connector from `plover-rustls`
    pub fn with_connector(connector: C) -> Self {
        Self {
            connector,
            timeout: None,
            progress: None,
            current: Mutex::new(Swansong::new()),
        }
    }

    /// sets the whole-transaction deadline for subsequent requests
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = Some(timeout);
    }

    /// chainable [`Client::set_timeout`]
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.set_timeout(timeout);
        self
    }

    /// Registers a read-progress callback: called with the byte count
    /// of every successful read, and once with zero at end of stream.
    pub fn set_progress_fn(&mut self, progress: impl Fn(usize) + Send + Sync + 'static) {
        self.progress = Some(Arc::new(progress));
    }

    /// # Cancels the in-flight transaction, if any.
    ///
    /// Safe to call from any thread. The pending operation observes
    /// the cancellation promptly and `do_request` returns
    /// [`Error::Aborted`]; the socket is closed as the transaction is
    /// dropped. A subsequent `do_request` starts fresh.
    pub fn abort(&self) {
        self.current.lock().unwrap().shut_down();
    }

    /// # Performs one http transaction.
    ///
    /// A request without a scheme defaults to `http`; a missing port
    /// defaults to the scheme's well-known port. The response body is
    /// framed by `Content-Length` when the server sent one, and by
    /// connection close otherwise.
    ///
    /// # Errors
    ///
    /// [`Error::Timeout`] when the deadline elapses, [`Error::Aborted`]
    /// after [`Client::abort`], [`Error::Closed`] when the server
    /// disconnects mid-response, `Error::Io` for transport failures,
    /// and parse errors for responses this codec cannot accept.
    pub async fn do_request(
        &self,
        mut request: Request,
        host: &str,
        port: Option<u16>,
    ) -> Result<Response> {
        // a fresh abort signal per transaction; abort() trips the one
        // currently in flight
        let swansong = {
            let fresh = Swansong::new();
            *self.current.lock().unwrap() = fresh.clone();
            fresh
        };

        if request.scheme().is_none() {
            request.set_scheme("http");
        }
        let scheme = request.scheme().unwrap_or("http").to_string();
        let port = port.unwrap_or(match scheme.as_str() {
            "https" => 443,
            _ => 80,
        });

        let transaction = async {
            match swansong.interrupt(self.transaction(request, &scheme, host, port)).await {
                Some(result) => result,
                None => Err(Error::Aborted),
            }
        };

        match self.timeout {
            Some(timeout) => {
                future::or(transaction, async {
                    Timer::after(timeout).await;
                    Err(Error::Timeout)
                })
                .await
            }
            None => transaction.await,
        }
    }

    async fn transaction(
        &self,
        mut request: Request,
        scheme: &str,
        host: &str,
        port: u16,
    ) -> Result<Response> {
        let mut transport = self.connector.connect(scheme, host, port).await?;

        // outbound request bodies are always fixed-length
        if request.body().is_chunked() {
            let len = request.gather_body().len();
            request.headers_mut().insert("Content-Length", len.to_string());
        }
        transport.write_all(&request.to_bytes()).await?;
        transport.flush().await?;

        let mut buffer = Buffer::with_capacity(DEFAULT_CONFIG.read_buffer_len());
        let mut eof = false;
        loop {
            if eof || !buffer.is_empty() {
                if let Parse::Complete { message, .. } = Response::parse(&buffer, eof)? {
                    transport.close().await.ok();
                    return Ok(message);
                }
            }

            let len = buffer.len();
            buffer.expand(DEFAULT_CONFIG.read_buffer_len());
            let bytes = transport.read(&mut buffer[len..]).await?;
            buffer.truncate(len + bytes);
            if let Some(progress) = &self.progress {
                progress(bytes);
            }
            if bytes == 0 {
                eof = true;
            }
        }
    }
}

impl<C: Connector + Debug> Debug for Client<C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("connector", &self.connector)
            .field("timeout", &self.timeout)
            .field("progress", &self.progress.is_some())
            .finish()
    }
}
