use async_net::TcpStream;
use std::{
    future::Future,
    io::{Error, ErrorKind, Result},
};

/// Opens the transport a client transaction runs over.
///
/// The scheme decides what kind of transport comes back: the plain
/// [`TcpConnector`] only accepts `http`, while the rustls connector in
/// `plover-rustls` performs the tls handshake for `https` and passes
/// `http` through to its inner connector.
pub trait Connector: Send + Sync + 'static {
    /// the transport this connector produces
    type Transport: plover_http::Transport;

    /// Resolves `host` and connects to `port`, trying each resolved
    /// address until one succeeds, then performs whatever handshake
    /// the scheme implies.
    fn connect(
        &self,
        scheme: &str,
        host: &str,
        port: u16,
    ) -> impl Future<Output = Result<Self::Transport>> + Send;
}

/// The plain-tcp connector, and the default for
/// [`Client`][crate::Client].
#[derive(Clone, Copy, Debug, Default)]
pub struct TcpConnector;

impl Connector for TcpConnector {
    type Transport = TcpStream;

    async fn connect(&self, scheme: &str, host: &str, port: u16) -> Result<Self::Transport> {
        if scheme != "http" {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                format!("unknown scheme {scheme}"),
            ));
        }
        let stream = TcpStream::connect((host, port)).await?;
        log::debug!("opened connection to {}", stream.peer_addr()?);
        Ok(stream)
    }
}
