use futures_lite::{AsyncRead, AsyncWrite};
use std::{io::Result, net::SocketAddr};

/// # The interface the http protocol is communicated over.
///
/// Both plain tcp streams and tls-wrapped streams implement this; the
/// server and client are generic over it, and tests substitute
/// in-memory transports.
///
/// Reads may deliver any number of bytes per call; callers loop until
/// the codec reports a complete message. A read of zero bytes means
/// the peer has closed its writing side. Closing is dropping the
/// transport (or `AsyncWriteExt::close` first for a clean shutdown);
/// interrupting a blocked operation from another task is done by
/// cancelling the future, not by closing the handle out from under it.
pub trait Transport: AsyncRead + AsyncWrite + Unpin + Send + Sync + 'static {
    /// # Returns the socket address of the remote peer, if known.
    ///
    /// # Errors
    ///
    /// Returns an error if this transport supports retrieving the
    /// peer address but attempting to do so fails.
    fn peer_addr(&self) -> Result<Option<SocketAddr>> {
        Ok(None)
    }
}

impl Transport for Box<dyn Transport> {
    fn peer_addr(&self) -> Result<Option<SocketAddr>> {
        (**self).peer_addr()
    }
}

impl Transport for async_net::TcpStream {
    fn peer_addr(&self) -> Result<Option<SocketAddr>> {
        async_net::TcpStream::peer_addr(self).map(Some)
    }
}
