use Flavor::{Encrypted, Plain};
use futures_lite::{AsyncRead, AsyncWrite};
use futures_rustls::TlsStream;
use plover_http::Transport;
use std::{
    io::Result,
    net::SocketAddr,
    pin::Pin,
    task::{Context, Poll},
};

/// One connection as the rustls connector and acceptor hand it to the
/// rest of the stack: an established tls session, or a plain stream
/// when the scheme asked for none. Folding both into one type keeps
/// the connection loops generic over a single [`Transport`].
#[derive(Debug)]
pub struct RustlsTransport<T>(Flavor<T>);

#[derive(Debug)]
enum Flavor<T> {
    Plain(T),
    Encrypted(Box<TlsStream<T>>),
}

impl<T> RustlsTransport<T> {
    /// a borrow of the underlying stream, below any tls session
    pub fn get_ref(&self) -> &T {
        match &self.0 {
            Plain(stream) => stream,
            Encrypted(tls) => tls.get_ref().0,
        }
    }

    /// whether this connection carries a tls session
    pub fn is_encrypted(&self) -> bool {
        matches!(self.0, Encrypted(_))
    }
}

impl<T> From<T> for RustlsTransport<T> {
    fn from(stream: T) -> Self {
        Self(Plain(stream))
    }
}

impl<T> From<futures_rustls::client::TlsStream<T>> for RustlsTransport<T> {
    fn from(tls: futures_rustls::client::TlsStream<T>) -> Self {
        Self(Encrypted(Box::new(tls.into())))
    }
}

impl<T> From<futures_rustls::server::TlsStream<T>> for RustlsTransport<T> {
    fn from(tls: futures_rustls::server::TlsStream<T>) -> Self {
        Self(Encrypted(Box::new(tls.into())))
    }
}

// every io operation lands on whichever stream this connection holds
macro_rules! delegate {
    ($self:ident.$poll:ident($($arg:expr),*)) => {
        match &mut $self.get_mut().0 {
            Plain(stream) => Pin::new(stream).$poll($($arg),*),
            Encrypted(tls) => Pin::new(tls.as_mut()).$poll($($arg),*),
        }
    };
}

impl<T: AsyncRead + AsyncWrite + Unpin> AsyncRead for RustlsTransport<T> {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut [u8],
    ) -> Poll<Result<usize>> {
        delegate!(self.poll_read(cx, buf))
    }
}

impl<T: AsyncRead + AsyncWrite + Unpin> AsyncWrite for RustlsTransport<T> {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<Result<usize>> {
        delegate!(self.poll_write(cx, buf))
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Result<()>> {
        delegate!(self.poll_flush(cx))
    }

    fn poll_close(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Result<()>> {
        delegate!(self.poll_close(cx))
    }
}

impl<T: Transport> Transport for RustlsTransport<T> {
    fn peer_addr(&self) -> Result<Option<SocketAddr>> {
        self.get_ref().peer_addr()
    }
}
