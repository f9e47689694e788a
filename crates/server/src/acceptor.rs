use plover_http::Transport;
use std::{future::Future, io::Result};

/// The common interface for server-side tls acceptors, abstracting
/// over implementations.
///
/// The only implementation in this crate is `()`, the no-op acceptor,
/// which passes the input transport through unchanged. A tls acceptor
/// performs the server-side handshake here and yields the wrapped
/// stream.
pub trait Acceptor<Input>: Clone + Send + Sync + 'static
where
    Input: Transport,
{
    /// the produced stream type, for example `TlsStream<Input>`
    type Output: Transport;

    /// Transforms an accepted `Input` into `Self::Output`, performing
    /// any handshake this acceptor implies.
    fn accept(&self, input: Input) -> impl Future<Output = Result<Self::Output>> + Send;

    /// whether connections produced by this acceptor are encrypted.
    /// the listener uses this to warn about tls/port mismatches
    fn is_secure(&self) -> bool {
        true
    }
}

impl<Input> Acceptor<Input> for ()
where
    Input: Transport,
{
    type Output = Input;

    async fn accept(&self, input: Input) -> Result<Self::Output> {
        Ok(input)
    }

    fn is_secure(&self) -> bool {
        false
    }
}
