use crate::RustlsTransport;
use futures_rustls::{
    TlsAcceptor,
    rustls::{ServerConfig, pki_types::PrivateKeyDer},
};
use plover_http::Transport;
use plover_server::Acceptor;
use std::{
    fmt::{self, Debug, Formatter},
    io::{BufReader, Error, ErrorKind, Result},
    sync::Arc,
};

/// A server-side tls acceptor: performs the rustls handshake on every
/// accepted connection before the http state machine sees it.
#[derive(Clone)]
pub struct RustlsAcceptor(TlsAcceptor);

impl Debug for RustlsAcceptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RustlsAcceptor").field(&"..").finish()
    }
}

impl RustlsAcceptor {
    /// # Builds an acceptor from pem-encoded certificate chain and
    /// private key bytes.
    ///
    /// # Errors
    ///
    /// Fails when the pem input cannot be parsed or rustls rejects
    /// the certificate/key pair.
    pub fn from_pem(cert: &[u8], key: &[u8]) -> Result<Self> {
        let certs = rustls_pemfile::certs(&mut BufReader::new(cert)).collect::<Result<Vec<_>>>()?;
        let key: PrivateKeyDer<'static> = rustls_pemfile::private_key(&mut BufReader::new(key))?
            .ok_or_else(|| Error::new(ErrorKind::InvalidInput, "no private key found in pem"))?;

        let config = ServerConfig::builder()
            .with_no_client_auth()
            .with_single_cert(certs, key)
            .map_err(|e| Error::new(ErrorKind::InvalidInput, e))?;

        Ok(config.into())
    }
}

impl From<ServerConfig> for RustlsAcceptor {
    fn from(config: ServerConfig) -> Self {
        Self(Arc::new(config).into())
    }
}

impl From<TlsAcceptor> for RustlsAcceptor {
    fn from(acceptor: TlsAcceptor) -> Self {
        Self(acceptor)
    }
}

impl<Input> Acceptor<Input> for RustlsAcceptor
where
    Input: Transport,
{
    type Output = RustlsTransport<Input>;

    async fn accept(&self, input: Input) -> Result<Self::Output> {
        self.0.accept(input).await.map(Into::into)
    }
}
