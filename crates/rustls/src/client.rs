use crate::RustlsTransport;
use futures_rustls::{
    TlsConnector,
    rustls::{ClientConfig, RootCertStore, pki_types::ServerName},
};
use plover_client::{Connector, TcpConnector};
use std::{
    fmt::{self, Debug, Formatter},
    io::{Error, ErrorKind, Result},
    sync::Arc,
};

/// A client connector that speaks tls for `https` requests and passes
/// `http` requests through to its inner connector.
///
/// The default configuration trusts the webpki root certificates and
/// verifies the server certificate against the request's host name.
#[derive(Clone)]
pub struct RustlsConnector<C = TcpConnector> {
    config: Arc<ClientConfig>,
    inner: C,
}

impl Default for RustlsConnector<TcpConnector> {
    fn default() -> Self {
        let roots = RootCertStore {
            roots: webpki_roots::TLS_SERVER_ROOTS.to_vec(),
        };
        let config = ClientConfig::builder()
            .with_root_certificates(roots)
            .with_no_client_auth();
        Self::new(config, TcpConnector)
    }
}

impl RustlsConnector<TcpConnector> {
    /// a connector over plain tcp with the default trust roots
    pub fn new_with_default_roots() -> Self {
        Self::default()
    }
}

impl<C> RustlsConnector<C> {
    /// builds a connector from a specific rustls [`ClientConfig`] and
    /// inner transport connector
    pub fn new(config: impl Into<Arc<ClientConfig>>, inner: C) -> Self {
        Self {
            config: config.into(),
            inner,
        }
    }
}

impl<C: Connector + Debug> Debug for RustlsConnector<C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("RustlsConnector")
            .field("config", &"..")
            .field("inner", &self.inner)
            .finish()
    }
}

impl<C: Connector> Connector for RustlsConnector<C> {
    type Transport = RustlsTransport<C::Transport>;

    async fn connect(&self, scheme: &str, host: &str, port: u16) -> Result<Self::Transport> {
        match scheme {
            "https" => {
                // the tcp leg below is plain; this connector adds tls
                let tcp = self.inner.connect("http", host, port).await?;
                let server_name = ServerName::try_from(host.to_string())
                    .map_err(|_| Error::new(ErrorKind::InvalidInput, "invalid sni host name"))?;
                let connector = TlsConnector::from(Arc::clone(&self.config));
                log::debug!("starting tls handshake with {host}:{port}");
                let tls = connector.connect(server_name, tcp).await?;
                Ok(tls.into())
            }

            "http" => Ok(self.inner.connect(scheme, host, port).await?.into()),

            unknown => Err(Error::new(
                ErrorKind::InvalidInput,
                format!("unknown scheme {unknown}"),
            )),
        }
    }
}
