use crate::Acceptor;
use plover_http::{DEFAULT_CONFIG, HttpConfig};

/// Configuration for a [`Server`][crate::Server], built by chaining
/// `with_*` methods.
///
/// ```rust
/// use plover_server::ServerConfig;
///
/// let config = ServerConfig::new()
///     .with_host("127.0.0.1")
///     .with_port(0)
///     .with_thread_pool_size(2)
///     .with_nodelay();
/// ```
///
/// The acceptor defaults to `()`, the plain-tcp passthrough; supply a
/// tls acceptor with [`ServerConfig::with_acceptor`].
#[derive(Clone, Debug)]
pub struct ServerConfig<A = ()> {
    pub(crate) host: String,
    pub(crate) port: u16,
    pub(crate) thread_pool_size: usize,
    pub(crate) nodelay: bool,
    pub(crate) acceptor: A,
    pub(crate) http: HttpConfig,
}

impl ServerConfig<()> {
    /// builds a config with the default plain-tcp acceptor
    pub fn new() -> Self {
        Self::default()
    }
}

impl Default for ServerConfig<()> {
    fn default() -> Self {
        Self {
            host: String::from("localhost"),
            port: 8080,
            thread_pool_size: std::thread::available_parallelism()
                .map(usize::from)
                .unwrap_or(4),
            nodelay: false,
            acceptor: (),
            http: DEFAULT_CONFIG,
        }
    }
}

impl<A> ServerConfig<A> {
    /// the host or address to listen on. default "localhost"
    pub fn with_host(mut self, host: &str) -> Self {
        self.host = host.into();
        self
    }

    /// the port to listen on. default 8080; 0 binds an ephemeral port
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// the number of reactor threads [`run`][crate::Server::run]
    /// starts. default: available parallelism
    pub fn with_thread_pool_size(mut self, thread_pool_size: usize) -> Self {
        self.thread_pool_size = thread_pool_size.max(1);
        self
    }

    /// enables TCP_NODELAY on accepted connections
    pub fn with_nodelay(mut self) -> Self {
        self.nodelay = true;
        self
    }

    /// overrides the codec limits and buffer sizes
    pub fn with_http_config(mut self, http: HttpConfig) -> Self {
        self.http = http;
        self
    }

    /// Supplies a tls acceptor, rebinding the config's acceptor type.
    /// See `plover-rustls` for the rustls-backed implementation.
    pub fn with_acceptor<B>(self, acceptor: B) -> ServerConfig<B>
    where
        B: Acceptor<async_net::TcpStream>,
    {
        ServerConfig {
            host: self.host,
            port: self.port,
            thread_pool_size: self.thread_pool_size,
            nodelay: self.nodelay,
            acceptor,
            http: self.http,
        }
    }

    /// the configured host
    pub fn host(&self) -> &str {
        &self.host
    }

    /// the configured port
    pub fn port(&self) -> u16 {
        self.port
    }

    /// the configured reactor thread count
    pub fn thread_pool_size(&self) -> usize {
        self.thread_pool_size
    }
}
