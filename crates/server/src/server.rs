use crate::{Acceptor, RequestHandler, ServerConfig, conn};
use async_executor::Executor;
use async_net::{TcpListener, TcpStream};
use futures_lite::future;
use socket2::{Domain, Protocol, Socket, Type};
use std::{
    io::Result,
    net::{SocketAddr, ToSocketAddrs},
    sync::Arc,
    thread,
};
use swansong::Swansong;

/// # The plover listener.
///
/// Binding happens at construction; [`Server::run`] then blocks the
/// calling thread, driving the accept loop and a pool of
/// `thread_pool_size` reactor threads until [`Server::stop`] is
/// called. Every accepted stream passes through the configured
/// [`Acceptor`] (a tls handshake, or nothing) and is then served by
/// the per-connection state machine.
///
/// `run` and `stop` both take `&self`, so a server can be shared
/// behind an [`Arc`] and stopped from another thread:
///
/// ```rust,no_run
/// # use std::sync::Arc;
/// # use plover_server::{Server, ServerConfig};
/// # use plover_http::{HttpError, Request, Response};
/// fn handler(_request: Request) -> Result<Response, HttpError> {
///     Ok(Response::new(204))
/// }
///
/// let server = Arc::new(Server::bind(ServerConfig::new().with_port(0), handler).unwrap());
/// let runner = {
///     let server = server.clone();
///     std::thread::spawn(move || server.run())
/// };
/// server.stop();
/// runner.join().unwrap();
/// ```
pub struct Server<A: Acceptor<TcpStream> = ()> {
    listener: TcpListener,
    local_addr: SocketAddr,
    handler: Arc<dyn RequestHandler>,
    config: ServerConfig<A>,
    swansong: Swansong,
}

impl<A: Acceptor<TcpStream>> Server<A> {
    /// # Resolves and binds the listening socket.
    ///
    /// The socket is bound with `reuse_address` so a restarted server
    /// can reclaim its port immediately. Binding a tls acceptor to
    /// port 80, or a plain acceptor to port 443, logs a warning.
    ///
    /// # Errors
    ///
    /// Fails if the host does not resolve or the port cannot be
    /// bound.
    pub fn bind(config: ServerConfig<A>, handler: impl RequestHandler) -> Result<Self> {
        if config.acceptor.is_secure() && config.port == 80 {
            log::warn!("tls is enabled but the server is listening on port 80");
        }
        if !config.acceptor.is_secure() && config.port == 443 {
            log::warn!("tls is disabled but the server is listening on port 443");
        }

        let address = (config.host.as_str(), config.port)
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| std::io::Error::other("host did not resolve to any address"))?;

        let socket = Socket::new(Domain::for_address(address), Type::STREAM, Some(Protocol::TCP))?;
        socket.set_reuse_address(true)?;
        socket.set_nonblocking(true)?;
        socket.bind(&address.into())?;
        socket.listen(1024)?;

        let std_listener: std::net::TcpListener = socket.into();
        let local_addr = std_listener.local_addr()?;
        let listener = TcpListener::try_from(std_listener)?;
        log::info!("listening on {local_addr}");

        Ok(Self {
            listener,
            local_addr,
            handler: Arc::new(handler),
            config,
            swansong: Swansong::new(),
        })
    }

    /// the bound address, useful after binding port 0
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// a clone of this server's stop signal
    pub fn swansong(&self) -> Swansong {
        self.swansong.clone()
    }

    /// Runs the server on the calling thread plus
    /// `thread_pool_size` reactor threads, returning once
    /// [`Server::stop`] has been observed.
    pub fn run(&self) {
        let ex = Executor::new();
        thread::scope(|scope| {
            for _ in 0..self.config.thread_pool_size {
                scope.spawn(|| {
                    future::block_on(ex.run(async {
                        self.swansong.interrupt(future::pending::<()>()).await;
                    }));
                });
            }
            future::block_on(self.accept_loop(&ex));
        });
    }

    /// Trips the stop signal: the accept loop exits, idle connections
    /// close, and the reactor threads unwind, abandoning any
    /// connection still mid-request.
    pub fn stop(&self) {
        self.swansong.shut_down();
    }

    async fn accept_loop(&self, ex: &Executor<'_>) {
        loop {
            match self.swansong.interrupt(self.listener.accept()).await {
                None => return,
                Some(Err(error)) => {
                    log::warn!("error accepting connection: {error}");
                }
                Some(Ok((stream, peer))) => {
                    log::trace!("accepted connection from {peer}");
                    if self.config.nodelay {
                        stream.set_nodelay(true).ok();
                    }
                    let acceptor = self.config.acceptor.clone();
                    let handler = Arc::clone(&self.handler);
                    let http = self.config.http;
                    let swansong = self.swansong.clone();
                    ex.spawn(async move {
                        let transport = match acceptor.accept(stream).await {
                            Ok(transport) => transport,
                            Err(error) => {
                                log::warn!("handshake with {peer} failed: {error}");
                                return;
                            }
                        };
                        if let Err(error) = conn::serve(transport, &*handler, http, swansong).await
                        {
                            log::warn!("connection from {peer} ended with error: {error}");
                        }
                    })
                    .detach();
                }
            }
        }
    }
}
