#![forbid(unsafe_code)]
#![deny(missing_docs, nonstandard_style, unused_qualifications)]

/*!
The plover http server: a listener that accepts connections on a
thread pool of reactor workers and drives each connection through a
read → parse → dispatch → write cycle.

```rust,no_run
use plover_http::{HttpError, Request, Response};
use plover_server::{Server, ServerConfig};

fn hello(_request: Request) -> Result<Response, HttpError> {
    let mut response = Response::new(200);
    response.set_body("Hello world", "text/plain");
    Ok(response)
}

let server = Server::bind(ServerConfig::new().with_port(8080), hello).unwrap();
server.run();
```

Handlers run on reactor threads and may be invoked concurrently for
distinct connections; shared state is theirs to synchronize. A handler
that returns an [`HttpError`] or panics produces an error response
rather than tearing the server down.
*/

mod acceptor;
pub use acceptor::Acceptor;

mod config;
pub use config::ServerConfig;

mod conn;

mod handler;
pub use handler::{RequestHandler, wrap_handler};

mod server;
pub use server::Server;

pub use swansong::Swansong;
