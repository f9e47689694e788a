use plover_http::{HttpError, Request, Response};
use std::panic::{AssertUnwindSafe, catch_unwind};

/// The server-side request contract: one request in, one response or
/// [`HttpError`] out.
///
/// The server is threaded, so `handle` may be called on any reactor
/// thread, for several connections at once. Implementations own the
/// synchronization of whatever state they touch.
pub trait RequestHandler: Send + Sync + 'static {
    /// produces the response for one request
    fn handle(&self, request: Request) -> Result<Response, HttpError>;
}

impl<F> RequestHandler for F
where
    F: Fn(Request) -> Result<Response, HttpError> + Send + Sync + 'static,
{
    fn handle(&self, request: Request) -> Result<Response, HttpError> {
        self(request)
    }
}

/// Invokes `handler` and converts every failure mode into a response,
/// so a handler can never take the connection loop down:
///
/// * an [`HttpError`] becomes its status, carried headers, and a
///   `text/plain` body naming the request's method and path;
/// * a panic becomes a 500 whose body carries the panic message when
///   one is available.
pub fn wrap_handler(handler: &dyn RequestHandler, request: Request) -> Response {
    let method = request.method().to_string();
    let path = request.target().to_string();

    match catch_unwind(AssertUnwindSafe(|| handler.handle(request))) {
        Ok(Ok(response)) => response,
        Ok(Err(error)) => {
            log::debug!("handler error for {method} {path}: {error}");
            error.into_response(&method, &path)
        }
        Err(panic) => {
            let message = if let Some(what) = panic.downcast_ref::<&str>() {
                format!("Internal server error: {what}")
            } else if let Some(what) = panic.downcast_ref::<String>() {
                format!("Internal server error: {what}")
            } else {
                String::from("Internal server error")
            };
            log::error!("handler panicked for {method} {path}: {message}");
            let mut response = Response::new(500);
            response.set_body(message, "text/plain");
            response
        }
    }
}
