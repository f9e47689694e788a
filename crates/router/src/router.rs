use crate::Route;
use plover_http::{HttpError, Method, Request, Response};
use plover_server::RequestHandler;
use std::fmt::{self, Debug, Formatter};

/// An ordered sequence of [`Route`]s.
///
/// Routes are tried in insertion order; the first whose pattern
/// matches the request-target and whose method set admits the request
/// method wins. See the crate docs for the 404/405 miss rules.
#[derive(Default)]
pub struct Router {
    routes: Vec<Route>,
}

macro_rules! method_route {
    ($fn_name:ident, $method:expr, $doc:expr) => {
        #[doc = $doc]
        pub fn $fn_name(
            self,
            pattern: &str,
            handler: impl Fn(Request, Vec<String>) -> Result<Response, HttpError>
            + Send
            + Sync
            + 'static,
        ) -> Self {
            self.with_route(Route::new(pattern, [$method], handler))
        }
    };
}

impl Router {
    /// constructs an empty router, which 404s everything
    pub fn new() -> Self {
        Self::default()
    }

    /// appends a route to the table
    pub fn add_route(&mut self, route: Route) {
        self.routes.push(route);
    }

    /// chainable [`Router::add_route`]
    #[must_use]
    pub fn with_route(mut self, route: Route) -> Self {
        self.add_route(route);
        self
    }

    /// registers a handler for `pattern` that accepts every method
    pub fn any(
        self,
        pattern: &str,
        handler: impl Fn(Request, Vec<String>) -> Result<Response, HttpError>
        + Send
        + Sync
        + 'static,
    ) -> Self {
        self.with_route(Route::new(pattern, Vec::<Method>::new(), handler))
    }

    method_route!(get, Method::get(), "registers a handler for GET requests to `pattern`");
    method_route!(post, Method::post(), "registers a handler for POST requests to `pattern`");
    method_route!(put, Method::put(), "registers a handler for PUT requests to `pattern`");
    method_route!(
        delete,
        Method::delete(),
        "registers a handler for DELETE requests to `pattern`"
    );

    /// Dispatches a request to the first admitting route.
    ///
    /// # Errors
    ///
    /// [`HttpError::method_not_allowed`] when some pattern matched the
    /// target but none admitted the method;
    /// [`HttpError::not_found`] when no pattern matched at all. Both
    /// are turned into responses by the server's handler wrapper.
    pub fn handle(&self, request: Request) -> Result<Response, HttpError> {
        let mut target_matched = false;
        for route in &self.routes {
            let Some(captures) = route.match_target(request.target()) else {
                continue;
            };
            if !route.admits(request.method()) {
                // remember that the target matched, for the 405 case
                target_matched = true;
                continue;
            }
            return route.invoke(request, captures);
        }

        if target_matched {
            log::debug!("no route admits {} {}", request.method(), request.target());
            Err(HttpError::method_not_allowed())
        } else {
            log::debug!("no route matches {}", request.target());
            Err(HttpError::not_found())
        }
    }
}

impl RequestHandler for Router {
    fn handle(&self, request: Request) -> Result<Response, HttpError> {
        Router::handle(self, request)
    }
}

impl Debug for Router {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router").field("routes", &self.routes).finish()
    }
}
