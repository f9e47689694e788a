use crate::{Headers, Response, reason_phrase};
use std::fmt::{self, Display, Formatter};

/// An error a request handler raises to produce a specific http
/// status, optionally with extra response headers (for example
/// `WWW-Authenticate` on a 401).
///
/// The server's handler wrapper turns one of these into a `text/plain`
/// response describing the failure; handlers never take the server
/// down.
#[derive(Debug)]
pub struct HttpError {
    status: u16,
    headers: Headers,
    message: String,
}

impl HttpError {
    /// constructs an error with the canonical reason phrase as its
    /// message
    pub fn from_status(status: u16) -> Self {
        Self::new(status, reason_phrase(status))
    }

    /// constructs an error with a custom message
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            headers: Headers::new(),
            message: message.into(),
        }
    }

    /// 400
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(400, message)
    }

    /// 401, with a `WWW-Authenticate` basic-auth challenge for `realm`
    pub fn unauthorized(realm: &str) -> Self {
        Self::from_status(401).with_header("WWW-Authenticate", format!("Basic realm=\"{realm}\""))
    }

    /// 404
    pub fn not_found() -> Self {
        Self::from_status(404)
    }

    /// 405
    pub fn method_not_allowed() -> Self {
        Self::from_status(405)
    }

    /// 500
    pub fn internal_server_error(message: impl Into<String>) -> Self {
        Self::new(500, message)
    }

    /// chainable setter for an extra response header
    #[must_use]
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// the http status this error maps to
    pub fn status(&self) -> u16 {
        self.status
    }

    /// the response headers this error carries
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// the human-readable message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Builds the response for this error: the carried headers plus a
    /// `text/plain` body naming the failed request's method and path.
    pub fn into_response(self, method: &str, path: &str) -> Response {
        let mut response = Response::new(self.status);
        response.headers_mut().extend(self.headers);
        response.set_body(
            format!("{}\n\nMethod: {method}\nPath: {path}", self.message),
            "text/plain",
        );
        response
    }
}

impl Display for HttpError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.status, self.message)
    }
}

impl std::error::Error for HttpError {}
