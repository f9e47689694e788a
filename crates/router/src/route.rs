use plover_http::{HttpError, Method, Request, Response};
use regex::Regex;
use std::fmt::{self, Debug, Formatter};

pub(crate) type RouteHandler =
    Box<dyn Fn(Request, Vec<String>) -> Result<Response, HttpError> + Send + Sync + 'static>;

/// One routing table entry: a uri pattern, the set of methods it
/// accepts, and the handler to invoke.
pub struct Route {
    pattern: Regex,
    methods: Vec<Method>,
    handler: RouteHandler,
}

impl Route {
    /// # Builds a route.
    ///
    /// `pattern` is a regular expression that must match the entire
    /// request-target (it is compiled anchored at both ends, so
    /// `"/foo"` matches `/foo` and nothing else, while
    /// `"/items/([0-9]+)"` matches `/items/7` and captures `7`). An
    /// empty `methods` set accepts every method.
    ///
    /// # Panics
    ///
    /// Panics if `pattern` is not a valid regular expression.
    pub fn new(
        pattern: &str,
        methods: impl IntoIterator<Item: Into<Method>>,
        handler: impl Fn(Request, Vec<String>) -> Result<Response, HttpError>
        + Send
        + Sync
        + 'static,
    ) -> Self {
        let anchored =
            Regex::new(&format!(r"\A(?:{pattern})\z")).expect("route pattern must be a valid regex");
        Self {
            pattern: anchored,
            methods: methods.into_iter().map(Into::into).collect(),
            handler: Box::new(handler),
        }
    }

    /// Matches the request-target against this route's pattern,
    /// yielding the capture groups (group 0 excluded; unmatched
    /// optional groups become empty strings) on success.
    pub(crate) fn match_target(&self, target: &str) -> Option<Vec<String>> {
        self.pattern.captures(target).map(|captures| {
            captures
                .iter()
                .skip(1)
                .map(|group| group.map(|m| m.as_str().to_string()).unwrap_or_default())
                .collect()
        })
    }

    pub(crate) fn admits(&self, method: &Method) -> bool {
        self.methods.is_empty() || self.methods.contains(method)
    }

    pub(crate) fn invoke(
        &self,
        request: Request,
        captures: Vec<String>,
    ) -> Result<Response, HttpError> {
        (self.handler)(request, captures)
    }
}

impl Debug for Route {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("pattern", &self.pattern.as_str())
            .field("methods", &self.methods)
            .field("handler", &"..")
            .finish()
    }
}
