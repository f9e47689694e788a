#![forbid(unsafe_code)]
#![deny(missing_docs, nonstandard_style, unused_qualifications)]

/*!
# The plover router

An ordered table of `(uri pattern, allowed methods, handler)` routes.
Patterns are regular expressions matched against the whole
request-target, and parenthesized capture groups are passed to the
handler positionally.

```rust
use plover_http::{HttpError, Request, Response};
use plover_router::Router;

let router = Router::new()
    .get("/hello", |_req, _captures| {
        let mut response = Response::new(200);
        response.set_body("hi", "text/plain");
        Ok(response)
    })
    .any("/items/([0-9]+)", |_req, captures: Vec<String>| {
        let mut response = Response::new(200);
        response.set_body(format!("item {}", captures[0]), "text/plain");
        Ok(response)
    });

assert_eq!(router.handle(Request::new("GET", "/hello")).unwrap().status(), 200);
assert_eq!(
    router.handle(Request::new("GET", "/nope")).unwrap_err().status(),
    404,
);
```

Dispatch order matters: the first route whose pattern matches the
target and whose method set admits the request wins. If some pattern
matched but no method did, the miss is a 405; if no pattern matched at
all, a 404.
*/

mod route;
pub use route::Route;

mod router;
pub use router::Router;
