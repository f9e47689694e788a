#![forbid(unsafe_code)]
#![deny(missing_docs, nonstandard_style, unused_qualifications)]

/*!
The plover http client: one transaction at a time over a fresh
connection, with a whole-transaction deadline, cross-thread abort, and
an optional read-progress callback.

```rust,no_run
use plover_client::Client;
use plover_http::{Request, Uri};
use std::time::Duration;

# plover_testing::block_on(async {
let uri = Uri::parse("http://example.org/")?;
let client = Client::new().with_timeout(Duration::from_secs(5));
let mut response = client
    .do_request(Request::from_uri("GET", &uri), "example.org", None)
    .await?;
println!("{}", response.body_string());
# plover_http::Result::Ok(()) });
```

A [`Client`] is reusable for sequential transactions but never
concurrent ones; each `do_request` resets the deadline, the socket,
and the abort signal.
*/

mod client;
pub use client::{Client, request};

mod connector;
pub use connector::{Connector, TcpConnector};
