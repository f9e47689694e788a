#![forbid(unsafe_code)]
#![deny(missing_docs, nonstandard_style, unused_qualifications)]

/*!
The http implementation for the plover toolkit: message types, a
resumable wire codec, and the transport abstraction the server and
client crates build on.

Parsing is driven by the caller feeding a growing byte buffer into
[`Request::parse`] or [`Response::parse`], which either yield a
[`Parse::Complete`] message together with the number of bytes it
occupied, report [`Parse::Partial`] when more input is needed, or fail
with an unrecoverable [`Error`].
*/

mod body;
pub use body::Body;

mod buffer;
pub use buffer::Buffer;

mod config;
pub use config::{DEFAULT_CONFIG, HttpConfig};

mod error;
pub use error::{Error, Result};

mod headers;
pub use headers::{HeaderName, Headers};

mod http_error;
pub use http_error::HttpError;

mod method;
pub use method::Method;

mod parse;
pub use parse::Parse;

mod request;
pub use request::Request;

mod response;
pub use response::Response;

mod status;
pub use status::reason_phrase;

mod transport;
pub use transport::Transport;

mod uri;
pub use uri::Uri;

mod util;
pub use util::encoding;

mod version;
pub use version::Version;
