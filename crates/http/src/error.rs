use thiserror::Error;

/// Unrecoverable errors within plover's http implementation.
///
/// "More input needed" is deliberately not an error: resumable parsing
/// reports it as [`Parse::Partial`][crate::Parse::Partial]. Everything
/// here means the connection (or transaction) cannot continue.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// [`std::io::Error`]
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// the peer closed the connection mid-message
    #[error("connection closed by peer")]
    Closed,

    /// the start line could not be parsed
    #[error("invalid http head")]
    InvalidHead,

    /// a header name was malformed
    #[error("invalid header name")]
    InvalidHeaderName,

    /// a header value was malformed or not valid utf-8
    #[error("invalid header value for {0}")]
    InvalidHeaderValue(&'static str),

    /// the request line carried no method token
    #[error("missing method")]
    MissingMethod,

    /// the status line carried no parseable status code
    #[error("invalid status code")]
    InvalidStatus,

    /// the version field could not be parsed at all
    #[error("invalid or missing version")]
    InvalidVersion,

    /// the version parsed, but this codec does not speak it
    #[error("unsupported version {0}")]
    UnsupportedVersion(String),

    /// the head exceeded the configured length or header-count bounds
    #[error("headers were malformed or longer than allowed")]
    HeadersTooLong,

    /// an inbound request declared a body longer than the configured
    /// ceiling. The server surfaces this as 413.
    #[error("declared content length {0} exceeds the configured maximum")]
    RequestBodyTooLong(u64),

    /// a uri without the mandatory `scheme://` part
    #[error("invalid uri, no scheme: {0}")]
    UriMissingScheme(String),

    /// the client deadline elapsed before the transaction finished
    #[error("transaction timed out")]
    Timeout,

    /// the transaction was aborted from another thread
    #[error("transaction aborted")]
    Aborted,
}

/// this crate's result type
pub type Result<T> = std::result::Result<T, Error>;
