use crate::{Error, Headers, Result, Version};

/// The outcome of a resumable parse attempt.
///
/// `Partial` is recoverable: append more input to the buffer and call
/// again. Unrecoverable input is reported as an [`Error`] by the parse
/// functions themselves, at which point the connection must be closed.
#[derive(Debug)]
pub enum Parse<T> {
    /// A full message was parsed from the front of the buffer. It
    /// occupied exactly `consumed` bytes; anything beyond that is
    /// unconsumed input (for example a pipelined follow-on request)
    /// and must be retained by the caller.
    Complete {
        /// the parsed message
        message: T,
        /// the number of buffer bytes the message occupied
        consumed: usize,
    },

    /// the buffer does not yet hold a full message
    Partial,
}

impl<T> Parse<T> {
    /// unwraps a `Complete` outcome, panicking on `Partial`. test
    /// convenience
    pub fn unwrap_complete(self) -> (T, usize) {
        match self {
            Parse::Complete { message, consumed } => (message, consumed),
            Parse::Partial => panic!("unwrap_complete() called on Parse::Partial"),
        }
    }
}

pub(crate) fn map_head_error(error: httparse::Error) -> Error {
    match error {
        httparse::Error::HeaderName => Error::InvalidHeaderName,
        httparse::Error::HeaderValue => Error::InvalidHeaderValue("unknown"),
        httparse::Error::Status => Error::InvalidStatus,
        httparse::Error::TooManyHeaders => Error::HeadersTooLong,
        httparse::Error::Version => Error::InvalidVersion,
        _ => Error::InvalidHead,
    }
}

pub(crate) fn version_from(version: Option<u8>) -> Result<Version> {
    match version {
        Some(0) => Ok(Version::Http1_0),
        Some(1) => Ok(Version::Http1_1),
        Some(other) => Err(Error::UnsupportedVersion(format!("HTTP/1.{other}"))),
        None => Err(Error::InvalidVersion),
    }
}

// duplicate names collapse here, last write wins
pub(crate) fn headers_from(raw: &[httparse::Header<'_>]) -> Result<Headers> {
    let mut headers = Headers::new();
    for header in raw {
        let value = std::str::from_utf8(header.value)
            .map_err(|_| Error::InvalidHeaderValue("unknown"))?;
        headers.insert(header.name, value);
    }
    Ok(headers)
}

/// The `Content-Length` header is matched exactly; callers that accept
/// other spellings normalize before parsing.
pub(crate) fn content_length(headers: &Headers) -> Result<Option<u64>> {
    let Some(value) = headers.get_str("Content-Length") else {
        return Ok(None);
    };
    let value = value.trim();
    match value.parse::<u64>() {
        Ok(length) => Ok(Some(length)),
        // a number too large for u64 is over any configurable ceiling
        Err(_) if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) => {
            Err(Error::RequestBodyTooLong(u64::MAX))
        }
        Err(_) => Err(Error::InvalidHeaderValue("Content-Length")),
    }
}
