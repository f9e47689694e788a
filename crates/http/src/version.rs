use crate::Error;
use std::{fmt, str::FromStr};

/// The version of the HTTP protocol in use.
///
/// Only the two versions this codec speaks are representable; anything
/// else on the wire is rejected during parsing with
/// [`Error::UnsupportedVersion`].
#[derive(Copy, Clone, Debug, Default, Eq, Ord, PartialEq, PartialOrd, Hash)]
pub enum Version {
    /// HTTP/1.0
    Http1_0,

    /// HTTP/1.1
    #[default]
    Http1_1,
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Version::Http1_0 => "HTTP/1.0",
            Version::Http1_1 => "HTTP/1.1",
        })
    }
}

impl FromStr for Version {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "HTTP/1.0" => Ok(Version::Http1_0),
            "HTTP/1.1" => Ok(Version::Http1_1),
            _ => Err(Error::UnsupportedVersion(s.to_string())),
        }
    }
}
