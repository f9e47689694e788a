use smartstring::alias::String as SmartString;
use std::{borrow::Borrow, fmt};

/// An HTTP request method token.
///
/// Methods are arbitrary case-sensitive tokens rather than a closed
/// enum, because routing dispatches on whatever token the request line
/// carried, standard or not. Constants are provided for the common
/// ones.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Method(SmartString);

impl Method {
    /// the GET method
    pub fn get() -> Self {
        Self::from("GET")
    }

    /// the HEAD method
    pub fn head() -> Self {
        Self::from("HEAD")
    }

    /// the POST method
    pub fn post() -> Self {
        Self::from("POST")
    }

    /// the PUT method
    pub fn put() -> Self {
        Self::from("PUT")
    }

    /// the DELETE method
    pub fn delete() -> Self {
        Self::from("DELETE")
    }

    /// the token as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Method {
    fn from(token: &str) -> Self {
        Self(SmartString::from(token))
    }
}

impl From<String> for Method {
    fn from(token: String) -> Self {
        Self(SmartString::from(token))
    }
}

impl PartialEq<&str> for Method {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl PartialEq<Method> for &str {
    fn eq(&self, other: &Method) -> bool {
        other.0 == *self
    }
}

impl Borrow<str> for Method {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Method {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn arbitrary_tokens_are_preserved() {
        let method = Method::from("FOOBAR");
        assert_eq!(method, "FOOBAR");
        assert_ne!(method, Method::get());
        assert_eq!(method.to_string(), "FOOBAR");
    }
}
