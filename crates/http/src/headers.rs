use smartstring::alias::String as SmartString;
use std::{
    collections::{BTreeMap, btree_map},
    fmt::{self, Debug, Display, Formatter},
};

/// A header name.
///
/// Names are matched case-sensitively in this map; callers that need
/// RFC-style case-insensitive lookup normalize before inserting.
pub type HeaderName = SmartString;

/// Plover's header map type.
///
/// One value per name, last write wins. The map is ordered by name, so
/// serialization is deterministic; insertion order is not preserved on
/// the wire.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[must_use]
pub struct Headers(BTreeMap<HeaderName, String>);

impl Headers {
    /// constructs an empty header map
    pub fn new() -> Self {
        Self::default()
    }

    /// the number of distinct header names in this map
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// predicate for an empty map
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// sets `name` to `value`, replacing any previous value
    pub fn insert(&mut self, name: impl Into<HeaderName>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    /// sets `name` to `value` only if `name` is not already present
    pub fn try_insert(&mut self, name: impl Into<HeaderName>, value: impl Into<String>) {
        self.0.entry(name.into()).or_insert_with(|| value.into());
    }

    /// like [`Headers::try_insert`], but the value is only built when
    /// it will actually be inserted
    pub fn try_insert_with<V: Into<String>>(
        &mut self,
        name: impl Into<HeaderName>,
        value: impl FnOnce() -> V,
    ) {
        self.0.entry(name.into()).or_insert_with(|| value().into());
    }

    /// retrieves the value for `name`, if present
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// removes and returns the value for `name`
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.0.remove(name)
    }

    /// predicate for the presence of `name`
    pub fn has_header(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// compares the value for `name` against `value`, ignoring ascii
    /// case of the value. Absent headers compare unequal to everything.
    pub fn eq_ignore_ascii_case(&self, name: &str, value: &str) -> bool {
        self.get_str(name)
            .is_some_and(|v| v.eq_ignore_ascii_case(value))
    }

    /// borrowing iterator over `(name, value)` pairs in name order
    pub fn iter(&self) -> btree_map::Iter<'_, HeaderName, String> {
        self.0.iter()
    }

    /// absorbs all entries from `other`, overwriting on collision
    pub fn extend(&mut self, other: Headers) {
        self.0.extend(other.0);
    }
}

impl Display for Headers {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (name, value) in self {
            f.write_fmt(format_args!("{name}: {value}\r\n"))?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Headers {
    type IntoIter = btree_map::Iter<'a, HeaderName, String>;
    type Item = (&'a HeaderName, &'a String);

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for Headers {
    type IntoIter = btree_map::IntoIter<HeaderName, String>;
    type Item = (HeaderName, String);

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<N: Into<HeaderName>, V: Into<String>> FromIterator<(N, V)> for Headers {
    fn from_iter<T: IntoIterator<Item = (N, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(n, v)| (n.into(), v.into()))
                .collect(),
        )
    }
}
