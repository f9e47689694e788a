use crate::Headers;
use encoding_rs::Encoding;
use mime::Mime;
use std::str::FromStr;

/// Extracts the character encoding from a set of [`Headers`], as
/// determined by the `Content-Type` charset parameter. Falls back to
/// windows-1252, the de facto default for http text types.
pub fn encoding(headers: &Headers) -> &'static Encoding {
    headers
        .get_str("Content-Type")
        .and_then(|c| Mime::from_str(c).ok())
        .and_then(|m| {
            m.params()
                .find(|(name, _)| name.as_str() == "charset")
                .and_then(|(_, v)| Encoding::for_label(v.as_str().as_bytes()))
        })
        .unwrap_or(encoding_rs::WINDOWS_1252)
}
