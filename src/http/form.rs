//! `application/x-www-form-urlencoded` decoding.

use std::collections::HashMap;

pub const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// Decoded form fields. When a key repeats, the last value wins.
pub type FormData = HashMap<String, String>;

/// Decodes a form-encoded body or query string.
///
/// `+` decodes to a space and `%XX` to the corresponding byte; invalid UTF-8
/// after decoding is replaced rather than rejected. An empty input yields an
/// empty mapping.
pub fn decode(input: &[u8]) -> FormData {
    url::form_urlencoded::parse(input)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

/// Reports whether a Content-Type value denotes form-encoded data, ignoring
/// case and any parameters such as `charset`.
pub fn is_form_urlencoded(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .map(|media| media.trim().eq_ignore_ascii_case(FORM_URLENCODED))
        .unwrap_or(false)
}
