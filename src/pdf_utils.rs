//! Shared lopdf helpers.

use lopdf::{Dictionary, Document, Object};

/// Extract a non-empty string value from a PDF dictionary.
pub fn extract_string_from_dict(dict: &Dictionary, key: &[u8]) -> Option<String> {
    dict.get(key)
        .ok()
        .and_then(|v| v.as_str().ok())
        .map(|s| String::from_utf8_lossy(s).into_owned())
        .filter(|s| !s.is_empty())
}

/// Extract a name value (without the leading slash) from a PDF dictionary.
pub fn extract_name_from_dict(dict: &Dictionary, key: &[u8]) -> Option<String> {
    dict.get(key)
        .ok()
        .and_then(|v| v.as_name().ok())
        .map(|n| String::from_utf8_lossy(n).into_owned())
}

/// Resolve a value that might be inline or a reference to a dictionary.
pub fn resolve_dict<'a>(document: &'a Document, value: &'a Object) -> Option<&'a Dictionary> {
    match value.as_reference() {
        Ok(id) => document.get_object(id).ok()?.as_dict().ok(),
        Err(_) => value.as_dict().ok(),
    }
}

/// Resolve a value that might be inline or a reference to an array.
pub fn resolve_array<'a>(document: &'a Document, value: &'a Object) -> Option<&'a Vec<Object>> {
    match value.as_reference() {
        Ok(id) => document.get_object(id).ok()?.as_array().ok(),
        Err(_) => value.as_array().ok(),
    }
}

/// Look up `key` in `dict` and resolve it to a dictionary.
pub fn dict_entry<'a>(
    document: &'a Document,
    dict: &'a Dictionary,
    key: &[u8],
) -> Option<&'a Dictionary> {
    resolve_dict(document, dict.get(key).ok()?)
}
