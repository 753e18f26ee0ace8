//! Defensive extraction of JSON payloads from model output.
//!
//! Providers are asked to return bare JSON but routinely wrap it in prose or
//! code fences. Parsing tries the trimmed text as-is first, then the widest
//! brace or bracket span inside it.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;

static OBJECT_SPAN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{[\s\S]*\}").unwrap());
static ARRAY_SPAN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[[\s\S]*\]").unwrap());

/// Pull a JSON object payload out of `text`, deserializing into `T`.
pub fn object<T: DeserializeOwned>(text: &str) -> Option<T> {
    payload(text, &OBJECT_SPAN)
}

/// Pull a JSON array payload out of `text`, deserializing into `T`.
pub fn array<T: DeserializeOwned>(text: &str) -> Option<T> {
    payload(text, &ARRAY_SPAN)
}

fn payload<T: DeserializeOwned>(text: &str, span: &Regex) -> Option<T> {
    let trimmed = text.trim();
    if let Ok(value) = serde_json::from_str(trimmed) {
        return Some(value);
    }
    let found = span.find(trimmed)?;
    serde_json::from_str(found.as_str()).ok()
}
