//! Tag conversion
//!
//! Turns `Key=Value` arguments into the string map tagging APIs expect, and
//! validates tag keys for untagging.

use crate::error::{Error, Result};
use crate::types::{JsonValue, StringMap};

/// Parse `Key=Value` pairs into a tag map.
///
/// Splits on the first `=`, so values may contain `=`. Keys are trimmed and
/// must be non-empty and unique; values may be empty.
pub fn parse_tags<S: AsRef<str>>(pairs: &[S]) -> Result<StringMap> {
    let mut tags = StringMap::new();

    for pair in pairs {
        let pair = pair.as_ref();
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| Error::invalid_tag(pair, "expected Key=Value"))?;

        let key = key.trim();
        if key.is_empty() {
            return Err(Error::invalid_tag(pair, "tag key cannot be empty"));
        }
        if tags.insert(key.to_string(), value.to_string()).is_some() {
            return Err(Error::invalid_tag(pair, "duplicate tag key"));
        }
    }

    Ok(tags)
}

/// Validate and trim tag keys
pub fn tag_keys<S: AsRef<str>>(keys: &[S]) -> Result<Vec<String>> {
    keys.iter()
        .map(|k| {
            let key = k.as_ref().trim();
            if key.is_empty() {
                Err(Error::invalid_tag(k.as_ref(), "tag key cannot be empty"))
            } else {
                Ok(key.to_string())
            }
        })
        .collect()
}

/// Tag map as a JSON object
pub fn to_json(tags: &StringMap) -> JsonValue {
    JsonValue::Object(
        tags.iter()
            .map(|(k, v)| (k.clone(), JsonValue::String(v.clone())))
            .collect(),
    )
}
