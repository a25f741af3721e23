//! Path templates for operation definitions
//!
//! Handles `{Param}` placeholders in operation paths such as
//! `/appmonitor/{Name}/data`. Values come from the invocation parameters and
//! are substituted segment by segment, so the transport can percent-encode
//! each segment on its own.

use crate::error::{Error, Result};
use crate::types::{JsonObject, JsonValue};
use regex::Regex;
use std::sync::LazyLock;

/// Regex for matching path placeholders: {Name}
static PLACEHOLDER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}").unwrap()
});

/// Check that every brace in a template belongs to a `{Name}` placeholder
pub fn placeholders_well_formed(template: &str) -> bool {
    !PLACEHOLDER_REGEX.replace_all(template, "").contains(['{', '}'])
}

/// Extract all placeholder names from a path template, in order
pub fn extract_variables(template: &str) -> Vec<String> {
    PLACEHOLDER_REGEX
        .captures_iter(template)
        .filter_map(|cap| cap.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Render a path template into decoded segments.
///
/// Empty segments (leading or doubled slashes) are dropped. Every
/// placeholder must resolve to a scalar parameter.
pub fn render_segments(template: &str, params: &JsonObject) -> Result<Vec<String>> {
    let mut missing = Vec::new();
    let mut segments = Vec::new();

    for segment in template.split('/').filter(|s| !s.is_empty()) {
        let mut rendered = String::with_capacity(segment.len());
        let mut last = 0;
        for cap in PLACEHOLDER_REGEX.captures_iter(segment) {
            let (Some(full), Some(name)) = (cap.get(0), cap.get(1)) else {
                continue;
            };
            rendered.push_str(&segment[last..full.start()]);
            match params.get(name.as_str()).and_then(scalar_to_string) {
                Some(value) => rendered.push_str(&value),
                None => missing.push(name.as_str().to_string()),
            }
            last = full.end();
        }
        rendered.push_str(&segment[last..]);
        segments.push(rendered);
    }

    if missing.is_empty() {
        Ok(segments)
    } else {
        Err(Error::undefined_var(missing.join(", ")))
    }
}

/// Convert a scalar JSON value to a string for substitution
fn scalar_to_string(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(s) if !s.is_empty() => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        JsonValue::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(value: JsonValue) -> JsonObject {
        match value {
            JsonValue::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_extract_variables() {
        assert_eq!(
            extract_variables("/appmonitor/{Name}/data"),
            vec!["Name".to_string()]
        );
        assert_eq!(
            extract_variables("/rummetrics/{AppMonitorName}/metrics/{Id}"),
            vec!["AppMonitorName".to_string(), "Id".to_string()]
        );
        assert!(extract_variables("/list-billing-groups").is_empty());
    }

    #[test]
    fn test_placeholders_well_formed() {
        assert!(placeholders_well_formed("/tags/{ResourceArn}"));
        assert!(placeholders_well_formed("/list-pricing-rules"));
        assert!(placeholders_well_formed("/a/{Name}/v{Version}"));
        assert!(!placeholders_well_formed("/a/{Name}/{bad-id}"));
        assert!(!placeholders_well_formed("/a/{Name"));
        assert!(!placeholders_well_formed("/a/Name}"));
        assert!(!placeholders_well_formed("/a/{}"));
    }

    #[test]
    fn test_render_segments() {
        let p = params(json!({"Name": "my app", "Version": 3}));
        let segments = render_segments("/appmonitor/{Name}/v{Version}/data", &p).unwrap();
        assert_eq!(segments, vec!["appmonitor", "my app", "v3", "data"]);
    }

    #[test]
    fn test_render_keeps_slashes_inside_values() {
        let p = params(json!({"ResourceArn": "arn:aws:rum:us-east-1:123:appmonitor/web"}));
        let segments = render_segments("/tags/{ResourceArn}", &p).unwrap();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[1], "arn:aws:rum:us-east-1:123:appmonitor/web");
    }

    #[test]
    fn test_render_missing_variable() {
        let p = params(json!({"Other": "x"}));
        let err = render_segments("/appmonitor/{Name}/data/{Id}", &p).unwrap_err();
        assert_eq!(err.to_string(), "Undefined variable in template: Name, Id");
    }

    #[test]
    fn test_render_rejects_non_scalar_and_empty() {
        let p = params(json!({"Name": {"nested": true}, "Id": ""}));
        assert!(render_segments("/a/{Name}", &p).is_err());
        assert!(render_segments("/a/{Id}", &p).is_err());
    }

    #[test]
    fn test_render_plain_path() {
        let p = JsonObject::new();
        assert_eq!(
            render_segments("/list-billing-groups", &p).unwrap(),
            vec!["list-billing-groups"]
        );
        assert!(render_segments("/", &p).unwrap().is_empty());
    }
}
