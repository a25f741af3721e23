//! Response projection
//!
//! A [`Selector`] picks what an invocation emits from each response:
//!
//! - `*` - the whole response
//! - `^Name` - the value of input parameter `Name`
//! - `Field.Sub` - a dot path into the response
//!
//! Arrays are unrolled into their elements; a missing or `null` value emits
//! nothing.

use crate::types::{JsonObject, JsonValue};
use std::str::FromStr;

/// What to emit from a response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// The whole response body
    Response,
    /// An input parameter, echoed back
    Parameter(String),
    /// A dot path into the response
    Path(String),
}

impl Selector {
    /// Selector for an operation: the explicit `--select` value, else the
    /// operation's result path, else the whole response
    pub fn resolve(explicit: Option<&str>, result_path: Option<&str>) -> Self {
        match (explicit, result_path) {
            (Some(s), _) => s.parse().unwrap_or(Self::Response),
            (None, Some(path)) => Self::Path(path.to_string()),
            (None, None) => Self::Response,
        }
    }

    /// Project a response into output values
    pub fn project(&self, response: &JsonValue, params: &JsonObject) -> Vec<JsonValue> {
        let selected = match self {
            Self::Response => Some(response),
            Self::Parameter(name) => params.get(name),
            Self::Path(path) => lookup_path(response, path),
        };
        unroll(selected)
    }
}

impl FromStr for Selector {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Ok(if s.is_empty() || s == "*" {
            Self::Response
        } else if let Some(name) = s.strip_prefix('^') {
            Self::Parameter(name.to_string())
        } else {
            Self::Path(s.to_string())
        })
    }
}

/// Look up a dot path (optionally `$.`-prefixed) in a JSON value
pub fn lookup_path<'a>(value: &'a JsonValue, path: &str) -> Option<&'a JsonValue> {
    let path = path.strip_prefix("$.").unwrap_or(path);

    let mut current = value;
    for part in path.split('.').filter(|p| !p.is_empty()) {
        match current {
            JsonValue::Object(map) => {
                current = map.get(part)?;
            }
            _ => return None,
        }
    }

    Some(current)
}

fn unroll(selected: Option<&JsonValue>) -> Vec<JsonValue> {
    match selected {
        None | Some(JsonValue::Null) => Vec::new(),
        Some(JsonValue::Array(items)) => items.clone(),
        Some(other) => vec![other.clone()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;

    #[test_case("*", Selector::Response ; "star")]
    #[test_case("", Selector::Response ; "empty")]
    #[test_case("^Name", Selector::Parameter("Name".into()) ; "parameter")]
    #[test_case("BillingGroups", Selector::Path("BillingGroups".into()) ; "field")]
    #[test_case(" AppMonitor.Name ", Selector::Path("AppMonitor.Name".into()) ; "nested trimmed")]
    fn test_parse(input: &str, expected: Selector) {
        assert_eq!(input.parse::<Selector>().unwrap(), expected);
    }

    #[test]
    fn test_resolve_precedence() {
        assert_eq!(
            Selector::resolve(Some("*"), Some("Events")),
            Selector::Response
        );
        assert_eq!(
            Selector::resolve(None, Some("Events")),
            Selector::Path("Events".into())
        );
        assert_eq!(Selector::resolve(None, None), Selector::Response);
    }

    #[test]
    fn test_project_unrolls_arrays() {
        let response = json!({"BillingGroups": [{"Name": "a"}, {"Name": "b"}], "NextToken": "t"});
        let out = Selector::Path("BillingGroups".into()).project(&response, &JsonObject::new());
        assert_eq!(out, vec![json!({"Name": "a"}), json!({"Name": "b"})]);
    }

    #[test]
    fn test_project_nested_scalar() {
        let response = json!({"AppMonitor": {"Name": "web", "State": "ACTIVE"}});
        let out = Selector::Path("$.AppMonitor.State".into()).project(&response, &JsonObject::new());
        assert_eq!(out, vec![json!("ACTIVE")]);
    }

    #[test]
    fn test_project_missing_or_null_is_empty() {
        let response = json!({"Events": null});
        let params = JsonObject::new();
        assert!(Selector::Path("Events".into()).project(&response, &params).is_empty());
        assert!(Selector::Path("Nope".into()).project(&response, &params).is_empty());
        assert!(Selector::Parameter("Name".into()).project(&response, &params).is_empty());
    }

    #[test]
    fn test_project_parameter_echo() {
        let mut params = JsonObject::new();
        params.insert("Arn".into(), json!("arn:aws:billingconductor::1:billinggroup/x"));
        let out = Selector::Parameter("Arn".into()).project(&json!({}), &params);
        assert_eq!(out, vec![json!("arn:aws:billingconductor::1:billinggroup/x")]);
    }

    #[test]
    fn test_project_whole_response() {
        let response = json!({"Arn": "x"});
        let out = Selector::Response.project(&response, &JsonObject::new());
        assert_eq!(out, vec![response]);
    }

    #[test]
    fn test_lookup_path_through_non_object() {
        let value = json!({"a": [1, 2]});
        assert!(lookup_path(&value, "a.b").is_none());
        assert_eq!(lookup_path(&value, "a"), Some(&json!([1, 2])));
    }
}
