//! Engine types
//!
//! Invocation inputs plus the JSON request/page pair the paginator drives.

use crate::http::RequestConfig;
use crate::pagination::{PageRequest, PageResponse};
use crate::select::{lookup_path, Selector};
use crate::types::{JsonObject, JsonValue, Method, ParamLocation, StringMap};

/// Caller input for one operation call
#[derive(Debug, Clone, Default)]
pub struct Invocation {
    /// Operation parameters
    pub params: JsonObject,
    /// Base request body; parameters are merged over it
    pub body: Option<JsonObject>,
    /// Tags to attach
    pub tags: StringMap,
    /// Tag keys to remove
    pub tag_keys: Vec<String>,
}

impl Invocation {
    /// Create an empty invocation
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a parameter
    #[must_use]
    pub fn param(mut self, name: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Set the base request body
    #[must_use]
    pub fn body(mut self, body: JsonObject) -> Self {
        self.body = Some(body);
        self
    }

    /// Set tags
    #[must_use]
    pub fn tags(mut self, tags: StringMap) -> Self {
        self.tags = tags;
        self
    }

    /// Set tag keys
    #[must_use]
    pub fn tag_keys(mut self, keys: Vec<String>) -> Self {
        self.tag_keys = keys;
        self
    }

    /// Parameter value as display text (strings unquoted)
    pub fn param_text(&self, name: &str) -> Option<String> {
        self.params.get(name).map(|v| match v {
            JsonValue::String(s) => s.clone(),
            other => other.to_string(),
        })
    }
}

/// Fully routed request for one operation
#[derive(Debug, Clone, PartialEq)]
pub struct JsonRequest {
    /// HTTP method
    pub method: Method,
    /// Decoded path segments
    pub segments: Vec<String>,
    /// Query pairs, in order
    pub query: Vec<(String, String)>,
    /// JSON body, for methods that carry one
    pub body: Option<JsonObject>,
    token: Option<(ParamLocation, String)>,
}

impl JsonRequest {
    /// Create a request without a token binding
    pub fn new(method: Method, segments: Vec<String>) -> Self {
        Self {
            method,
            segments,
            query: Vec::new(),
            body: None,
            token: None,
        }
    }

    /// Bind the continuation token to a query parameter or body field
    #[must_use]
    pub fn with_token_binding(mut self, location: ParamLocation, name: impl Into<String>) -> Self {
        self.token = Some((location, name.into()));
        self
    }

    /// Current continuation token, if one is set
    pub fn token(&self) -> Option<&str> {
        let (location, name) = self.token.as_ref()?;
        match location {
            ParamLocation::Query => self
                .query
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.as_str()),
            ParamLocation::Body => self
                .body
                .as_ref()
                .and_then(|b| b.get(name))
                .and_then(JsonValue::as_str),
        }
    }

    /// Place a value at a parameter location
    pub fn insert(&mut self, location: ParamLocation, name: &str, value: JsonValue) {
        match location {
            ParamLocation::Query => {
                for text in query_values(&value) {
                    self.query.push((name.to_string(), text));
                }
            }
            ParamLocation::Body => {
                self.body
                    .get_or_insert_with(JsonObject::new)
                    .insert(name.to_string(), value);
            }
        }
    }

    /// Transport settings for this request
    pub fn to_request_config(&self) -> RequestConfig {
        RequestConfig {
            query: self.query.clone(),
            body: self.body.clone().map(JsonValue::Object),
            ..RequestConfig::default()
        }
    }
}

impl PageRequest for JsonRequest {
    fn set_continuation_token(&mut self, token: Option<String>) {
        let Some((location, name)) = self.token.clone() else {
            return;
        };
        match location {
            ParamLocation::Query => {
                self.query.retain(|(k, _)| *k != name);
                if let Some(token) = token {
                    self.query.push((name, token));
                }
            }
            ParamLocation::Body => {
                let body = self.body.get_or_insert_with(JsonObject::new);
                match token {
                    Some(token) => {
                        body.insert(name, JsonValue::String(token));
                    }
                    None => {
                        body.remove(&name);
                    }
                }
            }
        }
    }
}

/// One response page
#[derive(Debug, Clone, PartialEq)]
pub struct JsonPage {
    body: JsonValue,
    token: Option<String>,
    result_path: Option<String>,
}

impl JsonPage {
    /// Wrap a response body, reading its token from `token_path`
    pub fn new(body: JsonValue, token_path: &str, result_path: Option<&str>) -> Self {
        let token = lookup_path(&body, token_path)
            .and_then(JsonValue::as_str)
            .map(str::to_owned);
        Self {
            body,
            token,
            result_path: result_path.map(str::to_owned),
        }
    }

    /// Raw response body
    pub fn body(&self) -> &JsonValue {
        &self.body
    }

    /// Consume the page, returning the raw body
    pub fn into_body(self) -> JsonValue {
        self.body
    }
}

impl PageResponse for JsonPage {
    type Item = JsonValue;

    fn continuation_token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn into_items(self) -> Vec<JsonValue> {
        Selector::resolve(None, self.result_path.as_deref()).project(&self.body, &JsonObject::new())
    }
}

/// Query text for a parameter value: arrays repeat the key, `null` is dropped
fn query_values(value: &JsonValue) -> Vec<String> {
    match value {
        JsonValue::Null => Vec::new(),
        JsonValue::Array(items) => items.iter().flat_map(query_values).collect(),
        JsonValue::String(s) => vec![s.clone()],
        other => vec![other.to_string()],
    }
}
