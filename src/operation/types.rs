//! Operation definition types
//!
//! Structures for declarative operation catalogs loaded from YAML. An
//! operation only describes the parts of an API call that matter for
//! routing and paging; request and response payloads stay opaque JSON.

use crate::error::{Error, Result};
use crate::template;
use crate::types::{Method, ParamLocation};
use serde::{Deserialize, Serialize};

// ============================================================================
// Catalog
// ============================================================================

/// A named set of operations for one service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogDefinition {
    /// Catalog name (e.g., "billingconductor")
    pub name: String,

    /// Human-readable title
    #[serde(default)]
    pub title: Option<String>,

    /// Description
    #[serde(default)]
    pub description: Option<String>,

    /// Default endpoint when none is configured
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Operation definitions
    #[serde(default)]
    pub operations: Vec<OperationDefinition>,
}

impl CatalogDefinition {
    /// Look up an operation by name (case-insensitive)
    pub fn operation(&self, name: &str) -> Result<&OperationDefinition> {
        self.operations
            .iter()
            .find(|op| op.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| {
                Error::operation_not_found(&self.name, name, self.operation_names().join(", "))
            })
    }

    /// Operation names in definition order
    pub fn operation_names(&self) -> Vec<&str> {
        self.operations.iter().map(|op| op.name.as_str()).collect()
    }
}

// ============================================================================
// Operation
// ============================================================================

/// One API operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationDefinition {
    /// Operation name (e.g., "ListBillingGroups")
    pub name: String,

    /// Description
    #[serde(default)]
    pub description: Option<String>,

    /// HTTP method
    #[serde(default)]
    pub method: Method,

    /// Path with `{Param}` placeholders
    pub path: String,

    /// Parameters routed into the query string (the rest go in the body)
    #[serde(default)]
    pub query_params: Vec<String>,

    /// Parameters that must be present
    #[serde(default)]
    pub required: Vec<String>,

    /// Continuation-token paging, if the operation is paged
    #[serde(default)]
    pub paging: Option<PagingDefinition>,

    /// Dot path to the default output (usually the item array)
    #[serde(default)]
    pub result_path: Option<String>,

    /// Whether the call changes server state
    #[serde(default)]
    pub mutating: bool,

    /// Parameter named in the confirmation prompt
    #[serde(default)]
    pub confirm_target: Option<String>,

    /// Body field receiving converted tags
    #[serde(default)]
    pub tags_field: Option<String>,

    /// Parameter receiving tag keys
    #[serde(default)]
    pub tag_keys_field: Option<String>,
}

impl OperationDefinition {
    /// Check if this operation pages with a continuation token
    pub fn is_paged(&self) -> bool {
        self.paging.is_some()
    }

    /// Placeholder names in the path
    pub fn path_params(&self) -> Vec<String> {
        template::extract_variables(&self.path)
    }

    /// Whether requests carry a JSON body
    pub fn has_body(&self) -> bool {
        !matches!(self.method, Method::GET | Method::DELETE)
    }

    /// Where a non-path parameter goes.
    ///
    /// Listed query params always go in the query; body-less methods put
    /// everything else there too.
    pub fn location_of(&self, param: &str) -> ParamLocation {
        if !self.has_body() || self.query_params.iter().any(|q| q == param) {
            ParamLocation::Query
        } else {
            ParamLocation::Body
        }
    }
}

// ============================================================================
// Paging
// ============================================================================

/// How an operation carries its continuation token and page size
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagingDefinition {
    /// Where the request token goes
    #[serde(default)]
    pub token_in: ParamLocation,

    /// Request field/parameter name for the token
    #[serde(default = "default_token_name")]
    pub token_name: String,

    /// Dot path to the token in the response
    #[serde(default = "default_token_name")]
    pub token_path: String,

    /// Where the page size goes
    #[serde(default)]
    pub page_size_in: ParamLocation,

    /// Request field/parameter name for the page size (absent if unsupported)
    #[serde(default = "default_page_size_name")]
    pub page_size_name: Option<String>,
}

impl Default for PagingDefinition {
    fn default() -> Self {
        Self {
            token_in: ParamLocation::Body,
            token_name: default_token_name(),
            token_path: default_token_name(),
            page_size_in: ParamLocation::Body,
            page_size_name: default_page_size_name(),
        }
    }
}

fn default_token_name() -> String {
    "NextToken".to_string()
}

fn default_page_size_name() -> Option<String> {
    Some("MaxResults".to_string())
}
