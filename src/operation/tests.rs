//! Tests for operation catalogs

use super::*;
use crate::error::Error;
use crate::types::{Method, ParamLocation};
use pretty_assertions::assert_eq;
use std::io::Write;

const MINIMAL: &str = r"
name: demo
endpoint: https://api.example.com
operations:
  - name: ListWidgets
    path: /list-widgets
    paging: {}
    result_path: Widgets
  - name: GetWidget
    method: GET
    path: /widgets/{Id}
    query_params: [view]
  - name: DeleteWidget
    path: /delete-widget
    mutating: true
    confirm_target: Id
";

// ============================================================================
// Parsing
// ============================================================================

#[test]
fn test_parse_minimal_catalog() {
    let catalog = load_catalog_from_str(MINIMAL).unwrap();

    assert_eq!(catalog.name, "demo");
    assert_eq!(
        catalog.operation_names(),
        vec!["ListWidgets", "GetWidget", "DeleteWidget"]
    );

    let list = catalog.operation("ListWidgets").unwrap();
    assert_eq!(list.method, Method::POST);
    assert!(list.is_paged());
    assert_eq!(list.paging, Some(PagingDefinition::default()));
    assert_eq!(list.result_path.as_deref(), Some("Widgets"));
    assert!(!list.mutating);
}

#[test]
fn test_paging_defaults() {
    let paging = PagingDefinition::default();
    assert_eq!(paging.token_in, ParamLocation::Body);
    assert_eq!(paging.token_name, "NextToken");
    assert_eq!(paging.token_path, "NextToken");
    assert_eq!(paging.page_size_name.as_deref(), Some("MaxResults"));
}

#[test]
fn test_paging_page_size_disabled() {
    let yaml = r"
name: demo
operations:
  - name: ListThings
    path: /things
    paging:
      token_in: query
      token_name: nextToken
      page_size_name: null
";
    let catalog = load_catalog_from_str(yaml).unwrap();
    let paging = catalog.operation("ListThings").unwrap().paging.clone().unwrap();
    assert_eq!(paging.token_in, ParamLocation::Query);
    assert_eq!(paging.token_name, "nextToken");
    assert_eq!(paging.token_path, "NextToken");
    assert_eq!(paging.page_size_name, None);
}

#[test]
fn test_operation_lookup_is_case_insensitive() {
    let catalog = load_catalog_from_str(MINIMAL).unwrap();
    assert_eq!(catalog.operation("listwidgets").unwrap().name, "ListWidgets");

    let err = catalog.operation("ListGadgets").unwrap_err();
    assert_eq!(
        err.to_string(),
        "Operation 'ListGadgets' not found in catalog 'demo'. \
         Available operations: ListWidgets, GetWidget, DeleteWidget"
    );
}

#[test]
fn test_parameter_locations() {
    let catalog = load_catalog_from_str(MINIMAL).unwrap();

    let get = catalog.operation("GetWidget").unwrap();
    assert!(!get.has_body());
    assert_eq!(get.path_params(), vec!["Id".to_string()]);
    assert_eq!(get.location_of("view"), ParamLocation::Query);
    assert_eq!(get.location_of("other"), ParamLocation::Query);

    let delete = catalog.operation("DeleteWidget").unwrap();
    assert!(delete.has_body());
    assert_eq!(delete.location_of("Id"), ParamLocation::Body);
}

// ============================================================================
// Validation
// ============================================================================

#[test]
fn test_rejects_empty_name() {
    let err = load_catalog_from_str("name: ''\noperations: []").unwrap_err();
    assert!(err.to_string().contains("Catalog name cannot be empty"));
}

#[test]
fn test_rejects_duplicate_operations() {
    let yaml = r"
name: demo
operations:
  - name: ListThings
    path: /a
  - name: listthings
    path: /b
";
    let err = load_catalog_from_str(yaml).unwrap_err();
    assert!(err.to_string().contains("Duplicate operation name"));
}

#[test]
fn test_rejects_relative_path() {
    let yaml = r"
name: demo
operations:
  - name: ListThings
    path: things
";
    let err = load_catalog_from_str(yaml).unwrap_err();
    assert!(err.to_string().contains("must start with '/'"));
}

#[test]
fn test_rejects_malformed_placeholder() {
    let yaml = r"
name: demo
operations:
  - name: GetThing
    path: /things/{Id
";
    let err = load_catalog_from_str(yaml).unwrap_err();
    assert!(err.to_string().contains("malformed path placeholder"));
}

#[test]
fn test_rejects_malformed_placeholder_next_to_valid_one() {
    let yaml = r"
name: demo
operations:
  - name: GetThing
    path: /things/{Name}/{bad-id}
";
    let err = load_catalog_from_str(yaml).unwrap_err();
    assert!(err.to_string().contains("malformed path placeholder"));
    assert!(err.to_string().contains("{bad-id}"));
}

#[test]
fn test_rejects_empty_token_name() {
    let yaml = r"
name: demo
operations:
  - name: ListThings
    path: /things
    paging:
      token_name: ''
";
    let err = load_catalog_from_str(yaml).unwrap_err();
    assert!(err.to_string().contains("token name and token path"));
}

#[test]
fn test_rejects_confirm_target_on_read_only() {
    let yaml = r"
name: demo
operations:
  - name: GetThing
    path: /thing
    confirm_target: Id
";
    let err = load_catalog_from_str(yaml).unwrap_err();
    assert!(err.to_string().contains("not mutating"));
}

#[test]
fn test_rejects_bad_endpoint() {
    let yaml = "name: demo\nendpoint: 'not a url'\n";
    assert!(load_catalog_from_str(yaml).is_err());
}

#[test]
fn test_rejects_invalid_yaml() {
    let err = load_catalog_from_str("name: [unclosed").unwrap_err();
    assert!(err.to_string().contains("Failed to parse catalog YAML"));
}

// ============================================================================
// Loading
// ============================================================================

#[test]
fn test_load_builtin_by_name() {
    let catalog = load_catalog("rum").unwrap();
    assert_eq!(catalog.name, "rum");

    let list = catalog.operation("ListAppMonitors").unwrap();
    let paging = list.paging.as_ref().unwrap();
    assert_eq!(paging.token_in, ParamLocation::Query);
    assert_eq!(paging.token_name, "nextToken");
    assert_eq!(paging.page_size_name.as_deref(), Some("maxResults"));
    assert_eq!(list.result_path.as_deref(), Some("AppMonitorSummaries"));
}

#[test]
fn test_load_billingconductor_operations() {
    let catalog = load_catalog("billingconductor").unwrap();
    for name in [
        "ListAccountAssociations",
        "ListBillingGroupCostReports",
        "ListBillingGroups",
        "ListCustomLineItems",
        "ListCustomLineItemVersions",
        "ListPricingPlans",
        "ListPricingPlansAssociatedWithPricingRule",
        "ListPricingRules",
        "ListPricingRulesAssociatedToPricingPlan",
        "ListResourcesAssociatedToCustomLineItem",
    ] {
        assert!(catalog.operation(name).unwrap().is_paged(), "{name}");
    }

    let accounts = catalog.operation("ListAccountAssociations").unwrap();
    assert_eq!(accounts.paging.as_ref().unwrap().page_size_name, None);

    let delete = catalog.operation("DeleteBillingGroup").unwrap();
    assert!(delete.mutating);
    assert_eq!(delete.confirm_target.as_deref(), Some("Arn"));
}

#[test]
fn test_load_from_file() {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    file.write_all(MINIMAL.as_bytes()).unwrap();

    let catalog = load_catalog(file.path()).unwrap();
    assert_eq!(catalog.name, "demo");
}

#[test]
fn test_load_missing_file_lists_builtins() {
    let err = load_catalog("./does-not-exist.yaml").unwrap_err();
    let message = err.to_string();
    assert!(message.contains("not found"));
    assert!(message.contains("billingconductor"));
    assert!(message.contains("rum"));
}

#[test]
fn test_load_unreadable_path_keeps_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_catalog(dir.path()).unwrap_err();
    assert!(!matches!(err, Error::CatalogNotFound { .. }));
    assert!(err
        .to_string()
        .starts_with(&format!("Failed to read catalog file '{}': ", dir.path().display())));
}
