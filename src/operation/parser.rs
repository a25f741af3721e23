//! YAML parser for operation catalogs
//!
//! Parses and validates catalog YAML files.
//! Supports both built-in catalogs (by name) and custom YAML files (by path).

use crate::catalogs;
use crate::error::{Error, Result, ResultExt};
use crate::operation::types::CatalogDefinition;
use crate::template;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Load a catalog from a built-in name or a file path
///
/// # Examples
///
/// ```ignore
/// // Built-in catalog
/// let catalog = load_catalog("rum")?;
///
/// // Custom catalog from file
/// let catalog = load_catalog("./my-service.yaml")?;
/// ```
pub fn load_catalog(path: impl AsRef<Path>) -> Result<CatalogDefinition> {
    let path = path.as_ref();
    let path_str = path.to_string_lossy();

    if !path_str.contains('/')
        && !path_str.contains('\\')
        && !path_str.ends_with(".yaml")
        && !path_str.ends_with(".yml")
    {
        if let Some(yaml) = catalogs::get_builtin(&path_str) {
            return load_catalog_from_str(yaml);
        }
    }

    let content = match fs::read_to_string(path) {
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(Error::CatalogNotFound {
                name: path.display().to_string(),
                available: catalogs::list_builtin().join(", "),
            });
        }
        read => read.with_context(|| format!("Failed to read catalog file '{}'", path.display()))?,
    };
    load_catalog_from_str(&content)
}

/// Load a catalog from a YAML string
pub fn load_catalog_from_str(yaml: &str) -> Result<CatalogDefinition> {
    let def: CatalogDefinition = serde_yaml::from_str(yaml)
        .map_err(|e| Error::config(format!("Failed to parse catalog YAML: {e}")))?;

    validate_catalog(&def)?;
    Ok(def)
}

/// Validate a catalog definition
fn validate_catalog(def: &CatalogDefinition) -> Result<()> {
    if def.name.is_empty() {
        return Err(Error::config("Catalog name cannot be empty"));
    }

    if let Some(endpoint) = &def.endpoint {
        url::Url::parse(endpoint)?;
    }

    let mut seen = HashSet::new();
    for op in &def.operations {
        if op.name.is_empty() {
            return Err(Error::config("Operation name cannot be empty"));
        }
        if !seen.insert(op.name.to_ascii_lowercase()) {
            return Err(Error::config(format!(
                "Duplicate operation name: {}",
                op.name
            )));
        }
        if !op.path.starts_with('/') {
            return Err(Error::config(format!(
                "Operation '{}' path must start with '/': {}",
                op.name, op.path
            )));
        }
        if !template::placeholders_well_formed(&op.path) {
            return Err(Error::config(format!(
                "Operation '{}' has a malformed path placeholder: {}",
                op.name, op.path
            )));
        }

        if let Some(paging) = &op.paging {
            if paging.token_name.is_empty() || paging.token_path.is_empty() {
                return Err(Error::config(format!(
                    "Operation '{}' paging needs a token name and token path",
                    op.name
                )));
            }
            if paging.page_size_name.as_deref() == Some("") {
                return Err(Error::config(format!(
                    "Operation '{}' page size name cannot be empty",
                    op.name
                )));
            }
        }

        if op.confirm_target.is_some() && !op.mutating {
            return Err(Error::config(format!(
                "Operation '{}' has a confirm_target but is not mutating",
                op.name
            )));
        }
    }

    Ok(())
}
