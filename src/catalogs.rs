//! Built-in operation catalogs embedded in the binary
//!
//! Lets users pass `--catalog rum` instead of a path to a YAML file.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Built-in catalog YAML definitions
pub static BUILTIN_CATALOGS: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| {
        let mut m = HashMap::new();

        m.insert(
            "billingconductor",
            include_str!("../catalogs/billingconductor.yaml"),
        );
        m.insert(
            "billing-conductor",
            include_str!("../catalogs/billingconductor.yaml"),
        );

        m.insert("rum", include_str!("../catalogs/rum.yaml"));
        m.insert("cloudwatch-rum", include_str!("../catalogs/rum.yaml"));

        m
    });

/// Get a built-in catalog by name
pub fn get_builtin(name: &str) -> Option<&'static str> {
    BUILTIN_CATALOGS.get(name).copied()
}

/// Check if a name is a built-in catalog
pub fn is_builtin(name: &str) -> bool {
    BUILTIN_CATALOGS.contains_key(name)
}

/// List built-in catalog names (primary names only)
pub fn list_builtin() -> Vec<&'static str> {
    vec!["billingconductor", "rum"]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::load_catalog_from_str;

    #[test]
    fn test_builtin_lookup() {
        assert!(is_builtin("rum"));
        assert!(is_builtin("billing-conductor"));
        assert!(!is_builtin("stripe"));
        assert_eq!(get_builtin("rum"), get_builtin("cloudwatch-rum"));
    }

    #[test]
    fn test_builtin_catalogs_parse() {
        for name in list_builtin() {
            let yaml = get_builtin(name).unwrap();
            let catalog = load_catalog_from_str(yaml)
                .unwrap_or_else(|e| panic!("catalog {name} failed to load: {e}"));
            assert_eq!(catalog.name, name);
            assert!(catalog.operations.iter().any(|op| op.is_paged()));
        }
    }
}
