// ── Resource registry ──
//
// Every managed RouterOS menu, keyed by its type name. Tables are built
// on first use and shared for the life of the process.

mod radius;
mod radius_incoming;

use std::sync::LazyLock;

use crate::error::CoreError;
use crate::schema::{Attribute, ResourceSchema};

pub use radius::radius;
pub use radius_incoming::radius_incoming;

static REGISTRY: LazyLock<Vec<ResourceSchema>> =
    LazyLock::new(|| vec![radius(), radius_incoming()]);

/// All registered resources, sorted by type name.
pub fn all() -> &'static [ResourceSchema] {
    &REGISTRY
}

/// Look up a resource by type name (`routeros_radius`).
pub fn lookup(type_name: &str) -> Result<&'static ResourceSchema, CoreError> {
    REGISTRY
        .iter()
        .find(|schema| schema.type_name() == type_name)
        .ok_or_else(|| CoreError::UnknownResourceType {
            type_name: type_name.to_owned(),
        })
}

// ── Shared attributes ───────────────────────────────────────────────

pub(crate) const KEY_COMMENT: &str = "comment";
pub(crate) const KEY_DISABLED: &str = "disabled";

pub(crate) fn comment() -> Attribute {
    Attribute::optional_string()
}

pub(crate) fn disabled() -> Attribute {
    Attribute::optional_bool()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn registry_is_sorted_and_unique() {
        let names: Vec<_> = all().iter().map(ResourceSchema::type_name).collect();
        assert!(names.windows(2).all(|w| w[0] < w[1]), "{names:?}");
        assert_eq!(names, ["routeros_radius", "routeros_radius_incoming"]);
    }

    #[test]
    fn unknown_type_is_an_error() {
        let err = lookup("routeros_ip_address").unwrap_err();
        assert_eq!(err.to_string(), "Unknown resource type 'routeros_ip_address'");
    }

    #[test]
    fn lookup_returns_the_shared_table() {
        let a = lookup("routeros_radius").unwrap();
        let b = lookup("routeros_radius").unwrap();
        assert!(std::ptr::eq(a, b));
    }
}
