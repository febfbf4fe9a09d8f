//! Visibility partitioning scheme.
//!
//! The write path and the read path must agree on which by-scope partition a vessel lives
//! in. Both go through the functions below.

use vessel_registry_shared::{ScopeReference, Visibility};

/// Partition key shared by every globally visible vessel.
pub const GLOBAL_PARTITION_KEY: &str = "_ALL";

/// Whether `scope` collides with [`GLOBAL_PARTITION_KEY`].
///
/// Such a scope cannot be used to create or list vessels: its partition is the global one.
pub fn is_reserved_scope(scope: &ScopeReference) -> bool {
    scope.as_str() == GLOBAL_PARTITION_KEY
}

/// Get the by-scope partition key for a vessel's visibility and creation scope.
pub fn partition_key_for(visibility: Visibility, creation_scope: &ScopeReference) -> String {
    match visibility {
        Visibility::Global => GLOBAL_PARTITION_KEY.to_string(),
        Visibility::Scoped => creation_scope.as_str().to_string(),
    }
}

/// Get the two by-scope partitions holding every vessel visible to `scope`.
///
/// The global partition comes first, then the scope's own partition.
pub fn visible_partition_keys(scope: &ScopeReference) -> [String; 2] {
    [
        partition_key_for(Visibility::Global, scope),
        partition_key_for(Visibility::Scoped, scope),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_visibility_uses_sentinel() {
        let scope = ScopeReference::new("123");
        assert_eq!(partition_key_for(Visibility::Global, &scope), "_ALL");
    }

    #[test]
    fn test_scoped_visibility_uses_creation_scope() {
        let scope = ScopeReference::new("123");
        assert_eq!(partition_key_for(Visibility::Scoped, &scope), "123");
    }

    #[test]
    fn test_global_key_is_reserved() {
        assert!(is_reserved_scope(&ScopeReference::new(GLOBAL_PARTITION_KEY)));
        assert!(!is_reserved_scope(&ScopeReference::new("_all")));
        assert!(!is_reserved_scope(&ScopeReference::new("123")));
    }

    #[test]
    fn test_visible_partition_keys() {
        let scope = ScopeReference::new("456");
        assert_eq!(
            visible_partition_keys(&scope),
            ["_ALL".to_string(), "456".to_string()]
        );
    }
}
