//! Variant commitments recorded while a tree is being built.
//!
//! Once a branch settles on a material (say `spruce_planks`), every nested
//! lookup of the same logical item has to stay within that choice. The
//! manager is cloned whenever the builder forks into an ingredient subtree;
//! the backing map is shared until one side writes, so siblings never see
//! each other's commitments while children inherit their parent's.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

/// A recorded decision for one primary item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VariantConstraint {
    /// The branch committed to exactly this item.
    Required(String),
    /// The branch may pick among these items.
    Allowed(Vec<String>),
}

/// Copy-on-write map from primary item name to its constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariantConstraintManager {
    constraints: Arc<BTreeMap<String, VariantConstraint>>,
}

impl VariantConstraintManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commit `primary` to a single `variant`.
    pub fn require(&mut self, primary: &str, variant: &str) {
        Arc::make_mut(&mut self.constraints).insert(
            primary.to_string(),
            VariantConstraint::Required(variant.to_string()),
        );
    }

    /// Restrict `primary` to `variants`. An existing requirement is kept.
    pub fn allow<S: AsRef<str>>(&mut self, primary: &str, variants: &[S]) {
        if self.required_variant(primary).is_some() || variants.is_empty() {
            return;
        }
        Arc::make_mut(&mut self.constraints).insert(
            primary.to_string(),
            VariantConstraint::Allowed(variants.iter().map(|v| v.as_ref().to_string()).collect()),
        );
    }

    pub fn get(&self, primary: &str) -> Option<&VariantConstraint> {
        self.constraints.get(primary)
    }

    /// The committed variant for `primary`, if any.
    pub fn required_variant(&self, primary: &str) -> Option<&str> {
        match self.constraints.get(primary) {
            Some(VariantConstraint::Required(variant)) => Some(variant),
            _ => None,
        }
    }

    /// The allowed set for `primary`, if one was recorded.
    pub fn allowed_variants(&self, primary: &str) -> Option<&[String]> {
        match self.constraints.get(primary) {
            Some(VariantConstraint::Allowed(variants)) => Some(variants),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// True if both managers still point at the same backing map.
    pub fn shares_storage_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.constraints, &other.constraints)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clone_diverges_on_write() {
        let mut parent = VariantConstraintManager::new();
        parent.require("birch_planks", "oak_planks");

        let mut child = parent.clone();
        assert!(child.shares_storage_with(&parent));
        child.require("stick", "stick");

        assert!(!child.shares_storage_with(&parent));
        assert_eq!(child.required_variant("birch_planks"), Some("oak_planks"));
        assert!(parent.get("stick").is_none());
    }

    #[test]
    fn test_allow_does_not_override_requirement() {
        let mut manager = VariantConstraintManager::new();
        manager.require("birch_planks", "spruce_planks");
        manager.allow("birch_planks", &["oak_planks", "spruce_planks"]);
        assert_eq!(manager.required_variant("birch_planks"), Some("spruce_planks"));
        assert!(manager.allowed_variants("birch_planks").is_none());
    }

    #[test]
    fn test_allowed_set_is_recorded() {
        let mut manager = VariantConstraintManager::new();
        manager.allow("birch_planks", &["oak_planks", "spruce_planks"]);
        assert_eq!(
            manager.allowed_variants("birch_planks"),
            Some(&["oak_planks".to_string(), "spruce_planks".to_string()][..])
        );
        assert_eq!(manager.len(), 1);
    }
}
