//! Variant groups: one logical decision over interchangeable alternatives.

use serde::{Deserialize, Serialize};

/// How the members of a [`VariantGroup`] relate to each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum VariantMode {
    /// Exactly one member is real at execution time; the executor picks it.
    #[default]
    OneOf,
    /// Every member is an acceptable, interchangeable alternative.
    AnyOf,
}

/// A single member of a variant group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variant<T> {
    /// The member value.
    pub value: T,

    /// Optional free-form annotation (drop counts, source recipe, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl<T> Variant<T> {
    /// Create a variant without metadata.
    pub fn new(value: T) -> Self {
        Self {
            value,
            metadata: None,
        }
    }

    /// Attach metadata to this variant.
    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// A set of structurally interchangeable alternatives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantGroup<T> {
    /// Relationship between members.
    pub mode: VariantMode,

    /// The members, in insertion order.
    pub variants: Vec<Variant<T>>,
}

impl<T> Default for VariantGroup<T> {
    fn default() -> Self {
        Self {
            mode: VariantMode::OneOf,
            variants: Vec::new(),
        }
    }
}

impl<T> VariantGroup<T> {
    /// Create an empty group with the given mode.
    pub fn empty(mode: VariantMode) -> Self {
        Self {
            mode,
            variants: Vec::new(),
        }
    }

    /// Create a group holding exactly one value.
    pub fn single(value: T) -> Self {
        Self {
            mode: VariantMode::OneOf,
            variants: vec![Variant::new(value)],
        }
    }

    /// Create a group from values with an explicit mode.
    pub fn from_values(mode: VariantMode, values: impl IntoIterator<Item = T>) -> Self {
        Self {
            mode,
            variants: values.into_iter().map(Variant::new).collect(),
        }
    }

    /// Create a `one_of` group from values.
    pub fn one_of(values: impl IntoIterator<Item = T>) -> Self {
        Self::from_values(VariantMode::OneOf, values)
    }

    /// Create an `any_of` group from values.
    pub fn any_of(values: impl IntoIterator<Item = T>) -> Self {
        Self::from_values(VariantMode::AnyOf, values)
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    /// First member value, if any.
    pub fn first(&self) -> Option<&T> {
        self.variants.first().map(|v| &v.value)
    }

    /// Member value at `index`.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.variants.get(index).map(|v| &v.value)
    }

    /// Iterate over member values.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.variants.iter().map(|v| &v.value)
    }

    /// Iterate mutably over member values.
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.variants.iter_mut().map(|v| &mut v.value)
    }

    /// Append a member.
    pub fn push(&mut self, value: T) {
        self.variants.push(Variant::new(value));
    }

    /// Append a member with metadata.
    pub fn push_with_metadata(&mut self, value: T, metadata: serde_json::Value) {
        self.variants.push(Variant::new(value).with_metadata(metadata));
    }

    /// Remove and return the member at `index`.
    pub fn remove_at(&mut self, index: usize) -> Option<Variant<T>> {
        if index < self.variants.len() {
            Some(self.variants.remove(index))
        } else {
            None
        }
    }

    /// Keep only the members whose index satisfies `keep`.
    pub fn retain_indices(&mut self, mut keep: impl FnMut(usize) -> bool) {
        let mut index = 0;
        self.variants.retain(|_| {
            let kept = keep(index);
            index += 1;
            kept
        });
    }

    /// Keep only the members whose value satisfies `keep`.
    pub fn retain(&mut self, mut keep: impl FnMut(&T) -> bool) {
        self.variants.retain(|v| keep(&v.value));
    }

    /// Remove every member.
    pub fn clear(&mut self) {
        self.variants.clear();
    }

    /// True if this is a `one_of` group reduced to a single member.
    pub fn is_collapsed(&self) -> bool {
        self.mode == VariantMode::OneOf && self.variants.len() == 1
    }
}

impl<T: PartialEq> VariantGroup<T> {
    /// True if any member equals `value`.
    pub fn contains(&self, value: &T) -> bool {
        self.values().any(|v| v == value)
    }
}

impl VariantGroup<String> {
    /// Group of owned names from borrowed strings.
    pub fn names<'a>(mode: VariantMode, names: impl IntoIterator<Item = &'a str>) -> Self {
        Self::from_values(mode, names.into_iter().map(str::to_string))
    }

    /// True if any member equals `name`.
    pub fn contains_name(&self, name: &str) -> bool {
        self.values().any(|v| v == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retain_indices_keeps_order() {
        let mut group = VariantGroup::one_of(["a", "b", "c", "d"]);
        group.retain_indices(|i| i % 2 == 1);
        assert_eq!(group.values().copied().collect::<Vec<_>>(), vec!["b", "d"]);
    }

    #[test]
    fn test_collapsed_only_for_single_one_of() {
        assert!(VariantGroup::single(1).is_collapsed());
        assert!(!VariantGroup::any_of([1]).is_collapsed());
        assert!(!VariantGroup::one_of([1, 2]).is_collapsed());
    }

    #[test]
    fn test_metadata_is_skipped_when_absent() {
        let group = VariantGroup::single("stone".to_string());
        let json = serde_json::to_value(&group).unwrap();
        assert_eq!(json["mode"], "one_of");
        assert!(json["variants"][0].get("metadata").is_none());
    }
}
