//! Item counts held by the agent.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A map of item name to held count.
///
/// Zero counts are never stored, so `len` is the number of distinct items
/// actually held.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inventory {
    items: BTreeMap<String, u32>,
}

impl Inventory {
    /// Create an empty inventory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an inventory from `(name, count)` pairs.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, u32)>) -> Self {
        let mut inventory = Self::new();
        for (name, count) in pairs {
            inventory.add(name, count);
        }
        inventory
    }

    /// Count held for `name` (zero when absent).
    pub fn get(&self, name: &str) -> u32 {
        self.items.get(name).copied().unwrap_or(0)
    }

    /// True if at least one unit of `name` is held.
    pub fn has(&self, name: &str) -> bool {
        self.get(name) > 0
    }

    /// Overwrite the count for `name`.
    pub fn set(&mut self, name: &str, count: u32) {
        if count == 0 {
            self.items.remove(name);
        } else {
            self.items.insert(name.to_string(), count);
        }
    }

    /// Add `count` units of `name`.
    pub fn add(&mut self, name: &str, count: u32) {
        let current = self.get(name);
        self.set(name, current.saturating_add(count));
    }

    /// Remove up to `count` units of `name`, returning how many were removed.
    pub fn remove(&mut self, name: &str, count: u32) -> u32 {
        let current = self.get(name);
        let removed = current.min(count);
        self.set(name, current - removed);
        removed
    }

    /// Take up to `amount` units spread over `names`, first item with stock
    /// first. Returns the number of units taken.
    pub fn take_greedy<S: AsRef<str>>(&mut self, names: &[S], amount: u32) -> u32 {
        let mut taken = 0;
        for name in names {
            if taken >= amount {
                break;
            }
            taken += self.remove(name.as_ref(), amount - taken);
        }
        taken
    }

    /// Total units held across `names`.
    pub fn total_of<S: AsRef<str>>(&self, names: &[S]) -> u32 {
        names
            .iter()
            .map(|n| self.get(n.as_ref()))
            .fold(0u32, u32::saturating_add)
    }

    /// True if any of `names` is held.
    pub fn contains_any<S: AsRef<str>>(&self, names: &[S]) -> bool {
        names.iter().any(|n| self.has(n.as_ref()))
    }

    /// Iterate over held items.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.items.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Names of all held items.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.items.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl FromIterator<(String, u32)> for Inventory {
    fn from_iter<I: IntoIterator<Item = (String, u32)>>(iter: I) -> Self {
        let mut inventory = Self::new();
        for (name, count) in iter {
            inventory.add(&name, count);
        }
        inventory
    }
}
