//! Game data keyed by version.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::catalog;
use crate::data::GameData;
use crate::error::{CraftplanError, Result};

/// Registry of loaded game data, one entry per version.
#[derive(Debug, Clone, Default)]
pub struct DataRegistry {
    versions: BTreeMap<String, Arc<GameData>>,
    default_version: Option<String>,
}

impl DataRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding only the built-in catalog, which is also the default.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(catalog::overworld());
        registry
    }

    /// Add (or replace) data for its version. The first version registered
    /// becomes the default.
    pub fn register(&mut self, data: GameData) -> Arc<GameData> {
        let version = data.version().to_string();
        let data = Arc::new(data);
        if self.default_version.is_none() {
            self.default_version = Some(version.clone());
        }
        self.versions.insert(version, Arc::clone(&data));
        data
    }

    /// Make `version` the default used when a request names none.
    pub fn set_default(&mut self, version: &str) -> Result<()> {
        if !self.versions.contains_key(version) {
            return Err(CraftplanError::DataUnavailable {
                version: version.to_string(),
            });
        }
        self.default_version = Some(version.to_string());
        Ok(())
    }

    /// Look up data for `version`, or the default when `None`.
    ///
    /// A missing version is fatal for any build that needs it.
    pub fn resolve(&self, version: Option<&str>) -> Result<Arc<GameData>> {
        let version = match version.or(self.default_version.as_deref()) {
            Some(v) => v,
            None => {
                return Err(CraftplanError::DataUnavailable {
                    version: "<default>".to_string(),
                })
            }
        };
        self.versions
            .get(version)
            .cloned()
            .ok_or_else(|| CraftplanError::DataUnavailable {
                version: version.to_string(),
            })
    }

    /// Registered version names.
    pub fn versions(&self) -> Vec<String> {
        self.versions.keys().cloned().collect()
    }

    pub fn default_version(&self) -> Option<&str> {
        self.default_version.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_is_default() {
        let registry = DataRegistry::with_builtin();
        let data = registry.resolve(None).unwrap();
        assert_eq!(Some(data.version()), registry.default_version());
    }

    #[test]
    fn test_unknown_version_is_fatal() {
        let registry = DataRegistry::with_builtin();
        let err = registry.resolve(Some("0.0.1")).unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_empty_registry_has_no_default() {
        assert!(DataRegistry::new().resolve(None).is_err());
    }
}
