use serde::{Deserialize, Serialize};

use crate::Error;

/// What type resolution does with a key the registry does not know.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnresolvedTypes {
    /// Fail with [`Error::UnresolvedType`] and leave every field untouched.
    #[default]
    Reject,
    /// Keep the field as [`crate::TypeRef::Unresolved`] and log a warning.
    PassThrough,
}

/// How index lists from extensions and the model itself are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexMerge {
    /// Extensions first, in declaration order, then the model's own indexes.
    #[default]
    Concatenate,
    /// Same order, dropping any specification identical to an earlier one.
    DedupIdentical,
}

/// Builder settings.
///
/// # Example
///
/// ```rust,ignore
/// let settings = Settings::new()
///     .unresolved_types(UnresolvedTypes::PassThrough)
///     .index_merge(IndexMerge::DedupIdentical);
/// let builder = ModelBuilder::with_settings::<User>(settings);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub unresolved_types: UnresolvedTypes,
    pub index_merge: IndexMerge,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unresolved_types(mut self, policy: UnresolvedTypes) -> Self {
        self.unresolved_types = policy;
        self
    }

    pub fn index_merge(mut self, policy: IndexMerge) -> Self {
        self.index_merge = policy;
        self
    }

    /// Loads settings from JSON. Missing keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_reject_and_concatenate() {
        let settings = Settings::new();
        assert_eq!(settings.unresolved_types, UnresolvedTypes::Reject);
        assert_eq!(settings.index_merge, IndexMerge::Concatenate);
    }

    #[test]
    fn loads_partial_json() {
        let settings = Settings::from_json(r#"{ "unresolved_types": "pass_through" }"#).unwrap();
        assert_eq!(settings, Settings::new().unresolved_types(UnresolvedTypes::PassThrough));
    }

    #[test]
    fn rejects_unknown_policy() {
        let err = Settings::from_json(r#"{ "index_merge": "shuffle" }"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
