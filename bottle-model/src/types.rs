//! # Data Types
//!
//! Type keys declared on fields (`"STRING"`, `"INTEGER"`, ...) are placeholders until
//! they are resolved against a [`DataTypes`] registry. [`TypeRegistry::builtin`] ships
//! the ORM's standard set; any `HashMap<String, DataType>` works as a registry too.

use std::{
    collections::HashMap,
    fmt::{self, Display},
};

use serde::{Deserialize, Serialize};

/// A concrete column type provided by a type registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DataType {
    /// The registry key this type is published under.
    pub key: String,
    /// The SQL rendering of the type (e.g. "VARCHAR(255)").
    pub sql_type: String,
}

impl DataType {
    pub fn new(key: impl Into<String>, sql_type: impl Into<String>) -> Self {
        Self { key: key.into(), sql_type: sql_type.into() }
    }
}

impl Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql_type)
    }
}

/// The type of a field, before or after resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    /// A type key waiting to be looked up.
    Named(String),
    /// A concrete type from the registry.
    Resolved(DataType),
    /// A key the registry did not know, kept when resolution runs in pass-through mode.
    Unresolved(String),
}

impl TypeRef {
    /// Returns the registry key this reference was declared with.
    pub fn key(&self) -> &str {
        match self {
            TypeRef::Named(key) | TypeRef::Unresolved(key) => key,
            TypeRef::Resolved(data_type) => &data_type.key,
        }
    }

    /// Whether a registry lookup has succeeded for this reference.
    pub fn is_resolved(&self) -> bool {
        matches!(self, TypeRef::Resolved(_))
    }

    pub fn resolved(&self) -> Option<&DataType> {
        match self {
            TypeRef::Resolved(data_type) => Some(data_type),
            _ => None,
        }
    }
}

impl From<&str> for TypeRef {
    fn from(key: &str) -> Self {
        TypeRef::Named(key.to_string())
    }
}

impl From<String> for TypeRef {
    fn from(key: String) -> Self {
        TypeRef::Named(key)
    }
}

impl From<DataType> for TypeRef {
    fn from(data_type: DataType) -> Self {
        TypeRef::Resolved(data_type)
    }
}

/// A lookup table from type key to concrete type.
pub trait DataTypes {
    /// Returns the type registered under `key`, if any.
    fn lookup(&self, key: &str) -> Option<DataType>;

    /// Looks up `key`, falling back to its base type for keys that carry a length
    /// such as `STRING(50)` or `DECIMAL(10, 2)`. The base type's own length, if any,
    /// is replaced: `STRING(50)` resolves to `VARCHAR(50)`.
    fn resolve(&self, key: &str) -> Option<DataType> {
        if let Some(data_type) = self.lookup(key) {
            return Some(data_type);
        }

        let (base, length) = split_length(key)?;
        let base_type = self.lookup(base)?;
        let sql_type = base_type.sql_type.split_once('(').map_or(base_type.sql_type.as_str(), |(head, _)| head);
        Some(DataType::new(key, format!("{}({})", sql_type.trim_end(), length)))
    }
}

/// Splits `STRING(50)` into `("STRING", "50")`.
fn split_length(key: &str) -> Option<(&str, &str)> {
    let (base, rest) = key.split_once('(')?;
    let length = rest.strip_suffix(')')?.trim();
    let base = base.trim_end();
    (!base.is_empty() && !length.is_empty()).then_some((base, length))
}

impl DataTypes for HashMap<String, DataType> {
    fn lookup(&self, key: &str) -> Option<DataType> {
        self.get(key).cloned()
    }
}

/// A named collection of data types.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypeRegistry {
    types: HashMap<String, DataType>,
}

macro_rules! builtin_types {
    ($($key:ident => $sql:expr),* $(,)?) => {
        /// Type keys published by [`TypeRegistry::builtin`].
        pub const BUILTIN_KEYS: &[&str] = &[$(stringify!($key)),*];

        impl TypeRegistry {
            /// Returns the ORM's standard data types.
            pub fn builtin() -> Self {
                let mut registry = Self::new();
                $(
                    registry.insert(DataType::new(stringify!($key), $sql));
                )*
                registry
            }
        }
    };
}

builtin_types!(
    STRING => "VARCHAR(255)",
    CHAR => "CHAR(255)",
    TEXT => "TEXT",
    INTEGER => "INTEGER",
    BIGINT => "BIGINT",
    SMALLINT => "SMALLINT",
    FLOAT => "FLOAT",
    REAL => "REAL",
    DOUBLE => "DOUBLE PRECISION",
    DECIMAL => "DECIMAL",
    BOOLEAN => "BOOLEAN",
    DATE => "TIMESTAMP WITH TIME ZONE",
    DATEONLY => "DATE",
    TIME => "TIME",
    UUID => "UUID",
    JSON => "JSON",
    JSONB => "JSONB",
    BLOB => "BLOB",
);

impl TypeRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self { types: HashMap::new() }
    }

    /// Adds a type, replacing any previous entry with the same key.
    pub fn insert(&mut self, data_type: DataType) -> Option<DataType> {
        self.types.insert(data_type.key.clone(), data_type)
    }

    /// Builder-style variant of [`TypeRegistry::insert`].
    pub fn with(mut self, key: impl Into<String>, sql_type: impl Into<String>) -> Self {
        self.insert(DataType::new(key, sql_type));
        self
    }

    /// Returns the type registered under exactly `key`.
    pub fn get(&self, key: &str) -> Option<&DataType> {
        self.types.get(key)
    }

    /// Whether `key` is registered.
    pub fn contains(&self, key: &str) -> bool {
        self.types.contains_key(key)
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl DataTypes for TypeRegistry {
    fn lookup(&self, key: &str) -> Option<DataType> {
        self.get(key).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_registry_covers_every_key() {
        let registry = TypeRegistry::builtin();
        assert_eq!(registry.len(), BUILTIN_KEYS.len());
        for key in BUILTIN_KEYS {
            assert_eq!(registry.lookup(key).map(|t| t.key), Some(key.to_string()));
        }
        assert_eq!(registry.get("STRING").map(|t| t.sql_type.as_str()), Some("VARCHAR(255)"));
    }

    #[test]
    fn custom_types_override_builtin_ones() {
        let registry = TypeRegistry::builtin().with("STRING", "CITEXT").with("MONEY", "NUMERIC(12, 2)");
        assert_eq!(registry.get("STRING").map(|t| t.to_string()), Some("CITEXT".to_string()));
        assert!(registry.contains("MONEY"));
        assert!(registry.lookup("GEOMETRY").is_none());
    }

    #[test]
    fn sized_keys_resolve_through_their_base_type() {
        let registry = TypeRegistry::builtin();
        assert_eq!(registry.resolve("STRING(50)"), Some(DataType::new("STRING(50)", "VARCHAR(50)")));
        assert_eq!(registry.resolve("DECIMAL(10, 2)").map(|t| t.sql_type), Some("DECIMAL(10, 2)".to_string()));
        assert_eq!(registry.resolve("STRING").map(|t| t.sql_type), Some("VARCHAR(255)".to_string()));
        assert!(registry.resolve("GEOMETRY(4326)").is_none());
        assert!(registry.resolve("STRING(").is_none());
        assert!(registry.resolve("(50)").is_none());
    }

    #[test]
    fn exact_entries_win_over_sized_fallback() {
        let registry = TypeRegistry::builtin().with("STRING(64)", "CHAR(64)");
        assert_eq!(registry.resolve("STRING(64)").map(|t| t.sql_type), Some("CHAR(64)".to_string()));
    }

    #[test]
    fn type_ref_reports_declared_key() {
        assert_eq!(TypeRef::from("INTEGER").key(), "INTEGER");
        let resolved = TypeRef::from(DataType::new("UUID", "UUID"));
        assert!(resolved.is_resolved());
        assert_eq!(resolved.key(), "UUID");
        assert!(TypeRef::Unresolved("NOPE".into()).resolved().is_none());
    }
}
