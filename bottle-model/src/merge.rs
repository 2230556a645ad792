//! # Merge Module
//!
//! Per-bucket merge rules used when extensions are folded into a model.
//! Every function merges `source` into `target`, with `source` winning on conflicts.

use indexmap::IndexMap;
use serde_json::Value;

use crate::{
    config::IndexMerge,
    definition::ModelDefinition,
    field::FieldDefinition,
    index::IndexSpec,
};

/// Key override: entries from `source` replace same-named entries in `target`.
///
/// A replaced key keeps its original position.
pub fn override_keys<V>(target: &mut IndexMap<String, V>, source: IndexMap<String, V>) {
    for (key, value) in source {
        target.insert(key, value);
    }
}

/// Recursive JSON merge. Objects merge key by key; anything else is replaced.
pub fn deep_merge(target: &mut Value, source: Value) {
    match (target, source) {
        (Value::Object(target), Value::Object(source)) => {
            for (key, value) in source {
                match target.get_mut(&key) {
                    Some(existing) => deep_merge(existing, value),
                    None => {
                        target.insert(key, value);
                    }
                }
            }
        }
        (target, source) => *target = source,
    }
}

/// Merges one field declaration over another.
///
/// Two options-form declarations combine their options and take the later type;
/// any other pairing is a plain replacement.
pub fn merge_field(target: &mut FieldDefinition, source: FieldDefinition) {
    match (target, source) {
        (FieldDefinition::Options(target), FieldDefinition::Options(source)) => {
            target.ty = source.ty;
            for (key, value) in source.options {
                match target.options.get_mut(&key) {
                    Some(existing) => deep_merge(existing, value),
                    None => {
                        target.options.insert(key, value);
                    }
                }
            }
        }
        (target, source) => *target = source,
    }
}

pub fn merge_fields(target: &mut IndexMap<String, FieldDefinition>, source: IndexMap<String, FieldDefinition>) {
    for (name, field) in source {
        match target.get_mut(&name) {
            Some(existing) => merge_field(existing, field),
            None => {
                target.insert(name, field);
            }
        }
    }
}

pub fn merge_scopes(target: &mut IndexMap<String, Value>, source: IndexMap<String, Value>) {
    for (name, scope) in source {
        match target.get_mut(&name) {
            Some(existing) => deep_merge(existing, scope),
            None => {
                target.insert(name, scope);
            }
        }
    }
}

/// Appends `source` after `target`, dropping exact duplicates under [`IndexMerge::DedupIdentical`].
pub fn merge_indexes(target: &mut Vec<IndexSpec>, source: Vec<IndexSpec>, policy: IndexMerge) {
    for index in source {
        if policy == IndexMerge::DedupIdentical && target.contains(&index) {
            continue;
        }
        target.push(index);
    }
}

impl ModelDefinition {
    /// Folds every bucket of `source` into this definition, `source` taking precedence.
    ///
    /// The name and model options are left alone.
    pub fn absorb(&mut self, source: ModelDefinition, indexes: IndexMerge) {
        merge_fields(&mut self.fields, source.fields);
        override_keys(&mut self.validators, source.validators);
        merge_indexes(&mut self.indexes, source.indexes, indexes);
        override_keys(&mut self.class_methods, source.class_methods);
        override_keys(&mut self.instance_methods, source.instance_methods);
        override_keys(&mut self.hooks, source.hooks);
        override_keys(&mut self.getter_methods, source.getter_methods);
        override_keys(&mut self.setter_methods, source.setter_methods);
        deep_merge(&mut self.default_scope, source.default_scope);
        merge_scopes(&mut self.scopes, source.scopes);
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{field::Field, types::TypeRef};

    #[test]
    fn deep_merge_combines_nested_objects() {
        let mut target = json!({ "where": { "active": true, "role": "user" }, "limit": 10 });
        deep_merge(&mut target, json!({ "where": { "role": "admin" }, "order": [["id", "ASC"]] }));
        assert_eq!(
            target,
            json!({ "where": { "active": true, "role": "admin" }, "limit": 10, "order": [["id", "ASC"]] })
        );
    }

    #[test]
    fn deep_merge_replaces_arrays() {
        let mut target = json!({ "attributes": ["id", "name"] });
        deep_merge(&mut target, json!({ "attributes": ["email"] }));
        assert_eq!(target, json!({ "attributes": ["email"] }));
    }

    #[test]
    fn options_fields_merge_and_later_type_wins() {
        let mut target = FieldDefinition::from(Field::new("STRING").allow_null(true).comment("name"));
        merge_field(&mut target, Field::new("TEXT").allow_null(false).into());

        let FieldDefinition::Options(field) = target else { panic!("expected options form") };
        assert_eq!(field.ty, TypeRef::from("TEXT"));
        assert_eq!(field.options.get("allowNull"), Some(&json!(false)));
        assert_eq!(field.options.get("comment"), Some(&json!("name")));
    }

    #[test]
    fn bare_type_replaces_options_field() {
        let mut target = FieldDefinition::from(Field::new("STRING").unique());
        merge_field(&mut target, "INTEGER".into());
        assert_eq!(target, FieldDefinition::from("INTEGER"));
    }

    #[test]
    fn override_keeps_first_position() {
        let mut target: IndexMap<String, i32> = [("a".to_string(), 1), ("b".to_string(), 2)].into_iter().collect();
        override_keys(&mut target, [("a".to_string(), 10), ("c".to_string(), 3)].into_iter().collect());
        assert_eq!(target.into_iter().collect::<Vec<_>>(), vec![
            ("a".to_string(), 10),
            ("b".to_string(), 2),
            ("c".to_string(), 3)
        ]);
    }

    #[test]
    fn index_dedup_only_drops_identical_specs() {
        let mut target = vec![IndexSpec::new(["email"]).unique()];
        let source = vec![IndexSpec::new(["email"]).unique(), IndexSpec::new(["email"])];

        let mut concatenated = target.clone();
        merge_indexes(&mut concatenated, source.clone(), IndexMerge::Concatenate);
        assert_eq!(concatenated.len(), 3);

        merge_indexes(&mut target, source, IndexMerge::DedupIdentical);
        assert_eq!(target, vec![IndexSpec::new(["email"]).unique(), IndexSpec::new(["email"])]);
    }
}
