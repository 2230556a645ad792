//! # Model Definition
//!
//! The normalized, bucketed shape a model is reduced to before it is handed to the
//! ORM's define call.

use std::{
    fmt::{self, Debug},
    sync::Arc,
};

use heck::ToSnakeCase;
use indexmap::IndexMap;
use serde_json::{json, Map, Value};

use crate::{field::FieldDefinition, hooks::Hook, index::IndexSpec, model::ModelOptions};

/// The attribute values of one record, as seen by methods, accessors, validators and hooks.
pub type Row = Map<String, Value>;

/// A scope object (`where`, `attributes`, `include`, ...).
pub type Scope = Value;

pub type InstanceMethod = Arc<dyn Fn(&Row, &[Value]) -> Value + Send + Sync>;
pub type ClassMethod = Arc<dyn Fn(&[Value]) -> Value + Send + Sync>;
pub type Getter = Arc<dyn Fn(&Row) -> Value + Send + Sync>;
pub type Setter = Arc<dyn Fn(&mut Row, Value) + Send + Sync>;
pub type Validator = Arc<dyn Fn(&Row) -> Result<(), String> + Send + Sync>;

/// Every bucket of a model, keyed by member name.
#[derive(Clone)]
pub struct ModelDefinition {
    pub name: String,
    pub options: ModelOptions,
    pub fields: IndexMap<String, FieldDefinition>,
    pub instance_methods: IndexMap<String, InstanceMethod>,
    pub class_methods: IndexMap<String, ClassMethod>,
    pub getter_methods: IndexMap<String, Getter>,
    pub setter_methods: IndexMap<String, Setter>,
    pub validators: IndexMap<String, Validator>,
    pub hooks: IndexMap<String, Hook>,
    pub indexes: Vec<IndexSpec>,
    pub scopes: IndexMap<String, Scope>,
    pub default_scope: Scope,
}

impl ModelDefinition {
    /// Creates a definition with every bucket in its empty form.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: ModelOptions::default(),
            fields: IndexMap::new(),
            instance_methods: IndexMap::new(),
            class_methods: IndexMap::new(),
            getter_methods: IndexMap::new(),
            setter_methods: IndexMap::new(),
            validators: IndexMap::new(),
            hooks: IndexMap::new(),
            indexes: Vec::new(),
            scopes: IndexMap::new(),
            default_scope: Value::Object(Map::new()),
        }
    }

    /// Returns the table name: the explicit option, the model name when frozen, or the
    /// snake_case model name.
    pub fn table_name(&self) -> String {
        match (&self.options.table_name, self.options.freeze_table_name) {
            (Some(table), _) => table.clone(),
            (None, Some(true)) => self.name.clone(),
            _ => self.name.to_snake_case(),
        }
    }

    /// Field names in declaration order.
    pub fn attributes(&self) -> Vec<&str> {
        self.fields.keys().map(String::as_str).collect()
    }

    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.get(name)
    }

    /// Names that appear both as a field and as a method or accessor.
    pub fn name_collisions(&self) -> Vec<&str> {
        self.fields
            .keys()
            .filter(|name| {
                self.instance_methods.contains_key(*name)
                    || self.class_methods.contains_key(*name)
                    || self.getter_methods.contains_key(*name)
                    || self.setter_methods.contains_key(*name)
            })
            .map(String::as_str)
            .collect()
    }

    /// Summarizes the definition as JSON. Callables are listed by name.
    pub fn describe(&self) -> Value {
        let fields: Map<String, Value> =
            self.fields.iter().map(|(name, field)| (name.clone(), field.describe())).collect();
        let hooks: Map<String, Value> = self
            .hooks
            .iter()
            .map(|(name, hook)| (name.clone(), Value::String(hook.action.as_str().to_string())))
            .collect();
        let scopes: Map<String, Value> =
            self.scopes.iter().map(|(name, scope)| (name.clone(), scope.clone())).collect();

        json!({
            "name": self.name,
            "tableName": self.table_name(),
            "options": self.options,
            "fields": fields,
            "instanceMethods": names(&self.instance_methods),
            "classMethods": names(&self.class_methods),
            "getterMethods": names(&self.getter_methods),
            "setterMethods": names(&self.setter_methods),
            "validate": names(&self.validators),
            "hooks": hooks,
            "indexes": self.indexes,
            "scopes": scopes,
            "defaultScope": self.default_scope,
        })
    }
}

fn names<V>(bucket: &IndexMap<String, V>) -> Vec<&str> {
    bucket.keys().map(String::as_str).collect()
}

impl Debug for ModelDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelDefinition")
            .field("name", &self.name)
            .field("options", &self.options)
            .field("fields", &self.fields)
            .field("instance_methods", &names(&self.instance_methods))
            .field("class_methods", &names(&self.class_methods))
            .field("getter_methods", &names(&self.getter_methods))
            .field("setter_methods", &names(&self.setter_methods))
            .field("validators", &names(&self.validators))
            .field("hooks", &self.hooks)
            .field("indexes", &self.indexes)
            .field("scopes", &self.scopes)
            .field("default_scope", &self.default_scope)
            .finish()
    }
}
