use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    builder::ModelBuilder,
    definition::{ClassMethod, Getter, InstanceMethod, Row, Scope, Setter, Validator},
    extension::Extension,
    field::FieldDefinition,
    hooks::{Hook, HookAction},
    index::IndexSpec,
};

/// Model-level options forwarded to the ORM's define call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamps: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paranoid: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub underscored: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub freeze_table_name: Option<bool>,
}

/// A declared member of a model.
///
/// The variant decides which bucket the member lands in when the builder
/// partitions the schema.
#[derive(Clone)]
pub enum Member {
    /// A column declaration.
    Field(FieldDefinition),
    /// A method called on a row.
    InstanceMethod(InstanceMethod),
    /// A method called on the model itself.
    ClassMethod(ClassMethod),
    /// A computed property read.
    Getter(Getter),
    /// A computed property write.
    Setter(Setter),
    /// A getter and setter pair for the same property.
    Accessor { get: Getter, set: Setter },
}

/// Instance-level declarations: fields, methods and accessors, in declaration order.
#[derive(Clone, Default)]
pub struct Schema {
    members: Vec<(String, Member)>,
}

impl Schema {
    pub fn new() -> Self {
        Self { members: Vec::new() }
    }

    /// Declares a member of any kind.
    pub fn member(&mut self, name: impl Into<String>, member: Member) -> &mut Self {
        self.members.push((name.into(), member));
        self
    }

    /// Declares a column. Accepts a type key (`"STRING"`) or a [`crate::Field`].
    pub fn field(&mut self, name: impl Into<String>, definition: impl Into<FieldDefinition>) -> &mut Self {
        self.member(name, Member::Field(definition.into()))
    }

    /// Declares a method that receives the row and call arguments.
    pub fn instance_method<F>(&mut self, name: impl Into<String>, method: F) -> &mut Self
    where
        F: Fn(&Row, &[Value]) -> Value + Send + Sync + 'static,
    {
        self.member(name, Member::InstanceMethod(Arc::new(method)))
    }

    /// Declares a method that receives only call arguments.
    pub fn class_method<F>(&mut self, name: impl Into<String>, method: F) -> &mut Self
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        self.member(name, Member::ClassMethod(Arc::new(method)))
    }

    /// Declares a computed property read from the row.
    pub fn getter<F>(&mut self, name: impl Into<String>, get: F) -> &mut Self
    where
        F: Fn(&Row) -> Value + Send + Sync + 'static,
    {
        self.member(name, Member::Getter(Arc::new(get)))
    }

    /// Declares a computed property written into the row.
    pub fn setter<F>(&mut self, name: impl Into<String>, set: F) -> &mut Self
    where
        F: Fn(&mut Row, Value) + Send + Sync + 'static,
    {
        self.member(name, Member::Setter(Arc::new(set)))
    }

    /// Declares a getter and a setter under one name.
    pub fn accessor<G, S>(&mut self, name: impl Into<String>, get: G, set: S) -> &mut Self
    where
        G: Fn(&Row) -> Value + Send + Sync + 'static,
        S: Fn(&mut Row, Value) + Send + Sync + 'static,
    {
        self.member(name, Member::Accessor { get: Arc::new(get), set: Arc::new(set) })
    }

    /// Members in declaration order.
    pub fn members(&self) -> &[(String, Member)] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub(crate) fn into_members(self) -> Vec<(String, Member)> {
        self.members
    }
}

/// Class-level declarations: validators, hooks, scopes and indexes.
///
/// A fresh record is produced for every builder and copied into its buckets.
#[derive(Clone, Default)]
pub struct Statics {
    pub(crate) validators: IndexMap<String, Validator>,
    pub(crate) hooks: IndexMap<String, Hook>,
    pub(crate) indexes: Vec<IndexSpec>,
    pub(crate) scopes: IndexMap<String, Scope>,
    pub(crate) default_scope: Option<Scope>,
    pub(crate) options: ModelOptions,
}

impl Statics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn validate<F>(&mut self, name: impl Into<String>, validator: F) -> &mut Self
    where
        F: Fn(&Row) -> Result<(), String> + Send + Sync + 'static,
    {
        self.validators.insert(name.into(), Arc::new(validator));
        self
    }

    pub fn hook<F>(&mut self, name: impl Into<String>, action: HookAction, handler: F) -> &mut Self
    where
        F: Fn(&mut Row) -> Result<(), String> + Send + Sync + 'static,
    {
        self.hooks.insert(name.into(), Hook::new(action, handler));
        self
    }

    pub fn index(&mut self, index: IndexSpec) -> &mut Self {
        self.indexes.push(index);
        self
    }

    pub fn scope(&mut self, name: impl Into<String>, scope: Scope) -> &mut Self {
        self.scopes.insert(name.into(), scope);
        self
    }

    pub fn default_scope(&mut self, scope: Scope) -> &mut Self {
        self.default_scope = Some(scope);
        self
    }

    pub fn options(&mut self, options: ModelOptions) -> &mut Self {
        self.options = options;
        self
    }

    pub fn table_name(&mut self, table: impl Into<String>) -> &mut Self {
        self.options.table_name = Some(table.into());
        self
    }

    pub fn timestamps(&mut self, enabled: bool) -> &mut Self {
        self.options.timestamps = Some(enabled);
        self
    }

    pub fn paranoid(&mut self, enabled: bool) -> &mut Self {
        self.options.paranoid = Some(enabled);
        self
    }

    pub fn underscored(&mut self, enabled: bool) -> &mut Self {
        self.options.underscored = Some(enabled);
        self
    }
}

/// A declarable table model.
///
/// Usually implemented through `#[derive(Model)]`; a hand-written impl only needs
/// `model_name` and `schema`.
///
/// # Example
///
/// ```rust,ignore
/// struct Post;
///
/// impl Model for Post {
///     fn model_name() -> &'static str { "Post" }
///
///     fn schema(schema: &mut Schema) {
///         schema
///             .field("title", Field::new("STRING").allow_null(false))
///             .field("body", "TEXT")
///             .getter("excerpt", |row| row["body"].clone());
///     }
///
///     fn statics(statics: &mut Statics) {
///         statics.index(IndexSpec::new(["title"]).unique());
///     }
/// }
/// ```
pub trait Model {
    /// The name the model is registered under.
    fn model_name() -> &'static str;

    /// Declares fields, methods and accessors.
    fn schema(schema: &mut Schema);

    /// Declares validators, hooks, indexes, scopes and model options.
    fn statics(_statics: &mut Statics) {}

    /// Mixins merged underneath this model's own declarations, lowest priority first.
    fn extensions() -> Vec<Extension> {
        Vec::new()
    }

    fn builder() -> ModelBuilder
    where
        Self: Sized,
    {
        ModelBuilder::new::<Self>()
    }
}
