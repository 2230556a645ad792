//! # Bottle Model
//!
//! Declare a database table model once (fields, methods, accessors, validators,
//! hooks, indexes and scopes) and normalize it into the definition shape an ORM's
//! "define model" call expects.
//!
//! The pipeline is driven by [`ModelBuilder`]:
//!
//! 1. Construction copies the model's [`Statics`] declaration record into fresh buckets.
//! 2. [`ModelBuilder::generate_options`] partitions the declared [`Schema`] members into
//!    fields, methods and accessors, then merges every declared [`Extension`].
//! 3. [`ModelBuilder::declare_types`] resolves type keys such as `"STRING"` against a
//!    [`DataTypes`] registry.
//! 4. [`ModelBuilder::declare_hooks`] registers hooks on the ORM-side model once it exists.
//!
//! # Example
//!
//! ```rust,ignore
//! use bottle_model::{Field, Model, TypeRegistry};
//!
//! #[derive(Model)]
//! struct User {
//!     #[model(primary_key)]
//!     id: i64,
//!     username: String,
//!     age: Option<i32>,
//! }
//!
//! let mut builder = User::builder();
//! builder.declare_types(&TypeRegistry::builtin())?;
//! let definition = builder.into_definition();
//! ```

pub mod builder;
pub mod config;
pub mod definition;
pub mod error;
pub mod extension;
pub mod field;
pub mod hooks;
pub mod index;
pub mod merge;
pub mod model;
pub mod registration;
pub mod types;

pub use bottle_model_macro::Model;

pub use builder::ModelBuilder;
pub use config::{IndexMerge, Settings, UnresolvedTypes};
pub use definition::{ClassMethod, Getter, InstanceMethod, ModelDefinition, Row, Scope, Setter, Validator};
pub use error::Error;
pub use extension::Extension;
pub use field::{Field, FieldDefinition};
pub use hooks::{Hook, HookAction, HookFn, HookRegistry, OrmModel};
pub use index::IndexSpec;
pub use model::{Member, Model, ModelOptions, Schema, Statics};
pub use registration::{RegisterFn, Registrar};
pub use types::{DataType, DataTypes, TypeRef, TypeRegistry};
