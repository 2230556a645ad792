//! # Builder Module
//!
//! [`ModelBuilder`] turns a [`Model`]'s declarations into a normalized
//! [`ModelDefinition`]. Buckets are seeded from the model's class-level
//! [`crate::Statics`] when the builder is created and filled from its
//! [`crate::Schema`] the first time options are generated.

// ============================================================================
// External Crate Imports
// ============================================================================

use std::mem;

use log::{debug, trace, warn};

// ============================================================================
// Internal Crate Imports
// ============================================================================

use crate::{
    config::{Settings, UnresolvedTypes},
    definition::ModelDefinition,
    extension::Extension,
    hooks::OrmModel,
    merge::merge_indexes,
    model::{Member, Model, Schema, Statics},
    types::{DataTypes, TypeRef, TypeRegistry},
    Error,
};

// ============================================================================
// ModelBuilder Struct
// ============================================================================

/// Assembles the definition of one model.
///
/// The pipeline runs at most once: the first call to
/// [`generate_options`](Self::generate_options) (directly or through any operation
/// that needs partitioned fields) fixes the definition, later calls are no-ops.
pub struct ModelBuilder {
    name: &'static str,
    settings: Settings,
    /// Declared members not yet sorted into buckets.
    pending: Vec<(String, Member)>,
    extensions: Vec<Extension>,
    definition: ModelDefinition,
    generated: bool,
}

impl ModelBuilder {
    /// Creates a builder for `M` with default settings.
    pub fn new<M: Model>() -> Self {
        Self::with_settings::<M>(Settings::default())
    }

    /// Creates a builder for `M`.
    ///
    /// The model's class-level declarations are copied into the definition's buckets
    /// here; buckets the model does not declare start empty.
    pub fn with_settings<M: Model>(settings: Settings) -> Self {
        let name = M::model_name();
        let mut schema = Schema::new();
        M::schema(&mut schema);

        let mut builder = Self {
            name,
            settings,
            pending: schema.into_members(),
            extensions: M::extensions(),
            definition: ModelDefinition::new(name),
            generated: false,
        };
        builder.reclaim_statics::<M>();

        debug!(
            "Created builder for `{}` ({} members, {} extensions)",
            name,
            builder.pending.len(),
            builder.extensions.len()
        );
        builder
    }

    fn reclaim_statics<M: Model>(&mut self) {
        let mut statics = Statics::new();
        M::statics(&mut statics);

        self.definition.validators = statics.validators;
        self.definition.hooks = statics.hooks;
        self.definition.indexes = statics.indexes;
        self.definition.scopes = statics.scopes;
        if let Some(scope) = statics.default_scope {
            self.definition.default_scope = scope;
        }
        self.definition.options = statics.options;
    }

    /// The model name reported by [`Model::model_name`].
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Settings controlling type resolution and index merging.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Whether [`generate_options`](Self::generate_options) has already run.
    pub fn is_generated(&self) -> bool {
        self.generated
    }

    /// Extensions in declaration order, lowest priority first.
    pub fn extensions(&self) -> &[Extension] {
        &self.extensions
    }

    /// The definition in its current state. Fields are empty until options are generated.
    pub fn definition(&self) -> &ModelDefinition {
        &self.definition
    }

    // ========================================================================
    // Partitioning
    // ========================================================================

    /// Sorts declared members into buckets and merges extensions. Runs once.
    pub fn generate_options(&mut self) {
        if self.generated {
            trace!("Options for `{}` already generated", self.name);
            return;
        }

        self.partition();
        self.run_extensions();
        self.generated = true;

        for name in self.definition.name_collisions() {
            warn!("`{}` declares `{}` both as a field and as a method or accessor", self.name, name);
        }
        debug!("Generated options for `{}`: {} fields", self.name, self.definition.fields.len());
    }

    fn partition(&mut self) {
        for (name, member) in self.pending.drain(..) {
            match member {
                Member::Field(field) => {
                    self.definition.fields.insert(name, field);
                }
                Member::InstanceMethod(method) => {
                    self.definition.instance_methods.insert(name, method);
                }
                Member::ClassMethod(method) => {
                    self.definition.class_methods.insert(name, method);
                }
                Member::Getter(get) => {
                    self.definition.getter_methods.insert(name, get);
                }
                Member::Setter(set) => {
                    self.definition.setter_methods.insert(name, set);
                }
                Member::Accessor { get, set } => {
                    self.definition.getter_methods.insert(name.clone(), get);
                    self.definition.setter_methods.insert(name, set);
                }
            }
        }
    }

    /// Merges every extension underneath the model's own buckets.
    ///
    /// The first declared extension has the lowest priority; the model's own
    /// declarations are applied last. The index policy applies even without extensions.
    fn run_extensions(&mut self) {
        if self.extensions.is_empty() {
            let own = mem::take(&mut self.definition.indexes);
            merge_indexes(&mut self.definition.indexes, own, self.settings.index_merge);
            return;
        }

        let mut own = mem::replace(&mut self.definition, ModelDefinition::new(self.name));
        self.definition.options = mem::take(&mut own.options);

        for extension in &self.extensions {
            trace!("Merging extension `{}` into `{}`", extension.name(), self.name);
            self.definition.absorb(extension.definition().clone(), self.settings.index_merge);
        }
        self.definition.absorb(own, self.settings.index_merge);
    }

    // ========================================================================
    // Type Resolution
    // ========================================================================

    /// Replaces every field's type key with the registry's concrete type.
    ///
    /// Bare fields are replaced whole; options-form fields only have their type
    /// overwritten. Fields already resolved are left alone. Under
    /// [`UnresolvedTypes::Reject`] an unknown key fails the call and no field is changed.
    pub fn declare_types(&mut self, data_types: &dyn DataTypes) -> Result<(), Error> {
        self.generate_options();

        let mut resolved = Vec::with_capacity(self.definition.fields.len());
        for (field, definition) in &self.definition.fields {
            let TypeRef::Named(key) = definition.type_ref() else {
                continue;
            };

            match data_types.resolve(key) {
                Some(data_type) => resolved.push((field.clone(), TypeRef::Resolved(data_type))),
                None => match self.settings.unresolved_types {
                    UnresolvedTypes::Reject => {
                        return Err(Error::UnresolvedType {
                            model: self.name.to_string(),
                            field: field.clone(),
                            key: key.clone(),
                        });
                    }
                    UnresolvedTypes::PassThrough => {
                        warn!("Field `{}` of `{}` references unknown type `{}`", field, self.name, key);
                        resolved.push((field.clone(), TypeRef::Unresolved(key.clone())));
                    }
                },
            }
        }

        for (field, ty) in resolved {
            if let Some(definition) = self.definition.fields.get_mut(&field) {
                *definition.type_ref_mut() = ty;
            }
        }
        debug!("Declared types for `{}`", self.name);
        Ok(())
    }

    /// [`declare_types`](Self::declare_types) against [`TypeRegistry::builtin`].
    pub fn declare_builtin_types(&mut self) -> Result<(), Error> {
        self.declare_types(&TypeRegistry::builtin())
    }

    // ========================================================================
    // Hooks
    // ========================================================================

    /// Registers every collected hook on the ORM-side model, in declaration order.
    ///
    /// Fails with [`Error::PrematureInvocation`] before the ORM has defined the model;
    /// nothing is registered in that case.
    pub fn declare_hooks<O>(&mut self, model: &mut O) -> Result<(), Error>
    where
        O: OrmModel + ?Sized,
    {
        self.generate_options();

        let registry = model
            .hook_registry()
            .ok_or_else(|| Error::PrematureInvocation { model: self.name.to_string() })?;

        for (name, hook) in &self.definition.hooks {
            trace!("Registering hook `{}` on `{}` for {}", name, self.name, hook.action);
            registry.add_hook(hook.action, name, hook.handler.clone());
        }
        Ok(())
    }

    /// Finishes the pipeline and hands over the definition.
    pub fn into_definition(mut self) -> ModelDefinition {
        self.generate_options();
        self.definition
    }
}
