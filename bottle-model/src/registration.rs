use log::debug;

use crate::{
    builder::ModelBuilder,
    config::Settings,
    definition::ModelDefinition,
    model::Model,
    types::DataTypes,
    Error,
};

/// The callable an ORM invokes at define time: `(orm, data_types)`.
///
/// Running it resolves the model's field types against the supplied registry.
pub type RegisterFn<'a, O> = Box<dyn FnMut(&O, &dyn DataTypes) -> Result<(), Error> + 'a>;

impl ModelBuilder {
    /// Returns the registration callable for this model.
    ///
    /// The builder never calls the ORM's define entry point itself; the framework
    /// invokes the returned closure when it is ready to accept the definition.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let mut builder = User::builder();
    /// let mut register = builder.export_model::<MyOrm>();
    /// register(&orm, &TypeRegistry::builtin())?;
    /// ```
    pub fn export_model<'a, O: ?Sized + 'a>(&'a mut self) -> RegisterFn<'a, O> {
        Box::new(move |_orm: &O, data_types: &dyn DataTypes| self.declare_types(data_types))
    }
}

/// Collects several models and runs their registration callables in order.
///
/// # Example
///
/// ```rust,ignore
/// let definitions = Registrar::new()
///     .register::<User>()
///     .register::<Post>()
///     .run(&orm, &TypeRegistry::builtin())?;
///
/// for definition in definitions {
///     orm.define(definition);
/// }
/// ```
pub struct Registrar {
    settings: Settings,
    builders: Vec<ModelBuilder>,
}

impl Registrar {
    /// Creates an empty registrar with default settings.
    pub fn new() -> Self {
        Self::with_settings(Settings::default())
    }

    /// Every model registered afterwards is built with `settings`.
    pub fn with_settings(settings: Settings) -> Self {
        Self { settings, builders: Vec::new() }
    }

    /// Queues `M`. Its builder is created immediately, so class-level declarations are copied here.
    pub fn register<M: Model>(mut self) -> Self {
        self.builders.push(ModelBuilder::with_settings::<M>(self.settings));
        self
    }

    /// Number of queued models.
    pub fn len(&self) -> usize {
        self.builders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.builders.is_empty()
    }

    /// Resolves every registered model against `data_types` and returns the
    /// definitions in registration order. Stops at the first failing model.
    pub fn run<O: ?Sized>(mut self, orm: &O, data_types: &dyn DataTypes) -> Result<Vec<ModelDefinition>, Error> {
        for builder in &mut self.builders {
            debug!("Registering `{}`", builder.name());
            let mut register = builder.export_model::<O>();
            register(orm, data_types)?;
        }

        Ok(self.builders.into_iter().map(ModelBuilder::into_definition).collect())
    }
}

impl Default for Registrar {
    fn default() -> Self {
        Self::new()
    }
}
