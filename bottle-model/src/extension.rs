use crate::{builder::ModelBuilder, config::Settings, definition::ModelDefinition, model::Model};

/// A mixin whose buckets are merged underneath a model's own declarations.
///
/// Any [`Model`] can act as an extension. Its definition is built (fields partitioned,
/// its own extensions merged) but never registered with the ORM.
///
/// Extensions that list each other recurse without bound.
#[derive(Debug, Clone)]
pub struct Extension {
    definition: ModelDefinition,
}

impl Extension {
    /// Builds the definition of `M` for use as an extension, with default settings.
    ///
    /// The settings of the builder that later absorbs this extension do not reach
    /// the extension's own merge; use [`Extension::of_with_settings`] to choose them.
    pub fn of<M: Model>() -> Self {
        Self::of_with_settings::<M>(Settings::default())
    }

    /// Builds the definition of `M` for use as an extension under `settings`.
    pub fn of_with_settings<M: Model>(settings: Settings) -> Self {
        Self { definition: ModelBuilder::with_settings::<M>(settings).into_definition() }
    }

    /// Wraps an already assembled definition.
    pub fn from_definition(definition: ModelDefinition) -> Self {
        Self { definition }
    }

    /// The extension's model name.
    pub fn name(&self) -> &str {
        &self.definition.name
    }

    /// The built definition merged into models that list this extension.
    pub fn definition(&self) -> &ModelDefinition {
        &self.definition
    }
}
