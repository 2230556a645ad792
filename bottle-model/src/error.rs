use thiserror::Error;

/// Errors raised while assembling or registering a model definition.
#[derive(Debug, Error)]
pub enum Error {
    /// Hooks were declared before the ORM-side model existed.
    #[error("declare_hooks called on `{model}` before the model was registered with the ORM")]
    PrematureInvocation { model: String },

    /// A field references a type key the registry does not know.
    #[error("field `{field}` of `{model}` references unknown type `{key}`")]
    UnresolvedType { model: String, field: String, key: String },

    /// A hook action name did not match any lifecycle event.
    #[error("unknown hook action `{0}`")]
    UnknownHookAction(String),

    /// Settings could not be parsed.
    #[error("invalid settings: {0}")]
    Config(String),
}
