//! # Hooks
//!
//! Lifecycle hooks collected on a model and the ORM-side capability they are
//! registered with.

use std::{
    fmt::{self, Debug, Display},
    str::FromStr,
    sync::Arc,
};

use crate::{definition::Row, Error};

/// A hook body. Receives the row being processed and may veto the operation.
pub type HookFn = Arc<dyn Fn(&mut Row) -> Result<(), String> + Send + Sync>;

macro_rules! hook_actions {
    ($($variant:ident => $name:literal),* $(,)?) => {
        /// ORM lifecycle events a hook can be attached to.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum HookAction {
            $($variant),*
        }

        impl HookAction {
            pub const ALL: &'static [HookAction] = &[$(HookAction::$variant),*];

            /// The event name as the ORM spells it (e.g. `beforeCreate`).
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(HookAction::$variant => $name),*
                }
            }
        }

        impl FromStr for HookAction {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($name => Ok(HookAction::$variant),)*
                    _ => Err(Error::UnknownHookAction(s.to_string())),
                }
            }
        }
    };
}

hook_actions!(
    BeforeValidate => "beforeValidate",
    AfterValidate => "afterValidate",
    ValidationFailed => "validationFailed",
    BeforeCreate => "beforeCreate",
    AfterCreate => "afterCreate",
    BeforeDestroy => "beforeDestroy",
    AfterDestroy => "afterDestroy",
    BeforeRestore => "beforeRestore",
    AfterRestore => "afterRestore",
    BeforeUpdate => "beforeUpdate",
    AfterUpdate => "afterUpdate",
    BeforeSave => "beforeSave",
    AfterSave => "afterSave",
    BeforeUpsert => "beforeUpsert",
    AfterUpsert => "afterUpsert",
    BeforeBulkCreate => "beforeBulkCreate",
    AfterBulkCreate => "afterBulkCreate",
    BeforeBulkDestroy => "beforeBulkDestroy",
    AfterBulkDestroy => "afterBulkDestroy",
    BeforeBulkRestore => "beforeBulkRestore",
    AfterBulkRestore => "afterBulkRestore",
    BeforeBulkUpdate => "beforeBulkUpdate",
    AfterBulkUpdate => "afterBulkUpdate",
    BeforeFind => "beforeFind",
    AfterFind => "afterFind",
    BeforeCount => "beforeCount",
);

impl Display for HookAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named hook: the event it fires on and its body.
#[derive(Clone)]
pub struct Hook {
    pub action: HookAction,
    pub handler: HookFn,
}

impl Hook {
    pub fn new<F>(action: HookAction, handler: F) -> Self
    where
        F: Fn(&mut Row) -> Result<(), String> + Send + Sync + 'static,
    {
        Self { action, handler: Arc::new(handler) }
    }
}

impl Debug for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hook").field("action", &self.action).finish_non_exhaustive()
    }
}

/// The hook table of a model that has been registered with the ORM.
pub trait HookRegistry {
    fn add_hook(&mut self, action: HookAction, name: &str, handler: HookFn);
}

/// The ORM-side model object.
///
/// `hook_registry` returns `None` until the ORM has defined the model.
pub trait OrmModel {
    fn hook_registry(&mut self) -> Option<&mut dyn HookRegistry>;
}
