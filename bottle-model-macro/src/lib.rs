//! # Bottle Model Macros
//!
//! Procedural macros for `bottle-model`.

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod derive_model;
mod types;

/// Derives `bottle_model::Model` for a struct with named fields.
///
/// Every field becomes a column whose type key is inferred from its Rust type;
/// `Option<T>` columns are declared with `allowNull: true`.
///
/// # Struct attributes
///
/// * `#[model(table = "users")]` - explicit table name (defaults to snake_case struct name).
/// * `#[model(members = path)]` - `fn(&mut Schema)` declaring methods and accessors.
/// * `#[model(statics = path)]` - `fn(&mut Statics)` declaring validators, hooks, indexes, scopes.
/// * `#[model(extensions(A, B))]` - models merged underneath this one, lowest priority first.
///
/// # Field attributes
///
/// * `primary_key`, `unique`, `auto_increment`
/// * `size = N` - column length, carried in the type key (`STRING(50)`)
/// * `type = "KEY"` - explicit type key
/// * `column = "name"` - database column name
/// * `skip` - not a column
///
/// # Example
///
/// ```rust,ignore
/// #[derive(Model)]
/// #[model(statics = user_statics, extensions(Timestamps))]
/// struct User {
///     #[model(primary_key, auto_increment)]
///     id: i64,
///     #[model(size = 50, unique)]
///     username: String,
///     age: Option<i32>,
/// }
/// ```
#[proc_macro_derive(Model, attributes(model))]
pub fn model_derive(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);
    derive_model::expand(ast).unwrap_or_else(syn::Error::into_compile_error).into()
}
