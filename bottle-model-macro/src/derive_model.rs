use heck::ToSnakeCase;
use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, LitInt, LitStr, Path};

use crate::types::rust_type_to_key;

/// Struct-level `#[model(...)]` settings.
#[derive(Default)]
struct ModelAttrs {
    table: Option<String>,
    members: Option<Path>,
    statics: Option<Path>,
    extensions: Vec<Path>,
}

/// Expands the `#[derive(Model)]` macro.
///
/// This function parses the struct fields and `#[model(...)]` attributes to generate
/// the `impl Model` block: `model_name`, `schema` (one field declaration per struct
/// field, then the optional `members` function), `statics` and `extensions`.
pub fn expand(ast: DeriveInput) -> syn::Result<TokenStream> {
    let struct_name = &ast.ident;

    let fields = if let Data::Struct(data) = &ast.data {
        if let Fields::Named(fields) = &data.fields {
            fields
        } else {
            return Err(syn::Error::new_spanned(struct_name, "Model must have named fields"));
        }
    } else {
        return Err(syn::Error::new_spanned(struct_name, "Model must be a struct"));
    };

    let attrs = parse_model_attrs(&ast)?;

    let mut field_decls = Vec::with_capacity(fields.named.len());
    for f in &fields.named {
        let Some(ident) = &f.ident else { continue };
        let ident = ident.to_string();
        let field_name = ident.strip_prefix("r#").unwrap_or(&ident).to_string();

        let (mut type_key, is_nullable) = rust_type_to_key(&f.ty);
        let mut skip = false;
        let mut is_primary_key = false;
        let mut unique = false;
        let mut auto_increment = false;
        let mut size = None;
        let mut column = None;

        // Parse attributes #[model(...)]
        for attr in &f.attrs {
            if !attr.path().is_ident("model") {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("skip") {
                    skip = true;
                } else if meta.path.is_ident("primary_key") {
                    is_primary_key = true;
                } else if meta.path.is_ident("unique") {
                    unique = true;
                } else if meta.path.is_ident("auto_increment") {
                    auto_increment = true;
                } else if meta.path.is_ident("size") {
                    let value: LitInt = meta.value()?.parse()?;
                    size = Some(value.base10_parse::<usize>()?);
                } else if meta.path.is_ident("type") {
                    let value: LitStr = meta.value()?.parse()?;
                    type_key = value.value();
                } else if meta.path.is_ident("column") {
                    let value: LitStr = meta.value()?.parse()?;
                    column = Some(value.value());
                } else {
                    return Err(meta.error("unsupported model field attribute"));
                }
                Ok(())
            })?;
        }

        if skip {
            continue;
        }
        if let Some(size) = size {
            type_key = format!("{type_key}({size})");
        }

        let mut options = Vec::new();
        if is_nullable {
            options.push(quote! { .allow_null(true) });
        }
        if is_primary_key {
            options.push(quote! { .primary_key() });
        }
        if auto_increment {
            options.push(quote! { .auto_increment() });
        }
        if unique {
            options.push(quote! { .unique() });
        }
        if let Some(column) = column {
            options.push(quote! { .column(#column) });
        }

        let definition = if options.is_empty() {
            quote! { #type_key }
        } else {
            quote! { bottle_model::Field::new(#type_key) #(#options)* }
        };

        field_decls.push(quote! {
            schema.field(#field_name, #definition);
        });
    }

    let model_name = struct_name.to_string();
    let table = attrs.table.unwrap_or_else(|| model_name.to_snake_case());
    let members_call = attrs.members.map(|path| quote! { #path(schema); });
    let statics_call = attrs.statics.map(|path| quote! { #path(statics); });
    let extensions = attrs.extensions;
    let (impl_generics, ty_generics, where_clause) = ast.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics bottle_model::Model for #struct_name #ty_generics #where_clause {
            fn model_name() -> &'static str {
                #model_name
            }

            fn schema(schema: &mut bottle_model::Schema) {
                #(#field_decls)*
                #members_call
            }

            fn statics(statics: &mut bottle_model::Statics) {
                statics.table_name(#table);
                #statics_call
            }

            fn extensions() -> ::std::vec::Vec<bottle_model::Extension> {
                vec![#(bottle_model::Extension::of::<#extensions>()),*]
            }
        }
    })
}

fn parse_model_attrs(ast: &DeriveInput) -> syn::Result<ModelAttrs> {
    let mut attrs = ModelAttrs::default();

    for attr in &ast.attrs {
        if !attr.path().is_ident("model") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("table") {
                let value: LitStr = meta.value()?.parse()?;
                attrs.table = Some(value.value());
            } else if meta.path.is_ident("members") {
                attrs.members = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("statics") {
                attrs.statics = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("extensions") {
                meta.parse_nested_meta(|extension| {
                    attrs.extensions.push(extension.path.clone());
                    Ok(())
                })?;
            } else {
                return Err(meta.error("unsupported model attribute"));
            }
            Ok(())
        })?;
    }

    Ok(attrs)
}
