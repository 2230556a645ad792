use syn::{GenericArgument, PathArguments, Type};

/// Maps Rust types to their corresponding type registry keys.
///
/// Returns a tuple containing:
/// 1. The type key (e.g., "STRING", "INTEGER").
/// 2. A boolean indicating if the type is nullable (Option<T>).
pub fn rust_type_to_key(ty: &Type) -> (String, bool) {
    if let Type::Path(type_path) = ty {
        if let Some(segment) = type_path.path.segments.last() {
            let type_name = segment.ident.to_string();

            // Handle Option<T> for nullable columns
            if type_name == "Option" {
                if let Some(inner_ty) = first_generic(&segment.arguments) {
                    let (inner_key, _ignored_nullable) = rust_type_to_key(inner_ty);
                    return (inner_key, true);
                }
            }

            // Vec<u8> is binary, any other Vec is stored as JSON
            if type_name == "Vec" {
                let is_bytes = matches!(
                    first_generic(&segment.arguments),
                    Some(Type::Path(inner)) if inner.path.is_ident("u8")
                );
                let key = if is_bytes { "BLOB" } else { "JSON" };
                return (key.to_string(), false);
            }

            let key = match type_name.as_str() {
                "i8" | "i16" | "u8" | "u16" => "SMALLINT",
                "i32" | "u32" => "INTEGER",
                "i64" | "u64" | "isize" | "usize" => "BIGINT",
                "String" | "str" => "STRING",
                "bool" => "BOOLEAN",
                "f32" => "FLOAT",
                "f64" => "DOUBLE",
                "DateTime" | "NaiveDateTime" => "DATE",
                "NaiveDate" => "DATEONLY",
                "NaiveTime" => "TIME",
                "Uuid" => "UUID",
                "Value" => "JSON",
                _ => "STRING",
            };
            (key.to_string(), false)
        } else {
            ("STRING".to_string(), false)
        }
    } else {
        ("STRING".to_string(), false)
    }
}

fn first_generic(arguments: &PathArguments) -> Option<&Type> {
    if let PathArguments::AngleBracketed(args) = arguments {
        if let Some(GenericArgument::Type(inner_ty)) = args.args.first() {
            return Some(inner_ty);
        }
    }
    None
}
