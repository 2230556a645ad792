use serde_json::{Map, Value};

use crate::types::TypeRef;

/// A column declaration.
///
/// Either a bare type reference (`"STRING"`) or an options object carrying a type
/// plus arbitrary ORM options such as `allowNull` or `defaultValue`.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldDefinition {
    Type(TypeRef),
    Options(Field),
}

/// An options-form field declaration.
///
/// # Example
///
/// ```rust,ignore
/// let age = Field::new("INTEGER").allow_null(false).default_value(0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub ty: TypeRef,
    pub options: Map<String, Value>,
}

impl Field {
    pub fn new(ty: impl Into<TypeRef>) -> Self {
        Self { ty: ty.into(), options: Map::new() }
    }

    /// Sets an arbitrary ORM option.
    pub fn option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    pub fn allow_null(self, allow: bool) -> Self {
        self.option("allowNull", allow)
    }

    pub fn primary_key(self) -> Self {
        self.option("primaryKey", true)
    }

    pub fn unique(self) -> Self {
        self.option("unique", true)
    }

    pub fn auto_increment(self) -> Self {
        self.option("autoIncrement", true)
    }

    pub fn default_value(self, value: impl Into<Value>) -> Self {
        self.option("defaultValue", value)
    }

    /// Maps the attribute onto a differently named database column.
    pub fn column(self, name: impl Into<String>) -> Self {
        self.option("field", Value::String(name.into()))
    }

    pub fn comment(self, text: impl Into<String>) -> Self {
        self.option("comment", Value::String(text.into()))
    }
}

impl FieldDefinition {
    pub fn type_ref(&self) -> &TypeRef {
        match self {
            FieldDefinition::Type(ty) => ty,
            FieldDefinition::Options(field) => &field.ty,
        }
    }

    pub fn type_ref_mut(&mut self) -> &mut TypeRef {
        match self {
            FieldDefinition::Type(ty) => ty,
            FieldDefinition::Options(field) => &mut field.ty,
        }
    }

    /// Returns the ORM options, or `None` for a bare type declaration.
    pub fn options(&self) -> Option<&Map<String, Value>> {
        match self {
            FieldDefinition::Type(_) => None,
            FieldDefinition::Options(field) => Some(&field.options),
        }
    }

    /// Renders the declaration the way the ORM's define call receives it.
    ///
    /// Resolved types render as their SQL type, unresolved ones as `null`.
    pub fn describe(&self) -> Value {
        let ty = describe_type(self.type_ref());
        match self {
            FieldDefinition::Type(_) => ty,
            FieldDefinition::Options(field) => {
                let mut object = field.options.clone();
                object.insert("type".to_string(), ty);
                Value::Object(object)
            }
        }
    }
}

fn describe_type(ty: &TypeRef) -> Value {
    match ty {
        TypeRef::Named(key) => Value::String(key.clone()),
        TypeRef::Resolved(data_type) => Value::String(data_type.sql_type.clone()),
        TypeRef::Unresolved(_) => Value::Null,
    }
}

impl From<&str> for FieldDefinition {
    fn from(key: &str) -> Self {
        FieldDefinition::Type(key.into())
    }
}

impl From<String> for FieldDefinition {
    fn from(key: String) -> Self {
        FieldDefinition::Type(key.into())
    }
}

impl From<TypeRef> for FieldDefinition {
    fn from(ty: TypeRef) -> Self {
        FieldDefinition::Type(ty)
    }
}

impl From<Field> for FieldDefinition {
    fn from(field: Field) -> Self {
        FieldDefinition::Options(field)
    }
}
