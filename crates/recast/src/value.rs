//! Runtime value model: type names and the dynamic [`Value`] enum.

use std::borrow::Cow;
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Name of a runtime type: a primitive category or a class/interface.
///
/// Primitive categories are the associated constants below; every other
/// name is read as a class or interface and resolved against the
/// [`TypeGraph`](crate::TypeGraph) during dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeName(Cow<'static, str>);

impl TypeName {
    pub const NULL: TypeName = TypeName::borrowed("null");
    pub const BOOL: TypeName = TypeName::borrowed("bool");
    pub const INT: TypeName = TypeName::borrowed("int");
    pub const FLOAT: TypeName = TypeName::borrowed("float");
    pub const STRING: TypeName = TypeName::borrowed("string");
    pub const LIST: TypeName = TypeName::borrowed("list");
    pub const MAP: TypeName = TypeName::borrowed("map");
    pub const OBJECT: TypeName = TypeName::borrowed("object");
    pub const CALLABLE: TypeName = TypeName::borrowed("callable");
    pub const ITERABLE: TypeName = TypeName::borrowed("iterable");
    pub const RESOURCE: TypeName = TypeName::borrowed("resource");

    /// Every primitive category. `callable`, `iterable` and `resource`
    /// are valid in declared signatures and availability probes even
    /// though [`Value::type_name`] never produces them.
    pub const PRIMITIVES: [TypeName; 11] = [
        TypeName::NULL,
        TypeName::BOOL,
        TypeName::INT,
        TypeName::FLOAT,
        TypeName::STRING,
        TypeName::LIST,
        TypeName::MAP,
        TypeName::OBJECT,
        TypeName::CALLABLE,
        TypeName::ITERABLE,
        TypeName::RESOURCE,
    ];

    const fn borrowed(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this names a primitive category rather than a class/interface.
    pub fn is_primitive(&self) -> bool {
        Self::PRIMITIVES.contains(self)
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for TypeName {
    fn from(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }
}

impl From<String> for TypeName {
    fn from(name: String) -> Self {
        Self(Cow::Owned(name))
    }
}

impl AsRef<str> for TypeName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for TypeName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for TypeName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// A class-named structured value: the class name plus named fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Object {
    class: TypeName,
    #[serde(default)]
    fields: IndexMap<String, Value>,
}

impl Object {
    pub fn new(class: impl Into<TypeName>) -> Self {
        Self {
            class: class.into(),
            fields: IndexMap::new(),
        }
    }

    pub fn with_fields<K, V>(
        class: impl Into<TypeName>,
        fields: impl IntoIterator<Item = (K, V)>,
    ) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        Self {
            class: class.into(),
            fields: fields
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }

    pub fn class(&self) -> &TypeName {
        &self.class
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(field.into(), value.into());
    }

    pub fn fields(&self) -> &IndexMap<String, Value> {
        &self.fields
    }
}

/// Dynamic runtime value: the uniform currency converters consume and
/// produce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<Value>),
    Map(IndexMap<String, Value>),
    Object(Object),
}

impl Value {
    /// Convenience constructor for an [`Object`] value.
    pub fn object<K, V>(
        class: impl Into<TypeName>,
        fields: impl IntoIterator<Item = (K, V)>,
    ) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        Value::Object(Object::with_fields(class, fields))
    }

    /// Runtime classification: the concrete class name for objects, the
    /// primitive category otherwise.
    pub fn type_name(&self) -> TypeName {
        match self {
            Value::Null => TypeName::NULL,
            Value::Bool(_) => TypeName::BOOL,
            Value::Int(_) => TypeName::INT,
            Value::Float(_) => TypeName::FLOAT,
            Value::String(_) => TypeName::STRING,
            Value::List(_) => TypeName::LIST,
            Value::Map(_) => TypeName::MAP,
            Value::Object(object) => object.class.clone(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(inner) => Some(*inner),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(inner) => Some(*inner),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(inner) => Some(*inner),
            Value::Int(inner) => Some(*inner as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(inner) => Some(inner),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(inner) => Some(inner),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Map(inner) => Some(inner),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(inner) => Some(inner),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(inner: bool) -> Self {
        Value::Bool(inner)
    }
}

impl From<i32> for Value {
    fn from(inner: i32) -> Self {
        Value::Int(i64::from(inner))
    }
}

impl From<i64> for Value {
    fn from(inner: i64) -> Self {
        Value::Int(inner)
    }
}

impl From<f64> for Value {
    fn from(inner: f64) -> Self {
        Value::Float(inner)
    }
}

impl From<&str> for Value {
    fn from(inner: &str) -> Self {
        Value::String(inner.to_owned())
    }
}

impl From<String> for Value {
    fn from(inner: String) -> Self {
        Value::String(inner)
    }
}

impl From<Vec<Value>> for Value {
    fn from(inner: Vec<Value>) -> Self {
        Value::List(inner)
    }
}

impl From<IndexMap<String, Value>> for Value {
    fn from(inner: IndexMap<String, Value>) -> Self {
        Value::Map(inner)
    }
}

impl From<Object> for Value {
    fn from(inner: Object) -> Self {
        Value::Object(inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_primitives_by_category() {
        assert_eq!(Value::Null.type_name(), TypeName::NULL);
        assert_eq!(Value::from(true).type_name(), TypeName::BOOL);
        assert_eq!(Value::from(42i64).type_name(), TypeName::INT);
        assert_eq!(Value::from(4.2).type_name(), TypeName::FLOAT);
        assert_eq!(Value::from("x").type_name(), TypeName::STRING);
        assert_eq!(Value::List(vec![]).type_name(), TypeName::LIST);
        assert_eq!(Value::Map(IndexMap::new()).type_name(), TypeName::MAP);
    }

    #[test]
    fn classifies_objects_by_class_name() {
        let value = Value::object("Invoice", [("total", Value::Int(10))]);
        assert_eq!(value.type_name(), "Invoice");
        assert!(!value.type_name().is_primitive());
    }

    #[test]
    fn primitive_categories_are_recognized() {
        assert!(TypeName::from("int").is_primitive());
        assert!(TypeName::from("callable").is_primitive());
        assert!(!TypeName::from("Invoice").is_primitive());
    }

    #[test]
    fn value_round_trips_through_serde() {
        let value = Value::object(
            "Invoice",
            [
                ("total", Value::Float(12.5)),
                ("lines", Value::List(vec![Value::from("a"), Value::from("b")])),
            ],
        );
        let encoded = serde_json::to_string(&value).unwrap();
        let decoded: Value = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, value);
    }
}
