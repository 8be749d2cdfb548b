//! Static schema of a version record as it appears in the declaration.

use serde_json::Value;
use vaj_types::VersionRecord;

/// Declared type of one field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeclaredType {
    String,
    Number,
    Boolean,
    /// Nested object block with its own fields, in order.
    Object(Vec<Field>),
}

/// A named field of a declared object.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub ty: DeclaredType,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: DeclaredType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

impl DeclaredType {
    /// Structural type of a free-form JSON value.
    ///
    /// Arrays become blocks keyed by index and `null` an empty block, matching
    /// how the values read when indexed from a script.
    pub fn of_value(value: &Value) -> Self {
        match value {
            Value::String(_) => Self::String,
            Value::Number(_) => Self::Number,
            Value::Bool(_) => Self::Boolean,
            Value::Null => Self::Object(Vec::new()),
            Value::Array(items) => Self::Object(
                items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| Field::new(i.to_string(), Self::of_value(item)))
                    .collect(),
            ),
            Value::Object(map) => Self::Object(
                map.iter()
                    .map(|(k, v)| Field::new(k.clone(), Self::of_value(v)))
                    .collect(),
            ),
        }
    }
}

/// Fields of one version record, in declaration order.
///
/// `abi` is always `string`: it is JSON text on disk even though scripts may
/// parse it. Optional fields that are unset are left out.
pub fn version_fields(record: &VersionRecord) -> Vec<Field> {
    let mut fields = vec![
        Field::new("address", DeclaredType::String),
        Field::new("codeHash", DeclaredType::String),
        Field::new("initParams", DeclaredType::of_value(&record.init_params)),
        Field::new(
            "constructorParams",
            DeclaredType::of_value(&record.constructor_params),
        ),
    ];
    if record.public_key.is_some() {
        fields.push(Field::new("publicKey", DeclaredType::String));
    }
    if record.updated_at.is_some() {
        fields.push(Field::new("updatedAt", DeclaredType::Number));
    }
    fields.extend([
        Field::new("abi", DeclaredType::String),
        Field::new("tvc", DeclaredType::String),
        Field::new("code", DeclaredType::String),
    ]);
    fields
}
