//! JSON-deserializable schema description.
//!
//! A schema document is a single JSON object mapping each field name to its
//! descriptor, in the order the fields are laid out on the wire:
//!
//! ```json
//! { "date": { "bytes": 2 }, "product": {}, "hardwareId": { "bytes": 6 } }
//! ```
//!
//! Key order is preserved (`serde_json` is built with `preserve_order`), so two
//! codecs built from the same document always agree on the byte layout.

use ::serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{errors::CompileError, field::Field};

/// Descriptor of a single field.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
pub struct FieldDef {
    /// Width in bytes; defaults to 1 when absent.
    #[serde(default, alias = "byteWidth", skip_serializing_if = "Option::is_none")]
    pub bytes: Option<usize>,
}

/// Top-level schema definition: fields in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaDef {
    pub fields: Vec<(String, FieldDef)>,
}

impl SchemaDef {
    pub fn from_json(json: &str) -> Result<Self, CompileError> {
        let value: Value =
            serde_json::from_str(json).map_err(|err| CompileError::Json(err.to_string()))?;
        Self::from_value(value)
    }

    /// Reads a definition from an already parsed JSON value.
    /// Anything but an object is rejected with [CompileError::NotAnObject].
    pub fn from_value(value: Value) -> Result<Self, CompileError> {
        let Value::Object(map) = value else {
            return Err(CompileError::NotAnObject);
        };

        let fields = map
            .into_iter()
            .map(|(name, def)| {
                serde_json::from_value::<FieldDef>(def)
                    .map(|def| (name.clone(), def))
                    .map_err(|err| CompileError::Json(format!("field {name:?}: {err}")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(SchemaDef { fields })
    }

    pub fn into_fields(self) -> Vec<Field> {
        self.fields.into_iter().map(Field::from).collect()
    }
}
