//! Schema: compiled, immutable field layout shared by encode and decode.

use std::collections::HashSet;

use tracing::debug;

use crate::{
    bits,
    errors::{CompileError, ValueError},
    field::Field,
};

/// Widest field a `u128` value can hold.
pub const MAX_FIELD_BYTES: usize = 16;

/// A field after compilation: its name, width, and position in the byte stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledField {
    pub name: String,
    pub bytes: usize,
    /// Index of the field's first byte among all encoded bytes.
    pub byte_offset: usize,
    /// Largest value the field accepts.
    pub max: u128,
}

impl CompiledField {
    /// Checks that `value` fits in this field's byte width.
    pub fn check(&self, value: u128) -> Result<u128, ValueError> {
        if value > self.max {
            return Err(ValueError::OutOfRange {
                field: self.name.clone(),
                value,
                max: self.max,
            });
        }

        Ok(value)
    }
}

impl TryFrom<(&Field, usize)> for CompiledField {
    type Error = CompileError;

    fn try_from((field, byte_offset): (&Field, usize)) -> Result<Self, Self::Error> {
        if field.name.is_empty() {
            return Err(CompileError::InvalidFieldName(field.name.clone()));
        }

        if field.bytes == 0 || field.bytes > MAX_FIELD_BYTES {
            return Err(CompileError::InvalidByteWidth {
                field: field.name.clone(),
                bytes: field.bytes,
            });
        }

        Ok(CompiledField {
            name: field.name.clone(),
            bytes: field.bytes,
            byte_offset,
            max: bits::max_value(field.bytes * 8),
        })
    }
}

/// A compiled schema: fields in declaration order plus the derived widths.
/// Use [Schema::compile] to build from [Field]s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    fields: Vec<CompiledField>,
    primary_bytes: usize,
}

impl Schema {
    /// Compiles a slice of [Field]s into a schema. Fails if the slice is empty
    /// or any field is invalid.
    pub fn compile(fields: &[Field]) -> Result<Self, CompileError> {
        if fields.is_empty() {
            debug!("rejecting schema without fields");
            return Err(CompileError::EmptySchema);
        }

        let mut compiled_fields = Vec::with_capacity(fields.len());
        let mut seen = HashSet::with_capacity(fields.len());
        let mut primary_bytes = 0;

        for field in fields {
            if !seen.insert(field.name.as_str()) {
                return Err(CompileError::InvalidFieldName(field.name.clone()));
            }

            let compiled = CompiledField::try_from((field, primary_bytes))?;
            primary_bytes += compiled.bytes;
            compiled_fields.push(compiled);
        }

        debug!(
            fields = compiled_fields.len(),
            primary_bytes, "compiled serial schema"
        );

        Ok(Self {
            fields: compiled_fields,
            primary_bytes,
        })
    }

    /// Compiles a JSON schema document. See [crate::serde] for its shape.
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self, CompileError> {
        let def = crate::serde::SchemaDef::from_json(json)?;
        Self::compile(&def.into_fields())
    }

    /// Compiled fields in definition order.
    pub fn fields(&self) -> &[CompiledField] {
        &self.fields
    }

    /// Position of `name` in definition order.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|field| field.name == name)
    }

    /// Sum of all field widths in bytes.
    pub fn primary_bytes(&self) -> usize {
        self.primary_bytes
    }

    /// One inversion bit per encoded byte plus the global-invert bit.
    pub fn salt_len(&self) -> usize {
        self.primary_bytes + 1
    }

    /// Exact length of a serialized string.
    pub fn total_bits(&self) -> usize {
        self.primary_bytes * 8 + self.salt_len()
    }
}
