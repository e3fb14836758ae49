//! Error types for schema compilation, value assignment, salting, and the
//! serial encode/decode paths.

use thiserror::Error;

/// Errors produced when compiling [crate::field::Field]s into a [crate::schema::Schema].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// Schema has no fields.
    #[error("invalid schema: must have at least one field")]
    EmptySchema,
    /// Schema document is not a name -> descriptor object.
    #[error("schema must be an object mapping field names to descriptors")]
    NotAnObject,
    /// Field name is invalid (e.g. empty or duplicate).
    #[error("invalid field name {0:?}")]
    InvalidFieldName(String),
    /// Byte width is 0 or wider than a `u128`.
    #[error("field {field:?} has invalid byte width {bytes} (expected 1..=16)")]
    InvalidByteWidth { field: String, bytes: usize },
    /// Schema document could not be deserialized.
    #[error("malformed schema: {0}")]
    Json(String),
}

/// Errors produced when reading or assigning a field value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    #[error("field {0:?} not defined")]
    UnknownField(String),
    #[error("value {value} for field {field:?} outside range 0 - {max}")]
    OutOfRange { field: String, value: u128, max: u128 },
}

/// Errors produced when replacing the salt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SaltError {
    #[error("salt {value} outside range 0 - {max}")]
    OutOfRange { value: u128, max: u128 },
    #[error("salt string must be a binary string")]
    NotBinary,
    #[error("salt string must be {expected} characters, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}

/// Errors produced when decoding a serial string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReadError {
    /// Input contains characters other than `0` and `1`.
    #[error("serial must be a binary string")]
    NotBinary,
    /// Input length differs from the schema's total bit width.
    #[error("invalid serial length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
    /// Requested bit range is beyond the end of the data.
    #[error("bit read out of bounds")]
    OutOfBounds,
    /// A decoded value failed field validation.
    #[error(transparent)]
    Value(#[from] ValueError),
}

/// Errors produced when encoding a serial string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WriteError {
    /// Fields without a value, in schema order.
    #[error("all fields must be defined; undefined: {}", .0.join(", "))]
    Incomplete(Vec<String>),
}

/// Any error a [crate::codec::SerialCodec] operation can return.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Compile(#[from] CompileError),
    #[error(transparent)]
    Value(#[from] ValueError),
    #[error(transparent)]
    Salt(#[from] SaltError),
    #[error(transparent)]
    Read(#[from] ReadError),
    #[error(transparent)]
    Write(#[from] WriteError),
}
