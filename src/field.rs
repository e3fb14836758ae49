//! Definition of logical fields used to build a [crate::schema::Schema].

/// A single named field: an unsigned integer stored in a whole number of bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Name used for lookups and in value snapshots.
    pub name: String,
    /// Width of the value in bytes (1..=8).
    pub bytes: usize,
}

impl Field {
    /// A one-byte field.
    pub fn new(name: impl Into<String>) -> Self {
        Field {
            name: name.into(),
            bytes: 1,
        }
    }

    pub fn with_bytes(name: impl Into<String>, bytes: usize) -> Self {
        Field {
            name: name.into(),
            bytes,
        }
    }
}

#[cfg(feature = "serde")]
impl From<(String, crate::serde::FieldDef)> for Field {
    fn from((name, def): (String, crate::serde::FieldDef)) -> Self {
        Field {
            name,
            bytes: def.bytes.unwrap_or(1),
        }
    }
}
