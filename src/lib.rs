//! # serialcraft
//!
//! A schema-driven codec that packs named unsigned fields into a compact
//! binary serial string and back.
//!
//! Every encoded byte carries one salt bit, and the string ends with a global
//! invert bit. A byte whose salt bit differs from the global bit is written
//! complemented, so the same values encoded under two salts look different
//! while decoding to the same result. This is an obfuscation, not encryption.
//!
//! ## Example
//!
//! ```
//! use serialcraft::codec::{SerialCodec, SetInput};
//! use serialcraft::field::Field;
//!
//! let mut codec = SerialCodec::from_fields(&[
//!     Field::with_bytes("date", 2),
//!     Field::new("product"),
//!     Field::with_bytes("hardwareId", 6),
//! ])
//! .unwrap();
//!
//! codec
//!     .set(SetInput::Fields(&[("date", 0), ("product", 255), ("hardwareId", 100)]))
//!     .unwrap();
//! let serial = codec.serialize().unwrap();
//! assert_eq!(serial.len(), codec.schema().total_bits());
//!
//! let mut other = SerialCodec::from_fields(&[
//!     Field::with_bytes("date", 2),
//!     Field::new("product"),
//!     Field::with_bytes("hardwareId", 6),
//! ])
//! .unwrap();
//! other.deserialize(&serial).unwrap();
//! assert_eq!(other.get("product").unwrap(), Some(255));
//! assert_eq!(other.salt(), codec.salt());
//! ```

pub mod bits;
pub mod codec;
pub mod errors;
pub mod field;
pub mod salt;
pub mod schema;
#[cfg(feature = "serde")]
pub mod serde;

pub use codec::{Assigned, SerialCodec, SetInput};
pub use errors::Error;
pub use field::Field;
pub use salt::{Salt, SaltInput};
pub use schema::Schema;
