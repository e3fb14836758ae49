//! [SerialCodec]: field values plus a salt, encoded to and decoded from a
//! binary serial string.
//!
//! ## Wire format
//!
//! Every field is written in schema order, most significant byte first. Each
//! byte becomes a 9-bit unit: the byte's salt bit followed by the 8 data bits,
//! complemented when the salt bit differs from the global-invert bit. The
//! global-invert bit closes the string, so a schema of `n` bytes yields
//! `9n + 1` bits.

use indexmap::IndexMap;
use rand::Rng;
use tracing::debug;

use crate::{
    bits,
    errors::{CompileError, Error, ReadError, SaltError, ValueError, WriteError},
    field::Field,
    salt::{Salt, SaltInput},
    schema::Schema,
};

/// Argument of [SerialCodec::set].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetInput<'a> {
    /// Assign one field.
    Field(&'a str, u128),
    /// Assign several fields at once.
    Fields(&'a [(&'a str, u128)]),
    /// Decode a whole serial string, replacing every value and the salt.
    Serial(&'a str),
}

/// Result of a successful [SerialCodec::set]. Maps keep schema order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Assigned {
    Value(u128),
    Values(IndexMap<String, u128>),
}

/// Stateful codec for one serial number.
#[derive(Debug, Clone)]
pub struct SerialCodec {
    schema: Schema,
    values: Vec<Option<u128>>,
    salt: Salt,
}

impl SerialCodec {
    /// Creates a codec with every value undefined and a salt drawn from the thread RNG.
    pub fn new(schema: Schema) -> Self {
        Self::with_rng(schema, &mut rand::thread_rng())
    }

    /// Creates a codec whose initial salt is drawn from `rng`.
    pub fn with_rng<R: Rng + ?Sized>(schema: Schema, rng: &mut R) -> Self {
        let salt = Salt::random(schema.salt_len(), rng);
        debug!(
            total_bits = schema.total_bits(),
            salt = %salt,
            "created serial codec"
        );

        SerialCodec {
            values: vec![None; schema.fields().len()],
            schema,
            salt,
        }
    }

    /// Compiles `fields` and creates a codec from them.
    pub fn from_fields(fields: &[Field]) -> Result<Self, CompileError> {
        Ok(Self::new(Schema::compile(fields)?))
    }

    /// Compiles a JSON schema document and creates a codec from it.
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self, CompileError> {
        Ok(Self::new(Schema::from_json(json)?))
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Current value of `name`, `None` while unassigned.
    pub fn get(&self, name: &str) -> Result<Option<u128>, ValueError> {
        let index = self.index_of(name)?;
        Ok(self.values[index])
    }

    /// Snapshot of every field value in schema order, including unassigned ones.
    pub fn values(&self) -> IndexMap<String, Option<u128>> {
        self.schema
            .fields()
            .iter()
            .zip(&self.values)
            .map(|(field, value)| (field.name.clone(), *value))
            .collect()
    }

    /// Dispatches to [Self::set_field], [Self::set_fields] or [Self::deserialize].
    pub fn set(&mut self, input: SetInput<'_>) -> Result<Assigned, Error> {
        match input {
            SetInput::Field(name, value) => {
                Ok(Assigned::Value(self.set_field(name, value)?))
            }
            SetInput::Fields(entries) => Ok(Assigned::Values(self.set_fields(entries)?)),
            SetInput::Serial(serial) => {
                if serial.is_empty() {
                    debug!("single string argument is empty");
                    return Err(ReadError::NotBinary.into());
                }

                self.deserialize(serial)?;
                Ok(Assigned::Values(self.defined_values()))
            }
        }
    }

    /// Validates and stores one field value.
    pub fn set_field(&mut self, name: &str, value: u128) -> Result<u128, ValueError> {
        let index = self.index_of(name)?;
        let value = self.schema.fields()[index].check(value).inspect_err(|err| {
            debug!(%err, "rejected field value");
        })?;

        debug!(field = name, value, "set field value");
        self.values[index] = Some(value);
        Ok(value)
    }

    /// Stores several field values. Every entry is validated before any is stored.
    /// The returned map follows schema order.
    pub fn set_fields(
        &mut self,
        entries: &[(&str, u128)],
    ) -> Result<IndexMap<String, u128>, ValueError> {
        let mut staged = Vec::with_capacity(entries.len());
        for &(name, value) in entries {
            let index = self.index_of(name)?;
            let value = self.schema.fields()[index].check(value).inspect_err(|err| {
                debug!(%err, "rejected field value");
            })?;
            staged.push((index, value));
        }

        staged.sort_by_key(|&(index, _)| index);

        let mut assigned = IndexMap::with_capacity(staged.len());
        for (index, value) in staged {
            self.values[index] = Some(value);
            assigned.insert(self.schema.fields()[index].name.clone(), value);
        }

        debug!(count = assigned.len(), "set field values");
        Ok(assigned)
    }

    pub fn salt(&self) -> &Salt {
        &self.salt
    }

    /// Replaces the salt after validating it against the schema's salt width.
    pub fn set_salt<'a>(
        &mut self,
        input: impl Into<SaltInput<'a>>,
    ) -> Result<&Salt, SaltError> {
        let salt = Salt::from_input(input.into(), self.schema.salt_len())
            .inspect_err(|err| debug!(%err, "rejected salt"))?;

        debug!(salt = %salt, "set salt");
        self.salt = salt;
        Ok(&self.salt)
    }

    /// Replaces the salt with a fresh one drawn from `rng`.
    pub fn randomize_salt<R: Rng + ?Sized>(&mut self, rng: &mut R) -> &Salt {
        self.salt = Salt::random(self.schema.salt_len(), rng);
        debug!(salt = %self.salt, "randomized salt");
        &self.salt
    }

    /// Encodes all field values with the current salt.
    ///
    /// Fails with [WriteError::Incomplete] naming every field still unassigned.
    pub fn serialize(&self) -> Result<String, WriteError> {
        let mut undefined = Vec::new();
        let mut defined = Vec::with_capacity(self.values.len());
        for (field, value) in self.schema.fields().iter().zip(&self.values) {
            match value {
                Some(value) => defined.push(*value),
                None => undefined.push(field.name.clone()),
            }
        }

        if !undefined.is_empty() {
            debug!(?undefined, "cannot serialize with undefined fields");
            return Err(WriteError::Incomplete(undefined));
        }

        let global = self.salt.global_invert();
        let mut out = Vec::with_capacity(self.schema.total_bits());

        for (field, value) in self.schema.fields().iter().zip(defined) {
            for i in 0..field.bytes {
                let shift = 8 * (field.bytes - 1 - i);
                let local = self.salt.byte_bit(field.byte_offset + i);

                let mut byte = (value >> shift) as u8;
                if local != global {
                    byte = !byte;
                }

                out.push(local);
                bits::push_byte(&mut out, byte);
            }
        }
        out.push(global);

        debug!(bits = out.len(), "serialized values");
        Ok(bits::to_binary(&out))
    }

    /// Decodes `serial`, replacing every field value and the salt.
    ///
    /// The input is fully validated and decoded before anything is stored, so
    /// a failure leaves the codec untouched.
    pub fn deserialize(&mut self, serial: &str) -> Result<(), ReadError> {
        let units = bits::parse_binary(serial).ok_or_else(|| {
            debug!("serial is not a binary string");
            ReadError::NotBinary
        })?;

        let total_bits = self.schema.total_bits();
        if units.len() != total_bits {
            debug!(
                expected = total_bits,
                actual = units.len(),
                "invalid serial length"
            );
            return Err(ReadError::InvalidLength {
                expected: total_bits,
                actual: units.len(),
            });
        }

        let global = bits::read_bit_at(&units, total_bits - 1)?;
        let mut salt_bits = Vec::with_capacity(self.schema.salt_len());
        let mut values = Vec::with_capacity(self.values.len());
        let mut pos = 0;

        for field in self.schema.fields() {
            let mut value = 0u128;
            for _ in 0..field.bytes {
                let local = bits::read_bit_at(&units, pos)?;
                let mut byte = bits::read_byte_at(&units, pos + 1)?;
                if local != global {
                    byte = !byte;
                }

                salt_bits.push(local);
                value = (value << 8) | byte as u128;
                pos += 9;
            }
            values.push(Some(field.check(value)?));
        }
        salt_bits.push(global);

        self.values = values;
        self.salt = Salt::from_bits(salt_bits);
        debug!(salt = %self.salt, "deserialized serial");
        Ok(())
    }

    fn index_of(&self, name: &str) -> Result<usize, ValueError> {
        self.schema.index_of(name).ok_or_else(|| {
            debug!(field = name, "field not defined");
            ValueError::UnknownField(name.to_string())
        })
    }

    fn defined_values(&self) -> IndexMap<String, u128> {
        self.schema
            .fields()
            .iter()
            .zip(&self.values)
            .filter_map(|(field, value)| value.map(|value| (field.name.clone(), value)))
            .collect()
    }
}
