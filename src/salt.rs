//! Salt: the bit string that drives per-byte inversion during encode/decode.
//!
//! A salt for a schema of `n` encoded bytes holds `n + 1` bits. Bit `i < n`
//! belongs to encoded byte `i`; the last bit is the global-invert bit. A byte
//! is complemented on the wire whenever its own bit differs from the global one.

use std::fmt;

use rand::Rng;

use crate::{bits, errors::SaltError};

/// Replacement salt accepted by [crate::codec::SerialCodec::set_salt].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaltInput<'a> {
    /// Unsigned integer, rendered zero-padded to the salt width.
    Number(u128),
    /// Binary string of exactly the salt width.
    Binary(&'a str),
}

impl From<u128> for SaltInput<'_> {
    fn from(value: u128) -> Self {
        SaltInput::Number(value)
    }
}

impl<'a> From<&'a str> for SaltInput<'a> {
    fn from(value: &'a str) -> Self {
        SaltInput::Binary(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Salt {
    bits: Vec<u8>,
}

impl Salt {
    /// Draws a uniformly random salt of `len` bits from `rng`.
    pub fn random<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Self {
        Salt {
            bits: (0..len).map(|_| rng.gen_bool(0.5) as u8).collect(),
        }
    }

    /// Builds a `len`-bit salt from an integer. Fails if `value` needs more bits.
    pub fn from_number(value: u128, len: usize) -> Result<Self, SaltError> {
        let max = if len >= 128 {
            u128::MAX
        } else {
            (1u128 << len) - 1
        };

        if value > max {
            return Err(SaltError::OutOfRange { value, max });
        }

        let bits = (0..len)
            .rev()
            .map(|shift| {
                if shift >= 128 {
                    0
                } else {
                    ((value >> shift) & 1) as u8
                }
            })
            .collect();

        Ok(Salt { bits })
    }

    /// Parses a binary string of exactly `len` characters.
    pub fn parse(s: &str, len: usize) -> Result<Self, SaltError> {
        let bits = bits::parse_binary(s).ok_or(SaltError::NotBinary)?;

        if bits.len() != len {
            return Err(SaltError::InvalidLength {
                expected: len,
                actual: bits.len(),
            });
        }

        Ok(Salt { bits })
    }

    pub fn from_input(input: SaltInput<'_>, len: usize) -> Result<Self, SaltError> {
        match input {
            SaltInput::Number(value) => Self::from_number(value, len),
            SaltInput::Binary(s) => Self::parse(s, len),
        }
    }

    /// Wraps bits recovered while decoding; the caller guarantees they are 0/1.
    pub(crate) fn from_bits(bits: Vec<u8>) -> Self {
        Salt { bits }
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Inversion bit of encoded byte `index`.
    pub fn byte_bit(&self, index: usize) -> u8 {
        self.bits[index]
    }

    /// The trailing global-invert bit.
    pub fn global_invert(&self) -> u8 {
        self.bits.last().copied().unwrap_or(0)
    }

    /// Zero-padded binary string of length [Salt::len].
    pub fn to_binary(&self) -> String {
        bits::to_binary(&self.bits)
    }
}

impl fmt::Display for Salt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_binary())
    }
}
