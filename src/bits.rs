//! Low-level helpers over bit sequences.
//!
//! A bit sequence is a `[u8]` where every element is `0` or `1`, addressed in
//! MSB-first order: bit 0 is the first character of the rendered binary string.

use crate::errors::ReadError;

/// Parses a string of `0`/`1` characters into a bit sequence.
/// Returns `None` if any other character is present.
pub fn parse_binary(s: &str) -> Option<Vec<u8>> {
    s.bytes()
        .map(|c| match c {
            b'0' => Some(0),
            b'1' => Some(1),
            _ => None,
        })
        .collect()
}

/// Renders a bit sequence as a string of `0`/`1` characters.
pub fn to_binary(bits: &[u8]) -> String {
    bits.iter()
        .map(|&bit| if bit == 0 { '0' } else { '1' })
        .collect()
}

/// Reads a single bit at `bit_pos`. Returns 0 or 1.
pub fn read_bit_at(bits: &[u8], bit_pos: usize) -> Result<u8, ReadError> {
    bits.get(bit_pos).copied().ok_or(ReadError::OutOfBounds)
}

/// Reads the 8 bits starting at `bit_pos` as one byte. MSB-first.
pub fn read_byte_at(bits: &[u8], bit_pos: usize) -> Result<u8, ReadError> {
    if bit_pos.checked_add(8).is_none_or(|end| end > bits.len()) {
        return Err(ReadError::OutOfBounds);
    }

    let mut byte = 0u8;
    for pos in bit_pos..bit_pos + 8 {
        byte = (byte << 1) | read_bit_at(bits, pos)?;
    }

    Ok(byte)
}

/// Appends the 8 bits of `byte` to `out`, MSB-first.
pub fn push_byte(out: &mut Vec<u8>, byte: u8) {
    for shift in (0..8).rev() {
        out.push((byte >> shift) & 1);
    }
}

/// Largest value representable in `bits` bits.
pub fn max_value(bits: usize) -> u128 {
    if bits >= 128 {
        u128::MAX
    } else {
        (1u128 << bits) - 1
    }
}
