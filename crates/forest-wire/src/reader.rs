//! Fixed-width readers for the QVM octet stream.

use crate::error::{WireError, WireResult};

/// Width of one encoded IEEE-754 binary64 value.
pub const DOUBLE_WIDTH: usize = 8;

/// Number of bits packed into one octet.
pub const BITS_PER_OCTET: usize = 8;

/// Interpret exactly 8 bytes as a big-endian IEEE-754 binary64 value.
///
/// Any other slice length is rejected with [`WireError::InvalidInputLength`].
pub fn decode_double(bytes: &[u8]) -> WireResult<f64> {
    let raw: [u8; DOUBLE_WIDTH] = bytes.try_into().map_err(|_| WireError::InvalidInputLength {
        expected: DOUBLE_WIDTH,
        actual: bytes.len(),
    })?;
    Ok(f64::from_be_bytes(raw))
}

/// Expand one byte into its bits, least-significant bit first.
pub fn octet_bits(byte: u8) -> [u8; BITS_PER_OCTET] {
    let mut bits = [0u8; BITS_PER_OCTET];
    for (i, bit) in bits.iter_mut().enumerate() {
        *bit = (byte >> i) & 1;
    }
    bits
}
