//! Response layout arithmetic.
//!
//! A wavefunction response carries no length prefixes or type tags. The split
//! between the classical memory region and the amplitude region is derived
//! from the number of requested addresses and the total body length:
//!
//! ```text
//! [ memory: ceil(n_addr / 8) bytes ][ amplitude 0: 16 bytes ][ amplitude 1 ] ...
//! ```

use crate::error::{WireError, WireResult};
use crate::reader::{BITS_PER_OCTET, DOUBLE_WIDTH};

/// Bytes per encoded complex amplitude (real + imaginary).
pub const AMPLITUDE_WIDTH: usize = 2 * DOUBLE_WIDTH;

/// Smallest multiple of `m` that is greater than or equal to `n`.
///
/// Fails with [`WireError::MalformedResponse`] if that multiple does not fit
/// in a `usize`.
pub fn round_up_to_multiple(n: usize, m: usize) -> WireResult<usize> {
    if m == 0 {
        return Err(WireError::DivisionByZero);
    }
    n.checked_next_multiple_of(m).ok_or_else(|| {
        WireError::malformed(format!("{n} rounded up to a multiple of {m} overflows"))
    })
}

/// Size in bytes of the bit-packed classical memory region.
pub fn memory_region_bytes(num_addresses: usize) -> usize {
    num_addresses.div_ceil(BITS_PER_OCTET)
}

/// Size in bytes of the amplitude region that follows the memory region.
///
/// Fails with [`WireError::MalformedResponse`] when the body is shorter than
/// the memory region or the remainder is not a whole number of amplitudes.
pub fn wavefunction_region_bytes(
    num_octets: usize,
    memory_region_bytes: usize,
) -> WireResult<usize> {
    let remainder = num_octets.checked_sub(memory_region_bytes).ok_or_else(|| {
        WireError::malformed(format!(
            "response has {num_octets} bytes but the memory region needs {memory_region_bytes}"
        ))
    })?;

    if remainder % AMPLITUDE_WIDTH != 0 {
        return Err(WireError::malformed(format!(
            "wavefunction region of {remainder} bytes is not a multiple of {AMPLITUDE_WIDTH}"
        )));
    }

    Ok(remainder)
}

/// Byte boundaries of one wavefunction response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseLayout {
    /// Bytes of bit-packed classical memory at the start of the stream.
    pub memory_bytes: usize,
    /// Bytes of packed amplitudes after the memory region.
    pub wavefunction_bytes: usize,
    /// Number of complex amplitudes.
    pub amplitude_count: usize,
}

impl ResponseLayout {
    /// Compute the layout for a body of `num_octets` bytes answering a
    /// request for `num_addresses` classical addresses.
    pub fn compute(num_octets: usize, num_addresses: usize) -> WireResult<Self> {
        let memory_bytes = memory_region_bytes(num_addresses);
        let wavefunction_bytes = wavefunction_region_bytes(num_octets, memory_bytes)?;

        Ok(Self {
            memory_bytes,
            wavefunction_bytes,
            amplitude_count: wavefunction_bytes / AMPLITUDE_WIDTH,
        })
    }

    /// Total body length described by this layout.
    pub fn total_bytes(&self) -> usize {
        self.memory_bytes + self.wavefunction_bytes
    }

    /// Byte offset of amplitude `index`.
    pub fn amplitude_offset(&self, index: usize) -> usize {
        self.memory_bytes + AMPLITUDE_WIDTH * index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_up_exact_multiple() {
        assert_eq!(round_up_to_multiple(16, 8).unwrap(), 16);
        assert_eq!(round_up_to_multiple(0, 8).unwrap(), 0);
    }

    #[test]
    fn test_round_up_partial() {
        assert_eq!(round_up_to_multiple(1, 8).unwrap(), 8);
        assert_eq!(round_up_to_multiple(9, 8).unwrap(), 16);
        assert_eq!(round_up_to_multiple(10, 3).unwrap(), 12);
    }

    #[test]
    fn test_round_up_zero_divisor() {
        assert_eq!(round_up_to_multiple(5, 0), Err(WireError::DivisionByZero));
    }

    #[test]
    fn test_round_up_overflow() {
        let err = round_up_to_multiple(usize::MAX - 3, 8).unwrap_err();
        assert!(matches!(err, WireError::MalformedResponse(_)));
        assert!(round_up_to_multiple(usize::MAX, 2).is_err());
        assert_eq!(round_up_to_multiple(usize::MAX, 1).unwrap(), usize::MAX);
    }

    #[test]
    fn test_memory_region_bytes_table() {
        for (n, expected) in [(0, 0), (1, 1), (7, 1), (8, 1), (9, 2), (16, 2)] {
            assert_eq!(memory_region_bytes(n), expected, "num_addresses = {n}");
        }
    }

    #[test]
    fn test_memory_region_matches_round_up() {
        for n in 0..100 {
            assert_eq!(
                memory_region_bytes(n),
                round_up_to_multiple(n, 8).unwrap() / 8
            );
        }
    }

    #[test]
    fn test_wavefunction_region_ok() {
        assert_eq!(wavefunction_region_bytes(33, 1).unwrap(), 32);
        assert_eq!(wavefunction_region_bytes(2, 2).unwrap(), 0);
    }

    #[test]
    fn test_wavefunction_region_not_divisible() {
        let err = wavefunction_region_bytes(20, 1).unwrap_err();
        assert!(matches!(err, WireError::MalformedResponse(_)));
    }

    #[test]
    fn test_wavefunction_region_too_short() {
        let err = wavefunction_region_bytes(1, 2).unwrap_err();
        assert!(matches!(err, WireError::MalformedResponse(_)));
    }

    #[test]
    fn test_layout_compute() {
        let layout = ResponseLayout::compute(1 + 4 * 16, 3).unwrap();
        assert_eq!(layout.memory_bytes, 1);
        assert_eq!(layout.wavefunction_bytes, 64);
        assert_eq!(layout.amplitude_count, 4);
        assert_eq!(layout.total_bytes(), 65);
        assert_eq!(layout.amplitude_offset(0), 1);
        assert_eq!(layout.amplitude_offset(2), 33);
    }

    #[test]
    fn test_layout_only_memory() {
        let layout = ResponseLayout::compute(2, 9).unwrap();
        assert_eq!(layout.amplitude_count, 0);
        assert_eq!(layout.memory_bytes, 2);
    }
}
