//! Wavefunction response decoding.
//!
//! The QVM answers a wavefunction request with a single octet stream: the
//! requested classical memory bits (packed LSB-first, padded to a byte) followed
//! by one 16-byte big-endian `(re, im)` pair per basis state.

use std::fmt;

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{WireError, WireResult};
use crate::layout::ResponseLayout;
use crate::reader::{BITS_PER_OCTET, DOUBLE_WIDTH, decode_double, octet_bits};

/// Classical memory bits, one 0/1 entry per requested address.
pub type MemoryBits = Vec<u8>;

/// Amplitudes below this magnitude are omitted from the ket rendering.
const DISPLAY_EPSILON: f64 = 1e-12;

/// How to treat the unused bits that pad the memory region to a whole byte.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PaddingPolicy {
    /// Discard padding bits without looking at them.
    #[default]
    Ignore,
    /// Reject the response if any padding bit is set.
    RequireZero,
}

/// A quantum state as returned by the QVM, indexed by basis-state integer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wavefunction {
    amplitudes: Vec<Complex64>,
}

impl Wavefunction {
    /// Wrap a list of amplitudes.
    pub fn new(amplitudes: Vec<Complex64>) -> Self {
        Self { amplitudes }
    }

    /// The amplitudes in ascending basis-state order.
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Consume the wavefunction, returning its amplitudes.
    pub fn into_amplitudes(self) -> Vec<Complex64> {
        self.amplitudes
    }

    /// Number of basis states.
    pub fn len(&self) -> usize {
        self.amplitudes.len()
    }

    /// Whether the response carried no amplitudes.
    pub fn is_empty(&self) -> bool {
        self.amplitudes.is_empty()
    }

    /// Number of qubits, if the length is a power of two.
    pub fn num_qubits(&self) -> Option<u32> {
        let len = self.amplitudes.len();
        len.is_power_of_two().then(|| len.trailing_zeros())
    }

    /// Outcome probabilities `|a|²` in basis-state order.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(|a| a.norm_sqr()).collect()
    }
}

impl From<Vec<Complex64>> for Wavefunction {
    fn from(amplitudes: Vec<Complex64>) -> Self {
        Self::new(amplitudes)
    }
}

impl fmt::Display for Wavefunction {
    /// Renders as a ket sum, e.g. `(0.7071+0.0000i)|00> + (0.7071+0.0000i)|11>`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.num_qubits().map_or_else(
            || usize::BITS - self.amplitudes.len().saturating_sub(1).leading_zeros(),
            |n| n,
        ) as usize;

        let mut first = true;
        for (index, amp) in self.amplitudes.iter().enumerate() {
            if amp.norm() < DISPLAY_EPSILON {
                continue;
            }
            if !first {
                write!(f, " + ")?;
            }
            first = false;
            write!(f, "({:.4}{:+.4}i)|{index:0width$b}>", amp.re, amp.im)?;
        }

        if first {
            write!(f, "0")?;
        }
        Ok(())
    }
}

/// Decode a wavefunction response, ignoring memory padding bits.
///
/// `num_octets` is the byte count reported by the transport; it must match
/// the body length. Only the length of `addresses` matters for the layout.
pub fn decode(
    octets: &[u8],
    num_octets: usize,
    addresses: &[u64],
) -> WireResult<(Wavefunction, MemoryBits)> {
    decode_with(octets, num_octets, addresses, PaddingPolicy::Ignore)
}

/// Decode a wavefunction response with an explicit [`PaddingPolicy`].
pub fn decode_with(
    octets: &[u8],
    num_octets: usize,
    addresses: &[u64],
    padding: PaddingPolicy,
) -> WireResult<(Wavefunction, MemoryBits)> {
    if octets.len() != num_octets {
        return Err(WireError::malformed(format!(
            "declared length {num_octets} does not match body length {}",
            octets.len()
        )));
    }

    let num_addresses = addresses.len();
    let layout = ResponseLayout::compute(num_octets, num_addresses)?;
    debug!(
        num_octets,
        num_addresses,
        memory_bytes = layout.memory_bytes,
        amplitudes = layout.amplitude_count,
        "decoding wavefunction response"
    );

    let memory = &octets[..layout.memory_bytes];
    let mut bits: MemoryBits = memory.iter().flat_map(|&b| octet_bits(b)).collect();
    if padding == PaddingPolicy::RequireZero && bits[num_addresses..].iter().any(|&b| b != 0) {
        return Err(WireError::malformed(
            "non-zero padding bits in classical memory region",
        ));
    }
    bits.truncate(num_addresses);

    let amplitudes = (0..layout.amplitude_count)
        .map(|i| {
            let p = layout.amplitude_offset(i);
            let re = decode_double(&octets[p..p + DOUBLE_WIDTH])?;
            let im = decode_double(&octets[p + DOUBLE_WIDTH..p + 2 * DOUBLE_WIDTH])?;
            Ok(Complex64::new(re, im))
        })
        .collect::<WireResult<Vec<_>>>()?;

    Ok((Wavefunction::new(amplitudes), bits))
}

/// Encode amplitudes and memory bits into the QVM response layout.
///
/// Any non-zero entry in `memory_bits` is packed as a 1. This is the exact
/// inverse of [`decode`] and is what a QVM stand-in serves.
pub fn encode(amplitudes: &[Complex64], memory_bits: &[u8]) -> Vec<u8> {
    let layout_memory = memory_bits.len().div_ceil(BITS_PER_OCTET);
    let mut out = Vec::with_capacity(layout_memory + amplitudes.len() * 2 * DOUBLE_WIDTH);

    for chunk in memory_bits.chunks(BITS_PER_OCTET) {
        let byte = chunk
            .iter()
            .enumerate()
            .fold(0u8, |acc, (i, &bit)| acc | (u8::from(bit != 0) << i));
        out.push(byte);
    }

    for amp in amplitudes {
        out.extend_from_slice(&amp.re.to_be_bytes());
        out.extend_from_slice(&amp.im.to_be_bytes());
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_1_SQRT_2;

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    #[test]
    fn test_decode_bell_state_without_memory() {
        let h = 1.0 / 2.0_f64.sqrt();
        let amps = [c(h, 0.0), c(0.0, 0.0), c(0.0, 0.0), c(h, 0.0)];
        let octets = encode(&amps, &[]);
        assert_eq!(octets.len(), 64);

        let (wf, bits) = decode(&octets, 64, &[]).unwrap();
        assert_eq!(wf.len(), 4);
        let expected = [0.7071067811865475, 0.0, 0.0, 0.7071067811865475];
        for (amp, re) in wf.amplitudes().iter().zip(expected) {
            assert_eq!(amp.re.to_bits(), f64::to_bits(re));
            assert_eq!(amp.im.to_bits(), 0.0f64.to_bits());
        }
        assert!(bits.is_empty());
    }

    #[test]
    fn test_decode_two_memory_bits() {
        let mut octets = vec![0b0000_0011];
        octets.extend_from_slice(&1.0f64.to_be_bytes());
        octets.extend_from_slice(&0.0f64.to_be_bytes());

        let (wf, bits) = decode(&octets, octets.len(), &[0, 1]).unwrap();
        assert_eq!(bits, vec![1, 1]);
        assert_eq!(wf.amplitudes(), &[c(1.0, 0.0)]);
    }

    #[test]
    fn test_decode_memory_only() {
        let octets = [0b1010_0101, 0b0000_0001];
        let (wf, bits) = decode(&octets, 2, &[0, 1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
        assert!(wf.is_empty());
        assert_eq!(bits, vec![1, 0, 1, 0, 0, 1, 0, 1, 1]);
    }

    #[test]
    fn test_decode_rejects_partial_amplitude() {
        let octets = vec![0u8; 1 + 20];
        let err = decode(&octets, octets.len(), &[0]).unwrap_err();
        assert!(matches!(err, WireError::MalformedResponse(_)));
    }

    #[test]
    fn test_decode_rejects_length_mismatch() {
        let octets = vec![0u8; 32];
        let err = decode(&octets, 48, &[]).unwrap_err();
        assert!(matches!(err, WireError::MalformedResponse(_)));
    }

    #[test]
    fn test_decode_rejects_truncated_memory() {
        let err = decode(&[], 0, &[0]).unwrap_err();
        assert!(matches!(err, WireError::MalformedResponse(_)));
    }

    #[test]
    fn test_padding_ignored_by_default() {
        let octets = [0b1111_1101];
        let (_, bits) = decode(&octets, 1, &[0, 1]).unwrap();
        assert_eq!(bits, vec![1, 0]);
    }

    #[test]
    fn test_padding_require_zero() {
        let dirty = [0b1111_1101];
        let err = decode_with(&dirty, 1, &[0, 1], PaddingPolicy::RequireZero).unwrap_err();
        assert!(matches!(err, WireError::MalformedResponse(_)));

        let clean = [0b0000_0001];
        let (_, bits) = decode_with(&clean, 1, &[0, 1], PaddingPolicy::RequireZero).unwrap();
        assert_eq!(bits, vec![1, 0]);
    }

    #[test]
    fn test_encode_packs_lsb_first() {
        let octets = encode(&[], &[1, 0, 1]);
        assert_eq!(octets, vec![0b0000_0101]);
    }

    #[test]
    fn test_num_qubits() {
        assert_eq!(Wavefunction::new(vec![c(1.0, 0.0)]).num_qubits(), Some(0));
        assert_eq!(Wavefunction::new(vec![c(0.0, 0.0); 8]).num_qubits(), Some(3));
        assert_eq!(Wavefunction::new(vec![c(0.0, 0.0); 3]).num_qubits(), None);
        assert_eq!(Wavefunction::new(vec![]).num_qubits(), None);
    }

    #[test]
    fn test_probabilities() {
        let wf = Wavefunction::new(vec![c(FRAC_1_SQRT_2, 0.0), c(0.0, -FRAC_1_SQRT_2)]);
        let probs = wf.probabilities();
        assert!((probs[0] - 0.5).abs() < 1e-12);
        assert!((probs[1] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_display_ket() {
        let wf = Wavefunction::new(vec![
            c(FRAC_1_SQRT_2, 0.0),
            c(0.0, 0.0),
            c(0.0, 0.0),
            c(FRAC_1_SQRT_2, 0.0),
        ]);
        assert_eq!(wf.to_string(), "(0.7071+0.0000i)|00> + (0.7071+0.0000i)|11>");
    }

    #[test]
    fn test_display_zero_state() {
        let wf = Wavefunction::new(vec![c(0.0, 0.0); 2]);
        assert_eq!(wf.to_string(), "0");
    }
}
