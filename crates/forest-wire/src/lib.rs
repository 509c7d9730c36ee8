//! Forest QVM wire codec
//!
//! Decodes the binary body the QVM returns for a wavefunction request. The
//! body has no framing: its split into a classical memory region and an
//! amplitude region is inferred from the number of requested addresses and
//! the total byte count.
//!
//! ```text
//!  byte 0                   mem_bytes          mem_bytes + 16       ...
//!  ┌───────────────────────┬──────────────────┬──────────────────┬─────
//!  │ memory bits, LSB-first│ re₀ (f64 BE) im₀ │ re₁ (f64 BE) im₁ │ ...
//!  └───────────────────────┴──────────────────┴──────────────────┴─────
//!  mem_bytes = ceil(len(addresses) / 8)
//! ```
//!
//! # Example
//!
//! ```
//! use forest_wire::{decode, encode};
//! use num_complex::Complex64;
//!
//! let amps = [Complex64::new(0.0, 1.0), Complex64::new(0.0, 0.0)];
//! let body = encode(&amps, &[1, 0, 1]);
//!
//! let (wavefunction, bits) = decode(&body, body.len(), &[0, 1, 2]).unwrap();
//! assert_eq!(wavefunction.amplitudes(), &amps);
//! assert_eq!(bits, vec![1, 0, 1]);
//! ```

pub mod error;
pub mod layout;
pub mod reader;
pub mod wavefunction;

pub use error::{WireError, WireResult};
pub use layout::{
    AMPLITUDE_WIDTH, ResponseLayout, memory_region_bytes, round_up_to_multiple,
    wavefunction_region_bytes,
};
pub use reader::{decode_double, octet_bits};
pub use wavefunction::{MemoryBits, PaddingPolicy, Wavefunction, decode, decode_with, encode};
