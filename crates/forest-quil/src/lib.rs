//! Quil program builder
//!
//! The QVM accepts programs as plain Quil text, one instruction per line. This
//! crate only assembles that text; it does not parse or validate Quil.
//!
//! # Example
//!
//! ```
//! use forest_quil::Program;
//!
//! let mut program = Program::new();
//! program.inst("H 0").inst("CNOT 0 1").measure(0, 0).measure(1, 1);
//!
//! assert_eq!(
//!     program.out(),
//!     "H 0\nCNOT 0 1\nMEASURE 0 [0]\nMEASURE 1 [1]"
//! );
//! ```

mod program;

pub use program::Program;
