//! CLI command implementations.

pub mod common;
pub mod config;
pub mod ping;
pub mod run;
pub mod version;
pub mod wavefunction;
