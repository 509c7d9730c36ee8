//! Forest Adapter for the Rigetti QVM
//!
//! This crate is the network-facing half of the Forest client. It builds the
//! JSON requests the QVM understands, sends them over HTTPS, and hands
//! wavefunction bodies to [`forest_wire`] for decoding.
//!
//! # Operations
//!
//! | Method | Request `type` | Reply |
//! |--------|----------------|-------|
//! | [`QvmConnection::ping`] | `ping` | text |
//! | [`QvmConnection::version`] | `version` | text |
//! | [`QvmConnection::run`] | `multishot` | JSON `[[bit, ...], ...]`, one row per trial |
//! | [`QvmConnection::wavefunction`] | `wavefunction` | binary memory bits + amplitudes |
//!
//! # Authentication
//!
//! The QVM requires an API key, sent as the `X-Api-Key` header. Provide it in
//! any of these ways (first match wins):
//!
//! ```bash
//! # 1. in code:            forest_adapter_qvm::set_api_key("...")
//! # 2. environment:        export FOREST_API_KEY="..."
//! # 3. ~/.forest_config.yaml:
//! api_key: "..."
//! endpoint: "https://api.rigetti.com/qvm"
//! ```
//!
//! A missing key fails with [`QvmError::MissingApiKey`] before anything is
//! sent.
//!
//! # Example
//!
//! ```ignore
//! use forest_adapter_qvm::QvmConnection;
//! use forest_quil::Program;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let qvm = QvmConnection::new()?;
//!
//!     let mut program = Program::new();
//!     program.inst("X 0").measure(0, 0);
//!
//!     let shots = qvm.run(&program, &[0], 10).await?;
//!     println!("{shots:?}");
//!
//!     let (wavefunction, bits) = qvm.wavefunction(&program, &[0]).await?;
//!     println!("{wavefunction}  memory={bits:?}");
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
mod connection;
mod error;

pub use api::{HttpTransport, QvmRequest, RawResponse, Transport};
pub use config::{
    ForestConfig, current as current_config, reset as reset_config, set_api_key, set_endpoint,
};
pub use connection::QvmConnection;
pub use error::{ErrorKind, QvmError, QvmResult};

// Re-export decoded types for convenience.
pub use forest_wire::{MemoryBits, PaddingPolicy, Wavefunction};
