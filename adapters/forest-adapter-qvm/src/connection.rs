//! QVM connection: the caller-facing operations.

use std::time::Duration;

use tracing::{debug, info, instrument};

use forest_quil::Program;
use forest_wire::{MemoryBits, PaddingPolicy, Wavefunction};

use crate::api::{HttpTransport, QvmRequest, RawResponse, Transport};
use crate::config::{self, ForestConfig};
use crate::error::{QvmError, QvmResult};

/// A handle on the QVM service.
///
/// Every call performs exactly one round trip and fails on the first error;
/// nothing is retried.
///
/// # Example
///
/// ```ignore
/// use forest_adapter_qvm::{QvmConnection, set_api_key};
/// use forest_quil::Program;
///
/// set_api_key("my-key");
/// let qvm = QvmConnection::new()?;
///
/// let mut program = Program::new();
/// program.inst("H 0").inst("CNOT 0 1");
///
/// let (wavefunction, _) = qvm.wavefunction(&program, &[]).await?;
/// println!("{wavefunction}");
/// ```
pub struct QvmConnection<T = HttpTransport> {
    config: ForestConfig,
    transport: T,
    padding: PaddingPolicy,
}

impl<T> std::fmt::Debug for QvmConnection<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QvmConnection")
            .field("config", &self.config)
            .field("padding", &self.padding)
            .finish_non_exhaustive()
    }
}

impl QvmConnection<HttpTransport> {
    /// Connect using the process-wide configuration.
    pub fn new() -> QvmResult<Self> {
        Self::with_config(config::current()?)
    }

    /// Connect using an explicit configuration.
    pub fn with_config(config: ForestConfig) -> QvmResult<Self> {
        let transport = HttpTransport::new(Duration::from_secs(config.timeout_seconds))?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: Transport> QvmConnection<T> {
    /// Connect through a custom transport.
    pub fn with_transport(config: ForestConfig, transport: T) -> Self {
        Self {
            config,
            transport,
            padding: PaddingPolicy::default(),
        }
    }

    /// Choose how memory padding bits in wavefunction responses are checked.
    #[must_use]
    pub fn with_padding_policy(mut self, padding: PaddingPolicy) -> Self {
        self.padding = padding;
        self
    }

    /// The configuration this connection was built with.
    pub fn config(&self) -> &ForestConfig {
        &self.config
    }

    /// Send one request and reject non-2xx replies.
    async fn send(&self, request: &QvmRequest) -> QvmResult<RawResponse> {
        let api_key = self.config.require_api_key()?;
        self.transport
            .post(&self.config.endpoint, api_key, request)
            .await?
            .error_for_status()
    }

    /// Check that the QVM is reachable. Returns the server's reply text.
    #[instrument(skip(self))]
    pub async fn ping(&self) -> QvmResult<String> {
        let resp = self.send(&QvmRequest::ping()).await?;
        Ok(resp.text())
    }

    /// Query the QVM version string.
    #[instrument(skip(self))]
    pub async fn version(&self) -> QvmResult<String> {
        let resp = self.send(&QvmRequest::version()).await?;
        Ok(resp.text().trim().to_string())
    }

    /// Run `program` `trials` times, returning one row of bits per trial.
    ///
    /// Each row holds the values of `addresses`, in the same order.
    #[instrument(skip(self, program), fields(instructions = program.len()))]
    pub async fn run(
        &self,
        program: &Program,
        addresses: &[u64],
        trials: u32,
    ) -> QvmResult<Vec<Vec<u8>>> {
        if trials == 0 {
            return Err(QvmError::InvalidArgument(
                "trials must be at least 1".into(),
            ));
        }

        let resp = self
            .send(&QvmRequest::multishot(program, addresses, trials))
            .await?;
        let rows: Vec<Vec<u8>> = serde_json::from_slice(&resp.body)?;
        check_sample_shape(&rows, addresses.len(), trials)?;

        info!("Received {} trials from QVM", rows.len());
        Ok(rows)
    }

    /// Run `program` once and return the final state plus the requested
    /// classical memory bits.
    #[instrument(skip(self, program), fields(instructions = program.len()))]
    pub async fn wavefunction(
        &self,
        program: &Program,
        addresses: &[u64],
    ) -> QvmResult<(Wavefunction, MemoryBits)> {
        let resp = self
            .send(&QvmRequest::wavefunction(program, addresses))
            .await?;

        let num_octets = resp
            .content_length
            .ok_or(QvmError::MissingContentLength)?;
        let num_octets = usize::try_from(num_octets).map_err(|_| {
            QvmError::MalformedResponse(format!("content length {num_octets} too large"))
        })?;
        debug!(num_octets, "decoding wavefunction body");

        let (wavefunction, bits) =
            forest_wire::decode_with(&resp.body, num_octets, addresses, self.padding)?;

        info!(
            "Received wavefunction with {} amplitudes from QVM",
            wavefunction.len()
        );
        Ok((wavefunction, bits))
    }
}

/// Validate a multishot reply: `trials` rows of `width` 0/1 values.
fn check_sample_shape(rows: &[Vec<u8>], width: usize, trials: u32) -> QvmResult<()> {
    if rows.len() != trials as usize {
        return Err(QvmError::MalformedResponse(format!(
            "expected {trials} trials, got {}",
            rows.len()
        )));
    }
    for (i, row) in rows.iter().enumerate() {
        if row.len() != width {
            return Err(QvmError::MalformedResponse(format!(
                "trial {i} has {} bits, expected {width}",
                row.len()
            )));
        }
        if row.iter().any(|&b| b > 1) {
            return Err(QvmError::MalformedResponse(format!(
                "trial {i} contains a non-binary value"
            )));
        }
    }
    Ok(())
}
