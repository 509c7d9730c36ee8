//! QVM REST API: request payloads and HTTP transport.
//!
//! Every operation is a single `POST` of a JSON object tagged by `"type"` to
//! the QVM endpoint, authenticated with an `X-Api-Key` header.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::ACCEPT;
use serde::Serialize;
use tracing::debug;

use forest_quil::Program;

use crate::error::{QvmError, QvmResult};

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "X-Api-Key";

/// A request body understood by the QVM.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum QvmRequest {
    /// Liveness check.
    Ping,

    /// Server version query.
    Version,

    /// Run a program `trials` times and return the sampled memory bits.
    Multishot {
        /// Classical addresses to read back after each trial.
        addresses: Vec<u64>,
        /// Number of repetitions.
        trials: u32,
        /// Program text.
        #[serde(rename = "quil-instructions")]
        quil_instructions: String,
    },

    /// Run a program once and return the final state vector.
    Wavefunction {
        /// Classical addresses to read back.
        addresses: Vec<u64>,
        /// Program text.
        #[serde(rename = "quil-instructions")]
        quil_instructions: String,
    },
}

impl QvmRequest {
    /// Build a ping request.
    pub fn ping() -> Self {
        Self::Ping
    }

    /// Build a version request.
    pub fn version() -> Self {
        Self::Version
    }

    /// Build a multishot request.
    pub fn multishot(program: &Program, addresses: &[u64], trials: u32) -> Self {
        Self::Multishot {
            addresses: addresses.to_vec(),
            trials,
            quil_instructions: program.out(),
        }
    }

    /// Build a wavefunction request.
    pub fn wavefunction(program: &Program, addresses: &[u64]) -> Self {
        Self::Wavefunction {
            addresses: addresses.to_vec(),
            quil_instructions: program.out(),
        }
    }

    /// Short name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Ping => "ping",
            Self::Version => "version",
            Self::Multishot { .. } => "multishot",
            Self::Wavefunction { .. } => "wavefunction",
        }
    }

    /// Media type the reply is expected in.
    pub fn accept(&self) -> &'static str {
        match self {
            Self::Ping | Self::Version => "text/plain",
            Self::Multishot { .. } => "application/json",
            Self::Wavefunction { .. } => "application/octet-stream",
        }
    }
}

/// A fully buffered reply from the QVM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// Value of the `Content-Length` header, if the server sent one.
    pub content_length: Option<u64>,
    /// Response body.
    pub body: Vec<u8>,
}

impl RawResponse {
    /// A 200 response with an exact content length.
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        let body = body.into();
        Self {
            status: 200,
            content_length: Some(body.len() as u64),
            body,
        }
    }

    /// Whether the status is 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as text, replacing invalid UTF-8.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Turn a non-2xx response into [`QvmError::ApiError`].
    pub fn error_for_status(self) -> QvmResult<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(QvmError::ApiError {
                status: self.status,
                message: self.text(),
            })
        }
    }
}

/// Performs one request/response round trip with the QVM.
#[async_trait]
pub trait Transport: Send + Sync {
    /// POST `request` to `endpoint` and buffer the full reply.
    ///
    /// Implementations return non-2xx replies as data; status checking is
    /// left to the caller.
    async fn post(
        &self,
        endpoint: &str,
        api_key: &str,
        request: &QvmRequest,
    ) -> QvmResult<RawResponse>;
}

/// [`Transport`] over HTTPS using `reqwest`.
///
/// Idle connections are not kept: every call opens its own connection.
pub struct HttpTransport {
    client: Client,
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport").finish_non_exhaustive()
    }
}

impl HttpTransport {
    /// Create a transport with the given overall request timeout.
    pub fn new(timeout: Duration) -> QvmResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .pool_max_idle_per_host(0)
            .build()
            .map_err(QvmError::Http)?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(
        &self,
        endpoint: &str,
        api_key: &str,
        request: &QvmRequest,
    ) -> QvmResult<RawResponse> {
        debug!("POST {} ({})", endpoint, request.kind());

        let resp = self
            .client
            .post(endpoint)
            .header(API_KEY_HEADER, api_key)
            .header(ACCEPT, request.accept())
            .json(request)
            .send()
            .await?;

        let status = resp.status().as_u16();
        let content_length = resp.content_length();
        let body = resp.bytes().await?.to_vec();
        debug!(status, bytes = body.len(), "QVM response received");

        Ok(RawResponse {
            status,
            content_length,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ping_payload() {
        let value = serde_json::to_value(QvmRequest::ping()).unwrap();
        assert_eq!(value, json!({ "type": "ping" }));
    }

    #[test]
    fn test_version_payload() {
        let value = serde_json::to_value(QvmRequest::version()).unwrap();
        assert_eq!(value, json!({ "type": "version" }));
    }

    #[test]
    fn test_multishot_payload() {
        let program = Program::from("H 0\nMEASURE 0 [0]");
        let value = serde_json::to_value(QvmRequest::multishot(&program, &[0, 1], 10)).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "multishot",
                "addresses": [0, 1],
                "trials": 10,
                "quil-instructions": "H 0\nMEASURE 0 [0]",
            })
        );
    }

    #[test]
    fn test_wavefunction_payload() {
        let program = Program::from("X 0");
        let value = serde_json::to_value(QvmRequest::wavefunction(&program, &[])).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "wavefunction",
                "addresses": [],
                "quil-instructions": "X 0",
            })
        );
    }

    #[test]
    fn test_accept_types() {
        let program = Program::new();
        assert_eq!(
            QvmRequest::wavefunction(&program, &[]).accept(),
            "application/octet-stream"
        );
        assert_eq!(
            QvmRequest::multishot(&program, &[], 1).accept(),
            "application/json"
        );
        assert_eq!(QvmRequest::ping().accept(), "text/plain");
    }

    #[test]
    fn test_raw_response_ok() {
        let resp = RawResponse::ok(b"pong".to_vec());
        assert!(resp.is_success());
        assert_eq!(resp.content_length, Some(4));
        assert_eq!(resp.text(), "pong");
    }

    #[test]
    fn test_error_for_status() {
        let resp = RawResponse {
            status: 403,
            content_length: None,
            body: b"bad key".to_vec(),
        };
        match resp.error_for_status() {
            Err(QvmError::ApiError { status, message }) => {
                assert_eq!(status, 403);
                assert_eq!(message, "bad key");
            }
            other => panic!("expected ApiError, got {other:?}"),
        }
    }
}
