//! Message types for the streaming endpoint.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Error codes sent to clients. Stable across releases.
pub mod error_codes {
    /// The frame was not valid JSON.
    pub const INVALID_JSON: &str = "WS_001";
    /// A binary frame did not hold UTF-8 text.
    pub const BINARY_NOT_UTF8: &str = "WS_002";
    /// The response could not be serialized.
    pub const JSON_SERIALIZE: &str = "WS_003";
    /// The frame was valid JSON but not an object.
    pub const NOT_AN_OBJECT: &str = "WS_004";
}

/// Inbound request. Unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FrequencyRequest {
    /// Requested frequency in Hz. Kept as raw JSON so that a missing,
    /// `null` or non-numeric value can fall back to the default.
    #[serde(default)]
    pub frequency: Option<Value>,
}

impl FrequencyRequest {
    /// The requested frequency, or `default` when absent or not a number.
    pub fn frequency_or(&self, default: f64) -> f64 {
        self.frequency
            .as_ref()
            .and_then(Value::as_f64)
            .unwrap_or(default)
    }
}

/// Outbound waveform.
#[derive(Debug, Serialize)]
pub struct WaveformResponse<'a> {
    /// Samples in `[-0.5, 0.5]`.
    pub waveform: &'a [f64],
}

/// Outbound error for frames that could not be understood.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

/// Error details.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    /// Stable error code (see [`error_codes`]).
    pub code: String,
    /// Human-readable message.
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            error: ErrorBody {
                code: code.to_string(),
                message: message.into(),
            },
        }
    }

    /// Serializes to JSON, falling back to a fixed literal if that fails.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            r#"{"error":{"code":"WS_003","message":"Failed to serialize response"}}"#.to_string()
        })
    }
}
