//! Error types for the synthesis backend.

use thiserror::Error;

/// Result type for synthesis operations.
pub type SynthResult<T> = Result<T, SynthError>;

/// Errors raised by the validating entry points.
///
/// The plain generator never fails; these come from callers that check
/// their parameters first, such as the renderer.
#[derive(Debug, Error)]
pub enum SynthError {
    /// Frequency outside the representable range for the sample rate.
    #[error("invalid frequency: {freq} Hz (must be in (0, {nyquist}] Hz)")]
    InvalidFrequency {
        /// The rejected frequency.
        freq: f64,
        /// Half the sample rate.
        nyquist: f64,
    },

    /// Non-positive or non-finite duration.
    #[error("invalid duration: {duration} seconds (must be a positive number)")]
    InvalidDuration {
        /// The rejected duration.
        duration: f64,
    },

    /// Zero sample rate.
    #[error("invalid sample rate: {rate}")]
    InvalidSampleRate {
        /// The rejected sample rate.
        rate: u32,
    },

    /// I/O error while writing encoded audio.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SynthError {
    /// Stable error code for machine-readable output.
    pub fn code(&self) -> &'static str {
        match self {
            SynthError::InvalidFrequency { .. } => "SYNTH_001",
            SynthError::InvalidDuration { .. } => "SYNTH_002",
            SynthError::InvalidSampleRate { .. } => "SYNTH_003",
            SynthError::Io(_) => "SYNTH_004",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_frequency_message() {
        let err = SynthError::InvalidFrequency {
            freq: 30000.0,
            nyquist: 22050.0,
        };
        assert!(err.to_string().contains("30000"));
        assert!(err.to_string().contains("22050"));
        assert_eq!(err.code(), "SYNTH_001");
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err: SynthError = io.into();
        assert_eq!(err.code(), "SYNTH_004");
        assert!(err.to_string().contains("pipe closed"));
    }
}
