//! Error types
//!
//! None of these cross the real-time callback; the processor degrades to
//! "no spectrum available" instead.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Invalid sample rate: {0} Hz")]
    InvalidSampleRate(f64),

    #[error("Frame length mismatch: expected {expected} samples, got {actual}")]
    FrameLength { expected: usize, actual: usize },
}

/// Errors from the live audio host
#[cfg(feature = "standalone")]
#[derive(Error, Debug)]
pub enum AudioError {
    #[error("No audio device found")]
    NoDevice,

    #[error("Failed to get device name: {0}")]
    DeviceName(String),

    #[error("Failed to get default config: {0}")]
    DefaultConfig(String),

    #[error("Failed to build stream: {0}")]
    BuildStream(String),

    #[error("Failed to play stream: {0}")]
    PlayStream(String),

    #[error("Unsupported sample format: {0}")]
    UnsupportedFormat(String),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Validate a host sample rate
pub fn validate_sample_rate(sample_rate: f64) -> Result<f64, EngineError> {
    if sample_rate.is_finite() && sample_rate > 0.0 {
        Ok(sample_rate)
    } else {
        Err(EngineError::InvalidSampleRate(sample_rate))
    }
}
