//! Runtime parameters shared between the host/UI and the audio thread
//!
//! Stored as f32 bit patterns in atomics so reads on the audio thread never
//! block.

use std::sync::atomic::{AtomicU32, Ordering};

/// Clamp a parameter into [0, 1]; NaN becomes 0
pub fn clamp_unit(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

#[derive(Debug)]
struct AtomicParam(AtomicU32);

impl AtomicParam {
    fn new(value: f32) -> Self {
        Self(AtomicU32::new(clamp_unit(value).to_bits()))
    }

    fn load(&self) -> f32 {
        f32::from_bits(self.0.load(Ordering::Relaxed))
    }

    fn store(&self, value: f32) {
        self.0.store(clamp_unit(value).to_bits(), Ordering::Relaxed);
    }
}

/// Sensitivity and sine level, each in [0, 1]
#[derive(Debug)]
pub struct EngineParams {
    /// Visual gain applied by displays
    sensitivity: AtomicParam,

    /// Linear level of the test tone
    sine_level: AtomicParam,
}

impl Default for EngineParams {
    fn default() -> Self {
        Self::new(1.0, 0.0)
    }
}

impl EngineParams {
    pub fn new(sensitivity: f32, sine_level: f32) -> Self {
        Self {
            sensitivity: AtomicParam::new(sensitivity),
            sine_level: AtomicParam::new(sine_level),
        }
    }

    pub fn sensitivity(&self) -> f32 {
        self.sensitivity.load()
    }

    /// Set sensitivity, clamped to [0, 1]
    pub fn set_sensitivity(&self, value: f32) {
        self.sensitivity.store(value);
    }

    pub fn sine_level(&self) -> f32 {
        self.sine_level.load()
    }

    /// Set sine level, clamped to [0, 1]
    pub fn set_sine_level(&self, value: f32) {
        self.sine_level.store(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = EngineParams::default();
        assert_eq!(params.sensitivity(), 1.0);
        assert_eq!(params.sine_level(), 0.0);
    }

    #[test]
    fn test_clamping() {
        let params = EngineParams::new(3.0, -1.0);
        assert_eq!(params.sensitivity(), 1.0);
        assert_eq!(params.sine_level(), 0.0);

        params.set_sine_level(0.75);
        assert_eq!(params.sine_level(), 0.75);

        params.set_sine_level(1.5);
        assert_eq!(params.sine_level(), 1.0);

        params.set_sensitivity(f32::NAN);
        assert_eq!(params.sensitivity(), 0.0);
    }
}
