//! Windowed magnitude-only spectral analysis
//!
//! Combines a precomputed window table with the FFT engine. Deterministic:
//! the same frame always yields the same spectrum.

use super::fft::FftEngine;
use super::window::window_table;
use crate::config::AnalyzerConfig;
use crate::error::EngineError;

/// Real-time spectral analyzer for fixed-length frames
pub struct SpectralAnalyzer {
    config: AnalyzerConfig,
    fft_engine: FftEngine,

    /// Window coefficients, computed once
    window: Vec<f32>,
}

impl SpectralAnalyzer {
    /// Create new spectral analyzer
    pub fn new(config: AnalyzerConfig) -> Self {
        let fft_engine = FftEngine::new(config.fft_size);
        let window = window_table(config.window_type, config.fft_size, config.normalize_window);

        Self {
            config,
            fft_engine,
            window,
        }
    }

    /// Window `frame`, transform it and write `num_bins` magnitudes to `out`
    ///
    /// # Arguments
    /// * `frame` - Exactly `fft_size` time-domain samples
    /// * `out` - Exactly `num_bins` magnitude slots
    pub fn analyze_into(&mut self, frame: &[f32], out: &mut [f32]) -> Result<(), EngineError> {
        if frame.len() != self.config.fft_size {
            return Err(EngineError::FrameLength {
                expected: self.config.fft_size,
                actual: frame.len(),
            });
        }
        if out.len() != self.num_bins() {
            return Err(EngineError::FrameLength {
                expected: self.num_bins(),
                actual: out.len(),
            });
        }

        let input = self.fft_engine.input_mut();
        for ((dst, &s), &w) in input.iter_mut().zip(frame).zip(&self.window) {
            *dst = s * w;
        }

        self.fft_engine.transform_into(out)
    }

    /// Allocating convenience around [`SpectralAnalyzer::analyze_into`]
    pub fn analyze(&mut self, frame: &[f32]) -> Result<Vec<f32>, EngineError> {
        let mut spectrum = vec![0.0; self.num_bins()];
        self.analyze_into(frame, &mut spectrum)?;
        Ok(spectrum)
    }

    /// Get current configuration
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Window coefficients applied before each transform
    pub fn window(&self) -> &[f32] {
        &self.window
    }

    /// Get number of published magnitude bins
    pub fn num_bins(&self) -> usize {
        self.config.num_bins()
    }
}
