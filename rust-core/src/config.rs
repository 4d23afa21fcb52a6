//! Engine configuration
//!
//! Analysis geometry is fixed at build time; only the sample rate and the two
//! user parameters vary at runtime.

use crate::spectrum::window::WindowType;

/// FFT order (2^10 = 1024)
pub const FFT_ORDER: usize = 10;

/// Samples per analysis frame
pub const FFT_SIZE: usize = 1 << FFT_ORDER;

/// New samples between consecutive frames (75% overlap)
pub const HOP_SIZE: usize = FFT_SIZE / 4;

/// Magnitude bins published per spectrum (DC up to, not including, Nyquist)
pub const NUM_BINS: usize = FFT_SIZE / 2;

/// Test tone frequency in Hz
pub const TONE_FREQUENCY_HZ: f64 = 440.0;

/// Fixed headroom scale applied to the test tone
pub const TONE_ATTENUATION: f32 = 0.2;

/// Sample rate assumed until the host reports one
pub const DEFAULT_SAMPLE_RATE: f64 = 44100.0;

/// Spectrogram width in columns for scrolling displays
pub const TIME_COLUMNS: usize = 300;

/// Displayed dynamic range below 0 dB
pub const DYNAMIC_RANGE_DB: f32 = 80.0;

/// Rate at which a display is expected to poll the stores
pub const CONSUMER_REFRESH_HZ: u32 = 45;

/// Runtime engine configuration
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Sample rate in Hz
    pub sample_rate: f64,

    /// Visual gain in [0, 1]
    pub sensitivity: f32,

    /// Test tone level in [0, 1]
    pub sine_level: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            sensitivity: 1.0,
            sine_level: 0.0,
        }
    }
}

/// Spectral analyzer configuration
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// Frame length in samples (power of 2)
    pub fft_size: usize,

    /// Analysis window
    pub window_type: WindowType,

    /// Scale the window table so its coefficients sum to `fft_size`
    pub normalize_window: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            fft_size: FFT_SIZE,
            window_type: WindowType::Hann,
            normalize_window: true,
        }
    }
}

impl AnalyzerConfig {
    /// Number of magnitude bins this configuration produces
    pub fn num_bins(&self) -> usize {
        self.fft_size / 2
    }
}

/// Bin index to centre frequency in Hz
pub fn bin_to_hz(bin: usize, sample_rate: f64) -> f64 {
    bin as f64 * sample_rate / FFT_SIZE as f64
}

/// Centre frequencies of all published bins
pub fn frequency_bins_hz(sample_rate: f64) -> Vec<f64> {
    (0..NUM_BINS).map(|bin| bin_to_hz(bin, sample_rate)).collect()
}
