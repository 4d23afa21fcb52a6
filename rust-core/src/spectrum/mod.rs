//! Spectral analysis with FFT

pub mod window;
pub mod fft;
pub mod analysis;
pub mod frame_buffer;
pub mod store;
pub mod track;
pub mod spectrogram;

pub use fft::FftEngine;
pub use window::WindowType;
pub use analysis::SpectralAnalyzer;
pub use frame_buffer::{AnalysisBuffer, TrackState};
pub use store::SpectrumStore;
pub use track::AnalysisTrack;
pub use spectrogram::SpectrogramHistory;
