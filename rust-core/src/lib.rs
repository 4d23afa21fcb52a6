//! Tele Spectrum - real-time spectral analysis core
//!
//! Ingests audio blocks inside the host's real-time callback, publishes the
//! latest windowed-FFT magnitude spectrum of the live input and of a
//! synthesized test tone, and hands both to a display thread.

// Suppress PyO3 non-local impl warnings (harmless macro-generated code)
#![cfg_attr(feature = "python", allow(non_local_definitions))]

pub mod audio;
pub mod config;
pub mod error;
pub mod spectrum;

#[cfg(feature = "python")]
pub mod python_bindings;

pub use audio::{EngineParams, SpectrumHandle, SpectrumProcessor};
pub use config::{EngineConfig, FFT_SIZE, HOP_SIZE, NUM_BINS};
pub use error::EngineError;
pub use spectrum::{SpectralAnalyzer, SpectrumStore};
