//! Audio ingestion, test tone and the block processor

pub mod mixdown;
pub mod tone;
pub mod params;
pub mod processor;

#[cfg(feature = "standalone")]
pub mod buffer;
#[cfg(feature = "standalone")]
pub mod input;
#[cfg(feature = "standalone")]
pub mod output;
#[cfg(feature = "standalone")]
pub mod host;

pub use params::EngineParams;
pub use processor::{SpectrumHandle, SpectrumProcessor};
pub use tone::ToneSynthesizer;

#[cfg(feature = "standalone")]
pub use buffer::AudioRingBuffer;
#[cfg(feature = "standalone")]
pub use host::LiveHost;
