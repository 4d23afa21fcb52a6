//! One analysis track: frame buffer → analyzer → store
//!
//! The processor runs two of these (live input and test tone).

use super::analysis::SpectralAnalyzer;
use super::frame_buffer::{AnalysisBuffer, TrackState};
use super::store::SpectrumStore;
use crate::config::{AnalyzerConfig, HOP_SIZE};

pub struct AnalysisTrack {
    buffer: AnalysisBuffer,
    analyzer: SpectralAnalyzer,
    store: SpectrumStore,

    /// Frame scratch, `fft_size` samples
    frame: Vec<f32>,

    /// Spectrum being built; swapped into the store on publish
    back: Vec<f32>,

    /// Set when the analyzer rejected a frame; the track then stays silent
    faulted: bool,
}

impl AnalysisTrack {
    /// Create a track with the fixed analysis geometry
    pub fn new(store: SpectrumStore) -> Self {
        Self::with_config(AnalyzerConfig::default(), HOP_SIZE, store)
    }

    pub fn with_config(config: AnalyzerConfig, hop_size: usize, store: SpectrumStore) -> Self {
        let fft_size = config.fft_size;
        let num_bins = config.num_bins();

        Self {
            buffer: AnalysisBuffer::new(fft_size, hop_size),
            analyzer: SpectralAnalyzer::new(config),
            store,
            frame: vec![0.0; fft_size],
            back: vec![0.0; num_bins],
            faulted: false,
        }
    }

    /// Feed mono samples, analyzing and publishing every frame they complete
    ///
    /// Input is consumed up to each hop boundary in turn, so each frame
    /// covers the `fft_size` samples ending at its own hop rather than the
    /// end of the block.
    ///
    /// # Returns
    /// Number of spectra published
    pub fn push(&mut self, mut samples: &[f32]) -> usize {
        let mut published = 0;

        while !samples.is_empty() {
            let take = self.buffer.samples_until_ready().max(1).min(samples.len());
            self.buffer.push(&samples[..take]);
            samples = &samples[take..];

            while self.buffer.next_frame(&mut self.frame) {
                if self.analyze_and_publish() {
                    published += 1;
                }
            }
        }

        published
    }

    fn analyze_and_publish(&mut self) -> bool {
        if self.faulted {
            return false;
        }

        // Capacity survives swaps; allocates only on the first use of each buffer
        self.back.resize(self.analyzer.num_bins(), 0.0);

        match self.analyzer.analyze_into(&self.frame, &mut self.back) {
            Ok(()) => {
                self.store.publish_swap(&mut self.back);
                true
            }
            Err(e) => {
                log::error!("Spectral analysis disabled for this track: {}", e);
                self.faulted = true;
                false
            }
        }
    }

    /// Discard buffered samples and the published spectrum
    pub fn reset(&mut self) {
        self.buffer.reset();
        self.store.clear();
        self.faulted = false;
    }

    /// Store this track publishes to
    pub fn store(&self) -> &SpectrumStore {
        &self.store
    }

    /// Current lifecycle state
    pub fn state(&self) -> TrackState {
        self.buffer.state()
    }

    pub fn analyzer(&self) -> &SpectralAnalyzer {
        &self.analyzer
    }
}
