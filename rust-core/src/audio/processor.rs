//! Block processor - runs inside the real-time audio callback
//!
//! Per block: downmix → primary track; synthesize tone → mix into output →
//! tone track. Consumers read results through a [`SpectrumHandle`] and never
//! touch ingestion state.

use super::mixdown::downmix_into;
use super::params::EngineParams;
use super::tone::{mix_into_channels, ToneSynthesizer};
use crate::config::{EngineConfig, FFT_SIZE, NUM_BINS, TONE_FREQUENCY_HZ};
use crate::error::{validate_sample_rate, EngineError};
use crate::spectrum::{AnalysisTrack, SpectrumStore, TrackState};
use std::sync::Arc;

/// Longest stretch of a block processed at once; larger blocks are split
const MAX_CHUNK: usize = FFT_SIZE;

/// Consumer side of the engine: latest spectra and parameters
///
/// Cheap to clone and safe to use from any thread.
#[derive(Clone)]
pub struct SpectrumHandle {
    primary: SpectrumStore,
    tone: SpectrumStore,
    params: Arc<EngineParams>,
}

impl SpectrumHandle {
    /// Latest live-input spectrum, `NUM_BINS` magnitudes or empty before warm-up
    pub fn fetch_primary_spectrum(&self) -> Vec<f32> {
        self.primary.fetch()
    }

    /// Latest test-tone spectrum, `NUM_BINS` magnitudes or empty before warm-up
    pub fn fetch_tone_spectrum(&self) -> Vec<f32> {
        self.tone.fetch()
    }

    pub fn primary_store(&self) -> &SpectrumStore {
        &self.primary
    }

    pub fn tone_store(&self) -> &SpectrumStore {
        &self.tone
    }

    pub fn params(&self) -> &EngineParams {
        &self.params
    }

    pub fn set_sensitivity(&self, value: f32) {
        self.params.set_sensitivity(value);
    }

    pub fn set_sine_level(&self, value: f32) {
        self.params.set_sine_level(value);
    }
}

/// Real-time spectrum engine
pub struct SpectrumProcessor {
    primary: AnalysisTrack,
    tone_track: AnalysisTrack,
    tone: ToneSynthesizer,
    params: Arc<EngineParams>,

    /// Mono downmix of the current chunk
    mono_scratch: Vec<f32>,

    /// Tone samples of the current chunk
    tone_scratch: Vec<f32>,

    sample_rate: f64,

    /// False after an invalid sample rate; blocks then pass through untouched
    enabled: bool,
}

impl Default for SpectrumProcessor {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl SpectrumProcessor {
    /// Create new processor
    pub fn new(config: EngineConfig) -> Self {
        let params = Arc::new(EngineParams::new(config.sensitivity, config.sine_level));

        let mut processor = Self {
            primary: AnalysisTrack::new(SpectrumStore::with_capacity(NUM_BINS)),
            tone_track: AnalysisTrack::new(SpectrumStore::with_capacity(NUM_BINS)),
            tone: ToneSynthesizer::new(TONE_FREQUENCY_HZ, config.sample_rate),
            params,
            mono_scratch: vec![0.0; MAX_CHUNK],
            tone_scratch: vec![0.0; MAX_CHUNK],
            sample_rate: config.sample_rate,
            enabled: true,
        };

        if let Err(e) = processor.set_sample_rate(config.sample_rate) {
            log::warn!("Spectrum processor starts disabled: {}", e);
        }

        log::debug!(
            "Spectrum processor ready: fft_size={}, sample_rate={} Hz",
            FFT_SIZE,
            processor.sample_rate
        );

        processor
    }

    /// Handle for consumers (display, bindings, tests)
    pub fn handle(&self) -> SpectrumHandle {
        SpectrumHandle {
            primary: self.primary.store().clone(),
            tone: self.tone_track.store().clone(),
            params: Arc::clone(&self.params),
        }
    }

    /// Process one host block in place
    ///
    /// # Arguments
    /// * `channels` - Planar channel buffers; the tone is added to each
    /// * `num_samples` - Block length (clamped to the shortest channel)
    /// * `sample_rate` - Current host rate; a change resets both tracks
    pub fn process_block<C: AsMut<[f32]>>(
        &mut self,
        channels: &mut [C],
        num_samples: usize,
        sample_rate: f64,
    ) {
        if self.rate_changed(sample_rate) {
            self.on_sample_rate_changed(sample_rate);
        }
        if !self.enabled {
            return;
        }

        let num_samples = channels
            .iter_mut()
            .map(|c| c.as_mut().len())
            .fold(num_samples, usize::min);

        let mut start = 0;
        while start < num_samples {
            let len = (num_samples - start).min(MAX_CHUNK);
            self.process_chunk(channels, start, len);
            start += len;
        }
    }

    fn process_chunk<C: AsMut<[f32]>>(&mut self, channels: &mut [C], start: usize, len: usize) {
        let end = start + len;

        // Analysis sees the input before the tone is mixed in
        let mono = &mut self.mono_scratch[..len];
        match &mut *channels {
            [] => mono.fill(0.0),
            [only] => downmix_into(&[&only.as_mut()[start..end]], mono),
            [left, right, ..] => {
                downmix_into(&[&left.as_mut()[start..end], &right.as_mut()[start..end]], mono)
            }
        }
        self.primary.push(&self.mono_scratch[..len]);

        let tone = &mut self.tone_scratch[..len];
        self.tone.render_into(tone, self.params.sine_level());

        mix_into_channels(channels, start, &self.tone_scratch[..len]);

        self.tone_track.push(&self.tone_scratch[..len]);
    }

    /// Reset both tracks for a new host sample rate
    ///
    /// An invalid rate leaves the processor disabled (no analysis, no tone,
    /// empty spectra) until a valid one arrives.
    pub fn on_sample_rate_changed(&mut self, sample_rate: f64) {
        if let Err(e) = self.set_sample_rate(sample_rate) {
            log::warn!("Analysis disabled: {}", e);
        }
    }

    /// Like [`SpectrumProcessor::on_sample_rate_changed`], reporting an
    /// invalid rate to the caller
    pub fn set_sample_rate(&mut self, sample_rate: f64) -> Result<(), EngineError> {
        self.primary.reset();
        self.tone_track.reset();
        self.tone.reset();
        self.sample_rate = sample_rate;

        match validate_sample_rate(sample_rate) {
            Ok(rate) => {
                self.tone.set_sample_rate(rate);
                if !self.enabled {
                    log::info!("Analysis re-enabled at {} Hz", rate);
                }
                self.enabled = true;
                log::debug!("Analysis tracks reset for {} Hz", rate);
                Ok(())
            }
            Err(e) => {
                self.enabled = false;
                Err(e)
            }
        }
    }

    /// NaN compares equal to NaN here so a bad rate resets only once
    fn rate_changed(&self, sample_rate: f64) -> bool {
        sample_rate != self.sample_rate && !(sample_rate.is_nan() && self.sample_rate.is_nan())
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn params(&self) -> &EngineParams {
        &self.params
    }

    pub fn primary_state(&self) -> TrackState {
        self.primary.state()
    }

    pub fn tone_state(&self) -> TrackState {
        self.tone_track.state()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{HOP_SIZE, TONE_ATTENUATION};

    #[test]
    fn test_warm_up_then_spectra() {
        let mut processor = SpectrumProcessor::default();
        let handle = processor.handle();

        let mut left = vec![0.1; FFT_SIZE - 1];
        let mut right = vec![0.1; FFT_SIZE - 1];
        processor.process_block(&mut [&mut left[..], &mut right[..]], FFT_SIZE - 1, 44100.0);
        assert!(handle.fetch_primary_spectrum().is_empty());
        assert!(handle.fetch_tone_spectrum().is_empty());

        let mut left = vec![0.1; 1];
        let mut right = vec![0.1; 1];
        processor.process_block(&mut [&mut left[..], &mut right[..]], 1, 44100.0);
        assert_eq!(handle.fetch_primary_spectrum().len(), NUM_BINS);
        assert_eq!(handle.fetch_tone_spectrum().len(), NUM_BINS);
    }

    #[test]
    fn test_tone_mixed_into_every_channel() {
        let mut processor = SpectrumProcessor::new(EngineConfig {
            sine_level: 1.0,
            ..EngineConfig::default()
        });

        let mut left = vec![0.0; 256];
        let mut right = vec![1.0; 256];
        processor.process_block(&mut [&mut left[..], &mut right[..]], 256, 44100.0);

        let mut reference = ToneSynthesizer::default();
        for i in 0..256 {
            let s = reference.next_sample(1.0);
            assert!((left[i] - s).abs() < 1e-6);
            assert!((right[i] - (1.0 + s)).abs() < 1e-6);
        }
        assert!(left.iter().any(|&s| s.abs() > TONE_ATTENUATION * 0.9));
    }

    #[test]
    fn test_zero_sine_level_leaves_audio_untouched() {
        let mut processor = SpectrumProcessor::default();
        let input: Vec<f32> = (0..512).map(|i| (i as f32 * 0.01).sin()).collect();
        let mut mono = input.clone();

        processor.process_block(&mut [&mut mono[..]], 512, 44100.0);
        assert_eq!(mono, input);
    }

    #[test]
    fn test_no_input_channels_is_silence() {
        let mut processor = SpectrumProcessor::default();
        let handle = processor.handle();

        let mut channels: [&mut [f32]; 0] = [];
        processor.process_block(&mut channels, FFT_SIZE, 44100.0);

        let spectrum = handle.fetch_primary_spectrum();
        assert_eq!(spectrum.len(), NUM_BINS);
        assert!(spectrum.iter().all(|&m| m == 0.0));
    }

    #[test]
    fn test_large_block_is_chunked() {
        let mut processor = SpectrumProcessor::default();
        let handle = processor.handle();

        let mut mono = vec![0.0; 4 * FFT_SIZE];
        let n = mono.len();
        processor.process_block(&mut [&mut mono[..]], n, 44100.0);

        // One frame at warm-up, then one per hop
        let expected = 1 + (3 * FFT_SIZE) / HOP_SIZE;
        assert_eq!(handle.primary_store().generation(), expected as u64);
        assert_eq!(handle.tone_store().generation(), expected as u64);
    }

    #[test]
    fn test_sample_rate_change_resets() {
        let mut processor = SpectrumProcessor::default();
        let handle = processor.handle();

        let mut mono = vec![0.2; 2 * FFT_SIZE];
        let n = mono.len();
        processor.process_block(&mut [&mut mono[..]], n, 44100.0);
        assert!(!handle.fetch_primary_spectrum().is_empty());

        processor.on_sample_rate_changed(48000.0);
        assert!(handle.fetch_primary_spectrum().is_empty());
        assert!(handle.fetch_tone_spectrum().is_empty());
        assert_eq!(processor.primary_state(), TrackState::Empty);

        // A differing rate in process_block resets as well
        let n = mono.len();
        processor.process_block(&mut [&mut mono[..]], n, 48000.0);
        assert!(!handle.fetch_primary_spectrum().is_empty());
        let mut short = vec![0.2; 16];
        processor.process_block(&mut [&mut short[..]], 16, 96000.0);
        assert!(handle.fetch_primary_spectrum().is_empty());
    }

    #[test]
    fn test_invalid_sample_rate_disables() {
        let mut processor = SpectrumProcessor::default();
        let handle = processor.handle();
        handle.set_sine_level(1.0);

        assert!(processor.set_sample_rate(0.0).is_err());
        assert!(!processor.is_enabled());

        let mut mono = vec![0.0; 2 * FFT_SIZE];
        let n = mono.len();
        processor.process_block(&mut [&mut mono[..]], n, 0.0);
        assert!(mono.iter().all(|&s| s == 0.0));
        assert!(handle.fetch_primary_spectrum().is_empty());

        processor.on_sample_rate_changed(44100.0);
        assert!(processor.is_enabled());
        let n = mono.len();
        processor.process_block(&mut [&mut mono[..]], n, 44100.0);
        assert!(!handle.fetch_tone_spectrum().is_empty());
    }

    #[test]
    fn test_num_samples_clamped_to_channel_length() {
        let mut processor = SpectrumProcessor::default();
        let handle = processor.handle();

        let mut mono = vec![0.0; FFT_SIZE];
        processor.process_block(&mut [&mut mono[..]], 10 * FFT_SIZE, 44100.0);
        assert_eq!(handle.primary_store().generation(), 1);
    }
}
