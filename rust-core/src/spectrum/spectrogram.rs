//! Consumer-side helpers for scrolling spectrogram displays
//!
//! Runs on the display thread. The engine keeps only the latest spectrum;
//! history lives here.

use super::store::SpectrumStore;
use crate::config::{DYNAMIC_RANGE_DB, TIME_COLUMNS};
use std::collections::VecDeque;

/// Magnitudes at or below this are treated as silence
const MAGNITUDE_FLOOR: f32 = 1.0e-12;

/// Tone bins quieter than this are not overlaid
const TONE_OVERLAY_THRESHOLD_DB: f32 = -60.0;

/// Linear magnitude to dB; silent bins map to twice the dynamic range below 0 dB
pub fn magnitude_to_db(magnitude: f32, dynamic_range_db: f32) -> f32 {
    if magnitude > MAGNITUDE_FLOOR {
        20.0 * magnitude.log10()
    } else {
        -2.0 * dynamic_range_db
    }
}

/// Map dB into a display level in [0, 1], scaled by sensitivity
pub fn normalized_level(db: f32, dynamic_range_db: f32, sensitivity: f32) -> f32 {
    let t = ((db + dynamic_range_db) / dynamic_range_db).clamp(0.0, 1.0);
    t * sensitivity.clamp(0.0, 1.0)
}

/// Overlay level for a tone-track bin, or `None` when it is below the overlay
/// threshold
pub fn tone_overlay_level(magnitude: f32, dynamic_range_db: f32) -> Option<f32> {
    if magnitude <= MAGNITUDE_FLOOR {
        return None;
    }
    let db = 20.0 * magnitude.log10();
    if db > TONE_OVERLAY_THRESHOLD_DB {
        Some(((db + dynamic_range_db) / dynamic_range_db).clamp(0.0, 1.0))
    } else {
        None
    }
}

/// One display column: primary levels plus optional tone overlay per bin
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpectrogramColumn {
    pub levels: Vec<f32>,
    pub tone: Vec<Option<f32>>,
}

/// Scrolling history of display columns, newest last
pub struct SpectrogramHistory {
    columns: VecDeque<SpectrogramColumn>,
    capacity: usize,
    dynamic_range_db: f32,

    primary_scratch: Vec<f32>,
    tone_scratch: Vec<f32>,
}

impl Default for SpectrogramHistory {
    fn default() -> Self {
        Self::new(TIME_COLUMNS, DYNAMIC_RANGE_DB)
    }
}

impl SpectrogramHistory {
    pub fn new(capacity: usize, dynamic_range_db: f32) -> Self {
        Self {
            columns: VecDeque::with_capacity(capacity),
            capacity,
            dynamic_range_db,
            primary_scratch: Vec::new(),
            tone_scratch: Vec::new(),
        }
    }

    /// Append a column built from raw magnitudes
    ///
    /// An empty primary spectrum means "nothing yet" and adds no column.
    /// Returns whether a column was added.
    pub fn push_spectra(&mut self, primary: &[f32], tone: &[f32], sensitivity: f32) -> bool {
        if primary.is_empty() || self.capacity == 0 {
            return false;
        }

        let range = self.dynamic_range_db;
        let levels = primary
            .iter()
            .map(|&mag| normalized_level(magnitude_to_db(mag, range), range, sensitivity))
            .collect();

        // A tone spectrum from a different configuration is ignored
        let tone = if tone.len() == primary.len() {
            tone.iter().map(|&mag| tone_overlay_level(mag, range)).collect()
        } else {
            vec![None; primary.len()]
        };

        if self.columns.len() == self.capacity {
            self.columns.pop_front();
        }
        self.columns.push_back(SpectrogramColumn { levels, tone });
        true
    }

    /// Poll both stores and append a column if the primary one has data
    pub fn poll(&mut self, primary: &SpectrumStore, tone: &SpectrumStore, sensitivity: f32) -> bool {
        let mut primary_buf = std::mem::take(&mut self.primary_scratch);
        let mut tone_buf = std::mem::take(&mut self.tone_scratch);

        let added = if primary.fetch_into(&mut primary_buf) {
            tone.fetch_into(&mut tone_buf);
            self.push_spectra(&primary_buf, &tone_buf, sensitivity)
        } else {
            false
        };

        self.primary_scratch = primary_buf;
        self.tone_scratch = tone_buf;
        added
    }

    /// Columns, oldest first
    pub fn columns(&self) -> impl Iterator<Item = &SpectrogramColumn> {
        self.columns.iter()
    }

    pub fn latest(&self) -> Option<&SpectrogramColumn> {
        self.columns.back()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn clear(&mut self) {
        self.columns.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_magnitude_to_db() {
        assert!((magnitude_to_db(1.0, 80.0)).abs() < 1e-6);
        assert!((magnitude_to_db(0.1, 80.0) + 20.0).abs() < 1e-4);
        assert_eq!(magnitude_to_db(0.0, 80.0), -160.0);
    }

    #[test]
    fn test_normalized_level() {
        assert_eq!(normalized_level(0.0, 80.0, 1.0), 1.0);
        assert_eq!(normalized_level(-40.0, 80.0, 1.0), 0.5);
        assert_eq!(normalized_level(-40.0, 80.0, 0.5), 0.25);
        assert_eq!(normalized_level(-200.0, 80.0, 1.0), 0.0);
        assert_eq!(normalized_level(20.0, 80.0, 1.0), 1.0);
    }

    #[test]
    fn test_tone_overlay_threshold() {
        assert_eq!(tone_overlay_level(0.0, 80.0), None);
        assert_eq!(tone_overlay_level(1.0e-4, 80.0), None); // -80 dB
        let level = tone_overlay_level(0.1, 80.0).unwrap(); // -20 dB
        assert!((level - 0.75).abs() < 1e-4);
    }

    #[test]
    fn test_history_scrolls() {
        let mut history = SpectrogramHistory::new(3, 80.0);
        for i in 0..5 {
            assert!(history.push_spectra(&[i as f32 + 1.0; 4], &[], 1.0));
        }
        assert_eq!(history.len(), 3);

        // 5.0 is above 0 dB and clamps to 1
        let latest = history.latest().unwrap();
        assert_eq!(latest.levels, vec![1.0; 4]);
        assert_eq!(latest.tone, vec![None; 4]);
    }

    #[test]
    fn test_empty_spectrum_adds_nothing() {
        let mut history = SpectrogramHistory::default();
        assert!(!history.push_spectra(&[], &[1.0], 1.0));
        assert!(history.is_empty());
    }

    #[test]
    fn test_poll_stores() {
        let primary = SpectrumStore::new();
        let tone = SpectrumStore::new();
        let mut history = SpectrogramHistory::new(10, 80.0);

        assert!(!history.poll(&primary, &tone, 1.0));

        primary.publish(&[0.01; 4]);
        tone.publish(&[0.0, 1.0, 0.0, 0.0]);
        assert!(history.poll(&primary, &tone, 1.0));

        let column = history.latest().unwrap();
        assert!((column.levels[0] - 0.5).abs() < 1e-4); // -40 dB
        assert_eq!(column.tone[0], None);
        assert_eq!(column.tone[1], Some(1.0));
    }
}
