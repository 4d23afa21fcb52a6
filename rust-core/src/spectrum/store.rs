//! Latest-spectrum hand-off between the audio thread and its readers
//!
//! The producer fills a private back buffer, then swaps it with the shared
//! front buffer under a mutex held only for the swap. Readers hold the same
//! mutex only while copying out. Neither side ever holds it across a
//! transform.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Default)]
struct Published {
    /// Latest complete spectrum; empty until the first publish
    bins: Vec<f32>,

    /// Number of publishes since creation
    generation: u64,
}

/// Thread-safe holder of the most recently computed spectrum
///
/// Cheap to clone; clones share the same slot.
#[derive(Clone, Default)]
pub struct SpectrumStore {
    front: Arc<Mutex<Published>>,
    generation: Arc<AtomicU64>,
}

impl SpectrumStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store whose front buffer can hold `num_bins` without growing
    pub fn with_capacity(num_bins: usize) -> Self {
        let store = Self::default();
        store.lock().bins.reserve(num_bins);
        store
    }

    /// Replace the stored spectrum with `back`, handing the previous buffer
    /// back through `back` for reuse
    ///
    /// Readers see either the old or the new spectrum, never a mix.
    pub fn publish_swap(&self, back: &mut Vec<f32>) {
        let generation = {
            let mut front = self.lock();
            std::mem::swap(&mut front.bins, back);
            front.generation += 1;
            front.generation
        };
        self.generation.store(generation, Ordering::Release);
    }

    /// Copy `spectrum` in as the latest value
    pub fn publish(&self, spectrum: &[f32]) {
        let mut back = spectrum.to_vec();
        self.publish_swap(&mut back);
    }

    /// Copy the latest spectrum into `out`, reusing its allocation
    ///
    /// Returns `false` and leaves `out` empty when nothing has been
    /// published since creation or the last clear.
    pub fn fetch_into(&self, out: &mut Vec<f32>) -> bool {
        out.clear();
        out.extend_from_slice(&self.lock().bins);
        !out.is_empty()
    }

    /// Copy of the latest spectrum (empty before the first publish)
    pub fn fetch(&self) -> Vec<f32> {
        let mut out = Vec::new();
        self.fetch_into(&mut out);
        out
    }

    /// Drop the stored spectrum; subsequent fetches return empty
    pub fn clear(&self) {
        self.lock().bins.clear();
    }

    /// A panicking reader cannot leave a torn value behind, so poisoning is
    /// ignored
    fn lock(&self) -> MutexGuard<'_, Published> {
        self.front.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Publishes since creation (never decreases, not reset by `clear`)
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_empty_before_publish() {
        let store = SpectrumStore::new();
        assert!(store.fetch().is_empty());
        assert_eq!(store.generation(), 0);

        let mut out = vec![1.0, 2.0];
        assert!(!store.fetch_into(&mut out));
        assert!(out.is_empty());
    }

    #[test]
    fn test_publish_then_fetch() {
        let store = SpectrumStore::with_capacity(4);
        store.publish(&[1.0, 2.0, 3.0, 4.0]);

        assert_eq!(store.fetch(), vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(store.generation(), 1);

        store.publish(&[5.0, 6.0, 7.0, 8.0]);
        assert_eq!(store.fetch(), vec![5.0, 6.0, 7.0, 8.0]);
        assert_eq!(store.generation(), 2);
    }

    #[test]
    fn test_publish_swap_returns_previous_buffer() {
        let store = SpectrumStore::new();
        let mut back = vec![1.0; 4];
        store.publish_swap(&mut back);
        assert!(back.is_empty());

        let mut back = vec![2.0; 4];
        store.publish_swap(&mut back);
        assert_eq!(back, vec![1.0; 4]);
    }

    #[test]
    fn test_clear() {
        let store = SpectrumStore::new();
        store.publish(&[1.0; 8]);
        store.clear();
        assert!(store.fetch().is_empty());
        assert_eq!(store.generation(), 1);
    }

    #[test]
    fn test_clones_share_state() {
        let store = SpectrumStore::new();
        let reader = store.clone();
        store.publish(&[0.5; 3]);
        assert_eq!(reader.fetch(), vec![0.5; 3]);
    }

    #[test]
    fn test_concurrent_fetch_never_tears() {
        let store = SpectrumStore::with_capacity(512);
        let writer = store.clone();

        let producer = thread::spawn(move || {
            let mut back = vec![0.0f32; 512];
            for tag in 1..=2000u32 {
                back.clear();
                back.resize(512, tag as f32);
                writer.publish_swap(&mut back);
            }
        });

        let mut out = Vec::with_capacity(512);
        let mut last_tag = 0.0f32;
        for _ in 0..5000 {
            if store.fetch_into(&mut out) {
                let tag = out[0];
                assert!(out.iter().all(|&v| v == tag));
                assert!(tag >= last_tag);
                last_tag = tag;
            }
        }

        producer.join().unwrap();
        assert_eq!(store.fetch(), vec![2000.0; 512]);
    }
}
