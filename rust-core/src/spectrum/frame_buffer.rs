//! Sliding analysis window with hop-based frame triggering
//!
//! Samples land in a fixed-capacity circular buffer holding the latest
//! `fft_size` samples. Trimming the oldest hop is an index update, so `push`
//! and frame extraction cost O(samples moved) and never allocate.

/// Lifecycle of one analysis track
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackState {
    /// Nothing pushed since construction or the last reset
    Empty,
    /// Accumulating, fewer than `fft_size` samples seen
    Warming,
    /// Every hop yields one frame
    Steady,
}

/// Mono sample accumulator feeding one spectral analyzer
pub struct AnalysisBuffer {
    /// Latest samples, oldest at `write_pos` once full
    ring: Vec<f32>,

    /// Next write index into `ring`
    write_pos: usize,

    /// Physically valid samples in `ring` (saturates at `fft_size`)
    filled: usize,

    /// Logical accumulator length; drops by one hop per consumed frame
    retained: usize,

    /// Samples pushed since the last consumed frame
    hop_counter: usize,

    fft_size: usize,
    hop_size: usize,
}

impl AnalysisBuffer {
    /// Create an empty buffer
    ///
    /// # Arguments
    /// * `fft_size` - Frame length in samples
    /// * `hop_size` - New samples per frame (1..=fft_size)
    pub fn new(fft_size: usize, hop_size: usize) -> Self {
        debug_assert!(fft_size > 0);
        debug_assert!(hop_size > 0 && hop_size <= fft_size);

        Self {
            ring: vec![0.0; fft_size],
            write_pos: 0,
            filled: 0,
            retained: 0,
            hop_counter: 0,
            fft_size,
            hop_size,
        }
    }

    /// Append mono samples and advance the hop counter
    pub fn push(&mut self, samples: &[f32]) {
        let n = samples.len();
        if n == 0 {
            return;
        }

        self.retained = self.retained.saturating_add(n);
        self.hop_counter = self.hop_counter.saturating_add(n);

        // Anything older than one frame would be overwritten anyway
        let tail = if n > self.fft_size {
            &samples[n - self.fft_size..]
        } else {
            samples
        };

        let first = tail.len().min(self.fft_size - self.write_pos);
        self.ring[self.write_pos..self.write_pos + first].copy_from_slice(&tail[..first]);
        let rest = tail.len() - first;
        self.ring[..rest].copy_from_slice(&tail[first..]);

        self.write_pos = (self.write_pos + tail.len()) % self.fft_size;
        self.filled = (self.filled + tail.len()).min(self.fft_size);
    }

    /// Number of frames that should be computed now
    ///
    /// `floor(hop_counter / hop_size)`, capped so that every consumed frame
    /// leaves at least `fft_size` samples in the logical accumulator.
    pub fn ready_frames(&self) -> usize {
        if self.retained < self.fft_size || self.hop_counter < self.hop_size {
            return 0;
        }

        let by_hop = self.hop_counter / self.hop_size;
        let by_length = (self.retained - self.fft_size) / self.hop_size + 1;
        by_hop.min(by_length)
    }

    /// Samples still needed before the next frame becomes ready (0 = ready now)
    pub fn samples_until_ready(&self) -> usize {
        let for_length = self.fft_size.saturating_sub(self.retained);
        let for_hop = self.hop_size.saturating_sub(self.hop_counter);
        for_length.max(for_hop)
    }

    /// Consume one ready frame, copying the latest `fft_size` samples into `out`
    /// in chronological order
    ///
    /// Returns `false` (leaving `out` untouched) when no frame is ready.
    pub fn next_frame(&mut self, out: &mut [f32]) -> bool {
        if self.ready_frames() == 0 || out.len() != self.fft_size {
            return false;
        }

        self.copy_latest(out);

        self.hop_counter -= self.hop_size;
        self.retained -= self.hop_size;
        true
    }

    /// Copy the most recent `fft_size` samples, oldest first
    fn copy_latest(&self, out: &mut [f32]) {
        // Full ring: the oldest sample sits at the write position
        let older = &self.ring[self.write_pos..];
        let newer = &self.ring[..self.write_pos];
        out[..older.len()].copy_from_slice(older);
        out[older.len()..].copy_from_slice(newer);
    }

    /// Discard all samples and return to the empty state
    pub fn reset(&mut self) {
        self.ring.fill(0.0);
        self.write_pos = 0;
        self.filled = 0;
        self.retained = 0;
        self.hop_counter = 0;
    }

    /// Current lifecycle state
    pub fn state(&self) -> TrackState {
        if self.filled == self.fft_size {
            TrackState::Steady
        } else if self.retained == 0 {
            TrackState::Empty
        } else {
            TrackState::Warming
        }
    }

    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    pub fn hop_size(&self) -> usize {
        self.hop_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(start: usize, len: usize) -> Vec<f32> {
        (start..start + len).map(|i| i as f32).collect()
    }

    #[test]
    fn test_warm_up() {
        let mut buf = AnalysisBuffer::new(16, 4);
        assert_eq!(buf.state(), TrackState::Empty);

        buf.push(&ramp(0, 15));
        assert_eq!(buf.state(), TrackState::Warming);
        assert_eq!(buf.ready_frames(), 0);
        assert_eq!(buf.samples_until_ready(), 1);

        buf.push(&ramp(15, 1));
        assert_eq!(buf.state(), TrackState::Steady);
        assert_eq!(buf.ready_frames(), 1);
    }

    #[test]
    fn test_frame_is_latest_window() {
        let mut buf = AnalysisBuffer::new(8, 2);
        let mut frame = vec![0.0; 8];

        // Wraps the ring several times
        for chunk in 0..7 {
            buf.push(&ramp(chunk * 3, 3));
        }
        // 21 samples pushed; the frame must be samples 13..21
        assert!(buf.next_frame(&mut frame));
        assert_eq!(frame, ramp(13, 8));
    }

    #[test]
    fn test_hop_cadence() {
        let mut buf = AnalysisBuffer::new(16, 4);
        let mut frame = vec![0.0; 16];

        buf.push(&ramp(0, 16));
        assert!(buf.next_frame(&mut frame));
        assert!(!buf.next_frame(&mut frame));

        for i in 0..10 {
            buf.push(&ramp(16 + i * 4, 4));
            assert_eq!(buf.ready_frames(), 1);
            assert!(buf.next_frame(&mut frame));
            assert_eq!(frame, ramp(4 + i * 4, 16));
            assert_eq!(buf.ready_frames(), 0);
        }
    }

    #[test]
    fn test_multiple_frames_per_push() {
        let mut buf = AnalysisBuffer::new(16, 4);
        let mut frame = vec![0.0; 16];

        buf.push(&ramp(0, 16));
        assert!(buf.next_frame(&mut frame));

        buf.push(&ramp(16, 12));
        assert_eq!(buf.ready_frames(), 3);

        let mut count = 0;
        while buf.next_frame(&mut frame) {
            count += 1;
        }
        assert_eq!(count, 3);
        assert_eq!(buf.ready_frames(), 0);
        assert_eq!(buf.samples_until_ready(), 4);
    }

    #[test]
    fn test_partial_hop_carries_over() {
        let mut buf = AnalysisBuffer::new(16, 4);
        let mut frame = vec![0.0; 16];

        buf.push(&ramp(0, 18));
        assert_eq!(buf.ready_frames(), 1);
        assert!(buf.next_frame(&mut frame));
        assert_eq!(buf.samples_until_ready(), 2);

        buf.push(&ramp(18, 2));
        assert_eq!(buf.ready_frames(), 1);
    }

    #[test]
    fn test_reset_returns_to_empty() {
        let mut buf = AnalysisBuffer::new(16, 4);
        buf.push(&ramp(0, 40));
        assert!(buf.ready_frames() > 0);

        buf.reset();
        assert_eq!(buf.state(), TrackState::Empty);
        assert_eq!(buf.ready_frames(), 0);
        assert_eq!(buf.samples_until_ready(), 16);
    }

    #[test]
    fn test_wrong_output_length_is_rejected() {
        let mut buf = AnalysisBuffer::new(16, 4);
        buf.push(&ramp(0, 16));

        let mut short = vec![0.0; 8];
        assert!(!buf.next_frame(&mut short));
        assert_eq!(buf.ready_frames(), 1);
    }
}
