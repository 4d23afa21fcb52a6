//! FFT engine using realfft for real-valued signals
//!
//! All working buffers are allocated at construction, so a transform never
//! touches the allocator.

use crate::error::EngineError;
use num_complex::Complex;
use realfft::{RealFftPlanner, RealToComplex};
use std::sync::Arc;

/// Magnitude-only forward FFT for real-valued frames
pub struct FftEngine {
    /// FFT size (number of samples)
    fft_size: usize,

    /// Real FFT processor
    r2c: Arc<dyn RealToComplex<f32>>,

    /// Reusable input buffer (overwritten by each transform)
    input_buffer: Vec<f32>,

    /// Reusable output buffer (complex spectrum, fft_size/2 + 1 bins)
    output_buffer: Vec<Complex<f32>>,

    /// Scratch space for the transform
    scratch: Vec<Complex<f32>>,
}

impl FftEngine {
    /// Create new FFT engine
    ///
    /// # Arguments
    /// * `fft_size` - FFT size (number of samples)
    pub fn new(fft_size: usize) -> Self {
        let mut planner = RealFftPlanner::<f32>::new();
        let r2c = planner.plan_fft_forward(fft_size);

        let input_buffer = r2c.make_input_vec();
        let output_buffer = r2c.make_output_vec();
        let scratch = r2c.make_scratch_vec();

        Self {
            fft_size,
            r2c,
            input_buffer,
            output_buffer,
            scratch,
        }
    }

    /// Time-domain input for the next transform
    ///
    /// Callers fill this in place and then call [`FftEngine::transform_into`].
    pub fn input_mut(&mut self) -> &mut [f32] {
        &mut self.input_buffer
    }

    /// Transform the current input and write |X[k]| for k = 0..out.len()
    ///
    /// `out` may hold at most `fft_size/2 + 1` bins. The input buffer is
    /// consumed by the transform and must be refilled before the next call.
    pub fn transform_into(&mut self, out: &mut [f32]) -> Result<(), EngineError> {
        if out.len() > self.output_buffer.len() {
            return Err(EngineError::FrameLength {
                expected: self.output_buffer.len(),
                actual: out.len(),
            });
        }

        self.r2c
            .process_with_scratch(
                &mut self.input_buffer,
                &mut self.output_buffer,
                &mut self.scratch,
            )
            .map_err(|_| EngineError::FrameLength {
                expected: self.fft_size,
                actual: self.input_buffer.len(),
            })?;

        for (mag, bin) in out.iter_mut().zip(self.output_buffer.iter()) {
            *mag = bin.norm();
        }

        Ok(())
    }

    /// Get FFT size
    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Number of complex bins the transform produces (fft_size/2 + 1)
    pub fn num_complex_bins(&self) -> usize {
        self.output_buffer.len()
    }
}
