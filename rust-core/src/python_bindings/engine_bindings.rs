//! Python bindings for the block processor
//!
//! Lets Python drive the engine offline (numpy blocks in, numpy blocks out)
//! and poll both spectra the way a display would.

use crate::audio::{SpectrumHandle, SpectrumProcessor};
use crate::config::{frequency_bins_hz, EngineConfig};
use numpy::{PyArray1, PyReadonlyArray1};
use pyo3::prelude::*;

/// Spectrum engine exposed to Python
#[pyclass(name = "SpectrumEngine")]
pub struct PySpectrumEngine {
    processor: SpectrumProcessor,
    handle: SpectrumHandle,
}

#[pymethods]
impl PySpectrumEngine {
    /// Create a new engine
    ///
    /// Args:
    ///     sample_rate: Sample rate in Hz (default: 44100)
    ///     sensitivity: Display sensitivity in [0, 1] (default: 1.0)
    ///     sine_level: Test tone level in [0, 1] (default: 0.0)
    #[new]
    #[pyo3(signature = (sample_rate=44100.0, sensitivity=1.0, sine_level=0.0))]
    fn new(sample_rate: f64, sensitivity: f32, sine_level: f32) -> Self {
        let processor = SpectrumProcessor::new(EngineConfig {
            sample_rate,
            sensitivity,
            sine_level,
        });
        let handle = processor.handle();

        Self { processor, handle }
    }

    /// Process one block
    ///
    /// Args:
    ///     left: First channel as numpy float32 array
    ///     right: Optional second channel (same length)
    ///
    /// Returns:
    ///     Tuple of output channels with the test tone mixed in
    #[pyo3(signature = (left, right=None))]
    fn process_block<'py>(
        &mut self,
        py: Python<'py>,
        left: PyReadonlyArray1<f32>,
        right: Option<PyReadonlyArray1<f32>>,
    ) -> PyResult<(&'py PyArray1<f32>, Option<&'py PyArray1<f32>>)> {
        let mut left = left.as_array().to_vec();
        let sample_rate = self.processor.sample_rate();

        match right {
            Some(right) => {
                let mut right = right.as_array().to_vec();
                if right.len() != left.len() {
                    return Err(PyErr::new::<pyo3::exceptions::PyValueError, _>(format!(
                        "Channel length mismatch: {} vs {}",
                        left.len(),
                        right.len()
                    )));
                }
                let n = left.len();
                self.processor
                    .process_block(&mut [&mut left[..], &mut right[..]], n, sample_rate);
                Ok((PyArray1::from_vec(py, left), Some(PyArray1::from_vec(py, right))))
            }
            None => {
                let n = left.len();
                self.processor.process_block(&mut [&mut left[..]], n, sample_rate);
                Ok((PyArray1::from_vec(py, left), None))
            }
        }
    }

    /// Reset both analysis tracks for a new sample rate
    fn on_sample_rate_changed(&mut self, sample_rate: f64) -> PyResult<()> {
        self.processor
            .set_sample_rate(sample_rate)
            .map_err(|e| PyErr::new::<pyo3::exceptions::PyValueError, _>(e.to_string()))
    }

    /// Set display sensitivity (clamped to [0, 1])
    fn set_sensitivity(&self, value: f32) {
        self.handle.set_sensitivity(value);
    }

    /// Set test tone level (clamped to [0, 1])
    fn set_sine_level(&self, value: f32) {
        self.handle.set_sine_level(value);
    }

    fn get_sensitivity(&self) -> f32 {
        self.handle.params().sensitivity()
    }

    fn get_sine_level(&self) -> f32 {
        self.handle.params().sine_level()
    }

    /// Latest input spectrum (empty before warm-up)
    fn fetch_primary_spectrum<'py>(&self, py: Python<'py>) -> &'py PyArray1<f32> {
        PyArray1::from_vec(py, self.handle.fetch_primary_spectrum())
    }

    /// Latest test tone spectrum (empty before warm-up)
    fn fetch_tone_spectrum<'py>(&self, py: Python<'py>) -> &'py PyArray1<f32> {
        PyArray1::from_vec(py, self.handle.fetch_tone_spectrum())
    }

    /// Bin centre frequencies in Hz at the current sample rate
    fn frequency_bins_hz<'py>(&self, py: Python<'py>) -> &'py PyArray1<f64> {
        PyArray1::from_vec(py, frequency_bins_hz(self.processor.sample_rate()))
    }

    /// Get current sample rate
    fn get_sample_rate(&self) -> f64 {
        self.processor.sample_rate()
    }
}
