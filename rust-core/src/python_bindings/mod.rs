//! PyO3 bindings for Python integration

use pyo3::prelude::*;

mod engine_bindings;

/// Python module definition
#[pymodule]
fn tele_spectrum(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_class::<engine_bindings::PySpectrumEngine>()?;

    m.add("FFT_SIZE", crate::config::FFT_SIZE)?;
    m.add("HOP_SIZE", crate::config::HOP_SIZE)?;
    m.add("NUM_BINS", crate::config::NUM_BINS)?;

    Ok(())
}
