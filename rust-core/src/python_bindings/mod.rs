//! PyO3 bindings for Python integration

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::error::DspError;

mod fft_bindings;
mod spectrum_bindings;

impl From<DspError> for PyErr {
    fn from(err: DspError) -> Self {
        PyValueError::new_err(err.to_string())
    }
}

/// Python module definition
#[pymodule]
fn constellation(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_class::<spectrum_bindings::PySpectrumAnalyzer>()?;
    m.add_class::<spectrum_bindings::PyWindowType>()?;
    m.add_class::<fft_bindings::PyFftEngine>()?;

    m.add_function(wrap_pyfunction!(spectrum_bindings::compute_spectrogram, m)?)?;
    m.add_function(wrap_pyfunction!(spectrum_bindings::compute_local_maxima, m)?)?;
    m.add_function(wrap_pyfunction!(fft_bindings::direct_dft, m)?)?;

    Ok(())
}
