//! Python bindings for the raw transforms (testing and benchmarking)

use pyo3::prelude::*;
use numpy::{Complex64, PyArray1, PyReadonlyArray1};
use crate::spectrum::FftEngine;

/// FFT engine exposed to Python
///
/// The twiddle cache is built once in the constructor and reused by every
/// `forward` / `inverse` call up to `max_len`.
#[pyclass(name = "FftEngine")]
pub struct PyFftEngine {
    engine: FftEngine,
}

#[pymethods]
impl PyFftEngine {
    /// Create a new engine
    ///
    /// Args:
    ///     max_size: Largest transform length the engine must serve
    #[new]
    fn new(max_size: usize) -> PyResult<Self> {
        Ok(Self {
            engine: FftEngine::new(max_size)?,
        })
    }

    /// Forward FFT of a complex array (length must be a power of 2)
    fn forward<'py>(
        &self,
        py: Python<'py>,
        signal: PyReadonlyArray1<Complex64>,
    ) -> PyResult<&'py PyArray1<Complex64>> {
        let spectrum = self.engine.forward(signal.as_slice()?)?;
        Ok(PyArray1::from_vec(py, spectrum))
    }

    /// Inverse FFT of a complex array, normalized by 1/N
    fn inverse<'py>(
        &self,
        py: Python<'py>,
        spectrum: PyReadonlyArray1<Complex64>,
    ) -> PyResult<&'py PyArray1<Complex64>> {
        let signal = self.engine.inverse(spectrum.as_slice()?)?;
        Ok(PyArray1::from_vec(py, signal))
    }

    /// Get largest accepted transform length
    #[getter]
    fn max_len(&self) -> usize {
        self.engine.max_len()
    }
}

/// O(N²) DFT from the definition, any length
#[pyfunction]
pub fn direct_dft<'py>(
    py: Python<'py>,
    signal: PyReadonlyArray1<Complex64>,
) -> PyResult<&'py PyArray1<Complex64>> {
    let sig = signal.as_slice()?;
    Ok(PyArray1::from_vec(py, FftEngine::direct_dft(sig)))
}
