//! Python bindings for spectrogram and peak analysis

use pyo3::prelude::*;
use numpy::{IntoPyArray, PyArray1, PyArray2, PyReadonlyArray1, PyReadonlyArray2};
use crate::peaks::{Peak, PeakDetector};
use crate::spectrum::{self, AnalyzerConfig, SpectrumAnalyzer, WindowType};

/// Window type enum exposed to Python
#[pyclass(name = "WindowType")]
#[derive(Clone)]
pub enum PyWindowType {
    Hann,
    Hamming,
    Blackman,
    Rectangular,
}

impl From<PyWindowType> for WindowType {
    fn from(py_win: PyWindowType) -> Self {
        match py_win {
            PyWindowType::Hann => WindowType::Hann,
            PyWindowType::Hamming => WindowType::Hamming,
            PyWindowType::Blackman => WindowType::Blackman,
            PyWindowType::Rectangular => WindowType::Rectangular,
        }
    }
}

/// Compute a magnitude spectrogram
///
/// Args:
///     signal: Real samples as numpy array
///     window_length: Frame length (power of 2)
///     hop: Samples between frames
///     max_bin: Number of frequency bins to keep
///     use_window: Whether to taper frames
///
/// Returns:
///     (num_windows, max_bin) numpy array of magnitudes
#[pyfunction]
#[pyo3(signature = (signal, window_length=2048, hop=1024, max_bin=256, use_window=true))]
pub fn compute_spectrogram<'py>(
    py: Python<'py>,
    signal: PyReadonlyArray1<f64>,
    window_length: usize,
    hop: usize,
    max_bin: usize,
    use_window: bool,
) -> PyResult<&'py PyArray2<f64>> {
    let sig = signal.as_slice()?;
    let spec = spectrum::compute_spectrogram(sig, window_length, hop, max_bin, use_window)?;
    Ok(spec.into_magnitudes().into_pyarray(py))
}

/// Find local maxima of a spectrogram
///
/// Returns:
///     List of (time_index, freq_index) tuples in row-major order
#[pyfunction]
#[pyo3(signature = (spectrogram, time_radius=8, freq_radius=5))]
pub fn compute_local_maxima(
    spectrogram: PyReadonlyArray2<f64>,
    time_radius: usize,
    freq_radius: usize,
) -> Vec<(usize, usize)> {
    spectrum::compute_local_maxima(&spectrogram.as_array(), time_radius, freq_radius)
}

/// Spectrogram analyzer exposed to Python
#[pyclass(name = "SpectrumAnalyzer")]
pub struct PySpectrumAnalyzer {
    analyzer: SpectrumAnalyzer,
}

#[pymethods]
impl PySpectrumAnalyzer {
    /// Create a new analyzer
    ///
    /// Args:
    ///     window_length: Frame length (power of 2)
    ///     hop: Samples between frames
    ///     max_bin: Number of frequency bins kept
    ///     use_window: Whether to taper frames
    ///     window_type: Window type for analysis
    ///     sample_rate: Sample rate in Hz
    ///     time_radius: Peak neighborhood half-height (frames)
    ///     freq_radius: Peak neighborhood half-width (bins)
    #[new]
    #[pyo3(signature = (
        window_length=2048,
        hop=1024,
        max_bin=256,
        use_window=true,
        window_type=PyWindowType::Hamming,
        sample_rate=44100.0,
        time_radius=8,
        freq_radius=5
    ))]
    #[allow(clippy::too_many_arguments)]
    fn new(
        window_length: usize,
        hop: usize,
        max_bin: usize,
        use_window: bool,
        window_type: PyWindowType,
        sample_rate: f64,
        time_radius: usize,
        freq_radius: usize,
    ) -> PyResult<Self> {
        let config = AnalyzerConfig {
            window_length,
            hop,
            max_bin,
            use_window,
            window_type: window_type.into(),
            sample_rate,
            peak_detector: PeakDetector::new(time_radius, freq_radius),
        };

        Ok(Self {
            analyzer: SpectrumAnalyzer::new(config)?,
        })
    }

    /// Magnitude spectrogram of a signal
    fn spectrogram<'py>(
        &self,
        py: Python<'py>,
        signal: PyReadonlyArray1<f64>,
    ) -> PyResult<&'py PyArray2<f64>> {
        let spec = self.analyzer.spectrogram(signal.as_slice()?)?;
        Ok(spec.into_magnitudes().into_pyarray(py))
    }

    /// Spectrogram and constellation peaks
    ///
    /// Returns:
    ///     Tuple of (spectrogram, list of (time_index, freq_index))
    fn analyze<'py>(
        &self,
        py: Python<'py>,
        signal: PyReadonlyArray1<f64>,
    ) -> PyResult<(&'py PyArray2<f64>, Vec<(usize, usize)>)> {
        let analysis = self.analyzer.analyze(signal.as_slice()?)?;
        let peaks = analysis.peaks.into_iter().map(|p| (p.time, p.freq)).collect();
        Ok((analysis.spectrogram.into_magnitudes().into_pyarray(py), peaks))
    }

    /// Render peaks as a tone sequence
    ///
    /// Args:
    ///     peaks: List of (time_index, freq_index)
    ///     num_samples: Output length in samples
    fn sonify<'py>(
        &self,
        py: Python<'py>,
        peaks: Vec<(usize, usize)>,
        num_samples: usize,
    ) -> &'py PyArray1<f64> {
        let peaks: Vec<Peak> = peaks.into_iter().map(|(t, f)| Peak::new(t, f)).collect();
        PyArray1::from_vec(py, self.analyzer.sonify(&peaks, num_samples))
    }

    /// Get frequency bins in Hz
    fn frequency_bins_hz<'py>(&self, py: Python<'py>) -> &'py PyArray1<f64> {
        PyArray1::from_vec(py, self.analyzer.frequency_bins_hz())
    }

    /// Update configuration
    #[pyo3(signature = (window_length=None, hop=None, max_bin=None, use_window=None))]
    fn update_config(
        &mut self,
        window_length: Option<usize>,
        hop: Option<usize>,
        max_bin: Option<usize>,
        use_window: Option<bool>,
    ) -> PyResult<()> {
        let mut config = self.analyzer.config().clone();

        if let Some(len) = window_length {
            config.window_length = len;
        }
        if let Some(h) = hop {
            config.hop = h;
        }
        if let Some(bins) = max_bin {
            config.max_bin = bins;
        }
        if let Some(w) = use_window {
            config.use_window = w;
        }

        self.analyzer.update_config(config)?;
        Ok(())
    }

    fn get_window_length(&self) -> usize {
        self.analyzer.config().window_length
    }

    fn get_sample_rate(&self) -> f64 {
        self.analyzer.config().sample_rate
    }
}
