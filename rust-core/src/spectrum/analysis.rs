//! High-level spectrogram analyzer
//!
//! Owns one STFT engine (twiddle cache + window table) sized for the
//! configured window length and reuses it for every call.

use log::debug;
use ndarray::{ArrayBase, Data, Ix2};

use super::stft::{Stft, StftEngine};
use super::spectrogram::Spectrogram;
use super::windows::WindowType;
use crate::error::{DspError, Result};
use crate::peaks::{find_local_maxima, sonify, Peak, PeakDetector};

/// Spectrogram analyzer configuration
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzerConfig {
    /// Frame length in samples (power of 2)
    pub window_length: usize,

    /// Samples between consecutive frames
    pub hop: usize,

    /// Number of leading frequency bins kept in the spectrogram
    pub max_bin: usize,

    /// Taper frames with the analysis window
    pub use_window: bool,

    /// Window function for spectral analysis
    pub window_type: WindowType,

    /// Sample rate in Hz
    pub sample_rate: f64,

    /// Neighborhood used for peak picking
    pub peak_detector: PeakDetector,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            window_length: 2048,
            hop: 1024,
            max_bin: 256,
            use_window: true,
            window_type: WindowType::default(),
            sample_rate: 44100.0,
            peak_detector: PeakDetector::default(),
        }
    }
}

impl AnalyzerConfig {
    /// Check the transform parameters before any engine is built
    pub fn validate(&self) -> Result<()> {
        if !self.window_length.is_power_of_two() {
            return Err(DspError::NotPowerOfTwo {
                len: self.window_length,
            });
        }
        if self.hop == 0 {
            return Err(DspError::InvalidHop);
        }
        if self.max_bin > self.window_length {
            return Err(DspError::InvalidMaxBin {
                max_bin: self.max_bin,
                window_length: self.window_length,
            });
        }
        Ok(())
    }
}

/// Spectrogram together with its constellation peaks
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub spectrogram: Spectrogram,
    pub peaks: Vec<Peak>,
}

/// Spectrogram and peak analyzer
#[derive(Debug, Clone)]
pub struct SpectrumAnalyzer {
    config: AnalyzerConfig,
    engine: StftEngine,
}

impl SpectrumAnalyzer {
    /// Create new analyzer, building the coefficient cache and window once
    pub fn new(config: AnalyzerConfig) -> Result<Self> {
        config.validate()?;
        let engine = StftEngine::with_window(config.window_type, config.window_length)?;
        Ok(Self { config, engine })
    }

    /// Complex STFT of `signal`
    pub fn stft(&self, signal: &[f64]) -> Result<Stft> {
        self.engine.stft(
            signal,
            self.config.window_length,
            self.config.hop,
            self.config.use_window,
        )
    }

    /// Magnitude spectrogram of `signal`, truncated to `max_bin` bins
    pub fn spectrogram(&self, signal: &[f64]) -> Result<Spectrogram> {
        self.engine.spectrogram(
            signal,
            self.config.window_length,
            self.config.hop,
            self.config.max_bin,
            self.config.use_window,
        )
    }

    /// Constellation peaks of a spectrogram
    pub fn peaks(&self, spectrogram: &Spectrogram) -> Vec<Peak> {
        self.config.peak_detector.detect(spectrogram.magnitudes())
    }

    /// Spectrogram and peaks in one pass
    pub fn analyze(&self, signal: &[f64]) -> Result<Analysis> {
        let spectrogram = self.spectrogram(signal)?;
        let peaks = self.peaks(&spectrogram);
        debug!(
            "analyzed {} samples: {} frames, {} peaks",
            signal.len(),
            spectrogram.num_windows(),
            peaks.len()
        );
        Ok(Analysis { spectrogram, peaks })
    }

    /// Render peaks as tones over `num_samples` samples
    pub fn sonify(&self, peaks: &[Peak], num_samples: usize) -> Vec<f64> {
        sonify(
            peaks,
            num_samples,
            self.config.window_length,
            self.config.hop,
            self.config.sample_rate,
        )
    }

    /// Centre frequency in Hz of each spectrogram column
    pub fn frequency_bins_hz(&self) -> Vec<f64> {
        (0..self.config.max_bin)
            .map(|bin| bin as f64 * self.config.sample_rate / self.config.window_length as f64)
            .collect()
    }

    /// Update configuration
    ///
    /// The engine is rebuilt only when the window length or window type
    /// changes. An invalid configuration leaves the analyzer untouched.
    pub fn update_config(&mut self, config: AnalyzerConfig) -> Result<()> {
        config.validate()?;

        let needs_new_engine = config.window_length != self.config.window_length
            || config.window_type != self.config.window_type;

        if needs_new_engine {
            debug!(
                "rebuilding STFT engine: window_length {} -> {}",
                self.config.window_length, config.window_length
            );
            self.engine = StftEngine::with_window(config.window_type, config.window_length)?;
        }

        self.config = config;
        Ok(())
    }

    /// Get current configuration
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Get the STFT engine
    pub fn engine(&self) -> &StftEngine {
        &self.engine
    }
}

/// One-shot spectrogram with an engine sized to `window_length`
///
/// # Arguments
/// * `signal` - Real-valued samples
/// * `window_length` - Frame length (power of 2)
/// * `hop` - Samples between frames
/// * `max_bin` - Bins kept per frame
/// * `use_window` - Apply the default analysis window
pub fn compute_spectrogram(
    signal: &[f64],
    window_length: usize,
    hop: usize,
    max_bin: usize,
    use_window: bool,
) -> Result<Spectrogram> {
    let config = AnalyzerConfig {
        window_length,
        hop,
        max_bin,
        use_window,
        ..AnalyzerConfig::default()
    };
    SpectrumAnalyzer::new(config)?.spectrogram(signal)
}

/// Local maxima of a magnitude matrix as `(time, freq)` pairs
pub fn compute_local_maxima<S>(
    spectrogram: &ArrayBase<S, Ix2>,
    time_radius: usize,
    freq_radius: usize,
) -> Vec<(usize, usize)>
where
    S: Data<Elem = f64>,
{
    find_local_maxima(spectrogram, time_radius, freq_radius)
        .into_iter()
        .map(|peak| (peak.time, peak.freq))
        .collect()
}
