//! Constellation - Spectrogram and Peak Extraction Core
//!
//! Cached-coefficient radix-2 FFT, short-time Fourier transform, magnitude
//! spectrograms and local-maximum ("constellation") peak picking for audio
//! analysis and fingerprinting front-ends.

// Suppress PyO3 non-local impl warnings (harmless macro-generated code)
#![allow(non_local_definitions)]

pub mod error;
pub mod peaks;
pub mod spectrum;
#[cfg(feature = "python")]
pub mod python_bindings;

pub use error::{DspError, Result};
pub use peaks::{find_local_maxima, Peak, PeakDetector};
pub use spectrum::{
    compute_local_maxima, compute_spectrogram, AnalyzerConfig, FftEngine, Spectrogram,
    SpectrumAnalyzer, StftEngine, WindowType,
};
