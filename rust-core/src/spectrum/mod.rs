//! Spectral analysis: FFT, framing, STFT and spectrograms

pub mod coefficients;
pub mod fft;
pub mod windows;
pub mod windowing;
pub mod framer;
pub mod stft;
pub mod spectrogram;
pub mod analysis;

pub use coefficients::{closest_power_of_two, CoefficientCache, Direction};
pub use fft::FftEngine;
pub use windows::{generate_window, WindowType};
pub use windowing::WindowTable;
pub use framer::make_frame;
pub use stft::{num_windows, Stft, StftEngine, StftRows};
pub use spectrogram::Spectrogram;
pub use analysis::{compute_local_maxima, compute_spectrogram, Analysis, AnalyzerConfig, SpectrumAnalyzer};
