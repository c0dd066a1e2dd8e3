//! Analysis window functions
//!
//! Frames are tapered before the FFT to reduce spectral leakage

use std::f64::consts::PI;

/// Window function types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowType {
    /// Hann window: w[n] = 0.5 - 0.5*cos(2πn/(M-1))
    /// Mainlobe width: 8π/M, Sidelobe attenuation: ~44 dB
    Hann,

    /// Hamming window: w[n] = 0.54 - 0.46*cos(2πn/(M-1))
    /// Mainlobe width: 8π/M, Sidelobe attenuation: ~53 dB
    ///
    /// Default analysis window for spectrograms.
    #[default]
    Hamming,

    /// Blackman window: w[n] = 0.42 - 0.5*cos(2πn/(M-1)) + 0.08*cos(4πn/(M-1))
    /// Mainlobe width: 12π/M, Sidelobe attenuation: ~74 dB
    Blackman,

    /// Rectangular window (no tapering)
    Rectangular,
}

impl WindowType {
    /// Weight of sample `n` in a window of `length` samples
    fn weight(&self, n: usize, length: usize) -> f64 {
        // A single-sample window has no shape; (M-1) would be zero
        if length <= 1 {
            return 1.0;
        }
        let angle = 2.0 * PI * n as f64 / (length as f64 - 1.0);
        match self {
            WindowType::Hann => 0.5 - 0.5 * angle.cos(),
            WindowType::Hamming => 0.54 - 0.46 * angle.cos(),
            WindowType::Blackman => 0.42 - 0.5 * angle.cos() + 0.08 * (2.0 * angle).cos(),
            WindowType::Rectangular => 1.0,
        }
    }
}

/// Generate window coefficients
///
/// # Arguments
/// * `window_type` - Type of window function
/// * `length` - Number of samples (M)
///
/// # Returns
/// Vector of window coefficients w[n] for n = 0..M-1
pub fn generate_window(window_type: WindowType, length: usize) -> Vec<f64> {
    (0..length).map(|n| window_type.weight(n, length)).collect()
}
