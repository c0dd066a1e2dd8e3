//! Magnitude spectrogram derived from the STFT

use ndarray::{s, Array2, ArrayView1};

use super::stft::StftEngine;
use crate::error::{DspError, Result};

/// Magnitude matrix (`num_windows` rows × `max_bin` columns)
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrogram {
    magnitudes: Array2<f64>,
}

impl Spectrogram {
    /// Wrap an existing magnitude matrix
    pub fn from_magnitudes(magnitudes: Array2<f64>) -> Self {
        Self { magnitudes }
    }

    /// Number of frames (rows)
    pub fn num_windows(&self) -> usize {
        self.magnitudes.nrows()
    }

    /// Number of frequency bins kept per frame
    pub fn num_bins(&self) -> usize {
        self.magnitudes.ncols()
    }

    pub fn row(&self, i: usize) -> ArrayView1<'_, f64> {
        self.magnitudes.row(i)
    }

    pub fn magnitudes(&self) -> &Array2<f64> {
        &self.magnitudes
    }

    pub fn into_magnitudes(self) -> Array2<f64> {
        self.magnitudes
    }

    /// Magnitudes in dB: 20*log10(|X|/reference), floored at 1e-10
    pub fn to_db(&self, reference: f64) -> Array2<f64> {
        self.magnitudes.mapv(|mag| {
            let mag_clamped = mag.max(1e-10); // Avoid log(0)
            20.0 * (mag_clamped / reference).log10()
        })
    }
}

impl StftEngine {
    /// Compute the magnitude spectrogram of `signal`
    ///
    /// # Arguments
    /// * `signal` - Real-valued input
    /// * `window_length` - Frame length (power of two)
    /// * `hop` - Samples between frames
    /// * `max_bin` - Number of leading bins to keep (at most `window_length`)
    /// * `use_window` - Taper each frame with the analysis window
    ///
    /// The full FFT is computed per frame; bins at or above `max_bin` are
    /// dropped afterwards.
    pub fn spectrogram(
        &self,
        signal: &[f64],
        window_length: usize,
        hop: usize,
        max_bin: usize,
        use_window: bool,
    ) -> Result<Spectrogram> {
        if max_bin > window_length {
            return Err(DspError::InvalidMaxBin {
                max_bin,
                window_length,
            });
        }

        let stft = self.stft(signal, window_length, hop, use_window)?;
        let magnitudes = stft
            .matrix()
            .slice(s![.., ..max_bin])
            .mapv(|c| c.norm());

        Ok(Spectrogram { magnitudes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use realfft::RealFftPlanner;
    use std::f64::consts::PI;

    #[test]
    fn test_sinusoid_peaks_at_its_bin() {
        let engine = StftEngine::new(8).unwrap();
        let signal: Vec<f64> = (0..8).map(|n| (2.0 * PI * n as f64 / 8.0).cos()).collect();
        let spec = engine.spectrogram(&signal, 8, 8, 8, false).unwrap();

        assert_eq!(spec.num_windows(), 1);
        assert_eq!(spec.num_bins(), 8);

        let row = spec.row(0);
        let max = row.iter().cloned().fold(f64::MIN, f64::max);
        assert_abs_diff_eq!(row[1], max, epsilon = 1e-12);
        assert_abs_diff_eq!(row[7], max, epsilon = 1e-12);
        assert_abs_diff_eq!(row[1], 4.0, epsilon = 1e-12);
        for j in [0, 2, 3, 4, 5, 6] {
            assert!(row[j] < 1e-12, "bin {} = {}", j, row[j]);
        }
    }

    #[test]
    fn test_matches_realfft_magnitudes() {
        let engine = StftEngine::new(256).unwrap();
        let signal: Vec<f64> = (0..2048)
            .map(|n| (0.05 * n as f64).sin() + 0.3 * (0.71 * n as f64).cos())
            .collect();
        let spec = engine.spectrogram(&signal, 256, 128, 129, true).unwrap();

        let mut planner = RealFftPlanner::<f64>::new();
        let r2c = planner.plan_fft_forward(256);
        let window = engine.window().weights();

        for i in 0..spec.num_windows() {
            let mut input: Vec<f64> = (0..256)
                .map(|k| signal.get(i * 128 + k).copied().unwrap_or(0.0) * window[k])
                .collect();
            let mut output = r2c.make_output_vec();
            r2c.process(&mut input, &mut output).unwrap();

            for (j, c) in output.iter().enumerate() {
                assert_abs_diff_eq!(spec.row(i)[j], c.norm(), epsilon = 1e-8);
            }
        }
    }

    #[test]
    fn test_magnitudes_non_negative() {
        let engine = StftEngine::new(32).unwrap();
        let signal: Vec<f64> = (0..300).map(|n| ((n * 7919) % 13) as f64 - 6.0).collect();
        let spec = engine.spectrogram(&signal, 32, 10, 17, true).unwrap();

        assert_eq!(spec.num_bins(), 17);
        assert!(spec.magnitudes().iter().all(|&m| m >= 0.0));
    }

    #[test]
    fn test_rejects_max_bin_beyond_window() {
        let engine = StftEngine::new(8).unwrap();
        assert_eq!(
            engine.spectrogram(&[0.0; 16], 8, 4, 9, false),
            Err(DspError::InvalidMaxBin {
                max_bin: 9,
                window_length: 8
            })
        );
        let empty = engine.spectrogram(&[0.0; 16], 8, 4, 0, false).unwrap();
        assert_eq!(empty.num_bins(), 0);
    }

    #[test]
    fn test_to_db() {
        let spec = Spectrogram::from_magnitudes(
            Array2::from_shape_vec((1, 3), vec![1.0, 10.0, 0.0]).unwrap(),
        );
        let db = spec.to_db(1.0);
        assert_abs_diff_eq!(db[[0, 0]], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(db[[0, 1]], 20.0, epsilon = 1e-12);
        assert_abs_diff_eq!(db[[0, 2]], -200.0, epsilon = 1e-9);
    }
}
