//! Short-time Fourier transform
//!
//! Frames of `window_length` samples are taken every `hop` samples, optionally
//! windowed, and transformed independently. Row `i` of the result is the
//! spectrum of the frame starting at `i * hop`.

use log::{debug, trace};
use ndarray::{Array2, ArrayView1};
use num_complex::Complex;
use std::borrow::Cow;

use super::coefficients::Direction;
use super::fft::FftEngine;
use super::framer::make_frame;
use super::windowing::WindowTable;
use super::windows::WindowType;
use crate::error::{DspError, Result};

/// Number of frames for a signal: `1 + round((N - window_length) / hop)`
///
/// Never less than 1, so a signal shorter than one window still yields a
/// single zero-padded frame. `hop` is treated as at least 1.
pub fn num_windows(signal_len: usize, window_length: usize, hop: usize) -> usize {
    let hop = hop.max(1) as f64;
    let extra = ((signal_len as f64 - window_length as f64) / hop).round();
    1 + extra.max(0.0) as usize
}

/// Complex STFT matrix (`num_windows` rows × `window_length` columns)
#[derive(Debug, Clone, PartialEq)]
pub struct Stft {
    matrix: Array2<Complex<f64>>,
}

impl Stft {
    /// Get number of frames
    pub fn num_windows(&self) -> usize {
        self.matrix.nrows()
    }

    /// Get frame length
    pub fn window_length(&self) -> usize {
        self.matrix.ncols()
    }

    /// Spectrum of frame `i`
    pub fn row(&self, i: usize) -> ArrayView1<'_, Complex<f64>> {
        self.matrix.row(i)
    }

    /// Get the complex matrix
    pub fn matrix(&self) -> &Array2<Complex<f64>> {
        &self.matrix
    }

    /// Take ownership of the complex matrix
    pub fn into_matrix(self) -> Array2<Complex<f64>> {
        self.matrix
    }
}

/// STFT processor owning the FFT cache and analysis window
#[derive(Debug, Clone)]
pub struct StftEngine {
    fft: FftEngine,
    window: WindowTable,
}

impl StftEngine {
    /// Create an engine for frames of up to `window_length` samples with the
    /// default analysis window
    pub fn new(window_length: usize) -> Result<Self> {
        Self::with_window(WindowType::default(), window_length)
    }

    /// Create an engine with a specific window function
    pub fn with_window(window_type: WindowType, window_length: usize) -> Result<Self> {
        debug!(
            "creating STFT engine: window_length={}, window={:?}",
            window_length, window_type
        );
        Ok(Self {
            fft: FftEngine::new(window_length)?,
            window: WindowTable::with_type(window_type, window_length),
        })
    }

    /// Get the FFT engine
    pub fn fft(&self) -> &FftEngine {
        &self.fft
    }

    /// Get the analysis window table
    pub fn window(&self) -> &WindowTable {
        &self.window
    }

    /// Compute the full STFT of `signal`
    ///
    /// # Arguments
    /// * `signal` - Real-valued input
    /// * `window_length` - Frame length (power of two within the cache range)
    /// * `hop` - Samples between consecutive frames (at least 1)
    /// * `use_window` - Taper each frame with the analysis window
    ///
    /// # Returns
    /// Matrix whose row `i` is the FFT of the frame at offset `i * hop`
    pub fn stft(
        &self,
        signal: &[f64],
        window_length: usize,
        hop: usize,
        use_window: bool,
    ) -> Result<Stft> {
        let rows = self.rows(signal, window_length, hop, use_window)?;
        let mut matrix = Array2::zeros((rows.len(), window_length));

        for (i, row) in rows.enumerate() {
            let row = row?;
            matrix.row_mut(i).assign(&ArrayView1::from(&row[..]));
        }

        trace!(
            "stft: {} samples -> {} x {} (hop {})",
            signal.len(),
            matrix.nrows(),
            matrix.ncols(),
            hop
        );

        Ok(Stft { matrix })
    }

    /// Lazily compute STFT rows in time order
    ///
    /// Stopping the iteration early skips the remaining frames entirely.
    pub fn rows<'a>(
        &'a self,
        signal: &'a [f64],
        window_length: usize,
        hop: usize,
        use_window: bool,
    ) -> Result<StftRows<'a>> {
        self.fft.check_len(window_length)?;
        if hop == 0 {
            return Err(DspError::InvalidHop);
        }

        let window = if !use_window {
            None
        } else if self.window.len() == window_length {
            Some(Cow::Borrowed(&self.window))
        } else {
            Some(Cow::Owned(WindowTable::with_type(
                self.window.window_type(),
                window_length,
            )))
        };

        Ok(StftRows {
            fft: &self.fft,
            signal,
            window,
            window_length,
            hop,
            next: 0,
            num_windows: num_windows(signal.len(), window_length, hop),
        })
    }
}

/// Iterator over STFT rows, one FFT per frame
pub struct StftRows<'a> {
    fft: &'a FftEngine,
    signal: &'a [f64],
    window: Option<Cow<'a, WindowTable>>,
    window_length: usize,
    hop: usize,
    next: usize,
    num_windows: usize,
}

impl Iterator for StftRows<'_> {
    type Item = Result<Vec<Complex<f64>>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.num_windows {
            return None;
        }
        let start = self.next * self.hop;
        self.next += 1;

        let mut frame = make_frame(
            self.signal,
            start,
            self.window_length,
            self.window.as_deref(),
        );
        Some(
            self.fft
                .transform_in_place(&mut frame, Direction::Forward)
                .map(|()| frame),
        )
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.num_windows - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for StftRows<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_num_windows() {
        assert_eq!(num_windows(8, 4, 2), 3);
        assert_eq!(num_windows(1024, 256, 128), 7);
        // Rounds to nearest: (9 - 4) / 2 = 2.5 -> 3
        assert_eq!(num_windows(9, 4, 2), 4);
    }

    #[test]
    fn test_num_windows_degenerate() {
        // Shorter than one window
        assert_eq!(num_windows(3, 4, 1), 1);
        assert_eq!(num_windows(0, 8, 4), 1);
        // Hop larger than the signal
        assert_eq!(num_windows(8, 4, 100), 1);
    }

    #[test]
    fn test_stft_shape() {
        let engine = StftEngine::new(4).unwrap();
        let signal: Vec<f64> = (0..8).map(|i| i as f64).collect();
        let stft = engine.stft(&signal, 4, 2, false).unwrap();

        assert_eq!(stft.num_windows(), 3);
        assert_eq!(stft.window_length(), 4);
    }

    #[test]
    fn test_rows_match_frame_ffts() {
        let engine = StftEngine::new(8).unwrap();
        let signal: Vec<f64> = (0..40).map(|i| (i as f64 * 0.3).sin()).collect();
        let stft = engine.stft(&signal, 8, 3, true).unwrap();

        for i in 0..stft.num_windows() {
            let frame = make_frame(&signal, i * 3, 8, Some(engine.window()));
            let expected = engine.fft().forward(&frame).unwrap();
            for (a, b) in stft.row(i).iter().zip(&expected) {
                assert!((a - b).norm() < 1e-12);
            }
        }
    }

    #[test]
    fn test_dc_signal_without_window() {
        let engine = StftEngine::new(16).unwrap();
        let signal = vec![1.0; 64];
        let stft = engine.stft(&signal, 16, 16, false).unwrap();

        assert_eq!(stft.num_windows(), 4);
        for row in stft.matrix().rows() {
            assert!((row[0].re - 16.0).abs() < 1e-12);
            assert!(row.iter().skip(1).all(|c| c.norm() < 1e-12));
        }
    }

    #[test]
    fn test_short_signal_single_padded_frame() {
        let engine = StftEngine::new(4).unwrap();
        let stft = engine.stft(&[1.0, 1.0, 1.0], 4, 1, false).unwrap();

        assert_eq!(stft.num_windows(), 1);
        // DC is the sum of the three real samples plus one zero
        assert!((stft.row(0)[0].re - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_smaller_window_than_engine() {
        let engine = StftEngine::new(64).unwrap();
        let signal: Vec<f64> = (0..64).map(|i| (2.0 * PI * i as f64 / 16.0).cos()).collect();
        let stft = engine.stft(&signal, 16, 16, true).unwrap();

        assert_eq!(stft.num_windows(), 4);
        assert_eq!(stft.window_length(), 16);
    }

    #[test]
    fn test_rejects_bad_configuration() {
        let engine = StftEngine::new(16).unwrap();
        let signal = vec![0.0; 64];

        assert_eq!(
            engine.stft(&signal, 12, 4, false),
            Err(DspError::NotPowerOfTwo { len: 12 })
        );
        assert_eq!(
            engine.stft(&signal, 64, 4, false),
            Err(DspError::ExceedsCache { len: 64, max: 32 })
        );
        assert_eq!(engine.stft(&signal, 16, 0, false), Err(DspError::InvalidHop));
    }

    #[test]
    fn test_rows_stop_early() {
        let engine = StftEngine::new(8).unwrap();
        let signal = vec![0.5; 1000];
        let mut rows = engine.rows(&signal, 8, 4, true).unwrap();

        assert_eq!(rows.len(), num_windows(1000, 8, 4));
        let first = rows.next().unwrap().unwrap();
        assert_eq!(first.len(), 8);
        assert_eq!(rows.len(), num_windows(1000, 8, 4) - 1);
    }
}
