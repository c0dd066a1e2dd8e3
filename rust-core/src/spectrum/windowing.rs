//! Precomputed window table applied to every frame of an STFT

use log::debug;
use num_complex::Complex;

use super::windows::{generate_window, WindowType};

/// Window weights built once per frame length
#[derive(Debug, Clone, PartialEq)]
pub struct WindowTable {
    window_type: WindowType,
    weights: Vec<f64>,
}

impl WindowTable {
    /// Build the default analysis window for `length` samples
    pub fn build(length: usize) -> Self {
        Self::with_type(WindowType::default(), length)
    }

    /// Build a window of the given type
    ///
    /// # Arguments
    /// * `window_type` - Window function to tabulate
    /// * `length` - Frame length in samples
    pub fn with_type(window_type: WindowType, length: usize) -> Self {
        debug!("building {:?} window table of length {}", window_type, length);
        Self {
            window_type,
            weights: generate_window(window_type, length),
        }
    }

    /// Multiply each sample of `frame` by the matching weight
    ///
    /// Samples past the end of the table are left untouched.
    pub fn apply(&self, frame: &mut [Complex<f64>]) {
        for (sample, &w) in frame.iter_mut().zip(self.weights.iter()) {
            *sample *= w;
        }
    }

    /// Window weights
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Get window function
    pub fn window_type(&self) -> WindowType {
        self.window_type
    }

    /// Get number of weights
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}
