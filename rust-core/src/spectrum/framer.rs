//! Slicing a real signal into complex analysis frames

use num_complex::Complex;

use super::windowing::WindowTable;

/// Build one complex frame from a real signal
///
/// # Arguments
/// * `signal` - Full real-valued signal
/// * `start` - Index of the first sample in the frame
/// * `window_length` - Frame length
/// * `window` - Window applied after copying, if any
///
/// # Returns
/// `window_length` samples; positions past the end of `signal` are zero
pub fn make_frame(
    signal: &[f64],
    start: usize,
    window_length: usize,
    window: Option<&WindowTable>,
) -> Vec<Complex<f64>> {
    let available = signal.get(start..).unwrap_or(&[]);
    let copy_len = available.len().min(window_length);

    let mut frame = vec![Complex::new(0.0, 0.0); window_length];
    for (dst, &src) in frame.iter_mut().zip(&available[..copy_len]) {
        *dst = Complex::new(src, 0.0);
    }

    if let Some(window) = window {
        window.apply(&mut frame);
    }

    frame
}
