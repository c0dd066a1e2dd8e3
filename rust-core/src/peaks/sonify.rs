//! Render a peak constellation back to audio
//!
//! Each peak becomes a short Hann-enveloped tone at its bin frequency,
//! placed at its frame offset. Useful for listening to what survived peak
//! picking.

use std::f64::consts::PI;

use super::detector::Peak;
use crate::spectrum::windows::{generate_window, WindowType};

/// Synthesize one tone per peak
///
/// # Arguments
/// * `peaks` - Peak coordinates from the spectrogram
/// * `num_samples` - Output length
/// * `window_length` - STFT frame length (tone length and bin spacing)
/// * `hop` - STFT hop (frame index to sample offset)
/// * `sample_rate` - Sample rate in Hz
///
/// # Returns
/// `num_samples` samples normalized to a peak amplitude of 1.0
/// (all zeros if there is nothing to render)
pub fn sonify(
    peaks: &[Peak],
    num_samples: usize,
    window_length: usize,
    hop: usize,
    sample_rate: f64,
) -> Vec<f64> {
    let mut output = vec![0.0; num_samples];
    let envelope = generate_window(WindowType::Hann, window_length);

    for peak in peaks {
        let start = peak.time.saturating_mul(hop);
        if start >= num_samples {
            continue;
        }
        let omega = 2.0 * PI * peak.frequency_hz(window_length, sample_rate) / sample_rate;

        for (k, (out, &env)) in output[start..].iter_mut().zip(&envelope).enumerate() {
            *out += env * (omega * k as f64).sin();
        }
    }

    let max_abs = output.iter().fold(0.0f64, |acc, &x| acc.max(x.abs()));
    if max_abs > 0.0 {
        for x in output.iter_mut() {
            *x /= max_abs;
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spectrum::StftEngine;

    #[test]
    fn test_no_peaks_is_silence() {
        let out = sonify(&[], 100, 16, 8, 8000.0);
        assert_eq!(out, vec![0.0; 100]);
    }

    #[test]
    fn test_normalized_and_bounded() {
        let peaks = [Peak::new(0, 3), Peak::new(1, 5), Peak::new(1, 3)];
        let out = sonify(&peaks, 256, 64, 32, 8000.0);

        assert_eq!(out.len(), 256);
        let max_abs = out.iter().fold(0.0f64, |acc, &x| acc.max(x.abs()));
        assert!((max_abs - 1.0).abs() < 1e-12);
        // Last tone ends at 32 + 64 samples
        assert!(out[96..].iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_peaks_past_end_ignored() {
        let out = sonify(&[Peak::new(100, 2)], 64, 16, 8, 8000.0);
        assert!(out.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_tone_lands_in_its_bin() {
        let out = sonify(&[Peak::new(0, 8)], 64, 64, 32, 8000.0);

        let engine = StftEngine::new(64).unwrap();
        let spec = engine.spectrogram(&out, 64, 64, 33, false).unwrap();
        let row = spec.row(0);
        let (peak_bin, _) = row
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap())
            .unwrap();
        assert_eq!(peak_bin, 8);
    }
}
