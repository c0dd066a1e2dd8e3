//! Radix-2 FFT engine backed by a twiddle-factor cache
//!
//! Iterative Cooley-Tukey: bit-reversal permutation followed by butterfly
//! passes of doubling span. Every public transform returns a fresh buffer
//! and leaves its input untouched.

use num_complex::Complex;
use std::f64::consts::PI;

use super::coefficients::{CoefficientCache, Direction};
use crate::error::{DspError, Result};

/// Reverse the lowest `bits` bits of `x`
fn bit_reverse(x: usize, bits: u32) -> usize {
    if bits == 0 {
        return 0;
    }
    x.reverse_bits() >> (usize::BITS - bits)
}

/// Reorder `buffer` into the order the butterfly network consumes
fn rearrange(buffer: &mut [Complex<f64>]) {
    let bits = buffer.len().trailing_zeros();
    for i in 0..buffer.len() {
        let j = bit_reverse(i, bits);
        // Each mirrored pair is swapped once
        if j > i {
            buffer.swap(i, j);
        }
    }
}

/// FFT engine for power-of-two complex buffers
#[derive(Debug, Clone)]
pub struct FftEngine {
    cache: CoefficientCache,
}

impl FftEngine {
    /// Create new FFT engine
    ///
    /// # Arguments
    /// * `max_size` - Largest transform length the engine must serve
    pub fn new(max_size: usize) -> Result<Self> {
        Ok(Self {
            cache: CoefficientCache::build(max_size)?,
        })
    }

    /// Largest transform length accepted by this engine
    pub fn max_len(&self) -> usize {
        self.cache.max_len()
    }

    /// Underlying twiddle-factor cache
    pub fn coefficients(&self) -> &CoefficientCache {
        &self.cache
    }

    /// Reject lengths the butterfly network cannot handle
    pub fn check_len(&self, len: usize) -> Result<()> {
        if !len.is_power_of_two() {
            return Err(DspError::NotPowerOfTwo { len });
        }
        if len > self.max_len() {
            return Err(DspError::ExceedsCache {
                len,
                max: self.max_len(),
            });
        }
        Ok(())
    }

    /// Forward FFT
    ///
    /// # Arguments
    /// * `signal` - Complex input of power-of-two length
    ///
    /// # Returns
    /// X[k] = Σ x[n]·exp(-2πi·kn/N) for k = 0..N-1
    pub fn forward(&self, signal: &[Complex<f64>]) -> Result<Vec<Complex<f64>>> {
        self.check_len(signal.len())?;
        let mut output = signal.to_vec();
        self.transform_in_place(&mut output, Direction::Forward)?;
        Ok(output)
    }

    /// Inverse FFT, normalized by 1/N
    pub fn inverse(&self, spectrum: &[Complex<f64>]) -> Result<Vec<Complex<f64>>> {
        self.check_len(spectrum.len())?;
        // Scaling up front is equivalent to a post-pass for a linear network
        let scale = 1.0 / spectrum.len() as f64;
        let mut output: Vec<Complex<f64>> = spectrum.iter().map(|&c| c * scale).collect();
        self.transform_in_place(&mut output, Direction::Inverse)?;
        Ok(output)
    }

    /// Forward FFT of a real-valued signal
    pub fn forward_real(&self, signal: &[f64]) -> Result<Vec<Complex<f64>>> {
        self.check_len(signal.len())?;
        let mut output: Vec<Complex<f64>> =
            signal.iter().map(|&x| Complex::new(x, 0.0)).collect();
        self.transform_in_place(&mut output, Direction::Forward)?;
        Ok(output)
    }

    /// Run the butterfly network over a buffer the caller already owns
    ///
    /// No scaling is applied in either direction.
    pub(crate) fn transform_in_place(
        &self,
        buffer: &mut [Complex<f64>],
        direction: Direction,
    ) -> Result<()> {
        let n = buffer.len();
        self.check_len(n)?;
        if n == 1 {
            return Ok(());
        }

        rearrange(buffer);

        // 1. Trivial size-2 transforms on adjacent pairs
        for pair in buffer.chunks_exact_mut(2) {
            let first = pair[0];
            pair[0] = first + pair[1];
            pair[1] = first - pair[1];
        }

        // 2. Merge blocks of doubling size; `half` is the distance between
        //    mirrored terms and the block size is 2^level
        let mut half = 2;
        let mut level = 2;
        while half < n {
            let factors = self.cache.factors(level, direction)?;
            for block in buffer.chunks_exact_mut(half << 1) {
                let (lo, hi) = block.split_at_mut(half);
                for ((a, b), &w) in lo.iter_mut().zip(hi.iter_mut()).zip(factors) {
                    let first = *a;
                    let second = w * *b;
                    *a = first + second;
                    *b = first - second;
                }
            }
            half <<= 1;
            level += 1;
        }

        Ok(())
    }

    /// Discrete Fourier transform straight from the definition
    ///
    /// O(N²) oracle for tests and benchmarks. Accepts any length.
    pub fn direct_dft(signal: &[Complex<f64>]) -> Vec<Complex<f64>> {
        let n = signal.len();
        (0..n)
            .map(|k| {
                signal
                    .iter()
                    .enumerate()
                    .map(|(j, &x)| {
                        // Reduce k·j mod N first to keep the angle small
                        let angle = -2.0 * PI * ((k * j) % n) as f64 / n as f64;
                        x * Complex::from_polar(1.0, angle)
                    })
                    .sum::<Complex<f64>>()
            })
            .collect()
    }
}
