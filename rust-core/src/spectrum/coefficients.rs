//! Twiddle-factor cache for the radix-2 FFT
//!
//! Every power-of-two size up to the configured maximum is tabulated once
//! for both directions, so frames of an STFT never pay for sin/cos.

use log::debug;
use num_complex::Complex;
use std::f64::consts::PI;

use crate::error::{DspError, Result};

/// Transform direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Forward,
    Inverse,
}

impl Direction {
    /// Sign of the exponent in exp(±2πi·k/N)
    fn sign(self) -> f64 {
        match self {
            Direction::Forward => -1.0,
            Direction::Inverse => 1.0,
        }
    }

    fn slot(self) -> usize {
        match self {
            Direction::Forward => 0,
            Direction::Inverse => 1,
        }
    }
}

/// Smallest exponent `p` such that `2^p >= a`, i.e. ceil(log2(a))
///
/// Returns 0 for `a <= 1`.
pub fn closest_power_of_two(a: usize) -> usize {
    if a <= 1 {
        return 0;
    }
    match a.checked_next_power_of_two() {
        Some(p) => p.trailing_zeros() as usize,
        None => usize::BITS as usize,
    }
}

/// Twiddle factors for levels `1..=max_level`, both directions
///
/// All factors live in one contiguous buffer. Level `L` holds `2^(L-1)`
/// factors per direction, located through `offsets`.
#[derive(Debug, Clone)]
pub struct CoefficientCache {
    max_level: usize,

    /// Start of each (level, direction) run, indexed by `2 * (level - 1) + slot`
    offsets: Vec<usize>,

    twiddles: Vec<Complex<f64>>,
}

impl CoefficientCache {
    /// Build the cache for transforms of up to `max_size` samples
    ///
    /// Levels run from 1 to `closest_power_of_two(max_size) + 1`. Sizes whose
    /// table cannot be addressed or allocated are rejected with `TooLarge`.
    pub fn build(max_size: usize) -> Result<Self> {
        let max_level = closest_power_of_two(max_size) + 1;

        // Per level, both directions: 2 * 2^(L-1) = 2^L factors, 2^(L+1) - 2 in all
        if max_level + 1 >= usize::BITS as usize {
            return Err(DspError::TooLarge { len: max_size });
        }
        let total = (1usize << (max_level + 1)) - 2;

        let mut twiddles = Vec::new();
        twiddles
            .try_reserve_exact(total)
            .map_err(|_| DspError::TooLarge { len: max_size })?;
        let mut offsets = Vec::with_capacity(2 * max_level);

        for level in 1..=max_level {
            let fft_size = 1usize << level;
            for direction in [Direction::Forward, Direction::Inverse] {
                offsets.push(twiddles.len());
                for i in 0..fft_size / 2 {
                    let angle = direction.sign() * 2.0 * PI * i as f64 / fft_size as f64;
                    twiddles.push(Complex::from_polar(1.0, angle));
                }
            }
        }

        debug!(
            "built coefficient cache: max_size={}, levels 1..={}, {} factors",
            max_size,
            max_level,
            twiddles.len()
        );

        Ok(Self {
            max_level,
            offsets,
            twiddles,
        })
    }

    /// Highest level that was tabulated
    pub fn max_level(&self) -> usize {
        self.max_level
    }

    /// Largest transform length the cache serves
    pub fn max_len(&self) -> usize {
        u32::try_from(self.max_level)
            .ok()
            .and_then(|shift| 1usize.checked_shl(shift))
            .unwrap_or(usize::MAX)
    }

    /// All factors for one level and direction
    pub fn factors(&self, level: usize, direction: Direction) -> Result<&[Complex<f64>]> {
        if level == 0 || level > self.max_level {
            return Err(DspError::LevelOutOfRange {
                level,
                max_level: self.max_level,
            });
        }
        let start = self.offsets[2 * (level - 1) + direction.slot()];
        let len = 1usize << (level - 1);
        Ok(&self.twiddles[start..start + len])
    }

    /// Single cached factor W[level][direction][index]
    pub fn lookup(&self, level: usize, direction: Direction, index: usize) -> Result<Complex<f64>> {
        let factors = self.factors(level, direction)?;
        factors
            .get(index)
            .copied()
            .ok_or(DspError::IndexOutOfRange { level, index })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_closest_power_of_two() {
        assert_eq!(closest_power_of_two(5), 3);
        assert_eq!(closest_power_of_two(8), 3);
        assert_eq!(closest_power_of_two(9), 4);
        assert_eq!(closest_power_of_two(2), 1);
        assert_eq!(closest_power_of_two(1), 0);
        assert_eq!(closest_power_of_two(0), 0);
    }

    #[test]
    fn test_levels_cover_requested_size() {
        let cache = CoefficientCache::build(8).unwrap();
        assert_eq!(cache.max_level(), 4);
        assert_eq!(cache.max_len(), 16);

        for level in 1..=4 {
            let fwd = cache.factors(level, Direction::Forward).unwrap();
            let inv = cache.factors(level, Direction::Inverse).unwrap();
            assert_eq!(fwd.len(), 1 << (level - 1));
            assert_eq!(inv.len(), 1 << (level - 1));
        }
    }

    #[test]
    fn test_factor_values() {
        let cache = CoefficientCache::build(16).unwrap();

        // Level 2 (size 4): W[1] = exp(-iπ/2) = -i
        let w = cache.lookup(2, Direction::Forward, 1).unwrap();
        assert_abs_diff_eq!(w.re, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(w.im, -1.0, epsilon = 1e-12);

        // Inverse direction flips the sign of the angle
        let w = cache.lookup(2, Direction::Inverse, 1).unwrap();
        assert_abs_diff_eq!(w.im, 1.0, epsilon = 1e-12);

        // Every level starts at 1
        for level in 1..=cache.max_level() {
            let w = cache.lookup(level, Direction::Forward, 0).unwrap();
            assert_abs_diff_eq!(w.re, 1.0, epsilon = 1e-12);
            assert_abs_diff_eq!(w.im, 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_directions_are_conjugates() {
        let cache = CoefficientCache::build(64).unwrap();
        for level in 1..=cache.max_level() {
            let fwd = cache.factors(level, Direction::Forward).unwrap();
            let inv = cache.factors(level, Direction::Inverse).unwrap();
            for (f, i) in fwd.iter().zip(inv) {
                assert_abs_diff_eq!(f.re, i.re, epsilon = 1e-12);
                assert_abs_diff_eq!(f.im, -i.im, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_lookup_out_of_range() {
        let cache = CoefficientCache::build(4).unwrap();
        assert_eq!(
            cache.lookup(4, Direction::Forward, 0),
            Err(DspError::LevelOutOfRange { level: 4, max_level: 3 })
        );
        assert!(cache.factors(0, Direction::Inverse).is_err());
        assert_eq!(
            cache.lookup(2, Direction::Forward, 2),
            Err(DspError::IndexOutOfRange { level: 2, index: 2 })
        );
    }

    #[test]
    fn test_oversized_cache_rejected() {
        for max_size in [1usize << 61, 1usize << 62, 1usize << 63, usize::MAX] {
            assert_eq!(
                CoefficientCache::build(max_size).err(),
                Some(DspError::TooLarge { len: max_size })
            );
        }
    }
}
