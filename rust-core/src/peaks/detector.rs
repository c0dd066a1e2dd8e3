//! Local-maximum search over a time × frequency magnitude matrix

use ndarray::{ArrayBase, Data, Ix2};

/// Coordinate of a local maximum: (time index, frequency bin)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Peak {
    pub time: usize,
    pub freq: usize,
}

impl Peak {
    pub fn new(time: usize, freq: usize) -> Self {
        Self { time, freq }
    }

    /// Start time of the peak's frame in seconds
    pub fn time_seconds(&self, hop: usize, sample_rate: f64) -> f64 {
        self.time.saturating_mul(hop) as f64 / sample_rate
    }

    /// Centre frequency of the peak's bin in Hz
    pub fn frequency_hz(&self, window_length: usize, sample_rate: f64) -> f64 {
        self.freq as f64 * sample_rate / window_length as f64
    }
}

impl From<Peak> for (usize, usize) {
    fn from(peak: Peak) -> Self {
        (peak.time, peak.freq)
    }
}

/// Separate time and frequency index lists, in peak order
pub fn split_coordinates(peaks: &[Peak]) -> (Vec<usize>, Vec<usize>) {
    peaks.iter().map(|p| (p.time, p.freq)).unzip()
}

/// Rectangular-neighborhood peak detector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeakDetector {
    /// Frames inspected on each side of a cell
    pub time_radius: usize,

    /// Bins inspected on each side of a cell
    pub freq_radius: usize,
}

impl Default for PeakDetector {
    fn default() -> Self {
        Self {
            time_radius: 8,
            freq_radius: 5,
        }
    }
}

impl PeakDetector {
    pub fn new(time_radius: usize, freq_radius: usize) -> Self {
        Self {
            time_radius,
            freq_radius,
        }
    }

    /// Find all local maxima of `matrix`
    pub fn detect<S>(&self, matrix: &ArrayBase<S, Ix2>) -> Vec<Peak>
    where
        S: Data<Elem = f64>,
    {
        find_local_maxima(matrix, self.time_radius, self.freq_radius)
    }
}

/// Find every cell not exceeded by any in-bounds neighbor
///
/// # Arguments
/// * `matrix` - Magnitudes indexed `[time, freq]`
/// * `time_radius` - Neighborhood half-height in rows
/// * `freq_radius` - Neighborhood half-width in columns
///
/// # Returns
/// Peaks in row-major order. Ties do not disqualify a cell, so plateaus
/// report every cell they contain.
pub fn find_local_maxima<S>(
    matrix: &ArrayBase<S, Ix2>,
    time_radius: usize,
    freq_radius: usize,
) -> Vec<Peak>
where
    S: Data<Elem = f64>,
{
    let (rows, cols) = matrix.dim();
    let mut peaks = Vec::new();

    for ((i, j), &value) in matrix.indexed_iter() {
        let i_lo = i.saturating_sub(time_radius);
        let i_hi = i.saturating_add(time_radius).min(rows - 1);
        let j_lo = j.saturating_sub(freq_radius);
        let j_hi = j.saturating_add(freq_radius).min(cols - 1);

        // Only a strictly greater neighbor disqualifies the cell
        let exceeded = (i_lo..=i_hi)
            .any(|i2| (j_lo..=j_hi).any(|j2| matrix[[i2, j2]] > value));

        if !exceeded {
            peaks.push(Peak::new(i, j));
        }
    }

    peaks
}
