//! Error types shared by the transform pipeline

use thiserror::Error;

/// Configuration errors detected before any computation starts
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DspError {
    #[error("Transform length {len} is not a power of two")]
    NotPowerOfTwo { len: usize },

    #[error("Transform length {len} exceeds the coefficient cache (max {max})")]
    ExceedsCache { len: usize, max: usize },

    #[error("Transform length {len} is too large to tabulate")]
    TooLarge { len: usize },

    #[error("Coefficient level {level} was not built (max level {max_level})")]
    LevelOutOfRange { level: usize, max_level: usize },

    #[error("Twiddle index {index} out of range for level {level}")]
    IndexOutOfRange { level: usize, index: usize },

    #[error("Hop length must be at least 1 sample")]
    InvalidHop,

    #[error("max_bin {max_bin} exceeds window length {window_length}")]
    InvalidMaxBin { max_bin: usize, window_length: usize },
}

pub type Result<T> = std::result::Result<T, DspError>;
