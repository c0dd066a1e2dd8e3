//! Constellation peak picking and sonification

pub mod detector;
pub mod sonify;

pub use detector::{find_local_maxima, split_coordinates, Peak, PeakDetector};
pub use sonify::sonify;
