//! Trend smoothing for the indicator view.

pub mod ewm;

pub use ewm::*;
