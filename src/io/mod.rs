//! Forecast exports (CSV/JSON).

pub mod export;

pub use export::*;
