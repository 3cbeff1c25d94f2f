//! Market data sources.
//!
//! - `yahoo`: daily history and company metadata over HTTP
//! - `synthetic`: seeded random-walk history for offline runs and tests

pub mod synthetic;
pub mod yahoo;

pub use synthetic::*;
pub use yahoo::*;
