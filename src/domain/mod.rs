//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - day-index samples and the temporal train/test split (`Sample`, `Dataset`)
//! - forecast requests plus the future day-index / date-label policies
//! - market data records (`PriceBar`, `CompanyProfile`, `PriceHistory`)
//! - run configuration and forecast outputs

pub mod types;

pub use types::*;
