//! Regression models.
//!
//! Models are small value types with a `fit` constructor and a pure `predict`,
//! so that search code can stay generic over hyperparameters.

pub mod svr;

pub use svr::*;
