//! Forecast model training.
//!
//! Responsibilities:
//!
//! - define the hyperparameter grid for the RBF SVR
//! - split training data into cross-validation folds
//! - evaluate each candidate triple (parallel) by mean absolute error
//! - refit the winner on the whole training prefix and predict future days

pub mod cv;
pub mod grid;
pub mod search;
pub mod trainer;

pub use cv::*;
pub use grid::*;
pub use search::*;
pub use trainer::*;
