//! `stock-dash` library crate.
//!
//! The binary (`sdash`) is a thin wrapper around this library so that:
//!
//! - the forecasting core is testable without spawning processes
//! - the CLI and the dashboard share one pipeline

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod logging;
pub mod math;
pub mod models;
pub mod plot;
pub mod report;
pub mod tui;
