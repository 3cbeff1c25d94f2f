//! Reporting: titles, summaries, tables and chart assembly for terminal output.

pub mod format;

pub use format::*;
