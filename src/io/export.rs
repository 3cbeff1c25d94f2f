//! Export forecasts to CSV and JSON.
//!
//! The CSV is meant to be easy to consume in spreadsheets; the JSON keeps the
//! run metadata (selected hyperparameters, CV error) alongside the points.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::info;

use crate::domain::{ForecastFile, ForecastPoint};
use crate::error::AppError;

/// Write `date,day_index,predicted_close` rows.
pub fn write_forecast_csv(path: &Path, points: &[ForecastPoint]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))?;
    let mut w = BufWriter::new(file);

    writeln!(w, "date,day_index,predicted_close")
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;
    for p in points {
        writeln!(w, "{},{},{:.6}", p.date, p.day_index, p.predicted_close)
            .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }
    w.flush()
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV: {e}")))?;

    info!(path = %path.display(), rows = points.len(), "wrote forecast CSV");
    Ok(())
}

pub fn write_forecast_json(path: &Path, forecast: &ForecastFile) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create forecast JSON '{}': {e}", path.display())))?;
    let mut w = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut w, forecast)
        .map_err(|e| AppError::new(2, format!("Failed to write forecast JSON: {e}")))?;
    w.flush()
        .map_err(|e| AppError::new(2, format!("Failed to write forecast JSON: {e}")))?;

    info!(path = %path.display(), "wrote forecast JSON");
    Ok(())
}

/// Read a forecast previously written by [`write_forecast_json`].
pub fn read_forecast_json(path: &Path) -> Result<ForecastFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open forecast JSON '{}': {e}", path.display())))?;
    serde_json::from_reader(file).map_err(|e| AppError::new(2, format!("Invalid forecast JSON: {e}")))
}
