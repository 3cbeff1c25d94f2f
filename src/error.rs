use thiserror::Error;

/// Failures of the forecasting core (training and prediction).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ForecastError {
    /// Not enough training samples for the configured cross-validation.
    #[error("Insufficient data: need at least {required} training samples, got {got}.")]
    InsufficientData { required: usize, got: usize },

    /// The regressor could not be fit for any candidate hyperparameters.
    #[error("Model fit failed: {0}")]
    ModelFit(String),

    /// Malformed request (empty or non-future day indices, bad grid, ...).
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl ForecastError {
    pub fn exit_code(&self) -> u8 {
        match self {
            ForecastError::InvalidInput(_) => 2,
            ForecastError::InsufficientData { .. } => 3,
            ForecastError::ModelFit(_) => 4,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<ForecastError> for AppError {
    fn from(err: ForecastError) -> Self {
        AppError::new(err.exit_code(), err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forecast_errors_map_to_exit_codes() {
        let err: AppError = ForecastError::InsufficientData { required: 5, got: 3 }.into();
        assert_eq!(err.exit_code(), 3);
        assert!(err.to_string().contains("got 3"));

        let err: AppError = ForecastError::InvalidInput("empty".into()).into();
        assert_eq!(err.exit_code(), 2);

        let err: AppError = ForecastError::ModelFit("nan".into()).into();
        assert_eq!(err.exit_code(), 4);
    }
}
