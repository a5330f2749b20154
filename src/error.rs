use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ForecastError {
    #[error("team catalog unavailable: {0}")]
    LoadFailure(String),

    #[error("prediction failed: {0}")]
    PredictionFailure(String),
}

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("http {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid json: {0}")]
    Decode(String),

    #[error("no response after {0:?}")]
    Timeout(Duration),

    #[error("provider worker is not running")]
    WorkerGone,
}

impl BackendError {
    pub fn into_load_failure(self) -> ForecastError {
        ForecastError::LoadFailure(self.to_string())
    }

    pub fn into_prediction_failure(self) -> ForecastError {
        ForecastError::PredictionFailure(self.to_string())
    }
}

impl From<serde_json::Error> for BackendError {
    fn from(err: serde_json::Error) -> Self {
        BackendError::Decode(err.to_string())
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return BackendError::Transport(format!("timed out: {err}"));
        }
        if let Some(status) = err.status() {
            return BackendError::Status {
                status: status.as_u16(),
                body: err.to_string(),
            };
        }
        if err.is_decode() {
            return BackendError::Decode(err.to_string());
        }
        BackendError::Transport(err.to_string())
    }
}
