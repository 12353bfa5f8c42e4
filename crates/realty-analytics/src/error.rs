use crate::analysis::investment::{InvestmentError, ScenarioError, ScenarioStoreError};
use crate::analysis::readiness::{ConfigurationError, ReadinessError};
use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Investment(InvestmentError),
    Scenario(ScenarioStoreError),
    Readiness(ReadinessError),
    Rubric(ConfigurationError),
    Export(csv::Error),
    Serialization(serde_json::Error),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Investment(err) => write!(f, "investment analysis error: {}", err),
            AppError::Scenario(err) => write!(f, "scenario error: {}", err),
            AppError::Readiness(err) => write!(f, "readiness scoring error: {}", err),
            AppError::Rubric(err) => write!(f, "readiness rubric error: {}", err),
            AppError::Export(err) => write!(f, "export error: {}", err),
            AppError::Serialization(err) => write!(f, "serialization error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Investment(err) => Some(err),
            AppError::Scenario(err) => Some(err),
            AppError::Readiness(err) => Some(err),
            AppError::Rubric(err) => Some(err),
            AppError::Export(err) => Some(err),
            AppError::Serialization(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        let (status, body) = match &self {
            AppError::Investment(InvestmentError::InvalidInput { field, constraint }) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({ "error": message, "field": field, "constraint": constraint }),
            ),
            AppError::Scenario(ScenarioStoreError::Scenario(ScenarioError::EmptyName)) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({ "error": message, "field": "label", "constraint": "non_empty" }),
            ),
            AppError::Scenario(ScenarioStoreError::Scenario(ScenarioError::DuplicateName {
                label,
            })) => (
                StatusCode::CONFLICT,
                json!({ "error": message, "field": "label", "label": label }),
            ),
            AppError::Readiness(ReadinessError::MissingCategory { category }) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({ "error": message, "category": category }),
            ),
            AppError::Scenario(ScenarioStoreError::Unavailable(_)) => {
                (StatusCode::SERVICE_UNAVAILABLE, json!({ "error": message }))
            }
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_)
            | AppError::Rubric(_)
            | AppError::Export(_)
            | AppError::Serialization(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": message }))
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<InvestmentError> for AppError {
    fn from(value: InvestmentError) -> Self {
        Self::Investment(value)
    }
}

impl From<ScenarioStoreError> for AppError {
    fn from(value: ScenarioStoreError) -> Self {
        Self::Scenario(value)
    }
}

impl From<ScenarioError> for AppError {
    fn from(value: ScenarioError) -> Self {
        Self::Scenario(ScenarioStoreError::Scenario(value))
    }
}

impl From<ReadinessError> for AppError {
    fn from(value: ReadinessError) -> Self {
        Self::Readiness(value)
    }
}

impl From<ConfigurationError> for AppError {
    fn from(value: ConfigurationError) -> Self {
        Self::Rubric(value)
    }
}

impl From<csv::Error> for AppError {
    fn from(value: csv::Error) -> Self {
        Self::Export(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}
