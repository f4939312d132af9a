use crate::config::ConfigError;
use crate::predictor::{CriteriaError, DatasetError, ReportError};
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("server error: {0}")]
    Server(#[from] axum::Error),
    #[error("error loading data for selected round: {0}")]
    Dataset(#[from] DatasetError),
    #[error("invalid search: {0}")]
    Criteria(#[from] CriteriaError),
    #[error("report error: {0}")]
    Report(#[from] ReportError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Criteria(_) => StatusCode::BAD_REQUEST,
            AppError::Dataset(DatasetError::NotFound { .. }) => StatusCode::NOT_FOUND,
            AppError::Dataset(DatasetError::Malformed(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_)
            | AppError::Dataset(_)
            | AppError::Report(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predictor::Round;
    use std::path::PathBuf;

    #[test]
    fn maps_failures_to_http_status() {
        let round = Round::new(5).expect("valid round");
        let missing = AppError::from(DatasetError::NotFound {
            round,
            path: PathBuf::from("data/JoSAA_Round5_Data.json"),
        });
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);

        let criteria = AppError::from(CriteriaError::InvalidRank);
        assert_eq!(criteria.status(), StatusCode::BAD_REQUEST);

        let interrupted = AppError::from(DatasetError::Interrupted("cancelled".into()));
        assert_eq!(interrupted.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn message_names_the_failing_round() {
        let round = Round::new(2).expect("valid round");
        let err = AppError::from(DatasetError::NotFound {
            round,
            path: PathBuf::from("data/JoSAA_Round2_Data.json"),
        });
        assert_eq!(
            err.to_string(),
            "error loading data for selected round: no allotment data for round 2 at data/JoSAA_Round2_Data.json"
        );
    }
}
