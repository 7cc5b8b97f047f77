//! Application error handling

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::ai::GenerationError;
use crate::scrape::ScrapeError;

/// Message returned to clients for any generation-side failure
const GENERATION_FAILED: &str = "An error occurred while generating profiles.";

/// Application error type
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    ScrapeFailure(String),

    #[error("{0}")]
    GenerationFailure(String),

    #[error("{0}")]
    ParseFailure(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    RateLimited(String),

    #[error("{0}")]
    Internal(String),
}

/// JSON error body
#[derive(Serialize)]
pub struct ErrorBody {
    detail: String,
    kind: &'static str,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) | AppError::ScrapeFailure(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            AppError::GenerationFailure(_) | AppError::ParseFailure(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            AppError::InvalidInput(_) => "invalid_input",
            AppError::ScrapeFailure(_) => "scrape_failure",
            AppError::GenerationFailure(_) => "generation_failure",
            AppError::ParseFailure(_) => "parse_failure",
            AppError::NotFound(_) => "not_found",
            AppError::RateLimited(_) => "rate_limited",
            AppError::Internal(_) => "internal",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            kind: self.kind(),
            detail: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

impl From<medgen_core::CoreError> for AppError {
    fn from(err: medgen_core::CoreError) -> Self {
        match err {
            medgen_core::CoreError::InvalidCsv(_) => AppError::InvalidInput(err.to_string()),
            medgen_core::CoreError::Serialize(_) => AppError::Internal(err.to_string()),
        }
    }
}

impl From<ScrapeError> for AppError {
    fn from(err: ScrapeError) -> Self {
        AppError::ScrapeFailure(err.to_string())
    }
}

impl From<GenerationError> for AppError {
    fn from(err: GenerationError) -> Self {
        // Raw model output stays in the logs, never in the response
        match &err {
            GenerationError::Parse { reason, raw } => {
                tracing::error!(reason = %reason, raw_response = %raw, "Model response is not valid JSON");
                AppError::ParseFailure(GENERATION_FAILED.to_string())
            }
            other => {
                tracing::error!(error = %other, "Profile generation failed");
                AppError::GenerationFailure(GENERATION_FAILED.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::client::GeminiError;

    #[test]
    fn statuses_follow_taxonomy() {
        assert_eq!(AppError::InvalidInput("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::ScrapeFailure("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::ParseFailure("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn parse_failures_hide_raw_text() {
        let err: AppError = GenerationError::Parse {
            reason: "expected value".into(),
            raw: "secret model text".into(),
        }
        .into();
        assert_eq!(err.kind(), "parse_failure");
        assert!(!err.to_string().contains("secret"));

        let err: AppError = GenerationError::NoProfiles.into();
        assert_eq!(err.kind(), "generation_failure");
    }

    #[test]
    fn upstream_timeout_is_a_generation_failure() {
        let err: AppError = GenerationError::Upstream(GeminiError::Timeout).into();
        assert_eq!(err.kind(), "generation_failure");
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), GENERATION_FAILED);
    }
}
