//! API error type and its JSON response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use scoreboard_core::error::StoreError;
use scoreboard_core::protocol::{ErrorBody, timestamp};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::MatchNotFound(_) => ApiError::NotFound(e.to_string()),
            StoreError::CourtOccupied(_) => ApiError::Conflict(e.to_string()),
            StoreError::Invalid(_) => ApiError::BadRequest(e.to_string()),
            StoreError::Unavailable(_) | StoreError::Remote { .. } | StoreError::Decode(_) => {
                ApiError::Internal(e.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = ErrorBody {
            error: self.to_string(),
            timestamp: timestamp(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use scoreboard_core::error::ValidationError;
    use scoreboard_core::model::CourtNumber;

    use super::*;

    #[test]
    fn store_errors_map_to_statuses() {
        let court = CourtNumber::new(3).unwrap();
        assert_eq!(
            ApiError::from(StoreError::CourtOccupied(court)).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::from(StoreError::MatchNotFound("x".into())).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(StoreError::from(ValidationError::new("bad"))).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(StoreError::Unavailable("down".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn response_carries_status() {
        let response = ApiError::NotFound("no such match".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
