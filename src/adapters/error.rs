use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{error, warn};

use crate::application::error::ApplicationError;

impl IntoResponse for ApplicationError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApplicationError::NotFound => {
                warn!("File not found");
                (StatusCode::NOT_FOUND, "File not found!".to_string())
            }
            ApplicationError::BadRequest(msg) => {
                warn!("Bad request: {}", msg);
                (StatusCode::BAD_REQUEST, msg)
            }
            ApplicationError::PayloadTooLarge => {
                warn!("Upload exceeds the request size limit");
                (StatusCode::PAYLOAD_TOO_LARGE, "File too large!".to_string())
            }
            ApplicationError::InternalError(ref msg) => {
                error!("Internal server error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ApplicationError::DatabaseError(ref msg) => {
                error!("Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "message": message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_the_error_kind() {
        let cases = [
            (ApplicationError::NotFound, StatusCode::NOT_FOUND),
            (
                ApplicationError::BadRequest("No files uploaded".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (ApplicationError::PayloadTooLarge, StatusCode::PAYLOAD_TOO_LARGE),
            (
                ApplicationError::InternalError("disk".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                ApplicationError::DatabaseError("pool".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, status) in cases {
            assert_eq!(error.into_response().status(), status);
        }
    }
}
