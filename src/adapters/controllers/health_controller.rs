use axum::{extract::State, Json};
use serde::Serialize;
use tracing::debug;

use crate::{adapters::state::AppState, application::error::ApplicationError};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(rename = "fileCount")]
    pub file_count: u64,
}

pub struct HealthController;

impl HealthController {
    /// GET /health
    pub async fn health_check(
        State(app_state): State<AppState>,
    ) -> Result<Json<HealthResponse>, ApplicationError> {
        let file_count = app_state.file_service.count().await?;
        debug!("Health check: {} file record(s)", file_count);

        Ok(Json(HealthResponse {
            status: "healthy".to_string(),
            file_count,
        }))
    }
}
