use std::sync::Arc;

use axum::extract::FromRef;

use crate::application::services::FileService;

#[derive(Clone, FromRef)]
pub struct AppState {
    pub file_service: Arc<FileService>,
    /// Overrides the scheme and host used in download URLs.
    pub public_base_url: Option<String>,
    pub port: u16,
}
