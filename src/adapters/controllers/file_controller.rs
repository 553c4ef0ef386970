use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, Path, State,
    },
    http::{header, HeaderMap, StatusCode},
    Json,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    adapters::{
        dto::file_dto::{
            FileResponse, MessageResponse, UploadFilesResponse, DELETE_SUCCESS_MESSAGE,
        },
        state::AppState,
    },
    application::error::ApplicationError,
    domain::models::file::FileData,
};

const FILES_FIELD: &str = "files[]";
const FILES_FIELD_ALT: &str = "files";

pub struct FileController;

impl FileController {
    /// POST /upload
    /// Multipart body with up to the configured number of `files[]` parts.
    pub async fn upload_files(
        State(app_state): State<AppState>,
        multipart: Result<Multipart, MultipartRejection>,
    ) -> Result<Json<UploadFilesResponse>, ApplicationError> {
        let mut multipart = multipart.map_err(|e| {
            warn!("Rejected upload request: {}", e);
            ApplicationError::BadRequest("Expected a multipart/form-data body".to_string())
        })?;

        let max_files = app_state.file_service.max_files_per_upload();
        let mut files: Vec<FileData> = Vec::new();

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let name = field.name().unwrap_or("").to_string();
            if name != FILES_FIELD && name != FILES_FIELD_ALT {
                continue;
            }

            // Browsers send an empty, unnamed part for an untouched file input.
            let filename = match field.file_name() {
                Some(filename) if !filename.is_empty() => filename.to_string(),
                _ => continue,
            };

            if files.len() == max_files {
                return Err(ApplicationError::BadRequest(format!(
                    "Too many files: at most {} per upload",
                    max_files
                )));
            }

            let content = field.bytes().await.map_err(multipart_error)?;
            files.push(FileData::new(content.to_vec(), filename));
        }

        info!("Received upload with {} file(s)", files.len());

        let records = app_state.file_service.upload(files).await?;

        Ok(Json(UploadFilesResponse::from(records)))
    }

    /// GET /files
    pub async fn list_files(
        State(app_state): State<AppState>,
        headers: HeaderMap,
    ) -> Result<Json<Vec<FileResponse>>, ApplicationError> {
        let records = app_state.file_service.list().await?;
        let base_url = base_url(&app_state, &headers);

        Ok(Json(
            records
                .into_iter()
                .map(|record| FileResponse::new(record, &base_url))
                .collect(),
        ))
    }

    /// DELETE /files/{file_id}
    pub async fn delete_file(
        State(app_state): State<AppState>,
        Path(file_id): Path<String>,
    ) -> Result<Json<MessageResponse>, ApplicationError> {
        let id = Uuid::parse_str(&file_id).map_err(|e| {
            warn!("Invalid file id '{}': {}", file_id, e);
            ApplicationError::NotFound
        })?;

        app_state.file_service.delete(id).await?;

        Ok(Json(MessageResponse::new(DELETE_SUCCESS_MESSAGE)))
    }
}

fn multipart_error(error: MultipartError) -> ApplicationError {
    if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApplicationError::PayloadTooLarge
    } else {
        warn!("Invalid multipart data: {}", error);
        ApplicationError::BadRequest("Invalid multipart data".to_string())
    }
}

/// `<scheme>://<host>` for download URLs, preferring the configured public
/// URL, then forwarding headers, then the request's own Host.
fn base_url(app_state: &AppState, headers: &HeaderMap) -> String {
    if let Some(public_base_url) = &app_state.public_base_url {
        return public_base_url.clone();
    }

    let header_value = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let scheme = header_value("x-forwarded-proto").unwrap_or_else(|| "http".to_string());
    let host = header_value("x-forwarded-host")
        .or_else(|| header_value(header::HOST.as_str()))
        .unwrap_or_else(|| format!("localhost:{}", app_state.port));

    format!("{}://{}", scheme, host)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::HeaderValue;

    use super::*;
    use crate::{
        adapters::repositories::InMemoryMetadataRepository,
        application::services::FileService, services::LocalDiskStorageService,
    };

    async fn state(public_base_url: Option<&str>) -> (AppState, tempfile::TempDir) {
        let temp = tempfile::tempdir().unwrap();
        let storage = LocalDiskStorageService::new(temp.path()).await.unwrap();
        let file_service = FileService::new(
            Arc::new(storage),
            Arc::new(InMemoryMetadataRepository::new()),
            10,
        );

        let state = AppState {
            file_service: Arc::new(file_service),
            public_base_url: public_base_url.map(str::to_string),
            port: 3000,
        };
        (state, temp)
    }

    #[tokio::test]
    async fn base_url_prefers_configured_value() {
        let (state, _temp) = state(Some("https://cdn.example.com")).await;
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("internal:3000"));

        assert_eq!(base_url(&state, &headers), "https://cdn.example.com");
    }

    #[tokio::test]
    async fn base_url_reads_forwarding_headers() {
        let (state, _temp) = state(None).await;
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("internal:3000"));
        headers.insert("x-forwarded-proto", HeaderValue::from_static("https, http"));
        headers.insert("x-forwarded-host", HeaderValue::from_static("files.example.com"));

        assert_eq!(base_url(&state, &headers), "https://files.example.com");
    }

    #[tokio::test]
    async fn base_url_falls_back_to_host_then_port() {
        let (state, _temp) = state(None).await;

        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("example.test:8080"));
        assert_eq!(base_url(&state, &headers), "http://example.test:8080");

        assert_eq!(base_url(&state, &HeaderMap::new()), "http://localhost:3000");
    }
}
