//! Shared helpers for the HTTP integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, Response, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;
use upload_service::{
    adapters::{
        repositories::InMemoryMetadataRepository, router::create_router, state::AppState,
    },
    application::services::FileService,
    domain::config::app::AppConfig,
    services::LocalDiskStorageService,
};

pub const BOUNDARY: &str = "upload-service-test-boundary";
pub const TEST_HOST: &str = "files.test";

pub struct TestApp {
    pub router: Router,
    pub upload_dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// Builds the app around a fresh upload directory and in-memory store.
    pub async fn with_config(customize: impl FnOnce(&mut AppConfig)) -> Self {
        let upload_dir = tempfile::tempdir().expect("Failed to create upload directory");

        let mut config = AppConfig {
            upload_dir: upload_dir.path().to_path_buf(),
            database_url: "memory://".to_string(),
            ..AppConfig::default()
        };
        customize(&mut config);

        let storage = LocalDiskStorageService::new(&config.upload_dir)
            .await
            .expect("Failed to open storage");
        let file_service = FileService::new(
            Arc::new(storage),
            Arc::new(InMemoryMetadataRepository::new()),
            config.max_files_per_upload,
        );

        let state = AppState {
            file_service: Arc::new(file_service),
            public_base_url: config.public_base_url.clone(),
            port: config.port,
        };

        Self {
            router: create_router(state, &config),
            upload_dir,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("Router failed")
    }

    pub async fn upload(&self, files: &[(&str, &str)]) -> (StatusCode, Value) {
        let parts: Vec<(&str, &str, &str)> = files
            .iter()
            .map(|(name, content)| ("files[]", *name, *content))
            .collect();
        self.upload_parts(&parts).await
    }

    pub async fn upload_parts(&self, parts: &[(&str, &str, &str)]) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri("/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(multipart_body(parts)))
            .unwrap();

        json_response(self.send(request).await).await
    }

    pub async fn list(&self) -> Vec<Value> {
        let request = Request::builder()
            .uri("/files")
            .header(header::HOST, TEST_HOST)
            .body(Body::empty())
            .unwrap();

        let (status, body) = json_response(self.send(request).await).await;
        assert_eq!(status, StatusCode::OK);
        body.as_array().expect("Listing is not an array").clone()
    }

    pub async fn delete(&self, id: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("DELETE")
            .uri(format!("/files/{}", id))
            .body(Body::empty())
            .unwrap();

        json_response(self.send(request).await).await
    }

    /// Fetches a download URL from the listing through the router.
    pub async fn fetch(&self, url: &str) -> (StatusCode, Vec<u8>) {
        let path = url
            .strip_prefix(&format!("http://{}", TEST_HOST))
            .expect("URL does not use the request host");

        let request = Request::builder().uri(path).body(Body::empty()).unwrap();
        let response = self.send(request).await;
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, bytes.to_vec())
    }

    pub fn stored_files(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.upload_dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

/// Encodes `(field, filename, content)` parts as multipart/form-data.
pub fn multipart_body(parts: &[(&str, &str, &str)]) -> Vec<u8> {
    let mut body = Vec::new();
    for (field, filename, content) in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                field, filename
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(content.as_bytes());
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub async fn json_response(response: Response<Body>) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}
