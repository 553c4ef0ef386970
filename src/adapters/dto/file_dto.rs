use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::models::file_record::FileRecord;

pub const UPLOAD_SUCCESS_MESSAGE: &str = "Files uploaded successfully!";
pub const DELETE_SUCCESS_MESSAGE: &str = "File deleted successfully!";

#[derive(Debug, Serialize)]
pub struct UploadFilesResponse {
    pub message: String,
    pub files: Vec<String>,
}

impl From<Vec<FileRecord>> for UploadFilesResponse {
    fn from(records: Vec<FileRecord>) -> Self {
        Self {
            message: UPLOAD_SUCCESS_MESSAGE.to_string(),
            files: records.into_iter().map(|record| record.filename).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FileResponse {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub filename: String,
    pub index: u64,
    #[serde(rename = "uploadDate")]
    pub upload_date: DateTime<Utc>,
    pub url: String,
}

impl FileResponse {
    /// `base_url` is `<scheme>://<host>` with no trailing slash.
    pub fn new(record: FileRecord, base_url: &str) -> Self {
        Self {
            url: format!("{}/uploads/{}", base_url, record.filename),
            id: record.id,
            filename: record.filename,
            index: record.index,
            upload_date: record.upload_date,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
