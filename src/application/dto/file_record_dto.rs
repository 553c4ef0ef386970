use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::models::file_record::FileRecord;

#[derive(Debug, Clone)]
pub struct FileRecordDTO {
    pub id: Option<Uuid>,
    pub filename: Option<String>,
    pub index: Option<u64>,
    pub upload_date: Option<DateTime<Utc>>,
}

/// A record about to be inserted. The store assigns `id` and `index`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewFileRecordDTO {
    pub filename: String,
    pub upload_date: DateTime<Utc>,
}

impl NewFileRecordDTO {
    pub fn new(filename: String) -> Self {
        Self {
            filename,
            upload_date: Utc::now(),
        }
    }
}

impl From<FileRecordDTO> for FileRecord {
    fn from(value: FileRecordDTO) -> Self {
        FileRecord {
            id: value.id.unwrap_or_else(Uuid::new_v4),
            filename: value.filename.unwrap_or_default(),
            index: value.index.unwrap_or(0),
            upload_date: value.upload_date.unwrap_or_else(Utc::now),
        }
    }
}
