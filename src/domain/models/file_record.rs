use chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub struct FileRecord {
    pub id: Uuid,
    pub filename: String,
    pub index: u64,
    pub upload_date: DateTime<Utc>,
}
