use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{
    application::{
        dto::file_record_dto::NewFileRecordDTO, error::ApplicationError,
        repositories::metadata_repository::MetadataRepository,
    },
    domain::models::file_record::FileRecord,
};

/// Process-local store, selected with `DATABASE_URL=memory://`. Records
/// are kept in insertion order.
#[derive(Default)]
pub struct InMemoryMetadataRepository {
    records: Mutex<Vec<FileRecord>>,
}

impl InMemoryMetadataRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MetadataRepository for InMemoryMetadataRepository {
    async fn count_records(&self) -> Result<u64, ApplicationError> {
        Ok(self.records.lock().await.len() as u64)
    }

    async fn create_records(
        &self,
        records: Vec<NewFileRecordDTO>,
    ) -> Result<Vec<FileRecord>, ApplicationError> {
        let mut stored = self.records.lock().await;
        let existing = stored.len() as u64;

        let created: Vec<FileRecord> = records
            .into_iter()
            .enumerate()
            .map(|(i, record)| FileRecord {
                id: Uuid::new_v4(),
                filename: record.filename,
                index: existing + i as u64 + 1,
                upload_date: record.upload_date,
            })
            .collect();

        stored.extend(created.iter().cloned());
        Ok(created)
    }

    async fn get_records(&self) -> Result<Vec<FileRecord>, ApplicationError> {
        Ok(self.records.lock().await.clone())
    }

    async fn get_record(&self, id: Uuid) -> Result<FileRecord, ApplicationError> {
        self.records
            .lock()
            .await
            .iter()
            .find(|record| record.id == id)
            .cloned()
            .ok_or(ApplicationError::NotFound)
    }

    async fn delete_record(&self, id: Uuid) -> Result<FileRecord, ApplicationError> {
        let mut stored = self.records.lock().await;
        let position = stored
            .iter()
            .position(|record| record.id == id)
            .ok_or(ApplicationError::NotFound)?;

        Ok(stored.remove(position))
    }
}
