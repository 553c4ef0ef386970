use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    application::{dto::file_record_dto::NewFileRecordDTO, error::ApplicationError},
    domain::models::file_record::FileRecord,
};

#[async_trait]
pub trait MetadataRepository: Send + Sync {
    async fn count_records(&self) -> Result<u64, ApplicationError>;

    /// Inserts the batch and assigns indices `count + 1 ..= count + n` in
    /// batch order. Counting and inserting happen atomically with respect
    /// to other batches.
    async fn create_records(
        &self,
        records: Vec<NewFileRecordDTO>,
    ) -> Result<Vec<FileRecord>, ApplicationError>;

    async fn get_records(&self) -> Result<Vec<FileRecord>, ApplicationError>;
    async fn get_record(&self, id: Uuid) -> Result<FileRecord, ApplicationError>;
    async fn delete_record(&self, id: Uuid) -> Result<FileRecord, ApplicationError>;
}
