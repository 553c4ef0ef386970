use async_trait::async_trait;
use sqlx::{query_as, QueryBuilder};
use tracing::info;
use uuid::Uuid;

use crate::{
    application::{
        dto::file_record_dto::{FileRecordDTO, NewFileRecordDTO},
        error::ApplicationError,
        repositories::metadata_repository::MetadataRepository,
    },
    domain::models::file_record::FileRecord,
};

const RECORD_COLUMNS: &str = "id, filename, file_index, upload_date";

pub struct PgMetadataRepository {
    pool: sqlx::PgPool,
}

impl PgMetadataRepository {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }

    /// Creates the records table when it does not exist yet.
    pub async fn ensure_schema(&self) -> Result<(), ApplicationError> {
        let query = r#"
            CREATE TABLE IF NOT EXISTS uploaded_files (
                id          UUID PRIMARY KEY,
                filename    TEXT NOT NULL,
                file_index  BIGINT NOT NULL,
                upload_date TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
        "#;

        sqlx::query(query)
            .execute(&self.pool)
            .await
            .map_err(|e| ApplicationError::DatabaseError(e.to_string()))?;

        info!("Table uploaded_files is ready");
        Ok(())
    }
}

#[async_trait]
impl MetadataRepository for PgMetadataRepository {
    async fn count_records(&self) -> Result<u64, ApplicationError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM uploaded_files")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| ApplicationError::DatabaseError(e.to_string()))?;

        Ok(count.max(0) as u64)
    }

    async fn create_records(
        &self,
        records: Vec<NewFileRecordDTO>,
    ) -> Result<Vec<FileRecord>, ApplicationError> {
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| ApplicationError::DatabaseError(e.to_string()))?;

        // Blocks other batches between the count and the insert; plain
        // reads are unaffected.
        sqlx::query("LOCK TABLE uploaded_files IN SHARE ROW EXCLUSIVE MODE")
            .execute(&mut *tx)
            .await
            .map_err(|e| ApplicationError::DatabaseError(e.to_string()))?;

        let (existing,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM uploaded_files")
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| ApplicationError::DatabaseError(e.to_string()))?;

        let mut builder =
            QueryBuilder::new("INSERT INTO uploaded_files (id, filename, file_index, upload_date) ");
        builder.push_values(records.into_iter().enumerate(), |mut row, (i, record)| {
            row.push_bind(Uuid::new_v4())
                .push_bind(record.filename)
                .push_bind(existing + i as i64 + 1)
                .push_bind(record.upload_date);
        });
        builder.push(" RETURNING ");
        builder.push(RECORD_COLUMNS);

        let mut created: Vec<FileRecordDTO> = builder
            .build_query_as::<FileRecordDTO>()
            .fetch_all(&mut *tx)
            .await
            .map_err(|e| ApplicationError::DatabaseError(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| ApplicationError::DatabaseError(e.to_string()))?;

        created.sort_by_key(|dto| dto.index);
        Ok(created.into_iter().map(|dto| dto.into()).collect())
    }

    async fn get_records(&self) -> Result<Vec<FileRecord>, ApplicationError> {
        let query = format!(
            "SELECT {} FROM uploaded_files ORDER BY file_index, upload_date",
            RECORD_COLUMNS
        );

        let rows: Vec<FileRecordDTO> = query_as::<_, FileRecordDTO>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| ApplicationError::DatabaseError(e.to_string()))?;

        Ok(rows.into_iter().map(|dto| dto.into()).collect())
    }

    async fn get_record(&self, id: Uuid) -> Result<FileRecord, ApplicationError> {
        let query = format!("SELECT {} FROM uploaded_files WHERE id = $1", RECORD_COLUMNS);

        let fetched: Option<FileRecordDTO> = query_as::<_, FileRecordDTO>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| ApplicationError::DatabaseError(e.to_string()))?;

        fetched
            .map(|dto| dto.into())
            .ok_or(ApplicationError::NotFound)
    }

    async fn delete_record(&self, id: Uuid) -> Result<FileRecord, ApplicationError> {
        let query = format!(
            "DELETE FROM uploaded_files WHERE id = $1 RETURNING {}",
            RECORD_COLUMNS
        );

        let deleted: Option<FileRecordDTO> = query_as::<_, FileRecordDTO>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| ApplicationError::DatabaseError(e.to_string()))?;

        deleted
            .map(|dto| dto.into())
            .ok_or(ApplicationError::NotFound)
    }
}
