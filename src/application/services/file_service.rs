use std::{collections::HashSet, sync::Arc};

use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    application::{
        dto::file_record_dto::NewFileRecordDTO, error::ApplicationError,
        repositories::metadata_repository::MetadataRepository, services::StorageService,
    },
    domain::models::{
        file::{FileData, StoredNameGenerator},
        file_record::FileRecord,
    },
};

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ReconcileReport {
    /// Records removed because their stored file was missing.
    pub removed_records: Vec<FileRecord>,
    /// Stored files that no record points to. Left on disk.
    pub orphaned_files: Vec<String>,
}

pub struct FileService {
    storage: Arc<dyn StorageService>,
    metadata_repository: Arc<dyn MetadataRepository>,
    names: StoredNameGenerator,
    max_files_per_upload: usize,
}

impl FileService {
    pub fn new(
        storage: Arc<dyn StorageService>,
        metadata_repository: Arc<dyn MetadataRepository>,
        max_files_per_upload: usize,
    ) -> Self {
        Self {
            storage,
            metadata_repository,
            names: StoredNameGenerator::new(),
            max_files_per_upload,
        }
    }

    pub fn max_files_per_upload(&self) -> usize {
        self.max_files_per_upload
    }

    /// Stores every file, then records the whole batch at once.
    ///
    /// Files already written are kept when the metadata insert fails.
    pub async fn upload(&self, files: Vec<FileData>) -> Result<Vec<FileRecord>, ApplicationError> {
        if files.is_empty() {
            return Err(ApplicationError::BadRequest("No files uploaded!".to_string()));
        }

        if files.len() > self.max_files_per_upload {
            return Err(ApplicationError::BadRequest(format!(
                "Too many files: at most {} per upload",
                self.max_files_per_upload
            )));
        }

        let mut new_records = Vec::with_capacity(files.len());
        for file in &files {
            let stored_name = self.names.generate(&file.filename);
            self.storage.save(&stored_name, file).await?;
            info!(
                "Stored '{}' as '{}' ({} bytes)",
                file.filename,
                stored_name,
                file.size()
            );
            new_records.push(NewFileRecordDTO::new(stored_name));
        }

        let stored_names: Vec<String> = new_records.iter().map(|r| r.filename.clone()).collect();

        let records = self
            .metadata_repository
            .create_records(new_records)
            .await
            .map_err(|e| {
                error!(
                    "Metadata insert failed, stored files left without records: {:?}",
                    stored_names
                );
                e
            })?;

        Ok(records)
    }

    pub async fn list(&self) -> Result<Vec<FileRecord>, ApplicationError> {
        self.metadata_repository.get_records().await
    }

    pub async fn count(&self) -> Result<u64, ApplicationError> {
        self.metadata_repository.count_records().await
    }

    /// Removes the stored file first and the record second. A failed file
    /// removal leaves the record in place.
    pub async fn delete(&self, id: Uuid) -> Result<FileRecord, ApplicationError> {
        let record = self.metadata_repository.get_record(id).await?;

        self.storage.remove(&record.filename).await.map_err(|e| {
            warn!("Keeping record {} since '{}' could not be removed", id, record.filename);
            e
        })?;

        self.metadata_repository.delete_record(id).await.map_err(|e| {
            error!(
                "Stored file '{}' removed but record {} remains (orphaned record)",
                record.filename, id
            );
            e
        })?;

        info!("Deleted file '{}' (record {})", record.filename, id);

        Ok(record)
    }

    /// Drops records whose stored file is gone and reports stored files
    /// that have no record.
    pub async fn reconcile(&self) -> Result<ReconcileReport, ApplicationError> {
        let records = self.metadata_repository.get_records().await?;
        let stored: HashSet<String> = self.storage.list().await?.into_iter().collect();

        let mut report = ReconcileReport::default();
        let mut known = HashSet::with_capacity(records.len());

        for record in records {
            known.insert(record.filename.clone());

            if stored.contains(&record.filename) {
                continue;
            }

            warn!(
                "Record {} points to missing file '{}', removing it",
                record.id, record.filename
            );
            self.metadata_repository.delete_record(record.id).await?;
            report.removed_records.push(record);
        }

        let mut orphaned_files: Vec<String> = stored.difference(&known).cloned().collect();
        orphaned_files.sort();
        for name in &orphaned_files {
            warn!("Stored file '{}' has no record", name);
        }
        report.orphaned_files = orphaned_files;

        Ok(report)
    }
}
