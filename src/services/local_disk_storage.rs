use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::{fs, io::AsyncWriteExt};
use tracing::{debug, info};

use crate::{
    application::{error::ApplicationError, services::StorageService},
    domain::models::file::FileData,
    services::error::StorageError,
};

/// Keeps uploaded bytes as flat files inside one directory.
pub struct LocalDiskStorageService {
    base_path: PathBuf,
}

impl LocalDiskStorageService {
    /// Opens the storage directory, creating it (and any parents) when it
    /// does not exist yet.
    pub async fn new(base_path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let base_path = base_path.into();

        if !fs::try_exists(&base_path).await? {
            fs::create_dir_all(&base_path).await?;
            info!("Created upload directory {}", base_path.display());
        }

        Ok(Self { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn file_path(&self, stored_name: &str) -> Result<PathBuf, StorageError> {
        let is_plain_name = !stored_name.is_empty()
            && stored_name != "."
            && stored_name != ".."
            && !stored_name.contains(['/', '\\', '\0']);

        if !is_plain_name {
            return Err(StorageError::InvalidName(stored_name.to_string()));
        }

        Ok(self.base_path.join(stored_name))
    }
}

#[async_trait]
impl StorageService for LocalDiskStorageService {
    async fn save(&self, stored_name: &str, file_data: &FileData) -> Result<(), ApplicationError> {
        let path = self.file_path(stored_name)?;

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|e| StorageError::from_io(e, stored_name))?;

        file.write_all(&file_data.content)
            .await
            .map_err(|e| StorageError::from_io(e, stored_name))?;
        file.flush()
            .await
            .map_err(|e| StorageError::from_io(e, stored_name))?;

        debug!("Wrote {} bytes to {}", file_data.size(), path.display());
        Ok(())
    }

    async fn remove(&self, stored_name: &str) -> Result<(), ApplicationError> {
        let path = self.file_path(stored_name)?;

        fs::remove_file(&path)
            .await
            .map_err(|e| StorageError::from_io(e, stored_name))?;

        debug!("Removed {}", path.display());
        Ok(())
    }

    async fn list(&self) -> Result<Vec<String>, ApplicationError> {
        let mut entries = fs::read_dir(&self.base_path)
            .await
            .map_err(StorageError::from)?;

        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(StorageError::from)? {
            let file_type = entry.file_type().await.map_err(StorageError::from)?;
            if !file_type.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }

        names.sort();
        Ok(names)
    }
}
