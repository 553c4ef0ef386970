use async_trait::async_trait;

use crate::{application::error::ApplicationError, domain::models::file::FileData};

#[async_trait]
pub trait StorageService: Send + Sync {
    /// Writes `file_data` under `stored_name`, replacing nothing: the name
    /// is expected to be fresh.
    async fn save(&self, stored_name: &str, file_data: &FileData) -> Result<(), ApplicationError>;
    async fn remove(&self, stored_name: &str) -> Result<(), ApplicationError>;
    async fn list(&self) -> Result<Vec<String>, ApplicationError>;
}
