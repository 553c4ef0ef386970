mod error;
mod local_disk_storage;

pub use error::StorageError;
pub use local_disk_storage::LocalDiskStorageService;

use std::sync::Arc;

use tracing::info;

use crate::{application::services::StorageService, domain::config::app::AppConfig};

pub async fn create_storage_service(
    config: &AppConfig,
) -> Result<Arc<dyn StorageService>, StorageError> {
    let service = LocalDiskStorageService::new(&config.upload_dir).await?;
    info!("Storing uploads in {}", service.base_path().display());
    Ok(Arc::new(service))
}
