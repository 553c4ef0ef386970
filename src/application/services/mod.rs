mod file_service;
mod storage_service;

pub use file_service::{FileService, ReconcileReport};
pub use storage_service::StorageService;
