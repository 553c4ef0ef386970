use std::io;

use thiserror::Error;

use crate::application::error::ApplicationError;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Invalid stored name: {0}")]
    InvalidName(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl StorageError {
    pub fn from_io(error: io::Error, stored_name: &str) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => StorageError::NotFound(stored_name.to_string()),
            io::ErrorKind::PermissionDenied => {
                StorageError::PermissionDenied(format!("{}: {}", stored_name, error))
            }
            _ => StorageError::Io(format!("{}: {}", stored_name, error)),
        }
    }
}

// A stored file that is already gone still counts as a failed removal, so
// every storage error surfaces as a server error.
impl From<StorageError> for ApplicationError {
    fn from(error: StorageError) -> Self {
        ApplicationError::InternalError(format!("Storage error: {}", error))
    }
}

impl From<io::Error> for StorageError {
    fn from(error: io::Error) -> Self {
        StorageError::Io(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_keep_their_kind() {
        let missing = io::Error::new(io::ErrorKind::NotFound, "gone");
        assert!(matches!(
            StorageError::from_io(missing, "1-a.txt"),
            StorageError::NotFound(name) if name == "1-a.txt"
        ));

        let denied = io::Error::new(io::ErrorKind::PermissionDenied, "nope");
        assert!(matches!(
            StorageError::from_io(denied, "1-a.txt"),
            StorageError::PermissionDenied(_)
        ));
    }

    #[test]
    fn storage_errors_become_internal_errors() {
        let error: ApplicationError = StorageError::NotFound("1-a.txt".to_string()).into();
        assert!(matches!(
            error,
            ApplicationError::InternalError(msg) if msg.contains("1-a.txt")
        ));
    }
}
