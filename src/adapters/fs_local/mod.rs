// Local filesystem adapter - File system operations on the working directory

use std::io;
use std::path::Path;

use async_trait::async_trait;
use tokio::fs;

use crate::domain::errors::*;
use crate::ports::*;

/// Filesystem adapter backed by `tokio::fs`
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFsAdapter;

impl LocalFsAdapter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FsPort for LocalFsAdapter {
    async fn file_exists(&self, path: &Path) -> Result<bool, DomainError> {
        fs::try_exists(path)
            .await
            .map_err(|e| DomainError::file_op(format!("failed to check {}", path.display()), e))
    }

    async fn remove_if_exists(&self, path: &Path) -> Result<(), DomainError> {
        match fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(DomainError::file_op(
                format!("failed to delete {}", path.display()),
                e,
            )),
        }
    }

    async fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        fs::rename(from, to).await
    }

    async fn write_file(&self, path: &Path, contents: &[u8]) -> Result<(), DomainError> {
        fs::write(path, contents)
            .await
            .map_err(|e| DomainError::file_op(format!("failed to write {}", path.display()), e))
    }
}
