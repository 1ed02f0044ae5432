// Staging - Moves the canonical container aside before a stage rewrites it

use std::path::Path;

use tracing::{debug, warn};

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::FsPort;
use crate::utils::{rename_with_retry, RetryPolicy};

/// Rename the canonical container to `staged`
///
/// Returns `true` when the canonical file was absent and a `staged` file left
/// by an interrupted run is reused instead.
pub async fn stage_canonical(
    fs: &dyn FsPort,
    workdir: &Path,
    staged: WorkFile,
    retry: RetryPolicy,
) -> Result<bool, DomainError> {
    let canonical = workdir.join(WorkFile::Canonical.file_name());
    let staged_path = workdir.join(staged.file_name());

    if fs.file_exists(&canonical).await? {
        fs.remove_if_exists(&staged_path).await?;
        rename_with_retry(fs, &canonical, &staged_path, retry).await?;
        debug!(staged = %staged, "staged canonical container");
        return Ok(false);
    }

    if fs.file_exists(&staged_path).await? {
        warn!(
            staged = %staged,
            "{} is missing, resuming from {} left by an interrupted run",
            CANONICAL_NAME,
            staged
        );
        return Ok(true);
    }

    Err(DomainError::Input(format!(
        "no {} (or {}) in {}",
        CANONICAL_NAME,
        staged,
        workdir.display()
    )))
}

/// Drop a canonical container left behind by a failed writer
///
/// The writer may have created `episode.mkv` before failing. Removing it lets
/// the next run resume from the staged input instead of staging the partial
/// file over it.
pub async fn discard_partial_canonical<T>(
    fs: &dyn FsPort,
    workdir: &Path,
    result: Result<T, DomainError>,
) -> Result<T, DomainError> {
    if result.is_err() {
        let canonical = workdir.join(WorkFile::Canonical.file_name());
        if let Err(err) = fs.remove_if_exists(&canonical).await {
            warn!(error = %err, "could not remove partial {}", CANONICAL_NAME);
        }
    }
    result
}

/// Delete each named file in the working directory, ignoring absent ones
pub async fn remove_work_files(
    fs: &dyn FsPort,
    workdir: &Path,
    files: &[WorkFile],
) -> Result<(), DomainError> {
    for file in files {
        fs.remove_if_exists(&workdir.join(file.file_name())).await?;
    }
    Ok(())
}
