//! Retrying rename for files that may still be held open by a finished process

use std::path::Path;
use std::time::Duration;

use tracing::{debug, warn};

use crate::domain::errors::DomainError;
use crate::ports::FsPort;

/// Bounded attempt budget for [`rename_with_retry`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            delay: Duration::ZERO,
        }
    }
}

/// Rename `from` to `to`, retrying independent attempts until the budget is spent
pub async fn rename_with_retry(
    fs: &dyn FsPort,
    from: &Path,
    to: &Path,
    policy: RetryPolicy,
) -> Result<(), DomainError> {
    let attempts = policy.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match fs.rename(from, to).await {
            Ok(()) => {
                debug!(from = %from.display(), to = %to.display(), attempt, "renamed");
                return Ok(());
            }
            Err(source) if attempt >= attempts => {
                return Err(DomainError::Rename {
                    from: from.display().to_string(),
                    to: to.display().to_string(),
                    attempts,
                    source,
                });
            }
            Err(err) => {
                warn!(attempt, max = attempts, error = %err, "rename of {} failed, retrying", from.display());
                if !policy.delay.is_zero() {
                    tokio::time::sleep(policy.delay).await;
                }
                attempt += 1;
            }
        }
    }
}
