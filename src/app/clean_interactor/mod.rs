// Clean interactor - Structural optimization of the finished container

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::app::staging::{discard_partial_canonical, remove_work_files, stage_canonical};
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;
use crate::utils::RetryPolicy;

pub fn optimize_invocation(workdir: &Path) -> ToolInvocation {
    ToolInvocation::new(Tool::Mkclean, workdir)
        .arg("--optimize")
        .arg(WorkFile::Dirty.file_name())
        .arg(WorkFile::Canonical.file_name())
}

/// Interactor for the container cleanup pass
pub struct CleanInteractor {
    tools: Arc<dyn ToolPort>,
    fs: Arc<dyn FsPort>,
    retry: RetryPolicy,
}

impl CleanInteractor {
    pub fn new(tools: Arc<dyn ToolPort>, fs: Arc<dyn FsPort>, retry: RetryPolicy) -> Self {
        Self { tools, fs, retry }
    }

    pub async fn execute(&self, workdir: &Path) -> Result<CleanReport, DomainError> {
        let started_at = Utc::now();
        info!("Optimizing container for playback");
        let fs = self.fs.as_ref();

        let resumed = stage_canonical(fs, workdir, WorkFile::Dirty, self.retry)
            .await
            .in_step(PipelineStep::Staging)?;

        let invocation = optimize_invocation(workdir);
        let written = self
            .tools
            .run(&invocation)
            .await
            .and_then(|output| output.into_checked(invocation.tool));
        discard_partial_canonical(fs, workdir, written)
            .await
            .in_step(PipelineStep::Optimize)?;

        remove_work_files(fs, workdir, &[WorkFile::Dirty])
            .await
            .in_step(PipelineStep::Cleanup)?;

        info!("Container optimized");
        Ok(CleanReport {
            resumed,
            started_at,
            finished_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optimizer_rewrites_dirty_into_canonical() {
        let invocation = optimize_invocation(Path::new("tmp"));
        assert_eq!(invocation.tool, Tool::Mkclean);
        assert_eq!(
            invocation.args,
            vec!["--optimize", "dirty.episode.mkv", "episode.mkv"]
        );
    }
}
