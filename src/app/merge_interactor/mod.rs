// Merge interactor - Remuxes subtitles and language metadata into the episode

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::app::staging::{discard_partial_canonical, remove_work_files, stage_canonical};
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;
use crate::utils::RetryPolicy;

/// Remux invocation for the given language tags
///
/// Video and audio are stream-copied; with a subtitle language the external
/// ASS track is added and marked as the default subtitle stream.
pub fn merge_invocation(workdir: &Path, languages: &LanguageTags) -> ToolInvocation {
    let audio = format!("language={}", languages.audio);
    let invocation = ToolInvocation::new(Tool::Ffmpeg, workdir)
        .arg("-i")
        .arg(WorkFile::Unmerged.file_name());

    if languages.has_subtitles() {
        invocation
            .args(["-f", "ass", "-i"])
            .arg(WorkFile::Subtitles.file_name())
            .args(["-c:v", "copy", "-c:a", "copy", "-metadata:s:a:0"])
            .arg(audio)
            .arg("-metadata:s:s:0")
            .arg(format!("language={}", languages.subtitle))
            .args(["-disposition:s:0", "default", "-y"])
            .arg(WorkFile::Canonical.file_name())
    } else {
        invocation
            .args(["-c:v", "copy", "-c:a", "copy", "-metadata:s:a:0"])
            .arg(audio)
            .arg("-y")
            .arg(WorkFile::Canonical.file_name())
    }
}

/// Interactor for the subtitle and audio metadata merge
pub struct MergeInteractor {
    tools: Arc<dyn ToolPort>,
    fs: Arc<dyn FsPort>,
    retry: RetryPolicy,
}

impl MergeInteractor {
    pub fn new(tools: Arc<dyn ToolPort>, fs: Arc<dyn FsPort>, retry: RetryPolicy) -> Self {
        Self { tools, fs, retry }
    }

    pub async fn execute(
        &self,
        workdir: &Path,
        languages: LanguageTags,
    ) -> Result<MergeReport, DomainError> {
        let started_at = Utc::now();
        info!(
            audio = %languages.audio,
            subtitle = %languages.subtitle,
            "Merging subtitles and language metadata"
        );
        let fs = self.fs.as_ref();

        if languages.has_subtitles() {
            let subtitles = workdir.join(WorkFile::Subtitles.file_name());
            if !fs.file_exists(&subtitles).await.in_step(PipelineStep::Staging)? {
                return Err(DomainError::Step {
                    step: PipelineStep::Staging,
                    source: Box::new(DomainError::Input(format!(
                        "subtitle language {} requested but {} is missing",
                        languages.subtitle,
                        subtitles.display()
                    ))),
                });
            }
        }

        let resumed = stage_canonical(fs, workdir, WorkFile::Unmerged, self.retry)
            .await
            .in_step(PipelineStep::Staging)?;

        let invocation = merge_invocation(workdir, &languages);
        let written = self
            .tools
            .run(&invocation)
            .await
            .and_then(|output| output.into_checked(invocation.tool));
        discard_partial_canonical(fs, workdir, written)
            .await
            .in_step(PipelineStep::Merge)?;

        remove_work_files(fs, workdir, &[WorkFile::Subtitles, WorkFile::Unmerged])
            .await
            .in_step(PipelineStep::Cleanup)?;

        info!("Subtitles and language metadata merged");
        Ok(MergeReport {
            subtitles_merged: languages.has_subtitles(),
            languages,
            resumed,
            started_at,
            finished_at: Utc::now(),
        })
    }
}
