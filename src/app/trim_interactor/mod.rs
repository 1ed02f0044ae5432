// Trim interactor - Removes leading advertisement frames with frame accuracy

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use crate::app::staging::{discard_partial_canonical, remove_work_files, stage_canonical};
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::planner::{self, EncodeSettings, RoughCut};
use crate::ports::*;
use crate::utils::{rename_with_retry, RetryPolicy};

/// Intermediates owned by the trim pipeline
const TRIM_FILES: [WorkFile; 4] = [
    WorkFile::Untrimmed,
    WorkFile::Prefix,
    WorkFile::Video,
    WorkFile::List,
];

/// Interactor for the trim pipeline
pub struct TrimInteractor {
    tools: Arc<dyn ToolPort>,
    probe: Arc<dyn ProbePort>,
    fs: Arc<dyn FsPort>,
    encode: EncodeSettings,
    retry: RetryPolicy,
}

impl TrimInteractor {
    /// Create new trim interactor with injected ports
    pub fn new(
        tools: Arc<dyn ToolPort>,
        probe: Arc<dyn ProbePort>,
        fs: Arc<dyn FsPort>,
        encode: EncodeSettings,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            tools,
            probe,
            fs,
            encode,
            retry,
        }
    }

    /// Trim the advertisement off `episode.mkv` in `workdir`
    ///
    /// The body after the estimated keyframe is stream-copied, the segment
    /// between the end of the advertisement and that keyframe is re-encoded,
    /// and the two are concatenated back into `episode.mkv`.
    pub async fn execute(
        &self,
        workdir: &Path,
        timing: TimingParams,
    ) -> Result<TrimReport, DomainError> {
        let started_at = Utc::now();
        info!(
            workdir = %workdir.display(),
            ad_length_ms = timing.ad_length_ms,
            estimated_key_frame_ms = timing.estimated_key_frame_ms,
            "Trimming advertisement"
        );

        let fs = self.fs.as_ref();
        remove_work_files(fs, workdir, &[WorkFile::Prefix, WorkFile::Video, WorkFile::List])
            .await
            .in_step(PipelineStep::Staging)?;
        let resumed = stage_canonical(fs, workdir, WorkFile::Untrimmed, self.retry)
            .await
            .in_step(PipelineStep::Staging)?;

        let untrimmed_ms = self
            .probe
            .probe_duration_ms(workdir, WorkFile::Untrimmed)
            .await
            .in_step(PipelineStep::ProbeUntrimmed)?;

        let rough = RoughCut::new(&timing).in_step(PipelineStep::RoughCut)?;
        self.run_checked(&rough.invocation(workdir))
            .await
            .in_step(PipelineStep::RoughCut)?;

        let video = self
            .probe
            .probe(workdir, WorkFile::Video)
            .await
            .in_step(PipelineStep::ProbeRoughCut)?;

        let fine = planner::plan_fine_cut(&timing, untrimmed_ms, video.duration_ms, video.frame_rate)
            .in_step(PipelineStep::DeriveGap)?;
        let key_frame_gap_ms = fine.map_or(0, |cut| cut.duration_ms);
        debug!(
            untrimmed_ms,
            video_ms = video.duration_ms,
            key_frame_gap_ms,
            frame_rate = %video.frame_rate,
            "derived keyframe gap"
        );

        match fine {
            Some(cut) => {
                self.run_checked(&cut.invocation(workdir, &self.encode))
                    .await
                    .in_step(PipelineStep::FineCut)?;

                let manifest = planner::concat_manifest();
                fs.write_file(
                    &workdir.join(WorkFile::List.file_name()),
                    manifest.render().as_bytes(),
                )
                .await
                .in_step(PipelineStep::WriteManifest)?;

                let concat = self.run_checked(&planner::concat_invocation(workdir)).await;
                discard_partial_canonical(fs, workdir, concat)
                    .await
                    .in_step(PipelineStep::Concatenate)?;
            }
            None => {
                info!("Rough cut landed on the end of the advertisement, skipping prefix clip");
                rename_with_retry(
                    fs,
                    &workdir.join(WorkFile::Video.file_name()),
                    &workdir.join(WorkFile::Canonical.file_name()),
                    self.retry,
                )
                .await
                .in_step(PipelineStep::Concatenate)?;
            }
        }

        remove_work_files(fs, workdir, &TRIM_FILES)
            .await
            .in_step(PipelineStep::Cleanup)?;

        info!(key_frame_gap_ms, "Advertisement trimmed");
        Ok(TrimReport {
            timing,
            untrimmed_ms,
            video_ms: video.duration_ms,
            key_frame_gap_ms,
            frame_rate: video.frame_rate,
            fine_cut: fine.is_some(),
            resumed,
            started_at,
            finished_at: Utc::now(),
        })
    }

    async fn run_checked(&self, invocation: &ToolInvocation) -> Result<ToolOutput, DomainError> {
        self.tools.run(invocation).await?.into_checked(invocation.tool)
    }
}
