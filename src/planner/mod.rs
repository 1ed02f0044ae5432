//! Cut planning
//!
//! Turns caller timing and probe results into the exact external invocations
//! of the trim pipeline. The rough cut is a stream copy that snaps to the first
//! keyframe at or after the estimated offset; the fine cut re-encodes the short
//! segment between the end of the advertisement and that keyframe.

use std::path::Path;

use crate::domain::errors::DomainError;
use crate::domain::model::{format_seconds, ConcatManifest, FrameRate, TimingParams, WorkFile};
use crate::ports::{Tool, ToolInvocation};

/// Encoder settings for the re-encoded fine cut
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeSettings {
    pub crf: u8,
    /// Must match the codec of the stream-copied body
    pub audio_codec: String,
}

impl Default for EncodeSettings {
    fn default() -> Self {
        Self {
            crf: 5,
            audio_codec: "aac".to_string(),
        }
    }
}

/// Length of content between the end of the advertisement and the rough cut's keyframe
///
/// A negative gap means the estimated keyframe undershot the real one and is
/// rejected rather than clamped.
pub fn key_frame_gap_ms(
    untrimmed_ms: i64,
    video_ms: i64,
    ad_length_ms: u64,
) -> Result<i64, DomainError> {
    let ad_length_ms = signed_ms("advertisement length", ad_length_ms)?;
    let gap = (untrimmed_ms - video_ms) - ad_length_ms;
    if gap < 0 {
        return Err(DomainError::Input(format!(
            "keyframe gap is negative ({} ms): untrimmed {} ms, video {} ms, advertisement {} ms",
            gap, untrimmed_ms, video_ms, ad_length_ms
        )));
    }
    Ok(gap)
}

fn signed_ms(what: &str, ms: u64) -> Result<i64, DomainError> {
    i64::try_from(ms).map_err(|_| DomainError::Input(format!("{} {} ms is out of range", what, ms)))
}

/// Stream-copy cut starting at the estimated keyframe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoughCut {
    pub seek_ms: i64,
}

impl RoughCut {
    pub fn new(timing: &TimingParams) -> Result<Self, DomainError> {
        Ok(Self {
            seek_ms: signed_ms("estimated keyframe", timing.estimated_key_frame_ms)?,
        })
    }

    pub fn invocation(&self, workdir: &Path) -> ToolInvocation {
        ToolInvocation::new(Tool::Ffmpeg, workdir)
            .arg("-ss")
            .arg(format_seconds(self.seek_ms))
            .arg("-i")
            .arg(WorkFile::Untrimmed.file_name())
            .args(["-c", "copy", "-avoid_negative_ts", "1", "-y"])
            .arg(WorkFile::Video.file_name())
    }
}

/// Re-encoded cut of the intro segment dropped by the rough cut
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FineCut {
    pub seek_ms: i64,
    pub duration_ms: i64,
    pub frame_rate: FrameRate,
}

impl FineCut {
    pub fn invocation(&self, workdir: &Path, settings: &EncodeSettings) -> ToolInvocation {
        ToolInvocation::new(Tool::Ffmpeg, workdir)
            .arg("-ss")
            .arg(format_seconds(self.seek_ms))
            .arg("-i")
            .arg(WorkFile::Untrimmed.file_name())
            .arg("-t")
            .arg(format_seconds(self.duration_ms))
            .arg("-crf")
            .arg(settings.crf.to_string())
            .args(["-vsync", "1"])
            .arg("-r")
            .arg(self.frame_rate.to_arg())
            .arg("-c:a")
            .arg(settings.audio_codec.clone())
            .arg("-y")
            .arg(WorkFile::Prefix.file_name())
    }
}

/// Fine cut derived from both duration probes, or `None` for a zero gap
pub fn plan_fine_cut(
    timing: &TimingParams,
    untrimmed_ms: i64,
    video_ms: i64,
    frame_rate: FrameRate,
) -> Result<Option<FineCut>, DomainError> {
    let gap = key_frame_gap_ms(untrimmed_ms, video_ms, timing.ad_length_ms)?;
    if gap == 0 {
        return Ok(None);
    }
    Ok(Some(FineCut {
        seek_ms: signed_ms("advertisement length", timing.ad_length_ms)?,
        duration_ms: gap,
        frame_rate,
    }))
}

/// Prefix first, then the stream-copied body
pub fn concat_manifest() -> ConcatManifest {
    ConcatManifest::new([WorkFile::Prefix.file_name(), WorkFile::Video.file_name()])
}

pub fn concat_invocation(workdir: &Path) -> ToolInvocation {
    ToolInvocation::new(Tool::Ffmpeg, workdir)
        .args(["-f", "concat", "-i"])
        .arg(WorkFile::List.file_name())
        .args(["-c", "copy", "-y"])
        .arg(WorkFile::Canonical.file_name())
}
