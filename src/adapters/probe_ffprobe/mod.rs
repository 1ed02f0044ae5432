//! FFprobe adapter for media file probing
//!
//! Asks ffprobe for single plain-text values and parses them. The frame rate is
//! read as the exact `avg_frame_rate` fraction; the cutter's own rate inference
//! rounds values like 30000/1001 and causes frame jumps at the end of the prefix.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

/// FFprobe-based probe adapter
pub struct FfprobeAdapter {
    tools: Arc<dyn ToolPort>,
}

impl FfprobeAdapter {
    pub fn new(tools: Arc<dyn ToolPort>) -> Self {
        Self { tools }
    }

    async fn query(
        &self,
        workdir: &Path,
        file: WorkFile,
        selection: &[&str],
    ) -> Result<String, DomainError> {
        let invocation = ToolInvocation::new(Tool::Ffprobe, workdir)
            .args(["-v", "error"])
            .args(selection.iter().copied())
            .args(["-of", "default=noprint_wrappers=1:nokey=1"])
            .arg(file.file_name());

        let output = match self.tools.run(&invocation).await {
            Ok(output) => output,
            Err(err @ (DomainError::ToolNotFound { .. } | DomainError::Timeout { .. })) => {
                return Err(err)
            }
            Err(err) => {
                return Err(DomainError::Probe {
                    file: file.to_string(),
                    message: err.to_string(),
                })
            }
        };

        if !output.success() {
            return Err(DomainError::Probe {
                file: file.to_string(),
                message: format!("ffprobe exited with {}: {}", output.status_text(), output.stderr.trim()),
            });
        }
        Ok(output.stdout)
    }
}

#[async_trait]
impl ProbePort for FfprobeAdapter {
    async fn probe_duration_ms(&self, workdir: &Path, file: WorkFile) -> Result<i64, DomainError> {
        let raw = self
            .query(workdir, file, &["-show_entries", "format=duration"])
            .await?;
        let duration_ms = parse_duration_ms(file.file_name(), &raw)?;
        debug!(file = %file, duration_ms, "measured duration");
        Ok(duration_ms)
    }

    async fn probe_frame_rate(
        &self,
        workdir: &Path,
        file: WorkFile,
    ) -> Result<FrameRate, DomainError> {
        let raw = self
            .query(
                workdir,
                file,
                &["-select_streams", "v:0", "-show_entries", "stream=avg_frame_rate"],
            )
            .await?;
        let rate = parse_frame_rate(file.file_name(), &raw)?;
        debug!(file = %file, %rate, "measured frame rate");
        Ok(rate)
    }
}

/// Parse fractional seconds into whole milliseconds, truncating
pub fn parse_duration_ms(file: &str, raw: &str) -> Result<i64, DomainError> {
    let text = raw.trim();
    let parse_error = || DomainError::Parse {
        file: file.to_string(),
        what: "duration",
        raw: text.to_string(),
    };

    let seconds: f64 = text.parse().map_err(|_| parse_error())?;
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(parse_error());
    }

    // Plain decimals are truncated on the digits so binary rounding cannot
    // turn 0.29 s into 289 ms.
    let (whole, fraction) = text.split_once('.').unwrap_or((text, ""));
    let plain = !whole.is_empty()
        && whole.bytes().all(|b| b.is_ascii_digit())
        && fraction.bytes().all(|b| b.is_ascii_digit());
    if plain {
        if let Ok(whole) = whole.parse::<i64>() {
            let millis = fraction
                .bytes()
                .chain(std::iter::repeat(b'0'))
                .take(3)
                .fold(0i64, |acc, digit| acc * 10 + i64::from(digit - b'0'));
            if let Some(total) = whole.checked_mul(1000).and_then(|ms| ms.checked_add(millis)) {
                return Ok(total);
            }
        }
    }

    Ok((seconds * 1000.0) as i64)
}

/// Parse an `N/D` fraction such as `24000/1001`
pub fn parse_frame_rate(file: &str, raw: &str) -> Result<FrameRate, DomainError> {
    let text = raw.trim();
    let parse_error = |what: &'static str| DomainError::Parse {
        file: file.to_string(),
        what,
        raw: text.to_string(),
    };

    let (num, den) = text
        .split_once('/')
        .ok_or_else(|| parse_error("frame rate"))?;
    let num: u64 = num
        .trim()
        .parse()
        .map_err(|_| parse_error("frame rate numerator"))?;
    let den: u64 = den
        .trim()
        .parse()
        .map_err(|_| parse_error("frame rate denominator"))?;

    FrameRate::new(num, den).ok_or_else(|| parse_error("frame rate denominator"))
}
