// Domain models - Core types and data structures

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::errors::DomainError;


/// Canonical container name every stage reads and writes
pub const CANONICAL_NAME: &str = "episode.mkv";

/// Named files a stage may create next to the canonical container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkFile {
    Canonical,
    Untrimmed,
    Video,
    Prefix,
    List,
    Unmerged,
    Dirty,
    Subtitles,
}

impl WorkFile {
    /// File name relative to the working directory
    pub fn file_name(&self) -> &'static str {
        match self {
            WorkFile::Canonical => CANONICAL_NAME,
            WorkFile::Untrimmed => "untrimmed.episode.mkv",
            WorkFile::Video => "video.episode.mkv",
            WorkFile::Prefix => "prefix.episode.mkv",
            WorkFile::List => "list.episode.txt",
            WorkFile::Unmerged => "unmerged.episode.mkv",
            WorkFile::Dirty => "dirty.episode.mkv",
            WorkFile::Subtitles => "subtitles.episode.ass",
        }
    }
}

impl fmt::Display for WorkFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// Caller-supplied timing for the trim pipeline, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimingParams {
    pub ad_length_ms: u64,
    pub estimated_key_frame_ms: u64,
}

impl TimingParams {
    /// Create timing parameters, rejecting values outside signed millisecond range
    ///
    /// An estimate earlier than the end of the advertisement is accepted: the
    /// rough cut snaps forward to a keyframe, and only the derived gap decides.
    pub fn new(ad_length_ms: u64, estimated_key_frame_ms: u64) -> Result<Self, DomainError> {
        for (what, ms) in [
            ("advertisement length", ad_length_ms),
            ("estimated keyframe", estimated_key_frame_ms),
        ] {
            if i64::try_from(ms).is_err() {
                return Err(DomainError::Input(format!("{} {} ms is out of range", what, ms)));
            }
        }
        Ok(Self {
            ad_length_ms,
            estimated_key_frame_ms,
        })
    }
}

/// Average frame rate as a reduced fraction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FrameRate {
    pub num: u64,
    pub den: u64,
}

impl FrameRate {
    /// Create a reduced frame rate; `None` for a zero denominator
    pub fn new(num: u64, den: u64) -> Option<Self> {
        if den == 0 {
            return None;
        }
        let divisor = gcd(num, den).max(1);
        Some(Self {
            num: num / divisor,
            den: den / divisor,
        })
    }

    pub fn as_f64(&self) -> f64 {
        self.num as f64 / self.den as f64
    }

    /// Rendering passed to the cutter's `-r` option
    pub fn to_arg(&self) -> String {
        format!("{:.8}", self.as_f64())
    }
}

impl fmt::Display for FrameRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.num, self.den)
    }
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

/// What the prober learned about one file
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProbeResult {
    pub duration_ms: i64,
    pub frame_rate: FrameRate,
}

/// Render milliseconds as seconds with exactly three decimals ("10.000")
pub fn format_seconds(ms: i64) -> String {
    let sign = if ms < 0 { "-" } else { "" };
    let abs = ms.unsigned_abs();
    format!("{}{}.{:03}", sign, abs / 1000, abs % 1000)
}

/// Ordered list of files consumed once by the concat demuxer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConcatManifest {
    entries: Vec<String>,
}

impl ConcatManifest {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entries: entries.into_iter().map(Into::into).collect(),
        }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// One `file '<name>'` line per entry, single quotes escaped the concat demuxer's way
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(|name| format!("file '{}'\n", name.replace('\'', r"'\''")))
            .collect()
    }
}

/// Language metadata for the merge step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageTags {
    pub audio: String,
    /// Empty means no subtitle track is remuxed
    pub subtitle: String,
}

impl LanguageTags {
    pub fn new(audio: impl Into<String>, subtitle: impl Into<String>) -> Self {
        Self {
            audio: audio.into(),
            subtitle: subtitle.into(),
        }
    }

    pub fn has_subtitles(&self) -> bool {
        !self.subtitle.is_empty()
    }
}

/// Outcome of a trim run
#[derive(Debug, Clone, Serialize)]
pub struct TrimReport {
    pub timing: TimingParams,
    pub untrimmed_ms: i64,
    pub video_ms: i64,
    pub key_frame_gap_ms: i64,
    pub frame_rate: FrameRate,
    /// False when the rough cut already landed on the end of the advertisement
    pub fine_cut: bool,
    pub resumed: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Outcome of a merge run
#[derive(Debug, Clone, Serialize)]
pub struct MergeReport {
    pub languages: LanguageTags,
    pub subtitles_merged: bool,
    pub resumed: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Outcome of a container optimization run
#[derive(Debug, Clone, Serialize)]
pub struct CleanReport {
    pub resumed: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}
