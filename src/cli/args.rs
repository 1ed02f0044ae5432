//! Command-line argument definitions

use clap::Args;
use clap_num::number_range;

fn crf_in_range(s: &str) -> Result<u8, String> {
    number_range(s, 0, 51)
}

/// Arguments for the trim command
#[derive(Args, Debug, Clone)]
pub struct TrimArgs {
    /// Advertisement length in milliseconds (prompted when omitted)
    #[arg(long)]
    pub ad_length: Option<u64>,

    /// Estimated first keyframe after the advertisement, in milliseconds (prompted when omitted)
    #[arg(long)]
    pub key_frame: Option<u64>,

    /// Constant Rate Factor for the re-encoded prefix (0-51)
    #[arg(long, value_parser = crf_in_range)]
    pub crf: Option<u8>,
}

/// Arguments for the merge command
#[derive(Args, Debug, Clone)]
pub struct MergeArgs {
    /// Language tag for the first audio stream (e.g. jpn)
    #[arg(long)]
    pub audio_lang: String,

    /// Language tag for subtitles.episode.ass; empty skips the subtitle track
    #[arg(long, default_value = "")]
    pub subtitle_lang: String,
}

/// Arguments for the finish command
#[derive(Args, Debug, Clone)]
pub struct FinishArgs {
    #[command(flatten)]
    pub trim: TrimArgs,

    #[command(flatten)]
    pub merge: MergeArgs,
}
