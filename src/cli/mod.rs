//! CLI module for mkvtrim
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

pub mod args;
pub mod commands;
pub mod prompt;

/// mkvtrim episode post-processor
///
/// Trims leading advertisement frames from `episode.mkv` with frame accuracy,
/// merges subtitles and language metadata, and optimizes the container.
#[derive(Parser, Debug)]
#[command(name = "mkvtrim")]
#[command(about = "Frame-accurate advertisement trimming for downloaded episodes")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Working directory holding episode.mkv
    #[arg(long, default_value = ".", global = true)]
    pub temp_dir: PathBuf,

    /// Directory containing ffmpeg, ffprobe and mkclean (default: PATH)
    #[arg(long, global = true)]
    pub engine_dir: Option<PathBuf>,

    /// Configuration file (default: ./mkvtrim.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Logging level
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Seconds an external tool may run before it is killed (0 disables)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// How to print the result of a command
    #[arg(long, value_enum, default_value = "text", global = true)]
    pub report: ReportFormat,

    /// Wait for Enter before exiting
    #[arg(long, global = true)]
    pub pause: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for command reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Text,
    Json,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Remove leading advertisement frames from episode.mkv
    Trim(args::TrimArgs),
    /// Merge subtitles and language metadata into episode.mkv
    Merge(args::MergeArgs),
    /// Optimize episode.mkv for playback
    Clean,
    /// Trim, merge and clean in one run
    Finish(args::FinishArgs),
    /// Print the effective configuration as TOML
    Config,
}

impl Commands {
    /// Fine cut CRF requested on the command line, if any
    pub fn crf(&self) -> Option<u8> {
        match self {
            Commands::Trim(args) => args.crf,
            Commands::Finish(args) => args.trim.crf,
            _ => None,
        }
    }
}
