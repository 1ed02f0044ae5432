//! mkvtrim episode post-processing library
//!
//! Frame-accurate advertisement trimming, subtitle/language remuxing and
//! container optimization for a downloaded `episode.mkv`, driven through
//! external media tools behind typed ports.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config_initialization;
pub mod domain;
pub mod planner;
pub mod ports;
pub mod utils;

// Re-export commonly used types
pub use domain::errors::{DomainError, PipelineStep};
pub use domain::model::{FrameRate, LanguageTags, TimingParams, WorkFile, CANONICAL_NAME};
