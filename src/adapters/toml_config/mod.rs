// TOML config adapter - Typed configuration loaded from TOML files

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::errors::*;
use crate::planner::EncodeSettings;
use crate::utils::RetryPolicy;

/// File looked up in the current directory when no `--config` is given
pub const DEFAULT_CONFIG_FILE: &str = "mkvtrim.toml";

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub tools: ToolsConfig,
    pub trim: TrimConfig,
    pub staging: StagingConfig,
    pub logging: LoggingConfig,
}

/// Where external tools live and how long they may run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    /// Directory holding ffmpeg, ffprobe and mkclean; `PATH` when unset
    pub engine_dir: Option<PathBuf>,
    /// Per-invocation limit in seconds, 0 disables
    pub timeout_secs: u64,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            engine_dir: None,
            timeout_secs: 3600,
        }
    }
}

/// Fine cut encoder settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrimConfig {
    pub crf: u8,
    pub audio_codec: String,
}

impl Default for TrimConfig {
    fn default() -> Self {
        let settings = EncodeSettings::default();
        Self {
            crf: settings.crf,
            audio_codec: settings.audio_codec,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StagingConfig {
    pub rename_attempts: u32,
    pub rename_delay_ms: u64,
}

impl Default for StagingConfig {
    fn default() -> Self {
        let policy = RetryPolicy::default();
        Self {
            rename_attempts: policy.max_attempts,
            rename_delay_ms: policy.delay.as_millis() as u64,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl AppConfig {
    pub fn tool_timeout(&self) -> Option<Duration> {
        match self.tools.timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.staging.rename_attempts,
            Duration::from_millis(self.staging.rename_delay_ms),
        )
    }

    pub fn encode_settings(&self) -> EncodeSettings {
        EncodeSettings {
            crf: self.trim.crf,
            audio_codec: self.trim.audio_codec.clone(),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.trim.crf > 51 {
            return Err(DomainError::Config(format!(
                "crf value {} cannot exceed 51",
                self.trim.crf
            )));
        }
        if self.trim.audio_codec.trim().is_empty() {
            return Err(DomainError::Config("audio_codec must not be empty".to_string()));
        }
        if !LOG_LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(DomainError::Config(format!(
                "invalid log level: {}. Valid levels: {}",
                self.logging.level,
                LOG_LEVELS.join(", ")
            )));
        }
        Ok(())
    }
}

/// TOML configuration adapter
pub struct TomlConfigAdapter;

impl TomlConfigAdapter {
    /// Parse configuration text
    pub fn parse(toml_content: &str) -> Result<AppConfig, DomainError> {
        toml::from_str(toml_content)
            .map_err(|e| DomainError::Config(format!("failed to parse TOML config: {}", e)))
    }

    /// Load configuration from file
    pub fn load(path: &Path) -> Result<AppConfig, DomainError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            DomainError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::parse(&content)
    }

    /// Serialize configuration, e.g. to seed a new config file
    pub fn render(config: &AppConfig) -> Result<String, DomainError> {
        toml::to_string_pretty(config)
            .map_err(|e| DomainError::Config(format!("failed to serialize config: {}", e)))
    }

    pub fn default_path() -> PathBuf {
        PathBuf::from(DEFAULT_CONFIG_FILE)
    }
}
