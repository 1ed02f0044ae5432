// Ports - Interface definitions (contracts)

use std::fmt;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::domain::errors::*;
use crate::domain::model::*;

/// External media tools the pipeline shells out to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tool {
    Ffmpeg,
    Ffprobe,
    Mkclean,
}

impl Tool {
    /// Binary name without platform suffix
    pub fn binary_name(&self) -> &'static str {
        match self {
            Tool::Ffmpeg => "ffmpeg",
            Tool::Ffprobe => "ffprobe",
            Tool::Mkclean => "mkclean",
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.binary_name())
    }
}

/// One external tool call, run with `workdir` as its current directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    pub tool: Tool,
    pub args: Vec<String>,
    pub workdir: PathBuf,
}

impl ToolInvocation {
    pub fn new(tool: Tool, workdir: &Path) -> Self {
        Self {
            tool,
            args: Vec::new(),
            workdir: workdir.to_path_buf(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

/// Captured result of a finished tool call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    /// `None` when the process was terminated by a signal
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    pub fn status_text(&self) -> String {
        match self.exit_code {
            Some(code) => format!("exit code {}", code),
            None => "termination by signal".to_string(),
        }
    }

    /// Map a non-zero exit to `ExternalProcess`
    pub fn into_checked(self, tool: Tool) -> Result<ToolOutput, DomainError> {
        if self.success() {
            Ok(self)
        } else {
            Err(DomainError::ExternalProcess {
                tool: tool.to_string(),
                status: self.status_text(),
                stderr: self.stderr.trim().to_string(),
            })
        }
    }
}

/// Port for running external media tools
#[async_trait]
pub trait ToolPort: Send + Sync {
    /// Run the invocation to completion; exit status is reported, not interpreted
    async fn run(&self, invocation: &ToolInvocation) -> Result<ToolOutput, DomainError>;
}

/// Port for media file probing
#[async_trait]
pub trait ProbePort: Send + Sync {
    /// Container duration in whole milliseconds (truncated)
    async fn probe_duration_ms(&self, workdir: &Path, file: WorkFile) -> Result<i64, DomainError>;

    /// Exact average frame rate of the first video stream
    async fn probe_frame_rate(
        &self,
        workdir: &Path,
        file: WorkFile,
    ) -> Result<FrameRate, DomainError>;

    /// Both probes for one file
    async fn probe(&self, workdir: &Path, file: WorkFile) -> Result<ProbeResult, DomainError> {
        let duration_ms = self.probe_duration_ms(workdir, file).await?;
        let frame_rate = self.probe_frame_rate(workdir, file).await?;
        Ok(ProbeResult {
            duration_ms,
            frame_rate,
        })
    }
}

/// Port for file system operations in the working directory
#[async_trait]
pub trait FsPort: Send + Sync {
    /// Check if file exists
    async fn file_exists(&self, path: &Path) -> Result<bool, DomainError>;

    /// Delete file; an absent file is not an error
    async fn remove_if_exists(&self, path: &Path) -> Result<(), DomainError>;

    /// Single rename attempt, raw I/O error for the retry utility to judge
    async fn rename(&self, from: &Path, to: &Path) -> std::io::Result<()>;

    /// Create or truncate a file with the given contents
    async fn write_file(&self, path: &Path, contents: &[u8]) -> Result<(), DomainError>;
}
