//! External process adapter
//!
//! Runs ffmpeg, ffprobe and mkclean as child processes in the working
//! directory, with an optional time budget after which the child is killed.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::domain::errors::*;
use crate::ports::*;

/// Process-backed implementation of [`ToolPort`]
#[derive(Debug, Clone)]
pub struct ProcessToolAdapter {
    engine_dir: Option<PathBuf>,
    timeout: Option<Duration>,
}

impl ProcessToolAdapter {
    /// Tools are taken from `engine_dir` when given, otherwise from `PATH`
    pub fn new(engine_dir: Option<PathBuf>, timeout: Option<Duration>) -> Self {
        Self {
            engine_dir,
            timeout,
        }
    }

    /// Locate the executable for a tool
    pub fn resolve(&self, tool: Tool) -> Result<PathBuf, DomainError> {
        let name = tool.binary_name();
        match &self.engine_dir {
            Some(dir) => {
                let candidate = dir.join(format!("{}{}", name, std::env::consts::EXE_SUFFIX));
                if candidate.is_file() {
                    // Relative engine dirs must survive the child's changed cwd.
                    Ok(std::path::absolute(&candidate).unwrap_or(candidate))
                } else {
                    Err(DomainError::ToolNotFound {
                        tool: name.to_string(),
                        searched: candidate.display().to_string(),
                    })
                }
            }
            None => which::which(name).map_err(|_| DomainError::ToolNotFound {
                tool: name.to_string(),
                searched: "PATH".to_string(),
            }),
        }
    }

    fn spawn_error(tool: Tool, program: &Path, err: std::io::Error) -> DomainError {
        if err.kind() == std::io::ErrorKind::NotFound {
            DomainError::ToolNotFound {
                tool: tool.to_string(),
                searched: program.display().to_string(),
            }
        } else {
            DomainError::file_op(format!("failed to start {}", tool), err)
        }
    }
}

#[async_trait]
impl ToolPort for ProcessToolAdapter {
    async fn run(&self, invocation: &ToolInvocation) -> Result<ToolOutput, DomainError> {
        let program = self.resolve(invocation.tool)?;
        debug!(tool = %invocation.tool, args = ?invocation.args, workdir = %invocation.workdir.display(), "running external tool");

        let mut cmd = Command::new(&program);
        cmd.args(&invocation.args)
            .current_dir(&invocation.workdir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let child = cmd
            .spawn()
            .map_err(|e| Self::spawn_error(invocation.tool, &program, e))?;

        // Dropping the wait future on timeout drops the child, which kills it.
        let waited = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, child.wait_with_output()).await {
                Ok(result) => result,
                Err(_elapsed) => {
                    return Err(DomainError::Timeout {
                        tool: invocation.tool.to_string(),
                        after: limit,
                    })
                }
            },
            None => child.wait_with_output().await,
        };
        let output = waited.map_err(|e| {
            DomainError::file_op(format!("I/O error waiting for {}", invocation.tool), e)
        })?;

        let result = ToolOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        debug!(tool = %invocation.tool, status = %result.status_text(), "external tool finished");
        Ok(result)
    }
}
