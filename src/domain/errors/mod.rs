// Domain errors - Error taxonomy for the post-processing pipeline

use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Pipeline step an error occurred in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStep {
    Staging,
    ProbeUntrimmed,
    RoughCut,
    ProbeRoughCut,
    DeriveGap,
    FineCut,
    WriteManifest,
    Concatenate,
    Merge,
    Optimize,
    Cleanup,
}

impl fmt::Display for PipelineStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let description = match self {
            PipelineStep::Staging => "staging the episode container",
            PipelineStep::ProbeUntrimmed => "measuring the untrimmed episode",
            PipelineStep::RoughCut => "creating the keyframe-aligned video clip",
            PipelineStep::ProbeRoughCut => "measuring the video clip",
            PipelineStep::DeriveGap => "deriving the keyframe gap",
            PipelineStep::FineCut => "creating the prefix clip",
            PipelineStep::WriteManifest => "writing the concat list",
            PipelineStep::Concatenate => "merging prefix and video",
            PipelineStep::Merge => "merging subtitles and language metadata",
            PipelineStep::Optimize => "optimizing the container",
            PipelineStep::Cleanup => "removing intermediate files",
        };
        f.write_str(description)
    }
}

/// Domain-specific error types
#[derive(Debug, Error)]
pub enum DomainError {
    /// External binary is missing (setup problem, not a runtime failure)
    #[error("{tool} not found (searched {searched})")]
    ToolNotFound { tool: String, searched: String },

    /// Rename retry budget exhausted
    #[error("unable to rename {from} to {to} after {attempts} attempts: {source}")]
    Rename {
        from: String,
        to: String,
        attempts: u32,
        #[source]
        source: std::io::Error,
    },

    /// Analyzer failed to run or exited non-zero
    #[error("there was an error measuring {file}: {message}")]
    Probe { file: String, message: String },

    /// Analyzer output could not be parsed
    #[error("unable to parse the {what} of {file} from {raw:?}")]
    Parse {
        file: String,
        what: &'static str,
        raw: String,
    },

    /// Cut, merge or optimize invocation exited non-zero
    #[error("{tool} exited with {status}: {stderr}")]
    ExternalProcess {
        tool: String,
        status: String,
        stderr: String,
    },

    /// Inconsistent timing or missing inputs
    #[error("invalid input: {0}")]
    Input(String),

    /// External tool exceeded its time budget and was killed
    #[error("{tool} timed out after {after:?}")]
    Timeout { tool: String, after: Duration },

    /// Filesystem operation failed
    #[error("{context}: {source}")]
    FileOp {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration could not be loaded or is invalid
    #[error("configuration error: {0}")]
    Config(String),

    /// Any of the above, tagged with the pipeline step that failed
    #[error("error while {step}: {source}")]
    Step {
        step: PipelineStep,
        #[source]
        source: Box<DomainError>,
    },
}

impl DomainError {
    /// Innermost error with step context peeled off
    pub fn root(&self) -> &DomainError {
        match self {
            DomainError::Step { source, .. } => source.root(),
            other => other,
        }
    }

    /// Outermost pipeline step, if any
    pub fn step(&self) -> Option<PipelineStep> {
        match self {
            DomainError::Step { step, .. } => Some(*step),
            _ => None,
        }
    }

    pub fn file_op(context: impl Into<String>, source: std::io::Error) -> Self {
        DomainError::FileOp {
            context: context.into(),
            source,
        }
    }
}

/// Attach pipeline step context to a result
pub trait StepContext<T> {
    fn in_step(self, step: PipelineStep) -> Result<T, DomainError>;
}

impl<T> StepContext<T> for Result<T, DomainError> {
    fn in_step(self, step: PipelineStep) -> Result<T, DomainError> {
        self.map_err(|e| match e {
            // Keep the innermost step; it is the most precise.
            already @ DomainError::Step { .. } => already,
            other => DomainError::Step {
                step,
                source: Box::new(other),
            },
        })
    }
}
