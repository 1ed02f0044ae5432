//! Scripted external tools for pipeline tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use mkvtrim::adapters::{AppConfig, LocalFsAdapter};
use mkvtrim::app::DefaultAppContainer;
use mkvtrim::ports::{Tool, ToolInvocation, ToolOutput, ToolPort};
use mkvtrim::DomainError;

/// Stand-in for ffmpeg, ffprobe and mkclean
///
/// ffprobe answers from canned tables; ffmpeg and mkclean write their output
/// file (the last argument) with content derived from their inputs, so the
/// final container shows which stages produced it.
pub struct ScriptedTools {
    durations: HashMap<String, String>,
    frame_rate: String,
    fail_on: Option<(Tool, String)>,
    partial_once: Mutex<Option<(Tool, String)>>,
    missing: Option<Tool>,
    calls: Mutex<Vec<ToolInvocation>>,
    manifests: Mutex<Vec<String>>,
}

impl ScriptedTools {
    pub fn new() -> Self {
        Self {
            durations: HashMap::new(),
            frame_rate: "24000/1001".to_string(),
            fail_on: None,
            partial_once: Mutex::new(None),
            missing: None,
            calls: Mutex::new(Vec::new()),
            manifests: Mutex::new(Vec::new()),
        }
    }

    pub fn duration(mut self, file: &str, seconds: &str) -> Self {
        self.durations.insert(file.to_string(), seconds.to_string());
        self
    }

    pub fn frame_rate(mut self, raw: &str) -> Self {
        self.frame_rate = raw.to_string();
        self
    }

    /// Exit non-zero when `tool` is asked to write `output`
    pub fn fail_on(mut self, tool: Tool, output: &str) -> Self {
        self.fail_on = Some((tool, output.to_string()));
        self
    }

    /// Write a truncated `output` and exit non-zero, on the first matching call only
    pub fn partial_once(self, tool: Tool, output: &str) -> Self {
        *self.partial_once.lock().unwrap() = Some((tool, output.to_string()));
        self
    }

    pub fn missing(mut self, tool: Tool) -> Self {
        self.missing = Some(tool);
        self
    }

    pub fn calls(&self) -> Vec<ToolInvocation> {
        self.calls.lock().unwrap().clone()
    }

    pub fn manifests(&self) -> Vec<String> {
        self.manifests.lock().unwrap().clone()
    }

    fn ffprobe(&self, invocation: &ToolInvocation, file: &str) -> ToolOutput {
        let stdout = if invocation.args.iter().any(|a| a == "format=duration") {
            self.durations.get(file).cloned()
        } else {
            Some(self.frame_rate.clone())
        };
        match stdout {
            Some(value) => ok(format!("{}\r\n", value)),
            None => failed(&format!("{}: No such file or directory", file)),
        }
    }

    fn write_output(&self, invocation: &ToolInvocation, output: &str) -> ToolOutput {
        let dir = &invocation.workdir;
        let read = |name: &str| std::fs::read_to_string(dir.join(name)).unwrap_or_default();
        let input_after = |flag: &str| {
            invocation
                .args
                .iter()
                .position(|a| a == flag)
                .and_then(|i| invocation.args.get(i + 1))
                .cloned()
                .unwrap_or_default()
        };

        let content = match invocation.tool {
            Tool::Mkclean => format!("clean({})", read(&invocation.args[1])),
            Tool::Ffmpeg if invocation.args.iter().any(|a| a == "concat") => {
                let manifest = read(&input_after("-i"));
                self.manifests.lock().unwrap().push(manifest.clone());
                manifest
                    .lines()
                    .filter_map(|line| line.strip_prefix("file '")?.strip_suffix('\''))
                    .map(read)
                    .collect::<String>()
            }
            Tool::Ffmpeg => format!(
                "{}[{} +{}]({})",
                output.split('.').next().unwrap_or_default(),
                input_after("-ss"),
                input_after("-t"),
                read(&input_after("-i"))
            ),
            Tool::Ffprobe => unreachable!(),
        };

        if let Some(parent) = Path::new(output).parent() {
            assert!(parent.as_os_str().is_empty(), "outputs stay in the workdir");
        }
        std::fs::write(dir.join(output), content).unwrap();
        ok(String::new())
    }
}

#[async_trait]
impl ToolPort for ScriptedTools {
    async fn run(&self, invocation: &ToolInvocation) -> Result<ToolOutput, DomainError> {
        if self.missing == Some(invocation.tool) {
            return Err(DomainError::ToolNotFound {
                tool: invocation.tool.to_string(),
                searched: "engine".to_string(),
            });
        }
        self.calls.lock().unwrap().push(invocation.clone());

        let target = invocation.args.last().cloned().unwrap_or_default();
        if let Some((tool, output)) = &self.fail_on {
            if *tool == invocation.tool && *output == target {
                return Ok(failed("Invalid data found when processing input"));
            }
        }

        let mut partial = self.partial_once.lock().unwrap();
        if partial
            .as_ref()
            .is_some_and(|(tool, output)| *tool == invocation.tool && *output == target)
        {
            *partial = None;
            std::fs::write(invocation.workdir.join(&target), "PARTIAL").unwrap();
            return Ok(failed("Conversion failed!"));
        }
        drop(partial);

        Ok(match invocation.tool {
            Tool::Ffprobe => self.ffprobe(invocation, &target),
            _ => self.write_output(invocation, &target),
        })
    }
}

fn ok(stdout: String) -> ToolOutput {
    ToolOutput {
        exit_code: Some(0),
        stdout,
        stderr: String::new(),
    }
}

fn failed(stderr: &str) -> ToolOutput {
    ToolOutput {
        exit_code: Some(1),
        stdout: String::new(),
        stderr: stderr.to_string(),
    }
}

/// Container wired to the scripted tools and the real filesystem
pub fn container(tools: Arc<ScriptedTools>) -> DefaultAppContainer {
    DefaultAppContainer::with_ports(&AppConfig::default(), tools, Arc::new(LocalFsAdapter::new()))
}

/// Sorted file names in `dir`
pub fn files_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
