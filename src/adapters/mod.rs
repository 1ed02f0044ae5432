// Adapters - External system implementations

pub mod exec_process;
pub mod fs_local;
pub mod probe_ffprobe;
pub mod toml_config;
pub mod tracing_log;

// Re-export adapters
pub use exec_process::ProcessToolAdapter;
pub use fs_local::LocalFsAdapter;
pub use probe_ffprobe::FfprobeAdapter;
pub use toml_config::{AppConfig, TomlConfigAdapter};
