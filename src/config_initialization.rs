//! Configuration initialization and hierarchy management

use std::path::{Path, PathBuf};

use crate::adapters::toml_config::{AppConfig, TomlConfigAdapter};
use crate::domain::errors::DomainError;

/// Values given on the command line; `None` leaves lower layers untouched
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_file: Option<PathBuf>,
    pub engine_dir: Option<PathBuf>,
    pub log_level: Option<String>,
    pub json_logs: bool,
    pub crf: Option<u8>,
    pub timeout_secs: Option<u64>,
}

/// Initialize configuration following precedence: CLI > Env > File > Defaults
pub fn initialize_configuration_hierarchy(
    overrides: &ConfigOverrides,
) -> Result<AppConfig, DomainError> {
    resolve_configuration(overrides, |key| std::env::var(key).ok())
}

/// Same as [`initialize_configuration_hierarchy`] with an injectable environment
pub fn resolve_configuration<F>(overrides: &ConfigOverrides, env: F) -> Result<AppConfig, DomainError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = load_config_file(overrides.config_file.as_deref())?.unwrap_or_default();
    apply_environment(&mut config, env)?;
    apply_cli_overrides(&mut config, overrides);
    config.validate()?;
    Ok(config)
}

/// An explicit file must exist; the default file is optional
fn load_config_file(explicit: Option<&Path>) -> Result<Option<AppConfig>, DomainError> {
    if let Some(path) = explicit {
        return TomlConfigAdapter::load(path).map(Some);
    }

    let default_path = TomlConfigAdapter::default_path();
    if default_path.is_file() {
        return TomlConfigAdapter::load(&default_path).map(Some);
    }
    Ok(None)
}

fn apply_environment<F>(config: &mut AppConfig, env: F) -> Result<(), DomainError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(dir) = env("MKVTRIM_ENGINE_DIR") {
        config.tools.engine_dir = Some(PathBuf::from(dir));
    }
    if let Some(timeout) = env("MKVTRIM_TOOL_TIMEOUT") {
        config.tools.timeout_secs = parse_env("MKVTRIM_TOOL_TIMEOUT", &timeout)?;
    }
    if let Some(level) = env("MKVTRIM_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Some(attempts) = env("MKVTRIM_RENAME_ATTEMPTS") {
        config.staging.rename_attempts = parse_env("MKVTRIM_RENAME_ATTEMPTS", &attempts)?;
    }
    Ok(())
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, DomainError> {
    value
        .trim()
        .parse()
        .map_err(|_| DomainError::Config(format!("{} has invalid value {:?}", key, value)))
}

fn apply_cli_overrides(config: &mut AppConfig, overrides: &ConfigOverrides) {
    if let Some(dir) = &overrides.engine_dir {
        config.tools.engine_dir = Some(dir.clone());
    }
    if let Some(level) = &overrides.log_level {
        config.logging.level = level.clone();
    }
    if overrides.json_logs {
        config.logging.json = true;
    }
    if let Some(crf) = overrides.crf {
        config.trim.crf = crf;
    }
    if let Some(secs) = overrides.timeout_secs {
        config.tools.timeout_secs = secs;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn config_file(contents: &str) -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[test]
    fn cli_beats_env_beats_file() {
        let (_dir, path) = config_file(
            "[tools]\nengine_dir = \"from-file\"\ntimeout_secs = 10\n[logging]\nlevel = \"warn\"\n",
        );
        let overrides = ConfigOverrides {
            config_file: Some(path),
            engine_dir: Some(PathBuf::from("from-cli")),
            ..Default::default()
        };
        let env = env_of(&[
            ("MKVTRIM_ENGINE_DIR", "from-env"),
            ("MKVTRIM_TOOL_TIMEOUT", "20"),
        ]);

        let config = resolve_configuration(&overrides, env).unwrap();
        assert_eq!(config.tools.engine_dir, Some(PathBuf::from("from-cli")));
        assert_eq!(config.tools.timeout_secs, 20);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let overrides = ConfigOverrides {
            config_file: Some(PathBuf::from("/definitely/not/here.toml")),
            ..Default::default()
        };
        let err = resolve_configuration(&overrides, env_of(&[])).unwrap_err();
        assert!(matches!(err, DomainError::Config(_)));
    }

    #[test]
    fn malformed_env_value_is_rejected() {
        let err = resolve_configuration(
            &ConfigOverrides::default(),
            env_of(&[("MKVTRIM_RENAME_ATTEMPTS", "many")]),
        )
        .unwrap_err();
        assert!(err.to_string().contains("MKVTRIM_RENAME_ATTEMPTS"));
    }

    #[test]
    fn overrides_are_validated() {
        let overrides = ConfigOverrides {
            log_level: Some("chatty".to_string()),
            ..Default::default()
        };
        assert!(resolve_configuration(&overrides, env_of(&[])).is_err());
    }
}
