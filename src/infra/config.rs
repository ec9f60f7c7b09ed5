use crate::domain::context::DEFAULT_QUERY_TIMEOUT;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

pub const CONFIG_FILE_NAME: &str = "podcompose.toml";
pub const DEFAULT_RUNTIME: &str = "podman";

pub fn default_config_dir() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".config/podcompose")
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Runtime binary (podman, docker, nerdctl...)
    pub binary: Option<String>,
    pub query_timeout_secs: Option<u64>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct ComposeConfig {
    pub files: Option<Vec<PathBuf>>,
    pub project_name: Option<String>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct AppConfig {
    #[serde(default)]
    pub runtime: RuntimeConfig,
    #[serde(default)]
    pub compose: ComposeConfig,
}

impl AppConfig {
    /// Merges another AppConfig into self.
    /// Values from `other` overwrite values in `self` if present.
    pub fn merge(&mut self, other: AppConfig) {
        if let Some(binary) = other.runtime.binary {
            self.runtime.binary = Some(binary);
        }
        if let Some(timeout) = other.runtime.query_timeout_secs {
            self.runtime.query_timeout_secs = Some(timeout);
        }
        if let Some(files) = other.compose.files {
            self.compose.files = Some(files);
        }
        if let Some(name) = other.compose.project_name {
            self.compose.project_name = Some(name);
        }
    }

    pub fn runtime_binary(&self) -> &str {
        self.runtime.binary.as_deref().unwrap_or(DEFAULT_RUNTIME)
    }

    pub fn query_timeout(&self) -> Duration {
        self.runtime
            .query_timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_QUERY_TIMEOUT)
    }

    pub fn compose_files(&self) -> &[PathBuf] {
        self.compose.files.as_deref().unwrap_or(&[])
    }
}

/// Values given on the command line or through the environment.
/// They take precedence over every config file.
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub runtime: Option<String>,
    pub files: Vec<PathBuf>,
    pub project_name: Option<String>,
}

impl ConfigOverrides {
    pub fn apply(self, config: &mut AppConfig) {
        if let Some(runtime) = self.runtime {
            config.runtime.binary = Some(runtime);
        }
        if !self.files.is_empty() {
            config.compose.files = Some(self.files);
        }
        if let Some(name) = self.project_name {
            config.compose.project_name = Some(name);
        }
    }
}

fn read_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path).with_context(|| format!("reading {:?}", path))?;
    toml::from_str(&content).with_context(|| format!("parsing {:?}", path))
}

/// Loads `<config_dir>/podcompose.toml`, then `<work_dir>/podcompose.toml`
/// on top of it. Missing files are skipped.
pub fn load_app_config(config_dir: &Path, work_dir: &Path) -> Result<AppConfig> {
    let mut app_config = AppConfig::default();

    for path in [
        config_dir.join(CONFIG_FILE_NAME),
        work_dir.join(CONFIG_FILE_NAME),
    ] {
        if !path.exists() {
            continue;
        }
        debug!("loading config from {:?}", path);
        app_config.merge(read_config(&path)?);
    }

    Ok(app_config)
}
