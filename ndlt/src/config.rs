//! Configuration module for ndlt.
//!
//! This module handles loading, saving, and defaulting the `ndlt.toml`
//! settings that describe how to build the compiler and where tests live.

use dirs::{config_dir, home_dir};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{NdltError, Result};

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "ndlt.toml";

/// Name of the transient compiler executable.
pub const DEFAULT_ARTIFACT: &str = "__test_build.exe";

/// Application configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// How the compiler under test is built.
    #[serde(default)]
    pub build: BuildConfig,

    /// Where tests live and how they are run.
    #[serde(default)]
    pub harness: HarnessConfig,
}

/// Build-specific configuration options.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BuildConfig {
    /// Build program to invoke.
    #[serde(default = "default_program")]
    pub program: String,

    /// Arguments passed to the build program.
    #[serde(default = "default_build_args")]
    pub args: Vec<String>,

    /// Path of the executable the build produces, relative to `root`.
    #[serde(default = "default_artifact")]
    pub artifact: PathBuf,

    /// Directory the build command runs in.
    #[serde(default = "default_root")]
    pub root: PathBuf,
}

/// Harness-specific configuration options.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HarnessConfig {
    /// Directory scanned recursively for test files.
    #[serde(default = "default_test_dir")]
    pub test_dir: PathBuf,

    /// Extension of test files, without the dot.
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Per-case timeout in seconds. Zero disables the timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Keep running after a case writes to stderr.
    #[serde(default)]
    pub keep_going: bool,
}

fn default_program() -> String {
    "go".to_string()
}

fn default_build_args() -> Vec<String> {
    ["build", "-o", DEFAULT_ARTIFACT, "."]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_artifact() -> PathBuf {
    PathBuf::from(DEFAULT_ARTIFACT)
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_test_dir() -> PathBuf {
    PathBuf::from("tests")
}

fn default_extension() -> String {
    "ndl".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            args: default_build_args(),
            artifact: default_artifact(),
            root: default_root(),
        }
    }
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            test_dir: default_test_dir(),
            extension: default_extension(),
            timeout_secs: default_timeout_secs(),
            keep_going: false,
        }
    }
}

impl BuildConfig {
    /// Location of the artifact as seen from the harness's working directory.
    pub fn artifact_path(&self) -> PathBuf {
        self.root.join(&self.artifact)
    }
}

impl HarnessConfig {
    /// The per-case timeout, or `None` when disabled.
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Searches for configuration in the following order:
    /// 1. Current directory
    /// 2. User's home directory
    /// 3. System configuration directory
    ///
    /// Returns the default configuration if no config file is found.
    pub fn load() -> Result<Self> {
        match Self::find_config_file() {
            Some(path) => Self::load_from_path(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific path.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(NdltError::Config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| NdltError::Config(format!("Failed to parse configuration: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a specific path.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            NdltError::Config(format!("Failed to serialize configuration: {}", e))
        })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject settings the harness cannot act on.
    pub fn validate(&self) -> Result<()> {
        if self.build.program.trim().is_empty() {
            return Err(NdltError::Config("build.program must not be empty".to_string()));
        }
        if self.build.artifact.as_os_str().is_empty() {
            return Err(NdltError::Config("build.artifact must not be empty".to_string()));
        }
        if self.harness.extension.is_empty() || self.harness.extension.starts_with('.') {
            return Err(NdltError::Config(format!(
                "harness.extension must be a bare extension, got {:?}",
                self.harness.extension
            )));
        }
        Ok(())
    }

    fn check_current_dir_config() -> Option<PathBuf> {
        let path = PathBuf::from(CONFIG_FILE_NAME);
        path.exists().then_some(path)
    }

    fn check_home_config() -> Option<PathBuf> {
        home_dir()
            .map(|dir| dir.join(".config").join("ndlt").join(CONFIG_FILE_NAME))
            .filter(|path| path.exists())
    }

    fn check_system_config() -> Option<PathBuf> {
        config_dir()
            .map(|dir| dir.join("ndlt").join(CONFIG_FILE_NAME))
            .filter(|path| path.exists())
    }

    fn find_config_file() -> Option<PathBuf> {
        Self::check_current_dir_config()
            .or_else(Self::check_home_config)
            .or_else(Self::check_system_config)
    }
}
