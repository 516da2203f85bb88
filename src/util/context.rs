//! Global context for thorpack operations.
//!
//! Provides centralized access to configuration, paths, and environment.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::{Context, Result};
use directories::ProjectDirs;

use crate::util::config::{load_config, Config};

/// Project-local working directory, relative to the cwd.
pub const PROJECT_DIR: &str = ".thorpack";

static PROJECT_DIRS: LazyLock<Option<ProjectDirs>> =
    LazyLock::new(|| ProjectDirs::from("", "", "thorpack"));

/// Global context containing configuration and paths.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,

    /// User config directory (`~/.config/thorpack` on Linux)
    config_home: Option<PathBuf>,
}

impl GlobalContext {
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        Ok(Self::with_cwd(cwd))
    }

    /// Create a GlobalContext with a specific working directory.
    pub fn with_cwd(cwd: PathBuf) -> Self {
        let config_home = PROJECT_DIRS
            .as_ref()
            .map(|dirs| dirs.config_dir().to_path_buf());

        GlobalContext { cwd, config_home }
    }

    /// Override the user config directory.
    pub fn with_config_home(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config_home = Some(dir.into());
        self
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// The global configuration file, if a config directory is known.
    pub fn global_config_path(&self) -> Option<PathBuf> {
        self.config_home.as_ref().map(|dir| dir.join("config.toml"))
    }

    /// The project-local thorpack directory.
    pub fn project_dir(&self) -> PathBuf {
        self.cwd.join(PROJECT_DIR)
    }

    pub fn project_config_path(&self) -> PathBuf {
        self.project_dir().join("config.toml")
    }

    /// Default checkout location for the package sources.
    pub fn source_dir(&self) -> PathBuf {
        self.project_dir().join("source")
    }

    /// Default out-of-tree build directory.
    pub fn build_dir(&self) -> PathBuf {
        self.project_dir().join("build")
    }

    /// Default install prefix.
    pub fn package_dir(&self) -> PathBuf {
        self.project_dir().join("package")
    }

    /// Load global config overlaid by project config.
    pub fn load_config(&self) -> Config {
        match self.global_config_path() {
            Some(global) => load_config(&global, &self.project_config_path()),
            None => Config::load_or_default(&self.project_config_path()),
        }
    }
}
