//! Configuration file support for thorpack.
//!
//! thorpack reads two configuration files:
//! - Global: `<config dir>/thorpack/config.toml` - User-wide defaults
//! - Project: `.thorpack/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config; CLI flags take
//! precedence over both.
//!
//! ```toml
//! [build]
//! shared = true
//! fpic = true
//! build_type = "release"
//! jobs = 8
//! strict = false
//!
//! [toolchain]
//! cxx = "/usr/bin/g++-13"
//! cppstd = "20"
//!
//! [resolver]
//! prefix = "/opt/deps"
//!
//! [dependencies]
//! openssl = "/opt/openssl-3.3.1"
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::language::CppStandard;
use crate::core::recipe::BuildOptions;
use crate::core::variant::Profile;

/// thorpack configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Build settings
    pub build: BuildConfig,

    /// Toolchain overrides
    pub toolchain: ToolchainSettings,

    /// Resolver settings
    pub resolver: ResolverConfig,

    /// Explicit dependency roots, by package name
    pub dependencies: BTreeMap<String, PathBuf>,
}

/// Build-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Build shared libraries (default: true)
    pub shared: Option<bool>,

    /// Position-independent code (default: true)
    pub fpic: Option<bool>,

    /// "release" or "debug" (default: release)
    pub build_type: Option<String>,

    /// Parallel make jobs
    pub jobs: Option<usize>,

    /// Verify the installed tree against the manifest
    pub strict: Option<bool>,
}

/// Toolchain settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolchainSettings {
    /// Path to the C++ compiler (e.g., /usr/bin/clang++)
    pub cxx: Option<PathBuf>,

    /// Path to make
    pub make: Option<PathBuf>,

    /// C++ standard to build with, overriding detection
    pub cppstd: Option<CppStandard>,
}

/// Resolver settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Directory holding `<name>-<version>` installs
    pub prefix: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config: {}", path.display()))
    }

    /// Load configuration, falling back to defaults if the file doesn't
    /// exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        let b = other.build;
        if b.shared.is_some() {
            self.build.shared = b.shared;
        }
        if b.fpic.is_some() {
            self.build.fpic = b.fpic;
        }
        if b.build_type.is_some() {
            self.build.build_type = b.build_type;
        }
        if b.jobs.is_some() {
            self.build.jobs = b.jobs;
        }
        if b.strict.is_some() {
            self.build.strict = b.strict;
        }

        let t = other.toolchain;
        if t.cxx.is_some() {
            self.toolchain.cxx = t.cxx;
        }
        if t.make.is_some() {
            self.toolchain.make = t.make;
        }
        if t.cppstd.is_some() {
            self.toolchain.cppstd = t.cppstd;
        }

        if other.resolver.prefix.is_some() {
            self.resolver.prefix = other.resolver.prefix;
        }

        self.dependencies.extend(other.dependencies);
    }

    /// Build options with defaults applied.
    pub fn build_options(&self) -> Result<BuildOptions> {
        let defaults = BuildOptions::default();

        let profile = match &self.build.build_type {
            Some(build_type) => build_type
                .parse::<Profile>()
                .map_err(|e| anyhow::anyhow!("{}", e))?,
            None => defaults.profile,
        };

        Ok(BuildOptions {
            shared: self.build.shared.unwrap_or(defaults.shared),
            fpic: self.build.fpic.unwrap_or(defaults.fpic),
            profile,
            jobs: self.build.jobs.or(defaults.jobs),
        })
    }

    pub fn strict(&self) -> bool {
        self.build.strict.unwrap_or(false)
    }
}

/// Load configuration with global and project merging.
pub fn load_config(global_path: &Path, project_path: &Path) -> Config {
    let mut config = Config::load_or_default(global_path);
    config.merge(Config::load_or_default(project_path));
    config
}
