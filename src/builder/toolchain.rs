//! C++ toolchain detection and the minimum-standard check.
//!
//! Detection priority:
//! 1. `[toolchain] cxx` in the config file
//! 2. The `CXX` environment variable
//! 3. Searching PATH for `c++`, `g++`, `clang++`

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::{bail, Result};
use regex::Regex;
use semver::Version;

use crate::core::errors::PackageError;
use crate::core::language::CppStandard;
use crate::util::config::ToolchainSettings;
use crate::util::process::{find_cxx_compiler, find_executable, ProcessBuilder};

static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+)\.(\d+)(?:\.(\d+))?").expect("version regex is valid")
});

/// Compiler family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompilerFamily {
    Gcc,
    Clang,
    AppleClang,
    Unknown,
}

impl CompilerFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompilerFamily::Gcc => "gcc",
            CompilerFamily::Clang => "clang",
            CompilerFamily::AppleClang => "apple-clang",
            CompilerFamily::Unknown => "unknown",
        }
    }

    /// Highest standard this family supports at `version`.
    pub fn max_standard(&self, version: &Version) -> Option<CppStandard> {
        let major = version.major;
        let table: &[(u64, CppStandard)] = match self {
            CompilerFamily::Gcc => &[
                (11, CppStandard::Cpp23),
                (10, CppStandard::Cpp20),
                (7, CppStandard::Cpp17),
                (5, CppStandard::Cpp14),
                (4, CppStandard::Cpp11),
            ],
            CompilerFamily::Clang => &[
                (17, CppStandard::Cpp23),
                (10, CppStandard::Cpp20),
                (5, CppStandard::Cpp17),
                (3, CppStandard::Cpp14),
            ],
            CompilerFamily::AppleClang => &[
                (15, CppStandard::Cpp23),
                (13, CppStandard::Cpp20),
                (10, CppStandard::Cpp17),
                (6, CppStandard::Cpp14),
            ],
            CompilerFamily::Unknown => &[],
        };

        table
            .iter()
            .find(|(min_major, _)| major >= *min_major)
            .map(|(_, std)| *std)
    }
}

impl fmt::Display for CompilerFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the pipeline needs to know about the C++ compiler.
pub trait Toolchain {
    /// Path of the C++ compiler driver.
    fn cxx_path(&self) -> &Path;

    /// Highest standard the compiler supports, if known.
    fn max_standard(&self) -> Option<CppStandard>;

    /// Standard pinned by configuration, if any.
    fn configured_standard(&self) -> Option<CppStandard> {
        None
    }

    /// Human-readable identity for messages.
    fn describe(&self) -> String {
        self.cxx_path().display().to_string()
    }
}

/// A compiler found on the host.
#[derive(Debug, Clone)]
pub struct DetectedToolchain {
    cxx: PathBuf,
    family: CompilerFamily,
    version: Option<Version>,
    cppstd: Option<CppStandard>,
}

impl DetectedToolchain {
    pub fn new(
        cxx: PathBuf,
        family: CompilerFamily,
        version: Option<Version>,
        cppstd: Option<CppStandard>,
    ) -> Self {
        DetectedToolchain {
            cxx,
            family,
            version,
            cppstd,
        }
    }

    pub fn family(&self) -> CompilerFamily {
        self.family
    }

    pub fn version(&self) -> Option<&Version> {
        self.version.as_ref()
    }
}

impl Toolchain for DetectedToolchain {
    fn cxx_path(&self) -> &Path {
        &self.cxx
    }

    fn max_standard(&self) -> Option<CppStandard> {
        self.version
            .as_ref()
            .and_then(|v| self.family.max_standard(v))
    }

    fn configured_standard(&self) -> Option<CppStandard> {
        self.cppstd
    }

    fn describe(&self) -> String {
        match &self.version {
            Some(version) => format!("{} {} ({})", self.family, version, self.cxx.display()),
            None => format!("{} ({})", self.family, self.cxx.display()),
        }
    }
}

/// Detect the C++ compiler.
pub fn detect_toolchain(settings: &ToolchainSettings) -> Result<DetectedToolchain> {
    let configured = settings.cxx.as_ref().and_then(|cxx| {
        let found = if cxx.exists() {
            Some(cxx.clone())
        } else {
            cxx.to_str().and_then(find_executable)
        };
        if found.is_none() {
            tracing::warn!("Configured C++ compiler not found: {}", cxx.display());
        }
        found
    });

    let Some(cxx) = configured.or_else(find_cxx_compiler) else {
        bail!(
            "no C++ compiler found\n\
             \n\
             A C++20 capable compiler (g++, clang++) is required.\n\
             Set the CXX environment variable or `[toolchain] cxx` in .thorpack/config.toml."
        );
    };

    let banner = ProcessBuilder::new(&cxx)
        .arg("--version")
        .exec_stdout()
        .unwrap_or_else(|e| {
            tracing::debug!("{:#}", e);
            String::new()
        });

    let family = detect_family(&cxx, &banner);
    let version = parse_version(&banner);

    tracing::debug!("detected {} {:?} at {}", family, version, cxx.display());

    Ok(DetectedToolchain::new(cxx, family, version, settings.cppstd))
}

/// Identify the compiler family from its name and `--version` banner.
pub fn detect_family(cxx: &Path, version_output: &str) -> CompilerFamily {
    let banner = version_output.to_lowercase();
    if banner.contains("apple") && banner.contains("clang") {
        return CompilerFamily::AppleClang;
    }
    if banner.contains("clang") {
        return CompilerFamily::Clang;
    }
    if banner.contains("gcc") || banner.contains("free software foundation") {
        return CompilerFamily::Gcc;
    }

    let name = cxx
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("")
        .to_lowercase();
    if name.contains("clang") {
        CompilerFamily::Clang
    } else if name.contains("g++") || name.contains("gcc") {
        CompilerFamily::Gcc
    } else {
        CompilerFamily::Unknown
    }
}

/// First `major.minor[.patch]` on the banner's first line.
pub fn parse_version(version_output: &str) -> Option<Version> {
    let first_line = version_output.lines().next()?;
    let caps = VERSION_RE.captures(first_line)?;
    let major = caps.get(1)?.as_str().parse().ok()?;
    let minor = caps.get(2)?.as_str().parse().ok()?;
    let patch = caps
        .get(3)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0);
    Some(Version::new(major, minor, patch))
}

/// Check the toolchain against [`CppStandard::MINIMUM`].
///
/// A configured standard takes precedence over the detected one. Returns
/// the standard the check passed with.
pub fn validate(toolchain: &dyn Toolchain) -> Result<CppStandard, PackageError> {
    let supported = toolchain
        .configured_standard()
        .or_else(|| toolchain.max_standard());

    match supported {
        Some(std) if std >= CppStandard::MINIMUM => Ok(std),
        _ => Err(PackageError::StandardUnsupported {
            compiler: toolchain.describe(),
            required: CppStandard::MINIMUM,
            supported,
        }),
    }
}
