//! Packaging pipeline errors.
//!
//! Every variant is fatal: the pipeline stops at the first one and never
//! retries or rolls back.

use std::fmt;
use std::path::PathBuf;

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::core::language::CppStandard;
use crate::util::diagnostic::Diagnostic;
use crate::util::process::ExitInfo;

/// Pipeline stage, used to tell the operator where a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Resolve,
    Validate,
    Configure,
    Build,
    Install,
    Verify,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Resolve => "resolve",
            Stage::Validate => "validate",
            Stage::Configure => "configure",
            Stage::Build => "build",
            Stage::Install => "install",
            Stage::Verify => "verify",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fatal packaging error.
#[derive(Debug, Error, MietteDiagnostic)]
pub enum PackageError {
    #[error("required dependency `{name}` was not resolved")]
    #[diagnostic(
        code(thorpack::configure::missing_dependency),
        help("Resolve every required dependency before generating configure arguments")
    )]
    MissingDependency { name: String },

    #[error("failed to resolve `{name}/{version}`: {reason}")]
    #[diagnostic(
        code(thorpack::resolve::failed),
        help("Pass `--dep <name>=<root>` or set `[resolver] prefix` in .thorpack/config.toml")
    )]
    ResolveFailure {
        name: String,
        version: String,
        reason: String,
    },

    #[error("{required} is required but `{compiler}` supports {}", supported_display(.supported))]
    #[diagnostic(
        code(thorpack::validate::standard_unsupported),
        help("Use a newer compiler or set `[toolchain] cppstd` if the detection is wrong")
    )]
    StandardUnsupported {
        compiler: String,
        required: CppStandard,
        supported: Option<CppStandard>,
    },

    #[error("configure failed ({exit})")]
    #[diagnostic(code(thorpack::configure::failed))]
    ConfigureFailure { command: String, exit: ExitInfo },

    #[error("build failed ({exit})")]
    #[diagnostic(code(thorpack::build::failed))]
    BuildFailure { command: String, exit: ExitInfo },

    #[error("install failed ({exit})")]
    #[diagnostic(code(thorpack::install::failed))]
    InstallFailure { command: String, exit: ExitInfo },

    #[error("installed package at {} does not match its manifest", .root.display())]
    #[diagnostic(
        code(thorpack::verify::manifest_drift),
        help("The install step did not produce every published artifact")
    )]
    ManifestDrift { root: PathBuf, missing: Vec<String> },
}

fn supported_display(supported: &Option<CppStandard>) -> String {
    match supported {
        Some(std) => format!("at most {}", std),
        None => "no known C++ standard".to_string(),
    }
}

impl PackageError {
    /// The stage this error aborts.
    pub fn stage(&self) -> Stage {
        match self {
            PackageError::ResolveFailure { .. } => Stage::Resolve,
            PackageError::StandardUnsupported { .. } => Stage::Validate,
            PackageError::MissingDependency { .. } | PackageError::ConfigureFailure { .. } => {
                Stage::Configure
            }
            PackageError::BuildFailure { .. } => Stage::Build,
            PackageError::InstallFailure { .. } => Stage::Install,
            PackageError::ManifestDrift { .. } => Stage::Verify,
        }
    }

    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut diag = Diagnostic::error(format!("{} stage: {}", self.stage(), self));

        match self {
            PackageError::ConfigureFailure { command, .. }
            | PackageError::BuildFailure { command, .. }
            | PackageError::InstallFailure { command, .. } => {
                diag = diag.with_context(format!("command: {}", command));
            }
            PackageError::ManifestDrift { missing, .. } => {
                for entry in missing {
                    diag = diag.with_context(format!("missing: {}", entry));
                }
            }
            _ => {}
        }

        if let Some(code) = self.code() {
            diag = diag.with_context(format!("code: {}", code));
        }
        if let Some(help) = self.help() {
            diag = diag.with_suggestion(help.to_string());
        }

        diag
    }
}
