//! Autotools driver: configure, make, make install.
//!
//! The driver sequences the native toolchain but synthesizes no
//! arguments of its own: `configure` receives the
//! [`ConfigureInvocation`] exactly as generated. Each step is a blocking
//! call, success is exit status zero, and nothing is retried.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::builder::configure::ConfigureInvocation;
use crate::core::errors::PackageError;
use crate::util::fs::ensure_dir;
use crate::util::process::{CommandRunner, ExitInfo, ProcessBuilder};

/// Runs `configure` then `make`.
pub struct BuildDriver<'a> {
    runner: &'a dyn CommandRunner,
    source_dir: PathBuf,
    build_dir: PathBuf,
    make: PathBuf,
    jobs: Option<usize>,
}

impl<'a> BuildDriver<'a> {
    pub fn new(
        runner: &'a dyn CommandRunner,
        source_dir: impl Into<PathBuf>,
        build_dir: impl Into<PathBuf>,
        make: impl Into<PathBuf>,
    ) -> Self {
        BuildDriver {
            runner,
            source_dir: source_dir.into(),
            build_dir: build_dir.into(),
            make: make.into(),
            jobs: None,
        }
    }

    /// Parallel make jobs.
    pub fn jobs(mut self, jobs: Option<usize>) -> Self {
        self.jobs = jobs;
        self
    }

    pub fn build_dir(&self) -> &Path {
        &self.build_dir
    }

    /// Configure, then compile.
    pub fn build(&self, invocation: &ConfigureInvocation) -> Result<()> {
        self.configure(invocation)?;
        self.compile()
    }

    /// Run `configure` from the build directory.
    pub fn configure(&self, invocation: &ConfigureInvocation) -> Result<()> {
        tracing::info!("Configuring in {}", self.build_dir.display());
        ensure_dir(&self.build_dir)?;

        let mut cmd = ProcessBuilder::new(self.source_dir.join("configure"))
            .args(&invocation.args)
            .cwd(&self.build_dir);
        for (key, value) in &invocation.env {
            cmd = cmd.env(key, value);
        }

        let exit = self.runner.run(&cmd)?;
        check(exit, &cmd, |command, exit| PackageError::ConfigureFailure {
            command,
            exit,
        })
    }

    /// Run `make`.
    pub fn compile(&self) -> Result<()> {
        tracing::info!("Compiling");

        let mut cmd = ProcessBuilder::new(&self.make).cwd(&self.build_dir);
        if let Some(jobs) = self.jobs {
            cmd = cmd.arg(format!("-j{}", jobs));
        }

        let exit = self.runner.run(&cmd)?;
        check(exit, &cmd, |command, exit| PackageError::BuildFailure {
            command,
            exit,
        })
    }
}

/// Runs `make install`.
pub struct Installer<'a> {
    runner: &'a dyn CommandRunner,
    build_dir: PathBuf,
    make: PathBuf,
}

impl<'a> Installer<'a> {
    pub fn new(
        runner: &'a dyn CommandRunner,
        build_dir: impl Into<PathBuf>,
        make: impl Into<PathBuf>,
    ) -> Self {
        Installer {
            runner,
            build_dir: build_dir.into(),
            make: make.into(),
        }
    }

    /// Install into the prefix chosen at configure time.
    pub fn install(&self) -> Result<()> {
        tracing::info!("Installing");

        let cmd = ProcessBuilder::new(&self.make)
            .arg("install")
            .cwd(&self.build_dir);

        let exit = self.runner.run(&cmd)?;
        check(exit, &cmd, |command, exit| PackageError::InstallFailure {
            command,
            exit,
        })
    }
}

fn check(
    exit: ExitInfo,
    cmd: &ProcessBuilder,
    failure: impl FnOnce(String, ExitInfo) -> PackageError,
) -> Result<()> {
    if exit.success() {
        Ok(())
    } else {
        Err(failure(cmd.display_command(), exit).into())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::test_support::MockRunner;

    fn invocation() -> ConfigureInvocation {
        ConfigureInvocation {
            args: vec!["--prefix=/pkg".to_string(), "--enable-dark-mode".to_string()],
            env: vec![("CXXFLAGS".to_string(), "-O3".to_string())],
        }
    }

    #[test]
    fn test_build_runs_configure_then_make() {
        let tmp = TempDir::new().unwrap();
        let runner = MockRunner::new();
        let driver = BuildDriver::new(&runner, "/src", tmp.path().join("build"), "make")
            .jobs(Some(4));

        driver.build(&invocation()).unwrap();

        let calls = runner.calls();
        assert_eq!(
            calls,
            vec![
                "/src/configure --prefix=/pkg --enable-dark-mode".to_string(),
                "make -j4".to_string(),
            ]
        );
        assert!(tmp.path().join("build").is_dir());
    }

    #[test]
    fn test_configure_passes_invocation_verbatim() {
        let tmp = TempDir::new().unwrap();
        let runner = MockRunner::new();
        let driver = BuildDriver::new(&runner, "/src", tmp.path(), "make");

        driver.configure(&invocation()).unwrap();

        let cmd = runner.last().unwrap();
        assert_eq!(cmd.get_args(), invocation().args.as_slice());
        assert_eq!(cmd.get_env(), invocation().env.as_slice());
        assert_eq!(cmd.get_cwd(), Some(tmp.path()));
    }

    #[test]
    fn test_configure_failure_stops_before_make() {
        let tmp = TempDir::new().unwrap();
        let runner = MockRunner::new().with_exits([ExitInfo::Code(1)]);
        let driver = BuildDriver::new(&runner, "/src", tmp.path(), "make");

        let err = driver.build(&invocation()).unwrap_err();
        let err = err.downcast_ref::<PackageError>().unwrap();
        assert!(matches!(
            err,
            PackageError::ConfigureFailure {
                exit: ExitInfo::Code(1),
                ..
            }
        ));
        assert_eq!(runner.calls().len(), 1);
    }

    #[test]
    fn test_make_failure_is_build_failure() {
        let tmp = TempDir::new().unwrap();
        let runner = MockRunner::new().with_exits([ExitInfo::Code(0), ExitInfo::Code(2)]);
        let driver = BuildDriver::new(&runner, "/src", tmp.path(), "make");

        let err = driver.build(&invocation()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PackageError>(),
            Some(PackageError::BuildFailure { .. })
        ));
    }

    #[test]
    fn test_signal_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let runner = MockRunner::new().with_exits([ExitInfo::Code(0), ExitInfo::Signal(15)]);
        let driver = BuildDriver::new(&runner, "/src", tmp.path(), "make");

        let err = driver.build(&invocation()).unwrap_err();
        assert!(err.to_string().contains("terminated by signal 15"));
    }

    #[test]
    fn test_install_failure() {
        let runner = MockRunner::new().with_exits([ExitInfo::Code(2)]);
        let installer = Installer::new(&runner, "/build", "make");

        let err = installer.install().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PackageError>(),
            Some(PackageError::InstallFailure { .. })
        ));
        assert_eq!(runner.calls(), vec!["make install".to_string()]);
    }
}
