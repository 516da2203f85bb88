//! Subprocess execution utilities.

use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use anyhow::{bail, Context, Result};

/// How a child process terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitInfo {
    /// Exited with the given status code.
    Code(i32),
    /// Killed by a signal (Unix only).
    Signal(i32),
    /// The platform reported neither a code nor a signal.
    Unknown,
}

impl ExitInfo {
    /// Convert a std exit status.
    pub fn from_status(status: ExitStatus) -> Self {
        if let Some(code) = status.code() {
            return ExitInfo::Code(code);
        }

        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            if let Some(signal) = status.signal() {
                return ExitInfo::Signal(signal);
            }
        }

        ExitInfo::Unknown
    }

    /// Exit code zero.
    pub fn success(&self) -> bool {
        matches!(self, ExitInfo::Code(0))
    }
}

impl fmt::Display for ExitInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitInfo::Code(code) => write!(f, "exit code {}", code),
            ExitInfo::Signal(signal) => write!(f, "terminated by signal {}", signal),
            ExitInfo::Unknown => write!(f, "unknown exit status"),
        }
    }
}

/// Builder for subprocess execution.
#[derive(Debug, Clone)]
pub struct ProcessBuilder {
    program: PathBuf,
    args: Vec<String>,
    env: Vec<(String, String)>,
    cwd: Option<PathBuf>,
}

impl ProcessBuilder {
    /// Create a new process builder for the given program.
    pub fn new(program: impl AsRef<Path>) -> Self {
        ProcessBuilder {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
            env: Vec::new(),
            cwd: None,
        }
    }

    /// Add a single argument.
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_string_lossy().into_owned());
        self
    }

    /// Add multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args.extend(
            args.into_iter()
                .map(|s| s.as_ref().to_string_lossy().into_owned()),
        );
        self
    }

    /// Set an environment variable.
    pub fn env(mut self, key: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        self.env
            .push((key.as_ref().to_string(), value.as_ref().to_string()));
        self
    }

    /// Set the working directory.
    pub fn cwd(mut self, cwd: impl AsRef<Path>) -> Self {
        self.cwd = Some(cwd.as_ref().to_path_buf());
        self
    }

    /// Get the program path.
    pub fn get_program(&self) -> &Path {
        &self.program
    }

    /// Get the arguments.
    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    /// Get the extra environment.
    pub fn get_env(&self) -> &[(String, String)] {
        &self.env
    }

    /// Get the working directory.
    pub fn get_cwd(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }

    fn build_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);

        for (key, value) in &self.env {
            cmd.env(key, value);
        }

        if let Some(ref cwd) = self.cwd {
            cmd.current_dir(cwd);
        }

        cmd
    }

    /// Run with inherited stdio and wait for completion.
    pub fn status(&self) -> Result<ExitStatus> {
        let mut cmd = self.build_command();
        let status = cmd
            .status()
            .with_context(|| format!("failed to execute `{}`", self.program.display()))?;
        Ok(status)
    }

    /// Run with captured output. Returns the status and stderr.
    pub fn exec_captured(&self) -> Result<(ExitStatus, String)> {
        let mut cmd = self.build_command();
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        let output = cmd
            .output()
            .with_context(|| format!("failed to spawn `{}`", self.program.display()))?;

        Ok((
            output.status,
            String::from_utf8_lossy(&output.stderr).into_owned(),
        ))
    }

    /// Run with captured output and return stdout; fails on a non-zero exit.
    pub fn exec_stdout(&self) -> Result<String> {
        let mut cmd = self.build_command();
        let output = cmd
            .stdin(Stdio::null())
            .output()
            .with_context(|| format!("failed to spawn `{}`", self.program.display()))?;

        if !output.status.success() {
            bail!(
                "`{}` failed with {}",
                self.display_command(),
                ExitInfo::from_status(output.status)
            );
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Display the command for error messages.
    pub fn display_command(&self) -> String {
        let mut parts = vec![self.program.display().to_string()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

/// Executes toolchain commands.
///
/// Every toolchain stage goes through this seam so the pipeline can be
/// exercised without a native toolchain.
pub trait CommandRunner {
    /// Run the command to completion (blocking).
    fn run(&self, cmd: &ProcessBuilder) -> Result<ExitInfo>;
}

/// Runs commands on the host.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner {
    /// Stream child output to the terminal instead of capturing it.
    pub echo: bool,
}

impl SystemRunner {
    pub fn new(echo: bool) -> Self {
        SystemRunner { echo }
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, cmd: &ProcessBuilder) -> Result<ExitInfo> {
        tracing::debug!("running `{}`", cmd.display_command());

        if self.echo {
            return Ok(ExitInfo::from_status(cmd.status()?));
        }

        let (status, stderr) = cmd.exec_captured()?;
        let exit = ExitInfo::from_status(status);
        if !exit.success() {
            for line in tail(&stderr, 20) {
                tracing::error!("{}", line);
            }
        }
        Ok(exit)
    }
}

/// Last `n` lines of `text`.
fn tail(text: &str, n: usize) -> impl Iterator<Item = &str> {
    let lines: Vec<&str> = text.lines().collect();
    let skip = lines.len().saturating_sub(n);
    lines.into_iter().skip(skip)
}

/// Find an executable in PATH.
pub fn find_executable(name: &str) -> Option<PathBuf> {
    which::which(name).ok()
}

/// Find a C++ compiler.
pub fn find_cxx_compiler() -> Option<PathBuf> {
    // Check CXX environment variable first
    if let Ok(cxx) = std::env::var("CXX") {
        if let Some(path) = find_executable(&cxx) {
            return Some(path);
        }
    }

    for compiler in &["c++", "g++", "clang++"] {
        if let Some(path) = find_executable(compiler) {
            return Some(path);
        }
    }

    None
}

/// Find make.
pub fn find_make() -> Option<PathBuf> {
    if let Ok(make) = std::env::var("MAKE") {
        if let Some(path) = find_executable(&make) {
            return Some(path);
        }
    }

    find_executable("make").or_else(|| find_executable("gmake"))
}
