//! Test doubles for the pipeline's process and toolchain seams.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Result;
use semver::Version;

use crate::builder::toolchain::Toolchain;
use crate::core::dependency::{Dependency, DependencySet, ResolvedDependencies};
use crate::core::language::CppStandard;
use crate::util::process::{CommandRunner, ExitInfo, ProcessBuilder};

/// Records every command and answers with scripted exits.
///
/// Once the script runs out every command succeeds.
#[derive(Debug, Default)]
pub struct MockRunner {
    calls: Mutex<Vec<ProcessBuilder>>,
    exits: Mutex<VecDeque<ExitInfo>>,
}

impl MockRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exit statuses returned in order, one per command.
    pub fn with_exits(self, exits: impl IntoIterator<Item = ExitInfo>) -> Self {
        if let Ok(mut queue) = self.exits.lock() {
            queue.extend(exits);
        }
        self
    }

    /// Rendered command lines, in execution order.
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(ProcessBuilder::display_command)
            .collect()
    }

    /// The most recent command.
    pub fn last(&self) -> Option<ProcessBuilder> {
        self.calls.lock().unwrap().last().cloned()
    }
}

impl CommandRunner for MockRunner {
    fn run(&self, cmd: &ProcessBuilder) -> Result<ExitInfo> {
        self.calls.lock().unwrap().push(cmd.clone());
        Ok(self
            .exits
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(ExitInfo::Code(0)))
    }
}

/// A compiler with a fixed capability.
#[derive(Debug, Clone)]
pub struct MockToolchain {
    cxx: PathBuf,
    max: Option<CppStandard>,
    configured: Option<CppStandard>,
}

impl MockToolchain {
    pub fn new(max: Option<CppStandard>) -> Self {
        MockToolchain {
            cxx: PathBuf::from("/usr/bin/c++"),
            max,
            configured: None,
        }
    }

    pub fn with_configured(mut self, standard: CppStandard) -> Self {
        self.configured = Some(standard);
        self
    }
}

impl Toolchain for MockToolchain {
    fn cxx_path(&self) -> &Path {
        &self.cxx
    }

    fn max_standard(&self) -> Option<CppStandard> {
        self.max
    }

    fn configured_standard(&self) -> Option<CppStandard> {
        self.configured
    }

    fn describe(&self) -> String {
        "mock c++".to_string()
    }
}

/// Resolved roots for the given `(name, root)` pairs.
///
/// Names in the required set keep their pinned version; anything else gets
/// `0.0.0`.
pub fn resolved_roots(entries: &[(&str, &str)]) -> ResolvedDependencies {
    let required = DependencySet::required();
    let mut resolved = ResolvedDependencies::new();

    for (name, root) in entries {
        let dep = required
            .get(name)
            .cloned()
            .unwrap_or_else(|| Dependency::new(*name, Version::new(0, 0, 0)));
        resolved.insert(&dep, PathBuf::from(root)).unwrap();
    }

    resolved
}
