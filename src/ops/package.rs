//! The packaging pipeline.
//!
//! resolve → validate → configure → compile → install → manifest. Each
//! stage blocks until its external process exits; the first failure ends
//! the run and nothing is retried or rolled back.

use std::path::PathBuf;

use anyhow::Result;

use crate::builder::autotools::{BuildDriver, Installer};
use crate::builder::configure::{ConfigureInvocation, ToolchainConfigurer};
use crate::builder::features::FeatureSet;
use crate::builder::toolchain::{validate, Toolchain};
use crate::core::dependency::{DependencySet, ResolvedDependencies};
use crate::core::language::CppStandard;
use crate::core::manifest::PackageManifest;
use crate::core::recipe::BuildOptions;
use crate::ops::resolve::{resolve, Resolver};
use crate::ops::verify::verify_manifest;
use crate::util::fs::ensure_dir;
use crate::util::process::CommandRunner;
use crate::util::shell::{Shell, Status};

/// Where the pipeline reads and writes.
#[derive(Debug, Clone)]
pub struct PackageOptions {
    /// Checked-out source tree containing `configure`.
    pub source_dir: PathBuf,
    /// Out-of-tree build directory.
    pub build_dir: PathBuf,
    /// Install prefix; becomes the manifest root.
    pub package_root: PathBuf,
    /// `make` executable.
    pub make: PathBuf,
    pub build: BuildOptions,
    /// Verify the installed tree against the manifest.
    pub strict: bool,
}

/// Outcome of a configuration plan.
#[derive(Debug, Clone)]
pub struct Plan {
    pub resolved: ResolvedDependencies,
    pub standard: CppStandard,
    pub invocation: ConfigureInvocation,
}

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct PackageResult {
    pub plan: Plan,
    pub manifest: PackageManifest,
}

/// Collaborators of one packaging run.
pub struct Pipeline<'a> {
    shell: &'a Shell,
    resolver: &'a dyn Resolver,
    toolchain: &'a dyn Toolchain,
    runner: &'a dyn CommandRunner,
    features: FeatureSet,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        shell: &'a Shell,
        resolver: &'a dyn Resolver,
        toolchain: &'a dyn Toolchain,
        runner: &'a dyn CommandRunner,
    ) -> Self {
        Pipeline {
            shell,
            resolver,
            toolchain,
            runner,
            features: FeatureSet::package_defaults(),
        }
    }

    pub fn with_features(mut self, features: FeatureSet) -> Self {
        self.features = features;
        self
    }

    /// Resolve, validate and derive the configure invocation without
    /// running any toolchain step.
    pub fn plan(&self, deps: &DependencySet, opts: &PackageOptions) -> Result<Plan> {
        self.shell.status(
            Status::Resolving,
            format!("{} dependencies", deps.len()),
        );
        let resolved = resolve(deps, self.resolver)?;

        self.shell
            .status(Status::Validating, self.toolchain.describe());
        let standard = validate(self.toolchain)?;

        let invocation = ToolchainConfigurer::new(&resolved, &self.features).invocation(
            &opts.build,
            &opts.package_root,
            self.toolchain,
        )?;

        Ok(Plan {
            resolved,
            standard,
            invocation,
        })
    }

    /// Run the whole pipeline.
    pub fn run(&self, deps: &DependencySet, opts: &PackageOptions) -> Result<PackageResult> {
        let plan = self.plan(deps, opts)?;

        ensure_dir(&opts.package_root)?;

        let driver = BuildDriver::new(self.runner, &opts.source_dir, &opts.build_dir, &opts.make)
            .jobs(opts.build.jobs);

        self.shell
            .status(Status::Configuring, opts.source_dir.display());
        self.stage(|| driver.configure(&plan.invocation))?;

        self.shell.status(
            Status::Compiling,
            format!("{} ({})", opts.build.profile.as_str(), opts.build.linkage().as_str()),
        );
        self.stage(|| driver.compile())?;

        self.shell
            .status(Status::Installing, opts.package_root.display());
        let installer = Installer::new(self.runner, &opts.build_dir, &opts.make);
        self.stage(|| installer.install())?;

        let manifest = PackageManifest::for_root(&opts.package_root);

        if opts.strict {
            self.shell
                .status(Status::Verifying, opts.package_root.display());
            verify_manifest(&manifest, opts.build.linkage())?;
        }

        self.shell.status(
            Status::Finished,
            format!(
                "{} libraries into {}",
                manifest.libraries().len(),
                opts.package_root.display()
            ),
        );

        Ok(PackageResult { plan, manifest })
    }

    /// Run one long stage under a spinner when the shell wants one.
    fn stage(&self, step: impl FnOnce() -> Result<()>) -> Result<()> {
        let spinner = self.shell.spinner();
        let result = step();
        if let Some(spinner) = spinner {
            spinner.finish_and_clear();
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::core::errors::PackageError;
    use crate::ops::resolve::StaticResolver;
    use crate::test_support::{MockRunner, MockToolchain};
    use crate::util::process::ExitInfo;
    use crate::util::shell::{ColorChoice, ShellMode, Verbosity};

    fn quiet_shell() -> Shell {
        Shell::new(ShellMode::Human {
            verbosity: Verbosity::Quiet,
            color: ColorChoice::Never,
        })
    }

    fn setup(tmp: &TempDir) -> (StaticResolver, PackageOptions) {
        let mut resolver = StaticResolver::new();
        for dep in DependencySet::required().iter() {
            let root = tmp.path().join("deps").join(dep.name());
            std::fs::create_dir_all(&root).unwrap();
            resolver = resolver.with_root(dep.name(), root);
        }

        let opts = PackageOptions {
            source_dir: tmp.path().join("src"),
            build_dir: tmp.path().join("build"),
            package_root: tmp.path().join("pkg"),
            make: PathBuf::from("make"),
            build: BuildOptions::default(),
            strict: false,
        };

        (resolver, opts)
    }

    #[test]
    fn test_full_run_sequence() {
        let tmp = TempDir::new().unwrap();
        let (resolver, opts) = setup(&tmp);
        let shell = quiet_shell();
        let toolchain = MockToolchain::new(Some(CppStandard::Cpp20));
        let runner = MockRunner::new();

        let result = Pipeline::new(&shell, &resolver, &toolchain, &runner)
            .run(&DependencySet::required(), &opts)
            .unwrap();

        let calls = runner.calls();
        assert_eq!(calls.len(), 3);
        assert!(calls[0].starts_with(&format!("{}", opts.source_dir.join("configure").display())));
        assert!(calls[0].contains("--with-crypto-root="));
        assert_eq!(calls[1], "make");
        assert_eq!(calls[2], "make install");

        assert_eq!(result.manifest.root(), opts.package_root.as_path());
        assert_eq!(result.manifest.libraries().len(), 20);
        assert_eq!(result.plan.standard, CppStandard::Cpp20);
        assert!(opts.package_root.is_dir());
    }

    #[test]
    fn test_unsupported_standard_runs_nothing() {
        let tmp = TempDir::new().unwrap();
        let (resolver, opts) = setup(&tmp);
        let shell = quiet_shell();
        let toolchain = MockToolchain::new(Some(CppStandard::Cpp17));
        let runner = MockRunner::new();

        let err = Pipeline::new(&shell, &resolver, &toolchain, &runner)
            .run(&DependencySet::required(), &opts)
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<PackageError>(),
            Some(PackageError::StandardUnsupported { .. })
        ));
        assert!(runner.calls().is_empty());
        assert!(!opts.build_dir.exists());
    }

    #[test]
    fn test_unresolved_dependency_runs_nothing() {
        let tmp = TempDir::new().unwrap();
        let (_, opts) = setup(&tmp);
        let shell = quiet_shell();
        let toolchain = MockToolchain::new(Some(CppStandard::Cpp20));
        let runner = MockRunner::new();
        let resolver = StaticResolver::new().with_root("zlib", tmp.path());

        let err = Pipeline::new(&shell, &resolver, &toolchain, &runner)
            .run(&DependencySet::required(), &opts)
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<PackageError>(),
            Some(PackageError::ResolveFailure { .. })
        ));
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn test_build_failure_skips_install() {
        let tmp = TempDir::new().unwrap();
        let (resolver, opts) = setup(&tmp);
        let shell = quiet_shell();
        let toolchain = MockToolchain::new(Some(CppStandard::Cpp20));
        let runner = MockRunner::new().with_exits([ExitInfo::Code(0), ExitInfo::Code(2)]);

        let err = Pipeline::new(&shell, &resolver, &toolchain, &runner)
            .run(&DependencySet::required(), &opts)
            .unwrap_err();

        let err = err.downcast_ref::<PackageError>().unwrap();
        assert_eq!(err.stage(), crate::core::errors::Stage::Build);
        assert_eq!(runner.calls().len(), 2);
    }

    #[test]
    fn test_strict_mode_reports_drift() {
        let tmp = TempDir::new().unwrap();
        let (resolver, mut opts) = setup(&tmp);
        opts.strict = true;
        let shell = quiet_shell();
        let toolchain = MockToolchain::new(Some(CppStandard::Cpp20));
        let runner = MockRunner::new();

        // The mock install produces nothing.
        let err = Pipeline::new(&shell, &resolver, &toolchain, &runner)
            .run(&DependencySet::required(), &opts)
            .unwrap_err();

        match err.downcast_ref::<PackageError>() {
            Some(PackageError::ManifestDrift { missing, .. }) => assert_eq!(missing.len(), 29),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_plan_uses_package_root_as_prefix() {
        let tmp = TempDir::new().unwrap();
        let (resolver, opts) = setup(&tmp);
        let shell = quiet_shell();
        let toolchain = MockToolchain::new(Some(CppStandard::Cpp23));
        let runner = MockRunner::new();

        let plan = Pipeline::new(&shell, &resolver, &toolchain, &runner)
            .plan(&DependencySet::required(), &opts)
            .unwrap();

        assert_eq!(
            plan.invocation.args[0],
            format!("--prefix={}", opts.package_root.display())
        );
        assert_eq!(plan.resolved.len(), 6);
        assert!(runner.calls().is_empty());
    }
}
