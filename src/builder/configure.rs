//! Configure argument generation.
//!
//! [`ToolchainConfigurer`] maps resolved dependency roots and the static
//! feature toggles onto the ordered argument list for `configure`. The
//! dependency-to-flag naming lives in [`ROOT_FLAGS`] rather than being
//! derived from package names, because several tokens differ from the
//! package they point at.

use std::path::Path;

use crate::builder::features::FeatureSet;
use crate::builder::toolchain::Toolchain;
use crate::core::dependency::ResolvedDependencies;
use crate::core::errors::PackageError;
use crate::core::recipe::BuildOptions;
use crate::core::variant::{Linkage, Profile};
use crate::util::hash::Fingerprint;

/// How one dependency's root is passed to `configure`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RootFlag {
    /// Package name in the dependency set.
    pub key: &'static str,
    /// Token in `--with-<token>-root=`.
    pub token: &'static str,
    /// Label for progress output.
    pub purpose: &'static str,
    /// Appended to the root for header-only packages.
    pub header_subpath: Option<&'static str>,
}

impl RootFlag {
    /// Render the argument for `root`.
    pub fn render(&self, root: &Path) -> String {
        format!(
            "--with-{}-root={}{}",
            self.token,
            root.display(),
            self.header_subpath.unwrap_or("")
        )
    }
}

/// Dependency root flags, in emission order.
pub const ROOT_FLAGS: [RootFlag; 6] = [
    RootFlag {
        key: "zlib",
        token: "zlib",
        purpose: "ZLib",
        header_subpath: None,
    },
    RootFlag {
        key: "libyaml",
        token: "yaml",
        purpose: "Yaml",
        header_subpath: None,
    },
    RootFlag {
        key: "snappy",
        token: "snappy",
        purpose: "Snappy",
        header_subpath: None,
    },
    RootFlag {
        key: "openssl",
        token: "crypto",
        purpose: "Open",
        header_subpath: None,
    },
    RootFlag {
        key: "bzip2",
        token: "bzip2",
        purpose: "BZip2",
        header_subpath: None,
    },
    RootFlag {
        key: "magic_enum",
        token: "magicenum-header-only",
        purpose: "Magic",
        header_subpath: Some("/include/magic_enum"),
    },
];

/// Ordered configure arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigureArgs(Vec<String>);

impl ConfigureArgs {
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

/// Everything needed to run `configure`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigureInvocation {
    pub args: Vec<String>,
    pub env: Vec<(String, String)>,
}

impl ConfigureInvocation {
    /// Short, stable identity of the invocation.
    pub fn fingerprint(&self) -> String {
        let mut fp = Fingerprint::new();
        fp.update_strs(self.args.iter().map(String::as_str));
        for (key, value) in &self.env {
            fp.update_str(key).update_str(value);
        }
        fp.finish_short()
    }
}

/// Builds `configure` arguments from resolved dependencies.
pub struct ToolchainConfigurer<'a> {
    deps: &'a ResolvedDependencies,
    features: &'a FeatureSet,
}

impl<'a> ToolchainConfigurer<'a> {
    pub fn new(deps: &'a ResolvedDependencies, features: &'a FeatureSet) -> Self {
        ToolchainConfigurer { deps, features }
    }

    /// Feature toggles followed by one root argument per dependency.
    ///
    /// Fails with [`PackageError::MissingDependency`] before producing
    /// anything if a mapped dependency has no root.
    pub fn generate(&self) -> Result<ConfigureArgs, PackageError> {
        let mut roots = Vec::with_capacity(ROOT_FLAGS.len());
        for flag in &ROOT_FLAGS {
            let root = self
                .deps
                .root(flag.key)
                .ok_or_else(|| PackageError::MissingDependency {
                    name: flag.key.to_string(),
                })?;
            roots.push((flag, root));
        }

        let mut args: Vec<String> = self.features.iter().map(|f| f.to_arg()).collect();

        for (flag, root) in roots {
            tracing::info!("{:<8} {}", format!("{}:", flag.purpose), root.display());
            args.push(flag.render(root));
        }

        Ok(ConfigureArgs(args))
    }

    /// The complete `configure` invocation: build-option arguments, then
    /// [`generate`](Self::generate) verbatim.
    pub fn invocation(
        &self,
        options: &BuildOptions,
        prefix: &Path,
        toolchain: &dyn Toolchain,
    ) -> Result<ConfigureInvocation, PackageError> {
        let generated = self.generate()?;

        let mut args = vec![format!("--prefix={}", prefix.display())];
        args.extend(linkage_args(options.linkage()).iter().map(|s| s.to_string()));
        if options.fpic {
            args.push("--with-pic".to_string());
        }
        args.extend(generated.into_vec());

        let mut cxxflags = match options.profile {
            Profile::Release => vec!["-O3".to_string()],
            Profile::Debug => vec!["-g".to_string(), "-O0".to_string()],
        };
        if let Some(std) = toolchain.configured_standard() {
            cxxflags.push(format!("-std={}", std.as_flag_value()));
        }

        let env = vec![
            ("CXX".to_string(), toolchain.cxx_path().display().to_string()),
            ("CXXFLAGS".to_string(), cxxflags.join(" ")),
        ];

        Ok(ConfigureInvocation { args, env })
    }
}

fn linkage_args(linkage: Linkage) -> [&'static str; 2] {
    match linkage {
        Linkage::Shared => ["--enable-shared", "--disable-static"],
        Linkage::Static => ["--disable-shared", "--enable-static"],
    }
}
