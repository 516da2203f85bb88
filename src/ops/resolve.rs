//! Dependency resolution boundary.
//!
//! Resolution itself is external: a [`Resolver`] only reports where an
//! already-installed dependency lives. [`resolve`] walks the requirement
//! list in order and stops at the first failure, so a partially resolved
//! set never reaches configuration.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::core::dependency::{Dependency, DependencySet, ResolvedDependencies};
use crate::core::errors::PackageError;

/// Locates installed dependencies.
pub trait Resolver {
    /// Name for diagnostics.
    fn name(&self) -> &str;

    /// Install root of `dep`, or `None` if this resolver does not know it.
    fn locate(&self, dep: &Dependency) -> Result<Option<PathBuf>>;
}

/// Explicit `name → root` assignments (config file or `--dep`).
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
    roots: BTreeMap<String, PathBuf>,
}

impl StaticResolver {
    pub fn new() -> Self {
        StaticResolver::default()
    }

    pub fn with_root(mut self, name: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        self.roots.insert(name.into(), root.into());
        self
    }

    pub fn extend(&mut self, roots: impl IntoIterator<Item = (String, PathBuf)>) {
        self.roots.extend(roots);
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

impl Resolver for StaticResolver {
    fn name(&self) -> &str {
        "explicit"
    }

    fn locate(&self, dep: &Dependency) -> Result<Option<PathBuf>> {
        Ok(self.roots.get(dep.name()).cloned())
    }
}

/// Looks for `<prefix>/<name>-<version>` or `<prefix>/<name>/<version>`.
#[derive(Debug, Clone)]
pub struct PrefixResolver {
    prefix: PathBuf,
}

impl PrefixResolver {
    pub fn new(prefix: impl Into<PathBuf>) -> Self {
        PrefixResolver {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &Path {
        &self.prefix
    }
}

impl Resolver for PrefixResolver {
    fn name(&self) -> &str {
        "prefix"
    }

    fn locate(&self, dep: &Dependency) -> Result<Option<PathBuf>> {
        let candidates = [
            self.prefix
                .join(format!("{}-{}", dep.name(), dep.version())),
            self.prefix
                .join(dep.name())
                .join(dep.version().to_string()),
        ];

        Ok(candidates.into_iter().find(|path| path.is_dir()))
    }
}

/// Tries resolvers in order; the first hit wins.
#[derive(Default)]
pub struct ChainResolver {
    resolvers: Vec<Box<dyn Resolver>>,
}

impl ChainResolver {
    pub fn new() -> Self {
        ChainResolver::default()
    }

    pub fn push(mut self, resolver: impl Resolver + 'static) -> Self {
        self.resolvers.push(Box::new(resolver));
        self
    }

    pub fn len(&self) -> usize {
        self.resolvers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }
}

impl Resolver for ChainResolver {
    fn name(&self) -> &str {
        "chain"
    }

    fn locate(&self, dep: &Dependency) -> Result<Option<PathBuf>> {
        for resolver in &self.resolvers {
            if let Some(root) = resolver.locate(dep)? {
                tracing::debug!("{} resolved by {}", dep, resolver.name());
                return Ok(Some(root));
            }
        }
        Ok(None)
    }
}

/// Resolve every requirement, failing on the first one that cannot be
/// resolved to an existing directory.
pub fn resolve(
    deps: &DependencySet,
    resolver: &dyn Resolver,
) -> Result<ResolvedDependencies, PackageError> {
    let mut resolved = ResolvedDependencies::new();

    for dep in deps.iter() {
        let failure = |reason: String| PackageError::ResolveFailure {
            name: dep.name().to_string(),
            version: dep.version().to_string(),
            reason,
        };

        let root = resolver
            .locate(dep)
            .map_err(|e| failure(format!("{:#}", e)))?
            .ok_or_else(|| failure(format!("not found by the {} resolver", resolver.name())))?;

        if !root.is_dir() {
            return Err(failure(format!(
                "root {} is not a directory",
                root.display()
            )));
        }

        tracing::debug!("{} -> {}", dep, root.display());
        resolved.insert(dep, root)?;
    }

    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn prefix_with_all(tmp: &TempDir) -> PathBuf {
        let prefix = tmp.path().join("deps");
        for dep in DependencySet::required().iter() {
            std::fs::create_dir_all(prefix.join(format!("{}-{}", dep.name(), dep.version())))
                .unwrap();
        }
        prefix
    }

    #[test]
    fn test_prefix_resolver_finds_all() {
        let tmp = TempDir::new().unwrap();
        let prefix = prefix_with_all(&tmp);

        let resolved = resolve(&DependencySet::required(), &PrefixResolver::new(&prefix)).unwrap();
        assert_eq!(resolved.len(), 6);
        assert_eq!(resolved.root("zlib"), Some(prefix.join("zlib-1.3.1").as_path()));
    }

    #[test]
    fn test_prefix_resolver_nested_layout() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir_all(tmp.path().join("openssl/3.3.1")).unwrap();

        let set = DependencySet::required();
        let root = PrefixResolver::new(tmp.path())
            .locate(set.get("openssl").unwrap())
            .unwrap();
        assert_eq!(root, Some(tmp.path().join("openssl/3.3.1")));
    }

    #[test]
    fn test_prefix_resolver_ignores_other_versions() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir_all(tmp.path().join("zlib-1.3.0")).unwrap();

        let set = DependencySet::required();
        let root = PrefixResolver::new(tmp.path())
            .locate(set.get("zlib").unwrap())
            .unwrap();
        assert_eq!(root, None);
    }

    #[test]
    fn test_first_missing_dependency_aborts() {
        let tmp = TempDir::new().unwrap();
        let prefix = prefix_with_all(&tmp);
        std::fs::remove_dir(prefix.join("libyaml-0.2.5")).unwrap();

        let err = resolve(&DependencySet::required(), &PrefixResolver::new(&prefix)).unwrap_err();
        match err {
            PackageError::ResolveFailure { name, version, .. } => {
                assert_eq!(name, "libyaml");
                assert_eq!(version, "0.2.5");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_root_must_be_directory() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("zlib.txt");
        std::fs::write(&file, "not a dir").unwrap();

        let mut set_resolver = StaticResolver::new();
        for dep in DependencySet::required().iter() {
            set_resolver = set_resolver.with_root(dep.name(), tmp.path());
        }
        let set_resolver = set_resolver.with_root("zlib", &file);

        let err = resolve(&DependencySet::required(), &set_resolver).unwrap_err();
        assert!(err.to_string().contains("zlib/1.3.1"));
        assert!(err.to_string().contains("not a directory"));
    }

    #[test]
    fn test_chain_prefers_explicit_roots() {
        let tmp = TempDir::new().unwrap();
        let prefix = prefix_with_all(&tmp);
        let custom = tmp.path().join("custom-zlib");
        std::fs::create_dir_all(&custom).unwrap();

        let chain = ChainResolver::new()
            .push(StaticResolver::new().with_root("zlib", &custom))
            .push(PrefixResolver::new(&prefix));

        let resolved = resolve(&DependencySet::required(), &chain).unwrap();
        assert_eq!(resolved.root("zlib"), Some(custom.as_path()));
        assert_eq!(
            resolved.root("snappy"),
            Some(prefix.join("snappy-1.2.1").as_path())
        );
    }
}
