//! Dependency requirements and their resolved install roots.
//!
//! A [`DependencySet`] is the declarative list of exact-version pins that
//! must be satisfied before configuration. Resolution turns it into
//! [`ResolvedDependencies`], which is the only thing the configurer reads.

use std::fmt;
use std::path::{Path, PathBuf};

use semver::{Comparator, Op, Version, VersionReq};

use crate::core::errors::PackageError;

/// Required third-party packages, in declaration order.
const REQUIREMENTS: &[(&str, (u64, u64, u64))] = &[
    ("bzip2", (1, 0, 8)),
    ("zlib", (1, 3, 1)),
    ("libyaml", (0, 2, 5)),
    ("snappy", (1, 2, 1)),
    ("openssl", (3, 3, 1)),
    ("magic_enum", (0, 9, 6)),
];

/// A dependency pinned to one exact version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    name: String,
    version: Version,
    resolved_root: Option<PathBuf>,
}

impl Dependency {
    /// Create an unresolved dependency.
    pub fn new(name: impl Into<String>, version: Version) -> Self {
        Dependency {
            name: name.into(),
            version,
            resolved_root: None,
        }
    }

    /// Get the package name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the pinned version.
    pub fn version(&self) -> &Version {
        &self.version
    }

    /// The pin as an exact (`=x.y.z`) requirement.
    pub fn version_req(&self) -> VersionReq {
        VersionReq {
            comparators: vec![Comparator {
                op: Op::Exact,
                major: self.version.major,
                minor: Some(self.version.minor),
                patch: Some(self.version.patch),
                pre: self.version.pre.clone(),
            }],
        }
    }

    /// Check if a candidate version satisfies the pin.
    pub fn matches_version(&self, version: &Version) -> bool {
        self.version_req().matches(version)
    }

    /// Install root, once resolved.
    pub fn resolved_root(&self) -> Option<&Path> {
        self.resolved_root.as_deref()
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved_root.is_some()
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.version)
    }
}

/// Ordered set of dependency requirements.
#[derive(Debug, Clone)]
pub struct DependencySet {
    deps: Vec<Dependency>,
}

impl DependencySet {
    /// The fixed requirement list of the package.
    pub fn required() -> Self {
        let deps = REQUIREMENTS
            .iter()
            .map(|&(name, (major, minor, patch))| {
                Dependency::new(name, Version::new(major, minor, patch))
            })
            .collect();

        DependencySet { deps }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Dependency> {
        self.deps.iter()
    }

    pub fn len(&self) -> usize {
        self.deps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deps.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Dependency> {
        self.deps.iter().find(|d| d.name == name)
    }
}

/// Dependencies whose install roots are known.
///
/// Entries keep insertion order and may include packages beyond the
/// required set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedDependencies {
    entries: Vec<Dependency>,
}

impl ResolvedDependencies {
    pub fn new() -> Self {
        ResolvedDependencies {
            entries: Vec::new(),
        }
    }

    /// Record the install root for `dep`.
    ///
    /// Empty roots are rejected so that an unresolved dependency can never
    /// be mistaken for a resolved one. A later insert for the same name
    /// replaces the earlier root.
    pub fn insert(&mut self, dep: &Dependency, root: PathBuf) -> Result<(), PackageError> {
        if root.as_os_str().is_empty() {
            return Err(PackageError::ResolveFailure {
                name: dep.name().to_string(),
                version: dep.version().to_string(),
                reason: "resolver returned an empty root".to_string(),
            });
        }

        let resolved = Dependency {
            name: dep.name.clone(),
            version: dep.version.clone(),
            resolved_root: Some(root),
        };

        match self.entries.iter_mut().find(|d| d.name == dep.name) {
            Some(existing) => *existing = resolved,
            None => self.entries.push(resolved),
        }
        Ok(())
    }

    /// Resolved root of `name`.
    pub fn root(&self, name: &str) -> Option<&Path> {
        self.entries
            .iter()
            .find(|d| d.name == name)
            .and_then(|d| d.resolved_root())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Dependency> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.root(name).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_set_order() {
        let set = DependencySet::required();
        let names: Vec<_> = set.iter().map(|d| d.name()).collect();
        assert_eq!(
            names,
            vec!["bzip2", "zlib", "libyaml", "snappy", "openssl", "magic_enum"]
        );
        assert!(set.iter().all(|d| !d.is_resolved()));
    }

    #[test]
    fn test_pins_are_exact() {
        let set = DependencySet::required();
        let zlib = set.get("zlib").unwrap();

        assert_eq!(zlib.to_string(), "zlib/1.3.1");
        assert_eq!(zlib.version_req().to_string(), "=1.3.1");
        assert!(zlib.matches_version(&Version::new(1, 3, 1)));
        assert!(!zlib.matches_version(&Version::new(1, 3, 2)));
        assert!(!zlib.matches_version(&Version::new(1, 4, 0)));
    }

    #[test]
    fn test_insert_rejects_empty_root() {
        let set = DependencySet::required();
        let mut resolved = ResolvedDependencies::new();

        let err = resolved
            .insert(set.get("snappy").unwrap(), PathBuf::new())
            .unwrap_err();
        assert!(matches!(err, PackageError::ResolveFailure { .. }));
        assert!(resolved.is_empty());
    }

    #[test]
    fn test_insert_replaces_existing_root() {
        let set = DependencySet::required();
        let zlib = set.get("zlib").unwrap();
        let mut resolved = ResolvedDependencies::new();

        resolved.insert(zlib, PathBuf::from("/a")).unwrap();
        resolved.insert(zlib, PathBuf::from("/b")).unwrap();

        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved.root("zlib"), Some(Path::new("/b")));
        assert!(resolved.iter().all(|d| d.is_resolved()));
    }
}
