//! The consumption manifest published for an installed package.
//!
//! Downstream build systems link against the package through this
//! description instead of re-deriving the variant naming rule. It is
//! computed from static knowledge plus the install root and never touches
//! the filesystem; see [`crate::ops::verify`] for the opt-in check against
//! the installed tree.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::core::library::{LogicalLibrary, HEADER_NAMESPACES};
use crate::core::variant::{artifact_name, ArtifactName, Variant};

/// Library subdirectory of the package root.
pub const LIB_DIR: &str = "lib";

/// Include subdirectory of the package root.
pub const INCLUDE_DIR: &str = "include";

/// What a completed package root offers to consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageManifest {
    root: PathBuf,
    libraries: Vec<ArtifactName>,
    lib_dirs: Vec<PathBuf>,
    include_root: PathBuf,
    include_dirs: Vec<PathBuf>,
}

impl PackageManifest {
    /// Describe the package installed at `root`.
    pub fn for_root(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref().to_path_buf();

        let libraries = Variant::PUBLISHED
            .iter()
            .flat_map(|variant| {
                LogicalLibrary::ALL
                    .iter()
                    .map(move |lib| artifact_name(*lib, variant.profile, variant.versioning))
            })
            .collect();

        let include_root = root.join(INCLUDE_DIR);
        let include_dirs = HEADER_NAMESPACES
            .iter()
            .map(|ns| include_root.join(ns))
            .collect();

        PackageManifest {
            lib_dirs: vec![root.join(LIB_DIR)],
            include_root,
            include_dirs,
            libraries,
            root,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Published artifact names, release/unversioned first.
    pub fn libraries(&self) -> &[ArtifactName] {
        &self.libraries
    }

    /// Library search directories.
    pub fn lib_dirs(&self) -> &[PathBuf] {
        &self.lib_dirs
    }

    /// Top-level include directory.
    pub fn include_root(&self) -> &Path {
        &self.include_root
    }

    /// Per-namespace include directories.
    pub fn include_dirs(&self) -> &[PathBuf] {
        &self.include_dirs
    }

    /// Full consumer include search path: the include root, then every
    /// namespace directory.
    pub fn search_include_dirs(&self) -> impl Iterator<Item = &Path> {
        std::iter::once(self.include_root.as_path())
            .chain(self.include_dirs.iter().map(PathBuf::as_path))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.libraries.iter().any(|lib| lib.as_str() == name)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    #[test]
    fn test_library_set() {
        let manifest = PackageManifest::for_root("/pkg");
        assert_eq!(manifest.libraries().len(), 20);

        let actual: BTreeSet<_> = manifest.libraries().iter().map(|l| l.as_str()).collect();
        let mut expected = BTreeSet::new();
        for base in [
            "ThorSerialize",
            "ThorsLogging",
            "ThorsMongo",
            "ThorsSocket",
            "ThorsStorage",
        ] {
            for suffix in ["", "D", "20", "20D"] {
                expected.insert(format!("{}{}", base, suffix));
            }
        }
        let expected: BTreeSet<_> = expected.iter().map(String::as_str).collect();

        assert_eq!(actual, expected);
    }

    #[test]
    fn test_publication_order() {
        let manifest = PackageManifest::for_root("/pkg");
        let libs = manifest.libraries();

        assert_eq!(libs[0], "ThorSerialize");
        assert_eq!(libs[4], "ThorsStorage");
        assert_eq!(libs[5], "ThorSerializeD");
        assert_eq!(libs[10], "ThorSerialize20");
        assert_eq!(libs[19], "ThorsStorage20D");
    }

    #[test]
    fn test_directories() {
        let manifest = PackageManifest::for_root("/pkg");

        assert_eq!(manifest.lib_dirs(), &[PathBuf::from("/pkg/lib")]);
        assert_eq!(manifest.include_root(), Path::new("/pkg/include"));
        assert_eq!(manifest.include_dirs().len(), 8);
        assert_eq!(
            manifest.include_dirs()[0],
            PathBuf::from("/pkg/include/GitUtility")
        );
        assert_eq!(
            manifest.include_dirs()[7],
            PathBuf::from("/pkg/include/ThorsStorage")
        );

        let search: Vec<_> = manifest.search_include_dirs().collect();
        assert_eq!(search.len(), 9);
        assert_eq!(search[0], Path::new("/pkg/include"));
    }

    #[test]
    fn test_manifest_is_static() {
        // Nothing exists under this root; the manifest is still complete.
        let manifest = PackageManifest::for_root("/does/not/exist");
        assert!(manifest.contains("ThorsSocket20"));
        assert!(!manifest.contains("ThorsSocket17"));
    }
}
