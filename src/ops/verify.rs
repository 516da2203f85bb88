//! Strict-mode check of a [`PackageManifest`] against the installed tree.
//!
//! The manifest itself is static. This pass is opt-in and reports every
//! published artifact or include directory that the install step did not
//! produce.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use glob::{glob, Pattern};

use crate::core::errors::PackageError;
use crate::core::manifest::PackageManifest;
use crate::core::variant::Linkage;

/// File extensions a library of the given linkage may have.
fn library_extensions(linkage: Linkage) -> &'static [&'static str] {
    match linkage {
        Linkage::Shared => &["so", "dylib", "dll"],
        Linkage::Static => &["a", "lib"],
    }
}

/// Check that every artifact and include directory exists.
pub fn verify_manifest(manifest: &PackageManifest, linkage: Linkage) -> Result<()> {
    let mut missing = Vec::new();

    for library in manifest.libraries() {
        let mut found = false;
        for dir in manifest.lib_dirs() {
            if library_present(dir, library.as_str(), linkage)? {
                found = true;
                break;
            }
        }
        if !found {
            missing.push(library.to_string());
        }
    }

    for dir in manifest.search_include_dirs() {
        if !dir.is_dir() {
            missing.push(dir.display().to_string());
        }
    }

    if missing.is_empty() {
        tracing::debug!("manifest verified against {}", manifest.root().display());
        Ok(())
    } else {
        Err(PackageError::ManifestDrift {
            root: manifest.root().to_path_buf(),
            missing,
        }
        .into())
    }
}

fn library_present(dir: &Path, name: &str, linkage: Linkage) -> Result<bool> {
    // The install prefix is literal; only the file name is a pattern.
    let dir = PathBuf::from(Pattern::escape(&dir.to_string_lossy()));

    for ext in library_extensions(linkage) {
        // `libfoo.so`, `libfoo.so.3.2.20`, `foo.lib`, ...
        let patterns = [
            dir.join(format!("lib{}.{}", name, ext)),
            dir.join(format!("lib{}.{}.*", name, ext)),
            dir.join(format!("lib{}.*.{}", name, ext)),
            dir.join(format!("{}.{}", name, ext)),
        ];

        for pattern in &patterns {
            let pattern = pattern.to_string_lossy();
            let mut matches = glob(&pattern)
                .with_context(|| format!("invalid glob pattern: {}", pattern))?;
            if matches.any(|entry| entry.is_ok()) {
                return Ok(true);
            }
        }
    }

    Ok(false)
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::core::library::HEADER_NAMESPACES;

    fn populate(root: &Path, ext: &str, skip: Option<&str>) {
        let manifest = PackageManifest::for_root(root);
        std::fs::create_dir_all(root.join("lib")).unwrap();
        for lib in manifest.libraries() {
            if Some(lib.as_str()) == skip {
                continue;
            }
            std::fs::write(root.join("lib").join(format!("lib{}.{}", lib, ext)), "").unwrap();
        }
        for ns in HEADER_NAMESPACES {
            std::fs::create_dir_all(root.join("include").join(ns)).unwrap();
        }
    }

    #[test]
    fn test_complete_install_passes() {
        let tmp = TempDir::new().unwrap();
        populate(tmp.path(), "so", None);

        let manifest = PackageManifest::for_root(tmp.path());
        verify_manifest(&manifest, Linkage::Shared).unwrap();
    }

    #[test]
    fn test_versioned_shared_object_counts() {
        let tmp = TempDir::new().unwrap();
        populate(tmp.path(), "so", Some("ThorsSocket"));
        std::fs::write(tmp.path().join("lib/libThorsSocket.so.3.2.20"), "").unwrap();

        let manifest = PackageManifest::for_root(tmp.path());
        verify_manifest(&manifest, Linkage::Shared).unwrap();
    }

    #[test]
    fn test_missing_artifact_is_drift() {
        let tmp = TempDir::new().unwrap();
        populate(tmp.path(), "so", Some("ThorsMongo20D"));
        std::fs::remove_dir(tmp.path().join("include/ThorsCrypto")).unwrap();

        let manifest = PackageManifest::for_root(tmp.path());
        let err = verify_manifest(&manifest, Linkage::Shared).unwrap_err();

        match err.downcast_ref::<PackageError>() {
            Some(PackageError::ManifestDrift { missing, .. }) => {
                assert_eq!(missing.len(), 2);
                assert_eq!(missing[0], "ThorsMongo20D");
                assert!(missing[1].ends_with("ThorsCrypto"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_root_with_glob_metacharacters() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("pkg[1]*?");
        populate(&root, "so", None);

        let manifest = PackageManifest::for_root(&root);
        verify_manifest(&manifest, Linkage::Shared).unwrap();

        std::fs::remove_file(root.join("lib/libThorsLogging20.so")).unwrap();
        let err = verify_manifest(&manifest, Linkage::Shared).unwrap_err();
        match err.downcast_ref::<PackageError>() {
            Some(PackageError::ManifestDrift { missing, .. }) => {
                assert_eq!(missing, &vec!["ThorsLogging20".to_string()]);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_linkage_decides_extension() {
        let tmp = TempDir::new().unwrap();
        populate(tmp.path(), "a", None);

        let manifest = PackageManifest::for_root(tmp.path());
        verify_manifest(&manifest, Linkage::Static).unwrap();
        assert!(verify_manifest(&manifest, Linkage::Shared).is_err());
    }
}
