//! Core data structures for thorpack.
//!
//! This module contains the packaging model:
//! - Dependency pins and resolved roots
//! - Logical libraries and variant axes
//! - The consumption manifest
//! - Pipeline errors

pub mod dependency;
pub mod errors;
pub mod language;
pub mod library;
pub mod manifest;
pub mod recipe;
pub mod variant;

pub use dependency::{Dependency, DependencySet, ResolvedDependencies};
pub use errors::{PackageError, Stage};
pub use language::CppStandard;
pub use library::LogicalLibrary;
pub use manifest::PackageManifest;
pub use recipe::{BuildOptions, PackageRecipe};
pub use variant::{artifact_name, ArtifactName, Linkage, Profile, SymbolVersioning, Variant};
