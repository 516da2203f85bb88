//! thorpack - packaging pipeline for the ThorsSerializer / ThorsMongo suite
//!
//! Resolves the pinned third-party dependencies, checks that the compiler
//! supports C++20, drives the autotools configure / make / install cycle
//! and publishes a static manifest of the installed libraries.

pub mod builder;
pub mod core;
pub mod ops;
pub mod util;

/// Test doubles for the process and toolchain seams.
#[cfg(test)]
pub mod test_support;

pub use core::{
    dependency::{Dependency, DependencySet, ResolvedDependencies},
    errors::PackageError,
    manifest::PackageManifest,
    recipe::PackageRecipe,
};

pub use ops::package::Pipeline;
pub use util::context::GlobalContext;
