//! High-level operations.

pub mod package;
pub mod resolve;
pub mod source;
pub mod verify;

pub use package::{PackageOptions, PackageResult, Pipeline, Plan};
pub use resolve::{resolve, ChainResolver, PrefixResolver, Resolver, StaticResolver};
pub use source::{GitReference, SourceCheckout};
pub use verify::verify_manifest;
