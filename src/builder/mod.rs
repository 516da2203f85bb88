//! Native build wiring.
//!
//! This module turns resolved dependencies into `configure` arguments and
//! drives the autotools configure/compile/install steps.

pub mod autotools;
pub mod configure;
pub mod features;
pub mod toolchain;

pub use autotools::{BuildDriver, Installer};
pub use configure::{ConfigureArgs, ConfigureInvocation, ToolchainConfigurer, ROOT_FLAGS};
pub use features::{FeatureFlag, FeatureSet};
pub use toolchain::{detect_toolchain, validate, DetectedToolchain, Toolchain};
