//! Build variant axes and the artifact naming rule.
//!
//! Three independent axes decide what a built library is called:
//!
//! - [`Linkage`] is chosen by the `shared` build option and does not appear
//!   in the name.
//! - [`Profile`] adds a `D` suffix for debug builds.
//! - [`SymbolVersioning`] adds the ABI generation (`20`) for versioned
//!   symbol builds.
//!
//! The published library set is the cross product of the two naming axes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::library::LogicalLibrary;

/// ABI generation suffix for versioned symbol builds.
pub const ABI_SUFFIX: &str = "20";

/// Debug profile suffix.
pub const DEBUG_SUFFIX: &str = "D";

/// Library linkage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Linkage {
    Shared,
    Static,
}

impl Linkage {
    pub fn from_shared(shared: bool) -> Self {
        if shared {
            Linkage::Shared
        } else {
            Linkage::Static
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Linkage::Shared => "shared",
            Linkage::Static => "static",
        }
    }
}

/// Build profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    #[default]
    Release,
    Debug,
}

impl Profile {
    pub fn suffix(&self) -> &'static str {
        match self {
            Profile::Release => "",
            Profile::Debug => DEBUG_SUFFIX,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Profile::Release => "release",
            Profile::Debug => "debug",
        }
    }
}

impl std::str::FromStr for Profile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "release" => Ok(Profile::Release),
            "debug" => Ok(Profile::Debug),
            _ => Err(format!(
                "invalid build type '{}'; expected 'release' or 'debug'",
                s
            )),
        }
    }
}

/// Symbol naming of the built library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolVersioning {
    Unversioned,
    Versioned,
}

impl SymbolVersioning {
    pub fn suffix(&self) -> &'static str {
        match self {
            SymbolVersioning::Unversioned => "",
            SymbolVersioning::Versioned => ABI_SUFFIX,
        }
    }
}

/// One published (profile, versioning) combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Variant {
    pub profile: Profile,
    pub versioning: SymbolVersioning,
}

impl Variant {
    /// Every published combination, in publication order.
    pub const PUBLISHED: [Variant; 4] = [
        Variant {
            profile: Profile::Release,
            versioning: SymbolVersioning::Unversioned,
        },
        Variant {
            profile: Profile::Debug,
            versioning: SymbolVersioning::Unversioned,
        },
        Variant {
            profile: Profile::Release,
            versioning: SymbolVersioning::Versioned,
        },
        Variant {
            profile: Profile::Debug,
            versioning: SymbolVersioning::Versioned,
        },
    ];
}

/// A consumer-facing library name including variant suffixes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ArtifactName(String);

impl ArtifactName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArtifactName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<&str> for ArtifactName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Name a library variant: base, then ABI suffix, then debug suffix.
pub fn artifact_name(
    library: LogicalLibrary,
    profile: Profile,
    versioning: SymbolVersioning,
) -> ArtifactName {
    ArtifactName(format!(
        "{}{}{}",
        library.base_name(),
        versioning.suffix(),
        profile.suffix()
    ))
}
