//! Package recipe: identity, source location and build options.

use semver::Version;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::core::variant::{Linkage, Profile};

/// Upstream repository of the packaged sources.
pub const SOURCE_URL: &str = "https://github.com/Loki-Astari/ThorsSerializer.git";

/// Static description of the package being built.
#[derive(Debug, Clone, Serialize)]
pub struct PackageRecipe {
    pub name: &'static str,
    pub version: Version,
    pub license: &'static str,
    pub author: &'static str,
    pub homepage: &'static str,
    pub description: &'static str,
    pub topics: &'static [&'static str],
    /// Host settings the binary package depends on.
    pub settings: &'static [&'static str],
    pub default_options: BuildOptions,
}

impl PackageRecipe {
    pub fn thors_mongo() -> Self {
        PackageRecipe {
            name: "thors-mongo",
            version: Version::new(3, 2, 20),
            license: "GPL-3.0",
            author: "Martin York Loki.Astari@gmail.com",
            homepage: "https://github.com/Loki-Astari/ThorsSerializer",
            description: "Serialization Library including C++ Mongo layer",
            topics: &["C++", "Serialization", "Mongo", "JSON", "BSON", "YAML"],
            settings: &["os", "compiler", "build_type", "arch"],
            default_options: BuildOptions::default(),
        }
    }

    pub fn source_url(&self) -> anyhow::Result<Url> {
        Ok(Url::parse(SOURCE_URL)?)
    }

    /// `name/version` reference.
    pub fn reference(&self) -> String {
        format!("{}/{}", self.name, self.version)
    }
}

/// Options that change how the native build is configured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildOptions {
    /// Build shared libraries instead of static archives.
    pub shared: bool,
    /// Position-independent code.
    pub fpic: bool,
    pub profile: Profile,
    /// Parallel make jobs (`None` lets make decide).
    pub jobs: Option<usize>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        BuildOptions {
            shared: true,
            fpic: true,
            profile: Profile::Release,
            jobs: None,
        }
    }
}

impl BuildOptions {
    pub fn linkage(&self) -> Linkage {
        Linkage::from_shared(self.shared)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let recipe = PackageRecipe::thors_mongo();
        assert!(recipe.default_options.shared);
        assert!(recipe.default_options.fpic);
        assert_eq!(recipe.default_options.linkage(), Linkage::Shared);
        assert_eq!(recipe.reference(), "thors-mongo/3.2.20");
    }

    #[test]
    fn test_source_url() {
        let url = PackageRecipe::thors_mongo().source_url().unwrap();
        assert_eq!(url.host_str(), Some("github.com"));
    }
}
