//! Static feature toggles passed to `configure`.

/// One `--enable-<key>` / `--disable-<key>` toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureFlag {
    key: &'static str,
    enabled: bool,
}

impl FeatureFlag {
    pub const fn enable(key: &'static str) -> Self {
        FeatureFlag { key, enabled: true }
    }

    pub const fn disable(key: &'static str) -> Self {
        FeatureFlag {
            key,
            enabled: false,
        }
    }

    pub fn key(&self) -> &str {
        self.key
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Render as a configure argument.
    pub fn to_arg(&self) -> String {
        if self.enabled {
            format!("--enable-{}", self.key)
        } else {
            format!("--disable-{}", self.key)
        }
    }
}

/// The package's feature toggles, in declaration order.
const PACKAGE_FEATURES: [FeatureFlag; 5] = [
    FeatureFlag::enable("test-with-conan"),
    FeatureFlag::enable("dark-mode"),
    FeatureFlag::disable("test-with-mongo-query"),
    FeatureFlag::disable("Mongo-Service"),
    FeatureFlag::disable("vera"),
];

/// Immutable, ordered set of feature toggles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureSet {
    flags: Vec<FeatureFlag>,
}

impl FeatureSet {
    /// The toggles this package is always configured with.
    pub fn package_defaults() -> Self {
        FeatureSet {
            flags: PACKAGE_FEATURES.to_vec(),
        }
    }

    pub fn from_flags(flags: impl IntoIterator<Item = FeatureFlag>) -> Self {
        FeatureSet {
            flags: flags.into_iter().collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &FeatureFlag> {
        self.flags.iter()
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_toggles() {
        let args: Vec<_> = FeatureSet::package_defaults()
            .iter()
            .map(FeatureFlag::to_arg)
            .collect();

        assert_eq!(
            args,
            vec![
                "--enable-test-with-conan",
                "--enable-dark-mode",
                "--disable-test-with-mongo-query",
                "--disable-Mongo-Service",
                "--disable-vera",
            ]
        );
    }
}
