//! The logical libraries shipped by the package.

use std::fmt;

use serde::Serialize;

/// Header namespaces installed under `include/`, in search order.
pub const HEADER_NAMESPACES: [&str; 8] = [
    "GitUtility",
    "ThorSerialize",
    "ThorsCrypto",
    "ThorsIOUtil",
    "ThorsLogging",
    "ThorsMongo",
    "ThorsSocket",
    "ThorsStorage",
];

/// A named unit of functionality. The set is closed: adding or renaming a
/// library changes the published surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum LogicalLibrary {
    Serialize,
    Logging,
    Mongo,
    Socket,
    Storage,
}

impl LogicalLibrary {
    /// All libraries, in publication order.
    pub const ALL: [LogicalLibrary; 5] = [
        LogicalLibrary::Serialize,
        LogicalLibrary::Logging,
        LogicalLibrary::Mongo,
        LogicalLibrary::Socket,
        LogicalLibrary::Storage,
    ];

    /// Canonical base name, before any variant suffix.
    pub fn base_name(&self) -> &'static str {
        match self {
            LogicalLibrary::Serialize => "ThorSerialize",
            LogicalLibrary::Logging => "ThorsLogging",
            LogicalLibrary::Mongo => "ThorsMongo",
            LogicalLibrary::Socket => "ThorsSocket",
            LogicalLibrary::Storage => "ThorsStorage",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            LogicalLibrary::Serialize => "serialization core (JSON/BSON/YAML)",
            LogicalLibrary::Logging => "logging",
            LogicalLibrary::Mongo => "MongoDB wire-protocol layer",
            LogicalLibrary::Socket => "socket layer",
            LogicalLibrary::Storage => "storage layer",
        }
    }
}

impl fmt::Display for LogicalLibrary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.base_name())
    }
}
