//! C++ language standards.
//!
//! The packaged suite is written against C++20, so the toolchain check
//! compares everything it learns about the compiler against
//! [`CppStandard::MINIMUM`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// C++ standard version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CppStandard {
    /// C++11
    #[serde(rename = "11", alias = "c++11", alias = "cpp11")]
    Cpp11,
    /// C++14
    #[serde(rename = "14", alias = "c++14", alias = "cpp14")]
    Cpp14,
    /// C++17
    #[serde(rename = "17", alias = "c++17", alias = "cpp17")]
    Cpp17,
    /// C++20
    #[serde(rename = "20", alias = "c++20", alias = "cpp20")]
    Cpp20,
    /// C++23
    #[serde(rename = "23", alias = "c++23", alias = "cpp23")]
    Cpp23,
}

impl CppStandard {
    /// Lowest standard the packaged libraries compile with.
    pub const MINIMUM: CppStandard = CppStandard::Cpp20;

    /// Two-digit generation number (e.g. `20`).
    pub fn generation(&self) -> u8 {
        match self {
            CppStandard::Cpp11 => 11,
            CppStandard::Cpp14 => 14,
            CppStandard::Cpp17 => 17,
            CppStandard::Cpp20 => 20,
            CppStandard::Cpp23 => 23,
        }
    }

    /// Get the standard as a compiler flag value (e.g., "c++20").
    pub fn as_flag_value(&self) -> &'static str {
        match self {
            CppStandard::Cpp11 => "c++11",
            CppStandard::Cpp14 => "c++14",
            CppStandard::Cpp17 => "c++17",
            CppStandard::Cpp20 => "c++20",
            CppStandard::Cpp23 => "c++23",
        }
    }
}

impl fmt::Display for CppStandard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C++{}", self.generation())
    }
}

impl std::str::FromStr for CppStandard {
    type Err = CppStandardParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "11" | "c++11" | "cpp11" | "gnu++11" => Ok(CppStandard::Cpp11),
            "14" | "c++14" | "cpp14" | "gnu++14" => Ok(CppStandard::Cpp14),
            "17" | "c++17" | "cpp17" | "gnu++17" => Ok(CppStandard::Cpp17),
            "20" | "c++20" | "cpp20" | "gnu++20" => Ok(CppStandard::Cpp20),
            "23" | "c++23" | "cpp23" | "gnu++23" => Ok(CppStandard::Cpp23),
            _ => Err(CppStandardParseError(s.to_string())),
        }
    }
}

/// Error returned when parsing an invalid C++ standard string.
#[derive(Debug, Clone)]
pub struct CppStandardParseError(pub String);

impl fmt::Display for CppStandardParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid C++ standard '{}', valid values: 11, 14, 17, 20, 23",
            self.0
        )
    }
}

impl std::error::Error for CppStandardParseError {}
