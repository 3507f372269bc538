//! Target platform and build-variant identifiers.

use std::fmt;
use std::str::FromStr;

/// A host platform the orchestrator knows how to build for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Platform {
    /// 64-bit Windows.
    Win64,
    /// macOS.
    Mac,
    /// Linux.
    Linux,
}

/// Raised when a platform name or the running OS has no layout entry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported platform: {0}")]
pub struct UnsupportedPlatform(pub String);

impl Platform {
    /// All supported platforms, in table order.
    pub const ALL: [Platform; 3] = [Platform::Win64, Platform::Mac, Platform::Linux];

    /// Detects the platform of the running process.
    pub fn current() -> Result<Self, UnsupportedPlatform> {
        Self::from_os(std::env::consts::OS)
    }

    /// Maps a Rust `target_os` name to a platform.
    pub fn from_os(os: &str) -> Result<Self, UnsupportedPlatform> {
        match os {
            "windows" => Ok(Platform::Win64),
            "macos" => Ok(Platform::Mac),
            "linux" => Ok(Platform::Linux),
            other => Err(UnsupportedPlatform(other.to_string())),
        }
    }

    /// The platform name as the host build tool spells it.
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Win64 => "Win64",
            Platform::Mac => "Mac",
            Platform::Linux => "Linux",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = UnsupportedPlatform;

    /// Accepts host spellings (`Win64`, `Mac`, `Linux`) case-insensitively,
    /// plus the OS aliases `windows` and `macos`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "win64" | "windows" => Ok(Platform::Win64),
            "mac" | "macos" => Ok(Platform::Mac),
            "linux" => Ok(Platform::Linux),
            _ => Err(UnsupportedPlatform(s.to_string())),
        }
    }
}

/// Host build configuration (the "variant" axis of the layout table).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BuildVariant {
    /// Optimized editor build (the host's default).
    #[default]
    Development,
    /// Unoptimized build with debug symbols.
    Debug,
}

/// Raised when a variant name is not one of the supported configurations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown build variant '{0}' (expected Development or Debug)")]
pub struct UnknownVariant(pub String);

impl BuildVariant {
    /// The variant name as the host build tool spells it.
    pub fn as_str(self) -> &'static str {
        match self {
            BuildVariant::Development => "Development",
            BuildVariant::Debug => "Debug",
        }
    }
}

impl fmt::Display for BuildVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuildVariant {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "development" => Ok(BuildVariant::Development),
            "debug" => Ok(BuildVariant::Debug),
            _ => Err(UnknownVariant(s.to_string())),
        }
    }
}

/// Where extracted binaries are staged for import.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Staging {
    /// Mirror the source layout under `build/lib/` in the project root.
    #[default]
    OutOfTree,
    /// Place each binary next to its source file.
    InSource,
}
