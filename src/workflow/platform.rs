//! Target platform enumeration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::WorkflowError;

/// Target environment of the product being planned.
///
/// Chosen once by the vision step and fixed for the rest of the workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Platform {
    Web,
    MacosNative,
    IosNative,
    CrossPlatformDesktop,
    MobileCrossPlatform,
    Cli,
    Api,
    Tui,
}

impl Platform {
    /// All platforms in declaration order.
    pub const ALL: [Self; 8] = [
        Self::Web,
        Self::MacosNative,
        Self::IosNative,
        Self::CrossPlatformDesktop,
        Self::MobileCrossPlatform,
        Self::Cli,
        Self::Api,
        Self::Tui,
    ];

    /// Stable identifier used in config files and on the command line.
    pub fn id(self) -> &'static str {
        match self {
            Self::Web => "web",
            Self::MacosNative => "macos-native",
            Self::IosNative => "ios-native",
            Self::CrossPlatformDesktop => "cross-platform-desktop",
            Self::MobileCrossPlatform => "mobile-cross-platform",
            Self::Cli => "cli",
            Self::Api => "api",
            Self::Tui => "tui",
        }
    }

    /// Human-readable name.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Web => "web",
            Self::MacosNative => "macOS-native",
            Self::IosNative => "iOS-native",
            Self::CrossPlatformDesktop => "cross-platform-desktop",
            Self::MobileCrossPlatform => "mobile-cross-platform",
            Self::Cli => "CLI",
            Self::Api => "API",
            Self::Tui => "TUI",
        }
    }

    /// Whether the platform has a visual design surface (colors, typography, shell).
    pub fn is_visual(self) -> bool {
        !matches!(self, Self::Cli | Self::Api)
    }

    /// Identifiers of every platform.
    pub fn ids() -> Vec<&'static str> {
        Self::ALL.iter().map(|p| p.id()).collect()
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Platform {
    type Err = WorkflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['_', ' '], "-");
        let platform = match normalized.as_str() {
            "web" => Self::Web,
            "macos-native" | "macos" => Self::MacosNative,
            "ios-native" | "ios" => Self::IosNative,
            "cross-platform-desktop" | "desktop" => Self::CrossPlatformDesktop,
            "mobile-cross-platform" | "mobile" => Self::MobileCrossPlatform,
            "cli" => Self::Cli,
            "api" | "backend" | "api/backend" => Self::Api,
            "tui" => Self::Tui,
            _ => return Err(WorkflowError::UnknownPlatform { name: s.to_string() }),
        };
        Ok(platform)
    }
}
