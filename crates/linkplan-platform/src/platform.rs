//! Target platform enumeration.
//!
//! Platforms serialize under the orchestrator's canonical names (`Win64`,
//! `PS4`, `IOS`, ...) so they can be used directly as table keys in
//! descriptor files. Parsing also accepts the common aliases.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PlatformError, Result};

/// A build target platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Platform {
    /// 64-bit Windows.
    Win64,
    /// 32-bit Windows.
    Win32,
    XboxOne,
    /// PlayStation 4.
    Ps4,
    /// macOS.
    Mac,
    Ios,
    TvOs,
    Android,
    /// Nintendo Switch (SDK directories use the `NX` code name).
    Switch,
    Linux,
    HoloLens,
}

/// Coarse grouping of platforms that share toolchains and link conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlatformFamily {
    Windows,
    Xbox,
    PlayStation,
    /// macOS, iOS and tvOS; the only family that links OS frameworks.
    Apple,
    Android,
    Nintendo,
    Linux,
}

impl Platform {
    /// Every known platform, in declaration order.
    pub const ALL: [Platform; 11] = [
        Platform::Win64,
        Platform::Win32,
        Platform::XboxOne,
        Platform::Ps4,
        Platform::Mac,
        Platform::Ios,
        Platform::TvOs,
        Platform::Android,
        Platform::Switch,
        Platform::Linux,
        Platform::HoloLens,
    ];

    /// Canonical name as used by the build orchestrator.
    pub fn name(self) -> &'static str {
        match self {
            Platform::Win64 => "Win64",
            Platform::Win32 => "Win32",
            Platform::XboxOne => "XboxOne",
            Platform::Ps4 => "PS4",
            Platform::Mac => "Mac",
            Platform::Ios => "IOS",
            Platform::TvOs => "TVOS",
            Platform::Android => "Android",
            Platform::Switch => "Switch",
            Platform::Linux => "Linux",
            Platform::HoloLens => "HoloLens",
        }
    }

    /// The family this platform belongs to.
    pub fn family(self) -> PlatformFamily {
        match self {
            Platform::Win64 | Platform::Win32 | Platform::HoloLens => PlatformFamily::Windows,
            Platform::XboxOne => PlatformFamily::Xbox,
            Platform::Ps4 => PlatformFamily::PlayStation,
            Platform::Mac | Platform::Ios | Platform::TvOs => PlatformFamily::Apple,
            Platform::Android => PlatformFamily::Android,
            Platform::Switch => PlatformFamily::Nintendo,
            Platform::Linux => PlatformFamily::Linux,
        }
    }

    /// Whether OS frameworks (rather than plain system libraries) can be linked.
    pub fn is_apple(self) -> bool {
        self.family() == PlatformFamily::Apple
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Platform {
    type Err = PlatformError;

    /// Parse a platform name, ignoring case and `-`/`_`/space separators.
    fn from_str(s: &str) -> Result<Self> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .flat_map(char::to_lowercase)
            .collect();

        let platform = match key.as_str() {
            "win64" | "windows" | "windowsx64" => Platform::Win64,
            "win32" | "windowsx86" => Platform::Win32,
            "xboxone" | "xb1" => Platform::XboxOne,
            "ps4" | "playstation4" => Platform::Ps4,
            "mac" | "macos" | "osx" => Platform::Mac,
            "ios" => Platform::Ios,
            "tvos" => Platform::TvOs,
            "android" => Platform::Android,
            "switch" | "nx" => Platform::Switch,
            "linux" => Platform::Linux,
            "hololens" => Platform::HoloLens,
            _ => {
                return Err(PlatformError::Unknown {
                    name: s.to_string(),
                })
            }
        };
        Ok(platform)
    }
}

impl TryFrom<String> for Platform {
    type Error = PlatformError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Platform> for String {
    fn from(platform: Platform) -> Self {
        platform.name().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_names_parse_back() {
        for platform in Platform::ALL {
            assert_eq!(platform.name().parse::<Platform>().unwrap(), platform);
        }
    }

    #[test]
    fn aliases() {
        assert_eq!("Windows-x64".parse::<Platform>().unwrap(), Platform::Win64);
        assert_eq!("xb1".parse::<Platform>().unwrap(), Platform::XboxOne);
        assert_eq!("PlayStation4".parse::<Platform>().unwrap(), Platform::Ps4);
        assert_eq!("macOS".parse::<Platform>().unwrap(), Platform::Mac);
        assert_eq!("NX".parse::<Platform>().unwrap(), Platform::Switch);
        assert_eq!("tv_os".parse::<Platform>().unwrap(), Platform::TvOs);
    }

    #[test]
    fn architecture_and_brand_names_are_not_platforms() {
        assert!("x64".parse::<Platform>().is_err());
        assert!("xbox".parse::<Platform>().is_err());
    }

    #[test]
    fn unknown_name_is_error() {
        let err = "Amiga".parse::<Platform>().unwrap_err();
        assert_eq!(
            err,
            PlatformError::Unknown {
                name: "Amiga".into()
            }
        );
        assert!(err.to_string().contains("Amiga"));
    }

    #[test]
    fn families() {
        assert_eq!(Platform::HoloLens.family(), PlatformFamily::Windows);
        assert!(Platform::Ios.is_apple());
        assert!(Platform::Mac.is_apple());
        assert!(!Platform::Android.is_apple());
        assert_eq!(Platform::Switch.family(), PlatformFamily::Nintendo);
        assert_eq!(Platform::Ps4.family(), PlatformFamily::PlayStation);
    }

    #[test]
    fn display_uses_canonical_name() {
        assert_eq!(Platform::Ps4.to_string(), "PS4");
        assert_eq!(Platform::Ios.to_string(), "IOS");
    }

    #[test]
    fn serde_uses_canonical_name() {
        let json = serde_json::to_string(&Platform::Ps4).unwrap();
        assert_eq!(json, "\"PS4\"");
        let parsed: Platform = serde_json::from_str("\"playstation4\"").unwrap();
        assert_eq!(parsed, Platform::Ps4);
        assert!(serde_json::from_str::<Platform>("\"Dreamcast\"").is_err());
    }
}
