//! SDK descriptors: per-platform dependency tables.
//!
//! An [`SdkDescriptor`] maps each supported [`Platform`] to the
//! [`PlatformRules`] describing where that platform's headers, libraries and
//! runtime binaries live relative to the SDK's module directory. Adding a
//! platform is a table entry, not a new branch.

use std::collections::BTreeMap;
use std::fmt;

use linkplan_platform::Platform;
use serde::{Deserialize, Serialize};

/// Base location a [`PathRef`] is joined under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Anchor {
    /// `<module_root>/<subdir>/<path>`.
    #[default]
    Module,
    /// `<engine_root>/<plugin_dir>/<subdir>/<path>`, the SDK's install
    /// location inside the engine. Falls back to the module root when no
    /// engine root is known.
    EnginePlugin,
    /// `<module_root relative to engine_root>/<path>`. No platform subdir.
    ModuleFromEngine,
    /// The path is used verbatim, e.g. a DLL name resolved by the loader.
    Bare,
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Anchor::Module => "module",
            Anchor::EnginePlugin => "engine-plugin",
            Anchor::ModuleFromEngine => "module-from-engine",
            Anchor::Bare => "bare",
        })
    }
}

/// A `/`-separated relative path together with the base it resolves under.
///
/// In descriptor files a plain string is shorthand for a module-anchored path:
/// `"include"` is the same as `{ anchor = "module", path = "include" }`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "PathRefRepr", into = "PathRefRepr")]
pub struct PathRef {
    pub anchor: Anchor,
    pub path: String,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum PathRefRepr {
    Short(String),
    Full {
        #[serde(default)]
        anchor: Anchor,
        path: String,
    },
}

impl From<PathRefRepr> for PathRef {
    fn from(repr: PathRefRepr) -> Self {
        match repr {
            PathRefRepr::Short(path) => PathRef::module(path),
            PathRefRepr::Full { anchor, path } => PathRef { anchor, path },
        }
    }
}

impl From<PathRef> for PathRefRepr {
    fn from(path_ref: PathRef) -> Self {
        match path_ref.anchor {
            Anchor::Module => PathRefRepr::Short(path_ref.path),
            anchor => PathRefRepr::Full {
                anchor,
                path: path_ref.path,
            },
        }
    }
}

impl PathRef {
    pub fn module(path: impl Into<String>) -> Self {
        Self {
            anchor: Anchor::Module,
            path: path.into(),
        }
    }

    pub fn engine_plugin(path: impl Into<String>) -> Self {
        Self {
            anchor: Anchor::EnginePlugin,
            path: path.into(),
        }
    }

    pub fn module_from_engine(path: impl Into<String>) -> Self {
        Self {
            anchor: Anchor::ModuleFromEngine,
            path: path.into(),
        }
    }

    pub fn bare(name: impl Into<String>) -> Self {
        Self {
            anchor: Anchor::Bare,
            path: name.into(),
        }
    }

    /// Non-empty path segments.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.path.split('/').filter(|s| !s.is_empty())
    }
}

/// How a runtime file is packaged when staged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StagingCategory {
    /// Loose file outside the packed content archive.
    #[default]
    NonUfs,
    /// Packed into the content archive.
    Ufs,
    /// Debug-only file outside the archive.
    DebugNonUfs,
    /// System file outside the archive, never remapped.
    SystemNonUfs,
}

/// A runtime file to copy into the packaged build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct StageRule {
    /// Where the file is read from.
    pub source: PathRef,
    /// Where it is staged; defaults to the source location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<PathRef>,
    #[serde(default)]
    pub category: StagingCategory,
}

/// A name/value pair recorded in the build receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptRule {
    pub name: String,
    pub value: PathRef,
}

/// Everything one platform needs to link and package the SDK.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PlatformRules {
    /// Platform directory under the module root (e.g. `Windows`, `NX`).
    pub subdir: String,
    /// Header search directories.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub include_dirs: Vec<PathRef>,
    /// Static or import libraries passed to the linker.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub libraries: Vec<PathRef>,
    /// Dynamic libraries whose binding is deferred to first use.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub delay_load: Vec<PathRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub runtime: Vec<StageRule>,
    /// System libraries linked by name.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub system_libraries: Vec<String>,
    /// OS frameworks (Apple platforms only).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub frameworks: Vec<String>,
    /// Engine modules the SDK module depends on.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub module_dependencies: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub receipt_properties: Vec<ReceiptRule>,
}

impl PlatformRules {
    /// Empty rules rooted at `subdir`.
    pub fn new(subdir: impl Into<String>) -> Self {
        Self {
            subdir: subdir.into(),
            include_dirs: Vec::new(),
            libraries: Vec::new(),
            delay_load: Vec::new(),
            runtime: Vec::new(),
            system_libraries: Vec::new(),
            frameworks: Vec::new(),
            module_dependencies: Vec::new(),
            receipt_properties: Vec::new(),
        }
    }

    pub fn include(mut self, path: impl Into<String>) -> Self {
        self.include_dirs.push(PathRef::module(path));
        self
    }

    pub fn library(mut self, path: impl Into<String>) -> Self {
        self.libraries.push(PathRef::module(path));
        self
    }

    pub fn delay_load(mut self, path: PathRef) -> Self {
        self.delay_load.push(path);
        self
    }

    /// Stage `source` at its own location.
    pub fn stage(mut self, source: PathRef, category: StagingCategory) -> Self {
        self.runtime.push(StageRule {
            source,
            destination: None,
            category,
        });
        self
    }

    pub fn stage_to(mut self, source: PathRef, destination: PathRef, category: StagingCategory) -> Self {
        self.runtime.push(StageRule {
            source,
            destination: Some(destination),
            category,
        });
        self
    }

    pub fn system_library(mut self, name: impl Into<String>) -> Self {
        self.system_libraries.push(name.into());
        self
    }

    pub fn framework(mut self, name: impl Into<String>) -> Self {
        self.frameworks.push(name.into());
        self
    }

    pub fn module_dependency(mut self, name: impl Into<String>) -> Self {
        self.module_dependencies.push(name.into());
        self
    }

    pub fn receipt(mut self, name: impl Into<String>, value: PathRef) -> Self {
        self.receipt_properties.push(ReceiptRule {
            name: name.into(),
            value,
        });
        self
    }

    /// Every path reference in these rules, in field order.
    pub fn path_refs(&self) -> impl Iterator<Item = &PathRef> {
        let staged = self
            .runtime
            .iter()
            .flat_map(|r| std::iter::once(&r.source).chain(r.destination.as_ref()));
        self.include_dirs
            .iter()
            .chain(&self.libraries)
            .chain(&self.delay_load)
            .chain(staged)
            .chain(self.receipt_properties.iter().map(|r| &r.value))
    }

    /// Whether anything is linked: a library or a delay-loaded binary.
    pub fn has_library_reference(&self) -> bool {
        !self.libraries.is_empty() || !self.delay_load.is_empty()
    }
}

/// A native SDK and its per-platform dependency table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SdkDescriptor {
    /// SDK name (e.g., "VivoxCoreLibrary").
    pub name: String,
    /// SDK release this table describes.
    pub version: semver::Version,
    /// SDK location under the engine root, used by engine-plugin anchors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugin_dir: Option<String>,
    /// The lookup table. Platforms without an entry contribute nothing.
    #[serde(default)]
    pub platforms: BTreeMap<Platform, PlatformRules>,
}

impl SdkDescriptor {
    /// A descriptor with no platform entries.
    pub fn new(name: impl Into<String>, version: semver::Version) -> Self {
        Self {
            name: name.into(),
            version,
            plugin_dir: None,
            platforms: BTreeMap::new(),
        }
    }

    pub fn with_plugin_dir(mut self, dir: impl Into<String>) -> Self {
        self.plugin_dir = Some(dir.into());
        self
    }

    /// Add or replace the rules for one platform.
    pub fn with_platform(mut self, platform: Platform, rules: PlatformRules) -> Self {
        self.platforms.insert(platform, rules);
        self
    }

    pub fn rules(&self, platform: Platform) -> Option<&PlatformRules> {
        self.platforms.get(&platform)
    }

    pub fn supports(&self, platform: Platform) -> bool {
        self.platforms.contains_key(&platform)
    }

    /// Platforms with an entry, in key order.
    pub fn supported_platforms(&self) -> impl Iterator<Item = Platform> + '_ {
        self.platforms.keys().copied()
    }
}
