//! TOML parsing, serialization, validation, and discovery for SDK descriptors.
//!
//! Descriptors are stored as `<name>.sdk.toml` files. A minimal file:
//!
//! ```toml
//! name = "VivoxCoreLibrary"
//! version = "5.7.0"
//!
//! [platforms.Switch]
//! subdir = "NX"
//! include-dirs = ["include"]
//! libraries = ["bin/libvivoxsdk.a"]
//! system-libraries = ["curl", "z"]
//! ```

use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;
use std::path::{Path, PathBuf};

use linkplan_platform::Platform;
use tracing::debug;

use crate::descriptor::{Anchor, PathRef, PlatformRules, SdkDescriptor};
use crate::error::{Result, SdkError};

/// File name suffix of descriptor files.
pub const DESCRIPTOR_SUFFIX: &str = ".sdk.toml";

/// How serious a validation issue is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        })
    }
}

/// A validation issue found in a descriptor.
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    pub severity: Severity,
    /// Human-readable description.
    pub message: String,
}

impl ValidationIssue {
    fn error(message: String) -> Self {
        Self {
            severity: Severity::Error,
            message,
        }
    }

    fn warning(message: String) -> Self {
        Self {
            severity: Severity::Warning,
            message,
        }
    }
}

/// Whether any issue in the list is an error.
pub fn has_errors(issues: &[ValidationIssue]) -> bool {
    issues.iter().any(|i| i.severity == Severity::Error)
}

/// Load a descriptor from a `.sdk.toml` file.
pub fn load_descriptor_toml(path: &Path) -> Result<SdkDescriptor> {
    if !path.exists() {
        return Err(SdkError::NotFound {
            path: path.to_path_buf(),
        });
    }
    debug!("loading SDK descriptor: {}", path.display());
    let content = std::fs::read_to_string(path)?;
    parse_descriptor_toml(&content)
}

/// Parse a descriptor from a TOML string.
pub fn parse_descriptor_toml(toml_str: &str) -> Result<SdkDescriptor> {
    let descriptor: SdkDescriptor = toml::from_str(toml_str)?;
    Ok(descriptor)
}

/// Serialize a descriptor to pretty TOML.
pub fn descriptor_to_toml(descriptor: &SdkDescriptor) -> Result<String> {
    Ok(toml::to_string_pretty(descriptor)?)
}

fn check_path(platform: Platform, field: &str, path: &PathRef, issues: &mut Vec<ValidationIssue>) {
    if path.path.is_empty() {
        issues.push(ValidationIssue::error(format!(
            "{platform}: empty path in {field}"
        )));
        return;
    }
    if path.path.starts_with('/') || path.path.contains('\\') || path.path.contains(':') {
        issues.push(ValidationIssue::error(format!(
            "{platform}: {field} path '{}' must be a relative '/'-separated path",
            path.path
        )));
    }
    if path.segments().any(|s| s == "..") {
        issues.push(ValidationIssue::error(format!(
            "{platform}: {field} path '{}' escapes its anchor with '..'",
            path.path
        )));
    }
    if path.anchor == Anchor::Bare && path.segments().count() > 1 {
        issues.push(ValidationIssue::error(format!(
            "{platform}: bare {field} entry '{}' must be a single file name",
            path.path
        )));
    }
}

fn check_names(platform: Platform, field: &str, names: &[String], issues: &mut Vec<ValidationIssue>) {
    if names.iter().any(|n| n.trim().is_empty()) {
        issues.push(ValidationIssue::error(format!(
            "{platform}: empty name in {field}"
        )));
    }
    check_duplicates(platform, field, names, issues);
}

fn check_duplicates<T: Hash + Eq>(
    platform: Platform,
    field: &str,
    items: &[T],
    issues: &mut Vec<ValidationIssue>,
) {
    let mut seen = HashSet::new();
    if !items.iter().all(|item| seen.insert(item)) {
        issues.push(ValidationIssue::warning(format!(
            "{platform}: duplicate entries in {field}"
        )));
    }
}

fn validate_rules(platform: Platform, rules: &PlatformRules, issues: &mut Vec<ValidationIssue>) {
    let subdir = rules.subdir.trim();
    if subdir.is_empty() {
        issues.push(ValidationIssue::error(format!("{platform}: subdir is empty")));
    } else if subdir.starts_with('/') || subdir.split('/').any(|s| s == "..") {
        issues.push(ValidationIssue::error(format!(
            "{platform}: subdir '{subdir}' must stay under the module root"
        )));
    }

    let paths = [
        ("include-dirs", &rules.include_dirs),
        ("libraries", &rules.libraries),
        ("delay-load", &rules.delay_load),
    ];
    for (field, list) in paths {
        for path in list {
            check_path(platform, field, path, issues);
        }
        check_duplicates(platform, field, list, issues);
    }
    for rule in &rules.runtime {
        check_path(platform, "runtime", &rule.source, issues);
        if let Some(dest) = &rule.destination {
            check_path(platform, "runtime", dest, issues);
        }
    }
    for receipt in &rules.receipt_properties {
        if receipt.name.trim().is_empty() {
            issues.push(ValidationIssue::error(format!(
                "{platform}: receipt property with empty name"
            )));
        }
        check_path(platform, "receipt-properties", &receipt.value, issues);
    }

    check_names(platform, "system-libraries", &rules.system_libraries, issues);
    check_names(platform, "frameworks", &rules.frameworks, issues);
    check_names(platform, "module-dependencies", &rules.module_dependencies, issues);

    if !rules.frameworks.is_empty() && !platform.is_apple() {
        issues.push(ValidationIssue::warning(format!(
            "{platform}: frameworks are only linked on Apple platforms"
        )));
    }
    if rules.include_dirs.is_empty() {
        issues.push(ValidationIssue::warning(format!(
            "{platform}: no include directories"
        )));
    }
    if !rules.has_library_reference() {
        issues.push(ValidationIssue::warning(format!(
            "{platform}: no libraries or delay-loaded binaries"
        )));
    }
}

/// Validate a descriptor for structural correctness.
///
/// Returns `Ok(())` if clean, or `Err(issues)` with every problem found.
/// Use [`has_errors`] to tell hard failures from warnings.
pub fn validate_descriptor(
    descriptor: &SdkDescriptor,
) -> std::result::Result<(), Vec<ValidationIssue>> {
    let mut issues = Vec::new();

    if descriptor.name.trim().is_empty() {
        issues.push(ValidationIssue::error("descriptor name is empty".into()));
    }
    if descriptor.platforms.is_empty() {
        issues.push(ValidationIssue::warning(
            "descriptor has no platform entries".into(),
        ));
    }
    let uses_plugin_dir = descriptor
        .platforms
        .values()
        .flat_map(PlatformRules::path_refs)
        .any(|p| p.anchor == Anchor::EnginePlugin);
    if uses_plugin_dir && descriptor.plugin_dir.is_none() {
        issues.push(ValidationIssue::warning(
            "engine-plugin paths are used but plugin-dir is not set".into(),
        ));
    }

    for (platform, rules) in &descriptor.platforms {
        validate_rules(*platform, rules, &mut issues);
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(issues)
    }
}

/// Discover all `.sdk.toml` files in `dir`.
///
/// Returns a list of (sdk_name, file_path) pairs sorted by name.
pub fn discover_descriptors(dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut found = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| n.strip_suffix(DESCRIPTOR_SUFFIX))
            .map(str::to_string);
        if let Some(name) = name {
            found.push((name, path));
        }
    }
    found.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::vivox_core;
    use crate::descriptor::StagingCategory;

    const SWITCH_ONLY: &str = r#"
name = "VivoxCoreLibrary"
version = "5.7.0"

[platforms.Switch]
subdir = "NX"
include-dirs = ["include"]
libraries = ["bin/libvivoxsdk.a"]
system-libraries = ["curl", "z"]
"#;

    #[test]
    fn parse_minimal_toml() {
        let sdk = parse_descriptor_toml(SWITCH_ONLY).unwrap();
        assert_eq!(sdk.name, "VivoxCoreLibrary");
        assert_eq!(sdk.version, semver::Version::new(5, 7, 0));
        let rules = sdk.rules(Platform::Switch).unwrap();
        assert_eq!(rules.subdir, "NX");
        assert_eq!(rules.libraries, vec![PathRef::module("bin/libvivoxsdk.a")]);
        assert_eq!(rules.system_libraries, vec!["curl", "z"]);
        assert!(validate_descriptor(&sdk).is_ok());
    }

    #[test]
    fn parse_platform_aliases_and_anchors() {
        let toml_str = r#"
name = "demo"
version = "1.2.3"
plugin-dir = "Plugins/Demo"

[platforms.macos]
subdir = "Mac"
include-dirs = ["include"]
delay-load = [{ anchor = "engine-plugin", path = "Release/libdemo.dylib" }]

[[platforms.macos.runtime]]
source = "Release/libdemo.dylib"
destination = { anchor = "engine-plugin", path = "Release/libdemo.dylib" }
category = "system-non-ufs"
"#;
        let sdk = parse_descriptor_toml(toml_str).unwrap();
        let rules = sdk.rules(Platform::Mac).unwrap();
        assert_eq!(rules.delay_load[0].anchor, Anchor::EnginePlugin);
        assert_eq!(rules.runtime[0].source, PathRef::module("Release/libdemo.dylib"));
        assert_eq!(rules.runtime[0].category, StagingCategory::SystemNonUfs);
        assert!(validate_descriptor(&sdk).is_ok());
    }

    #[test]
    fn parse_invalid_returns_error() {
        assert!(parse_descriptor_toml("this is not valid toml [[[").is_err());
    }

    #[test]
    fn parse_unknown_platform_returns_error() {
        let toml_str = r#"
name = "demo"
version = "1.0.0"

[platforms.Amiga]
subdir = "Amiga"
"#;
        assert!(parse_descriptor_toml(toml_str).is_err());
    }

    #[test]
    fn parse_bad_version_returns_error() {
        assert!(parse_descriptor_toml("name = \"demo\"\nversion = \"five\"\n").is_err());
    }

    #[test]
    fn builtin_round_trips_through_toml() {
        let original = vivox_core();
        let toml_str = descriptor_to_toml(&original).unwrap();
        let parsed = parse_descriptor_toml(&toml_str).unwrap();
        assert_eq!(original, parsed);
    }

    #[test]
    fn builtin_validates_clean() {
        assert!(validate_descriptor(&vivox_core()).is_ok());
    }

    #[test]
    fn validate_absolute_and_escaping_paths() {
        let sdk = vivox_core().with_platform(
            Platform::Linux,
            PlatformRules::new("Linux")
                .include("/usr/include")
                .library("../outside/lib.a"),
        );
        let issues = validate_descriptor(&sdk).unwrap_err();
        assert!(has_errors(&issues));
        assert!(issues.iter().any(|i| i.message.contains("relative")));
        assert!(issues.iter().any(|i| i.message.contains("'..'")));
    }

    #[test]
    fn validate_bare_entry_must_be_file_name() {
        let sdk = SdkDescriptor::new("demo", semver::Version::new(1, 0, 0)).with_platform(
            Platform::Win64,
            PlatformRules::new("Windows")
                .include("include")
                .delay_load(PathRef::bare("bin/demo.dll")),
        );
        let issues = validate_descriptor(&sdk).unwrap_err();
        assert!(issues.iter().any(|i| i.message.contains("single file name")));
    }

    #[test]
    fn validate_frameworks_off_apple_is_warning() {
        let sdk = SdkDescriptor::new("demo", semver::Version::new(1, 0, 0)).with_platform(
            Platform::Android,
            PlatformRules::new("Android")
                .include("include")
                .library("lib/libdemo.so")
                .framework("AVFoundation"),
        );
        let issues = validate_descriptor(&sdk).unwrap_err();
        assert!(!has_errors(&issues));
        assert!(issues
            .iter()
            .any(|i| i.severity == Severity::Warning && i.message.contains("Apple")));
    }

    #[test]
    fn validate_empty_subdir_and_name() {
        let sdk = SdkDescriptor::new("", semver::Version::new(1, 0, 0))
            .with_platform(Platform::Switch, PlatformRules::new("").include("include").library("a.a"));
        let issues = validate_descriptor(&sdk).unwrap_err();
        assert!(issues.iter().any(|i| i.message.contains("name is empty")));
        assert!(issues.iter().any(|i| i.message.contains("subdir is empty")));
    }

    #[test]
    fn validate_duplicates_warn() {
        let sdk = SdkDescriptor::new("demo", semver::Version::new(1, 0, 0)).with_platform(
            Platform::Switch,
            PlatformRules::new("NX")
                .include("include")
                .library("bin/a.a")
                .library("bin/a.a")
                .system_library("z")
                .system_library("z"),
        );
        let issues = validate_descriptor(&sdk).unwrap_err();
        assert!(!has_errors(&issues));
        assert_eq!(
            issues.iter().filter(|i| i.message.contains("duplicate")).count(),
            2
        );
    }

    #[test]
    fn validate_missing_library_reference_warns() {
        let sdk = SdkDescriptor::new("headers-only", semver::Version::new(1, 0, 0))
            .with_platform(Platform::Linux, PlatformRules::new("Linux").include("include"));
        let issues = validate_descriptor(&sdk).unwrap_err();
        assert!(issues.iter().any(|i| i.message.contains("no libraries")));
    }

    #[test]
    fn discover_descriptors_finds_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("zlib.sdk.toml"), SWITCH_ONLY).unwrap();
        std::fs::write(dir.path().join("vivox.sdk.toml"), SWITCH_ONLY).unwrap();
        // Non-descriptor files are ignored
        std::fs::write(dir.path().join("notes.toml"), "ignore me").unwrap();

        let found = discover_descriptors(dir.path()).unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].0, "vivox");
        assert_eq!(found[1].0, "zlib");
    }

    #[test]
    fn discover_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let found = discover_descriptors(&dir.path().join("absent")).unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn load_not_found() {
        let result = load_descriptor_toml(Path::new("/nonexistent/path.sdk.toml"));
        assert!(matches!(result.unwrap_err(), SdkError::NotFound { .. }));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vivox.sdk.toml");
        std::fs::write(&path, descriptor_to_toml(&vivox_core()).unwrap()).unwrap();
        let sdk = load_descriptor_toml(&path).unwrap();
        assert_eq!(sdk, vivox_core());
    }
}
