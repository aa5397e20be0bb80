//! Named collection of SDK descriptors.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::builtin;
use crate::descriptor::SdkDescriptor;
use crate::error::{Result, SdkError};
use crate::inputs::ResolvedBuildInputs;
use crate::parse::{discover_descriptors, has_errors, load_descriptor_toml, validate_descriptor};
use crate::resolve::ResolveContext;

/// SDK descriptors keyed by name.
#[derive(Debug, Clone, Default)]
pub struct SdkRegistry {
    descriptors: BTreeMap<String, SdkDescriptor>,
}

impl SdkRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in descriptors.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.insert(builtin::vivox_core());
        registry
    }

    /// Register a descriptor, returning any previous one with the same name.
    pub fn insert(&mut self, descriptor: SdkDescriptor) -> Option<SdkDescriptor> {
        self.descriptors.insert(descriptor.name.clone(), descriptor)
    }

    pub fn get(&self, name: &str) -> Option<&SdkDescriptor> {
        self.descriptors.get(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.descriptors.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Load every `.sdk.toml` file in `dir`.
    ///
    /// Warnings are logged; a descriptor with validation errors, or two files
    /// declaring the same SDK name, abort the load before anything is
    /// registered. A loaded descriptor replacing an existing entry is logged.
    /// Returns the number of descriptors registered.
    pub fn load_dir(&mut self, dir: &Path) -> Result<usize> {
        let mut loaded = Vec::new();
        let mut sources: BTreeMap<String, PathBuf> = BTreeMap::new();
        for (file_name, path) in discover_descriptors(dir)? {
            let descriptor = load_descriptor_toml(&path)?;
            if let Some(first) = sources.get(&descriptor.name) {
                return Err(SdkError::Validation {
                    detail: format!(
                        "SDK '{}' is declared by both {} and {}",
                        descriptor.name,
                        first.display(),
                        path.display()
                    ),
                });
            }
            if file_name != descriptor.name {
                debug!(sdk = %descriptor.name, file = %file_name, "descriptor name differs from file name");
            }
            if let Err(issues) = validate_descriptor(&descriptor) {
                if has_errors(&issues) {
                    let detail = issues
                        .iter()
                        .map(|i| format!("{}: {}", i.severity, i.message))
                        .collect::<Vec<_>>()
                        .join("; ");
                    return Err(SdkError::Validation {
                        detail: format!("{}: {detail}", path.display()),
                    });
                }
                for issue in &issues {
                    warn!(sdk = %descriptor.name, file = %file_name, "{}", issue.message);
                }
            }
            sources.insert(descriptor.name.clone(), path);
            loaded.push(descriptor);
        }

        let count = loaded.len();
        for descriptor in loaded {
            info!(sdk = %descriptor.name, version = %descriptor.version, "registered SDK descriptor");
            if let Some(previous) = self.insert(descriptor) {
                warn!(
                    sdk = %previous.name,
                    version = %previous.version,
                    "replaced existing SDK descriptor"
                );
            }
        }
        Ok(count)
    }

    /// Resolve the named SDK.
    ///
    /// Fails only when `name` is not registered; an unsupported platform
    /// still yields empty inputs.
    pub fn resolve(&self, name: &str, ctx: &ResolveContext) -> Result<ResolvedBuildInputs> {
        let descriptor = self.get(name).ok_or_else(|| SdkError::UnknownSdk {
            name: name.to_string(),
        })?;
        Ok(descriptor.resolve(ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::descriptor_to_toml;
    use linkplan_platform::Platform;

    #[test]
    fn builtins_include_vivox() {
        let registry = SdkRegistry::with_builtins();
        assert_eq!(registry.names().collect::<Vec<_>>(), vec![builtin::VIVOX_CORE]);
        assert!(!registry.is_empty());
    }

    #[test]
    fn resolve_known_and_unknown() {
        let registry = SdkRegistry::with_builtins();
        let ctx = ResolveContext::new(Platform::Switch, "/sdk");
        let inputs = registry.resolve(builtin::VIVOX_CORE, &ctx).unwrap();
        assert_eq!(inputs.system_libraries, vec!["curl", "z"]);

        let err = registry.resolve("Steamworks", &ctx).unwrap_err();
        assert!(matches!(err, SdkError::UnknownSdk { .. }));
    }

    #[test]
    fn unsupported_platform_is_not_an_error() {
        let registry = SdkRegistry::with_builtins();
        let ctx = ResolveContext::new(Platform::Linux, "/sdk");
        assert!(registry.resolve(builtin::VIVOX_CORE, &ctx).unwrap().is_empty());
    }

    #[test]
    fn insert_replaces_by_name() {
        let mut registry = SdkRegistry::with_builtins();
        let replacement = SdkDescriptor::new(builtin::VIVOX_CORE, semver::Version::new(5, 8, 0));
        let previous = registry.insert(replacement).unwrap();
        assert_eq!(previous.version, semver::Version::new(5, 7, 0));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn load_dir_registers_descriptors() {
        let dir = tempfile::tempdir().unwrap();
        let mut vivox = builtin::vivox_core();
        vivox.name = "VivoxCustom".into();
        std::fs::write(
            dir.path().join("vivox-custom.sdk.toml"),
            descriptor_to_toml(&vivox).unwrap(),
        )
        .unwrap();

        let mut registry = SdkRegistry::with_builtins();
        assert_eq!(registry.load_dir(dir.path()).unwrap(), 1);
        assert_eq!(registry.len(), 2);
        assert!(registry.get("VivoxCustom").is_some());
    }

    #[test]
    fn load_dir_rejects_duplicate_names() {
        let dir = tempfile::tempdir().unwrap();
        let body = r#"
name = "shared"
version = "1.0.0"

[platforms.Linux]
subdir = "Linux"
include-dirs = ["include"]
libraries = ["lib/libshared.a"]
"#;
        std::fs::write(dir.path().join("first.sdk.toml"), body).unwrap();
        std::fs::write(dir.path().join("second.sdk.toml"), body).unwrap();

        let mut registry = SdkRegistry::new();
        let err = registry.load_dir(dir.path()).unwrap_err();
        match err {
            SdkError::Validation { detail } => {
                assert!(detail.contains("shared"));
                assert!(detail.contains("first.sdk.toml"));
                assert!(detail.contains("second.sdk.toml"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
        assert!(registry.is_empty());
    }

    #[test]
    fn load_dir_replaces_builtin_with_same_name() {
        let dir = tempfile::tempdir().unwrap();
        let mut vivox = builtin::vivox_core();
        vivox.version = semver::Version::new(5, 8, 0);
        std::fs::write(
            dir.path().join("vivox.sdk.toml"),
            descriptor_to_toml(&vivox).unwrap(),
        )
        .unwrap();

        let mut registry = SdkRegistry::with_builtins();
        assert_eq!(registry.load_dir(dir.path()).unwrap(), 1);
        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.get(builtin::VIVOX_CORE).unwrap().version,
            semver::Version::new(5, 8, 0)
        );
    }

    #[test]
    fn load_dir_rejects_invalid_descriptor() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("broken.sdk.toml"),
            r#"
name = "broken"
version = "1.0.0"

[platforms.Linux]
subdir = ""
"#,
        )
        .unwrap();

        let mut registry = SdkRegistry::new();
        let err = registry.load_dir(dir.path()).unwrap_err();
        assert!(matches!(err, SdkError::Validation { .. }));
        assert!(registry.is_empty());
    }

    #[test]
    fn load_dir_accepts_warnings() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("headers.sdk.toml"),
            r#"
name = "headers"
version = "0.3.0"

[platforms.Linux]
subdir = "Linux"
include-dirs = ["include"]
"#,
        )
        .unwrap();

        let mut registry = SdkRegistry::new();
        assert_eq!(registry.load_dir(dir.path()).unwrap(), 1);
        let ctx = ResolveContext::new(Platform::Linux, "/opt/headers");
        let inputs = registry.resolve("headers", &ctx).unwrap();
        assert_eq!(inputs.include_paths, vec![std::path::PathBuf::from("/opt/headers/Linux/include")]);
    }
}
