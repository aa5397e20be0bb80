//! Resolution of a descriptor's table entry into concrete build inputs.
//!
//! Resolution is a pure function of the descriptor and the [`ResolveContext`]:
//! it only joins path strings and never touches the filesystem. Whether the
//! referenced files exist is the orchestrator's concern.

use std::path::{Component, Path, PathBuf};

use linkplan_platform::Platform;
use tracing::{debug, trace};

use crate::builtin;
use crate::descriptor::{Anchor, PathRef, PlatformRules, SdkDescriptor};
use crate::error::Result;
use crate::inputs::{ReceiptProperty, ResolvedBuildInputs, StagedFile};

/// Inputs to a single resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveContext {
    /// The platform being built.
    pub platform: Platform,
    /// Directory holding the SDK's per-platform subdirectories.
    pub module_root: PathBuf,
    /// Engine root, for engine-plugin and module-from-engine anchors.
    pub engine_root: Option<PathBuf>,
}

impl ResolveContext {
    pub fn new(platform: Platform, module_root: impl Into<PathBuf>) -> Self {
        Self {
            platform,
            module_root: module_root.into(),
            engine_root: None,
        }
    }

    /// Build a context from the orchestrator's platform name.
    pub fn from_name(platform: &str, module_root: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self::new(platform.parse()?, module_root))
    }

    pub fn with_engine_root(mut self, engine_root: impl Into<PathBuf>) -> Self {
        self.engine_root = Some(engine_root.into());
        self
    }
}

/// Base directories for each anchor, computed once per resolution.
struct Bases {
    module: PathBuf,
    engine_plugin: PathBuf,
    module_from_engine: PathBuf,
}

impl Bases {
    fn new(ctx: &ResolveContext, plugin_dir: Option<&str>) -> Self {
        let (engine_plugin, module_from_engine) = match &ctx.engine_root {
            Some(engine) => {
                let mut plugin = engine.clone();
                if let Some(dir) = plugin_dir {
                    push_segments(&mut plugin, dir);
                }
                (plugin, relative_to(&ctx.module_root, engine))
            }
            None => (ctx.module_root.clone(), ctx.module_root.clone()),
        };
        Self {
            module: ctx.module_root.clone(),
            engine_plugin,
            module_from_engine,
        }
    }

    fn join(&self, subdir: &str, path: &PathRef) -> PathBuf {
        let mut out = match path.anchor {
            Anchor::Bare => PathBuf::new(),
            Anchor::Module => self.module.clone(),
            Anchor::EnginePlugin => self.engine_plugin.clone(),
            Anchor::ModuleFromEngine => self.module_from_engine.clone(),
        };
        if matches!(path.anchor, Anchor::Module | Anchor::EnginePlugin) {
            push_segments(&mut out, subdir);
        }
        push_segments(&mut out, &path.path);
        out
    }
}

fn push_segments(buf: &mut PathBuf, rel: &str) {
    for segment in rel.split('/').filter(|s| !s.is_empty()) {
        buf.push(segment);
    }
}

fn is_rooted(parts: &[Component<'_>]) -> bool {
    matches!(parts.first(), Some(Component::RootDir | Component::Prefix(_)))
}

/// Lexically collapse `.` and `..` components. A `..` at the root is dropped;
/// leading `..` in a relative path is kept.
fn normalize(path: &Path) -> Vec<Component<'_>> {
    let mut parts: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last().copied() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }
    parts
}

/// Lexical path of `path` relative to `base`, after collapsing `..` in both.
/// Returns `path` unchanged when the two do not share a root.
fn relative_to(path: &Path, base: &Path) -> PathBuf {
    let path_parts = normalize(path);
    let base_parts = normalize(base);

    if is_rooted(&path_parts) != is_rooted(&base_parts) {
        return path.to_path_buf();
    }

    let common = path_parts
        .iter()
        .zip(&base_parts)
        .take_while(|(a, b)| a == b)
        .count();
    if is_rooted(&path_parts) && common == 0 {
        return path.to_path_buf();
    }

    let mut out = PathBuf::new();
    for _ in common..base_parts.len() {
        out.push("..");
    }
    for part in &path_parts[common..] {
        out.push(part.as_os_str());
    }
    out
}

fn apply_rules(rules: &PlatformRules, bases: &Bases) -> ResolvedBuildInputs {
    let subdir = rules.subdir.as_str();
    let mut out = ResolvedBuildInputs {
        include_paths: rules.include_dirs.iter().map(|p| bases.join(subdir, p)).collect(),
        library_paths: rules.libraries.iter().map(|p| bases.join(subdir, p)).collect(),
        delay_load: rules.delay_load.iter().map(|p| bases.join(subdir, p)).collect(),
        runtime_files: rules
            .runtime
            .iter()
            .map(|rule| {
                let source = bases.join(subdir, &rule.source);
                let destination = match &rule.destination {
                    Some(dest) => bases.join(subdir, dest),
                    None => source.clone(),
                };
                StagedFile {
                    source,
                    destination,
                    category: rule.category,
                }
            })
            .collect(),
        system_libraries: rules.system_libraries.clone(),
        frameworks: rules.frameworks.clone(),
        module_dependencies: rules.module_dependencies.clone(),
        receipt_properties: rules
            .receipt_properties
            .iter()
            .map(|r| ReceiptProperty {
                name: r.name.clone(),
                value: bases.join(subdir, &r.value),
            })
            .collect(),
    };
    out.dedup();
    out
}

impl SdkDescriptor {
    /// Resolve this SDK for `ctx.platform`.
    ///
    /// A platform without a table entry yields empty inputs; there is no
    /// fallback to another platform's paths.
    pub fn resolve(&self, ctx: &ResolveContext) -> ResolvedBuildInputs {
        let Some(rules) = self.rules(ctx.platform) else {
            debug!(
                sdk = %self.name,
                platform = %ctx.platform,
                "no dependency rules for platform, contributing nothing"
            );
            return ResolvedBuildInputs::default();
        };

        let bases = Bases::new(ctx, self.plugin_dir.as_deref());
        let inputs = apply_rules(rules, &bases);
        trace!(
            sdk = %self.name,
            platform = %ctx.platform,
            includes = inputs.include_paths.len(),
            libraries = inputs.library_reference_count(),
            staged = inputs.runtime_files.len(),
            "resolved build inputs"
        );
        inputs
    }
}

/// Resolve the built-in Vivox SDK for `platform` with its module at `module_root`.
pub fn resolve(platform: Platform, module_root: impl Into<PathBuf>) -> ResolvedBuildInputs {
    builtin::vivox_core().resolve(&ResolveContext::new(platform, module_root))
}

/// Resolve several SDKs for one platform and merge the results in order.
pub fn resolve_all<'a>(
    ctx: &ResolveContext,
    descriptors: impl IntoIterator<Item = &'a SdkDescriptor>,
) -> ResolvedBuildInputs {
    let mut merged = ResolvedBuildInputs::default();
    for descriptor in descriptors {
        merged.merge(descriptor.resolve(ctx));
    }
    merged
}
