//! Per-platform native SDK dependency tables and their resolution into
//! build inputs.
//!
//! Given a target [`Platform`] and the directory an SDK module lives in, the
//! resolver produces the include paths, link inputs, delay-loaded libraries,
//! staged runtime files and system/framework link names a build orchestrator
//! needs to link that SDK.
//!
//! ## Modules
//!
//! - [`descriptor`] — SDK descriptors and per-platform rules
//! - [`builtin`] — The built-in Vivox core SDK table
//! - [`resolve`] — Resolution of a table entry into concrete paths
//! - [`inputs`] — The flattened, deduplicated result
//! - [`parse`] — `.sdk.toml` loading, validation, and discovery
//! - [`registry`] — Descriptors by name
//! - [`logging`] — Optional tracing subscriber setup

pub mod builtin;
pub mod descriptor;
pub mod error;
pub mod inputs;
pub mod logging;
pub mod parse;
pub mod registry;
pub mod resolve;

// Re-export key types for convenience
pub use descriptor::{Anchor, PathRef, PlatformRules, SdkDescriptor, StagingCategory};
pub use error::SdkError;
pub use inputs::{ReceiptProperty, ResolvedBuildInputs, StagedFile};
pub use linkplan_platform::{Platform, PlatformFamily};
pub use registry::SdkRegistry;
pub use resolve::{resolve, resolve_all, ResolveContext};
