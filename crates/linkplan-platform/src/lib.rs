//! Build target platform identifiers for native SDK link planning.
//!
//! A [`Platform`] names the target a build orchestrator is producing a binary
//! for. It is the lookup key for every per-platform dependency table in
//! `linkplan-sdk`.

pub mod error;
pub mod platform;

pub use error::PlatformError;
pub use platform::{Platform, PlatformFamily};
