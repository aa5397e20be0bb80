//! Tracing subscriber setup for orchestrators embedding the resolver.
//!
//! Library code only emits `tracing` events; nothing is printed unless the
//! host installs a subscriber, either its own or the one built here.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::{Result, SdkError};

/// Filter directives used when `RUST_LOG` is unset.
pub fn default_directives(verbose: bool) -> String {
    let level = if verbose { "debug" } else { "info" };
    format!("linkplan_sdk={level},linkplan_platform={level}")
}

/// Install a compact stderr subscriber.
///
/// `RUST_LOG` overrides the default filter. Fails if a global subscriber is
/// already set.
pub fn init(verbose: bool) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directives(verbose)))
        .map_err(|e| SdkError::Logging {
            detail: e.to_string(),
        })?;

    let layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(layer)
        .try_init()
        .map_err(|e| SdkError::Logging {
            detail: e.to_string(),
        })
}
