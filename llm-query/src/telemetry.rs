//! Log filtering helpers scoped to this crate.
//!
//! The root binary owns the global subscriber; this module only hands
//! it a filter that keeps provider request/latency logging visible
//! without raising the volume for the rest of the workspace.

use std::str::FromStr;

use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::Directive;

/// Target prefix of every event emitted by this crate.
pub const TARGET_PREFIX: &str = "llm_query";

/// Level directive for this crate only, e.g. `llm_query=debug`.
pub fn level_directive(level: Level) -> Directive {
    let directive = format!("{TARGET_PREFIX}={}", level.as_str().to_lowercase());
    // Prefix and level are both fixed vocabularies; this cannot fail.
    Directive::from_str(&directive).expect("valid level directive")
}

/// `EnvFilter` from `RUST_LOG` (falling back to `default`), with the
/// per-crate directive applied on top.
///
/// `env_filter_with_level("info", Level::DEBUG)` shows INFO globally
/// and DEBUG for this crate's query logging.
pub fn env_filter_with_level(default: &str, level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default))
        .add_directive(level_directive(level))
}
