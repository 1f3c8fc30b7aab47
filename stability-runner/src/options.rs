//! Run options with environment-driven defaults.

use text_insight::AnalysisConfig;
use tracing::debug;

use crate::errors::{ConfigError, Result};

/// Hard ceiling on the iteration count; higher requests clamp.
pub const MAX_ITERATIONS: u32 = 10;

/// Default pause between iterations, in milliseconds.
const DEFAULT_DELAY_MS: u64 = 500;

/// Options for one single-model stability run.
///
/// Plain data; validation happens in [`RunOptions::validated`] so a
/// caller can build options incrementally and fail only at run time.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// The fixed prompt sent on every iteration.
    pub prompt: String,
    /// Model label recorded in the result metadata.
    pub model: String,
    /// Requested iteration count; 0 is rejected, > 10 clamps to 10.
    pub iterations: u32,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    /// Ask for search-grounded answers where the provider supports it.
    pub search_mode: bool,
    /// Brand whose mentions the run tracks, when any.
    pub brand: Option<String>,
    /// Pause between iterations (never after the last one).
    pub delay_ms: u64,
    /// Lexical analysis overrides (stop words, synonyms, sentiment).
    pub analysis: AnalysisConfig,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            prompt: String::new(),
            model: String::new(),
            iterations: 5,
            temperature: None,
            max_tokens: None,
            search_mode: false,
            brand: None,
            delay_ms: DEFAULT_DELAY_MS,
            analysis: AnalysisConfig::default(),
        }
    }
}

impl RunOptions {
    /// Validate and clamp into a runnable copy.
    ///
    /// # Errors
    /// [`ConfigError::ZeroIterations`] for an iteration count of 0,
    /// [`ConfigError::EmptyPrompt`] for a blank prompt.
    pub fn validated(&self) -> Result<Self> {
        if self.iterations == 0 {
            return Err(ConfigError::ZeroIterations.into());
        }
        if self.prompt.trim().is_empty() {
            return Err(ConfigError::EmptyPrompt.into());
        }

        let mut out = self.clone();
        if out.iterations > MAX_ITERATIONS {
            debug!(
                requested = out.iterations,
                clamped = MAX_ITERATIONS,
                "iteration count clamped"
            );
            out.iterations = MAX_ITERATIONS;
        }
        Ok(out)
    }

    /// Build options from `STABILITY_*` environment variables, with the
    /// same defaults as [`RunOptions::default`].
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            prompt: std::env::var("STABILITY_PROMPT").unwrap_or_default(),
            model: std::env::var("STABILITY_MODEL").unwrap_or_default(),
            iterations: parse_env("STABILITY_ITERATIONS", defaults.iterations),
            temperature: std::env::var("STABILITY_TEMPERATURE")
                .ok()
                .and_then(|s| s.parse().ok()),
            max_tokens: std::env::var("STABILITY_MAX_TOKENS")
                .ok()
                .and_then(|s| s.parse().ok()),
            search_mode: std::env::var("STABILITY_SEARCH_MODE")
                .map(|s| s == "true" || s == "1")
                .unwrap_or(false),
            brand: std::env::var("STABILITY_BRAND")
                .ok()
                .filter(|b| !b.trim().is_empty()),
            delay_ms: parse_env("STABILITY_DELAY_MS", defaults.delay_ms),
            analysis: AnalysisConfig {
                language: std::env::var("STABILITY_LANGUAGE").ok(),
                ..AnalysisConfig::default()
            },
        }
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::RunError;

    fn opts(iterations: u32) -> RunOptions {
        RunOptions {
            prompt: "What is the best CRM?".into(),
            model: "test-model".into(),
            iterations,
            ..RunOptions::default()
        }
    }

    #[test]
    fn zero_iterations_is_a_config_error() {
        assert!(matches!(
            opts(0).validated().unwrap_err(),
            RunError::Config(ConfigError::ZeroIterations)
        ));
    }

    #[test]
    fn oversized_iteration_count_clamps() {
        assert_eq!(opts(25).validated().unwrap().iterations, MAX_ITERATIONS);
        assert_eq!(opts(10).validated().unwrap().iterations, 10);
        assert_eq!(opts(3).validated().unwrap().iterations, 3);
    }

    #[test]
    fn blank_prompt_is_rejected() {
        let mut o = opts(5);
        o.prompt = "   ".into();
        assert!(matches!(
            o.validated().unwrap_err(),
            RunError::Config(ConfigError::EmptyPrompt)
        ));
    }
}
