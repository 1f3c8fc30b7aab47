//! Unified error handling for `llm-query`.
//!
//! One top-level [`LlmQueryError`] for the whole crate, with
//! domain-specific detail nested in [`ConfigError`] and
//! [`ProviderError`]. All messages carry the `[LLM Query]` prefix to
//! simplify attribution in mixed logs.

use reqwest::StatusCode;
use thiserror::Error;

/// Unified result alias for the crate.
pub type Result<T> = std::result::Result<T, LlmQueryError>;

/// Top-level error for the `llm-query` crate.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum LlmQueryError {
    /// Configuration/validation errors caught at construction.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Provider-level request failures.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Underlying HTTP transport error.
    #[error("[LLM Query] transport error: {0}")]
    HttpTransport(#[from] reqwest::Error),
}

/// Errors raised while validating a client configuration.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config names a different provider than the client being built.
    #[error("[LLM Query] config provider does not match client")]
    ProviderMismatch,

    /// Hosted providers require a credential.
    #[error("[LLM Query] missing API key for {0}")]
    MissingApiKey(&'static str),

    /// Endpoint must start with http:// or https://.
    #[error("[LLM Query] invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Model name was empty.
    #[error("[LLM Query] model name must not be empty")]
    EmptyModel,
}

/// Provider-side failure of one request.
#[derive(Debug, Error)]
#[error("[LLM Query] {provider} error: {kind}")]
pub struct ProviderError {
    /// Human-readable provider label ("gemini", "openai", "grok").
    pub provider: &'static str,
    pub kind: ProviderErrorKind,
}

impl ProviderError {
    pub fn new(provider: &'static str, kind: ProviderErrorKind) -> Self {
        Self { provider, kind }
    }
}

/// What exactly went wrong at the provider.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ProviderErrorKind {
    /// Upstream returned a non-successful HTTP status.
    #[error("HTTP {status} from {url}: {snippet}")]
    HttpStatus {
        status: StatusCode,
        url: String,
        /// Short trimmed snippet of the response body.
        snippet: String,
    },

    /// Response payload could not be decoded as expected.
    #[error("decode error: {0}")]
    Decode(String),

    /// The response carried no usable candidates/choices.
    #[error("empty completion")]
    EmptyCompletion,
}

/// Trim a response body down to a log-friendly snippet.
pub fn make_snippet(body: &str) -> String {
    const MAX: usize = 200;
    let trimmed = body.trim();
    if trimmed.len() <= MAX {
        trimmed.to_string()
    } else {
        let mut end = MAX;
        while end > 0 && !trimmed.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}…", &trimmed[..end])
    }
}
