//! Client configuration and request/response value types.

use serde::{Deserialize, Serialize};

/// Supported provider families.
///
/// Grok speaks the OpenAI-compatible chat protocol, so it shares a
/// client implementation with [`QueryProvider::OpenAi`] and differs
/// only in endpoint and label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryProvider {
    Gemini,
    OpenAi,
    Grok,
}

impl QueryProvider {
    /// Stable lowercase label used in logs and error messages.
    pub fn label(self) -> &'static str {
        match self {
            QueryProvider::Gemini => "gemini",
            QueryProvider::OpenAi => "openai",
            QueryProvider::Grok => "grok",
        }
    }

    /// Default public API endpoint for the provider.
    pub fn default_endpoint(self) -> &'static str {
        match self {
            QueryProvider::Gemini => "https://generativelanguage.googleapis.com",
            QueryProvider::OpenAi => "https://api.openai.com",
            QueryProvider::Grok => "https://api.x.ai",
        }
    }
}

/// Configuration for one provider client.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryModelConfig {
    pub provider: QueryProvider,
    /// Model identifier (e.g. `"gemini-2.0-flash"`, `"gpt-4o"`).
    pub model: String,
    /// API base URL; `QueryProvider::default_endpoint` when not
    /// overridden.
    pub endpoint: String,
    /// Credential; required for all three hosted providers.
    pub api_key: Option<String>,
    /// Optional request timeout in seconds (default 60).
    pub timeout_secs: Option<u64>,
}

impl QueryModelConfig {
    /// Config with the provider's default endpoint.
    pub fn new(provider: QueryProvider, model: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            endpoint: provider.default_endpoint().to_string(),
            api_key,
            timeout_secs: None,
        }
    }
}

/// One query of the fixed prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    pub prompt: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    /// Ask the provider for search-grounded answers with citations
    /// (honored by Gemini; ignored by chat-only providers).
    pub search_mode: bool,
}

/// One source citation from a search-grounded answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Citation {
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub snippet: String,
}

/// Successful query result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryOutcome {
    pub text: String,
    pub latency_ms: u64,
    #[serde(default)]
    pub citations: Vec<Citation>,
}
