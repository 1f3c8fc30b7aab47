//! Provider-agnostic query client.
//!
//! Enum dispatch over the per-provider services keeps the call path
//! monomorphic: no boxed futures, no trait objects. Callers build one
//! [`QueryClient`] from a [`QueryModelConfig`] and call
//! [`QueryClient::query`] per iteration.

use tracing::debug;

use crate::config::{QueryModelConfig, QueryOutcome, QueryProvider, QueryRequest};
use crate::error::Result;
use crate::services::gemini::GeminiService;
use crate::services::openai_compat::OpenAiCompatService;

/// One client per analysis run, dispatching to the configured provider.
#[derive(Debug)]
pub enum QueryClient {
    Gemini(GeminiService),
    OpenAiCompat(OpenAiCompatService),
}

impl QueryClient {
    /// Build the client appropriate for `cfg.provider`.
    ///
    /// # Errors
    /// Propagates constructor validation from the underlying service
    /// (provider mismatch, missing key, invalid endpoint, empty model).
    pub fn from_config(cfg: QueryModelConfig) -> Result<Self> {
        debug!(provider = cfg.provider.label(), model = %cfg.model, "building query client");
        match cfg.provider {
            QueryProvider::Gemini => Ok(Self::Gemini(GeminiService::new(cfg)?)),
            QueryProvider::OpenAi | QueryProvider::Grok => {
                Ok(Self::OpenAiCompat(OpenAiCompatService::new(cfg)?))
            }
        }
    }

    /// Send one prompt and return its completion.
    ///
    /// # Errors
    /// Returns the underlying service error for HTTP, decode and
    /// empty-completion failures.
    pub async fn query(&self, req: &QueryRequest) -> Result<QueryOutcome> {
        match self {
            Self::Gemini(svc) => svc.query(req).await,
            Self::OpenAiCompat(svc) => svc.query(req).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatches_grok_to_the_openai_compatible_service() {
        let cfg = QueryModelConfig::new(QueryProvider::Grok, "grok-3", Some("key".into()));
        let client = QueryClient::from_config(cfg).unwrap();
        assert!(matches!(client, QueryClient::OpenAiCompat(_)));
    }

    #[test]
    fn dispatches_gemini_to_its_own_service() {
        let cfg =
            QueryModelConfig::new(QueryProvider::Gemini, "gemini-2.0-flash", Some("key".into()));
        let client = QueryClient::from_config(cfg).unwrap();
        assert!(matches!(client, QueryClient::Gemini(_)));
    }
}
