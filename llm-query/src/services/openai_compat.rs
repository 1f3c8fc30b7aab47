//! Chat-completions client for OpenAI-compatible providers.
//!
//! Serves both OpenAI proper and Grok: the wire protocol is identical,
//! only endpoint, credential and label differ. Requests are
//! non-streaming single-turn completions:
//!
//! - POST {endpoint}/v1/chat/completions
//!
//! Search grounding is not part of this protocol; `search_mode` on the
//! request is ignored and the outcome never carries citations.

use std::time::{Duration, Instant};

use reqwest::header;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::config::{QueryModelConfig, QueryOutcome, QueryProvider, QueryRequest};
use crate::error::{
    ConfigError, LlmQueryError, ProviderError, ProviderErrorKind, make_snippet,
};

/// Thin client for OpenAI-compatible chat completion APIs.
#[derive(Debug)]
pub struct OpenAiCompatService {
    client: reqwest::Client,
    cfg: QueryModelConfig,
    url: String,
    label: &'static str,
}

impl OpenAiCompatService {
    /// Create a validated client for OpenAI or Grok.
    ///
    /// # Errors
    /// - [`ConfigError::ProviderMismatch`] when the config names Gemini
    /// - [`ConfigError::MissingApiKey`] when the key is absent
    /// - [`ConfigError::InvalidEndpoint`] for a non-http(s) endpoint
    /// - [`ConfigError::EmptyModel`] for a blank model name
    pub fn new(cfg: QueryModelConfig) -> Result<Self, LlmQueryError> {
        let label = match cfg.provider {
            QueryProvider::OpenAi => "openai",
            QueryProvider::Grok => "grok",
            QueryProvider::Gemini => return Err(ConfigError::ProviderMismatch.into()),
        };
        let api_key = cfg
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey(label))?;
        let endpoint = cfg.endpoint.trim();
        if endpoint.is_empty()
            || !(endpoint.starts_with("http://") || endpoint.starts_with("https://"))
        {
            return Err(ConfigError::InvalidEndpoint(cfg.endpoint.clone()).into());
        }
        if cfg.model.trim().is_empty() {
            return Err(ConfigError::EmptyModel.into());
        }

        let timeout = cfg
            .timeout_secs
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(60));

        let mut headers = header::HeaderMap::new();
        let mut auth =
            header::HeaderValue::from_str(&format!("Bearer {api_key}")).map_err(|e| {
                ProviderError::new(
                    label,
                    ProviderErrorKind::Decode(format!("invalid API key header: {e}")),
                )
            })?;
        auth.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, auth);
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        let url = format!("{}/v1/chat/completions", endpoint.trim_end_matches('/'));

        info!(
            provider = label,
            model = %cfg.model,
            endpoint = %cfg.endpoint,
            timeout_secs = cfg.timeout_secs.unwrap_or(60),
            "OpenAiCompatService initialized"
        );

        Ok(Self {
            client,
            cfg,
            url,
            label,
        })
    }

    /// Run one non-streaming chat completion.
    ///
    /// # Errors
    /// - [`ProviderErrorKind::HttpStatus`] for non-2xx responses
    /// - [`LlmQueryError::HttpTransport`] for network failures
    /// - [`ProviderErrorKind::Decode`] for unexpected payload shapes
    /// - [`ProviderErrorKind::EmptyCompletion`] when choices are empty
    ///   or the message content is blank
    pub async fn query(&self, req: &QueryRequest) -> Result<QueryOutcome, LlmQueryError> {
        let started = Instant::now();
        let body = ChatCompletionRequest {
            model: &self.cfg.model,
            messages: vec![ChatMessage {
                role: "user",
                content: &req.prompt,
            }],
            temperature: req.temperature,
            max_tokens: req.max_tokens,
        };

        debug!(
            provider = self.label,
            model = %self.cfg.model,
            prompt_len = req.prompt.len(),
            "POST {}", self.url
        );

        let resp = self.client.post(&self.url).json(&body).send().await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let url = self.url.clone();
            let text = resp.text().await.unwrap_or_default();
            let snippet = make_snippet(&text);

            error!(
                %status,
                %url,
                %snippet,
                provider = self.label,
                model = %self.cfg.model,
                latency_ms = started.elapsed().as_millis(),
                "chat completion returned non-success status"
            );

            return Err(ProviderError::new(
                self.label,
                ProviderErrorKind::HttpStatus {
                    status,
                    url,
                    snippet,
                },
            )
            .into());
        }

        let out: ChatCompletionResponse = resp.json().await.map_err(|e| {
            ProviderError::new(
                self.label,
                ProviderErrorKind::Decode(format!(
                    "serde error: {e}; expected `choices[0].message.content`"
                )),
            )
        })?;

        let latency_ms = started.elapsed().as_millis() as u64;
        let text = out
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();
        if text.trim().is_empty() {
            return Err(
                ProviderError::new(self.label, ProviderErrorKind::EmptyCompletion).into(),
            );
        }

        info!(
            provider = self.label,
            model = %self.cfg.model,
            latency_ms,
            "chat completion finished"
        );

        Ok(QueryOutcome {
            text,
            latency_ms,
            citations: Vec::new(),
        })
    }
}

/* ===========================================================================
HTTP payloads
======================================================================== */

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: MessageOut,
}

#[derive(Debug, Deserialize)]
struct MessageOut {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grok_gets_its_own_label_and_endpoint() {
        let cfg = QueryModelConfig::new(QueryProvider::Grok, "grok-3", Some("key".into()));
        let svc = OpenAiCompatService::new(cfg).unwrap();
        assert_eq!(svc.label, "grok");
        assert_eq!(svc.url, "https://api.x.ai/v1/chat/completions");
    }

    #[test]
    fn gemini_config_is_rejected() {
        let cfg = QueryModelConfig::new(QueryProvider::Gemini, "gemini-2.0-flash", Some("k".into()));
        assert!(matches!(
            OpenAiCompatService::new(cfg).unwrap_err(),
            LlmQueryError::Config(ConfigError::ProviderMismatch)
        ));
    }

    #[test]
    fn blank_model_is_rejected() {
        let mut cfg = QueryModelConfig::new(QueryProvider::OpenAi, "gpt-4o", Some("k".into()));
        cfg.model = "  ".into();
        assert!(matches!(
            OpenAiCompatService::new(cfg).unwrap_err(),
            LlmQueryError::Config(ConfigError::EmptyModel)
        ));
    }

    #[test]
    fn optional_knobs_are_omitted_from_the_body() {
        let body = ChatCompletionRequest {
            model: "gpt-4o",
            messages: vec![ChatMessage {
                role: "user",
                content: "hello",
            }],
            temperature: None,
            max_tokens: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("temperature").is_none());
        assert!(json.get("max_tokens").is_none());
        assert_eq!(json["messages"][0]["role"], "user");
    }
}
