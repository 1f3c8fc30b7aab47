//! Gemini `generateContent` client with optional search grounding.
//!
//! Endpoint derived from `QueryModelConfig::endpoint`:
//! - POST {endpoint}/v1beta/models/{model}:generateContent
//!
//! Constructor validation:
//! - `cfg.provider` must be `QueryProvider::Gemini`
//! - `cfg.api_key` must be present
//! - `cfg.endpoint` must start with http:// or https://
//!
//! When `search_mode` is set on a request, the Google Search tool is
//! attached and grounding chunks come back as [`Citation`]s.

use std::time::{Duration, Instant};

use reqwest::header;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::config::{Citation, QueryModelConfig, QueryOutcome, QueryProvider, QueryRequest};
use crate::error::{
    ConfigError, LlmQueryError, ProviderError, ProviderErrorKind, make_snippet,
};

/// Thin client for the Gemini API.
#[derive(Debug)]
pub struct GeminiService {
    client: reqwest::Client,
    cfg: QueryModelConfig,
    url: String,
}

impl GeminiService {
    /// Create a validated Gemini client.
    ///
    /// # Errors
    /// - [`ConfigError::ProviderMismatch`] for a non-Gemini config
    /// - [`ConfigError::MissingApiKey`] when the key is absent
    /// - [`ConfigError::InvalidEndpoint`] for a non-http(s) endpoint
    /// - [`ConfigError::EmptyModel`] for a blank model name
    pub fn new(cfg: QueryModelConfig) -> Result<Self, LlmQueryError> {
        if cfg.provider != QueryProvider::Gemini {
            return Err(ConfigError::ProviderMismatch.into());
        }
        let api_key = cfg
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey("gemini"))?;
        validate_endpoint(&cfg.endpoint)?;
        if cfg.model.trim().is_empty() {
            return Err(ConfigError::EmptyModel.into());
        }

        let timeout = cfg
            .timeout_secs
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(60));

        let mut headers = header::HeaderMap::new();
        headers.insert(
            "x-goog-api-key",
            header::HeaderValue::from_str(&api_key).map_err(|e| {
                ProviderError::new("gemini", ProviderErrorKind::Decode(format!(
                    "invalid API key header: {e}"
                )))
            })?,
        );
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            cfg.endpoint.trim_end_matches('/'),
            cfg.model
        );

        info!(
            model = %cfg.model,
            endpoint = %cfg.endpoint,
            timeout_secs = cfg.timeout_secs.unwrap_or(60),
            "GeminiService initialized"
        );

        Ok(Self { client, cfg, url })
    }

    /// Run one non-streaming `generateContent` request.
    ///
    /// # Errors
    /// - [`ProviderErrorKind::HttpStatus`] for non-2xx responses
    /// - [`LlmQueryError::HttpTransport`] for network failures
    /// - [`ProviderErrorKind::Decode`] for unexpected payload shapes
    /// - [`ProviderErrorKind::EmptyCompletion`] when no candidate text
    ///   came back
    pub async fn query(&self, req: &QueryRequest) -> Result<QueryOutcome, LlmQueryError> {
        let started = Instant::now();
        let body = GenerateContentRequest::from_request(req);

        debug!(
            model = %self.cfg.model,
            prompt_len = req.prompt.len(),
            search_mode = req.search_mode,
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
                model = %self.cfg.model,
                latency_ms = started.elapsed().as_millis(),
                "Gemini generateContent returned non-success status"
            );

            return Err(ProviderError::new(
                "gemini",
                ProviderErrorKind::HttpStatus {
                    status,
                    url,
                    snippet,
                },
            )
            .into());
        }

        let out: GenerateContentResponse = resp.json().await.map_err(|e| {
            ProviderError::new(
                "gemini",
                ProviderErrorKind::Decode(format!(
                    "serde error: {e}; expected `candidates[0].content.parts[].text`"
                )),
            )
        })?;

        let latency_ms = started.elapsed().as_millis() as u64;
        let candidate = out
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::new("gemini", ProviderErrorKind::EmptyCompletion))?;

        let text = candidate
            .content
            .map(|c| {
                c.parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();
        if text.is_empty() {
            return Err(ProviderError::new("gemini", ProviderErrorKind::EmptyCompletion).into());
        }

        let citations: Vec<Citation> = candidate
            .grounding_metadata
            .map(|g| {
                g.grounding_chunks
                    .into_iter()
                    .filter_map(|c| c.web)
                    .map(|w| Citation {
                        url: w.uri,
                        title: w.title.unwrap_or_default(),
                        snippet: String::new(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        info!(
            model = %self.cfg.model,
            latency_ms,
            citations = citations.len(),
            "generateContent completed"
        );

        Ok(QueryOutcome {
            text,
            latency_ms,
            citations,
        })
    }
}

fn validate_endpoint(endpoint: &str) -> Result<(), LlmQueryError> {
    let e = endpoint.trim();
    if e.is_empty() || !(e.starts_with("http://") || e.starts_with("https://")) {
        return Err(ConfigError::InvalidEndpoint(endpoint.to_string()).into());
    }
    Ok(())
}

/* ===========================================================================
HTTP payloads
======================================================================== */

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<Tool>>,
}

impl<'a> GenerateContentRequest<'a> {
    fn from_request(req: &'a QueryRequest) -> Self {
        let generation_config = if req.temperature.is_some() || req.max_tokens.is_some() {
            Some(GenerationConfig {
                temperature: req.temperature,
                max_output_tokens: req.max_tokens,
            })
        } else {
            None
        };

        Self {
            contents: vec![Content {
                parts: vec![PartIn { text: &req.prompt }],
            }],
            generation_config,
            tools: req.search_mode.then(|| {
                vec![Tool {
                    google_search: serde_json::Map::new(),
                }]
            }),
        }
    }
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<PartIn<'a>>,
}

#[derive(Debug, Serialize)]
struct PartIn<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(rename = "maxOutputTokens", skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct Tool {
    /// Empty object enables the Google Search tool.
    #[serde(rename = "google_search")]
    google_search: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<ContentOut>,
    #[serde(rename = "groundingMetadata")]
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Deserialize)]
struct ContentOut {
    #[serde(default)]
    parts: Vec<PartOut>,
}

#[derive(Debug, Deserialize)]
struct PartOut {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GroundingMetadata {
    #[serde(rename = "groundingChunks", default)]
    grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Deserialize)]
struct GroundingChunk {
    web: Option<WebSource>,
}

#[derive(Debug, Deserialize)]
struct WebSource {
    uri: String,
    title: Option<String>,
}
