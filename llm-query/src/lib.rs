//! Query capability for stability analysis runs.
//!
//! Thin, non-streaming HTTP clients for the three supported provider
//! families (Gemini `generateContent`, OpenAI chat completions, Grok
//! via its OpenAI-compatible endpoint), normalized behind one enum
//! client and one unified error type. The orchestrator treats this
//! crate as an opaque async function returning text + latency +
//! optional citations; any rejection is an iteration failure there,
//! never a crash.
//!
//! Construction is where validation lives: provider mismatch, missing
//! API key, or a non-http(s) endpoint fail the constructor, not the
//! call site.

pub mod client;
pub mod config;
pub mod error;
pub mod services;
pub mod telemetry;

pub use client::QueryClient;
pub use config::{Citation, QueryModelConfig, QueryOutcome, QueryProvider, QueryRequest};
pub use error::{LlmQueryError, ProviderError, ProviderErrorKind, Result};
