//! Per-provider thin clients.

pub mod gemini;
pub mod openai_compat;
