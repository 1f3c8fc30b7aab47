use std::error::Error;
use std::path::Path;

use brand_index::{BrandDatabase, BrandMatcher};
use llm_query::{QueryClient, QueryModelConfig, QueryProvider};
use stability_runner::{NoopObserver, RunOptions, run_stability};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Load environment variables from .env file, when present.
    dotenvy::dotenv().ok();

    // "info" everywhere unless RUST_LOG overrides, plus a per-crate
    // directive for the query layer.
    let filter = llm_query::telemetry::env_filter_with_level("info", tracing::Level::INFO);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .init();

    let provider = match std::env::var("STABILITY_PROVIDER").as_deref() {
        Ok("openai") => QueryProvider::OpenAi,
        Ok("grok") => QueryProvider::Grok,
        _ => QueryProvider::Gemini,
    };
    let api_key = match provider {
        QueryProvider::Gemini => std::env::var("GEMINI_API_KEY").ok(),
        QueryProvider::OpenAi => std::env::var("OPENAI_API_KEY").ok(),
        QueryProvider::Grok => std::env::var("XAI_API_KEY").ok(),
    };

    let mut options = RunOptions::from_env();
    if options.model.is_empty() {
        options.model = default_model(provider).to_string();
    }

    let client =
        QueryClient::from_config(QueryModelConfig::new(provider, options.model.clone(), api_key))?;

    // Optional dictionary for mention confidence tiers.
    let matcher = match std::env::var("STABILITY_BRANDS_PATH") {
        Ok(path) => Some(BrandMatcher::new(BrandDatabase::from_path(Path::new(&path))?)),
        Err(_) => None,
    };

    let result = run_stability(&client, &options, matcher.as_ref(), &NoopObserver).await?;
    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(())
}

fn default_model(provider: QueryProvider) -> &'static str {
    match provider {
        QueryProvider::Gemini => "gemini-2.0-flash",
        QueryProvider::OpenAi => "gpt-4o-mini",
        QueryProvider::Grok => "grok-3",
    }
}
