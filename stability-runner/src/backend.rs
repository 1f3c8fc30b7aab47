//! Injection seam between the run loop and the query transport.

use llm_query::{QueryClient, QueryOutcome, QueryRequest};

/// Async query capability consumed by the run loop.
///
/// The production implementation is [`llm_query::QueryClient`]; tests
/// inject scripted backends. Plain `async fn` in the trait — the runner
/// is generic over the backend, never `dyn`.
pub trait QueryBackend {
    /// Send one prompt, returning text + latency + citations.
    fn query(
        &self,
        req: &QueryRequest,
    ) -> impl Future<Output = llm_query::Result<QueryOutcome>> + Send;
}

impl QueryBackend for QueryClient {
    async fn query(&self, req: &QueryRequest) -> llm_query::Result<QueryOutcome> {
        QueryClient::query(self, req).await
    }
}
