//! Outbound collaborators of the question pipeline.
//!
//! Each port documents its degraded mode: what it returns, without touching
//! the network, when its credentials are not configured.

use shared::types::Result;
use std::future::Future;

/// Turns text into an embedding vector.
///
/// Degraded mode: an empty vector.
pub trait EmbeddingProvider {
    fn embed(&self, text: &str) -> impl Future<Output = Result<Vec<f32>>> + Send;
}

/// Nearest-neighbour lookup in a hosted vector store.
///
/// Returns the decoded response body as-is; callers validate its shape.
/// Degraded mode: `{"matches": []}`.
pub trait VectorIndex {
    fn search(&self, vector: &[f32]) -> impl Future<Output = Result<serde_json::Value>> + Send;
}

/// Composes the final answer from context and question.
///
/// Degraded mode: a fixed placeholder sentence.
pub trait AnswerGenerator {
    fn generate(
        &self,
        context: &str,
        question: &str,
    ) -> impl Future<Output = Result<String>> + Send;
}
