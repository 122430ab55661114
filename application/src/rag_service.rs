use crate::context::assemble_context;
use domain::models::{Question, RagQuery};
use domain::ports::{AnswerGenerator, EmbeddingProvider, VectorIndex};
use infrastructure::{
    config::Config, openrouter_client::OpenRouterClient, pinecone_client::PineconeClient,
};
use shared::telemetry::Telemetry;
use shared::types::Result;

/// Embed, search, assemble context, generate. One question at a time, no shared state.
pub struct RagService<E, S, G> {
    embedder: E,
    index: S,
    generator: G,
}

impl RagService<OpenRouterClient, PineconeClient, OpenRouterClient> {
    pub fn from_config(config: &Config) -> Self {
        let openrouter = OpenRouterClient::new(config);
        Self::new(openrouter.clone(), PineconeClient::new(config), openrouter)
    }
}

impl<E, S, G> RagService<E, S, G>
where
    E: EmbeddingProvider + Sync,
    S: VectorIndex + Sync,
    G: AnswerGenerator + Sync,
{
    pub fn new(embedder: E, index: S, generator: G) -> Self {
        Self {
            embedder,
            index,
            generator,
        }
    }

    pub async fn answer(&self, question: &Question) -> Result<String> {
        let query = self.retrieve(question).await?;
        self.generator
            .generate(&query.context, query.question.as_str())
            .await
    }

    /// Runs the retrieval half of the pipeline and returns the assembled context.
    pub async fn retrieve(&self, question: &Question) -> Result<RagQuery> {
        let mut telemetry = Telemetry::new();

        let vector = self.embedder.embed(question.as_str()).await?;
        let embed_time = telemetry.lap();
        tracing::debug!(dims = vector.len(), elapsed = ?embed_time, "embedded question");

        let response = self.index.search(&vector).await?;
        let search_time = telemetry.lap();
        tracing::debug!(elapsed = ?search_time, "vector search done");

        let context = assemble_context(&response)?;
        tracing::debug!(
            context_len = context.len(),
            total = ?telemetry.elapsed(),
            "context assembled"
        );

        Ok(RagQuery {
            question: question.clone(),
            context,
        })
    }
}
