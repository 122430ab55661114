//! HTTP surface of the relay.
//!
//! # Endpoints
//!
//! - `GET /` - Liveness string
//! - `POST /perguntar` - Answer a question from retrieved context

use std::net::SocketAddr;
use std::sync::Arc;

use application::RagService;
use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use domain::models::Question;
use domain::ports::{AnswerGenerator, EmbeddingProvider, VectorIndex};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};

use crate::error::ApiError;

pub const LIVENESS_MESSAGE: &str = "Servidor rodando no Render!";

/// Question request body
#[derive(Debug, Serialize, Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    pub pergunta: Option<String>,
}

/// Answer response body
#[derive(Debug, Serialize, Deserialize)]
pub struct AskResponse {
    pub resposta: String,
}

/// GET / - Liveness check, independent of configuration
async fn root() -> &'static str {
    LIVENESS_MESSAGE
}

/// POST /perguntar - Embed, search, generate
async fn perguntar<E, S, G>(
    State(service): State<Arc<RagService<E, S, G>>>,
    payload: Result<Json<AskRequest>, JsonRejection>,
) -> Result<Json<AskResponse>, ApiError>
where
    E: EmbeddingProvider + Send + Sync + 'static,
    S: VectorIndex + Send + Sync + 'static,
    G: AnswerGenerator + Send + Sync + 'static,
{
    let Json(request) = payload.map_err(|rejection| {
        tracing::debug!(%rejection, "unreadable question body");
        ApiError::MissingQuestion
    })?;
    let question = Question::parse(request.pergunta).ok_or(ApiError::MissingQuestion)?;

    let resposta = service.answer(&question).await?;
    tracing::info!(answer_len = resposta.len(), "question answered");

    Ok(Json(AskResponse { resposta }))
}

/// Create the axum router
pub fn create_router<E, S, G>(service: Arc<RagService<E, S, G>>) -> Router
where
    E: EmbeddingProvider + Send + Sync + 'static,
    S: VectorIndex + Send + Sync + 'static,
    G: AnswerGenerator + Send + Sync + 'static,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/perguntar", post(perguntar::<E, S, G>))
        .layer(cors)
        .with_state(service)
}

/// Serve until ctrl-c
pub async fn serve(router: Router, addr: SocketAddr) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Servidor rodando na porta {}", addr.port());

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
