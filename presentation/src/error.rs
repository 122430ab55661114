use application::RagError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MISSING_QUESTION_MESSAGE: &str = "Pergunta não enviada.";
pub const INTERNAL_ERROR_MESSAGE: &str = "Erro ao processar a solicitação";

/// Every failure a request can end in, each mapped to exactly one status.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Body absent, not JSON, or without a non-empty `pergunta`.
    #[error("question not provided")]
    MissingQuestion,

    /// Anything raised while embedding, searching or generating.
    #[error(transparent)]
    Pipeline(#[from] anyhow::Error),
}

/// Error body returned to callers.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub erro: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingQuestion => StatusCode::BAD_REQUEST,
            ApiError::Pipeline(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn public_message(&self) -> &'static str {
        match self {
            ApiError::MissingQuestion => MISSING_QUESTION_MESSAGE,
            ApiError::Pipeline(_) => INTERNAL_ERROR_MESSAGE,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Pipeline(err) = &self {
            if err.downcast_ref::<RagError>().is_some() {
                tracing::error!(error = ?err, "vector search returned an unexpected payload");
            } else {
                tracing::error!(error = ?err, "failed to answer question");
            }
        }
        let body = ErrorResponse {
            erro: self.public_message().to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
