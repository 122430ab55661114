use crate::config::Config;
use anyhow::Context;
use domain::ports::{AnswerGenerator, EmbeddingProvider};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::types::Result;
use std::sync::Arc;

pub const EMBEDDING_MODEL: &str = "text-embedding-3-small";
pub const MISSING_KEY_ANSWER: &str = "Servidor sem chave OpenRouter configurada.";
pub const NO_ANSWER: &str = "Sem resposta";

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message>,
}

pub fn build_prompt(context: &str, question: &str) -> String {
    format!(
        "Baseado nas informações abaixo, responda de forma clara e objetiva:\n\n{context}\n\nPergunta: {question}"
    )
}

/// Embeddings and chat completions against an OpenAI-compatible API.
///
/// Without an API key both operations answer locally: an empty embedding and
/// a fixed notice instead of a completion.
#[derive(Clone)]
pub struct OpenRouterClient {
    client: Arc<Client>,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

impl OpenRouterClient {
    pub fn new(config: &Config) -> Self {
        Self {
            client: Arc::new(Client::new()),
            base_url: config.openrouter_base_url.trim_end_matches('/').to_string(),
            api_key: config.openrouter_api_key.clone(),
            model: config.model_name.clone(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub async fn generate_embedding(&self, text: &str) -> Result<Vec<f32>> {
        let Some(api_key) = self.api_key.as_deref() else {
            tracing::debug!("no OpenRouter key, returning empty embedding");
            return Ok(Vec::new());
        };
        let url = format!("{}/embeddings", self.base_url);
        let request = EmbeddingRequest {
            model: EMBEDDING_MODEL,
            input: text,
        };
        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .context("embedding request failed")?;
        let status = response.status();
        let body: Value = response
            .json()
            .await
            .context("embedding response is not JSON")?;
        if !status.is_success() {
            tracing::warn!(%status, "embedding API returned an error status");
        }
        let embedding = extract_embedding(&body);
        if embedding.is_empty() {
            tracing::warn!("embedding response carried no vector");
        }
        Ok(embedding)
    }

    pub async fn generate_response(&self, context: &str, question: &str) -> Result<String> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Ok(MISSING_KEY_ANSWER.to_string());
        };
        let url = format!("{}/chat/completions", self.base_url);
        let request = ChatRequest {
            model: &self.model,
            messages: vec![Message {
                role: "user".to_string(),
                content: build_prompt(context, question),
            }],
        };
        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .context("chat completion request failed")?;
        let status = response.status();
        let body: Value = response
            .json()
            .await
            .context("chat completion response is not JSON")?;
        if !status.is_success() {
            tracing::warn!(%status, "chat completion API returned an error status");
        }
        Ok(extract_answer(&body).unwrap_or_else(|| NO_ANSWER.to_string()))
    }
}

/// `data[0].embedding`, or empty when the path is missing or holds non-numbers.
fn extract_embedding(body: &Value) -> Vec<f32> {
    body.pointer("/data/0/embedding")
        .and_then(Value::as_array)
        .and_then(|values| {
            values
                .iter()
                .map(|v| v.as_f64().map(|f| f as f32))
                .collect::<Option<Vec<f32>>>()
        })
        .unwrap_or_default()
}

/// `choices[0].message.content` when it is a non-empty string.
fn extract_answer(body: &Value) -> Option<String> {
    body.pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .filter(|content| !content.is_empty())
        .map(str::to_string)
}

impl EmbeddingProvider for OpenRouterClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.generate_embedding(text).await
    }
}

impl AnswerGenerator for OpenRouterClient {
    async fn generate(&self, context: &str, question: &str) -> Result<String> {
        self.generate_response(context, question).await
    }
}
