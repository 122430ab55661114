use crate::config::Config;
use anyhow::Context;
use domain::ports::VectorIndex;
use reqwest::Client;
use serde::Serialize;
use serde_json::{json, Value};
use shared::types::Result;
use std::sync::Arc;

pub const TOP_K: usize = 3;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    vector: &'a [f32],
    top_k: usize,
    include_metadata: bool,
}

struct Endpoint {
    url: String,
    api_key: String,
}

/// Query client for a hosted Pinecone index.
#[derive(Clone)]
pub struct PineconeClient {
    client: Arc<Client>,
    endpoint: Option<Arc<Endpoint>>,
}

impl PineconeClient {
    /// The client is degraded unless the API key, environment and index name are all set.
    pub fn new(config: &Config) -> Self {
        let endpoint = match (
            &config.pinecone_api_key,
            &config.pinecone_environment,
            &config.pinecone_index_name,
        ) {
            (Some(api_key), Some(environment), Some(index)) => Some(Arc::new(Endpoint {
                url: query_url(config.pinecone_host.as_deref(), index, environment),
                api_key: api_key.clone(),
            })),
            _ => None,
        };
        Self {
            client: Arc::new(Client::new()),
            endpoint,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.endpoint.is_some()
    }

    pub async fn query(&self, vector: &[f32]) -> Result<Value> {
        let Some(endpoint) = self.endpoint.as_deref() else {
            tracing::debug!("Pinecone not configured, returning no matches");
            return Ok(json!({ "matches": [] }));
        };
        let request = QueryRequest {
            vector,
            top_k: TOP_K,
            include_metadata: true,
        };
        let response = self
            .client
            .post(&endpoint.url)
            .header("Api-Key", &endpoint.api_key)
            .json(&request)
            .send()
            .await
            .context("vector query request failed")?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%status, "vector query returned an error status");
        }
        response
            .json()
            .await
            .context("vector query response is not JSON")
    }
}

fn query_url(host: Option<&str>, index: &str, environment: &str) -> String {
    match host {
        Some(host) => format!("{}/query", host.trim_end_matches('/')),
        None => format!("https://{index}-{environment}.svc.pinecone.io/query"),
    }
}

impl VectorIndex for PineconeClient {
    async fn search(&self, vector: &[f32]) -> Result<Value> {
        self.query(vector).await
    }
}
