use dotenvy::dotenv;
use shared::utils::non_empty;
use std::env;

pub const DEFAULT_MODEL_NAME: &str = "mistralai/mistral-7b-instruct";
pub const DEFAULT_OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_PORT: u16 = 3000;

/// Process-wide settings, read once at startup and never mutated.
///
/// Missing credentials do not stop the process; each client falls back to
/// its degraded mode instead.
#[derive(Debug, Clone)]
pub struct Config {
    pub pinecone_api_key: Option<String>,
    pub pinecone_environment: Option<String>,
    pub pinecone_index_name: Option<String>,
    /// Replaces the `{index}-{environment}.svc.pinecone.io` host when set.
    pub pinecone_host: Option<String>,
    pub openrouter_api_key: Option<String>,
    pub openrouter_base_url: String,
    pub model_name: String,
    pub port: u16,
}

impl Config {
    pub fn load() -> Self {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| non_empty(lookup(key));
        let port = match get("PORT") {
            None => DEFAULT_PORT,
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!(value = %raw, "PORT is not a valid port number, using {DEFAULT_PORT}");
                DEFAULT_PORT
            }),
        };
        Self {
            pinecone_api_key: get("PINECONE_API_KEY"),
            pinecone_environment: get("PINECONE_ENVIRONMENT"),
            pinecone_index_name: get("PINECONE_INDEX_NAME"),
            pinecone_host: get("PINECONE_HOST"),
            openrouter_api_key: get("OPENROUTER_API_KEY"),
            openrouter_base_url: get("OPENROUTER_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OPENROUTER_BASE_URL.to_string()),
            model_name: get("MODEL_NAME").unwrap_or_else(|| DEFAULT_MODEL_NAME.to_string()),
            port,
        }
    }

    /// Names of required variables that are not set.
    pub fn missing_required(&self) -> Vec<&'static str> {
        [
            ("PINECONE_API_KEY", &self.pinecone_api_key),
            ("PINECONE_ENVIRONMENT", &self.pinecone_environment),
            ("PINECONE_INDEX_NAME", &self.pinecone_index_name),
            ("OPENROUTER_API_KEY", &self.openrouter_api_key),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_none())
        .map(|(name, _)| name)
        .collect()
    }

    pub fn warn_if_incomplete(&self) {
        let missing = self.missing_required();
        if !missing.is_empty() {
            tracing::warn!(
                missing = ?missing,
                "required environment variables are missing, affected clients will run degraded"
            );
        }
    }
}
