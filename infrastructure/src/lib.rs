pub mod config;
pub mod openrouter_client;
pub mod pinecone_client;
