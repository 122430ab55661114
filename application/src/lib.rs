pub mod context;
pub mod rag_service;

pub use context::{assemble_context, RagError};
pub use rag_service::RagService;
