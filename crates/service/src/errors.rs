use thiserror::Error;

use crate::storage::Collection;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("invalid order: {0}")]
    InvalidOrder(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("failed to decode {collection} collection: {source}")]
    Decode {
        collection: Collection,
        #[source]
        source: serde_json::Error,
    },
    #[error("storage error on {collection} collection: {source}")]
    Storage {
        collection: Collection,
        #[source]
        source: std::io::Error,
    },
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }

    pub fn storage(collection: Collection, source: impl Into<std::io::Error>) -> Self {
        Self::Storage { collection, source: source.into() }
    }
}
