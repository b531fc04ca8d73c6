//! Error types of the data layer.

use thiserror::Error;

use crate::query::{Field, Resource};

/// A query descriptor that cannot be executed against its resource.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("{resource} has no field {field:?}")]
    UnknownField { resource: Resource, field: Field },
}

/// Failure while executing a query or loading a dataset.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid query: {0}")]
    Query(#[from] QueryError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("failed to read dataset '{path}'")]
    DatasetIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse dataset '{path}'")]
    DatasetParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("the memory backend requires database.fixture_path")]
    MissingFixture,
}
