//! The narrow interface the API consumes: run a descriptor, count a
//! descriptor.

use std::sync::Arc;

use async_trait::async_trait;
use hadith_kernel::settings::{DatabaseBackend, DatabaseSettings};

use crate::error::StoreError;
use crate::memory::MemoryStore;
use crate::models::Record;
use crate::mysql::MySqlStore;
use crate::query::Query;

/// Slice of a result set, in `OFFSET`/`LIMIT` terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub offset: u64,
    pub limit: u64,
}

impl Window {
    pub const fn new(offset: u64, limit: u64) -> Self {
        Self { offset, limit }
    }

    /// Window of the 1-indexed `page` with `limit` items per page.
    pub const fn page(page: u64, limit: u64) -> Self {
        Self {
            offset: page.saturating_sub(1).saturating_mul(limit),
            limit,
        }
    }

    /// The first record only.
    pub const fn first() -> Self {
        Self {
            offset: 0,
            limit: 1,
        }
    }
}

/// Executes query descriptors against the corpus.
#[async_trait]
pub trait Store: Send + Sync {
    /// Records matching `query`, restricted to `window` when given.
    async fn fetch(&self, query: &Query, window: Option<Window>) -> Result<Vec<Record>, StoreError>;

    /// Number of records matching `query`, ignoring any window.
    async fn count(&self, query: &Query) -> Result<u64, StoreError>;
}

/// Store handle shared by every router.
pub type SharedStore = Arc<dyn Store>;

/// Build the store selected by the database settings.
pub async fn connect(settings: &DatabaseSettings) -> Result<SharedStore, StoreError> {
    match settings.backend {
        DatabaseBackend::MySql => {
            let store = MySqlStore::connect_lazy(&settings.url, settings.max_connections)?;
            tracing::info!(max_connections = settings.max_connections, "using MySQL store");
            Ok(Arc::new(store))
        }
        DatabaseBackend::Memory => {
            let path = settings
                .fixture_path
                .as_deref()
                .ok_or(StoreError::MissingFixture)?;
            let store = MemoryStore::load(path).await?;
            tracing::info!(path, records = store.len(), "using in-memory store");
            Ok(Arc::new(store))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_windows_are_one_indexed() {
        assert_eq!(Window::page(1, 50), Window::new(0, 50));
        assert_eq!(Window::page(3, 20), Window::new(40, 20));
        assert_eq!(Window::page(0, 20), Window::new(0, 20));
    }

    #[tokio::test]
    async fn memory_backend_requires_fixture() {
        let settings = DatabaseSettings {
            backend: DatabaseBackend::Memory,
            ..DatabaseSettings::default()
        };
        let err = connect(&settings).await.err().unwrap();
        assert!(matches!(err, StoreError::MissingFixture));
    }

    #[tokio::test]
    async fn mysql_backend_connects_lazily() {
        let settings = DatabaseSettings::default();
        assert!(connect(&settings).await.is_ok());
    }
}
