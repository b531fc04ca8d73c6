//! In-memory backend evaluating descriptors over a JSON dataset.

use std::cmp::Ordering;
use std::path::Path;

use async_trait::async_trait;
use rand::seq::SliceRandom;
use serde::Deserialize;

use crate::error::StoreError;
use crate::models::{Book, Chapter, Collection, Hadith, Record};
use crate::query::{Order, Predicate, Query, Value};
use crate::store::{Store, Window};

/// On-disk layout of a fixture file: one array per table.
#[derive(Debug, Default, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub collections: Vec<Collection>,
    #[serde(default)]
    pub books: Vec<Book>,
    #[serde(default)]
    pub chapters: Vec<Chapter>,
    #[serde(default)]
    pub hadiths: Vec<Hadith>,
}

/// Immutable snapshot of the corpus. Records keep their load order, which
/// stands in for the store's natural order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Vec<Record>,
}

impl MemoryStore {
    pub fn new(records: impl IntoIterator<Item = Record>) -> Self {
        Self {
            records: records.into_iter().collect(),
        }
    }

    pub fn from_dataset(dataset: Dataset) -> Self {
        let Dataset {
            collections,
            books,
            chapters,
            hadiths,
        } = dataset;

        Self::new(
            collections
                .into_iter()
                .map(Record::from)
                .chain(books.into_iter().map(Record::from))
                .chain(chapters.into_iter().map(Record::from))
                .chain(hadiths.into_iter().map(Record::from)),
        )
    }

    /// Load a fixture file written in the [`Dataset`] layout.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let raw = tokio::fs::read(path)
            .await
            .map_err(|source| StoreError::DatasetIo {
                path: path.display().to_string(),
                source,
            })?;
        let dataset: Dataset =
            serde_json::from_slice(&raw).map_err(|source| StoreError::DatasetParse {
                path: path.display().to_string(),
                source,
            })?;
        Ok(Self::from_dataset(dataset))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn matching(&self, query: &Query) -> Result<Vec<&Record>, StoreError> {
        query.validate()?;

        let resource = query.resource();
        Ok(self
            .records
            .iter()
            .filter(|record| record.resource() == resource)
            .filter(|record| query.predicates().iter().all(|p| matches(record, p)))
            .collect())
    }

    fn select(&self, query: &Query, window: Option<Window>) -> Result<Vec<Record>, StoreError> {
        let mut matched = self.matching(query)?;

        match query.order() {
            Some(Order::Asc(field)) => {
                matched.sort_by(|a, b| compare(a.field(field).as_ref(), b.field(field).as_ref()));
            }
            Some(Order::AbsAsc(field)) => {
                matched.sort_by(|a, b| {
                    let a = a.field(field).map(|v| v.magnitude());
                    let b = b.field(field).map(|v| v.magnitude());
                    compare(a.as_ref(), b.as_ref())
                });
            }
            Some(Order::Random) => matched.shuffle(&mut rand::thread_rng()),
            None => {}
        }

        let (offset, limit) = match window {
            Some(window) => (window.offset, window.limit),
            None => (0, u64::MAX),
        };

        Ok(matched
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn fetch(&self, query: &Query, window: Option<Window>) -> Result<Vec<Record>, StoreError> {
        self.select(query, window)
    }

    async fn count(&self, query: &Query) -> Result<u64, StoreError> {
        Ok(self.matching(query)?.len() as u64)
    }
}

fn matches(record: &Record, predicate: &Predicate) -> bool {
    match predicate {
        Predicate::Eq(field, value) => record.field(*field).as_ref() == Some(value),
        Predicate::In(field, values) => record
            .field(*field)
            .is_some_and(|current| values.contains(&current)),
        Predicate::Any(inner) => inner.iter().any(|p| matches(record, p)),
    }
}

fn compare(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.compare(b).unwrap_or(Ordering::Equal),
        _ => Ordering::Equal,
    }
}
