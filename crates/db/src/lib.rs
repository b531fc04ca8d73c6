//! Data layer of the hadith API.
//!
//! The corpus lives in an external store; this crate only describes what to
//! ask for ([`Query`]) and hands the description to a [`Store`] backend.

pub mod book_number;
pub mod error;
pub mod memory;
pub mod models;
pub mod mysql;
pub mod query;
pub mod store;

pub use error::{QueryError, StoreError};
pub use memory::MemoryStore;
pub use models::{Book, Chapter, Collection, Hadith, Record};
pub use mysql::MySqlStore;
pub use query::{Field, Order, Predicate, Query, Resource, Value};
pub use store::{connect, SharedStore, Store, Window};
