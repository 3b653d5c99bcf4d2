//! Document store abstraction
//!
//! The import pipeline writes each finished commit record through a
//! [`DocumentStore`]. Writes are blocking and independent; there is no batching.

// Tantivy is the default on-disk store (embedded, no server required)
pub mod tantivy_store;
pub use tantivy_store::TantivyStore;

// In-memory store for dry runs and tests
pub mod memory;
pub use memory::MemoryStore;

use crate::error::StoreError;
use crate::types::{CommitHit, CommitRecord};

/// Outcome of making sure a collection exists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionStatus {
    Created,
    AlreadyExists,
}

/// Trait for document store operations
pub trait DocumentStore {
    /// Check the store can be reached before any work starts
    fn ping(&self) -> Result<(), StoreError>;

    /// Create `collection` unless it already exists
    fn ensure_collection(&mut self, collection: &str) -> Result<CollectionStatus, StoreError>;

    /// Write one record into `collection`
    fn index(&mut self, collection: &str, record: &CommitRecord) -> Result<(), StoreError>;

    /// Full-text search over a collection
    fn search(
        &self,
        collection: &str,
        query: &str,
        limit: usize,
    ) -> Result<Vec<CommitHit>, StoreError>;

    /// Number of documents in a collection
    fn count(&self, collection: &str) -> Result<usize, StoreError>;
}
