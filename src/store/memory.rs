use super::{CollectionStatus, DocumentStore};
use crate::error::StoreError;
use crate::types::{CommitHit, CommitRecord};
use std::collections::HashMap;

/// Document store that keeps everything in process memory
///
/// Used for `--dry-run`. Failure switches let tests simulate an unreachable
/// store, a collection that cannot be created, or a write that fails after a
/// given number of successful ones.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: HashMap<String, Vec<CommitRecord>>,
    unreachable: bool,
    refuse_create: bool,
    fail_after_writes: Option<usize>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `ping` fail
    pub fn unreachable(mut self) -> Self {
        self.unreachable = true;
        self
    }

    /// Make `ensure_collection` fail for collections that do not exist yet
    pub fn refuse_create(mut self) -> Self {
        self.refuse_create = true;
        self
    }

    /// Let `writes` records through, then fail every following write
    pub fn fail_after(mut self, writes: usize) -> Self {
        self.fail_after_writes = Some(writes);
        self
    }

    /// Records stored in `collection`, in write order
    pub fn records(&self, collection: &str) -> &[CommitRecord] {
        self.collections
            .get(collection)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn has_collection(&self, collection: &str) -> bool {
        self.collections.contains_key(collection)
    }
}

impl DocumentStore for MemoryStore {
    fn ping(&self) -> Result<(), StoreError> {
        if self.unreachable {
            return Err(StoreError::Unreachable("memory store marked unreachable".to_string()));
        }
        Ok(())
    }

    fn ensure_collection(&mut self, collection: &str) -> Result<CollectionStatus, StoreError> {
        if self.collections.contains_key(collection) {
            return Ok(CollectionStatus::AlreadyExists);
        }

        if self.refuse_create {
            return Err(StoreError::CollectionCreationFailed {
                collection: collection.to_string(),
                reason: "creation refused".to_string(),
            });
        }

        self.collections.insert(collection.to_string(), Vec::new());
        Ok(CollectionStatus::Created)
    }

    fn index(&mut self, collection: &str, record: &CommitRecord) -> Result<(), StoreError> {
        if self.fail_after_writes.is_some_and(|limit| self.writes >= limit) {
            return Err(StoreError::WriteFailed {
                id: record.id.clone(),
                reason: "simulated write failure".to_string(),
            });
        }

        let documents = self
            .collections
            .get_mut(collection)
            .ok_or_else(|| StoreError::CollectionNotFound(collection.to_string()))?;
        documents.push(record.clone());
        self.writes += 1;
        Ok(())
    }

    fn search(
        &self,
        collection: &str,
        query: &str,
        limit: usize,
    ) -> Result<Vec<CommitHit>, StoreError> {
        let documents = self
            .collections
            .get(collection)
            .ok_or_else(|| StoreError::CollectionNotFound(collection.to_string()))?;

        let needle = query.to_lowercase();
        Ok(documents
            .iter()
            .filter(|record| {
                record.message.to_lowercase().contains(&needle)
                    || record.author.to_lowercase().contains(&needle)
                    || record.ticket_id.eq_ignore_ascii_case(query)
            })
            .take(limit)
            .map(|record| CommitHit {
                score: 1.0,
                record: record.clone(),
            })
            .collect())
    }

    fn count(&self, collection: &str) -> Result<usize, StoreError> {
        self.collections
            .get(collection)
            .map(Vec::len)
            .ok_or_else(|| StoreError::CollectionNotFound(collection.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, message: &str) -> CommitRecord {
        let mut record = CommitRecord::with_id(id);
        record.message = message.to_string();
        record
    }

    #[test]
    fn test_ensure_collection_twice() {
        let mut store = MemoryStore::new();
        assert_eq!(
            store.ensure_collection("c").unwrap(),
            CollectionStatus::Created
        );
        assert_eq!(
            store.ensure_collection("c").unwrap(),
            CollectionStatus::AlreadyExists
        );
    }

    #[test]
    fn test_index_requires_collection() {
        let mut store = MemoryStore::new();
        let err = store.index("missing", &record("r1", "m")).unwrap_err();
        assert!(matches!(err, StoreError::CollectionNotFound(_)));
    }

    #[test]
    fn test_index_and_search() {
        let mut store = MemoryStore::new();
        store.ensure_collection("c").unwrap();
        store.index("c", &record("r1", "Fix parser bug")).unwrap();
        store.index("c", &record("r2", "Add exporter")).unwrap();

        assert_eq!(store.count("c").unwrap(), 2);
        let hits = store.search("c", "parser", 10).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].record.id, "r1");
    }

    #[test]
    fn test_failure_switches() {
        assert!(MemoryStore::new().unreachable().ping().is_err());
        assert!(MemoryStore::new().refuse_create().ensure_collection("c").is_err());

        let mut store = MemoryStore::new().fail_after(1);
        store.ensure_collection("c").unwrap();
        assert!(store.index("c", &record("r1", "m")).is_ok());
        assert!(store.index("c", &record("r2", "m")).is_err());
        assert_eq!(store.records("c").len(), 1);
    }
}
