use crate::error::StoreError;
use crate::store::DocumentStore;
use crate::types::CommitRecord;

/// Writes finished records into a single collection of a [`DocumentStore`]
///
/// One call, one blocking write. A failed write is returned to the caller as-is;
/// the exporter keeps no record of partial progress beyond its counter.
pub struct Exporter<'a, S: DocumentStore + ?Sized> {
    store: &'a mut S,
    collection: String,
    exported: usize,
}

impl<'a, S: DocumentStore + ?Sized> Exporter<'a, S> {
    pub fn new(store: &'a mut S, collection: impl Into<String>) -> Self {
        Self {
            store,
            collection: collection.into(),
            exported: 0,
        }
    }

    pub fn export(&mut self, record: &CommitRecord) -> Result<(), StoreError> {
        self.store.index(&self.collection, record)?;
        self.exported += 1;
        tracing::debug!(
            "Exported commit {} ({} changes) to '{}'",
            record.id,
            record.changes.len(),
            self.collection
        );
        Ok(())
    }

    /// Number of successful writes so far
    pub fn exported(&self) -> usize {
        self.exported
    }
}
