use super::{CollectionStatus, DocumentStore};
use crate::config::is_valid_collection_name;
use crate::error::StoreError;
use crate::types::{CommitHit, CommitRecord};
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tantivy::collector::TopDocs;
use tantivy::query::QueryParser;
use tantivy::schema::*;
use tantivy::{Index, IndexWriter, ReloadPolicy, TantivyDocument, doc};

/// Memory budget handed to each Tantivy index writer
const WRITER_HEAP_BYTES: usize = 50_000_000;

/// Lock files older than this are assumed to belong to a crashed process
const STALE_LOCK_SECS: u64 = 300;

/// Document store backed by one Tantivy index directory per collection
///
/// Layout: `{root}/{collection}/meta.json` plus segment files. A collection's
/// writer is opened on first write and kept for the lifetime of the store; each
/// record is committed on its own so a failed run keeps everything written before
/// the failure.
pub struct TantivyStore {
    root: PathBuf,
    collections: HashMap<String, CommitIndex>,
}

struct CommitIndex {
    index: Index,
    fields: CommitFields,
    path: PathBuf,
    writer: Option<IndexWriter<TantivyDocument>>,
}

#[derive(Debug, Clone, Copy)]
struct CommitFields {
    id: Field,
    ticket_id: Field,
    author: Field,
    message: Field,
    date: Field,
    path: Field,
    source: Field,
}

impl CommitFields {
    fn schema() -> (Schema, Self) {
        let mut schema_builder = Schema::builder();
        let fields = Self {
            id: schema_builder.add_text_field("id", STRING | STORED),
            ticket_id: schema_builder.add_text_field("ticket_id", STRING | STORED),
            author: schema_builder.add_text_field("author", TEXT),
            message: schema_builder.add_text_field("message", TEXT),
            date: schema_builder.add_date_field("date", INDEXED | STORED | FAST),
            path: schema_builder.add_text_field("path", TEXT),
            source: schema_builder.add_text_field("source", STORED),
        };
        (schema_builder.build(), fields)
    }

    /// Resolve fields of an index created earlier
    fn from_schema(schema: &Schema) -> Result<Self> {
        let field = |name: &str| {
            schema
                .get_field(name)
                .with_context(|| format!("Index schema has no '{}' field", name))
        };

        Ok(Self {
            id: field("id")?,
            ticket_id: field("ticket_id")?,
            author: field("author")?,
            message: field("message")?,
            date: field("date")?,
            path: field("path")?,
            source: field("source")?,
        })
    }
}

impl TantivyStore {
    /// Create a store rooted at `root`; nothing touches the disk until [`ping`](DocumentStore::ping)
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            collections: HashMap::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn collection_path(&self, collection: &str) -> PathBuf {
        self.root.join(collection)
    }

    /// Open or create the index directory for a collection
    fn open_or_create(path: &Path) -> Result<(CommitIndex, CollectionStatus)> {
        let (index, fields, status) = if path.join("meta.json").exists() {
            let index = Index::open_in_dir(path).context("Failed to open existing index")?;
            let fields = CommitFields::from_schema(&index.schema())?;
            (index, fields, CollectionStatus::AlreadyExists)
        } else {
            std::fs::create_dir_all(path).context("Failed to create index directory")?;
            let (schema, fields) = CommitFields::schema();
            let index = Index::create_in_dir(path, schema).context("Failed to create index")?;
            (index, fields, CollectionStatus::Created)
        };

        let commit_index = CommitIndex {
            index,
            fields,
            path: path.to_path_buf(),
            writer: None,
        };
        Ok((commit_index, status))
    }

    /// Index and fields for reading; collections not opened by this store are loaded from disk
    fn reader_parts(&self, collection: &str) -> Result<(Index, CommitFields), StoreError> {
        if let Some(open) = self.collections.get(collection) {
            return Ok((open.index.clone(), open.fields));
        }

        let path = self.collection_path(collection);
        if !path.join("meta.json").exists() {
            return Err(StoreError::CollectionNotFound(collection.to_string()));
        }

        let search_failed = |e: anyhow::Error| StoreError::SearchFailed {
            collection: collection.to_string(),
            reason: format!("{:#}", e),
        };

        let index = Index::open_in_dir(&path)
            .context("Failed to open index")
            .map_err(search_failed)?;
        let fields = CommitFields::from_schema(&index.schema()).map_err(search_failed)?;
        Ok((index, fields))
    }

    /// Check if a lock file is stale (older than 5 minutes with no recent activity)
    fn is_lock_stale(lock_path: &Path) -> bool {
        if !lock_path.exists() {
            return false;
        }

        if let Ok(metadata) = std::fs::metadata(lock_path)
            && let Ok(modified) = metadata.modified()
            && let Ok(elapsed) = modified.elapsed()
        {
            return elapsed.as_secs() > STALE_LOCK_SECS;
        }

        false
    }

    /// Try to clean up stale lock files only if they appear to be from crashed processes
    fn try_cleanup_stale_locks(index_path: &Path) -> Result<bool> {
        let writer_lock = index_path.join(".tantivy-writer.lock");
        let meta_lock = index_path.join(".tantivy-meta.lock");

        let writer_stale = Self::is_lock_stale(&writer_lock);
        let meta_stale = Self::is_lock_stale(&meta_lock);

        if !writer_stale && !meta_stale {
            return Ok(false);
        }

        if writer_stale {
            tracing::warn!("Removing stale Tantivy writer lock file: {:?}", writer_lock);
            std::fs::remove_file(&writer_lock)
                .context("Failed to remove stale writer lock file")?;
        }

        if meta_stale {
            tracing::warn!("Removing stale Tantivy meta lock file: {:?}", meta_lock);
            std::fs::remove_file(&meta_lock).context("Failed to remove stale meta lock file")?;
        }

        Ok(true)
    }

    /// Create an index writer, clearing stale locks left by a crashed import once
    fn open_writer(index: &Index, index_path: &Path) -> Result<IndexWriter<TantivyDocument>> {
        match index.writer(WRITER_HEAP_BYTES) {
            Ok(writer) => Ok(writer),
            Err(e) => {
                let error_msg = e.to_string();
                if !error_msg.to_lowercase().contains("lock") {
                    return Err(e).context("Failed to create index writer");
                }

                tracing::warn!(
                    "Index writer creation failed (possibly locked), checking for stale locks..."
                );
                match Self::try_cleanup_stale_locks(index_path) {
                    Ok(true) => {
                        tracing::info!("Stale locks cleaned up, retrying writer creation...");
                        index
                            .writer(WRITER_HEAP_BYTES)
                            .context("Failed to create index writer after cleaning stale locks")
                    }
                    Ok(false) => Err(anyhow::anyhow!(
                        "Index is currently being used by another process. Please wait and try again later."
                    )),
                    Err(cleanup_err) => Err(anyhow::anyhow!(
                        "Failed to create index writer (locked) and failed to cleanup stale locks: {}. Original error: {}",
                        cleanup_err,
                        e
                    )),
                }
            }
        }
    }

    fn build_document(fields: &CommitFields, record: &CommitRecord) -> Result<TantivyDocument> {
        let source = serde_json::to_string(record).context("Failed to serialize record")?;

        let mut document = doc!(
            fields.id => record.id.clone(),
            fields.ticket_id => record.ticket_id.clone(),
            fields.author => record.author.clone(),
            fields.message => record.message.clone(),
            fields.source => source,
        );

        if let Some(date) = record.date {
            document.add_date(
                fields.date,
                tantivy::DateTime::from_timestamp_secs(date.timestamp()),
            );
        }

        for change in &record.changes {
            document.add_text(fields.path, &change.path);
        }

        Ok(document)
    }

    fn write_record(commit_index: &mut CommitIndex, record: &CommitRecord) -> Result<()> {
        let document = Self::build_document(&commit_index.fields, record)?;

        let writer = match commit_index.writer.take() {
            Some(writer) => writer,
            None => Self::open_writer(&commit_index.index, &commit_index.path)?,
        };
        let writer = commit_index.writer.insert(writer);

        writer
            .add_document(document)
            .context("Failed to add document")?;
        writer.commit().context("Failed to commit document")?;
        Ok(())
    }

    fn run_search(
        index: &Index,
        fields: &CommitFields,
        query_text: &str,
        limit: usize,
    ) -> Result<Vec<CommitHit>> {
        let reader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()
            .context("Failed to create index reader")?;

        let searcher = reader.searcher();

        // Lenient parsing: messages are free text and may contain ':' or brackets
        let query_parser = QueryParser::for_index(
            index,
            vec![fields.message, fields.author, fields.path, fields.ticket_id],
        );
        let (query, _errors) = query_parser.parse_query_lenient(query_text);

        let top_docs = searcher
            .search(&query, &TopDocs::with_limit(limit))
            .context("Failed to execute search")?;

        let mut hits = Vec::with_capacity(top_docs.len());
        for (score, doc_address) in top_docs {
            let retrieved: TantivyDocument = searcher
                .doc(doc_address)
                .context("Failed to retrieve document")?;

            if let Some(source) = retrieved.get_first(fields.source)
                && let Some(json) = source.as_str()
            {
                let record: CommitRecord =
                    serde_json::from_str(json).context("Failed to decode stored record")?;
                hits.push(CommitHit { score, record });
            }
        }

        Ok(hits)
    }
}

impl DocumentStore for TantivyStore {
    fn ping(&self) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.root).map_err(|e| {
            StoreError::Unreachable(format!("cannot create '{}': {}", self.root.display(), e))
        })?;

        let metadata = std::fs::metadata(&self.root).map_err(|e| {
            StoreError::Unreachable(format!("cannot access '{}': {}", self.root.display(), e))
        })?;

        if !metadata.is_dir() {
            return Err(StoreError::Unreachable(format!(
                "'{}' is not a directory",
                self.root.display()
            )));
        }

        if metadata.permissions().readonly() {
            return Err(StoreError::Unreachable(format!(
                "'{}' is read-only",
                self.root.display()
            )));
        }

        Ok(())
    }

    fn ensure_collection(&mut self, collection: &str) -> Result<CollectionStatus, StoreError> {
        if !is_valid_collection_name(collection) {
            return Err(StoreError::InvalidCollectionName(collection.to_string()));
        }

        if self.collections.contains_key(collection) {
            return Ok(CollectionStatus::AlreadyExists);
        }

        let path = self.collection_path(collection);
        let (commit_index, status) =
            Self::open_or_create(&path).map_err(|e| StoreError::CollectionCreationFailed {
                collection: collection.to_string(),
                reason: format!("{:#}", e),
            })?;

        match status {
            CollectionStatus::Created => {
                tracing::info!("Created index '{}' at {}", collection, path.display())
            }
            CollectionStatus::AlreadyExists => {
                tracing::info!("Using existing index '{}' at {}", collection, path.display())
            }
        }

        self.collections.insert(collection.to_string(), commit_index);
        Ok(status)
    }

    fn index(&mut self, collection: &str, record: &CommitRecord) -> Result<(), StoreError> {
        let commit_index = self
            .collections
            .get_mut(collection)
            .ok_or_else(|| StoreError::CollectionNotFound(collection.to_string()))?;

        Self::write_record(commit_index, record).map_err(|e| StoreError::WriteFailed {
            id: record.id.clone(),
            reason: format!("{:#}", e),
        })
    }

    fn search(
        &self,
        collection: &str,
        query: &str,
        limit: usize,
    ) -> Result<Vec<CommitHit>, StoreError> {
        let (index, fields) = self.reader_parts(collection)?;

        Self::run_search(&index, &fields, query, limit).map_err(|e| StoreError::SearchFailed {
            collection: collection.to_string(),
            reason: format!("{:#}", e),
        })
    }

    fn count(&self, collection: &str) -> Result<usize, StoreError> {
        let (index, _) = self.reader_parts(collection)?;

        let reader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()
            .map_err(|e: tantivy::TantivyError| StoreError::SearchFailed {
                collection: collection.to_string(),
                reason: e.to_string(),
            })?;

        Ok(reader.searcher().num_docs() as usize)
    }
}
