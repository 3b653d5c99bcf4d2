use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Kind of file change recorded under a revision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeKind {
    Added,
    Modified,
    Deleted,
}

impl ChangeKind {
    /// Lowercase name used in indexed text
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Added => "added",
            ChangeKind::Modified => "modified",
            ChangeKind::Deleted => "deleted",
        }
    }
}

/// A single file change belonging to a commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Change {
    /// What happened to the file
    pub kind: ChangeKind,
    /// Path as written in the log export
    pub path: String,
}

impl Change {
    pub fn new(kind: ChangeKind, path: impl Into<String>) -> Self {
        Self {
            kind,
            path: path.into(),
        }
    }
}

/// One revision block of the log export, shaped as an index document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommitRecord {
    /// Revision identifier (commit hash)
    pub id: String,
    /// Ticket identifier found in the message, empty when there is none
    #[serde(default)]
    pub ticket_id: String,
    /// Author as written in the export
    #[serde(default)]
    pub author: String,
    /// Commit date, if a date line was present
    #[serde(default)]
    pub date: Option<DateTime<FixedOffset>>,
    /// Commit message (single line, sanitized upstream)
    #[serde(default)]
    pub message: String,
    /// File changes in input order
    #[serde(default)]
    pub changes: Vec<Change>,
}

impl CommitRecord {
    /// Start a new record for the given revision
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// A record is open once it has a revision identifier
    pub fn is_open(&self) -> bool {
        !self.id.trim().is_empty()
    }

    /// Check whether the message starts with `marker`, ignoring ASCII case
    pub fn message_starts_with(&self, marker: &str) -> bool {
        self.message
            .get(..marker.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(marker))
    }
}

/// Summary of a finished import run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Records written to the store
    pub exported: usize,
    /// Revision blocks dropped as merge commits
    pub suppressed_merges: usize,
    /// Input lines consumed
    pub lines_read: usize,
    /// The run stopped at the pre-flight confirmation
    pub cancelled: bool,
}

/// A search hit returned by a document store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitHit {
    pub score: f32,
    pub record: CommitRecord,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_open() {
        assert!(!CommitRecord::default().is_open());
        assert!(!CommitRecord::with_id("   ").is_open());
        assert!(CommitRecord::with_id("a1b2c3").is_open());
    }

    #[test]
    fn test_message_starts_with_ignores_case() {
        let mut record = CommitRecord::with_id("r1");
        record.message = "MERGE branch 'main'".to_string();
        assert!(record.message_starts_with("Merge"));
        assert!(record.message_starts_with("merge branch"));
        assert!(!record.message_starts_with("Merged"));
    }

    #[test]
    fn test_message_starts_with_empty_message() {
        let record = CommitRecord::with_id("r1");
        assert!(!record.message_starts_with("Merge"));
    }

    #[test]
    fn test_message_starts_with_multibyte_boundary() {
        let mut record = CommitRecord::with_id("r1");
        record.message = "Mergé".to_string();
        // "Mergé" is 6 bytes; slicing at 5 is not a char boundary
        assert!(!record.message_starts_with("Merge"));
    }

    #[test]
    fn test_json_document_shape() {
        let mut record = CommitRecord::with_id("abc123");
        record.ticket_id = "SI-7".to_string();
        record.author = "Jane".to_string();
        record.message = "SI-7 fix".to_string();
        record.changes.push(Change::new(ChangeKind::Added, "src/lib.rs"));

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["id"], "abc123");
        assert_eq!(json["ticket_id"], "SI-7");
        assert_eq!(json["date"], serde_json::Value::Null);
        assert_eq!(json["changes"][0]["kind"], "Added");
        assert_eq!(json["changes"][0]["path"], "src/lib.rs");

        let back: CommitRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_change_kind_as_str() {
        assert_eq!(ChangeKind::Added.as_str(), "added");
        assert_eq!(ChangeKind::Modified.as_str(), "modified");
        assert_eq!(ChangeKind::Deleted.as_str(), "deleted");
    }
}
