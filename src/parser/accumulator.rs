use super::classifier::{ClassifiedLine, FieldKind};
use super::date::DateParser;
use super::ticket::TicketExtractor;
use crate::error::ParseError;
use crate::types::{Change, ChangeKind, CommitRecord};

/// Merge marker checked when a new revision line closes the open record
pub const BOUNDARY_MERGE_MARKER: &str = "Merge";

/// Merge marker checked when the last record is flushed at end of input
pub const FINAL_MERGE_MARKER: &str = "Merge branch";

/// Groups classified lines into [`CommitRecord`]s
///
/// Holds exactly one open record. A `Revision:` line closes it and opens the next;
/// [`finish`](Self::finish) closes the last one. Records whose message starts with
/// the applicable merge marker are dropped instead of returned. The two markers
/// differ: mid-stream any `Merge...` message is dropped, at end of input only
/// `Merge branch...`.
#[derive(Debug)]
pub struct RecordAccumulator {
    current: CommitRecord,
    tickets: TicketExtractor,
    dates: DateParser,
    boundary_marker: String,
    final_marker: String,
    suppressed_merges: usize,
}

impl RecordAccumulator {
    pub fn new(tickets: TicketExtractor, dates: DateParser) -> Self {
        Self {
            current: CommitRecord::default(),
            tickets,
            dates,
            boundary_marker: BOUNDARY_MERGE_MARKER.to_string(),
            final_marker: FINAL_MERGE_MARKER.to_string(),
            suppressed_merges: 0,
        }
    }

    /// Override the boundary and final-flush merge markers
    pub fn with_merge_markers(
        mut self,
        boundary: impl Into<String>,
        final_flush: impl Into<String>,
    ) -> Self {
        self.boundary_marker = boundary.into();
        self.final_marker = final_flush.into();
        self
    }

    /// Feed one classified line
    ///
    /// Returns the record closed by this line, if it is exportable.
    pub fn feed(&mut self, line: ClassifiedLine) -> Result<Option<CommitRecord>, ParseError> {
        let value = line.value.unwrap_or_default();

        match line.kind {
            FieldKind::RevisionId => {
                let closed = std::mem::replace(&mut self.current, CommitRecord::with_id(value));
                return Ok(self.close(closed, BoundaryKind::Revision));
            }
            FieldKind::Author => self.current.author = value,
            FieldKind::Date => self.current.date = Some(self.dates.parse(&value)?),
            FieldKind::Message => {
                self.current.ticket_id = self.tickets.extract(&value);
                self.current.message = value;
            }
            FieldKind::ModifiedFile => self.push_change(ChangeKind::Modified, value),
            FieldKind::AddedFile => self.push_change(ChangeKind::Added, value),
            FieldKind::DeletedFile => self.push_change(ChangeKind::Deleted, value),
            FieldKind::Unknown | FieldKind::Blank => {}
        }

        Ok(None)
    }

    /// Close the last record at end of input
    pub fn finish(&mut self) -> Option<CommitRecord> {
        let last = std::mem::take(&mut self.current);
        self.close(last, BoundaryKind::EndOfInput)
    }

    /// Number of records dropped as merge commits so far
    pub fn suppressed_merges(&self) -> usize {
        self.suppressed_merges
    }

    /// The record currently being filled
    pub fn current(&self) -> &CommitRecord {
        &self.current
    }

    fn push_change(&mut self, kind: ChangeKind, path: String) {
        self.current.changes.push(Change::new(kind, path));
    }

    fn close(&mut self, record: CommitRecord, boundary: BoundaryKind) -> Option<CommitRecord> {
        if !record.is_open() {
            return None;
        }

        let marker = match boundary {
            BoundaryKind::Revision => &self.boundary_marker,
            BoundaryKind::EndOfInput => &self.final_marker,
        };

        if record.message_starts_with(marker) {
            tracing::debug!("Skipping merge commit {}: {}", record.id, record.message);
            self.suppressed_merges += 1;
            return None;
        }

        Some(record)
    }
}

#[derive(Debug, Clone, Copy)]
enum BoundaryKind {
    Revision,
    EndOfInput,
}
