/// Separator between a field name and its value
pub const FIELD_SEPARATOR: char = ':';

/// Kind of field a log line carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    RevisionId,
    Author,
    Date,
    Message,
    ModifiedFile,
    DeletedFile,
    AddedFile,
    /// Has a separator but the prefix is not a known field
    Unknown,
    /// Empty, whitespace-only, or no separator at all
    Blank,
}

impl FieldKind {
    /// Resolve a trimmed line prefix, ignoring case
    pub fn from_prefix(prefix: &str) -> Self {
        const NAMES: [(&str, FieldKind); 7] = [
            ("revision", FieldKind::RevisionId),
            ("author", FieldKind::Author),
            ("date", FieldKind::Date),
            ("message", FieldKind::Message),
            ("modified", FieldKind::ModifiedFile),
            ("deleted", FieldKind::DeletedFile),
            ("added", FieldKind::AddedFile),
        ];

        NAMES
            .iter()
            .find(|(name, _)| prefix.eq_ignore_ascii_case(name))
            .map(|(_, kind)| *kind)
            .unwrap_or(FieldKind::Unknown)
    }
}

/// Result of classifying one input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedLine {
    pub kind: FieldKind,
    /// Trimmed value after the first separator; `None` for blank lines
    pub value: Option<String>,
}

impl ClassifiedLine {
    pub fn blank() -> Self {
        Self {
            kind: FieldKind::Blank,
            value: None,
        }
    }

    /// Value as a string slice, empty for blank lines
    pub fn value_str(&self) -> &str {
        self.value.as_deref().unwrap_or("")
    }
}

/// Classify a raw log line by its field prefix
///
/// Only the first separator splits prefix from value; later separators stay in the
/// value verbatim (`Date: 2024-01-01 10:00:00` keeps its time).
pub fn classify_line(line: &str) -> ClassifiedLine {
    if line.trim().is_empty() {
        return ClassifiedLine::blank();
    }

    let Some((prefix, rest)) = line.split_once(FIELD_SEPARATOR) else {
        return ClassifiedLine::blank();
    };

    ClassifiedLine {
        kind: FieldKind::from_prefix(prefix.trim()),
        value: Some(rest.trim().to_string()),
    }
}
