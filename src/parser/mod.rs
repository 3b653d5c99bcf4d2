//! Log export parsing
//!
//! Turns the flat `Field: value` lines of a log export into [`CommitRecord`]s.
//! Classification is line-local; grouping into records happens in the
//! [`RecordAccumulator`].
//!
//! [`CommitRecord`]: crate::types::CommitRecord

/// Record accumulation state machine
pub mod accumulator;
/// Single-line classification by field prefix
pub mod classifier;
/// Date/time text parsing
pub mod date;
/// Ticket identifier extraction from commit messages
pub mod ticket;

pub use accumulator::RecordAccumulator;
pub use classifier::{ClassifiedLine, FieldKind, classify_line};
pub use date::DateParser;
pub use ticket::TicketExtractor;
