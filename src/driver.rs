//! Import driver
//!
//! Runs the pre-flight checks, streams the export file through
//! classifier -> accumulator -> exporter, and turns the result into a
//! [`RunOutcome`] for the [`Reporter`].

use crate::config::{Config, ParserConfig};
use crate::error::{ConfigError, IndexerError, ParseError, UsageError};
use crate::exporter::Exporter;
use crate::parser::{DateParser, RecordAccumulator, TicketExtractor, classify_line};
use crate::reporter::{Reporter, RunOutcome, SANITATION_PROMPT};
use crate::store::{CollectionStatus, DocumentStore};
use crate::types::RunSummary;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Build an accumulator from parser settings
pub fn build_accumulator(parser: &ParserConfig) -> Result<RecordAccumulator, ConfigError> {
    let tickets =
        TicketExtractor::new(&parser.ticket_project).map_err(|e| ConfigError::InvalidValue {
            key: "parser.ticket_project".to_string(),
            reason: e.to_string(),
        })?;
    let dates = DateParser::with_formats(parser.date_formats.clone());

    Ok(RecordAccumulator::new(tickets, dates).with_merge_markers(
        parser.boundary_merge_marker.clone(),
        parser.final_merge_marker.clone(),
    ))
}

/// Feed every line of `reader` through the pipeline, exporting closed records
///
/// Line numbers are 1-based. A failure while flushing the last record is
/// reported one past the last line.
pub fn ingest_lines<B, S>(
    reader: B,
    accumulator: &mut RecordAccumulator,
    exporter: &mut Exporter<'_, S>,
) -> Result<RunSummary, IndexerError>
where
    B: BufRead,
    S: DocumentStore + ?Sized,
{
    let at = |line: usize| move |source: ParseError| IndexerError::Parse { line, source };

    let mut line_no = 0;
    for line in reader.lines() {
        line_no += 1;
        let line = line.map_err(|e| at(line_no)(e.into()))?;

        if let Some(record) = accumulator.feed(classify_line(&line)).map_err(at(line_no))? {
            exporter
                .export(&record)
                .map_err(|e| at(line_no)(e.into()))?;
        }
    }

    if let Some(record) = accumulator.finish() {
        exporter
            .export(&record)
            .map_err(|e| at(line_no + 1)(e.into()))?;
    }

    Ok(RunSummary {
        exported: exporter.exported(),
        suppressed_merges: accumulator.suppressed_merges(),
        lines_read: line_no,
        cancelled: false,
    })
}

/// One import run over a single export file
pub struct Driver<'a, S: DocumentStore + ?Sized, R: Reporter + ?Sized> {
    config: &'a Config,
    store: &'a mut S,
    reporter: &'a mut R,
    assume_yes: bool,
}

impl<'a, S: DocumentStore + ?Sized, R: Reporter + ?Sized> Driver<'a, S, R> {
    pub fn new(config: &'a Config, store: &'a mut S, reporter: &'a mut R) -> Self {
        Self {
            config,
            store,
            reporter,
            assume_yes: false,
        }
    }

    /// Skip the sanitation confirmation regardless of configuration
    pub fn assume_yes(mut self, assume_yes: bool) -> Self {
        self.assume_yes = assume_yes;
        self
    }

    /// Run the import and hand the outcome to the reporter
    pub fn execute(&mut self, input: Option<&Path>) -> RunOutcome {
        let outcome = RunOutcome::from_result(self.run(input));
        self.reporter.report(&outcome);
        outcome
    }

    /// Run the import
    ///
    /// Usage, connectivity and provisioning problems abort before anything is
    /// written. Once reading starts, the first failure aborts the run and records
    /// exported before it stay in the store.
    pub fn run(&mut self, input: Option<&Path>) -> Result<RunSummary, IndexerError> {
        let config = self.config;

        let path = input.ok_or(UsageError::MissingArgument)?;
        if !path.is_file() {
            return Err(UsageError::FileNotFound(path.display().to_string()).into());
        }

        let mut accumulator = build_accumulator(&config.parser)?;

        self.store.ping().map_err(IndexerError::Connectivity)?;

        let collection = config.store.collection.as_str();
        let status = self
            .store
            .ensure_collection(collection)
            .map_err(IndexerError::Provisioning)?;
        if status == CollectionStatus::Created {
            tracing::info!("Created collection '{}'", collection);
        }

        let ask = config.run.confirm_sanitized && !self.assume_yes;
        if ask && !self.reporter.confirm(SANITATION_PROMPT) {
            tracing::info!("Import cancelled at confirmation prompt");
            return Ok(RunSummary {
                cancelled: true,
                ..RunSummary::default()
            });
        }

        let file = File::open(path)
            .map_err(|_| UsageError::FileNotFound(path.display().to_string()))?;

        tracing::info!("Importing {} into '{}'", path.display(), collection);

        let mut exporter = Exporter::new(&mut *self.store, collection);
        let summary = ingest_lines(BufReader::new(file), &mut accumulator, &mut exporter)?;

        tracing::info!(
            "Read {} lines, exported {} commits, skipped {} merge commits",
            summary.lines_read,
            summary.exported,
            summary.suppressed_merges
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::reporter::AutoConfirm;
    use crate::store::MemoryStore;
    use std::io::{Cursor, Write};
    use tempfile::NamedTempFile;

    const TWO_COMMITS: &str = "\
Revision: r1
Author: Jane
Date: 2024-01-01T00:00:00Z
Message: SI-1 first
Modified: src/a.rs

Revision: r2
Author: John
Date: 2024-01-02T00:00:00Z
Message: second
Added: src/b.rs
";

    fn write_log(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    /// Reporter that answers with a fixed value and remembers what it was asked
    #[derive(Default)]
    struct ScriptedReporter {
        answer: bool,
        questions: Vec<String>,
        outcomes: Vec<String>,
    }

    impl Reporter for ScriptedReporter {
        fn confirm(&mut self, question: &str) -> bool {
            self.questions.push(question.to_string());
            self.answer
        }

        fn report(&mut self, outcome: &RunOutcome) {
            self.outcomes.push(outcome.message());
        }
    }

    fn accumulator() -> RecordAccumulator {
        build_accumulator(&ParserConfig::default()).unwrap()
    }

    #[test]
    fn test_ingest_lines_exports_in_order() {
        let mut store = MemoryStore::new();
        store.ensure_collection("c").unwrap();
        let mut acc = accumulator();
        let mut exporter = Exporter::new(&mut store, "c");

        let summary = ingest_lines(Cursor::new(TWO_COMMITS), &mut acc, &mut exporter).unwrap();
        assert_eq!(summary.exported, 2);
        assert_eq!(summary.lines_read, 11);

        let records = store.records("c");
        assert_eq!(records[0].id, "r1");
        assert_eq!(records[0].ticket_id, "SI-1");
        assert_eq!(records[1].id, "r2");
    }

    #[test]
    fn test_ingest_lines_reports_bad_date_line() {
        let mut store = MemoryStore::new();
        store.ensure_collection("c").unwrap();
        let mut acc = accumulator();
        let mut exporter = Exporter::new(&mut store, "c");

        let input = "Revision: r1\nMessage: m\nRevision: r2\nDate: tomorrow-ish\n";
        let err = ingest_lines(Cursor::new(input), &mut acc, &mut exporter).unwrap_err();

        assert_eq!(err.line(), Some(4));
        assert!(matches!(
            err,
            IndexerError::Parse {
                source: ParseError::InvalidDate(_),
                ..
            }
        ));
        // r1 was closed by line 3 and stays exported
        assert_eq!(store.records("c").len(), 1);
    }

    #[test]
    fn test_ingest_lines_invalid_utf8() {
        let mut store = MemoryStore::new();
        store.ensure_collection("c").unwrap();
        let mut acc = accumulator();
        let mut exporter = Exporter::new(&mut store, "c");

        let input: &[u8] = b"Revision: r1\nMessage: \xff\xfe\n";
        let err = ingest_lines(input, &mut acc, &mut exporter).unwrap_err();
        assert_eq!(err.line(), Some(2));
        assert!(matches!(
            err,
            IndexerError::Parse {
                source: ParseError::Read(_),
                ..
            }
        ));
    }

    #[test]
    fn test_final_flush_failure_reported_past_last_line() {
        let mut store = MemoryStore::new().fail_after(0);
        store.ensure_collection("c").unwrap();
        let mut acc = accumulator();
        let mut exporter = Exporter::new(&mut store, "c");

        let err = ingest_lines(Cursor::new("Revision: r1\nMessage: m\n"), &mut acc, &mut exporter)
            .unwrap_err();
        assert_eq!(err.line(), Some(3));
        assert!(matches!(
            err,
            IndexerError::Parse {
                source: ParseError::Export(StoreError::WriteFailed { .. }),
                ..
            }
        ));
    }

    #[test]
    fn test_run_missing_argument() {
        let config = Config::default();
        let mut store = MemoryStore::new();
        let mut reporter = AutoConfirm;

        let err = Driver::new(&config, &mut store, &mut reporter)
            .run(None)
            .unwrap_err();
        assert!(matches!(err, IndexerError::Usage(UsageError::MissingArgument)));
        assert!(!store.has_collection("git-commit"));
    }

    #[test]
    fn test_run_missing_file() {
        let config = Config::default();
        let mut store = MemoryStore::new();
        let mut reporter = AutoConfirm;

        let err = Driver::new(&config, &mut store, &mut reporter)
            .run(Some(Path::new("/definitely/not/here.log")))
            .unwrap_err();
        assert!(matches!(err, IndexerError::Usage(UsageError::FileNotFound(_))));
    }

    #[test]
    fn test_run_unreachable_store() {
        let log = write_log(TWO_COMMITS);
        let config = Config::default();
        let mut store = MemoryStore::new().unreachable();
        let mut reporter = AutoConfirm;

        let err = Driver::new(&config, &mut store, &mut reporter)
            .run(Some(log.path()))
            .unwrap_err();
        assert!(matches!(err, IndexerError::Connectivity(_)));
    }

    #[test]
    fn test_run_provisioning_failure_exports_nothing() {
        let log = write_log(TWO_COMMITS);
        let config = Config::default();
        let mut store = MemoryStore::new().refuse_create();
        let mut reporter = ScriptedReporter::default();

        let err = Driver::new(&config, &mut store, &mut reporter)
            .run(Some(log.path()))
            .unwrap_err();
        assert!(matches!(err, IndexerError::Provisioning(_)));
        assert!(reporter.questions.is_empty());
        assert!(store.records("git-commit").is_empty());
    }

    #[test]
    fn test_run_declined_confirmation() {
        let log = write_log(TWO_COMMITS);
        let config = Config::default();
        let mut store = MemoryStore::new();
        let mut reporter = ScriptedReporter::default();

        let outcome = Driver::new(&config, &mut store, &mut reporter).execute(Some(log.path()));

        assert!(matches!(outcome, RunOutcome::Cancelled));
        assert_eq!(reporter.questions, vec![SANITATION_PROMPT.to_string()]);
        assert!(store.records("git-commit").is_empty());
    }

    #[test]
    fn test_run_accepted_confirmation() {
        let log = write_log(TWO_COMMITS);
        let config = Config::default();
        let mut store = MemoryStore::new();
        let mut reporter = ScriptedReporter {
            answer: true,
            ..ScriptedReporter::default()
        };

        let outcome = Driver::new(&config, &mut store, &mut reporter).execute(Some(log.path()));

        assert!(matches!(outcome, RunOutcome::Imported(ref s) if s.exported == 2));
        assert_eq!(store.records("git-commit").len(), 2);
        assert_eq!(
            reporter.outcomes,
            vec!["Imported 2 commit information successfully!".to_string()]
        );
    }

    #[test]
    fn test_assume_yes_skips_prompt() {
        let log = write_log(TWO_COMMITS);
        let config = Config::default();
        let mut store = MemoryStore::new();
        let mut reporter = ScriptedReporter::default();

        let summary = Driver::new(&config, &mut store, &mut reporter)
            .assume_yes(true)
            .run(Some(log.path()))
            .unwrap();
        assert_eq!(summary.exported, 2);
        assert!(reporter.questions.is_empty());
    }

    #[test]
    fn test_config_disables_prompt() {
        let log = write_log(TWO_COMMITS);
        let mut config = Config::default();
        config.run.confirm_sanitized = false;
        let mut store = MemoryStore::new();
        let mut reporter = ScriptedReporter::default();

        let summary = Driver::new(&config, &mut store, &mut reporter)
            .run(Some(log.path()))
            .unwrap();
        assert_eq!(summary.exported, 2);
        assert!(reporter.questions.is_empty());
    }

    #[test]
    fn test_zero_records_is_nothing_imported() {
        let log = write_log("just some notes\n\nnothing: here\n");
        let config = Config::default();
        let mut store = MemoryStore::new();
        let mut reporter = AutoConfirm;

        let outcome = Driver::new(&config, &mut store, &mut reporter).execute(Some(log.path()));
        match outcome {
            RunOutcome::NothingImported(summary) => {
                assert_eq!(summary.exported, 0);
                assert_eq!(summary.lines_read, 3);
            }
            other => panic!("expected NothingImported, got {:?}", other),
        }
    }

    #[test]
    fn test_existing_collection_is_reused() {
        let log = write_log(TWO_COMMITS);
        let config = Config::default();
        let mut store = MemoryStore::new();
        store.ensure_collection("git-commit").unwrap();
        let mut reporter = AutoConfirm;

        let summary = Driver::new(&config, &mut store, &mut reporter)
            .run(Some(log.path()))
            .unwrap();
        assert_eq!(summary.exported, 2);
    }

    #[test]
    fn test_mid_stream_write_failure_keeps_earlier_records() {
        let log = write_log(TWO_COMMITS);
        let config = Config::default();
        let mut store = MemoryStore::new().fail_after(1);
        let mut reporter = AutoConfirm;

        let err = Driver::new(&config, &mut store, &mut reporter)
            .run(Some(log.path()))
            .unwrap_err();

        // r1 went out at line 7 (second Revision); r2's flush fails past the last line
        assert_eq!(err.line(), Some(12));
        assert_eq!(store.records("git-commit").len(), 1);
    }

    #[test]
    fn test_custom_ticket_project() {
        let mut parser = ParserConfig::default();
        parser.ticket_project = "ABC".to_string();
        let mut acc = build_accumulator(&parser).unwrap();

        acc.feed(classify_line("Revision: r1")).unwrap();
        acc.feed(classify_line("Message: ABC-9 and SI-1")).unwrap();
        assert_eq!(acc.current().ticket_id, "ABC-9");
    }
}
