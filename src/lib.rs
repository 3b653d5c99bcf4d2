//! # commit-index - Commit log export importer
//!
//! Reads a pre-formatted version-control log export (one `Field: value` pair per
//! line, one `Revision:` line per commit) and writes each commit as a document
//! into a searchable collection.
//!
//! ## Pipeline
//!
//! ```text
//! export file ──lines──▶ classify_line ──▶ RecordAccumulator ──records──▶ Exporter
//!                                               │                           │
//!                                     ticket + date extraction        DocumentStore
//!                                                                 (Tantivy / in-memory)
//! ```
//!
//! The [`driver::Driver`] runs the pre-flight checks (input file, store
//! reachability, collection provisioning, sanitation confirmation), streams the
//! file, and hands a [`reporter::RunOutcome`] to a [`reporter::Reporter`].
//!
//! ## Modules
//!
//! - [`parser`]: line classification, record accumulation, ticket and date extraction
//! - [`store`]: document store trait with Tantivy and in-memory backends
//! - [`exporter`]: per-record writes into one collection
//! - [`driver`]: end-to-end import run
//! - [`reporter`]: confirmation prompt and outcome presentation
//! - [`config`]: configuration with environment variable overrides
//! - [`cli`]: command-line definitions
//! - [`types`]: commit records and run summaries
//! - [`error`]: error types
//! - [`paths`]: platform data and config directories
//!
//! ## Usage Example
//!
//! ```no_run
//! use commit_index::config::Config;
//! use commit_index::driver::Driver;
//! use commit_index::reporter::AutoConfirm;
//! use commit_index::store::TantivyStore;
//! use std::path::Path;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::load(None)?;
//!     let mut store = TantivyStore::new(&config.store.index_path);
//!     let mut reporter = AutoConfirm;
//!
//!     let summary = Driver::new(&config, &mut store, &mut reporter)
//!         .run(Some(Path::new("history.log")))?;
//!     println!("imported {} commits", summary.exported);
//!     Ok(())
//! }
//! ```

/// Command-line definitions
pub mod cli;

/// Configuration management with environment variable overrides
pub mod config;

/// Import run orchestration
pub mod driver;

/// Error types
pub mod error;

/// Writes finished records into a collection
pub mod exporter;

/// Log export parsing
pub mod parser;

/// Platform-specific directories
pub mod paths;

/// Confirmation prompt and outcome presentation
pub mod reporter;

/// Document store abstraction and backends
pub mod store;

/// Core data types
pub mod types;
