/// Centralized error types for commit-index using thiserror
///
/// Every error is terminal for a run. The variants of [`IndexerError`] map onto the
/// distinct ways an import can stop: bad invocation, unreachable store, collection
/// that cannot be provisioned, or a failure while processing a specific input line.
use thiserror::Error;

/// Main error type for an import run
#[derive(Error, Debug)]
pub enum IndexerError {
    #[error("Usage error: {0}")]
    Usage(#[from] UsageError),

    #[error("Document store is not reachable: {0}")]
    Connectivity(#[source] StoreError),

    #[error("Unable to create / find the target index: {0}")]
    Provisioning(#[source] StoreError),

    #[error("Unable to process log, problem in line# {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: ParseError,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors caused by how the program was invoked
#[derive(Error, Debug)]
pub enum UsageError {
    #[error("A fully qualified file name is expected as a command line argument")]
    MissingArgument,

    #[error("File \"{0}\" is not found or not accessible")]
    FileNotFound(String),
}

/// Errors raised by a document store backend
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store unreachable: {0}")]
    Unreachable(String),

    #[error("Failed to create collection '{collection}': {reason}")]
    CollectionCreationFailed { collection: String, reason: String },

    #[error("Collection '{0}' not found")]
    CollectionNotFound(String),

    #[error("Invalid collection name '{0}'")]
    InvalidCollectionName(String),

    #[error("Failed to write document '{id}': {reason}")]
    WriteFailed { id: String, reason: String },

    #[error("Failed to search collection '{collection}': {reason}")]
    SearchFailed { collection: String, reason: String },
}

/// Errors raised while turning one input line into record state
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("String '{0}' was not recognized as a valid date")]
    InvalidDate(String),

    #[error("Failed to read line: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to export record: {0}")]
    Export(#[from] StoreError),
}

/// Errors related to configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration file: {0}")]
    LoadFailed(String),

    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    #[error("Invalid configuration value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("Configuration file not found: {0}")]
    FileNotFound(String),
}

impl IndexerError {
    /// Line number (1-based) at which processing failed, for parse errors
    pub fn line(&self) -> Option<usize> {
        match self {
            IndexerError::Parse { line, .. } => Some(*line),
            _ => None,
        }
    }

    /// Check if this error was caused by the invocation rather than the data or store
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            IndexerError::Usage(_) | IndexerError::Config(ConfigError::InvalidValue { .. })
        )
    }

    /// Render the error with its full source chain, one cause per line
    pub fn to_report_string(&self) -> String {
        let mut out = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            let text = cause.to_string();
            if !out.contains(&text) {
                out.push_str("\n  caused by: ");
                out.push_str(&text);
            }
            source = cause.source();
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_error_display() {
        let err = IndexerError::Usage(UsageError::FileNotFound("/tmp/log.txt".to_string()));
        assert_eq!(
            err.to_string(),
            "Usage error: File \"/tmp/log.txt\" is not found or not accessible"
        );
    }

    #[test]
    fn test_parse_error_carries_line() {
        let err = IndexerError::Parse {
            line: 42,
            source: ParseError::InvalidDate("yesterday".to_string()),
        };
        assert_eq!(err.line(), Some(42));
        assert_eq!(
            err.to_string(),
            "Unable to process log, problem in line# 42: String 'yesterday' was not recognized as a valid date"
        );
    }

    #[test]
    fn test_line_is_none_for_other_errors() {
        let err = IndexerError::Usage(UsageError::MissingArgument);
        assert_eq!(err.line(), None);
    }

    #[test]
    fn test_is_usage_error() {
        assert!(IndexerError::Usage(UsageError::MissingArgument).is_usage_error());

        let config_err = IndexerError::Config(ConfigError::InvalidValue {
            key: "store.collection".to_string(),
            reason: "must not be empty".to_string(),
        });
        assert!(config_err.is_usage_error());

        let store_err =
            IndexerError::Connectivity(StoreError::Unreachable("no such dir".to_string()));
        assert!(!store_err.is_usage_error());
    }

    #[test]
    fn test_collection_creation_display() {
        let err = StoreError::CollectionCreationFailed {
            collection: "git-commit".to_string(),
            reason: "permission denied".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to create collection 'git-commit': permission denied"
        );
    }

    #[test]
    fn test_report_string_includes_cause() {
        let err = IndexerError::Parse {
            line: 7,
            source: ParseError::Export(StoreError::WriteFailed {
                id: "abc".to_string(),
                reason: "disk full".to_string(),
            }),
        };
        let report = err.to_report_string();
        assert!(report.contains("line# 7"));
        assert!(report.contains("disk full"));
    }

    #[test]
    fn test_read_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::InvalidData, "stream did not contain valid UTF-8");
        let parse_err: ParseError = io_err.into();
        assert!(matches!(parse_err, ParseError::Read(_)));
    }
}
