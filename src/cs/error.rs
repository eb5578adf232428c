//! Error types for the CS documentation sync module
//!
//! This module defines custom error types using thiserror, one variant per
//! failure a request can report back to its caller.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for documentation sync operations
#[derive(Error, Debug)]
pub enum DocSyncError {
    /// IO errors (file operations, directory access, etc.)
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// JSON parsing errors (configuration files)
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// The configured root directory does not exist
    #[error("Root directory not found: {path:?}")]
    RootNotFound { path: PathBuf },

    /// A requested file resolves outside of the configured root
    #[error("File {path:?} is outside of root directory {root:?}")]
    OutsideRoot { path: PathBuf, root: PathBuf },

    /// Source file not found errors
    #[error("Source file not found: {path:?}")]
    SourceFileNotFound { path: PathBuf },

    /// A requested file does not carry the source file extension
    #[error("File {path:?} does not have the expected .{expected} extension")]
    WrongExtension { path: PathBuf, expected: String },

    /// Requested type identity is not declared in the given files
    #[error("Type '{identity}' not found")]
    TypeNotFound { identity: String },

    /// More than one documentation record matches a single declaration
    #[error("Duplicate member '{identity}' in documentation: {}", fragments.join(", "))]
    AmbiguousMember {
        identity: String,
        fragments: Vec<String>,
    },

    /// Symbol kinds without a stable documentation identity
    #[error("Symbol '{name}' of kind {kind} has no stable documentation identity")]
    UnnameableSymbol { kind: String, name: String },

    /// Tree-sitter parsing errors
    #[error("Parse error in file {file:?}: {message}")]
    Parse { file: PathBuf, message: String },

    /// Tree-sitter language setup errors
    #[error("Failed to set up tree-sitter language: {message}")]
    TreeSitterLanguage { message: String },

    /// XML parsing errors
    #[error("XML parsing error: {0}")]
    XmlParsing(#[from] quick_xml::Error),

    /// XML serialization errors
    #[error("XML write error: {message}")]
    XmlWrite { message: String },

    /// Documentation document does not follow the expected schema
    #[error("Invalid documentation document: {message}")]
    InvalidDocument { message: String },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },
}

/// Result type alias for documentation sync operations
pub type SyncResult<T> = Result<T, DocSyncError>;

impl From<std::io::Error> for DocSyncError {
    fn from(err: std::io::Error) -> Self {
        DocSyncError::Io {
            source: err,
            message: "IO operation failed".to_string(),
        }
    }
}

impl From<serde_json::Error> for DocSyncError {
    fn from(err: serde_json::Error) -> Self {
        DocSyncError::Json {
            source: err,
            message: "JSON operation failed".to_string(),
        }
    }
}

impl DocSyncError {
    /// Whether this error was raised by request validation, before any parsing
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            DocSyncError::RootNotFound { .. }
                | DocSyncError::OutsideRoot { .. }
                | DocSyncError::SourceFileNotFound { .. }
                | DocSyncError::WrongExtension { .. }
        )
    }
}

/// Helper trait for converting IO errors with context
pub trait IoContext<T> {
    fn with_io_context(self, message: &str) -> SyncResult<T>;
}

impl<T> IoContext<T> for Result<T, std::io::Error> {
    fn with_io_context(self, message: &str) -> SyncResult<T> {
        self.map_err(|e| DocSyncError::Io {
            message: message.to_string(),
            source: e,
        })
    }
}

/// Helper trait for converting JSON errors with context
pub trait JsonContext<T> {
    fn with_json_context(self, message: &str) -> SyncResult<T>;
}

impl<T> JsonContext<T> for Result<T, serde_json::Error> {
    fn with_json_context(self, message: &str) -> SyncResult<T> {
        self.map_err(|e| DocSyncError::Json {
            message: message.to_string(),
            source: e,
        })
    }
}
