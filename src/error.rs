use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for compote operations
#[derive(Error, Debug)]
pub enum CompoteError {
    /// IO error when reading or writing files
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Root template file does not exist or cannot be resolved
    #[error("Template not found: {path}")]
    TemplateNotFound { path: PathBuf },

    /// A referenced component file cannot be opened
    #[error("Component not found: {path} (included from {referenced_by})")]
    ComponentNotFound {
        path: PathBuf,
        referenced_by: PathBuf,
    },

    /// Directive delimiters found in an impossible arrangement
    #[error("Malformed directive at byte {position}: {message}")]
    MalformedDirective { position: usize, message: String },

    /// A component includes itself, directly or transitively
    #[error("Cyclic include: {path} (included from {referenced_by})")]
    IncludeCycle {
        path: PathBuf,
        referenced_by: PathBuf,
    },

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CompoteError>;
