//! Story document import/export.
//!
//! # Responsibility
//! - Read the JSON story document once at startup.
//! - Serialize the in-memory collection for export.
//!
//! # Invariants
//! - A missing or malformed document degrades to an empty collection; the
//!   failure is logged, never surfaced as a fatal error.
//! - Export is pretty-printed with 2-space indentation in input shape.
//! - There is no write-back to the source document.

mod json;

pub use json::{
    export_document, load_document, parse_document, write_export, LoadStatus, LoadedDocument,
};

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// File name offered for exported documents.
pub const DEFAULT_DOCUMENT_NAME: &str = "stories.json";

pub type DocumentResult<T> = Result<T, DocumentError>;

#[derive(Debug)]
pub enum DocumentError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Json(serde_json::Error),
}

impl Display for DocumentError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "story document `{}`: {source}", path.display()),
            Self::Json(err) => write!(f, "story document is not valid: {err}"),
        }
    }
}

impl Error for DocumentError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for DocumentError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}
