//! Document ingestion: turns an uploaded file into working text.
//!
//! # Overview
//!
//! 1. **Validate** the declared media type against the allow-list
//!    (plain text, PDF, `.docx`).  Anything else fails immediately.
//! 2. **Clean** the raw bytes with the remote [`DocumentCleaner`].
//! 3. **Replace** the working text with the cleaned text and invalidate the
//!    current translation.
//!
//! Only one upload may be in flight; a second one is rejected, not queued.
//!
//! [`DocumentCleaner`]: crate::service::DocumentCleaner

pub mod controller;
pub mod document;

pub use controller::IngestionController;
pub use document::{Document, MediaType, Provenance, WorkingText};

use thiserror::Error;

// ---------------------------------------------------------------------------
// IngestError
// ---------------------------------------------------------------------------

/// All errors that can surface while ingesting a document.
///
/// None of them affect the translation session's status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IngestError {
    /// The declared media type is not on the allow-list.
    #[error("Only .txt, .pdf, .docx allowed (got {0:?})")]
    UnsupportedType(String),

    /// The cleaning service rejected the document (its message), or could
    /// not be reached ("Upload failed").
    #[error("{0}")]
    CleaningFailed(String),

    /// Another document is still being cleaned.
    #[error("a document is already being processed")]
    Busy,
}
