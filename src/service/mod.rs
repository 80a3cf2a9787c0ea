//! Remote collaborators: the document-cleaning and translation services.
//!
//! This module provides:
//! * [`DocumentCleaner`]: async trait for the cleaning endpoint.
//! * [`TranslationService`]: async trait for the translation endpoint.
//! * [`HttpBackend`]: `reqwest` implementation of both against the
//!   translator backend's `/upload` and `/translate` routes.
//! * [`ServiceError`]: transport vs. structured-rejection failures.
//!
//! Both traits are object-safe and `Send + Sync` so the orchestrator can hold
//! them as `Arc<dyn …>` and tests can swap in doubles.

pub mod http;

use async_trait::async_trait;
use thiserror::Error;

use crate::ingest::Document;
use crate::session::TranslationRequest;

pub use http::HttpBackend;

// ---------------------------------------------------------------------------
// ServiceError
// ---------------------------------------------------------------------------

/// Failure reported by a remote collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// Connection refused, timeout, or the response body could not be read.
    #[error("service unreachable: {0}")]
    Unreachable(String),

    /// The service answered with a non-2xx status or an explicit error
    /// payload.  Carries the human-readable message to show verbatim.
    #[error("{0}")]
    Rejected(String),
}

impl From<reqwest::Error> for ServiceError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ServiceError::Rejected(format!("malformed response: {e}"))
        } else {
            ServiceError::Unreachable(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Reply types
// ---------------------------------------------------------------------------

/// Successful response of the cleaning service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanedDocument {
    /// Normalised plain text.  May be empty.
    pub text: String,
    /// Length of the text extracted before cleaning.
    pub original_size: usize,
    /// Length of `text`.
    pub cleaned_size: usize,
    /// Language guessed by the service, when it could tell.
    pub source_language: Option<String>,
}

/// Successful response of the translation service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationReply {
    pub translated_text: String,
    pub source_language: Option<String>,
}

// ---------------------------------------------------------------------------
// Collaborator traits
// ---------------------------------------------------------------------------

/// Turns an uploaded document into clean plain text.
#[async_trait]
pub trait DocumentCleaner: Send + Sync {
    async fn clean(&self, document: &Document) -> Result<CleanedDocument, ServiceError>;
}

/// Translates text into a target language.
///
/// Implementations must not retry; a failed call is reported once.
#[async_trait]
pub trait TranslationService: Send + Sync {
    async fn translate(
        &self,
        request: &TranslationRequest,
    ) -> Result<TranslationReply, ServiceError>;
}
