//! Translation session: owns the "last request wins" lifecycle.
//!
//! # Architecture
//!
//! ```text
//! translate(text, target)
//!        │  validate, allocate generation G, status = Translating
//!        ▼
//! TranslationRequest { G } ──▶ TranslationService (caller awaits)
//!                                      │
//! on_result(G, outcome) ◀──────────────┘
//!        │
//!        ├─ G is not the pending generation → dropped, nothing changes
//!        └─ G is pending → Success(result) | Error(message)
//! ```
//!
//! The session never cancels a request at the transport level.  Issuing a
//! new request (or replacing the working text) only makes the previous
//! generation obsolete, and its completion is ignored when it arrives.

pub mod lifecycle;
pub mod state;

use thiserror::Error;

use crate::service::ServiceError;

pub use lifecycle::{SessionView, TranslationSession};
pub use state::{
    Generation, SessionStatus, TranslationRequest, TranslationResult, UNKNOWN_LANGUAGE,
};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Input rejected before any collaborator is contacted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Source text is empty after trimming.
    #[error("Enter text or upload a file.")]
    EmptyInput,

    /// Target language code is empty after trimming.
    #[error("Choose a target language.")]
    MissingTargetLanguage,
}

/// Why a translation did not produce a result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslateError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Transport-level failure.  The detail is logged, not shown.
    #[error("Backend not reachable")]
    ServiceUnreachable,

    /// The service answered with an error; the message is shown verbatim.
    #[error("{0}")]
    ServiceRejected(String),
}

impl From<ServiceError> for TranslateError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Unreachable(_) => TranslateError::ServiceUnreachable,
            ServiceError::Rejected(message) if message.trim().is_empty() => {
                TranslateError::ServiceRejected("Translation failed".into())
            }
            ServiceError::Rejected(message) => TranslateError::ServiceRejected(message),
        }
    }
}
