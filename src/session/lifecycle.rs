//! [`TranslationSession`]: generation tracking and race-safe result
//! application.
//!
//! All state lives behind one `Mutex` that is only held for short,
//! non-`await`ing critical sections, so the session can be shared as
//! `Arc<TranslationSession>` between the ingestion controller, the
//! orchestrator and any number of concurrently running requests.

use std::sync::Mutex;

use crate::lock_or_recover;
use crate::service::{ServiceError, TranslationReply};

use super::state::{
    Generation, SessionStatus, TranslationRequest, TranslationResult, UNKNOWN_LANGUAGE,
};
use super::{TranslateError, ValidationError};

/// Notice set when a translation lands.
const TRANSLATED_NOTICE: &str = "Translated!";

// ---------------------------------------------------------------------------
// SessionView
// ---------------------------------------------------------------------------

/// Consistent read-only copy of the session state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionView {
    pub status: SessionStatus,
    /// Highest generation issued so far (`0` before the first request).
    pub latest_generation: Generation,
    pub result: Option<TranslationResult>,
    pub error: Option<TranslateError>,
    pub notice: Option<String>,
}

// ---------------------------------------------------------------------------
// TranslationSession
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct Inner {
    status: SessionStatus,
    issued: Generation,
    /// The only request whose completion may still change state.
    pending: Option<TranslationRequest>,
    result: Option<TranslationResult>,
    error: Option<TranslateError>,
    notice: Option<String>,
}

/// Owns the single authoritative translation lifecycle.
#[derive(Debug, Default)]
pub struct TranslationSession {
    inner: Mutex<Inner>,
}

impl TranslationSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a new request for `text` → `target_language`.
    ///
    /// Allocates the next generation and marks any pending request obsolete.
    /// The caller sends the returned request to the translation service and
    /// reports the outcome through [`on_result`](Self::on_result).
    ///
    /// # Errors
    ///
    /// [`ValidationError::EmptyInput`] if `text` is blank,
    /// [`ValidationError::MissingTargetLanguage`] if the target is blank.
    /// No generation is allocated and the status is left alone.
    pub fn translate(
        &self,
        text: &str,
        target_language: &str,
    ) -> Result<TranslationRequest, ValidationError> {
        let source_text = text.trim();
        if source_text.is_empty() {
            log::debug!("session: refusing to translate blank input");
            return Err(ValidationError::EmptyInput);
        }
        let target_language = target_language.trim();
        if target_language.is_empty() {
            return Err(ValidationError::MissingTargetLanguage);
        }

        let mut inner = lock_or_recover(&self.inner);
        inner.issued += 1;
        let request = TranslationRequest {
            source_text: source_text.to_string(),
            target_language: target_language.to_string(),
            generation: inner.issued,
        };

        if let Some(previous) = inner.pending.replace(request.clone()) {
            log::debug!(
                "session: generation {} supersedes {}",
                request.generation,
                previous.generation
            );
        }
        inner.status = SessionStatus::Translating;
        inner.error = None;
        inner.notice = None;

        log::debug!(
            "session: issued generation {} → {}",
            request.generation,
            request.target_language
        );
        Ok(request)
    }

    /// Apply the completion of request `generation`.
    ///
    /// Returns `true` when the completion was applied.  A completion for any
    /// generation other than the pending one is dropped without touching the
    /// status, result or error.
    pub fn on_result(
        &self,
        generation: Generation,
        outcome: Result<TranslationReply, ServiceError>,
    ) -> bool {
        let mut inner = lock_or_recover(&self.inner);

        let request = match inner.pending.take() {
            Some(request) if request.generation == generation => request,
            other => {
                log::debug!(
                    "session: dropping stale completion for generation {generation} (pending: {:?})",
                    other.as_ref().map(|r| r.generation)
                );
                inner.pending = other;
                return false;
            }
        };

        match outcome {
            Ok(reply) => {
                let source_language = reply
                    .source_language
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .unwrap_or_else(|| UNKNOWN_LANGUAGE.to_string());

                log::info!(
                    "session: generation {generation} translated ({} → {})",
                    source_language,
                    request.target_language
                );

                inner.result = Some(TranslationResult {
                    translated_text: reply.translated_text,
                    source_language,
                    target_language: request.target_language,
                    generation,
                });
                inner.error = None;
                inner.notice = Some(TRANSLATED_NOTICE.to_string());
                inner.status = SessionStatus::Success;
            }
            Err(e) => {
                log::warn!("session: generation {generation} failed: {e}");
                inner.result = None;
                inner.error = Some(TranslateError::from(e));
                inner.status = SessionStatus::Error;
            }
        }
        true
    }

    /// The working text changed: forget the displayed result and make any
    /// pending request obsolete.
    pub fn invalidate(&self) {
        let mut inner = lock_or_recover(&self.inner);
        if let Some(request) = inner.pending.take() {
            log::debug!(
                "session: generation {} invalidated by new working text",
                request.generation
            );
        }
        inner.result = None;
        inner.error = None;
        if matches!(
            inner.status,
            SessionStatus::Translating | SessionStatus::Success | SessionStatus::Error
        ) {
            inner.status = SessionStatus::Idle;
        }
    }

    /// A document upload started.
    pub fn begin_upload(&self) {
        let mut inner = lock_or_recover(&self.inner);
        inner.status = SessionStatus::Uploading;
        inner.notice = None;
    }

    /// A document upload finished, successfully or not.
    ///
    /// Ingestion never moves the session to `Error`; it returns to `Idle`,
    /// or to `Translating` if a request is still pending.  If a translation
    /// completed during the upload its status is kept.
    pub fn end_upload(&self) {
        let mut inner = lock_or_recover(&self.inner);
        if inner.status == SessionStatus::Uploading {
            inner.status = if inner.pending.is_some() {
                SessionStatus::Translating
            } else {
                SessionStatus::Idle
            };
        }
    }

    /// Replace the transient status notice.
    pub fn set_notice(&self, notice: impl Into<String>) {
        lock_or_recover(&self.inner).notice = Some(notice.into());
    }

    pub fn status(&self) -> SessionStatus {
        lock_or_recover(&self.inner).status
    }

    /// The accepted result, if the latest completed request succeeded.
    pub fn result(&self) -> Option<TranslationResult> {
        lock_or_recover(&self.inner).result.clone()
    }

    pub fn error(&self) -> Option<TranslateError> {
        lock_or_recover(&self.inner).error.clone()
    }

    pub fn latest_generation(&self) -> Generation {
        lock_or_recover(&self.inner).issued
    }

    /// Take a consistent copy of the whole state.
    pub fn view(&self) -> SessionView {
        let inner = lock_or_recover(&self.inner);
        SessionView {
            status: inner.status,
            latest_generation: inner.issued,
            result: inner.result.clone(),
            error: inner.error.clone(),
            notice: inner.notice.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
