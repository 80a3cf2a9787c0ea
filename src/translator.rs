//! [`Translator`]: the public face of the orchestrator.
//!
//! Wires the ingestion controller, translation session, speech dispatcher
//! and export helpers together, and exposes a [`Snapshot`] of everything a
//! presentation layer needs to render.
//!
//! # Flow
//!
//! ```text
//! set_text / upload ──▶ working text ──▶ translate(target)
//!                                            │
//!                              TranslationSession (last request wins)
//!                                            │
//!                                 TranslationResult ──▶ speak / copy / export
//! ```
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use doc_translator::config::AppConfig;
//! use doc_translator::export::SystemClipboard;
//! use doc_translator::service::HttpBackend;
//! use doc_translator::Translator;
//!
//! # async fn example() {
//! let config = AppConfig::default();
//! let backend = Arc::new(HttpBackend::from_config(&config.service));
//! let translator = Translator::new(backend.clone(), backend, Arc::new(SystemClipboard::new()));
//!
//! translator.set_text("Hello");
//! if let Ok(Some(result)) = translator.translate("ur").await {
//!     println!("[{}] {}", result.detected_language_label(), result.translated_text);
//! }
//! # }
//! ```

use std::sync::Arc;

use crate::export::{copy_to_clipboard, export_as_file, Clipboard, ExportError, ExportFile};
use crate::ingest::{Document, IngestError, IngestionController, WorkingText};
use crate::service::{DocumentCleaner, TranslationService};
use crate::session::{SessionStatus, TranslateError, TranslationResult, TranslationSession};
use crate::speech::{SpeechDispatcher, SpeechError, VoiceDescriptor};

/// Notice set after a successful clipboard copy.
const COPIED_NOTICE: &str = "Copied!";

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// Everything the presentation layer reads, taken at one point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub status: SessionStatus,
    pub working_text: WorkingText,
    /// Name of the uploaded document the working text may have come from.
    pub document_name: Option<String>,
    pub result: Option<TranslationResult>,
    pub error: Option<TranslateError>,
    /// Short success banner ("Translated!", "File cleaned!", "Copied!").
    pub notice: Option<String>,
    /// A document is with the cleaning service.  Can be `true` while the
    /// status is `Translating`.
    pub uploading: bool,
}

// ---------------------------------------------------------------------------
// Translator
// ---------------------------------------------------------------------------

pub struct Translator {
    session: Arc<TranslationSession>,
    ingest: IngestionController,
    service: Arc<dyn TranslationService>,
    speech: Option<SpeechDispatcher>,
    clipboard: Arc<dyn Clipboard>,
}

impl Translator {
    /// Create a translator without speech playback.
    pub fn new(
        cleaner: Arc<dyn DocumentCleaner>,
        service: Arc<dyn TranslationService>,
        clipboard: Arc<dyn Clipboard>,
    ) -> Self {
        let session = Arc::new(TranslationSession::new());
        Self {
            ingest: IngestionController::new(cleaner, Arc::clone(&session)),
            session,
            service,
            speech: None,
            clipboard,
        }
    }

    /// Enable speech playback through `dispatcher`.
    pub fn with_speech(mut self, dispatcher: SpeechDispatcher) -> Self {
        self.speech = Some(dispatcher);
        self
    }

    pub fn snapshot(&self) -> Snapshot {
        let working_text = self.ingest.working_text();
        let document_name = self.ingest.document_name();
        let uploading = self.ingest.is_uploading();
        let view = self.session.view();
        Snapshot {
            status: view.status,
            working_text,
            document_name,
            result: view.result,
            error: view.error,
            notice: view.notice,
            uploading,
        }
    }

    // -----------------------------------------------------------------------
    // Input
    // -----------------------------------------------------------------------

    /// Replace the working text with typed input.
    pub fn set_text(&self, text: impl Into<String>) {
        self.ingest.set_text(text);
    }

    /// Upload a document and make its cleaned text the working text.
    pub async fn upload(&self, document: Document) -> Result<WorkingText, IngestError> {
        self.ingest.submit(document).await
    }

    /// Forget the uploaded document (see [`IngestionController::remove_document`]).
    pub fn remove_document(&self) -> Option<Document> {
        self.ingest.remove_document()
    }

    // -----------------------------------------------------------------------
    // Translation
    // -----------------------------------------------------------------------

    /// Translate the working text into `target_language`.
    ///
    /// * `Ok(Some(result))`: this request was the latest and succeeded.
    /// * `Ok(None)`: a newer request or a text change superseded this one
    ///   while it was in flight; its reply was dropped.
    /// * `Err(_)`: validation failed (nothing was sent), or this request
    ///   was the latest and failed.
    pub async fn translate(
        &self,
        target_language: &str,
    ) -> Result<Option<TranslationResult>, TranslateError> {
        let request = self.ingest.translate_working_text(target_language)?;
        let generation = request.generation;

        let outcome = self.service.translate(&request).await;
        let failure = outcome.as_ref().err().cloned();

        if !self.session.on_result(generation, outcome) {
            return Ok(None);
        }
        match failure {
            Some(e) => Err(e.into()),
            None => Ok(self
                .session
                .result()
                .filter(|r| r.generation == generation)),
        }
    }

    // -----------------------------------------------------------------------
    // Output
    // -----------------------------------------------------------------------

    /// Speak the current result in its target language.
    ///
    /// Returns `Ok(None)` without speaking when there is no result.
    pub fn speak_result(&self) -> Result<Option<VoiceDescriptor>, SpeechError> {
        let Some(result) = self.session.result() else {
            return Ok(None);
        };
        let Some(speech) = &self.speech else {
            return Err(SpeechError::Unavailable("speech playback is disabled".into()));
        };
        speech.speak(&result.translated_text, &result.target_language)
    }

    /// Stop any playback started by [`speak_result`](Self::speak_result).
    pub fn stop_speaking(&self) {
        if let Some(speech) = &self.speech {
            speech.stop();
        }
    }

    pub fn is_speaking(&self) -> bool {
        self.speech.as_ref().is_some_and(SpeechDispatcher::is_speaking)
    }

    /// Copy the current result to the clipboard.
    ///
    /// Returns `Ok(false)` when there is nothing to copy.
    pub fn copy_result(&self) -> Result<bool, ExportError> {
        let Some(result) = self.session.result() else {
            return Ok(false);
        };
        copy_to_clipboard(self.clipboard.as_ref(), &result.translated_text)?;
        self.session.set_notice(COPIED_NOTICE);
        Ok(true)
    }

    /// The current result as a downloadable file, if there is one.
    pub fn export_result(&self) -> Option<ExportFile> {
        self.session
            .result()
            .map(|r| export_as_file(&r.translated_text, &r.target_language))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
