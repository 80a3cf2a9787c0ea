//! [`IngestionController`]: validates uploads, drives the cleaning service
//! and owns the current document and working text.
//!
//! Lock order is always controller → session: every working-text change
//! invalidates the session while the controller's lock is held.

use std::sync::{Arc, Mutex};

use crate::lock_or_recover;
use crate::service::{DocumentCleaner, ServiceError};
use crate::session::{TranslationRequest, TranslationSession, ValidationError};

use super::document::{Document, Provenance, WorkingText};
use super::IngestError;

/// Notice set when a document was cleaned.
const CLEANED_NOTICE: &str = "File cleaned!";

/// Shown instead of the transport detail when the cleaning service is down.
const UPLOAD_FAILED: &str = "Upload failed";

#[derive(Debug, Default)]
struct Inner {
    document: Option<Document>,
    working_text: WorkingText,
    uploading: bool,
}

/// Owns the working text and the document it may have come from.
///
/// Any change to the working text invalidates the session's pending and
/// displayed translation.
pub struct IngestionController {
    cleaner: Arc<dyn DocumentCleaner>,
    session: Arc<TranslationSession>,
    inner: Mutex<Inner>,
}

impl IngestionController {
    pub fn new(cleaner: Arc<dyn DocumentCleaner>, session: Arc<TranslationSession>) -> Self {
        Self {
            cleaner,
            session,
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Validate `document`, send it to the cleaning service and make the
    /// cleaned text the new working text.
    ///
    /// # Errors
    ///
    /// * [`IngestError::UnsupportedType`]: declared type not allow-listed;
    ///   the cleaning service is not contacted.
    /// * [`IngestError::Busy`]: another upload is still in flight.
    /// * [`IngestError::CleaningFailed`]: the service's own message, or
    ///   "Upload failed" when it could not be reached; the working text and
    ///   document are left as they were.
    pub async fn submit(&self, document: Document) -> Result<WorkingText, IngestError> {
        let Some(media_type) = document.accepted_type() else {
            log::warn!(
                "ingest: rejected {} with unsupported type {:?}",
                document.name,
                document.media_type
            );
            return Err(IngestError::UnsupportedType(document.media_type));
        };

        let _guard = UploadGuard::acquire(self)?;
        log::info!(
            "ingest: cleaning {} ({}, {} bytes)",
            document.name,
            media_type.mime(),
            document.bytes.len()
        );

        let cleaned = match self.cleaner.clean(&document).await {
            Ok(cleaned) => cleaned,
            Err(ServiceError::Rejected(message)) => {
                log::warn!("ingest: cleaning {} rejected: {message}", document.name);
                return Err(IngestError::CleaningFailed(message));
            }
            Err(ServiceError::Unreachable(detail)) => {
                log::warn!("ingest: cleaning service unreachable for {}: {detail}", document.name);
                return Err(IngestError::CleaningFailed(UPLOAD_FAILED.into()));
            }
        };

        log::debug!(
            "ingest: {} cleaned {} → {} chars (language: {:?})",
            document.name,
            cleaned.original_size,
            cleaned.cleaned_size,
            cleaned.source_language
        );

        let working_text = WorkingText::uploaded(cleaned.text);
        {
            let mut inner = lock_or_recover(&self.inner);
            inner.document = Some(document);
            inner.working_text = working_text.clone();
            self.session.invalidate();
        }
        self.session.set_notice(CLEANED_NOTICE);

        Ok(working_text)
    }

    /// Replace the working text with typed input.
    ///
    /// Setting the same text again is a no-op and keeps the current result.
    pub fn set_text(&self, text: impl Into<String>) {
        let text = text.into();
        let mut inner = lock_or_recover(&self.inner);
        if inner.working_text.text != text {
            inner.working_text = WorkingText::typed(text);
            self.session.invalidate();
        }
    }

    /// Issue a translation request for the current working text.
    ///
    /// Runs under the same lock that guards text changes, so the request is
    /// always for the text that was current when it was issued.
    pub fn translate_working_text(
        &self,
        target_language: &str,
    ) -> Result<TranslationRequest, ValidationError> {
        let inner = lock_or_recover(&self.inner);
        self.session.translate(&inner.working_text.text, target_language)
    }

    /// Drop the current document.
    ///
    /// The working text is cleared only if it still holds that document's
    /// cleaned text; text typed over it is kept.
    pub fn remove_document(&self) -> Option<Document> {
        let mut inner = lock_or_recover(&self.inner);
        let removed = inner.document.take()?;
        let cleared = inner.working_text.provenance == Provenance::Uploaded;
        if cleared {
            inner.working_text = WorkingText::default();
            self.session.invalidate();
        }

        log::debug!("ingest: removed {} (text cleared: {cleared})", removed.name);
        Some(removed)
    }

    pub fn working_text(&self) -> WorkingText {
        lock_or_recover(&self.inner).working_text.clone()
    }

    /// Display name of the current document.
    pub fn document_name(&self) -> Option<String> {
        lock_or_recover(&self.inner)
            .document
            .as_ref()
            .map(|d| d.name.clone())
    }

    /// `true` while a document is with the cleaning service.
    pub fn is_uploading(&self) -> bool {
        lock_or_recover(&self.inner).uploading
    }
}

// ---------------------------------------------------------------------------
// UploadGuard
// ---------------------------------------------------------------------------

/// Holds the single upload slot; released on drop, including when the
/// `submit` future is dropped mid-flight.
struct UploadGuard<'a> {
    controller: &'a IngestionController,
}

impl<'a> UploadGuard<'a> {
    fn acquire(controller: &'a IngestionController) -> Result<Self, IngestError> {
        {
            let mut inner = lock_or_recover(&controller.inner);
            if inner.uploading {
                log::warn!("ingest: upload already in flight, rejecting");
                return Err(IngestError::Busy);
            }
            inner.uploading = true;
        }
        controller.session.begin_upload();
        Ok(Self { controller })
    }
}

impl Drop for UploadGuard<'_> {
    fn drop(&mut self) {
        lock_or_recover(&self.controller.inner).uploading = false;
        self.controller.session.end_upload();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use tokio::sync::oneshot;

    use crate::service::{CleanedDocument, ServiceError, TranslationReply};
    use crate::session::SessionStatus;

    // -----------------------------------------------------------------------
    // Test doubles
    // -----------------------------------------------------------------------

    /// Returns a fixed outcome and counts calls.
    struct FixedCleaner {
        outcome: Result<String, ServiceError>,
        calls: AtomicUsize,
    }

    impl FixedCleaner {
        fn ok(text: &str) -> Arc<Self> {
            Arc::new(Self {
                outcome: Ok(text.into()),
                calls: AtomicUsize::new(0),
            })
        }

        fn failing(err: ServiceError) -> Arc<Self> {
            Arc::new(Self {
                outcome: Err(err),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl DocumentCleaner for FixedCleaner {
        async fn clean(&self, _document: &Document) -> Result<CleanedDocument, ServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcome.clone().map(|text| CleanedDocument {
                cleaned_size: text.len(),
                original_size: text.len(),
                text,
                source_language: None,
            })
        }
    }

    /// Cleans every document to text naming it.
    struct NamedCleaner;

    #[async_trait]
    impl DocumentCleaner for NamedCleaner {
        async fn clean(&self, document: &Document) -> Result<CleanedDocument, ServiceError> {
            let text = format!("cleaned {}", document.name);
            Ok(CleanedDocument {
                original_size: document.bytes.len(),
                cleaned_size: text.len(),
                text,
                source_language: None,
            })
        }
    }

    /// Blocks until the test releases it.
    struct GatedCleaner {
        gate: tokio::sync::Mutex<Option<oneshot::Receiver<String>>>,
    }

    #[async_trait]
    impl DocumentCleaner for GatedCleaner {
        async fn clean(&self, _document: &Document) -> Result<CleanedDocument, ServiceError> {
            let rx = self.gate.lock().await.take();
            let text = match rx {
                Some(rx) => rx.await.map_err(|_| ServiceError::Unreachable("gate dropped".into()))?,
                None => return Err(ServiceError::Rejected("second call".into())),
            };
            Ok(CleanedDocument {
                original_size: text.len(),
                cleaned_size: text.len(),
                text,
                source_language: Some("en".into()),
            })
        }
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn txt(name: &str) -> Document {
        Document::new(name, "text/plain", b"raw bytes".to_vec())
    }

    fn controller(cleaner: Arc<dyn DocumentCleaner>) -> (IngestionController, Arc<TranslationSession>) {
        let session = Arc::new(TranslationSession::new());
        (IngestionController::new(cleaner, Arc::clone(&session)), session)
    }

    // -----------------------------------------------------------------------
    // Tests
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn unsupported_type_never_reaches_cleaner() {
        let cleaner = FixedCleaner::ok("cleaned");
        let (ctl, session) = controller(cleaner.clone());
        ctl.set_text("typed by hand");

        let doc = Document::new("photo.png", "image/png", vec![1, 2, 3]);
        let err = ctl.submit(doc).await.unwrap_err();

        assert_eq!(err, IngestError::UnsupportedType("image/png".into()));
        assert_eq!(cleaner.calls(), 0);
        assert_eq!(ctl.working_text(), WorkingText::typed("typed by hand"));
        assert_eq!(session.status(), SessionStatus::Idle);
        assert!(ctl.document_name().is_none());
    }

    #[tokio::test]
    async fn success_replaces_working_text() {
        let cleaner = FixedCleaner::ok("clean text");
        let (ctl, session) = controller(cleaner.clone());
        ctl.set_text("typed");

        let text = ctl.submit(txt("a.txt")).await.unwrap();

        assert_eq!(text, WorkingText::uploaded("clean text"));
        assert_eq!(ctl.working_text(), text);
        assert_eq!(ctl.document_name().as_deref(), Some("a.txt"));
        assert_eq!(cleaner.calls(), 1);
        assert_eq!(session.status(), SessionStatus::Idle);
        assert_eq!(session.view().notice.as_deref(), Some("File cleaned!"));
        assert!(!ctl.is_uploading());
    }

    #[tokio::test]
    async fn empty_cleaned_text_is_valid() {
        let (ctl, _session) = controller(FixedCleaner::ok(""));
        ctl.set_text("something");

        let text = ctl.submit(txt("blank.txt")).await.unwrap();
        assert_eq!(text, WorkingText::uploaded(""));
        assert_eq!(ctl.working_text().text, "");
    }

    #[tokio::test]
    async fn failure_keeps_working_text_and_returns_to_idle() {
        let cleaner = FixedCleaner::failing(ServiceError::Rejected("Only .txt, .pdf, .docx allowed".into()));
        let (ctl, session) = controller(cleaner);
        ctl.set_text("keep me");

        let err = ctl.submit(txt("a.txt")).await.unwrap_err();

        assert_eq!(
            err,
            IngestError::CleaningFailed("Only .txt, .pdf, .docx allowed".into())
        );
        assert_eq!(ctl.working_text(), WorkingText::typed("keep me"));
        assert!(ctl.document_name().is_none());
        assert_eq!(session.status(), SessionStatus::Idle);
        assert!(session.error().is_none());
    }

    #[tokio::test]
    async fn unreachable_cleaner_shows_generic_message() {
        let cleaner = FixedCleaner::failing(ServiceError::Unreachable(
            "error sending request for url (http://127.0.0.1:1/upload)".into(),
        ));
        let (ctl, session) = controller(cleaner);
        ctl.set_text("keep me");

        let err = ctl.submit(txt("a.txt")).await.unwrap_err();

        assert_eq!(err, IngestError::CleaningFailed("Upload failed".into()));
        assert_eq!(err.to_string(), "Upload failed");
        assert_eq!(ctl.working_text(), WorkingText::typed("keep me"));
        assert_eq!(session.status(), SessionStatus::Idle);
    }

    #[tokio::test]
    async fn second_document_resets_first_and_its_translation() {
        let cleaner = Arc::new(NamedCleaner);
        let (ctl, session) = controller(cleaner);

        ctl.submit(txt("a.txt")).await.unwrap();
        let first = ctl.translate_working_text("fr").unwrap();
        assert_eq!(first.source_text, "cleaned a.txt");
        assert!(session.on_result(
            first.generation,
            Ok(TranslationReply {
                translated_text: "nettoyé a.txt".into(),
                source_language: Some("en".into()),
            }),
        ));
        assert!(session.result().is_some());

        let pdf = Document::new("b.pdf", "application/pdf", vec![0x25, 0x50, 0x44, 0x46]);
        ctl.submit(pdf).await.unwrap();

        assert_eq!(ctl.document_name().as_deref(), Some("b.pdf"));
        assert_eq!(ctl.working_text(), WorkingText::uploaded("cleaned b.pdf"));
        assert!(session.result().is_none());
        assert!(!session.on_result(
            first.generation,
            Ok(TranslationReply {
                translated_text: "encore".into(),
                source_language: None,
            }),
        ));
        assert!(session.result().is_none());
    }

    #[tokio::test]
    async fn upload_invalidates_displayed_translation() {
        let (ctl, session) = controller(FixedCleaner::ok("new document text"));
        ctl.set_text("Hello");
        let g = session.translate("Hello", "fr").unwrap().generation;
        session.on_result(
            g,
            Ok(TranslationReply {
                translated_text: "Bonjour".into(),
                source_language: Some("en".into()),
            }),
        );
        assert!(session.result().is_some());

        ctl.submit(txt("b.txt")).await.unwrap();
        assert!(session.result().is_none());
    }

    #[tokio::test]
    async fn upload_makes_pending_translation_stale() {
        let (ctl, session) = controller(FixedCleaner::ok("new document text"));
        let g = session.translate("old", "fr").unwrap().generation;

        ctl.submit(txt("b.txt")).await.unwrap();

        assert!(!session.on_result(
            g,
            Ok(TranslationReply {
                translated_text: "vieux".into(),
                source_language: None,
            })
        ));
        assert!(session.result().is_none());
    }

    #[tokio::test]
    async fn second_submit_while_in_flight_is_busy() {
        let (tx, rx) = oneshot::channel();
        let cleaner = Arc::new(GatedCleaner {
            gate: tokio::sync::Mutex::new(Some(rx)),
        });
        let (ctl, session) = controller(cleaner);

        let first = ctl.submit(txt("first.txt"));
        tokio::pin!(first);

        // Drive the first submit until it parks on the gate.
        tokio::select! {
            biased;
            _ = &mut first => panic!("first upload finished before the gate opened"),
            _ = tokio::task::yield_now() => {}
        }
        assert!(ctl.is_uploading());
        assert_eq!(session.status(), SessionStatus::Uploading);

        let second = ctl.submit(txt("second.txt")).await;
        assert_eq!(second, Err(IngestError::Busy));

        tx.send("first text".into()).unwrap();
        let text = first.await.unwrap();
        assert_eq!(text.text, "first text");
        assert_eq!(ctl.document_name().as_deref(), Some("first.txt"));
        assert!(!ctl.is_uploading());
    }

    #[tokio::test]
    async fn dropped_submit_releases_the_upload_slot() {
        let (_tx, rx) = oneshot::channel::<String>();
        let cleaner = Arc::new(GatedCleaner {
            gate: tokio::sync::Mutex::new(Some(rx)),
        });
        let (ctl, session) = controller(cleaner);

        {
            let first = ctl.submit(txt("first.txt"));
            tokio::pin!(first);
            tokio::select! {
                biased;
                _ = &mut first => panic!("should be parked"),
                _ = tokio::task::yield_now() => {}
            }
            assert!(ctl.is_uploading());
        }

        assert!(!ctl.is_uploading());
        assert_eq!(session.status(), SessionStatus::Idle);
    }

    // ---- set_text / remove_document ---

    #[test]
    fn set_text_marks_provenance_typed_and_invalidates() {
        let (ctl, session) = controller(FixedCleaner::ok(""));
        let g = session.translate("Hello", "fr").unwrap().generation;

        ctl.set_text("Hello there");
        assert_eq!(ctl.working_text(), WorkingText::typed("Hello there"));
        assert_eq!(session.status(), SessionStatus::Idle);
        assert!(!session.on_result(
            g,
            Ok(TranslationReply {
                translated_text: "Bonjour".into(),
                source_language: None,
            })
        ));
    }

    #[test]
    fn setting_identical_text_keeps_result() {
        let (ctl, session) = controller(FixedCleaner::ok(""));
        ctl.set_text("Hello");
        let g = session.translate("Hello", "fr").unwrap().generation;
        session.on_result(
            g,
            Ok(TranslationReply {
                translated_text: "Bonjour".into(),
                source_language: None,
            }),
        );

        ctl.set_text("Hello");
        assert!(session.result().is_some());
    }

    #[tokio::test]
    async fn remove_document_clears_uploaded_text() {
        let (ctl, _session) = controller(FixedCleaner::ok("from file"));
        ctl.submit(txt("a.txt")).await.unwrap();

        let removed = ctl.remove_document().unwrap();
        assert_eq!(removed.name, "a.txt");
        assert_eq!(ctl.working_text(), WorkingText::default());
        assert!(ctl.document_name().is_none());
    }

    #[tokio::test]
    async fn remove_document_keeps_text_typed_over_it() {
        let (ctl, _session) = controller(FixedCleaner::ok("from file"));
        ctl.submit(txt("a.txt")).await.unwrap();
        ctl.set_text("from file, edited");

        ctl.remove_document();
        assert_eq!(ctl.working_text(), WorkingText::typed("from file, edited"));
    }

    #[test]
    fn translate_working_text_uses_current_text() {
        let (ctl, session) = controller(FixedCleaner::ok(""));
        assert_eq!(
            ctl.translate_working_text("fr"),
            Err(ValidationError::EmptyInput)
        );

        ctl.set_text("  Hello  ");
        let req = ctl.translate_working_text("fr").unwrap();
        assert_eq!(req.source_text, "Hello");
        assert_eq!(req.generation, session.latest_generation());
    }

    #[test]
    fn remove_without_document_is_noop() {
        let (ctl, _session) = controller(FixedCleaner::ok(""));
        ctl.set_text("typed");
        assert!(ctl.remove_document().is_none());
        assert_eq!(ctl.working_text().text, "typed");
    }
}
