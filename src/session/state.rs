//! Session status and the request / result values that flow through it.
//!
//! [`SessionStatus`] is the single authoritative phase of a session.  The
//! transitions are:
//!
//! ```text
//! Idle ──upload──▶ Uploading ──done/failed──▶ Idle (or Translating if one is pending)
//! any  ──translate──▶ Translating ──current reply──▶ Success
//!                                 ──current error──▶ Error
//! Translating ──working text replaced──▶ Idle
//! ```

/// Monotonic counter identifying how recent a translation request is.
///
/// The first request of a session gets generation `1`.
pub type Generation = u64;

/// Literal used when the service does not say which language it detected.
pub const UNKNOWN_LANGUAGE: &str = "unknown";

// ---------------------------------------------------------------------------
// SessionStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionStatus {
    /// Nothing in flight.
    #[default]
    Idle,
    /// A document is with the cleaning service.
    Uploading,
    /// The current translation request has not completed yet.
    Translating,
    /// The current request completed; a result is available.
    Success,
    /// The current request failed; an error message is available.
    Error,
}

impl SessionStatus {
    /// Returns `true` while a remote call is outstanding.
    ///
    /// ```
    /// use doc_translator::session::SessionStatus;
    ///
    /// assert!(!SessionStatus::Idle.is_busy());
    /// assert!(SessionStatus::Uploading.is_busy());
    /// assert!(SessionStatus::Translating.is_busy());
    /// assert!(!SessionStatus::Success.is_busy());
    /// assert!(!SessionStatus::Error.is_busy());
    /// ```
    pub fn is_busy(&self) -> bool {
        matches!(self, SessionStatus::Uploading | SessionStatus::Translating)
    }

    /// A short human-readable label suitable for a status banner.
    pub fn label(&self) -> &'static str {
        match self {
            SessionStatus::Idle => "Idle",
            SessionStatus::Uploading => "Processing...",
            SessionStatus::Translating => "Translating...",
            SessionStatus::Success => "Done",
            SessionStatus::Error => "Error",
        }
    }
}

// ---------------------------------------------------------------------------
// TranslationRequest
// ---------------------------------------------------------------------------

/// An issued translation request.  Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    /// Trimmed, non-empty source text.
    pub source_text: String,
    pub target_language: String,
    pub generation: Generation,
}

// ---------------------------------------------------------------------------
// TranslationResult
// ---------------------------------------------------------------------------

/// A translation accepted by the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationResult {
    pub translated_text: String,
    /// Language code reported by the service, or [`UNKNOWN_LANGUAGE`].
    pub source_language: String,
    /// Language the text was translated into.
    pub target_language: String,
    pub generation: Generation,
}

impl TranslationResult {
    /// Detected source language as shown to the user (`"en"` → `"EN"`).
    pub fn detected_language_label(&self) -> String {
        self.source_language.to_uppercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_status_is_idle() {
        assert_eq!(SessionStatus::default(), SessionStatus::Idle);
    }

    #[test]
    fn labels() {
        assert_eq!(SessionStatus::Idle.label(), "Idle");
        assert_eq!(SessionStatus::Uploading.label(), "Processing...");
        assert_eq!(SessionStatus::Translating.label(), "Translating...");
        assert_eq!(SessionStatus::Success.label(), "Done");
        assert_eq!(SessionStatus::Error.label(), "Error");
    }

    #[test]
    fn detected_language_is_upper_cased() {
        let mut result = TranslationResult {
            translated_text: "ہیلو".into(),
            source_language: "en".into(),
            target_language: "ur".into(),
            generation: 1,
        };
        assert_eq!(result.detected_language_label(), "EN");

        result.source_language = UNKNOWN_LANGUAGE.into();
        assert_eq!(result.detected_language_label(), "UNKNOWN");
    }
}
