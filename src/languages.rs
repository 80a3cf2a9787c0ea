//! Target languages offered to the user.

/// A selectable target language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Language {
    /// ISO 639-1 code sent to the translation service.
    pub code: &'static str,
    /// English display name.
    pub name: &'static str,
}

/// Languages offered in the picker, in display order.  The first is the
/// default.
pub const SUPPORTED_LANGUAGES: [Language; 4] = [
    Language {
        code: "ur",
        name: "Urdu",
    },
    Language {
        code: "ar",
        name: "Arabic",
    },
    Language {
        code: "fr",
        name: "French",
    },
    Language {
        code: "en",
        name: "English",
    },
];

impl Language {
    /// Look up a supported language by code (case-insensitive).
    ///
    /// ```
    /// use doc_translator::languages::Language;
    ///
    /// assert_eq!(Language::from_code("AR").map(|l| l.name), Some("Arabic"));
    /// assert!(Language::from_code("de").is_none());
    /// ```
    pub fn from_code(code: &str) -> Option<Language> {
        let code = code.trim();
        SUPPORTED_LANGUAGES
            .into_iter()
            .find(|l| l.code.eq_ignore_ascii_case(code))
    }
}
