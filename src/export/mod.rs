//! Export of a translation: clipboard copy or a downloadable text file.
//!
//! Both operations are pure functions of their inputs; nothing here keeps
//! state between calls.
//!
//! # Usage
//!
//! ```no_run
//! use doc_translator::export::{copy_to_clipboard, export_as_file, SystemClipboard};
//!
//! copy_to_clipboard(&SystemClipboard::new(), "ہیلو").expect("clipboard");
//!
//! let file = export_as_file("ہیلو", "ur");
//! assert_eq!(file.file_name, "translation_ur.txt");
//! file.save_to(std::path::Path::new(".")).expect("save");
//! ```

pub mod clipboard;

pub use clipboard::{Clipboard, SystemClipboard};

use std::path::{Path, PathBuf};

use thiserror::Error;

// ---------------------------------------------------------------------------
// ExportError
// ---------------------------------------------------------------------------

/// Export failures.  They never affect translation state.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The platform denied clipboard access.
    #[error("clipboard unavailable: {0}")]
    ClipboardUnavailable(String),

    /// The exported file could not be written.
    #[error("cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// Clipboard
// ---------------------------------------------------------------------------

/// Copy `text` to `clipboard`.  Copying the same text twice is harmless.
pub fn copy_to_clipboard(clipboard: &dyn Clipboard, text: &str) -> Result<(), ExportError> {
    clipboard.write_text(text)
}

// ---------------------------------------------------------------------------
// File export
// ---------------------------------------------------------------------------

/// A plain-text file ready to be saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    /// Suggested name, `translation_{language}.txt`.
    pub file_name: String,
    /// UTF-8 content.
    pub bytes: Vec<u8>,
}

impl ExportFile {
    /// Write the file into `dir` under its suggested name and return the
    /// full path.
    ///
    /// Only the final path component of the suggested name is used, so a
    /// language code containing separators cannot escape `dir`.
    pub fn save_to(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        let name = Path::new(&self.file_name)
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("translation.txt"));
        let path = dir.join(name);

        std::fs::write(&path, &self.bytes).map_err(|source| ExportError::Write {
            path: path.clone(),
            source,
        })?;
        log::info!("export: wrote {} bytes to {}", self.bytes.len(), path.display());
        Ok(path)
    }
}

/// Suggested file name for a translation into `target_language`.
pub fn suggested_file_name(target_language: &str) -> String {
    format!("translation_{target_language}.txt")
}

/// Build the downloadable file for `text`.
pub fn export_as_file(text: &str, target_language: &str) -> ExportFile {
    ExportFile {
        file_name: suggested_file_name(target_language),
        bytes: text.as_bytes().to_vec(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct MemoryClipboard(Mutex<Option<String>>);

    impl Clipboard for MemoryClipboard {
        fn write_text(&self, text: &str) -> Result<(), ExportError> {
            *self.0.lock().unwrap() = Some(text.to_string());
            Ok(())
        }
    }

    struct DeniedClipboard;

    impl Clipboard for DeniedClipboard {
        fn write_text(&self, _text: &str) -> Result<(), ExportError> {
            Err(ExportError::ClipboardUnavailable("access denied".into()))
        }
    }

    #[test]
    fn file_name_is_derived_from_language() {
        assert_eq!(export_as_file("x", "ur").file_name, "translation_ur.txt");
        assert_eq!(suggested_file_name("fr"), "translation_fr.txt");
    }

    #[test]
    fn export_is_byte_identical_across_calls() {
        let a = export_as_file("مرحبا بالعالم", "ar");
        let b = export_as_file("مرحبا بالعالم", "ar");
        assert_eq!(a, b);
        assert_eq!(a.bytes, "مرحبا بالعالم".as_bytes());
    }

    #[test]
    fn save_to_writes_under_suggested_name() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = export_as_file("Bonjour", "fr").save_to(dir.path()).unwrap();

        assert_eq!(path, dir.path().join("translation_fr.txt"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), "Bonjour");
    }

    #[test]
    fn save_to_cannot_escape_directory() {
        let dir = tempfile::tempdir().expect("temp dir");
        let file = ExportFile {
            file_name: "../../etc/evil.txt".into(),
            bytes: b"x".to_vec(),
        };
        let path = file.save_to(dir.path()).unwrap();
        assert_eq!(path, dir.path().join("evil.txt"));
    }

    #[test]
    fn save_to_missing_dir_is_write_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let err = export_as_file("x", "en")
            .save_to(&dir.path().join("missing"))
            .unwrap_err();
        assert!(matches!(err, ExportError::Write { .. }));
    }

    #[test]
    fn copy_writes_text() {
        let clipboard = MemoryClipboard(Mutex::new(None));
        copy_to_clipboard(&clipboard, "ہیلو").unwrap();
        copy_to_clipboard(&clipboard, "ہیلو").unwrap();
        assert_eq!(clipboard.0.lock().unwrap().as_deref(), Some("ہیلو"));
    }

    #[test]
    fn denied_clipboard_is_reported() {
        let err = copy_to_clipboard(&DeniedClipboard, "text").unwrap_err();
        assert!(matches!(err, ExportError::ClipboardUnavailable(_)));
    }
}
