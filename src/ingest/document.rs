//! Uploaded documents, their media types, and the working text.

use std::path::Path;

// ---------------------------------------------------------------------------
// MediaType
// ---------------------------------------------------------------------------

/// Document types the cleaning service accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaType {
    PlainText,
    Pdf,
    /// Word-processing XML (`.docx`).
    Docx,
}

impl MediaType {
    /// The allow-list, in display order.
    pub const ALLOWED: [MediaType; 3] = [MediaType::PlainText, MediaType::Pdf, MediaType::Docx];

    /// Canonical MIME type.
    pub fn mime(&self) -> &'static str {
        match self {
            MediaType::PlainText => "text/plain",
            MediaType::Pdf => "application/pdf",
            MediaType::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
        }
    }

    /// File extension without the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            MediaType::PlainText => "txt",
            MediaType::Pdf => "pdf",
            MediaType::Docx => "docx",
        }
    }

    /// Match a declared MIME type against the allow-list.
    ///
    /// Comparison ignores case and any parameters (`text/plain; charset=utf-8`
    /// is plain text).
    ///
    /// ```
    /// use doc_translator::ingest::MediaType;
    ///
    /// assert_eq!(MediaType::from_mime("text/plain; charset=utf-8"), Some(MediaType::PlainText));
    /// assert_eq!(MediaType::from_mime("image/png"), None);
    /// ```
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or_default().trim();
        Self::ALLOWED
            .into_iter()
            .find(|t| t.mime().eq_ignore_ascii_case(essence))
    }

    /// Guess the media type from a file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        Self::ALLOWED
            .into_iter()
            .find(|t| t.extension().eq_ignore_ascii_case(ext))
    }
}

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// MIME type declared for files whose extension we don't recognise.
const UNKNOWN_MIME: &str = "application/octet-stream";

/// A file handed to the ingestion controller.
///
/// `media_type` is whatever the caller declared; it is only checked against
/// the allow-list when the document is submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Display name, usually the file name.
    pub name: String,
    /// Declared MIME type.
    pub media_type: String,
    /// Raw file content.
    pub bytes: Vec<u8>,
}

impl Document {
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            bytes,
        }
    }

    /// Read a document from disk, declaring its type from the extension.
    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let media_type = MediaType::from_path(path)
            .map(|t| t.mime())
            .unwrap_or(UNKNOWN_MIME);

        Ok(Self::new(name, media_type, bytes))
    }

    /// The allow-listed type this document declares, if any.
    pub fn accepted_type(&self) -> Option<MediaType> {
        MediaType::from_mime(&self.media_type)
    }
}

// ---------------------------------------------------------------------------
// WorkingText
// ---------------------------------------------------------------------------

/// Where the working text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Provenance {
    /// Typed (or pasted) by the user.
    #[default]
    Typed,
    /// Produced by cleaning an uploaded document.
    Uploaded,
}

/// The text currently considered authoritative for translation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WorkingText {
    pub text: String,
    pub provenance: Provenance,
}

impl WorkingText {
    pub fn typed(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            provenance: Provenance::Typed,
        }
    }

    pub fn uploaded(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            provenance: Provenance::Uploaded,
        }
    }

    /// `true` when there is nothing but whitespace to translate.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}
