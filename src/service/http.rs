//! `HttpBackend`: talks to the translator backend over HTTP.
//!
//! * Cleaning: `POST {base_url}/upload`, multipart field `file`.
//!   Success body `{cleaned_text, original_size, cleaned_size, source_lang?}`,
//!   failure body `{detail}`.
//! * Translation: `POST {base_url}/translate`, JSON `{text, target_lang}`.
//!   Success body `{translated_text, source_lang?}`, failure body `{error}`.
//!
//! All connection details come from [`ServiceConfig`]; nothing is hardcoded.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::ServiceConfig;
use crate::ingest::Document;
use crate::session::TranslationRequest;

use super::{CleanedDocument, DocumentCleaner, ServiceError, TranslationReply, TranslationService};

const UPLOAD_FALLBACK: &str = "Upload failed";
const TRANSLATE_FALLBACK: &str = "Translation failed";

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct TranslatePayload<'a> {
    text: &'a str,
    target_lang: &'a str,
}

#[derive(Debug, Deserialize)]
struct TranslateBody {
    translated_text: Option<String>,
    source_lang: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UploadBody {
    cleaned_text: Option<String>,
    #[serde(default)]
    original_size: usize,
    #[serde(default)]
    cleaned_size: usize,
    source_lang: Option<String>,
}

/// FastAPI puts a string here for `HTTPException`s and a list of objects for
/// request-validation failures, so keep it loosely typed.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<serde_json::Value>,
    error: Option<String>,
}

// ---------------------------------------------------------------------------
// HttpBackend
// ---------------------------------------------------------------------------

/// `reqwest`-backed implementation of both collaborator traits.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    config: ServiceConfig,
}

impl HttpBackend {
    /// Build a backend from config.
    ///
    /// The HTTP client is pre-configured with the per-request timeout from
    /// `config.timeout_secs`; a default client is used if the builder fails.
    pub fn from_config(config: &ServiceConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config: config.clone(),
        }
    }
}

#[async_trait]
impl DocumentCleaner for HttpBackend {
    async fn clean(&self, document: &Document) -> Result<CleanedDocument, ServiceError> {
        let part = reqwest::multipart::Part::bytes(document.bytes.clone())
            .file_name(document.name.clone())
            .mime_str(&document.media_type)
            .map_err(|e| ServiceError::Rejected(format!("invalid media type: {e}")))?;
        let form = reqwest::multipart::Form::new().part("file", part);

        log::debug!(
            "http: uploading {} ({} bytes) to {}",
            document.name,
            document.bytes.len(),
            self.config.upload_url()
        );

        let response = self
            .client
            .post(self.config.upload_url())
            .multipart(form)
            .send()
            .await?;
        let success = response.status().is_success();
        let body = response.text().await?;

        parse_upload_response(success, &body)
    }
}

#[async_trait]
impl TranslationService for HttpBackend {
    async fn translate(
        &self,
        request: &TranslationRequest,
    ) -> Result<TranslationReply, ServiceError> {
        let payload = TranslatePayload {
            text: &request.source_text,
            target_lang: &request.target_language,
        };

        log::debug!(
            "http: translate generation {} → {} ({} chars)",
            request.generation,
            request.target_language,
            request.source_text.chars().count()
        );

        let response = self
            .client
            .post(self.config.translate_url())
            .json(&payload)
            .send()
            .await?;
        let success = response.status().is_success();
        let body = response.text().await?;

        parse_translate_response(success, &body)
    }
}

// ---------------------------------------------------------------------------
// Response parsing
// ---------------------------------------------------------------------------

fn parse_upload_response(success: bool, body: &str) -> Result<CleanedDocument, ServiceError> {
    if !success {
        return Err(ServiceError::Rejected(error_message(body, UPLOAD_FALLBACK)));
    }

    let parsed: UploadBody = serde_json::from_str(body)
        .map_err(|e| ServiceError::Rejected(format!("malformed response: {e}")))?;

    Ok(CleanedDocument {
        text: parsed.cleaned_text.unwrap_or_default(),
        original_size: parsed.original_size,
        cleaned_size: parsed.cleaned_size,
        source_language: parsed.source_lang,
    })
}

fn parse_translate_response(success: bool, body: &str) -> Result<TranslationReply, ServiceError> {
    if !success {
        return Err(ServiceError::Rejected(error_message(body, TRANSLATE_FALLBACK)));
    }

    let parsed: TranslateBody = serde_json::from_str(body)
        .map_err(|e| ServiceError::Rejected(format!("malformed response: {e}")))?;

    match (parsed.translated_text, parsed.error) {
        (Some(translated_text), _) => Ok(TranslationReply {
            translated_text,
            source_language: parsed.source_lang,
        }),
        (None, Some(error)) if !error.trim().is_empty() => Err(ServiceError::Rejected(error)),
        (None, _) => Err(ServiceError::Rejected(TRANSLATE_FALLBACK.into())),
    }
}

/// Pull a human-readable message out of an error body, or use `fallback`.
fn error_message(body: &str, fallback: &str) -> String {
    let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) else {
        return fallback.to_string();
    };

    let detail = match parsed.detail {
        Some(serde_json::Value::String(s)) => Some(s),
        _ => None,
    };

    detail
        .or(parsed.error)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
