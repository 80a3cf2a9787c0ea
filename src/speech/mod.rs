//! Speech playback of translated text.
//!
//! This module provides:
//! * [`SpeechPlatform`]: the host speech subsystem (voice list, playback).
//! * [`VoiceCatalog`]: snapshot of the platform's voices, refreshed on
//!   [`VoiceEvent::VoicesChanged`].
//! * [`SpeechDispatcher`]: picks a voice for a language and plays an
//!   utterance, preempting whatever is playing.
//! * [`EspeakPlatform`]: `espeak-ng` command-line adapter.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tokio::sync::mpsc;
//! use doc_translator::config::SpeechConfig;
//! use doc_translator::speech::{
//!     EspeakPlatform, SpeechDispatcher, SpeechPlatform, VoiceCatalog, VoiceEvent,
//! };
//!
//! #[tokio::main]
//! async fn main() {
//!     let platform: Arc<dyn SpeechPlatform> =
//!         Arc::new(EspeakPlatform::from_config(&SpeechConfig::default()));
//!     let catalog = Arc::new(VoiceCatalog::new());
//!
//!     let (events_tx, events_rx) = mpsc::channel(4);
//!     tokio::spawn(Arc::clone(&catalog).run(Arc::clone(&platform), events_rx));
//!     events_tx.send(VoiceEvent::VoicesChanged).await.unwrap();
//!
//!     let dispatcher = SpeechDispatcher::new(catalog, platform);
//!     dispatcher.speak("ہیلو", "ur").unwrap();
//! }
//! ```

pub mod catalog;
pub mod dispatcher;
pub mod espeak;

pub use catalog::VoiceCatalog;
pub use dispatcher::{select_voice, SpeechDispatcher};
pub use espeak::EspeakPlatform;

use thiserror::Error;

/// Playback rate relative to the engine's normal pace.
pub const SPEECH_RATE: f32 = 0.9;

// ---------------------------------------------------------------------------
// SpeechError
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum SpeechError {
    /// The speech engine could not be started.
    #[error("speech engine unavailable: {0}")]
    Unavailable(String),

    /// The engine started but playback failed.
    #[error("playback failed: {0}")]
    Playback(String),
}

// ---------------------------------------------------------------------------
// Voices and utterances
// ---------------------------------------------------------------------------

/// One voice offered by the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceDescriptor {
    pub name: String,
    /// BCP 47-ish tag such as `en-US` or `ar`.
    pub language_tag: String,
}

impl VoiceDescriptor {
    pub fn new(name: impl Into<String>, language_tag: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            language_tag: language_tag.into(),
        }
    }
}

/// Something to say.  `voice == None` means the platform default.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub voice: Option<VoiceDescriptor>,
    /// Language to speak in; taken from the voice when one was chosen.
    pub lang: Option<String>,
    pub rate: f32,
}

/// Notifications from the platform's speech subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceEvent {
    /// The set of installed voices changed (or became available).
    VoicesChanged,
}

// ---------------------------------------------------------------------------
// SpeechPlatform trait
// ---------------------------------------------------------------------------

/// Host speech subsystem.
///
/// `speak` starts playback and returns without waiting for it to finish.
pub trait SpeechPlatform: Send + Sync {
    /// Currently installed voices.  May be empty, e.g. before the platform
    /// has finished enumerating them.
    fn list_voices(&self) -> Vec<VoiceDescriptor>;

    fn speak(&self, utterance: &Utterance) -> Result<(), SpeechError>;

    /// Stop the active utterance, if any.  Returns once it has stopped.
    fn cancel(&self);

    fn is_speaking(&self) -> bool;
}

// Compile-time assertion: Box<dyn SpeechPlatform> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn SpeechPlatform>) {}
};
