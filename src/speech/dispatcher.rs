//! Voice selection and exclusive playback.

use std::sync::{Arc, Mutex};

use crate::lock_or_recover;

use super::{SpeechError, SpeechPlatform, Utterance, VoiceCatalog, VoiceDescriptor, SPEECH_RATE};

/// Pick the voice for `target_language` from `voices`.
///
/// Rules are tried in order over the whole list; the first rule that
/// matches any voice wins:
///
/// 1. language tag starts with `target_language` (case-insensitive);
/// 2. for `ur`, a voice whose name contains "urdu";
/// 3. for `ar`, a voice whose name contains "arabic";
/// 4. a voice whose language tag starts with lowercase `en`;
/// 5. nothing: the platform default is used.
///
/// ```
/// use doc_translator::speech::{select_voice, VoiceDescriptor};
///
/// let voices = vec![
///     VoiceDescriptor::new("Samantha", "en-US"),
///     VoiceDescriptor::new("Microsoft Urdu Asad", "x-local"),
/// ];
/// assert_eq!(select_voice(&voices, "ur").unwrap().name, "Microsoft Urdu Asad");
/// assert_eq!(select_voice(&voices, "fr").unwrap().name, "Samantha");
/// assert!(select_voice(&[], "fr").is_none());
/// ```
pub fn select_voice<'a>(
    voices: &'a [VoiceDescriptor],
    target_language: &str,
) -> Option<&'a VoiceDescriptor> {
    let target = target_language.trim().to_lowercase();

    if !target.is_empty() {
        if let Some(voice) = voices.iter().find(|v| tag_starts_with(v, &target)) {
            return Some(voice);
        }
    }

    let name_hint = match target.as_str() {
        "ur" => Some("urdu"),
        "ar" => Some("arabic"),
        _ => None,
    };
    if let Some(hint) = name_hint {
        if let Some(voice) = voices
            .iter()
            .find(|v| v.name.to_lowercase().contains(hint))
        {
            return Some(voice);
        }
    }

    voices.iter().find(|v| v.language_tag.starts_with("en"))
}

fn tag_starts_with(voice: &VoiceDescriptor, prefix: &str) -> bool {
    voice.language_tag.to_lowercase().starts_with(prefix)
}

// ---------------------------------------------------------------------------
// SpeechDispatcher
// ---------------------------------------------------------------------------

/// Plays text aloud, one utterance at a time.
pub struct SpeechDispatcher {
    catalog: Arc<VoiceCatalog>,
    platform: Arc<dyn SpeechPlatform>,
    /// Serialises cancel-then-speak so concurrent calls cannot both start.
    playback: Mutex<()>,
}

impl SpeechDispatcher {
    pub fn new(catalog: Arc<VoiceCatalog>, platform: Arc<dyn SpeechPlatform>) -> Self {
        Self {
            catalog,
            platform,
            playback: Mutex::new(()),
        }
    }

    /// Speak `text` in `target_language`, stopping any utterance in progress.
    ///
    /// Empty text is a no-op: nothing is cancelled and `Ok(None)` is
    /// returned.  Otherwise returns the voice that was chosen, `None`
    /// meaning the platform default.
    pub fn speak(
        &self,
        text: &str,
        target_language: &str,
    ) -> Result<Option<VoiceDescriptor>, SpeechError> {
        if text.is_empty() {
            return Ok(None);
        }

        let voices = self.catalog.current_voices();
        let voice = select_voice(&voices, target_language).cloned();
        let utterance = Utterance {
            text: text.to_string(),
            lang: voice.as_ref().map(|v| v.language_tag.clone()),
            voice: voice.clone(),
            rate: SPEECH_RATE,
        };

        let _playback = lock_or_recover(&self.playback);
        self.platform.cancel();
        log::debug!(
            "speech: speaking {} chars with {:?}",
            text.chars().count(),
            voice.as_ref().map(|v| v.name.as_str())
        );
        self.platform.speak(&utterance)?;

        Ok(voice)
    }

    /// Stop the active utterance, if any.
    pub fn stop(&self) {
        let _playback = lock_or_recover(&self.playback);
        self.platform.cancel();
    }

    pub fn is_speaking(&self) -> bool {
        self.platform.is_speaking()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
