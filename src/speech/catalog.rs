//! Voice catalog: the latest voice list the platform reported.

use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use crate::lock_or_recover;

use super::{SpeechPlatform, VoiceDescriptor, VoiceEvent};

/// Snapshot holder for the platform's voices.
///
/// Starts empty.  Consumers call [`current_voices`](Self::current_voices)
/// every time they need the list instead of keeping their own copy.
#[derive(Debug, Default)]
pub struct VoiceCatalog {
    voices: Mutex<Vec<VoiceDescriptor>>,
}

impl VoiceCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of the current voice list.
    pub fn current_voices(&self) -> Vec<VoiceDescriptor> {
        lock_or_recover(&self.voices).clone()
    }

    /// Replace the list wholesale.
    pub fn replace(&self, voices: Vec<VoiceDescriptor>) {
        log::debug!("speech: voice catalog now has {} voices", voices.len());
        *lock_or_recover(&self.voices) = voices;
    }

    /// Re-read the list from `platform`.
    ///
    /// An empty read does not wipe a non-empty catalog: platforms report an
    /// empty list while they are still enumerating.
    pub fn refresh_from(&self, platform: &dyn SpeechPlatform) {
        let voices = platform.list_voices();
        if voices.is_empty() && !lock_or_recover(&self.voices).is_empty() {
            log::debug!("speech: ignoring empty voice list, keeping previous catalog");
            return;
        }
        self.replace(voices);
    }

    /// Refresh on every event until the channel closes.
    pub async fn run(
        self: Arc<Self>,
        platform: Arc<dyn SpeechPlatform>,
        mut events: mpsc::Receiver<VoiceEvent>,
    ) {
        while let Some(event) = events.recv().await {
            match event {
                VoiceEvent::VoicesChanged => {
                    let platform = Arc::clone(&platform);
                    let catalog = Arc::clone(&self);
                    // Listing voices may shell out; keep it off the async workers.
                    let refreshed = tokio::task::spawn_blocking(move || {
                        catalog.refresh_from(platform.as_ref())
                    })
                    .await;
                    if let Err(e) = refreshed {
                        log::warn!("speech: voice refresh task failed: {e}");
                    }
                }
            }
        }

        log::debug!("speech: voice event channel closed");
    }
}
