//! `espeak-ng` adapter for [`SpeechPlatform`].
//!
//! Voices come from `espeak-ng --voices`; each utterance runs as a child
//! process reading its text from stdin, and cancelling kills that child.
//!
//! **espeak-ng** must be installed and on `PATH` (or configured with an
//! absolute path in `[speech] command`).

use std::io::Write;
use std::process::{Child, Command, Stdio};
use std::sync::Mutex;

use crate::config::SpeechConfig;
use crate::lock_or_recover;

use super::{SpeechError, SpeechPlatform, Utterance, VoiceDescriptor};

pub struct EspeakPlatform {
    command: String,
    base_words_per_minute: u32,
    child: Mutex<Option<Child>>,
}

impl EspeakPlatform {
    pub fn from_config(config: &SpeechConfig) -> Self {
        Self {
            command: config.command.clone(),
            base_words_per_minute: config.base_words_per_minute,
            child: Mutex::new(None),
        }
    }

    fn words_per_minute(&self, rate: f32) -> u32 {
        ((self.base_words_per_minute as f32) * rate).round().max(1.0) as u32
    }
}

impl SpeechPlatform for EspeakPlatform {
    fn list_voices(&self) -> Vec<VoiceDescriptor> {
        match Command::new(&self.command).arg("--voices").output() {
            Ok(output) if output.status.success() => {
                parse_voice_list(&String::from_utf8_lossy(&output.stdout))
            }
            Ok(output) => {
                log::warn!(
                    "speech: {} --voices exited with {}",
                    self.command,
                    output.status
                );
                Vec::new()
            }
            Err(e) => {
                log::warn!("speech: cannot run {}: {e}", self.command);
                Vec::new()
            }
        }
    }

    fn speak(&self, utterance: &Utterance) -> Result<(), SpeechError> {
        let mut cmd = Command::new(&self.command);
        cmd.arg("--stdin")
            .arg("-s")
            .arg(self.words_per_minute(utterance.rate).to_string());
        if let Some(lang) = &utterance.lang {
            cmd.arg("-v").arg(lang);
        }

        let mut child = cmd
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| SpeechError::Unavailable(format!("{}: {e}", self.command)))?;

        let Some(mut stdin) = child.stdin.take() else {
            let _ = child.kill();
            return Err(SpeechError::Playback("child stdin not captured".into()));
        };
        let text = utterance.text.clone();
        // espeak-ng starts talking while still reading, so a long text would
        // block here until most of it has been spoken.
        std::thread::spawn(move || {
            if let Err(e) = stdin.write_all(text.as_bytes()) {
                log::debug!("speech: stdin closed early: {e}");
            }
        });

        let mut slot = lock_or_recover(&self.child);
        if let Some(mut previous) = slot.replace(child) {
            stop_child(&mut previous);
        }
        Ok(())
    }

    fn cancel(&self) {
        if let Some(mut child) = lock_or_recover(&self.child).take() {
            stop_child(&mut child);
        }
    }

    fn is_speaking(&self) -> bool {
        let mut slot = lock_or_recover(&self.child);
        let state = slot.as_mut().map(Child::try_wait);
        match state {
            Some(Ok(None)) => true,
            Some(_) => {
                *slot = None;
                false
            }
            None => false,
        }
    }
}

impl Drop for EspeakPlatform {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn stop_child(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

/// Parse the table printed by `espeak-ng --voices`:
///
/// ```text
/// Pty Language       Age/Gender VoiceName          File                 Other Languages
///  5  af              --/M      Afrikaans          gmw/af
///  5  ar              --/M      Arabic             sem/ar
/// ```
fn parse_voice_list(output: &str) -> Vec<VoiceDescriptor> {
    output
        .lines()
        .skip(1)
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let _priority = fields.next()?;
            let language = fields.next()?;
            let _age_gender = fields.next()?;
            let name = fields.next()?;
            Some(VoiceDescriptor::new(name.replace('_', " "), language))
        })
        .collect()
}
