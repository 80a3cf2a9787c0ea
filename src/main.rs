//! Application entry point: document translator CLI.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] (from `--config` or the platform default path).
//! 3. Create a [`tokio`] runtime.
//! 4. Build the HTTP backend and the [`Translator`].
//! 5. Optionally start the speech adapter and its voice catalog task.
//! 6. Ingest `--text` or `--file`, translate, then speak / copy / save.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{ArgGroup, Parser};
use tokio::sync::mpsc;

use doc_translator::{
    config::AppConfig,
    export::SystemClipboard,
    ingest::Document,
    languages::{Language, SUPPORTED_LANGUAGES},
    service::HttpBackend,
    speech::{EspeakPlatform, SpeechDispatcher, SpeechPlatform, VoiceCatalog, VoiceEvent},
    Translator,
};

/// Translate typed text or a document through the translation backend.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(group(ArgGroup::new("input").required(true).args(["text", "file"])))]
struct Cli {
    /// Text to translate
    #[arg(short, long)]
    text: Option<String>,

    /// Document to clean and translate (.txt, .pdf, .docx)
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Target language code (ur, ar, fr, en); defaults to the configured one
    #[arg(long)]
    to: Option<String>,

    /// Read the translation aloud
    #[arg(long)]
    speak: bool,

    /// Copy the translation to the clipboard
    #[arg(long)]
    copy: bool,

    /// Save the translation as translation_<lang>.txt
    #[arg(long)]
    save: bool,

    /// Settings file to use instead of the platform default
    #[arg(long)]
    config: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn load_config(path: Option<&Path>) -> AppConfig {
    let loaded = match path {
        Some(p) => AppConfig::load_from(p),
        None => AppConfig::load(),
    };
    loaded.unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    })
}

fn resolve_target(requested: Option<&str>, config: &AppConfig) -> Result<Language> {
    let code = requested.unwrap_or(&config.translation.default_target);
    match Language::from_code(code) {
        Some(language) => Ok(language),
        None => {
            let known: Vec<&str> = SUPPORTED_LANGUAGES.iter().map(|l| l.code).collect();
            bail!("unsupported target language {code:?} (choose one of {})", known.join(", "))
        }
    }
}

/// Start the speech adapter and keep its voice catalog fresh.
fn start_speech(config: &AppConfig) -> SpeechDispatcher {
    let platform: Arc<dyn SpeechPlatform> = Arc::new(EspeakPlatform::from_config(&config.speech));
    let catalog = Arc::new(VoiceCatalog::new());

    let (voice_tx, voice_rx) = mpsc::channel::<VoiceEvent>(4);
    tokio::spawn(Arc::clone(&catalog).run(Arc::clone(&platform), voice_rx));
    // The adapter has no change notifications of its own; load once at startup.
    if let Err(e) = voice_tx.try_send(VoiceEvent::VoicesChanged) {
        log::warn!("Could not request voice list: {e}");
    }

    SpeechDispatcher::new(catalog, platform)
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref());
    let target = resolve_target(cli.to.as_deref(), &config)?;

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    rt.block_on(run(cli, config, target))
}

async fn run(cli: Cli, config: AppConfig, target: Language) -> Result<()> {
    let backend = Arc::new(HttpBackend::from_config(&config.service));
    let mut translator = Translator::new(
        backend.clone(),
        backend,
        Arc::new(SystemClipboard::new()),
    );
    if cli.speak && config.speech.enabled {
        translator = translator.with_speech(start_speech(&config));
    }

    if let Some(path) = &cli.file {
        let document = Document::from_path(path)
            .await
            .with_context(|| format!("cannot read {}", path.display()))?;
        let working = translator.upload(document).await?;
        log::info!("Cleaned {} ({} chars)", path.display(), working.text.chars().count());
    } else if let Some(text) = cli.text {
        translator.set_text(text);
    }

    log::info!("Translating to {} ({})", target.name, target.code);
    let Some(result) = translator.translate(target.code).await? else {
        bail!("translation was superseded");
    };

    println!("[{} → {}]", result.detected_language_label(), result.target_language);
    println!("{}", result.translated_text);

    if cli.copy {
        match translator.copy_result() {
            Ok(_) => log::info!("Copied translation to clipboard"),
            Err(e) => log::warn!("{e}"),
        }
    }

    if cli.save {
        if let Some(file) = translator.export_result() {
            let dir = config.export.output_dir.clone().unwrap_or_else(|| PathBuf::from("."));
            let path = file.save_to(&dir)?;
            println!("Saved {}", path.display());
        }
    }

    if cli.speak {
        if !config.speech.enabled {
            log::warn!("Speech is disabled in the config");
        } else {
            match translator.speak_result() {
                Ok(voice) => {
                    log::info!(
                        "Speaking with {}",
                        voice.map_or_else(|| "default voice".to_string(), |v| v.name)
                    );
                    while translator.is_speaking() {
                        tokio::time::sleep(Duration::from_millis(100)).await;
                    }
                }
                Err(e) => log::warn!("{e}"),
            }
        }
    }

    Ok(())
}
