//! Client-side orchestrator for a document-translation workflow.
//!
//! A user types text or uploads a document; the document is cleaned by a
//! remote service, the text is translated by a remote service, and the
//! latest result can be spoken, copied or exported.
//!
//! # Modules
//!
//! * [`ingest`]: upload validation, cleaning, working text.
//! * [`session`]: generation-tracked translation lifecycle.
//! * [`speech`]: voice catalog and exclusive playback.
//! * [`export`]: clipboard and file export.
//! * [`service`]: remote collaborators and their HTTP implementation.
//! * [`translator`]: the [`Translator`] facade wiring it all together.
//! * [`config`]: TOML settings.

pub mod config;
pub mod export;
pub mod ingest;
pub mod languages;
pub mod service;
pub mod session;
pub mod speech;
pub mod translator;

pub use translator::{Snapshot, Translator};

use std::sync::{Mutex, MutexGuard};

/// Lock `mutex`, recovering the data if a previous holder panicked.
///
/// Every critical section in this crate leaves its state consistent before
/// anything that could panic, so the poisoned value is still valid.
pub(crate) fn lock_or_recover<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
