//! Process-wide holder for the currently selected backend.
//!
//! Exactly one backend instance is active at any time, or none before
//! initialization. The holder is created once at startup and threaded
//! through dependency injection; it is the only shared mutable state in
//! the dispatch core.

use crate::provider::MessageSender;
use std::sync::{Arc, Mutex};

/// Lock-guarded slot for the active message-sender backend.
///
/// The lock is held only for the duration of a get or install, never
/// across I/O. Readers receive a cloned `Arc` to the installed backend;
/// absence is a valid observable state callers must check.
#[derive(Default)]
pub struct ActiveProvider {
    inner: Mutex<Option<Arc<dyn MessageSender>>>,
}

impl ActiveProvider {
    /// Creates an empty holder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the currently installed backend, if any.
    pub fn current(&self) -> Option<Arc<dyn MessageSender>> {
        self.inner.lock().unwrap().clone()
    }

    /// Atomically replaces the active backend.
    ///
    /// Only fully constructed backends reach this point; construction
    /// happens before the lock is taken.
    pub fn install(&self, backend: Arc<dyn MessageSender>) {
        *self.inner.lock().unwrap() = Some(backend);
    }
}
