//! Refresh signal shared between the composer and the list synchronizer.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Monotonic generation counter. Writers bump it when upstream data
/// changed; readers compare against the value they last observed.
#[derive(Debug, Clone, Default)]
pub struct RefreshSignal(Arc<AtomicU64>);

impl RefreshSignal {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Announce a change. Returns the new generation.
    pub fn bump(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    #[must_use]
    pub fn current(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }
}
