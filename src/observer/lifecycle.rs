//! Observer lifecycle state machine.
//!
//! `Uninitialized -> Active -> Disposed`, with an explicit reset back to
//! `Uninitialized` for forced re-setup. Making the states explicit keeps
//! the "setup message precedes turn messages" invariant checkable instead
//! of hiding it behind a boolean.

/// Lifecycle state of an observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewLifecycle {
    /// No setup message published yet for the current battle.
    Uninitialized,
    /// Setup published; turn encoding may proceed.
    Active,
    /// Observer torn down; terminal, never processes again.
    Disposed,
}

impl ViewLifecycle {
    /// Initial state.
    pub fn new() -> Self {
        Self::Uninitialized
    }

    /// Whether one-time setup still has to run.
    pub fn needs_setup(&self) -> bool {
        matches!(self, Self::Uninitialized)
    }

    /// Whether this observer has been torn down.
    pub fn is_disposed(&self) -> bool {
        matches!(self, Self::Disposed)
    }

    /// Mark setup as done. Only valid from `Uninitialized`; disposal wins
    /// over a late activation.
    pub fn activate(&mut self) {
        if matches!(self, Self::Uninitialized) {
            *self = Self::Active;
        }
    }

    /// Force the next delivered tick to re-run one-time setup.
    ///
    /// No-op once disposed.
    pub fn reset(&mut self) {
        if !self.is_disposed() {
            *self = Self::Uninitialized;
        }
    }

    /// Tear down. Idempotent and terminal.
    pub fn dispose(&mut self) {
        *self = Self::Disposed;
    }
}

impl Default for ViewLifecycle {
    fn default() -> Self {
        Self::new()
    }
}
