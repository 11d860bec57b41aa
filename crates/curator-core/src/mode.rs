use crate::storage::Storage;

/// How a process invocation proceeds, decided once at startup.
///
/// A first run collects videos and asks the model for groupings before
/// executing; a resumed run goes straight to execution using the saved
/// snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// No run state exists yet: collect, plan, then execute
    FirstRun,
    /// A run state exists: execute the remaining work
    Resume,
}

impl RunMode {
    /// Probes the store for an existing run state.
    pub fn detect(storage: &impl Storage) -> Self {
        if storage.run_state_exists() {
            RunMode::Resume
        } else {
            RunMode::FirstRun
        }
    }

    /// Returns a human-readable name for the mode.
    pub fn display_name(&self) -> &'static str {
        match self {
            RunMode::FirstRun => "first run",
            RunMode::Resume => "resume",
        }
    }
}
