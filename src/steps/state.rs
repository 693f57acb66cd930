// src/steps/state.rs
// Per-scenario read state accumulated by the harness

use crate::client::{LeafEntry, SignedTreeHead};
use crate::error::{HarnessError, Result};

/// State built up as a scenario's steps run.
///
/// Created empty for each scenario and dropped when it ends. Steps only
/// write here after they succeed.
#[derive(Debug, Clone, Default)]
pub struct HarnessState {
    /// Baseline tree head captured on connect
    pub last_sth: Option<SignedTreeHead>,
    /// Entries from the most recent successful entries check
    pub last_entries: Option<Vec<LeafEntry>>,
}

impl HarnessState {
    pub fn baseline(&self) -> Result<&SignedTreeHead> {
        self.last_sth.as_ref().ok_or(HarnessError::NotConnected)
    }

    /// Entry by 1-based index
    pub fn entry(&self, index: usize) -> Result<&LeafEntry> {
        let entries = self.last_entries.as_ref().ok_or(HarnessError::NoEntries)?;
        index
            .checked_sub(1)
            .and_then(|i| entries.get(i))
            .ok_or(HarnessError::IndexOutOfRange {
                index,
                available: entries.len(),
            })
    }
}
