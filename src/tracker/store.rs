//! Persisted store of registered inputs.
//!
//! The store remembers every input registered by a run, along with a
//! content snapshot of each and a fingerprint of the options the run was
//! configured with. A host engine can ask which inputs changed since the
//! run; deciding what to do about it is the host's business.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::tracker::snapshot::ContentSnapshot;
use crate::util::fs::write_string;

/// Persisted registered-input state for one preprocessing run.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct InputStore {
    /// Fingerprint of the options the run was configured with
    pub options_fingerprint: String,

    /// Snapshots by canonical input path
    pub inputs: BTreeMap<PathBuf, ContentSnapshot>,
}

impl InputStore {
    /// Create an empty store with the given options fingerprint.
    pub fn new(options_fingerprint: impl Into<String>) -> Self {
        InputStore {
            options_fingerprint: options_fingerprint.into(),
            inputs: BTreeMap::new(),
        }
    }

    /// Load the store from a file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(InputStore::default());
        }

        let content = std::fs::read_to_string(path)?;
        let store: InputStore = serde_json::from_str(&content)?;
        Ok(store)
    }

    /// Save the store to a file, creating parent directories if needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        write_string(path, &content)
    }

    /// Record a snapshot for an input.
    pub fn record(&mut self, path: PathBuf, snapshot: ContentSnapshot) {
        self.inputs.insert(path, snapshot);
    }

    /// Check whether the run options differ from the recorded ones.
    pub fn options_changed(&self, current_fingerprint: &str) -> bool {
        self.options_fingerprint != current_fingerprint
    }

    /// Inputs whose current content no longer matches the recorded snapshot.
    pub fn changed_inputs(&self) -> Result<Vec<PathBuf>> {
        let mut changed = Vec::new();

        for (path, recorded) in &self.inputs {
            let current = ContentSnapshot::of(path)?;
            if &current != recorded {
                changed.push(path.clone());
            }
        }

        Ok(changed)
    }

    /// Whether the store has any recorded inputs.
    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    /// Number of recorded inputs.
    pub fn len(&self) -> usize {
        self.inputs.len()
    }
}
