//! The incremental-input tracker boundary.
//!
//! Discovered headers are handed to an `InputTracker`. The tracker's own
//! staleness logic lives in the host build engine; this crate only
//! guarantees that each canonical path is registered exactly once per run.

pub mod snapshot;
pub mod store;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Result;

pub use snapshot::{ContentSnapshot, FileType};
pub use store::InputStore;

/// Registration contract for discovered build inputs.
///
/// `Send + Sync` is part of the contract: the preprocessing driver calls
/// `register_input` from multiple workers concurrently, and drydock's
/// deduplication is the only guarantee against repeat registration.
pub trait InputTracker: Send + Sync {
    /// Register a file as a build input.
    fn register_input(&self, path: &Path) -> Result<()>;
}

/// An input tracker that collects registered paths in memory.
#[derive(Debug, Default)]
pub struct RecordingInputTracker {
    inputs: Mutex<BTreeSet<PathBuf>>,
}

impl RecordingInputTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// The registered inputs, sorted.
    pub fn inputs(&self) -> BTreeSet<PathBuf> {
        self.inputs.lock().unwrap().clone()
    }
}

impl InputTracker for RecordingInputTracker {
    fn register_input(&self, path: &Path) -> Result<()> {
        self.inputs.lock().unwrap().insert(path.to_path_buf());
        Ok(())
    }
}
