//! Deduplicated discovery bookkeeping.
//!
//! Tracks which include tokens and canonical header paths have already been
//! handled during one run, so canonicalization runs at most once per raw
//! token and registration at most once per canonical path, no matter how
//! many source files reference the same header concurrently.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Shared discovery state for one preprocessing run.
///
/// Both sets are insert-only and discarded with the run. Inserts use a read
/// fast path plus a double-checked write, so concurrent workers only
/// contend on genuinely new entries.
#[derive(Debug, Default)]
pub struct DiscoveryState {
    /// Raw tokens already dispatched to canonicalization
    tokens: RwLock<HashSet<String>>,
    /// Canonical paths already registered
    canonical: RwLock<HashSet<PathBuf>>,
}

impl DiscoveryState {
    /// Create empty discovery state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer a raw include token.
    ///
    /// Returns true only the first time this token is offered across the
    /// whole run. On true, the caller owns canonicalizing the token.
    pub fn offer_token(&self, token: &str) -> bool {
        {
            let tokens = self.tokens.read().unwrap();
            if tokens.contains(token) {
                return false;
            }
        }

        let mut tokens = self.tokens.write().unwrap();
        tokens.insert(token.to_string())
    }

    /// Offer a canonical header path.
    ///
    /// Returns true only the first time this path is offered across the
    /// whole run. On true, the caller owns registering the path.
    pub fn offer_canonical_path(&self, path: &Path) -> bool {
        {
            let canonical = self.canonical.read().unwrap();
            if canonical.contains(path) {
                return false;
            }
        }

        let mut canonical = self.canonical.write().unwrap();
        canonical.insert(path.to_path_buf())
    }

    /// Number of distinct tokens seen so far.
    pub fn token_count(&self) -> usize {
        self.tokens.read().unwrap().len()
    }

    /// Number of distinct canonical paths seen so far.
    pub fn canonical_count(&self) -> usize {
        self.canonical.read().unwrap().len()
    }
}
