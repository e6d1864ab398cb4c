//! Preprocess event types for JSON output.
//!
//! This module defines the stable JSON schema for machine-readable
//! preprocessing output. These events are emitted when using
//! `--message-format=json`, one JSON object per line.
//!
//! # Event Types
//!
//! - `preprocess-started`: A preprocessing run began
//! - `source-preprocessed`: One source file was preprocessed
//! - `header-discovered`: A new header was registered as a build input
//! - `preprocess-finished`: Run completed (success or failure)
//!
//! # Stability
//!
//! New fields may be added, but existing fields should not be removed or
//! renamed.

use std::path::PathBuf;

use serde::Serialize;

/// An event emitted during a preprocessing run.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "reason")]
pub enum PreprocessEvent {
    /// A preprocessing run began.
    #[serde(rename = "preprocess-started")]
    Started {
        /// Number of recognized source files in the run
        source_count: u64,
    },

    /// One source file was preprocessed.
    #[serde(rename = "source-preprocessed")]
    SourcePreprocessed {
        /// The source file
        source: PathBuf,
        /// The preprocessed output file
        output: PathBuf,
    },

    /// A newly discovered header was registered as a build input.
    #[serde(rename = "header-discovered")]
    HeaderDiscovered {
        /// Canonical path of the header
        path: PathBuf,
    },

    /// Run completed (success or failure).
    #[serde(rename = "preprocess-finished")]
    Finished {
        /// Whether the run succeeded
        success: bool,
        /// Total run duration in milliseconds
        duration_ms: u64,
        /// Number of headers registered as inputs
        headers_registered: u64,
    },
}

impl PreprocessEvent {
    /// Create a run-started event.
    pub fn started(source_count: u64) -> Self {
        PreprocessEvent::Started { source_count }
    }

    /// Create a source-preprocessed event.
    pub fn source_preprocessed(source: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        PreprocessEvent::SourcePreprocessed {
            source: source.into(),
            output: output.into(),
        }
    }

    /// Create a header-discovered event.
    pub fn header_discovered(path: impl Into<PathBuf>) -> Self {
        PreprocessEvent::HeaderDiscovered { path: path.into() }
    }

    /// Create a run-finished event.
    pub fn finished(success: bool, duration_ms: u64, headers_registered: u64) -> Self {
        PreprocessEvent::Finished {
            success,
            duration_ms,
            headers_registered,
        }
    }

    /// Serialize this event to a JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}
