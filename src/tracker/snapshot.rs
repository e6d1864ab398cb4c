//! Content snapshots of registered inputs.
//!
//! A snapshot captures the type and content of a file at one point in
//! time, without any information about the file's identity. The file may
//! not exist; that is a representable state, not an error.

use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::util::hash::sha256_file;

/// The type of filesystem entry a snapshot describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    /// A regular file
    File,
    /// A directory
    Directory,
    /// Nothing exists at the path
    Missing,
}

/// An immutable snapshot of the type and content of an input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentSnapshot {
    /// Entry type at snapshot time
    pub file_type: FileType,
    /// Content hash; present only for regular files
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_hash: Option<String>,
}

impl ContentSnapshot {
    /// Snapshot the entry at `path`.
    pub fn of(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(ContentSnapshot {
                file_type: FileType::Missing,
                content_hash: None,
            });
        }

        if path.is_dir() {
            return Ok(ContentSnapshot {
                file_type: FileType::Directory,
                content_hash: None,
            });
        }

        Ok(ContentSnapshot {
            file_type: FileType::File,
            content_hash: Some(sha256_file(path)?),
        })
    }
}
