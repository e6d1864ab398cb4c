//! Drydock - incremental C/C++ preprocessing and header-dependency discovery
//!
//! This crate runs native sources through an external preprocessor,
//! parses the preprocessed output to discover every transitively included
//! header, and registers each newly discovered header with an
//! incremental-input tracker so the surrounding build engine can
//! invalidate correctly when any header changes.

pub mod core;
pub mod ops;
pub mod preprocess;
pub mod tracker;
pub mod util;

/// Test utilities and mocks for drydock unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides a scripted preprocessor invoker and on-disk
/// project fixtures.
#[cfg(test)]
pub mod test_support;

pub use crate::core::{Language, SourceFile, SourceSet};
pub use crate::preprocess::{
    CommandInvoker, CommandSpec, DiscoveryState, Invoker, PreprocessDriver, PreprocessedFileParser,
    Preprocessor,
};
pub use crate::tracker::{InputTracker, RecordingInputTracker};
