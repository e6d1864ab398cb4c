//! Incremental native-source preprocessing and header discovery.
//!
//! This module implements the preprocessing driver, the preprocessed-output
//! parser, and the deduplicated discovery bookkeeping that feeds the
//! incremental-input tracker.

pub mod discovery;
pub mod driver;
pub mod events;
pub mod invoker;
pub mod parser;
pub mod recorder;
pub mod toolchain;

pub use discovery::DiscoveryState;
pub use driver::{DriverOptions, PreprocessDriver, RunSummary};
pub use events::PreprocessEvent;
pub use invoker::{CommandInvoker, InvocationOutput, Invoker};
pub use parser::PreprocessedFileParser;
pub use recorder::OperationRecorder;
pub use toolchain::{detect_preprocessor, CommandSpec, PreprocessInput, Preprocessor};
