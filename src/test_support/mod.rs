//! Test utilities and mocks for drydock unit tests.
//!
//! Provides a scripted `Invoker` implementation that stands in for the
//! external preprocessor, plus fixture helpers for building on-disk test
//! projects.

pub mod fixtures;

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{bail, Result};

use crate::preprocess::invoker::{InvocationOutput, Invoker};
use crate::preprocess::toolchain::CommandSpec;
use crate::util::fs::write_string;

// Re-export fixtures for convenience
pub use fixtures::*;

/// A scripted preprocessor stand-in.
///
/// For each expected source file, the invoker writes canned preprocessed
/// content to the `-o` output path, exactly as the real tool would. Sources
/// registered with `with_failure` produce an unsuccessful exit instead.
#[derive(Debug, Default)]
pub struct ScriptedInvoker {
    /// Canned preprocessed content by source path
    outputs: HashMap<PathBuf, String>,
    /// Sources that should fail, with their stderr text
    failures: HashMap<PathBuf, String>,
    /// Every invocation seen, in call order
    invocations: Mutex<Vec<CommandSpec>>,
}

impl ScriptedInvoker {
    /// Create an invoker with no scripted sources.
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the preprocessed content for a source file.
    pub fn with_output(mut self, source: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.outputs.insert(source.into(), content.into());
        self
    }

    /// Script a failing invocation for a source file.
    pub fn with_failure(mut self, source: impl Into<PathBuf>, stderr: impl Into<String>) -> Self {
        self.failures.insert(source.into(), stderr.into());
        self
    }

    /// Number of invocations seen so far.
    pub fn invocation_count(&self) -> usize {
        self.invocations.lock().unwrap().len()
    }

    /// The invocations seen so far, in call order.
    pub fn invocations(&self) -> Vec<CommandSpec> {
        self.invocations.lock().unwrap().clone()
    }
}

impl Invoker for ScriptedInvoker {
    fn invoke(&self, spec: &CommandSpec) -> Result<InvocationOutput> {
        self.invocations.lock().unwrap().push(spec.clone());

        // The source is the final argument, the output follows "-o"
        let source = spec
            .args
            .last()
            .map(PathBuf::from)
            .expect("scripted invocation has no source argument");
        let output = spec
            .args
            .iter()
            .position(|a| a == "-o")
            .and_then(|i| spec.args.get(i + 1))
            .map(PathBuf::from)
            .expect("scripted invocation has no -o argument");

        if let Some(stderr) = self.failures.get(&source) {
            return Ok(InvocationOutput::failed(1, stderr.clone()));
        }

        match self.outputs.get(&source) {
            Some(content) => {
                write_string(&output, content)?;
                Ok(InvocationOutput::ok())
            }
            None => bail!("no scripted output for source: {}", source.display()),
        }
    }
}
