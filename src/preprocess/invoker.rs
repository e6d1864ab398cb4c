//! Process invocation capability for the preprocessing driver.
//!
//! The driver never spawns processes directly; it goes through the
//! `Invoker` trait so tests can substitute a scripted implementation.

use anyhow::Result;

use crate::preprocess::toolchain::CommandSpec;
use crate::util::process::ProcessBuilder;

/// Outcome of one external invocation.
#[derive(Debug, Clone)]
pub struct InvocationOutput {
    /// Whether the process exited successfully
    pub success: bool,
    /// Exit code, if the process exited normally
    pub code: Option<i32>,
    /// Captured stderr
    pub stderr: String,
}

impl InvocationOutput {
    /// A successful invocation with no output.
    pub fn ok() -> Self {
        InvocationOutput {
            success: true,
            code: Some(0),
            stderr: String::new(),
        }
    }

    /// A failed invocation with the given exit code and stderr.
    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        InvocationOutput {
            success: false,
            code: Some(code),
            stderr: stderr.into(),
        }
    }
}

/// Capability to invoke an external process and observe its exit.
pub trait Invoker: Send + Sync {
    /// Run the command to completion and report its outcome.
    ///
    /// A launch failure is an `Err`; an unsuccessful exit is an `Ok` with
    /// `success == false` so the caller can attach source context.
    fn invoke(&self, spec: &CommandSpec) -> Result<InvocationOutput>;
}

/// The real-process invoker.
#[derive(Debug, Clone, Default)]
pub struct CommandInvoker;

impl Invoker for CommandInvoker {
    fn invoke(&self, spec: &CommandSpec) -> Result<InvocationOutput> {
        let mut cmd = ProcessBuilder::new(&spec.program);

        for arg in &spec.args {
            cmd = cmd.arg(arg);
        }

        for (key, value) in &spec.env {
            cmd = cmd.env(key, value);
        }

        let output = cmd.exec()?;

        Ok(InvocationOutput {
            success: output.status.success(),
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
