//! Preprocessor tool abstraction and invocation argument assembly.
//!
//! Detection priority:
//! 1. Config file (`.drydock/preprocessor.toml` or `~/.drydock/preprocessor.toml`)
//! 2. CC environment variable
//! 3. Auto-detection (searching PATH for cc, gcc, clang)

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Serialize;

use crate::util::config::{global_config_path, load_preprocessor_config, project_config_path};
use crate::util::diagnostic::PreprocessorNotFoundError;
use crate::util::process::find_preprocessor;

/// A command to execute, with program, arguments, and environment.
#[derive(Debug, Clone, Serialize)]
pub struct CommandSpec {
    /// The program to run (e.g., "gcc", "clang")
    pub program: PathBuf,
    /// Command arguments
    pub args: Vec<String>,
    /// Environment variables to set
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub env: Vec<(String, String)>,
}

impl CommandSpec {
    /// Create a new command spec.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        CommandSpec {
            program: program.into(),
            args: Vec::new(),
            env: Vec::new(),
        }
    }

    /// Add an argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add multiple arguments.
    pub fn args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args.extend(args.into_iter().map(|a| a.into()));
        self
    }
}

/// Input for one preprocess invocation.
#[derive(Debug, Clone)]
pub struct PreprocessInput {
    /// Absolute path of the source file
    pub source: PathBuf,
    /// Preprocessed output path
    pub output: PathBuf,
    /// Include root directories (absolute)
    pub include_roots: Vec<PathBuf>,
    /// Compiler options placed before every other argument
    pub compiler_options: Vec<String>,
    /// Extra include root appended to every invocation
    pub header_root: PathBuf,
}

/// The external preprocessor driver.
#[derive(Debug, Clone)]
pub struct Preprocessor {
    /// Path to the compiler driver used for preprocessing
    pub path: PathBuf,
}

impl Preprocessor {
    /// Create a preprocessor for the given driver path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Preprocessor { path: path.into() }
    }

    /// Generate a preprocess-only command for one source file.
    pub fn preprocess_command(&self, input: &PreprocessInput) -> CommandSpec {
        let mut cmd = CommandSpec::new(&self.path);

        // Configured options come first
        cmd = cmd.args(input.compiler_options.iter().cloned());
        cmd = cmd.arg("-m64");

        // Include roots
        for root in &input.include_roots {
            cmd = cmd.arg(format!("-I{}", root.display()));
        }

        // Preprocess only
        cmd = cmd.arg("-E");

        // The project header root rides along on every invocation
        cmd = cmd.arg("-I");
        cmd = cmd.arg(input.header_root.display().to_string());

        // Output and input
        cmd = cmd.arg("-o");
        cmd = cmd.arg(input.output.display().to_string());
        cmd = cmd.arg(input.source.display().to_string());

        cmd
    }
}

/// Detect the preprocessor to use.
///
/// Also returns any extra compiler options configured alongside the tool.
pub fn detect_preprocessor(project_dir: &Path) -> Result<(Preprocessor, Vec<String>)> {
    let project_path = project_config_path(project_dir);
    let global_path = global_config_path().unwrap_or_default();
    let config = load_preprocessor_config(&global_path, &project_path);

    if let Some(path) = config.preprocessor.path.clone() {
        if path.exists() {
            tracing::info!("Using preprocessor from config: {}", path.display());
            return Ok((Preprocessor::new(path), config.preprocessor.options));
        }
        tracing::warn!(
            "Configured preprocessor not found: {}",
            path.display()
        );
    }

    match find_preprocessor() {
        Some(path) => {
            tracing::debug!("Using preprocessor: {}", path.display());
            Ok((Preprocessor::new(path), config.preprocessor.options))
        }
        None => Err(PreprocessorNotFoundError.into()),
    }
}
