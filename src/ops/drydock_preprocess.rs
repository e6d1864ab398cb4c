//! Implementation of `drydock preprocess`.
//!
//! This is the boundary a host build engine calls: scan the sources, run
//! them through the preprocessor, and return the set of registered header
//! inputs.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};

use crate::core::source::SourceSet;
use crate::preprocess::driver::{DriverOptions, PreprocessDriver};
use crate::preprocess::events::PreprocessEvent;
use crate::preprocess::invoker::{CommandInvoker, Invoker};
use crate::preprocess::recorder::OperationRecorder;
use crate::preprocess::toolchain::{detect_preprocessor, Preprocessor};
use crate::tracker::snapshot::ContentSnapshot;
use crate::tracker::store::InputStore;
use crate::tracker::RecordingInputTracker;
use crate::util::hash::Fingerprint;

/// Filename of the persisted input store, under the output directory.
pub const INPUT_STORE_FILE: &str = "discovered-inputs.json";

/// Output format for run reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MessageFormat {
    /// Human-readable summary on stderr
    #[default]
    Human,
    /// One JSON event per line on stdout
    Json,
}

impl std::str::FromStr for MessageFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "human" => Ok(MessageFormat::Human),
            "json" => Ok(MessageFormat::Json),
            other => anyhow::bail!("invalid message format `{}`, expected human or json", other),
        }
    }
}

/// Options for the preprocess command.
#[derive(Debug, Clone, Default)]
pub struct PreprocessOptions {
    /// Directory containing the sources to preprocess
    pub source_dir: PathBuf,

    /// Glob patterns selecting sources (empty = every file under source_dir)
    pub source_globs: Vec<String>,

    /// Include root directories
    pub include_roots: Vec<PathBuf>,

    /// Extra compiler options
    pub compiler_options: Vec<String>,

    /// Root directory for preprocessed output
    pub output_dir: PathBuf,

    /// Extra include root appended to every invocation
    pub header_root: PathBuf,

    /// Number of parallel jobs
    pub jobs: Option<usize>,

    /// Emit planned invocations as JSON instead of running them
    pub emit_plan: bool,

    /// Output format
    pub message_format: MessageFormat,

    /// Verbose output
    pub verbose: bool,
}

/// Result of a preprocess run.
#[derive(Debug)]
pub struct PreprocessResult {
    /// Preprocessed output files
    pub outputs: Vec<PathBuf>,

    /// Canonical paths of every registered header input
    pub registered: BTreeSet<PathBuf>,

    /// Run duration in milliseconds
    pub duration_ms: u64,
}

/// Run the preprocess command with the system preprocessor.
pub fn preprocess(opts: &PreprocessOptions) -> Result<PreprocessResult> {
    let cwd = std::env::current_dir().context("failed to determine current directory")?;
    let (preprocessor, config_options) = detect_preprocessor(&cwd)?;

    preprocess_with(opts, &preprocessor, config_options, &CommandInvoker)
}

/// Run the preprocess command with an explicit preprocessor and invoker.
pub fn preprocess_with(
    opts: &PreprocessOptions,
    preprocessor: &Preprocessor,
    config_options: Vec<String>,
    invoker: &dyn Invoker,
) -> Result<PreprocessResult> {
    let start = Instant::now();

    let output_dir = absolutize(&opts.output_dir)?;
    let header_root = absolutize(&opts.header_root)?;
    let include_roots = opts
        .include_roots
        .iter()
        .map(|root| absolutize(root))
        .collect::<Result<Vec<_>>>()?;

    let sources = if opts.source_globs.is_empty() {
        SourceSet::scan(&opts.source_dir)?
    } else {
        SourceSet::from_globs(&opts.source_dir, &opts.source_globs)?
    };

    let recognized = sources.recognized_count();
    tracing::info!(
        "Preprocessing {} of {} file(s) under {}",
        recognized,
        sources.len(),
        opts.source_dir.display()
    );

    // Config options come before per-run options, as with the real compiler
    let mut compiler_options = config_options;
    compiler_options.extend(opts.compiler_options.iter().cloned());

    let driver_opts = DriverOptions {
        include_roots: include_roots.clone(),
        compiler_options: compiler_options.clone(),
        output_dir: output_dir.clone(),
        header_root: header_root.clone(),
    };
    let driver = PreprocessDriver::new(preprocessor, invoker, driver_opts);

    if opts.emit_plan {
        let plan = driver.plan(&sources);
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(PreprocessResult {
            outputs: Vec::new(),
            registered: BTreeSet::new(),
            duration_ms: 0,
        });
    }

    // Set up rayon thread pool
    if let Some(jobs) = opts.jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global()
            .ok(); // Ignore if already set
    }

    let recorder = OperationRecorder::new();
    recorder.record(PreprocessEvent::started(recognized as u64));

    // Progress bar for human output only
    let pb = if !opts.verbose && opts.message_format == MessageFormat::Human && recognized > 1 {
        let pb = ProgressBar::new(recognized as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap()
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    let tracker = RecordingInputTracker::new();
    let run = driver.run(&sources, &tracker, Some(&recorder));

    if let Some(pb) = pb {
        pb.finish_with_message("done");
    }

    let duration_ms = start.elapsed().as_millis() as u64;

    let summary = match run {
        Ok(summary) => summary,
        Err(e) => {
            recorder.record(PreprocessEvent::finished(false, duration_ms, 0));
            report(opts.message_format, &recorder);
            return Err(e);
        }
    };

    recorder.record(PreprocessEvent::finished(
        true,
        duration_ms,
        summary.headers_registered as u64,
    ));

    // Persist snapshots of everything we registered, so a host engine can
    // ask what changed. A failed run never reaches this point.
    let registered = tracker.inputs();
    let mut store = InputStore::new(options_fingerprint(
        &compiler_options,
        &include_roots,
        &header_root,
    ));
    for path in &registered {
        store.record(path.clone(), ContentSnapshot::of(path)?);
    }
    store.save(&output_dir.join(INPUT_STORE_FILE))?;

    report(opts.message_format, &recorder);

    if opts.message_format == MessageFormat::Human {
        eprintln!(
            "    Finished {} file(s), {} header input(s) in {:.2}s",
            summary.outputs.len(),
            registered.len(),
            duration_ms as f64 / 1000.0
        );
    }

    Ok(PreprocessResult {
        outputs: summary.outputs,
        registered,
        duration_ms,
    })
}

/// Fingerprint of everything that shapes an invocation besides the sources.
pub fn options_fingerprint(
    compiler_options: &[String],
    include_roots: &[PathBuf],
    header_root: &Path,
) -> String {
    let mut fp = Fingerprint::new();
    fp.update_strs(compiler_options.iter().map(|s| s.as_str()));
    for root in include_roots {
        fp.update_str(&root.to_string_lossy());
    }
    fp.update_str(&header_root.to_string_lossy());
    fp.finish_short()
}

fn report(format: MessageFormat, recorder: &OperationRecorder) {
    match format {
        MessageFormat::Json => {
            for event in recorder.retrieve_events_and_stop() {
                println!("{}", event.to_json());
            }
        }
        MessageFormat::Human => recorder.discard_events_and_stop(),
    }
}

fn absolutize(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path)
        .with_context(|| format!("failed to resolve path: {}", path.display()))
}
