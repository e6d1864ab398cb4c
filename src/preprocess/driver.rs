//! Preprocessing driver.
//!
//! Runs every recognized source file through the external preprocessor and
//! drives header discovery against the preprocessed output, registering
//! each newly discovered header with the incremental-input tracker.

use std::path::{Path, PathBuf};

use anyhow::Result;
use rayon::prelude::*;

use crate::core::source::{SourceFile, SourceSet};
use crate::preprocess::discovery::DiscoveryState;
use crate::preprocess::events::PreprocessEvent;
use crate::preprocess::invoker::Invoker;
use crate::preprocess::parser::PreprocessedFileParser;
use crate::preprocess::recorder::OperationRecorder;
use crate::preprocess::toolchain::{CommandSpec, PreprocessInput, Preprocessor};
use crate::tracker::InputTracker;
use crate::util::diagnostic::PreprocessFailedError;
use crate::util::fs::{canonicalize, ensure_dir};

/// Options for a preprocessing run.
#[derive(Debug, Clone)]
pub struct DriverOptions {
    /// Include root directories (absolute)
    pub include_roots: Vec<PathBuf>,
    /// Compiler options placed before every other argument
    pub compiler_options: Vec<String>,
    /// Root directory for preprocessed output
    pub output_dir: PathBuf,
    /// Extra include root appended to every invocation
    pub header_root: PathBuf,
}

/// Result of one preprocessing run.
#[derive(Debug)]
pub struct RunSummary {
    /// Preprocessed output files, in source order
    pub outputs: Vec<PathBuf>,
    /// Number of distinct canonical headers registered
    pub headers_registered: usize,
}

/// Drives preprocessing and header discovery over a source set.
pub struct PreprocessDriver<'a> {
    preprocessor: &'a Preprocessor,
    invoker: &'a dyn Invoker,
    opts: DriverOptions,
    parser: PreprocessedFileParser,
}

impl<'a> PreprocessDriver<'a> {
    /// Create a new driver.
    pub fn new(preprocessor: &'a Preprocessor, invoker: &'a dyn Invoker, opts: DriverOptions) -> Self {
        PreprocessDriver {
            preprocessor,
            invoker,
            opts,
            parser: PreprocessedFileParser::new(),
        }
    }

    /// The commands this driver would run, without running them.
    ///
    /// Unrecognized files are skipped, exactly as in a real run.
    pub fn plan(&self, sources: &SourceSet) -> Vec<CommandSpec> {
        sources
            .iter()
            .filter_map(|file| {
                let output = file.preprocessed_path(&self.opts.output_dir)?;
                Some(self.preprocessor.preprocess_command(&self.input_for(file, output)))
            })
            .collect()
    }

    /// Preprocess every recognized source file and discover its headers.
    ///
    /// Files are processed in parallel; discovery state is shared so each
    /// canonical header is registered at most once. Any preprocessing,
    /// parsing, or canonicalization failure aborts the run.
    pub fn run(
        &self,
        sources: &SourceSet,
        tracker: &dyn InputTracker,
        recorder: Option<&OperationRecorder>,
    ) -> Result<RunSummary> {
        let discovery = DiscoveryState::new();

        let results: Vec<Result<PathBuf>> = sources
            .files()
            .par_iter()
            .filter_map(|file| {
                let output = file.preprocessed_path(&self.opts.output_dir)?;
                Some(self.preprocess_one(file, output, &discovery, tracker, recorder))
            })
            .collect();

        let mut outputs = Vec::with_capacity(results.len());
        for result in results {
            outputs.push(result?);
        }

        Ok(RunSummary {
            outputs,
            headers_registered: discovery.canonical_count(),
        })
    }

    fn input_for(&self, file: &SourceFile, output: PathBuf) -> PreprocessInput {
        PreprocessInput {
            source: file.path.clone(),
            output,
            include_roots: self.opts.include_roots.clone(),
            compiler_options: self.opts.compiler_options.clone(),
            header_root: self.opts.header_root.clone(),
        }
    }

    /// Preprocess a single source file, then discover its headers.
    fn preprocess_one(
        &self,
        file: &SourceFile,
        output: PathBuf,
        discovery: &DiscoveryState,
        tracker: &dyn InputTracker,
        recorder: Option<&OperationRecorder>,
    ) -> Result<PathBuf> {
        // Ensure output directory exists
        if let Some(parent) = output.parent() {
            ensure_dir(parent)?;
        }

        let spec = self
            .preprocessor
            .preprocess_command(&self.input_for(file, output.clone()));

        tracing::debug!(
            "Preprocessing {} -> {}",
            file.path.display(),
            output.display()
        );

        let result = self.invoker.invoke(&spec)?;

        if !result.success {
            tracing::debug!(
                "Preprocessor exited with code {:?} for {}",
                result.code,
                file.path.display()
            );
            return Err(PreprocessFailedError {
                source_file: file.path.clone(),
                stderr: result.stderr,
            }
            .into());
        }

        if let Some(recorder) = recorder {
            recorder.record(PreprocessEvent::source_preprocessed(&file.path, &output));
        }

        self.discover_includes(&output, discovery, tracker, recorder)?;

        Ok(output)
    }

    /// Parse one preprocessed file and register newly discovered headers.
    ///
    /// The token set gates canonicalization, the canonical set gates
    /// registration; together they guarantee one registration per header.
    fn discover_includes(
        &self,
        preprocessed: &Path,
        discovery: &DiscoveryState,
        tracker: &dyn InputTracker,
        recorder: Option<&OperationRecorder>,
    ) -> Result<()> {
        self.parser.parse_file(preprocessed, |token| {
            if discovery.offer_token(token) {
                let canonical = canonicalize(Path::new(token))?;
                if discovery.offer_canonical_path(&canonical) {
                    tracker.register_input(&canonical)?;
                    if let Some(recorder) = recorder {
                        recorder.record(PreprocessEvent::header_discovered(&canonical));
                    }
                }
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::fixtures::{fixture_project, line_marker_output};
    use crate::test_support::ScriptedInvoker;
    use crate::tracker::RecordingInputTracker;

    fn driver_options(project: &Path) -> DriverOptions {
        DriverOptions {
            include_roots: vec![project.join("include")],
            compiler_options: vec!["-O1".to_string()],
            output_dir: project.join("out"),
            header_root: project.join("headers"),
        }
    }

    #[test]
    fn test_shared_header_registered_once() {
        let (_tmp, project) = fixture_project();
        let common = project.join("include/common.h");

        // Both sources pull in the same header; one via a dotted spelling
        let dotted = project.join("include/../include/common.h");
        let invoker = ScriptedInvoker::new()
            .with_output(
                project.join("src/a.c"),
                line_marker_output(&[&project.join("src/a.c"), &common]),
            )
            .with_output(
                project.join("src/b.c"),
                line_marker_output(&[&project.join("src/b.c"), &dotted]),
            );

        let pp = Preprocessor::new("/usr/bin/cc");
        let driver = PreprocessDriver::new(&pp, &invoker, driver_options(&project));

        let sources = SourceSet::scan(&project.join("src")).unwrap();
        let tracker = RecordingInputTracker::new();

        let summary = driver.run(&sources, &tracker, None).unwrap();

        assert_eq!(summary.outputs.len(), 2);
        assert!(project.join("out/a.i").exists());
        assert!(project.join("out/b.i").exists());

        let inputs = tracker.inputs();
        let canonical_common = canonicalize(&common).unwrap();
        assert!(inputs.contains(&canonical_common));
        // a.c, b.c, and common.h once each despite two spellings
        assert_eq!(inputs.len(), 3);
        assert_eq!(summary.headers_registered, 3);
    }

    #[test]
    fn test_unrecognized_extension_is_skipped() {
        let (_tmp, project) = fixture_project();
        std::fs::write(project.join("src/notes.txt"), "not a source").unwrap();

        let invoker = ScriptedInvoker::new()
            .with_output(
                project.join("src/a.c"),
                line_marker_output(&[&project.join("src/a.c")]),
            )
            .with_output(
                project.join("src/b.c"),
                line_marker_output(&[&project.join("src/b.c")]),
            );

        let pp = Preprocessor::new("/usr/bin/cc");
        let driver = PreprocessDriver::new(&pp, &invoker, driver_options(&project));

        let sources = SourceSet::scan(&project.join("src")).unwrap();
        assert_eq!(sources.len(), 3);

        let tracker = RecordingInputTracker::new();
        let summary = driver.run(&sources, &tracker, None).unwrap();

        // .txt produced no invocation, no output, no error
        assert_eq!(summary.outputs.len(), 2);
        assert_eq!(invoker.invocation_count(), 2);
        assert!(!project.join("out/notes.i").exists());
    }

    #[test]
    fn test_cpp_source_gets_ii_output() {
        let (_tmp, project) = fixture_project();
        std::fs::write(project.join("src/app.cpp"), "int app() { return 0; }").unwrap();

        let invoker = ScriptedInvoker::new()
            .with_output(
                project.join("src/a.c"),
                line_marker_output(&[&project.join("src/a.c")]),
            )
            .with_output(
                project.join("src/b.c"),
                line_marker_output(&[&project.join("src/b.c")]),
            )
            .with_output(
                project.join("src/app.cpp"),
                line_marker_output(&[&project.join("src/app.cpp")]),
            );

        let pp = Preprocessor::new("/usr/bin/cc");
        let driver = PreprocessDriver::new(&pp, &invoker, driver_options(&project));

        let sources = SourceSet::scan(&project.join("src")).unwrap();
        driver.run(&sources, &RecordingInputTracker::new(), None).unwrap();

        assert!(project.join("out/app.ii").exists());
    }

    #[test]
    fn test_failed_invocation_is_fatal() {
        let (_tmp, project) = fixture_project();

        let invoker = ScriptedInvoker::new()
            .with_output(
                project.join("src/a.c"),
                line_marker_output(&[&project.join("src/a.c")]),
            )
            .with_failure(project.join("src/b.c"), "b.c:1: error: nope");

        let pp = Preprocessor::new("/usr/bin/cc");
        let driver = PreprocessDriver::new(&pp, &invoker, driver_options(&project));

        let sources = SourceSet::scan(&project.join("src")).unwrap();
        let tracker = RecordingInputTracker::new();

        let err = driver.run(&sources, &tracker, None).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("preprocessing failed"));
        assert!(message.contains("b.c"));
    }

    #[test]
    fn test_unresolvable_header_is_fatal() {
        let (_tmp, project) = fixture_project();
        let ghost = project.join("include/ghost.h");

        let invoker = ScriptedInvoker::new()
            .with_output(
                project.join("src/a.c"),
                line_marker_output(&[&ghost]),
            )
            .with_output(
                project.join("src/b.c"),
                line_marker_output(&[&project.join("src/b.c")]),
            );

        let pp = Preprocessor::new("/usr/bin/cc");
        let driver = PreprocessDriver::new(&pp, &invoker, driver_options(&project));

        let sources = SourceSet::scan(&project.join("src")).unwrap();
        let err = driver
            .run(&sources, &RecordingInputTracker::new(), None)
            .unwrap_err();
        assert!(format!("{err:#}").contains("ghost.h"));
    }

    #[test]
    fn test_plan_covers_recognized_sources_only() {
        let (_tmp, project) = fixture_project();
        std::fs::write(project.join("src/notes.txt"), "not a source").unwrap();

        let invoker = ScriptedInvoker::new();
        let pp = Preprocessor::new("/usr/bin/cc");
        let driver = PreprocessDriver::new(&pp, &invoker, driver_options(&project));

        let sources = SourceSet::scan(&project.join("src")).unwrap();
        let plan = driver.plan(&sources);

        assert_eq!(plan.len(), 2);
        for spec in &plan {
            assert!(spec.args.contains(&"-E".to_string()));
            assert!(spec.args.contains(&"-m64".to_string()));
        }
        assert_eq!(invoker.invocation_count(), 0);
    }

    #[test]
    fn test_recorder_sees_per_file_events() {
        let (_tmp, project) = fixture_project();
        let common = project.join("include/common.h");

        let invoker = ScriptedInvoker::new()
            .with_output(
                project.join("src/a.c"),
                line_marker_output(&[&common]),
            )
            .with_output(
                project.join("src/b.c"),
                line_marker_output(&[&common]),
            );

        let pp = Preprocessor::new("/usr/bin/cc");
        let driver = PreprocessDriver::new(&pp, &invoker, driver_options(&project));

        let sources = SourceSet::scan(&project.join("src")).unwrap();
        let recorder = OperationRecorder::new();
        driver
            .run(&sources, &RecordingInputTracker::new(), Some(&recorder))
            .unwrap();

        let events = recorder.retrieve_events_and_stop();
        let preprocessed = events
            .iter()
            .filter(|e| matches!(e, PreprocessEvent::SourcePreprocessed { .. }))
            .count();
        let discovered = events
            .iter()
            .filter(|e| matches!(e, PreprocessEvent::HeaderDiscovered { .. }))
            .count();

        assert_eq!(preprocessed, 2);
        // common.h discovered once, despite both files referencing it
        assert_eq!(discovered, 1);
    }
}
