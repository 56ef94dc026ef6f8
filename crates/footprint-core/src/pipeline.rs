//! Pipeline orchestration
//!
//! ```text
//! script text → ScriptInstrumenter → (caller writes file) → ScriptRunner
//!             → ReportExtractor → estimate(PredictionFunction) → FootprintReport
//! ```
//!
//! Stages run strictly in sequence. A failing stage ends the run with its own
//! error kind; nothing is retried or suppressed.

use crate::error::FootprintResult;
use crate::estimator::{estimate, FootprintReport};
use crate::extract::{ReportExtractor, Sentinel};
use crate::instrument::{Instrumentation, ScriptInstrumenter};
use crate::plugin::PredictionFunction;
use crate::report::ExecutionReport;
use crate::runner::{ProcessRunner, ScriptRunner, DEFAULT_INTERPRETER};
use crate::script::ScriptDocument;
use std::path::Path;

/// Settings threaded through every stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Interpreter that runs the instrumented script
    pub interpreter: String,
    /// Treat the execution arguments as the complete command line
    pub exact_command: bool,
    /// Log instrumented scripts and process output in full
    pub debug: bool,
    /// Marker bounding the embedded report
    pub sentinel: Sentinel,
}

impl PipelineConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn with_interpreter(mut self, interpreter: impl Into<String>) -> Self {
        self.interpreter = interpreter.into();
        self
    }

    #[inline]
    #[must_use]
    pub fn with_exact_command(mut self, exact_command: bool) -> Self {
        self.exact_command = exact_command;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_sentinel(mut self, sentinel: Sentinel) -> Self {
        self.sentinel = sentinel;
        self
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            interpreter: DEFAULT_INTERPRETER.to_string(),
            exact_command: false,
            debug: false,
            sentinel: Sentinel::default(),
        }
    }
}

/// Instrument, run, extract, estimate
#[derive(Debug, Clone)]
pub struct Pipeline<R = ProcessRunner> {
    config: PipelineConfig,
    instrumenter: ScriptInstrumenter,
    extractor: ReportExtractor,
    runner: R,
}

impl Pipeline<ProcessRunner> {
    /// Pipeline running scripts as child processes
    #[must_use]
    pub fn new(config: PipelineConfig) -> Self {
        let runner = ProcessRunner::new(config.interpreter.clone())
            .with_exact_command(config.exact_command)
            .with_debug(config.debug);
        Self::with_runner(config, runner)
    }
}

impl<R: ScriptRunner> Pipeline<R> {
    /// Pipeline with a custom runner
    #[must_use]
    pub fn with_runner(config: PipelineConfig, runner: R) -> Self {
        Self {
            instrumenter: ScriptInstrumenter::new(config.sentinel.clone()),
            extractor: ReportExtractor::new(config.sentinel.clone()),
            config,
            runner,
        }
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Instrument script text
    #[must_use]
    pub fn instrument(&self, source: &str) -> Instrumentation {
        let document = ScriptDocument::parse(source);
        let instrumentation = self.instrumenter.instrument(&document);
        if self.config.debug {
            tracing::debug!(
                "{sep}\nNew Script\n{dash}\n{text}\n{sep}",
                sep = "=".repeat(50),
                dash = "-".repeat(50),
                text = instrumentation.document
            );
        }
        instrumentation
    }

    /// Run an instrumented script and extract its report
    pub fn execute(&self, script: &Path, arguments: &[String]) -> FootprintResult<ExecutionReport> {
        let output = self.runner.run(script, arguments)?;
        let report = self.extractor.extract(&output.stdout)?;
        Ok(report)
    }

    /// Apply the prediction function to a report
    pub fn predict(
        &self,
        report: &ExecutionReport,
        function: &PredictionFunction,
    ) -> FootprintResult<FootprintReport> {
        Ok(estimate(report, function)?)
    }

    /// Execute then predict
    pub fn run(
        &self,
        script: &Path,
        arguments: &[String],
        function: &PredictionFunction,
    ) -> FootprintResult<FootprintReport> {
        let report = self.execute(script, arguments)?;
        self.predict(&report, function)
    }
}
