//! ParFlow footprint prediction
//!
//! Estimates the memory footprint of a ParFlow run without running the
//! simulation. The run's Tcl control script is instrumented so that `pfrun`
//! prints the grid, timing and topology settings instead of solving, the
//! instrumented script is executed, and the printed parameters are fed to a
//! pluggable prediction function.
//!
//! # Stages
//!
//! - **Instrument**: [`ScriptInstrumenter`] inserts a `pfrun` redefinition
//! - **Run**: [`ProcessRunner`] executes the script and captures its output
//! - **Extract**: [`ReportExtractor`] decodes the sentinel-delimited report
//! - **Estimate**: [`estimate`] applies a [`PredictionFunction`] and validates it
//!
//! # Example
//!
//! ```rust,ignore
//! use footprint_core::prelude::*;
//!
//! let pipeline = Pipeline::new(PipelineConfig::default());
//! let instrumented = pipeline.instrument(&std::fs::read_to_string("run.tcl")?);
//! write_text("run.instrumented.tcl", &instrumented.document.text(), false)?;
//!
//! let function = default_plugin().prediction_function()?;
//! let report = pipeline.run("run.instrumented.tcl".as_ref(), &[], &function)?;
//! println!("{} kB", report.footprint.amount);
//! ```

pub mod error;
pub mod estimator;
pub mod extract;
pub mod files;
pub mod instrument;
pub mod pipeline;
pub mod plugin;
pub mod report;
pub mod runner;
pub mod script;

pub use error::{
    ExecutionError, ExitCode, FileError, FootprintError, FootprintResult, InstrumentationWarning,
    InvalidPredictionValueError, ModuleContractError, ParseFailure,
};
pub use estimator::{estimate, predict_footprint, Footprint, FootprintReport, FootprintUnit};
pub use extract::{extract, ReportExtractor, Sentinel, DEFAULT_SENTINEL};
pub use instrument::{instrument, Instrumentation, ScriptInstrumenter};
pub use pipeline::{Pipeline, PipelineConfig};
pub use plugin::{default_plugin, load_plugin, PredictionFunction, PredictionPlugin};
pub use report::{ExecutionReport, Grid, ProcessTopology, TimeInfo};
pub use runner::{run_script, ProcessOutput, ProcessRunner, ScriptRunner};
pub use script::{ScriptDocument, ScriptMarkers};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for running the pipeline
    pub use crate::error::{FootprintError, FootprintResult};
    pub use crate::files::{move_file, write_json, write_text};
    pub use crate::pipeline::{Pipeline, PipelineConfig};
    pub use crate::plugin::{default_plugin, load_plugin, PredictionFunction, PredictionPlugin};
    pub use crate::report::ExecutionReport;
    pub use crate::estimator::FootprintReport;
}
