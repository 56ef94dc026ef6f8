//! Error types for the footprint pipeline
//!
//! Each stage fails with its own error type:
//! - Execution of the instrumented script ([`ExecutionError`])
//! - Extraction of the embedded report ([`ParseFailure`])
//! - Prediction module loading ([`ModuleContractError`])
//! - Prediction value validation ([`InvalidPredictionValueError`])
//! - Clobber-checked file output ([`FileError`])
//!
//! [`FootprintError`] unifies them and maps each kind to a stable [`ExitCode`].

use serde_json::Value;
use std::path::PathBuf;

/// Non-fatal findings while scanning a control script
///
/// Line numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InstrumentationWarning {
    /// `package require parflow` appears more than once
    #[error("re-requiring package on line {line} (previously {previous})")]
    DuplicatePackageRequire { previous: usize, line: usize },

    /// `namespace import Parflow::*` appears more than once
    #[error("re-importing namespace on line {line} (previously {previous})")]
    DuplicateNamespaceImport { previous: usize, line: usize },

    /// No namespace import, so there is nowhere to insert the redefinition
    #[error("expected Parflow namespace import was never found")]
    MissingNamespaceImport,
}

/// Errors while running the instrumented script
#[derive(Debug, thiserror::Error)]
pub enum ExecutionError {
    /// Process ran but did not exit cleanly
    #[error(
        "script command \"{}\" failed with exit code {}\nStandard Output:\n{stdout}\n\nStandard Error:\n{stderr}",
        .command.join(" "),
        describe_exit(.exit_code)
    )]
    Failed {
        command: Vec<String>,
        stdout: String,
        stderr: String,
        /// `None` when the process was terminated by a signal
        exit_code: Option<i32>,
    },

    /// Process could not be started
    #[error("failed to spawn \"{}\": {source}", .command.join(" "))]
    Spawn {
        command: Vec<String>,
        #[source]
        source: std::io::Error,
    },

    /// Exact command mode with an empty argument list
    #[error("exact command requested but no command was given")]
    EmptyCommand,
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "<terminated by signal>".to_string(),
    }
}

/// Errors while extracting the report from script output
#[derive(Debug, thiserror::Error)]
pub enum ParseFailure {
    /// No sentinel-delimited payload in the output
    #[error("invalid output from script, no report found:\n{}", indent(.output))]
    MissingReport { output: String },

    /// Payload is not JSON of the expected shape
    #[error("invalid report payload ({source}) in output:\n{}", indent(.output))]
    InvalidPayload {
        output: String,
        #[source]
        source: serde_json::Error,
    },

    /// Payload parsed but a value is out of range
    #[error("report field {field} has invalid value {value} in output:\n{}", indent(.output))]
    OutOfRange {
        field: &'static str,
        value: String,
        output: String,
    },
}

impl ParseFailure {
    /// Raw script output the failure was raised for
    #[inline]
    #[must_use]
    pub fn output(&self) -> &str {
        match self {
            Self::MissingReport { output }
            | Self::InvalidPayload { output, .. }
            | Self::OutOfRange { output, .. } => output,
        }
    }
}

fn indent(text: &str) -> String {
    text.lines().map(|line| format!("\t{line}\n")).collect()
}

/// Prediction module does not honour the plugin contract
#[derive(Debug, thiserror::Error)]
pub enum ModuleContractError {
    /// Module has no `[prediction_function]` factory
    #[error("prediction module ({}) lacks the required [prediction_function] table", .path.display())]
    MissingFactory { path: PathBuf },

    /// Module file could not be read
    #[error("io error reading prediction module {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Module exists but its contents are unusable
    #[error("malformed prediction module {}: {message}", .path.display())]
    Malformed { path: PathBuf, message: String },
}

/// Prediction function returned something other than a non-negative number
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("prediction function ({function_name}) produced an invalid value\n\tdisplay: {value}\n\tdebug: {value:?}")]
pub struct InvalidPredictionValueError {
    pub value: Value,
    pub function_name: String,
}

/// Errors from clobber-checked file operations
#[derive(Debug, thiserror::Error)]
pub enum FileError {
    /// Destination exists and overwriting was not requested
    #[error("path {} already exists", .path.display())]
    Clobber { path: PathBuf },

    #[error("io error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize output for {}: {source}", .path.display())]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl FileError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Path the failure refers to
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::Clobber { path } | Self::Io { path, .. } | Self::Serialize { path, .. } => path,
        }
    }
}

/// Combined pipeline error
#[derive(Debug, thiserror::Error)]
pub enum FootprintError {
    #[error("execution error: {0}")]
    Execution(#[from] ExecutionError),

    #[error("parse error: {0}")]
    Parse(#[from] ParseFailure),

    #[error("module contract error: {0}")]
    ModuleContract(#[from] ModuleContractError),

    #[error("prediction error: {0}")]
    InvalidPrediction(#[from] InvalidPredictionValueError),

    #[error("file error: {0}")]
    File(#[from] FileError),
}

impl FootprintError {
    /// Exit code the command-line front end reports for this error
    #[must_use]
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::Execution(_) | Self::Parse(_) => ExitCode::InternalError,
            Self::ModuleContract(_) => ExitCode::PredictionModuleError,
            Self::InvalidPrediction(_) => ExitCode::PredictionError,
            Self::File(FileError::Clobber { .. }) => ExitCode::ClobberError,
            Self::File(_) => ExitCode::InternalError,
        }
    }
}

/// Result type alias for pipeline operations
pub type FootprintResult<T> = Result<T, FootprintError>;

/// Stable process exit codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ExitCode {
    Success = 0,
    InternalError = -1,
    CommandLineError = -2,
    ClobberError = -3,
    PredictionError = -4,
    PredictionModuleError = -5,
}

impl ExitCode {
    /// Every exit code, in table order
    pub const ALL: [ExitCode; 6] = [
        ExitCode::Success,
        ExitCode::InternalError,
        ExitCode::CommandLineError,
        ExitCode::ClobberError,
        ExitCode::PredictionError,
        ExitCode::PredictionModuleError,
    ];

    /// Numeric code
    #[inline]
    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }

    /// Name used in help output
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            ExitCode::Success => "success",
            ExitCode::InternalError => "internal_error",
            ExitCode::CommandLineError => "command_line_error",
            ExitCode::ClobberError => "clobber_error",
            ExitCode::PredictionError => "prediction_error",
            ExitCode::PredictionModuleError => "prediction_module_error",
        }
    }

    /// Help epilog listing every code
    #[must_use]
    pub fn table() -> String {
        let mut text = String::from("Exit codes:\n");
        for code in Self::ALL {
            text.push_str(&format!("\t{}: {}\n", code.name(), code.code()));
        }
        text
    }
}
