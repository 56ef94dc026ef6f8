//! Blocking execution of the instrumented script
//!
//! The script runs once per pipeline invocation. Both output streams are
//! captured in full before anything else happens; there is no timeout.

use crate::error::ExecutionError;
use std::path::Path;
use std::process::{Command, Stdio};

/// Default Tcl interpreter
pub const DEFAULT_INTERPRETER: &str = "tclsh";

/// Captured result of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Command as executed
    pub command: Vec<String>,
    pub stdout: String,
    pub stderr: String,
    pub exit_code: Option<i32>,
}

/// Runs a script and captures its output
///
/// Implemented by [`ProcessRunner`]; tests can substitute a fake.
pub trait ScriptRunner {
    /// Run `script` with `arguments`, failing on a non-zero exit status
    fn run(&self, script: &Path, arguments: &[String]) -> Result<ProcessOutput, ExecutionError>;
}

/// Runs scripts as child processes
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    interpreter: String,
    exact_command: bool,
    debug: bool,
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self::new(DEFAULT_INTERPRETER)
    }
}

impl ProcessRunner {
    #[inline]
    #[must_use]
    pub fn new(interpreter: impl Into<String>) -> Self {
        Self {
            interpreter: interpreter.into(),
            exact_command: false,
            debug: false,
        }
    }

    /// Use the arguments verbatim as the command line
    #[inline]
    #[must_use]
    pub fn with_exact_command(mut self, exact_command: bool) -> Self {
        self.exact_command = exact_command;
        self
    }

    /// Log the full command and streams at debug level
    #[inline]
    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    #[inline]
    #[must_use]
    pub fn interpreter(&self) -> &str {
        &self.interpreter
    }

    /// Command line for a run
    ///
    /// `[interpreter, script, arguments...]`, or just `arguments` in exact mode.
    #[must_use]
    pub fn command_line(&self, script: &Path, arguments: &[String]) -> Vec<String> {
        if self.exact_command {
            return arguments.to_vec();
        }
        let mut command = Vec::with_capacity(arguments.len() + 2);
        command.push(self.interpreter.clone());
        command.push(script.to_string_lossy().into_owned());
        command.extend(arguments.iter().cloned());
        command
    }
}

impl ScriptRunner for ProcessRunner {
    fn run(&self, script: &Path, arguments: &[String]) -> Result<ProcessOutput, ExecutionError> {
        let command = self.command_line(script, arguments);
        let (program, args) = command.split_first().ok_or(ExecutionError::EmptyCommand)?;

        tracing::debug!(command = %command.join(" "), "running script");

        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|source| ExecutionError::Spawn {
                command: command.clone(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        let exit_code = output.status.code();

        if self.debug {
            tracing::debug!(
                "> {}\nStandard Output:\n{stdout}\n\nStandard Error:\n{stderr}",
                command.join(" ")
            );
        }

        if !output.status.success() {
            return Err(ExecutionError::Failed {
                command,
                stdout,
                stderr,
                exit_code,
            });
        }

        Ok(ProcessOutput {
            command,
            stdout,
            stderr,
            exit_code,
        })
    }
}

/// Run a script once with an explicit interpreter and mode
pub fn run_script(
    script: &Path,
    arguments: &[String],
    interpreter: &str,
    exact_command: bool,
) -> Result<ProcessOutput, ExecutionError> {
    ProcessRunner::new(interpreter)
        .with_exact_command(exact_command)
        .run(script, arguments)
}
