//! Command-line arguments

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use footprint_core::runner::DEFAULT_INTERPRETER;
use footprint_core::{ExitCode, PipelineConfig};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

pub const DEFAULT_OUTPUT_SUFFIX: &str = ".size_determination.output.tcl";
pub const DEFAULT_BACKUP_SUFFIX: &str = ".size_determination.automated_backup.original.tcl";

pub fn command() -> Command {
    Command::new("pf-footprint")
        .version(footprint_core::VERSION)
        .about("Predict the memory footprint of a ParFlow run from its Tcl control script")
        .after_help(ExitCode::table())
        .arg(
            Arg::new("file_path")
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .help("Path to input tcl script"),
        )
        .arg(
            Arg::new("execution_arguments")
                .num_args(0..)
                .trailing_var_arg(true)
                .allow_hyphen_values(true)
                .help("Arguments supplied to execute the tcl script, if any"),
        )
        .arg(
            Arg::new("exact_command")
                .long("exact-command")
                .action(ArgAction::SetTrue)
                .help("Run execution_arguments exactly as given instead of wrapping them with the tcl shell"),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .value_parser(value_parser!(PathBuf))
                .help(format!("Instrumented script path (default: <file_path>{DEFAULT_OUTPUT_SUFFIX})")),
        )
        .arg(
            Arg::new("backup_suffix")
                .long("backup-suffix")
                .default_value(DEFAULT_BACKUP_SUFFIX)
                .help("Suffix for the backup made by --replace-existing"),
        )
        .arg(
            Arg::new("replace_existing")
                .long("replace-existing")
                .action(ArgAction::SetTrue)
                .help("Rename the input with the backup suffix and write the instrumented script in its place"),
        )
        .arg(
            Arg::new("enable_clobber")
                .long("enable-clobber")
                .action(ArgAction::SetTrue)
                .help("Allow overwriting existing files"),
        )
        .arg(
            Arg::new("tcl_shell")
                .long("tcl-shell")
                .default_value(DEFAULT_INTERPRETER)
                .help("Command for executing tcl scripts"),
        )
        .arg(
            Arg::new("prediction_module")
                .long("prediction-module")
                .value_parser(value_parser!(PathBuf))
                .help("TOML prediction module (default: built-in quadratic grid-size model)"),
        )
        .arg(
            Arg::new("json_output")
                .long("json-output")
                .value_parser(value_parser!(PathBuf))
                .help("Write the report here instead of standard output"),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .action(ArgAction::SetTrue)
                .help("Log instrumented scripts and process output"),
        )
}

/// Parsed command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliArgs {
    pub file_path: PathBuf,
    pub execution_arguments: Vec<String>,
    pub exact_command: bool,
    pub output: Option<PathBuf>,
    pub backup_suffix: String,
    pub replace_existing: bool,
    pub enable_clobber: bool,
    pub tcl_shell: String,
    pub prediction_module: Option<PathBuf>,
    pub json_output: Option<PathBuf>,
    pub debug: bool,
}

impl CliArgs {
    pub fn from_matches(matches: &ArgMatches) -> Self {
        Self {
            file_path: matches.get_one::<PathBuf>("file_path").cloned().unwrap_or_default(),
            execution_arguments: matches
                .get_many::<String>("execution_arguments")
                .map(|values| values.cloned().collect())
                .unwrap_or_default(),
            exact_command: matches.get_flag("exact_command"),
            output: matches.get_one::<PathBuf>("output").cloned(),
            backup_suffix: matches
                .get_one::<String>("backup_suffix")
                .cloned()
                .unwrap_or_else(|| DEFAULT_BACKUP_SUFFIX.to_string()),
            replace_existing: matches.get_flag("replace_existing"),
            enable_clobber: matches.get_flag("enable_clobber"),
            tcl_shell: matches
                .get_one::<String>("tcl_shell")
                .cloned()
                .unwrap_or_else(|| DEFAULT_INTERPRETER.to_string()),
            prediction_module: matches.get_one::<PathBuf>("prediction_module").cloned(),
            json_output: matches.get_one::<PathBuf>("json_output").cloned(),
            debug: matches.get_flag("debug"),
        }
    }

    /// Flag combinations that cannot work together
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.replace_existing && self.output.is_some() {
            problems.push("cannot use --output and --replace-existing together".to_string());
        }
        if self.output.as_deref() == Some(self.file_path.as_path()) {
            problems.push("input and output cannot be the same file".to_string());
        }
        problems
    }

    /// Where the instrumented script is written
    pub fn output_path(&self) -> PathBuf {
        if self.replace_existing {
            return self.file_path.clone();
        }
        self.output
            .clone()
            .unwrap_or_else(|| with_suffix(&self.file_path, DEFAULT_OUTPUT_SUFFIX))
    }

    /// Where --replace-existing moves the original script
    pub fn backup_path(&self) -> PathBuf {
        with_suffix(&self.file_path, &self.backup_suffix)
    }

    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig::default()
            .with_interpreter(self.tcl_shell.clone())
            .with_exact_command(self.exact_command)
            .with_debug(self.debug)
    }
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}
