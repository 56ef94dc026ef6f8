//! pf-footprint
//!
//! Instruments a ParFlow Tcl script, runs it with `pfrun` intercepted, and
//! prints the predicted memory footprint as JSON.

mod cli;
mod logging;

use anyhow::Context;
use cli::CliArgs;
use footprint_core::files::{move_file, write_json, write_text};
use footprint_core::{
    default_plugin, load_plugin, ExitCode, FileError, FootprintError, Pipeline, PredictionFunction,
    PredictionPlugin,
};
use std::path::PathBuf;
use tracing::{debug, info};

fn main() {
    let matches = cli::command().get_matches();
    let args = CliArgs::from_matches(&matches);
    logging::init(args.debug);

    let code = run(&args);
    std::process::exit(code.code());
}

fn run(args: &CliArgs) -> ExitCode {
    let problems = args.validate();
    if !problems.is_empty() {
        for problem in &problems {
            eprintln!("Error: {problem}");
        }
        eprintln!("There were errors from command line flag usage.\nPlease check usage.\n");
        eprintln!("{}", cli::command().render_help());
        return ExitCode::CommandLineError;
    }

    match estimate_footprint(args) {
        Ok(()) => ExitCode::Success,
        Err(err) => report_failure(&err),
    }
}

fn estimate_footprint(args: &CliArgs) -> anyhow::Result<()> {
    let function = prediction_function(args)?;
    let pipeline = Pipeline::new(args.pipeline_config());

    let (input, output) = script_paths(args)?;
    let source = std::fs::read_to_string(&input)
        .map_err(|source| FootprintError::from(FileError::io_error(&input, source)))?;

    let instrumented = pipeline.instrument(&source);
    write_text(&output, &instrumented.document.text(), args.enable_clobber).map_err(FootprintError::from)?;
    info!(script = %output.display(), "wrote instrumented script");

    let report = pipeline.run(&output, &args.execution_arguments, &function)?;
    debug!(?report, "prediction complete");

    match &args.json_output {
        Some(path) => write_json(path, &report, args.enable_clobber).map_err(FootprintError::from)?,
        None => println!(
            "{}",
            serde_json::to_string_pretty(&report).context("failed to render report")?
        ),
    }
    Ok(())
}

fn prediction_function(args: &CliArgs) -> Result<PredictionFunction, FootprintError> {
    let function = match &args.prediction_module {
        Some(path) => load_plugin(path)?.prediction_function()?,
        None => default_plugin().prediction_function()?,
    };
    debug!(function = function.name(), "loaded prediction function");
    Ok(function)
}

/// Script to read and path to write the instrumented copy to
fn script_paths(args: &CliArgs) -> Result<(PathBuf, PathBuf), FootprintError> {
    let output = args.output_path();
    if !args.replace_existing {
        return Ok((args.file_path.clone(), output));
    }

    let backup = args.backup_path();
    move_file(&args.file_path, &backup, args.enable_clobber)?;
    info!(backup = %backup.display(), "moved original script");
    Ok((backup, output))
}

fn report_failure(err: &anyhow::Error) -> ExitCode {
    let Some(failure) = err.downcast_ref::<FootprintError>() else {
        eprintln!("Error: unexpected failure: {err:#}");
        return ExitCode::InternalError;
    };

    eprintln!("Error: {failure}");
    if let FootprintError::File(FileError::Clobber { .. }) = failure {
        eprintln!("Either move the existing file or pass --enable-clobber.");
    }
    failure.exit_code()
}
