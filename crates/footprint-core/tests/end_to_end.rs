//! Full pipeline against a mock Tcl interpreter
#![cfg(unix)]

use footprint_core::files::write_text;
use footprint_core::plugin::VolumetricModel;
use footprint_core::{
    ExecutionError, ExecutionReport, FootprintError, ParseFailure, Pipeline, PipelineConfig,
    PredictionPlugin,
};
use footprint_test_utils::{
    script_output, wire_payload, write_mock_interpreter, SAMPLE_SCRIPT, SCRIPT_WITHOUT_NAMESPACE, SENTINEL,
};
use std::path::PathBuf;

struct Setup {
    _dir: tempfile::TempDir,
    script: PathBuf,
    pipeline: Pipeline,
}

fn setup(source: &str, stdout: &str, exit_code: i32) -> Setup {
    let dir = tempfile::tempdir().unwrap();
    let interpreter = write_mock_interpreter(dir.path(), stdout, exit_code).unwrap();
    let pipeline = Pipeline::new(
        PipelineConfig::default().with_interpreter(interpreter.to_string_lossy().into_owned()),
    );

    let instrumented = pipeline.instrument(source);
    let script = dir.path().join("run.size_determination.output.tcl");
    write_text(&script, &instrumented.document.text(), false).unwrap();

    Setup {
        _dir: dir,
        script,
        pipeline,
    }
}

#[test]
fn volumetric_estimate_for_small_box() {
    let stdout = script_output(SENTINEL, &wire_payload(4, 4, 4, 1.0, 1, 1, 1));
    let setup = setup(SAMPLE_SCRIPT, &stdout, 0);
    let function = VolumetricModel::default().prediction_function().unwrap();

    let report = setup.pipeline.run(&setup.script, &[], &function).unwrap();

    assert_eq!(report.execution_report(), ExecutionReport::new([4, 4, 4], 1.0, [1, 1, 1]));
    assert!((report.footprint.kilobytes() - 76.8768).abs() < 1e-9);

    let json = serde_json::to_value(report).unwrap();
    assert_eq!(json["footprint"]["units"], "kilobyte");
}

#[test]
fn uninstrumented_script_is_rejected_by_interpreter() {
    let stdout = script_output(SENTINEL, &wire_payload(4, 4, 4, 1.0, 1, 1, 1));
    let setup = setup(SCRIPT_WITHOUT_NAMESPACE, &stdout, 0);

    let err = setup.pipeline.execute(&setup.script, &[]).unwrap_err();
    match err {
        FootprintError::Execution(ExecutionError::Failed { exit_code, stderr, .. }) => {
            assert_eq!(exit_code, Some(2));
            assert!(stderr.contains("not instrumented"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn nonzero_exit_fails_even_with_report() {
    let stdout = script_output(SENTINEL, &wire_payload(4, 4, 4, 1.0, 1, 1, 1));
    let setup = setup(SAMPLE_SCRIPT, &stdout, 1);

    let err = setup.pipeline.execute(&setup.script, &[]).unwrap_err();
    match err {
        FootprintError::Execution(ExecutionError::Failed {
            exit_code,
            stdout,
            command,
            ..
        }) => {
            assert_eq!(exit_code, Some(1));
            assert!(stdout.contains(SENTINEL));
            assert_eq!(command.len(), 2);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn chatter_without_report_is_parse_failure() {
    let setup = setup(SAMPLE_SCRIPT, "ParFlow says hello", 0);
    let err = setup.pipeline.execute(&setup.script, &[]).unwrap_err();
    match err {
        FootprintError::Parse(failure @ ParseFailure::MissingReport { .. }) => {
            assert!(failure.output().contains("ParFlow says hello"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn script_arguments_are_forwarded() {
    let dir = tempfile::tempdir().unwrap();
    let stdout = script_output(SENTINEL, &wire_payload(8, 8, 2, 0.0, 2, 1, 1));
    let interpreter = footprint_test_utils::write_executable(
        dir.path(),
        "args-tclsh",
        &format!(
            "[ \"$2\" = \"--steps\" ] && [ \"$3\" = \"10\" ] || exit 9\ncat <<'EOF'\n{stdout}\nEOF\n"
        ),
    )
    .unwrap();

    let pipeline = Pipeline::new(
        PipelineConfig::default().with_interpreter(interpreter.to_string_lossy().into_owned()),
    );
    let report = pipeline
        .execute(
            &dir.path().join("run.tcl"),
            &["--steps".to_string(), "10".to_string()],
        )
        .unwrap();
    assert_eq!(report.grid.nz, 2);
    assert_eq!(report.process_topology.np, 2);
}

#[test]
fn exact_command_ignores_interpreter() {
    let stdout = script_output(SENTINEL, &wire_payload(3, 3, 3, 2.0, 1, 1, 1));
    let pipeline = Pipeline::new(
        PipelineConfig::default()
            .with_interpreter("not-a-real-tclsh")
            .with_exact_command(true),
    );
    let command = vec!["printf".to_string(), "%s".to_string(), stdout];
    let report = pipeline.execute("ignored.tcl".as_ref(), &command).unwrap();
    assert_eq!(report.time.time_steps, 2.0);
}
