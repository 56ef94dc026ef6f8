//! Testing utilities for the footprint workspace
//!
//! Sample control scripts, wire payload builders and mock interpreters.

#![allow(missing_docs)]

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Default report sentinel, duplicated here so fixtures stay independent
pub const SENTINEL: &str = "HOPEFULLY UNIQUE PREAMBLE THAT BLOCKS OFF VALID JSON CODE FROM OUTPUT";

/// Small but complete ParFlow control script
pub const SAMPLE_SCRIPT: &str = "\
# Simple box domain
set tcl_precision 17

lappend auto_path $env(PARFLOW_DIR)/bin
package require parflow
namespace import Parflow::*

pfset FileVersion 4

pfset Process.Topology.P 1
pfset Process.Topology.Q 1
pfset Process.Topology.R 1

pfset ComputationalGrid.NX 4
pfset ComputationalGrid.NY 4
pfset ComputationalGrid.NZ 4

pfset TimingInfo.BaseUnit 1.0
pfset TimingInfo.StartTime 0.0
pfset TimingInfo.StopTime 1.0

pfrun box
pfundist box
";

/// Script without any namespace import
pub const SCRIPT_WITHOUT_NAMESPACE: &str = "\
lappend auto_path $env(PARFLOW_DIR)/bin
package require parflow

pfset ComputationalGrid.NX 4
Parflow::pfrun box
";

/// Report payload in the exact wire shape
#[allow(clippy::too_many_arguments)]
pub fn wire_payload(nx: u64, ny: u64, nz: u64, time_steps: f64, np: u64, nq: u64, nr: u64) -> String {
    serde_json::json!({
        "grid": {"NX": nx, "NY": ny, "NZ": nz},
        "time": {"time_steps": time_steps},
        "process_topology": {"NP": np, "NQ": nq, "NR": nr},
    })
    .to_string()
}

/// Payload between sentinels, with chatter around it
pub fn script_output(sentinel: &str, payload: &str) -> String {
    format!("pfrun box has been intercepted\n{sentinel}\n{payload}\n{sentinel}\nbye\n")
}

/// Write an executable shell script
pub fn write_executable(dir: &Path, name: &str, body: &str) -> io::Result<PathBuf> {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}"))?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))?;
    }
    Ok(path)
}

/// Write a fake Tcl interpreter
///
/// It fails with exit code 2 unless its first argument is a script
/// containing the `pfrun` redefinition; otherwise it prints `stdout` and
/// exits with `exit_code`.
pub fn write_mock_interpreter(dir: &Path, stdout: &str, exit_code: i32) -> io::Result<PathBuf> {
    let body = format!(
        "grep -q 'proc Parflow::pfrun' \"$1\" || {{ echo \"not instrumented: $1\" >&2; exit 2; }}\n\
         cat <<'__FOOTPRINT_EOF__'\n{stdout}\n__FOOTPRINT_EOF__\n\
         exit {exit_code}\n"
    );
    write_executable(dir, "mock-tclsh", &body)
}

/// Minimal `parflow` Tcl package
///
/// `pfset`/`pfget` store keys in an array; the real `pfrun` refuses to run so
/// only an intercepted run can succeed.
pub const PARFLOW_STUB_PACKAGE: &str = r#"namespace eval Parflow {
    variable settings
    array set settings {}
    namespace export pfset pfget pfrun pfundist
}

proc Parflow::pfset { key value } {
    variable settings
    set settings($key) $value
}

proc Parflow::pfget { key } {
    variable settings
    return $settings($key)
}

proc Parflow::pfrun { runname args } {
    error "pfrun $runname was not intercepted"
}

proc Parflow::pfundist { runname } {}

package provide parflow 1.0
"#;

/// Write the stub `parflow` package into `dir`, returning the directory to
/// add to `auto_path`
pub fn write_parflow_stub(dir: &Path) -> io::Result<PathBuf> {
    let package_dir = dir.join("parflow-stub");
    fs::create_dir_all(&package_dir)?;
    fs::write(package_dir.join("parflow.tcl"), PARFLOW_STUB_PACKAGE)?;
    fs::write(
        package_dir.join("pkgIndex.tcl"),
        "package ifneeded parflow 1.0 [list source [file join $dir parflow.tcl]]\n",
    )?;
    Ok(package_dir)
}

/// [`SAMPLE_SCRIPT`] loading the package from `package_dir` and using the
/// given timing settings
pub fn sample_script_with(package_dir: &Path, base_unit: &str, start: &str, stop: &str) -> String {
    SAMPLE_SCRIPT
        .replace("$env(PARFLOW_DIR)/bin", &package_dir.to_string_lossy())
        .replace("TimingInfo.BaseUnit 1.0", &format!("TimingInfo.BaseUnit {base_unit}"))
        .replace("TimingInfo.StartTime 0.0", &format!("TimingInfo.StartTime {start}"))
        .replace("TimingInfo.StopTime 1.0", &format!("TimingInfo.StopTime {stop}"))
}

/// Whether a `tclsh` is on the path
pub fn tclsh_available() -> bool {
    std::process::Command::new("sh")
        .args(["-c", "command -v tclsh"])
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_shape() {
        let value: serde_json::Value = serde_json::from_str(&wire_payload(1, 2, 3, 4.5, 5, 6, 7)).unwrap();
        assert_eq!(value["grid"]["NZ"], 3);
        assert_eq!(value["time"]["time_steps"], 4.5);
        assert_eq!(value["process_topology"]["NR"], 7);
    }

    #[test]
    fn output_wraps_payload() {
        let output = script_output(SENTINEL, "{}");
        assert_eq!(output.matches(SENTINEL).count(), 2);
    }

    #[test]
    fn sample_script_timing_is_replaced() {
        let script = sample_script_with(Path::new("/opt/stub"), "2", "0", "5");
        assert!(script.contains("lappend auto_path /opt/stub\n"));
        assert!(script.contains("pfset TimingInfo.BaseUnit 2\n"));
        assert!(script.contains("pfset TimingInfo.StartTime 0\n"));
        assert!(script.contains("pfset TimingInfo.StopTime 5\n"));
    }
}
