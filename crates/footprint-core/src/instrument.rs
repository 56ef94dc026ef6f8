//! Control script instrumentation
//!
//! Inserts a redefinition of `Parflow::pfrun` right after the script's
//! `namespace import Parflow::*` line. The redefined procedure reads the
//! timing, grid and topology settings back from the ParFlow database and
//! prints them as a sentinel-delimited JSON report instead of running the
//! simulation.

use crate::error::InstrumentationWarning;
use crate::extract::Sentinel;
use crate::script::ScriptDocument;
use std::ops::Range;

/// Result of instrumenting a script
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instrumentation {
    /// Rewritten script
    pub document: ScriptDocument,
    /// Non-fatal findings from the marker scan
    pub warnings: Vec<InstrumentationWarning>,
    /// Line range of the inserted block in the new document
    pub inserted: Option<Range<usize>>,
}

impl Instrumentation {
    /// Whether the redefinition block was inserted
    #[inline]
    #[must_use]
    pub fn is_instrumented(&self) -> bool {
        self.inserted.is_some()
    }
}

/// Rewrites control scripts so `pfrun` reports instead of running
#[derive(Debug, Clone, Default)]
pub struct ScriptInstrumenter {
    sentinel: Sentinel,
}

impl ScriptInstrumenter {
    #[inline]
    #[must_use]
    pub fn new(sentinel: Sentinel) -> Self {
        Self { sentinel }
    }

    #[inline]
    #[must_use]
    pub fn sentinel(&self) -> &Sentinel {
        &self.sentinel
    }

    /// Tcl block overriding `Parflow::pfrun`
    #[must_use]
    pub fn redefinition_block(&self) -> String {
        let sentinel = tcl_quote(self.sentinel.as_str());
        format!(
            r#"
proc Parflow::pfrun {{ runname args }} {{
  puts "pfrun $runname has been intercepted by the footprint instrumentation."

  set base_unit  [pfget TimingInfo.BaseUnit]
  set start_time [pfget TimingInfo.StartTime]
  set stop_time  [pfget TimingInfo.StopTime]
  set time_steps [expr {{($stop_time - $start_time) / double($base_unit)}}]

  set NX [pfget ComputationalGrid.NX]
  set NY [pfget ComputationalGrid.NY]
  set NZ [pfget ComputationalGrid.NZ]
  set NP [pfget Process.Topology.P]
  set NQ [pfget Process.Topology.Q]
  set NR [pfget Process.Topology.R]

  puts "{sentinel}"
  puts "{{"
  puts "  \"grid\" : {{ \"NX\" : $NX, \"NY\" : $NY, \"NZ\" : $NZ }},"
  puts "  \"time\" : {{ \"time_steps\" : $time_steps }},"
  puts "  \"process_topology\" : {{ \"NP\" : $NP, \"NQ\" : $NQ, \"NR\" : $NR }}"
  puts "}}"
  puts "{sentinel}"
}}
"#
        )
    }

    /// Produce the instrumented document
    ///
    /// All original lines are kept in order. The block goes right after the
    /// first namespace import; without one the document is returned as is.
    #[must_use]
    pub fn instrument(&self, document: &ScriptDocument) -> Instrumentation {
        let markers = document.markers();
        let warnings = markers.warnings().to_vec();
        for warning in &warnings {
            tracing::warn!("{warning}");
        }

        let Some(namespace_line) = markers.namespace_line else {
            return Instrumentation {
                document: document.clone(),
                warnings,
                inserted: None,
            };
        };

        let block = self.redefinition_block();
        let block_lines: Vec<String> = block.split_inclusive('\n').map(str::to_string).collect();
        let start = namespace_line + 1;
        let inserted = start..start + block_lines.len();

        let mut lines = Vec::with_capacity(document.len() + block_lines.len());
        for (index, line) in document.lines().iter().enumerate() {
            if index == namespace_line {
                let mut line = line.clone();
                if !line.ends_with('\n') {
                    line.push('\n');
                }
                lines.push(line);
                lines.extend(block_lines.iter().cloned());
            } else {
                lines.push(line.clone());
            }
        }

        tracing::debug!(
            after_line = start,
            run_invocations = markers.run_invocations.len(),
            "inserted pfrun redefinition"
        );

        Instrumentation {
            document: ScriptDocument::from_lines(lines),
            warnings,
            inserted: Some(inserted),
        }
    }
}

/// Instrument with the default sentinel
#[must_use]
pub fn instrument(document: &ScriptDocument) -> Instrumentation {
    ScriptInstrumenter::default().instrument(document)
}

/// Escape text for a double-quoted Tcl word inside a braced proc body
///
/// Braces are escaped too, or an unbalanced one would end the body early.
fn tcl_quote(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '"' | '$' | '[' | ']' | '{' | '}') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted
}
