//! Parsed control scripts
//!
//! A [`ScriptDocument`] keeps the script's lines verbatim (terminators included)
//! together with the structural markers found by a single scanning pass.
//! Scanning is independent from insertion, see [`crate::instrument`].

use crate::error::InstrumentationWarning;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

/// Name of the run procedure the instrumentation intercepts
pub const RUN_PROCEDURE: &str = "pfrun";

static PACKAGE_REQUIRE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"package\s+require\s+parflow").expect("static pattern"));

static NAMESPACE_IMPORT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"namespace\s+import\s+Parflow::\*").expect("static pattern"));

/// Line indices (0-based) of the structural markers in a script
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptMarkers {
    /// First `package require parflow` line
    pub require_line: Option<usize>,
    /// First `namespace import Parflow::*` line
    pub namespace_line: Option<usize>,
    /// Every line mentioning the run procedure
    pub run_invocations: Vec<usize>,
    warnings: Vec<InstrumentationWarning>,
}

impl ScriptMarkers {
    /// Scan lines for markers
    ///
    /// Only the first occurrence of each marker is recorded; later ones
    /// produce a warning each. A missing namespace import produces exactly
    /// one warning.
    #[must_use]
    pub fn scan<'a, I>(lines: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut markers = Self::default();

        for (index, line) in lines.into_iter().enumerate() {
            if PACKAGE_REQUIRE.is_match(line) {
                match markers.require_line {
                    Some(previous) => {
                        markers
                            .warnings
                            .push(InstrumentationWarning::DuplicatePackageRequire {
                                previous: previous + 1,
                                line: index + 1,
                            });
                    }
                    None => markers.require_line = Some(index),
                }
            }

            if NAMESPACE_IMPORT.is_match(line) {
                match markers.namespace_line {
                    Some(previous) => {
                        markers
                            .warnings
                            .push(InstrumentationWarning::DuplicateNamespaceImport {
                                previous: previous + 1,
                                line: index + 1,
                            });
                    }
                    None => markers.namespace_line = Some(index),
                }
            }

            if line.contains(RUN_PROCEDURE) {
                markers.run_invocations.push(index);
            }
        }

        if markers.namespace_line.is_none() {
            markers
                .warnings
                .push(InstrumentationWarning::MissingNamespaceImport);
        }

        markers
    }

    /// Warnings raised during the scan, in line order
    #[inline]
    #[must_use]
    pub fn warnings(&self) -> &[InstrumentationWarning] {
        &self.warnings
    }
}

/// Immutable control script
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptDocument {
    lines: Vec<String>,
    markers: ScriptMarkers,
}

impl ScriptDocument {
    /// Parse script text, keeping line terminators verbatim
    #[must_use]
    pub fn parse(text: &str) -> Self {
        Self::from_lines(text.split_inclusive('\n').map(str::to_string).collect())
    }

    /// Build from already split lines
    #[must_use]
    pub fn from_lines(lines: Vec<String>) -> Self {
        let markers = ScriptMarkers::scan(lines.iter().map(String::as_str));
        Self { lines, markers }
    }

    /// Lines including their terminators
    #[inline]
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Structural markers found in the script
    #[inline]
    #[must_use]
    pub fn markers(&self) -> &ScriptMarkers {
        &self.markers
    }

    /// Number of lines
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Full script text
    #[must_use]
    pub fn text(&self) -> String {
        self.lines.concat()
    }
}

impl fmt::Display for ScriptDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            f.write_str(line)?;
        }
        Ok(())
    }
}
