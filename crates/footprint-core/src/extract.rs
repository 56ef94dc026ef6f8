//! Report extraction from mixed script output
//!
//! The instrumented script prints its report between two copies of a
//! [`Sentinel`]. Everything before the first copy and after the second is
//! ordinary script chatter and is ignored. The payload may span lines.
//!
//! The sentinel is a plain literal with no escaping, so a script that
//! prints the sentinel itself will confuse extraction.

use crate::error::ParseFailure;
use crate::report::ExecutionReport;
use std::fmt;

/// Default sentinel bounding the embedded report
pub const DEFAULT_SENTINEL: &str =
    "HOPEFULLY UNIQUE PREAMBLE THAT BLOCKS OFF VALID JSON CODE FROM OUTPUT";

/// Sentinel literal was rejected
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid sentinel {0:?}: must be non-empty and fit on one line")]
pub struct InvalidSentinel(pub String);

/// Literal marker bounding the embedded report
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sentinel(String);

impl Sentinel {
    /// Create a sentinel
    ///
    /// The literal must be non-empty and contain no line breaks, since the
    /// instrumented script prints it on a line of its own.
    pub fn new(literal: impl Into<String>) -> Result<Self, InvalidSentinel> {
        let literal = literal.into();
        if literal.is_empty() || literal.contains(['\n', '\r']) {
            return Err(InvalidSentinel(literal));
        }
        Ok(Self(literal))
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Sentinel {
    fn default() -> Self {
        Self(DEFAULT_SENTINEL.to_string())
    }
}

impl fmt::Display for Sentinel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Finds and decodes the sentinel-delimited report
#[derive(Debug, Clone, Default)]
pub struct ReportExtractor {
    sentinel: Sentinel,
}

impl ReportExtractor {
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

    /// Text between the first sentinel pair, if any
    #[must_use]
    pub fn payload<'a>(&self, output: &'a str) -> Option<&'a str> {
        let marker = self.sentinel.as_str();
        let start = output.find(marker)? + marker.len();
        let end = output[start..].find(marker)?;
        let payload = &output[start..start + end];
        (!payload.is_empty()).then_some(payload)
    }

    /// Decode the report embedded in raw script stdout
    pub fn extract(&self, output: &str) -> Result<ExecutionReport, ParseFailure> {
        let payload = self.payload(output).ok_or_else(|| ParseFailure::MissingReport {
            output: output.to_string(),
        })?;

        let report: ExecutionReport =
            serde_json::from_str(payload).map_err(|source| ParseFailure::InvalidPayload {
                output: output.to_string(),
                source,
            })?;

        report
            .validate()
            .map_err(|(field, value)| ParseFailure::OutOfRange {
                field,
                value,
                output: output.to_string(),
            })?;

        tracing::debug!(
            nx = report.grid.nx,
            ny = report.grid.ny,
            nz = report.grid.nz,
            time_steps = report.time.time_steps,
            processes = report.process_topology.process_count(),
            "extracted execution report"
        );
        Ok(report)
    }
}

/// Extract a report using the default sentinel
pub fn extract(output: &str) -> Result<ExecutionReport, ParseFailure> {
    ReportExtractor::default().extract(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAYLOAD: &str = r#"{"grid":{"NX":10,"NY":10,"NZ":10},"time":{"time_steps":5},"process_topology":{"NP":2,"NQ":2,"NR":2}}"#;

    fn wrap(payload: &str) -> String {
        format!("{DEFAULT_SENTINEL}{payload}{DEFAULT_SENTINEL}")
    }

    #[test]
    fn extracts_minimal_payload() {
        let report = extract(&wrap(PAYLOAD)).unwrap();
        assert_eq!(report, ExecutionReport::new([10, 10, 10], 5.0, [2, 2, 2]));
    }

    #[test]
    fn ignores_surrounding_chatter_and_spans_lines() {
        let output = format!(
            "pfrun default intercepted\n{DEFAULT_SENTINEL}\n{{\n  \"grid\" : {{\"NX\" : 4, \"NY\" : 5, \"NZ\" : 6}},\n  \"time\" : {{\"time_steps\" : 0.5}},\n  \"process_topology\" : {{\"NP\" : 1, \"NQ\" : 1, \"NR\" : 1}}\n}}\n{DEFAULT_SENTINEL}\ntrailing output\n"
        );
        let report = extract(&output).unwrap();
        assert_eq!(report, ExecutionReport::new([4, 5, 6], 0.5, [1, 1, 1]));
    }

    #[test]
    fn first_pair_wins() {
        let second = PAYLOAD.replace("\"NX\":10", "\"NX\":99");
        let output = format!("{}\nnoise\n{}", wrap(PAYLOAD), wrap(&second));
        assert_eq!(extract(&output).unwrap().grid.nx, 10);
    }

    #[test]
    fn missing_sentinel_is_parse_failure() {
        let err = extract("just some output\n").unwrap_err();
        assert!(matches!(err, ParseFailure::MissingReport { .. }));
        assert_eq!(err.output(), "just some output\n");
    }

    #[test]
    fn single_sentinel_is_parse_failure() {
        let output = format!("{DEFAULT_SENTINEL}{PAYLOAD}");
        assert!(matches!(
            extract(&output),
            Err(ParseFailure::MissingReport { .. })
        ));
    }

    #[test]
    fn invalid_json_is_parse_failure() {
        let err = extract(&wrap("{\"grid\": ")).unwrap_err();
        assert!(matches!(err, ParseFailure::InvalidPayload { .. }));
    }

    #[test]
    fn zero_topology_is_parse_failure() {
        let err = extract(&wrap(&PAYLOAD.replace("\"NR\":2", "\"NR\":0"))).unwrap_err();
        assert!(matches!(
            err,
            ParseFailure::OutOfRange {
                field: "process_topology.NR",
                ..
            }
        ));
    }

    #[test]
    fn custom_sentinel() {
        let sentinel = Sentinel::new("@@RUN-42@@").unwrap();
        let extractor = ReportExtractor::new(sentinel);
        let output = format!("noise @@RUN-42@@{PAYLOAD}@@RUN-42@@");
        assert_eq!(extractor.extract(&output).unwrap().time.time_steps, 5.0);
        assert!(extractor.extract(&wrap(PAYLOAD)).is_err());
    }

    #[test]
    fn sentinel_validation() {
        assert!(Sentinel::new("").is_err());
        assert!(Sentinel::new("a\nb").is_err());
        assert_eq!(Sentinel::default().as_str(), DEFAULT_SENTINEL);
    }
}
