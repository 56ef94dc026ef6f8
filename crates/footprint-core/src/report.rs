//! Run parameters reported by an instrumented script
//!
//! Field names follow the embedded wire format exactly:
//!
//! ```text
//! {"grid":{"NX":..,"NY":..,"NZ":..},
//!  "time":{"time_steps":..},
//!  "process_topology":{"NP":..,"NQ":..,"NR":..}}
//! ```

use serde::{Deserialize, Serialize};

/// Computational grid extents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Grid {
    #[serde(rename = "NX")]
    pub nx: u64,
    #[serde(rename = "NY")]
    pub ny: u64,
    #[serde(rename = "NZ")]
    pub nz: u64,
}

/// Simulated time span in base time units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TimeInfo {
    pub time_steps: f64,
}

/// Process decomposition P x Q x R
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProcessTopology {
    #[serde(rename = "NP")]
    pub np: u64,
    #[serde(rename = "NQ")]
    pub nq: u64,
    #[serde(rename = "NR")]
    pub nr: u64,
}

impl ProcessTopology {
    /// Total number of processes
    #[inline]
    #[must_use]
    pub fn process_count(&self) -> u64 {
        self.np.saturating_mul(self.nq).saturating_mul(self.nr)
    }
}

/// Parameters extracted from one instrumented run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExecutionReport {
    pub grid: Grid,
    pub time: TimeInfo,
    pub process_topology: ProcessTopology,
}

impl ExecutionReport {
    #[must_use]
    pub fn new(grid: [u64; 3], time_steps: f64, topology: [u64; 3]) -> Self {
        Self {
            grid: Grid {
                nx: grid[0],
                ny: grid[1],
                nz: grid[2],
            },
            time: TimeInfo { time_steps },
            process_topology: ProcessTopology {
                np: topology[0],
                nq: topology[1],
                nr: topology[2],
            },
        }
    }

    /// Check the ranges the wire format cannot express
    ///
    /// Returns the offending field name and value. Grid extents are
    /// unsigned already; time steps must be finite and non-negative and
    /// every topology dimension must be positive.
    pub fn validate(&self) -> Result<(), (&'static str, String)> {
        let steps = self.time.time_steps;
        if !steps.is_finite() || steps < 0.0 {
            return Err(("time.time_steps", steps.to_string()));
        }

        let topology = &self.process_topology;
        for (field, value) in [
            ("process_topology.NP", topology.np),
            ("process_topology.NQ", topology.nq),
            ("process_topology.NR", topology.nr),
        ] {
            if value == 0 {
                return Err((field, value.to_string()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_wire_shape() {
        let report: ExecutionReport = serde_json::from_value(json!({
            "grid": {"NX": 10, "NY": 20, "NZ": 30},
            "time": {"time_steps": 2.5},
            "process_topology": {"NP": 1, "NQ": 2, "NR": 3}
        }))
        .unwrap();
        assert_eq!(report, ExecutionReport::new([10, 20, 30], 2.5, [1, 2, 3]));
        assert_eq!(report.process_topology.process_count(), 6);
    }

    #[test]
    fn serializes_wire_names() {
        let value = serde_json::to_value(ExecutionReport::new([1, 2, 3], 4.0, [5, 6, 7])).unwrap();
        assert_eq!(value["grid"]["NX"], 1);
        assert_eq!(value["time"]["time_steps"], 4.0);
        assert_eq!(value["process_topology"]["NR"], 7);
    }

    #[test]
    fn rejects_unknown_fields() {
        let result: Result<ExecutionReport, _> = serde_json::from_value(json!({
            "grid": {"NX": 1, "NY": 1, "NZ": 1, "NW": 1},
            "time": {"time_steps": 1},
            "process_topology": {"NP": 1, "NQ": 1, "NR": 1}
        }));
        assert!(result.is_err());
    }

    #[test]
    fn rejects_negative_grid() {
        let result: Result<ExecutionReport, _> = serde_json::from_value(json!({
            "grid": {"NX": -1, "NY": 1, "NZ": 1},
            "time": {"time_steps": 1},
            "process_topology": {"NP": 1, "NQ": 1, "NR": 1}
        }));
        assert!(result.is_err());
    }

    #[test]
    fn validate_ranges() {
        assert!(ExecutionReport::new([0, 0, 0], 0.0, [1, 1, 1]).validate().is_ok());
        assert_eq!(
            ExecutionReport::new([1, 1, 1], -1.0, [1, 1, 1]).validate(),
            Err(("time.time_steps", "-1".to_string()))
        );
        assert_eq!(
            ExecutionReport::new([1, 1, 1], 1.0, [1, 0, 1]).validate(),
            Err(("process_topology.NQ", "0".to_string()))
        );
    }
}
