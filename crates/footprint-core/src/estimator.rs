//! Footprint estimation from an execution report

use crate::error::InvalidPredictionValueError;
use crate::plugin::PredictionFunction;
use crate::report::{ExecutionReport, Grid, ProcessTopology, TimeInfo};
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// Unit of every footprint amount
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FootprintUnit {
    #[default]
    Kilobyte,
}

/// Estimated memory footprint
///
/// `amount` keeps the prediction's numeric type, so an integer prediction
/// serializes as an integer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Footprint {
    pub amount: Number,
    pub units: FootprintUnit,
}

impl Footprint {
    /// Amount as a float
    #[must_use]
    pub fn kilobytes(&self) -> f64 {
        self.amount.as_f64().unwrap_or(f64::NAN)
    }
}

/// Execution report plus its predicted footprint
///
/// Serializes as the report's fields with an extra `footprint` object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FootprintReport {
    pub grid: Grid,
    pub time: TimeInfo,
    pub process_topology: ProcessTopology,
    pub footprint: Footprint,
}

impl FootprintReport {
    #[must_use]
    pub fn new(report: ExecutionReport, amount: Number) -> Self {
        Self {
            grid: report.grid,
            time: report.time,
            process_topology: report.process_topology,
            footprint: Footprint {
                amount,
                units: FootprintUnit::Kilobyte,
            },
        }
    }

    /// Report the footprint was computed from
    #[must_use]
    pub fn execution_report(&self) -> ExecutionReport {
        ExecutionReport {
            grid: self.grid,
            time: self.time,
            process_topology: self.process_topology,
        }
    }
}

/// Number held by a legal prediction
///
/// Legal means a JSON number whose value is at least zero. Null, booleans,
/// strings and containers are rejected.
#[must_use]
pub fn legal_prediction_value(value: &Value) -> Option<&Number> {
    match value {
        Value::Number(number) if number.as_f64().is_some_and(|amount| amount >= 0.0) => Some(number),
        _ => None,
    }
}

/// Call the prediction function on the report's parameters
pub fn predict_footprint(
    report: &ExecutionReport,
    function: &PredictionFunction,
) -> Result<Number, InvalidPredictionValueError> {
    let value = function.call(
        report.grid.nx,
        report.grid.ny,
        report.grid.nz,
        report.time.time_steps,
        report.process_topology.np,
        report.process_topology.nq,
        report.process_topology.nr,
    );

    match legal_prediction_value(&value) {
        Some(number) => Ok(number.clone()),
        None => Err(InvalidPredictionValueError {
            value,
            function_name: function.name().to_string(),
        }),
    }
}

/// Predict and assemble the final report
pub fn estimate(
    report: &ExecutionReport,
    function: &PredictionFunction,
) -> Result<FootprintReport, InvalidPredictionValueError> {
    let amount = predict_footprint(report, function)?;
    tracing::debug!(function = function.name(), %amount, "predicted footprint");
    Ok(FootprintReport::new(*report, amount))
}
