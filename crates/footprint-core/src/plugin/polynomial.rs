//! Polynomial regression model over the seven run parameters

use super::{PredictionFunction, PredictionPlugin};
use crate::error::ModuleContractError;
use serde::{Deserialize, Serialize};

/// One monomial: `coefficient * nx^a * ny^b * ...`
///
/// Exponents default to zero, so a term only names the parameters it uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Term {
    pub coefficient: f64,
    #[serde(default)]
    pub nx: i32,
    #[serde(default)]
    pub ny: i32,
    #[serde(default)]
    pub nz: i32,
    #[serde(default)]
    pub time_steps: i32,
    #[serde(default)]
    pub np: i32,
    #[serde(default)]
    pub nq: i32,
    #[serde(default)]
    pub nr: i32,
}

impl Term {
    #[inline]
    #[must_use]
    pub fn new(coefficient: f64) -> Self {
        Self {
            coefficient,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_nx(mut self, exponent: i32) -> Self {
        self.nx = exponent;
        self
    }

    #[must_use]
    pub fn with_ny(mut self, exponent: i32) -> Self {
        self.ny = exponent;
        self
    }

    #[must_use]
    pub fn with_nz(mut self, exponent: i32) -> Self {
        self.nz = exponent;
        self
    }

    #[must_use]
    pub fn with_time_steps(mut self, exponent: i32) -> Self {
        self.time_steps = exponent;
        self
    }

    fn evaluate(&self, args: &[f64; 7]) -> f64 {
        let exponents = [
            self.nx,
            self.ny,
            self.nz,
            self.time_steps,
            self.np,
            self.nq,
            self.nr,
        ];
        args.iter()
            .zip(exponents)
            .filter(|(_, exponent)| *exponent != 0)
            .fold(self.coefficient, |acc, (value, exponent)| acc * value.powi(exponent))
    }
}

/// `intercept + sum(terms)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolynomialModel {
    pub name: String,
    #[serde(default)]
    pub intercept: f64,
    #[serde(default)]
    pub terms: Vec<Term>,
}

impl PolynomialModel {
    /// Name of the quadratic grid-size fit
    pub const QUADRATIC_NAME: &'static str = "predict_footprint_from_size";

    #[must_use]
    pub fn new(name: impl Into<String>, intercept: f64, terms: Vec<Term>) -> Self {
        Self {
            name: name.into(),
            intercept,
            terms,
        }
    }

    /// Quadratic regression fitted on NX and NY only
    ///
    /// `-303000.3309 + 806.6720 NX + 815.8475 NY + 4.8494 NX NY - 0.0178 NX^2 - 0.0154 NY^2`
    #[must_use]
    pub fn quadratic_size() -> Self {
        Self::new(
            Self::QUADRATIC_NAME,
            -303_000.3309,
            vec![
                Term::new(806.6720).with_nx(1),
                Term::new(815.8475).with_ny(1),
                Term::new(4.8494).with_nx(1).with_ny(1),
                Term::new(-0.0178).with_nx(2),
                Term::new(-0.0154).with_ny(2),
            ],
        )
    }

    /// Evaluate at the given run parameters
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn evaluate(&self, nx: u64, ny: u64, nz: u64, time_steps: f64, np: u64, nq: u64, nr: u64) -> f64 {
        let args = [
            nx as f64,
            ny as f64,
            nz as f64,
            time_steps,
            np as f64,
            nq as f64,
            nr as f64,
        ];
        self.terms
            .iter()
            .fold(self.intercept, |acc, term| acc + term.evaluate(&args))
    }
}

impl PredictionPlugin for PolynomialModel {
    fn prediction_function(&self) -> Result<PredictionFunction, ModuleContractError> {
        let model = self.clone();
        Ok(PredictionFunction::numeric(
            self.name.clone(),
            move |x, y, z, t, p, q, r| model.evaluate(x, y, z, t, p, q, r),
        ))
    }
}
