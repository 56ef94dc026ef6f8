//! Prediction plugins
//!
//! A plugin is anything that can hand out a [`PredictionFunction`]: a named
//! function of the seven run parameters
//! `(nx, ny, nz, time_steps, np, nq, nr)` returning a footprint estimate in
//! kilobytes. The core only calls the function and validates what comes back.
//!
//! Built-in models:
//! - [`PolynomialModel`] (the default quadratic fit over grid size)
//! - [`VolumetricModel`] (grid volume scaled by time steps and process overhead)
//!
//! [`ManifestPlugin`] loads either model from a TOML file at runtime.

use crate::error::ModuleContractError;
use serde_json::{Number, Value};
use std::fmt;
use std::sync::Arc;

mod manifest;
mod polynomial;
mod volumetric;

pub use manifest::{load_plugin, ManifestPlugin, ModelSpec};
pub use polynomial::{PolynomialModel, Term};
pub use volumetric::VolumetricModel;

/// Signature shared by every prediction function
pub type PredictionFn = dyn Fn(u64, u64, u64, f64, u64, u64, u64) -> Value + Send + Sync;

/// Named prediction function
///
/// The result is a dynamically typed value so that functions returning
/// nothing or something non-numeric can be represented and rejected.
#[derive(Clone)]
pub struct PredictionFunction {
    name: String,
    function: Arc<PredictionFn>,
}

impl PredictionFunction {
    /// Wrap a function returning an arbitrary value
    pub fn new<F>(name: impl Into<String>, function: F) -> Self
    where
        F: Fn(u64, u64, u64, f64, u64, u64, u64) -> Value + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            function: Arc::new(function),
        }
    }

    /// Wrap a function returning `f64`
    ///
    /// Non-finite results become `null`.
    pub fn numeric<F>(name: impl Into<String>, function: F) -> Self
    where
        F: Fn(u64, u64, u64, f64, u64, u64, u64) -> f64 + Send + Sync + 'static,
    {
        Self::new(name, move |x, y, z, t, p, q, r| {
            number_value(function(x, y, z, t, p, q, r))
        })
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invoke with the seven run parameters
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn call(&self, nx: u64, ny: u64, nz: u64, time_steps: f64, np: u64, nq: u64, nr: u64) -> Value {
        (self.function)(nx, ny, nz, time_steps, np, nq, nr)
    }
}

impl fmt::Debug for PredictionFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PredictionFunction")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Source of a prediction function
pub trait PredictionPlugin {
    /// Hand out the function and its display name
    fn prediction_function(&self) -> Result<PredictionFunction, ModuleContractError>;
}

impl<P: PredictionPlugin + ?Sized> PredictionPlugin for Box<P> {
    fn prediction_function(&self) -> Result<PredictionFunction, ModuleContractError> {
        (**self).prediction_function()
    }
}

/// Plugin used when the caller does not supply one
#[must_use]
pub fn default_plugin() -> PolynomialModel {
    PolynomialModel::quadratic_size()
}

fn number_value(value: f64) -> Value {
    Number::from_f64(value).map_or(Value::Null, Value::Number)
}
