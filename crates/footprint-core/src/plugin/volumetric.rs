//! Volume-based model with time and process overheads

use super::{PredictionFunction, PredictionPlugin};
use crate::error::ModuleContractError;
use serde::{Deserialize, Serialize};

/// `volume * (1 + growth_per_step * time_steps) * overhead`
///
/// Each time step adds a fixed fraction of the domain; running on several
/// processes costs a flat multiplier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VolumetricModel {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_overhead")]
    pub overhead: f64,
    #[serde(default = "default_growth_per_step")]
    pub growth_per_step: f64,
}

fn default_name() -> String {
    VolumetricModel::DEFAULT_NAME.to_string()
}

fn default_overhead() -> f64 {
    VolumetricModel::DEFAULT_OVERHEAD
}

fn default_growth_per_step() -> f64 {
    VolumetricModel::DEFAULT_GROWTH_PER_STEP
}

impl VolumetricModel {
    pub const DEFAULT_NAME: &'static str = "predict_footprint_from_size_time_processes";
    pub const DEFAULT_OVERHEAD: f64 = 1.2;
    pub const DEFAULT_GROWTH_PER_STEP: f64 = 0.001;

    #[must_use]
    pub fn new(name: impl Into<String>, overhead: f64, growth_per_step: f64) -> Self {
        Self {
            name: name.into(),
            overhead,
            growth_per_step,
        }
    }

    #[must_use]
    pub fn evaluate(&self, nx: u64, ny: u64, nz: u64, time_steps: f64) -> f64 {
        let volume = nx as f64 * ny as f64 * nz as f64;
        (volume + volume * (self.growth_per_step * time_steps)) * self.overhead
    }
}

impl Default for VolumetricModel {
    fn default() -> Self {
        Self::new(
            Self::DEFAULT_NAME,
            Self::DEFAULT_OVERHEAD,
            Self::DEFAULT_GROWTH_PER_STEP,
        )
    }
}

impl PredictionPlugin for VolumetricModel {
    fn prediction_function(&self) -> Result<PredictionFunction, ModuleContractError> {
        let model = self.clone();
        Ok(PredictionFunction::numeric(
            self.name.clone(),
            move |x, y, z, t, _, _, _| model.evaluate(x, y, z, t),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_step_small_grid() {
        let value = VolumetricModel::default().evaluate(4, 4, 4, 1.0);
        assert!((value - 76.8768).abs() < 1e-9);
    }

    #[test]
    fn zero_steps_is_volume_times_overhead() {
        let value = VolumetricModel::default().evaluate(10, 10, 10, 0.0);
        assert!((value - 1200.0).abs() < 1e-9);
    }

    #[test]
    fn custom_parameters() {
        let model = VolumetricModel::new("flat", 1.0, 0.0);
        assert_eq!(model.evaluate(2, 2, 2, 1000.0), 8.0);
    }
}
