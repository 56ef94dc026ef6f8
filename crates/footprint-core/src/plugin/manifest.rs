//! Prediction modules loaded from TOML manifests
//!
//! A manifest is a prediction module on disk. Its `[prediction_function]`
//! table is the factory: it names the function and selects the model.
//!
//! ```toml
//! [prediction_function]
//! model = "volumetric"
//! name = "predict_footprint_from_size_time_processes"
//! overhead = 1.2
//! growth_per_step = 0.001
//! ```
//!
//! A manifest that parses but has no factory table breaks the plugin
//! contract and is reported as [`ModuleContractError::MissingFactory`].

use super::{PolynomialModel, PredictionFunction, PredictionPlugin, VolumetricModel};
use crate::error::ModuleContractError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Key of the factory table
pub const FACTORY_KEY: &str = "prediction_function";

/// Model selected by a manifest
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum ModelSpec {
    Polynomial(PolynomialModel),
    Volumetric(VolumetricModel),
}

impl PredictionPlugin for ModelSpec {
    fn prediction_function(&self) -> Result<PredictionFunction, ModuleContractError> {
        match self {
            ModelSpec::Polynomial(model) => model.prediction_function(),
            ModelSpec::Volumetric(model) => model.prediction_function(),
        }
    }
}

/// Prediction module parsed from a manifest file
#[derive(Debug, Clone)]
pub struct ManifestPlugin {
    path: PathBuf,
    table: toml::Table,
}

impl ManifestPlugin {
    /// Read and parse a manifest
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ModuleContractError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ModuleContractError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_source(path, &source)
    }

    /// Parse manifest text; `path` is only used in diagnostics
    pub fn from_source(path: impl Into<PathBuf>, source: &str) -> Result<Self, ModuleContractError> {
        let path = path.into();
        let table = source
            .parse::<toml::Table>()
            .map_err(|e| ModuleContractError::Malformed {
                path: path.clone(),
                message: e.to_string(),
            })?;
        tracing::debug!(path = %path.display(), "loaded prediction module");
        Ok(Self { path, table })
    }

    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Resolve the factory table into a model
    pub fn model(&self) -> Result<ModelSpec, ModuleContractError> {
        let factory = self
            .table
            .get(FACTORY_KEY)
            .ok_or_else(|| ModuleContractError::MissingFactory {
                path: self.path.clone(),
            })?;

        if !factory.is_table() {
            return Err(ModuleContractError::Malformed {
                path: self.path.clone(),
                message: format!("`{FACTORY_KEY}` must be a table"),
            });
        }

        factory
            .clone()
            .try_into::<ModelSpec>()
            .map_err(|e| ModuleContractError::Malformed {
                path: self.path.clone(),
                message: e.to_string(),
            })
    }
}

impl PredictionPlugin for ManifestPlugin {
    fn prediction_function(&self) -> Result<PredictionFunction, ModuleContractError> {
        self.model()?.prediction_function()
    }
}

/// Load a prediction module from a manifest path
pub fn load_plugin(path: impl AsRef<Path>) -> Result<ManifestPlugin, ModuleContractError> {
    ManifestPlugin::load(path)
}
