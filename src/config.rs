use serde::{Deserialize, Serialize};

use crate::error::OptimizeError;
use crate::types::Settings;

/// Engine tuning constants, independent of the per-run machining settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OptimizerConfig {
    /// Upper bound on pieces glued along one axis of a block.
    /// `None` glues as many strips as the target needs.
    pub max_layers: Option<u32>,
    /// Smallest leftover strip kept as a reusable offcut.
    /// `None` means one kerf width.
    pub min_offcut: Option<f64>,
}

impl OptimizerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_layers(mut self, max_layers: u32) -> Self {
        self.max_layers = Some(max_layers);
        self
    }

    pub fn with_min_offcut(mut self, min_offcut: f64) -> Self {
        self.min_offcut = Some(min_offcut);
        self
    }

    pub fn min_offcut_for(&self, settings: &Settings) -> f64 {
        self.min_offcut.unwrap_or(settings.kerf)
    }

    pub fn validate(&self) -> Result<(), OptimizeError> {
        if self.max_layers == Some(0) {
            return Err(OptimizeError::invalid("max layers must be at least 1"));
        }
        if let Some(min) = self.min_offcut
            && (!min.is_finite() || min < 0.0)
        {
            return Err(OptimizeError::invalid(format!(
                "minimum offcut must be a non-negative number, got {min}"
            )));
        }
        Ok(())
    }
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            max_layers: None,
            min_offcut: None,
        }
    }
}
