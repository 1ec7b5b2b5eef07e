//! Optimization jobs as exchanged with the CLI and the HTTP server.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::OptimizerConfig;
use crate::error::OptimizeError;
use crate::solver::Solver;
use crate::types::{Dimensions, FinishedPart, OptimizationResult, RawStock, Settings};

#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error("failed to read job file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid job: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Spec(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    #[serde(default)]
    pub parts: Vec<FinishedPart>,
    #[serde(default)]
    pub stocks: Vec<RawStock>,
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub config: OptimizerConfig,
}

impl Job {
    pub fn from_json(json: &str) -> Result<Self, JobError> {
        let mut job: Job = serde_json::from_str(json)?;
        job.assign_missing_ids();
        Ok(job)
    }

    pub fn from_path(path: &Path) -> Result<Self, JobError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Gives every part and stock without an id a positional one
    /// (`part-1`, `stock-1`, ...).
    pub fn assign_missing_ids(&mut self) {
        for (i, part) in self.parts.iter_mut().enumerate() {
            if part.id.is_empty() {
                part.id = format!("part-{}", i + 1);
            }
        }
        for (i, stock) in self.stocks.iter_mut().enumerate() {
            if stock.id.is_empty() {
                stock.id = format!("stock-{}", i + 1);
            }
        }
    }

    pub fn run(&self) -> Result<OptimizationResult, OptimizeError> {
        Solver::new(self.parts.clone(), self.stocks.clone(), self.settings)
            .with_config(self.config)
            .solve()
    }
}

/// Parses `TxWxL`, e.g. `19x89x2440`.
pub fn parse_dimensions(s: &str) -> Result<Dimensions, JobError> {
    let values: Vec<&str> = s.split('x').collect();
    if values.len() != 3 {
        return Err(JobError::Spec(format!(
            "invalid dimensions '{s}', expected TxWxL"
        )));
    }
    let parse = |name: &str, v: &str| {
        v.trim()
            .parse::<f64>()
            .map_err(|_| JobError::Spec(format!("invalid {name} in '{s}'")))
    };
    let dims = Dimensions::new(
        parse("thickness", values[0])?,
        parse("width", values[1])?,
        parse("length", values[2])?,
    );
    if !dims.is_valid() {
        return Err(JobError::Spec(format!("dimensions must be positive in '{s}'")));
    }
    Ok(dims)
}

/// Parses a part as `NAME:TxWxL:QTY`, e.g. `Leg:45x45x700:4`.
pub fn parse_part(s: &str) -> Result<FinishedPart, JobError> {
    let fields: Vec<&str> = s.rsplitn(3, ':').collect();
    if fields.len() != 3 || fields[2].trim().is_empty() {
        return Err(JobError::Spec(format!(
            "invalid part '{s}', expected NAME:TxWxL:QTY"
        )));
    }
    let quantity = fields[0]
        .trim()
        .parse::<u32>()
        .map_err(|_| JobError::Spec(format!("invalid quantity in '{s}'")))?;
    if quantity == 0 {
        return Err(JobError::Spec(format!("quantity must be non-zero in '{s}'")));
    }
    Ok(FinishedPart::new(
        String::new(),
        fields[2].trim(),
        quantity,
        parse_dimensions(fields[1])?,
    ))
}

/// Parses a stock as `NAME:TxWxL`, e.g. `2x4:38x89x2440`.
pub fn parse_stock(s: &str) -> Result<RawStock, JobError> {
    let (name, dims) = s.rsplit_once(':').ok_or_else(|| {
        JobError::Spec(format!("invalid stock '{s}', expected NAME:TxWxL"))
    })?;
    if name.trim().is_empty() {
        return Err(JobError::Spec(format!("stock '{s}' has no name")));
    }
    Ok(RawStock::new(String::new(), name.trim(), parse_dimensions(dims)?))
}
