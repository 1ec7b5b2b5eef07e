//! Lumber purchase planning: chooses which raw boards to buy and how to cut
//! and glue them into a list of finished parts with the least raw volume.

pub mod allowance;
pub mod config;
pub mod cutter;
pub mod error;
pub mod fit;
pub mod job;
pub mod lamination;
pub mod offcut;
pub mod plan;
pub mod render;
pub mod solver;
pub mod types;

pub use config::OptimizerConfig;
pub use error::{OptimizeError, Rejection};
pub use solver::Solver;
pub use types::{FinishedPart, OptimizationResult, RawStock, Settings};

/// Plans a purchase with the default engine configuration.
pub fn optimize(
    parts: &[FinishedPart],
    stocks: &[RawStock],
    settings: Settings,
) -> Result<OptimizationResult, OptimizeError> {
    Solver::new(parts.to_vec(), stocks.to_vec(), settings).solve()
}
