use std::cmp::Ordering;
use std::collections::HashSet;

use rayon::prelude::*;

use crate::allowance::MachiningTargets;
use crate::config::OptimizerConfig;
use crate::error::{OptimizeError, Rejection};
use crate::fit;
use crate::lamination::{BlockPlan, LaminationPlanner};
use crate::offcut::OffcutPool;
use crate::plan::PlanAssembler;
use crate::types::{EPSILON, FinishedPart, FitQuality, OptimizationResult, RawStock, Settings};

/// A stock type able to produce one unit of the current part.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    plan: BlockPlan,
    /// New raw volume consumed per finished unit.
    score: f64,
}

impl Candidate {
    /// Full allowance first, then least raw volume, fewest glue joints and
    /// finally catalog order, so the choice is independent of evaluation
    /// order.
    fn rank(&self, other: &Candidate) -> Ordering {
        let by_quality = |c: &Candidate| match c.plan.quality() {
            FitQuality::Full => 0,
            FitQuality::Tight => 1,
        };
        by_quality(self)
            .cmp(&by_quality(other))
            .then_with(|| {
                if (self.score - other.score).abs() <= EPSILON {
                    Ordering::Equal
                } else {
                    self.score.total_cmp(&other.score)
                }
            })
            .then_with(|| self.plan.glue_joints().cmp(&other.plan.glue_joints()))
            .then_with(|| self.plan.stock_index.cmp(&other.plan.stock_index))
    }
}

pub struct Solver {
    parts: Vec<FinishedPart>,
    stocks: Vec<RawStock>,
    settings: Settings,
    config: OptimizerConfig,
}

impl Solver {
    pub fn new(parts: Vec<FinishedPart>, stocks: Vec<RawStock>, settings: Settings) -> Self {
        Self {
            parts,
            stocks,
            settings,
            config: OptimizerConfig::default(),
        }
    }

    pub fn with_config(mut self, config: OptimizerConfig) -> Self {
        self.config = config;
        self
    }

    /// Runs the whole optimization. Parts are built in input order, one unit
    /// at a time, because offcut availability depends on what was built
    /// before.
    pub fn solve(&self) -> Result<OptimizationResult, OptimizeError> {
        self.validate()?;

        let min_offcut = self.config.min_offcut_for(&self.settings);
        let mut pool = OffcutPool::new();
        let mut assembler = PlanAssembler::new(&self.stocks);
        let mut build_index = 0;

        for part in &self.parts {
            let targets = MachiningTargets::new(&part.dimensions, &self.settings);
            let candidates = self.candidate_stocks(part, &targets);
            if candidates.is_empty() {
                tracing::info!(part = %part.name, "no stock can produce part, marking unmatchable");
                assembler.record_unmatchable(part);
                continue;
            }

            for _ in 0..part.quantity {
                let planner =
                    LaminationPlanner::with_pool(&pool, build_index, self.config.max_layers);
                let best = candidates
                    .par_iter()
                    .map(|fallback| self.evaluate(part, &targets, &planner, fallback))
                    .collect::<Vec<_>>()
                    .into_iter()
                    .min_by(Candidate::rank);
                // Candidate list is non-empty.
                let Some(best) = best else { continue };

                tracing::debug!(
                    part = %part.name,
                    unit = build_index,
                    stock = %self.stocks[best.plan.stock_index].name,
                    strips = best.plan.new_strips(),
                    pieces = best.plan.pieces(),
                    quality = ?best.plan.quality(),
                    "assigned unit"
                );
                self.commit(&best.plan, part, &mut pool, build_index, min_offcut);
                assembler.record_unit(part, &best.plan);
                build_index += 1;
            }
        }

        let discarded = pool.unconsumed();
        let result = assembler.finish(self.settings.kerf, discarded);
        tracing::info!(
            boards = result.board_count(),
            volume = result.total_raw_volume,
            unmatchable = result.unmatchable_parts.len(),
            offcuts = pool.generated(),
            discarded,
            "optimization complete"
        );
        Ok(result)
    }

    fn validate(&self) -> Result<(), OptimizeError> {
        self.config.validate()?;
        if self.parts.is_empty() {
            return Err(OptimizeError::invalid("at least one finished part is required"));
        }
        if self.stocks.is_empty() {
            return Err(OptimizeError::invalid("at least one raw stock size is required"));
        }

        let mut part_ids = HashSet::new();
        let mut part_names = HashSet::new();
        for part in &self.parts {
            if part.name.trim().is_empty() {
                return Err(OptimizeError::invalid(format!("part '{}' has no name", part.id)));
            }
            if part.quantity == 0 {
                return Err(OptimizeError::invalid(format!(
                    "part '{}' must have a quantity of at least 1",
                    part.name
                )));
            }
            if !part.dimensions.is_valid() {
                return Err(OptimizeError::invalid(format!(
                    "part '{}' dimensions must be positive, got {}",
                    part.name, part.dimensions
                )));
            }
            if !part_ids.insert(part.id.as_str()) {
                return Err(OptimizeError::invalid(format!("duplicate part id '{}'", part.id)));
            }
            // Unmatchable parts are reported by name.
            if !part_names.insert(part.name.trim()) {
                return Err(OptimizeError::invalid(format!(
                    "duplicate part name '{}'",
                    part.name
                )));
            }
        }

        let mut stock_ids = HashSet::new();
        for stock in &self.stocks {
            if !stock.dimensions.is_valid() {
                return Err(OptimizeError::invalid(format!(
                    "stock '{}' dimensions must be positive, got {}",
                    stock.name, stock.dimensions
                )));
            }
            if !stock_ids.insert(stock.id.as_str()) {
                return Err(OptimizeError::invalid(format!("duplicate stock id '{}'", stock.id)));
            }
        }

        let s = &self.settings;
        for (name, value) in [
            ("thickness allowance", s.thickness_allowance),
            ("width allowance", s.width_allowance),
            ("kerf", s.kerf),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(OptimizeError::invalid(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Stock types able to make `part` from new strips alone. This does not
    /// depend on the offcut pool, so a part is matchable for every unit or
    /// for none.
    fn candidate_stocks(&self, part: &FinishedPart, targets: &MachiningTargets) -> Vec<Candidate> {
        let planner = LaminationPlanner::raw_only(self.config.max_layers);
        self.stocks
            .par_iter()
            .enumerate()
            .filter_map(|(idx, stock)| {
                let planned = fit::evaluate(&stock.dimensions, targets, self.config.max_layers)
                    .and_then(|report| planner.plan_block(idx, &stock.dimensions, targets, &report));
                match planned {
                    Ok(plan) => Some(self.candidate(part, plan)),
                    Err(rejection) => {
                        self.log_rejection(part, stock, &rejection);
                        None
                    }
                }
            })
            .collect()
    }

    /// Re-plans a candidate against the current pool, keeping the raw-only
    /// plan when the pool offers nothing better.
    fn evaluate(
        &self,
        part: &FinishedPart,
        targets: &MachiningTargets,
        planner: &LaminationPlanner<'_>,
        fallback: &Candidate,
    ) -> Candidate {
        let idx = fallback.plan.stock_index;
        let stock = &self.stocks[idx].dimensions;
        fit::evaluate(stock, targets, self.config.max_layers)
            .and_then(|report| planner.plan_block(idx, stock, targets, &report))
            .map(|plan| self.candidate(part, plan))
            .ok()
            .filter(|c| c.rank(fallback) != Ordering::Greater)
            .unwrap_or(*fallback)
    }

    fn candidate(&self, part: &FinishedPart, plan: BlockPlan) -> Candidate {
        let stock = &self.stocks[plan.stock_index].dimensions;
        let score = plan.new_strips() as f64
            * stock.cross_section_area()
            * (part.dimensions.length + self.settings.kerf);
        Candidate { plan, score }
    }

    fn commit(
        &self,
        plan: &BlockPlan,
        part: &FinishedPart,
        pool: &mut OffcutPool,
        build_index: usize,
        min_offcut: f64,
    ) {
        for used in plan.offcuts_used() {
            let consumed = pool.consume(used.id, build_index);
            debug_assert!(consumed, "planned offcut {:?} was not available", used.id);
        }
        if let Some((axis, dimension)) = plan.offcut_to_register(min_offcut) {
            let id = pool.register(
                plan.stock_index,
                axis,
                dimension,
                part.dimensions.length,
                build_index,
            );
            tracing::debug!(part = %part.name, ?id, %axis, dimension, "registered offcut");
        }
    }

    fn log_rejection(&self, part: &FinishedPart, stock: &RawStock, rejection: &Rejection) {
        match rejection.axis() {
            Some(axis) => tracing::debug!(
                part = %part.name,
                stock = %stock.name,
                %axis,
                reason = %rejection,
                "stock rejected"
            ),
            None => tracing::debug!(
                part = %part.name,
                stock = %stock.name,
                reason = %rejection,
                "stock rejected"
            ),
        }
    }
}
