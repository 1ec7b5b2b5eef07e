//! Chooses the strips glued together to reach a part's cross-section.
//!
//! Per axis the planner compares two kinds of option: whole raw strips only,
//! and one pooled offcut topped up with raw strips. It prefers the fewest new
//! raw strips, then the smallest leftover, then the oldest offcut, and only
//! settles for the finished size (tight fit) when no option within the
//! configured layer limit reaches the full allowance. Without a limit the
//! raw-only option always reaches it.

use std::cmp::Ordering;

use crate::allowance::{AxisTarget, MachiningTargets};
use crate::error::Rejection;
use crate::fit::{AxisFit, FitReport};
use crate::offcut::{OffcutId, OffcutPool};
use crate::types::{Axis, Dimensions, EPSILON, FitQuality};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UsedOffcut {
    pub id: OffcutId,
    pub dimension: f64,
}

/// How one axis of a block is made up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisPlan {
    pub axis: Axis,
    pub raw_strips: u32,
    pub offcut: Option<UsedOffcut>,
    /// Summed size of all pieces along the axis.
    pub total: f64,
    pub finished: f64,
    pub target: f64,
    pub quality: FitQuality,
    pub laminated: bool,
}

impl AxisPlan {
    fn single(raw: f64, target: &AxisTarget, quality: FitQuality) -> Self {
        Self {
            axis: target.axis,
            raw_strips: 1,
            offcut: None,
            total: raw,
            finished: target.finished,
            target: target.target,
            quality,
            laminated: false,
        }
    }

    pub fn pieces(&self) -> u32 {
        self.raw_strips.saturating_add(u32::from(self.offcut.is_some()))
    }

    /// Material beyond the full-allowance target; negative for a tight fit.
    pub fn leftover(&self) -> f64 {
        self.total - self.target
    }
}

/// Cross-section plan for one finished unit cut from one stock type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockPlan {
    pub stock_index: usize,
    pub thickness: AxisPlan,
    pub width: AxisPlan,
}

impl BlockPlan {
    pub fn axis(&self, axis: Axis) -> &AxisPlan {
        match axis {
            Axis::Thickness => &self.thickness,
            Axis::Width => &self.width,
        }
    }

    /// Raw strips cut from new boards for one unit.
    pub fn new_strips(&self) -> u32 {
        self.thickness.raw_strips.saturating_mul(self.width.raw_strips)
    }

    /// Pieces glued into one unit, counting a consumed offcut as a piece.
    pub fn pieces(&self) -> u32 {
        self.thickness.pieces().saturating_mul(self.width.pieces())
    }

    pub fn glue_joints(&self) -> u32 {
        self.pieces().saturating_sub(1)
    }

    pub fn is_glued(&self) -> bool {
        self.pieces() > 1
    }

    pub fn quality(&self) -> FitQuality {
        self.thickness.quality.worst(self.width.quality)
    }

    pub fn offcuts_used(&self) -> impl Iterator<Item = UsedOffcut> {
        [self.thickness.offcut, self.width.offcut].into_iter().flatten()
    }

    /// Leftover strip worth keeping after this block is glued and ripped to
    /// size: only single-axis laminations that met the full allowance
    /// produce one.
    pub fn offcut_to_register(&self, min_offcut: f64) -> Option<(Axis, f64)> {
        match (self.thickness.laminated, self.width.laminated) {
            (true, true) | (false, false) => None,
            (true, false) => Self::usable_leftover(&self.thickness, min_offcut),
            (false, true) => Self::usable_leftover(&self.width, min_offcut),
        }
    }

    fn usable_leftover(plan: &AxisPlan, min_offcut: f64) -> Option<(Axis, f64)> {
        let leftover = plan.leftover();
        (plan.quality == FitQuality::Full && leftover > min_offcut + EPSILON)
            .then_some((plan.axis, leftover))
    }
}

/// Plans blocks for one build step against a read-only view of the pool.
#[derive(Debug, Clone, Copy)]
pub struct LaminationPlanner<'a> {
    pool: Option<&'a OffcutPool>,
    build_index: usize,
    max_layers: Option<u32>,
}

impl<'a> LaminationPlanner<'a> {
    /// Planner that only ever uses new raw strips.
    pub fn raw_only(max_layers: Option<u32>) -> Self {
        Self {
            pool: None,
            build_index: 0,
            max_layers,
        }
    }

    pub fn with_pool(pool: &'a OffcutPool, build_index: usize, max_layers: Option<u32>) -> Self {
        Self {
            pool: Some(pool),
            build_index,
            max_layers,
        }
    }

    pub fn plan_block(
        &self,
        stock_index: usize,
        raw: &Dimensions,
        targets: &MachiningTargets,
        fit: &FitReport,
    ) -> Result<BlockPlan, Rejection> {
        if let Some(axis) = fit.first_infeasible() {
            return Err(self.infeasible(raw.axis(axis), &targets.axis(axis)));
        }

        // Two-axis blocks are a grid of raw strips; pooled offcuts have the
        // wrong cross-section for them.
        let planner = if fit.laminated_axes() == 2 {
            Self::raw_only(self.max_layers)
        } else {
            *self
        };

        let plan_axis = |axis: Axis| -> Result<AxisPlan, Rejection> {
            let target = targets.axis(axis);
            let raw_dim = raw.axis(axis);
            match fit.axis(axis) {
                AxisFit::Fits => Ok(AxisPlan::single(raw_dim, &target, FitQuality::Full)),
                AxisFit::TightFit => Ok(AxisPlan::single(raw_dim, &target, FitQuality::Tight)),
                AxisFit::RequiresLamination | AxisFit::Infeasible => {
                    planner.plan_axis(stock_index, raw_dim, &target, targets.length)
                }
            }
        };

        Ok(BlockPlan {
            stock_index,
            thickness: plan_axis(Axis::Thickness)?,
            width: plan_axis(Axis::Width)?,
        })
    }

    /// Plans one axis that needs gluing, falling back to the finished size
    /// when the allowance cannot be reached.
    pub fn plan_axis(
        &self,
        stock_index: usize,
        raw: f64,
        target: &AxisTarget,
        length: f64,
    ) -> Result<AxisPlan, Rejection> {
        if let Some(plan) = self.best_option(stock_index, raw, target, length, target.target) {
            return Ok(AxisPlan {
                quality: FitQuality::Full,
                ..plan
            });
        }
        if let Some(plan) = self.best_option(stock_index, raw, target, length, target.finished) {
            return Ok(AxisPlan {
                quality: FitQuality::Tight,
                ..plan
            });
        }
        Err(self.infeasible(raw, target))
    }

    fn best_option(
        &self,
        stock_index: usize,
        raw: f64,
        target: &AxisTarget,
        length: f64,
        goal: f64,
    ) -> Option<AxisPlan> {
        let option = |raw_strips: u32, offcut: Option<UsedOffcut>| {
            let total = raw_strips as f64 * raw + offcut.map_or(0.0, |o| o.dimension);
            AxisPlan {
                axis: target.axis,
                raw_strips,
                offcut,
                total,
                finished: target.finished,
                target: target.target,
                quality: FitQuality::Full,
                laminated: true,
            }
        };

        let mut options = Vec::new();
        let strips = strips_needed(raw, goal);
        if self.within_limit(strips) {
            options.push(option(strips, None));
        }
        if let Some(pool) = self.pool {
            for offcut in pool.eligible(stock_index, target.axis, length, self.build_index) {
                let strips = strips_needed(raw, goal - offcut.dimension);
                if self.within_limit(strips.saturating_add(1)) {
                    options.push(option(
                        strips,
                        Some(UsedOffcut {
                            id: offcut.id,
                            dimension: offcut.dimension,
                        }),
                    ));
                }
            }
        }

        options
            .into_iter()
            .filter(|plan| plan.total >= goal - EPSILON)
            .min_by(|a, b| compare_options(a, b, goal))
    }

    fn within_limit(&self, pieces: u32) -> bool {
        self.max_layers.is_none_or(|limit| pieces <= limit)
    }

    fn infeasible(&self, raw: f64, target: &AxisTarget) -> Rejection {
        Rejection::LaminationInfeasible {
            axis: target.axis,
            raw,
            required: target.finished,
            max_layers: self.max_layers,
        }
    }
}

/// Whole raw strips needed to cover `goal`. Saturates rather than wrapping
/// for absurd ratios.
fn strips_needed(raw: f64, goal: f64) -> u32 {
    if goal <= EPSILON {
        return 0;
    }
    ((goal - EPSILON) / raw).ceil() as u32
}

fn compare_options(a: &AxisPlan, b: &AxisPlan, goal: f64) -> Ordering {
    a.raw_strips
        .cmp(&b.raw_strips)
        .then_with(|| compare_lengths(a.total - goal, b.total - goal))
        .then_with(|| match (a.offcut, b.offcut) {
            (Some(x), Some(y)) => x.id.cmp(&y.id),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
}

fn compare_lengths(a: f64, b: f64) -> Ordering {
    if (a - b).abs() <= EPSILON {
        Ordering::Equal
    } else {
        a.total_cmp(&b)
    }
}
