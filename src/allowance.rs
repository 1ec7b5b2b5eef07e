//! Machining targets derived from a finished part and the run settings.

use crate::types::{Axis, Dimensions, Settings};

/// Finished size of one cross-section axis and the raw size needed to
/// machine it with the full allowance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisTarget {
    pub axis: Axis,
    pub finished: f64,
    pub target: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MachiningTargets {
    pub thickness: AxisTarget,
    pub width: AxisTarget,
    /// Length is cut to size; it carries no allowance.
    pub length: f64,
}

impl MachiningTargets {
    pub fn new(part: &Dimensions, settings: &Settings) -> Self {
        let target = |axis| AxisTarget {
            axis,
            finished: part.axis(axis),
            target: part.axis(axis) + settings.allowance(axis),
        };
        Self {
            thickness: target(Axis::Thickness),
            width: target(Axis::Width),
            length: part.length,
        }
    }

    pub fn axis(&self, axis: Axis) -> AxisTarget {
        match axis {
            Axis::Thickness => self.thickness,
            Axis::Width => self.width,
        }
    }
}
