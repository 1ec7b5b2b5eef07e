//! Classifies how a raw board's cross-section relates to a finished part.

use crate::allowance::{AxisTarget, MachiningTargets};
use crate::error::Rejection;
use crate::types::{Axis, Dimensions, EPSILON};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisFit {
    /// A single piece covers the finished size plus allowance.
    Fits,
    /// A single piece covers the finished size but not the allowance.
    TightFit,
    /// Several strips must be glued to reach the finished size.
    RequiresLamination,
    /// Not even `max_layers` strips reach the finished size.
    Infeasible,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FitReport {
    pub thickness: AxisFit,
    pub width: AxisFit,
}

impl FitReport {
    pub fn axis(&self, axis: Axis) -> AxisFit {
        match axis {
            Axis::Thickness => self.thickness,
            Axis::Width => self.width,
        }
    }

    pub fn first_infeasible(&self) -> Option<Axis> {
        Axis::ALL
            .into_iter()
            .find(|&axis| self.axis(axis) == AxisFit::Infeasible)
    }

    pub fn laminated_axes(&self) -> usize {
        Axis::ALL
            .iter()
            .filter(|&&axis| self.axis(axis) == AxisFit::RequiresLamination)
            .count()
    }
}

/// Without a layer limit any positive raw size can be glued up to the
/// finished size, so only a limit makes an axis infeasible.
pub fn classify_axis(raw: f64, target: &AxisTarget, max_layers: Option<u32>) -> AxisFit {
    if raw >= target.target - EPSILON {
        AxisFit::Fits
    } else if raw >= target.finished - EPSILON {
        AxisFit::TightFit
    } else if raw > EPSILON
        && max_layers.is_none_or(|limit| raw * limit as f64 >= target.finished - EPSILON)
    {
        AxisFit::RequiresLamination
    } else {
        AxisFit::Infeasible
    }
}

/// Evaluates one raw board against one part. Length is checked first since
/// it can never be made up by gluing.
pub fn evaluate(
    raw: &Dimensions,
    targets: &MachiningTargets,
    max_layers: Option<u32>,
) -> Result<FitReport, Rejection> {
    if raw.length < targets.length - EPSILON {
        return Err(Rejection::LengthInfeasible {
            stock: raw.length,
            part: targets.length,
        });
    }
    Ok(FitReport {
        thickness: classify_axis(raw.thickness, &targets.thickness, max_layers),
        width: classify_axis(raw.width, &targets.width, max_layers),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Settings, Unit};

    fn targets(part: Dimensions) -> MachiningTargets {
        MachiningTargets::new(&part, &Settings::new(5.0, 5.0, 3.0, Unit::Mm))
    }

    #[test]
    fn test_classify_axis_bands() {
        let t = AxisTarget {
            axis: Axis::Width,
            finished: 90.0,
            target: 95.0,
        };
        assert_eq!(classify_axis(100.0, &t, Some(8)), AxisFit::Fits);
        assert_eq!(classify_axis(95.0, &t, Some(8)), AxisFit::Fits);
        assert_eq!(classify_axis(92.0, &t, Some(8)), AxisFit::TightFit);
        assert_eq!(classify_axis(90.0, &t, Some(8)), AxisFit::TightFit);
        assert_eq!(classify_axis(70.0, &t, Some(8)), AxisFit::RequiresLamination);
        assert_eq!(classify_axis(10.0, &t, Some(8)), AxisFit::Infeasible);
        assert_eq!(classify_axis(45.0, &t, Some(2)), AxisFit::RequiresLamination);
        assert_eq!(classify_axis(44.0, &t, Some(2)), AxisFit::Infeasible);
    }

    #[test]
    fn test_unlimited_layers_always_laminate() {
        let t = AxisTarget {
            axis: Axis::Width,
            finished: 900.0,
            target: 905.0,
        };
        assert_eq!(classify_axis(89.0, &t, None), AxisFit::RequiresLamination);
        assert_eq!(classify_axis(10.0, &t, None), AxisFit::RequiresLamination);
        assert_eq!(classify_axis(89.0, &t, Some(8)), AxisFit::Infeasible);
    }

    #[test]
    fn test_length_never_laminates() {
        let raw = Dimensions::new(50.0, 100.0, 1000.0);
        let err = evaluate(&raw, &targets(Dimensions::new(20.0, 50.0, 1200.0)), None).unwrap_err();
        assert_eq!(
            err,
            Rejection::LengthInfeasible {
                stock: 1000.0,
                part: 1200.0
            }
        );
    }

    #[test]
    fn test_report_per_axis() {
        let raw = Dimensions::new(22.0, 70.0, 2400.0);
        let report = evaluate(&raw, &targets(Dimensions::new(20.0, 90.0, 600.0)), None).unwrap();
        assert_eq!(report.thickness, AxisFit::TightFit);
        assert_eq!(report.width, AxisFit::RequiresLamination);
        assert_eq!(report.laminated_axes(), 1);
        assert_eq!(report.first_infeasible(), None);
    }
}
