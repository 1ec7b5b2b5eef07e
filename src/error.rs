use crate::types::Axis;

/// Fatal to an optimization call: the caller must fix the input.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OptimizeError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl OptimizeError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        OptimizeError::InvalidInput(message.into())
    }
}

/// Why one (part, stock) pairing was excluded as a candidate.
///
/// Local to the pairing; never fatal to the run.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum Rejection {
    #[error("stock length {stock} is shorter than part length {part}")]
    LengthInfeasible { stock: f64, part: f64 },

    #[error("{axis} {required} cannot be reached by gluing strips of {raw}")]
    LaminationInfeasible {
        axis: Axis,
        raw: f64,
        required: f64,
        max_layers: Option<u32>,
    },
}

impl Rejection {
    /// The cross-section axis that failed, if any.
    pub fn axis(&self) -> Option<Axis> {
        match self {
            Rejection::LengthInfeasible { .. } => None,
            Rejection::LaminationInfeasible { axis, .. } => Some(*axis),
        }
    }
}
