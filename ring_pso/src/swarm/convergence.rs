use std::fmt;

use nalgebra::DVector;
use serde::{Deserialize, Serialize};

/// Why a run stopped. Both are normal outcomes, not errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerminationReason {
    /// The positions collapsed: the norm of the per-dimension variances fell to the tolerance.
    Converged,
    /// The epoch cap was reached first.
    EpochCapped,
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerminationReason::Converged => write!(f, "The swarm converged successfully"),
            TerminationReason::EpochCapped => write!(f, "Reached maximum number of epochs"),
        }
    }
}

/// Result of [`Swarm::check_convergence`](crate::swarm::Swarm::check_convergence).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConvergenceCheck {
    pub epoch: u64,
    /// Euclidean norm of the vector of per-dimension position variances.
    pub spread: f64,
    pub termination: Option<TerminationReason>,
}

impl ConvergenceCheck {
    /// Variance collapse is reported in preference to the epoch cap when both hold.
    pub fn evaluate(epoch: u64, spread: f64, tolerance: f64, max_epochs: u64) -> Self {
        let termination = if spread <= tolerance {
            Some(TerminationReason::Converged)
        } else if epoch >= max_epochs {
            Some(TerminationReason::EpochCapped)
        } else {
            None
        };
        Self {
            epoch,
            spread,
            termination,
        }
    }

    pub fn should_continue(&self) -> bool {
        self.termination.is_none()
    }
}

/// Norm of the per-dimension population variances (divisor `N`) of `positions`.
pub fn position_spread(positions: &[DVector<f64>]) -> f64 {
    let Some(first) = positions.first() else {
        return 0.0;
    };
    let n = positions.len() as f64;

    let mean = positions
        .iter()
        .fold(DVector::<f64>::zeros(first.len()), |acc, x| acc + x)
        / n;

    let variances = positions
        .iter()
        .fold(DVector::<f64>::zeros(first.len()), |acc, x| {
            let d = x - &mean;
            acc + d.component_mul(&d)
        })
        / n;

    variances.norm()
}
