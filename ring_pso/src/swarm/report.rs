use std::fmt;

use nalgebra::DVector;
use serde::{Deserialize, Serialize};

use crate::prelude::*;

/// A particle position together with its objective value.
#[derive(Clone, Debug, PartialEq)]
pub struct BestPoint {
    /// Index of the particle currently at `position`.
    pub particle: usize,
    pub position: DVector<f64>,
    pub value: f64,
}

/// Outcome of [`Swarm::minimize`].
#[derive(Clone, Debug, PartialEq)]
pub struct MinimizeReport {
    pub termination: TerminationReason,
    pub epochs: u64,
    /// Norm of the per-dimension position variances when the run stopped.
    pub spread: f64,
    pub minimum: BestPoint,
}

impl fmt::Display for MinimizeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.termination)?;
        writeln!(f, "Number of epochs: {}", self.epochs)?;
        write!(
            f,
            "Minimum: {:.6e} at {:?}",
            self.minimum.value,
            self.minimum.position.as_slice()
        )
    }
}

/// Per-epoch view of the swarm for external drivers (animation frames, logs).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EpochSnapshot {
    pub epoch: u64,
    pub positions: Vec<Vec<f64>>,
    pub f_values: Vec<f64>,
    pub best_value: f64,
}
