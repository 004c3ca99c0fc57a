use nalgebra::DVector;

use crate::prelude::*;

mod epoch;

pub(super) fn sum_of_squares(x: &[f64]) -> f64 {
    x.iter().map(|v| v * v).sum()
}

pub(super) fn rastrigin(x: &[f64]) -> f64 {
    10.0 * x.len() as f64
        + x.iter()
            .map(|v| v * v - 10.0 * (2.0 * std::f64::consts::PI * v).cos())
            .sum::<f64>()
}

pub(super) fn as_rows(points: &[DVector<f64>]) -> Vec<Vec<f64>> {
    points.iter().map(|x| x.as_slice().to_vec()).collect()
}

/// Every piece of mutable state of the swarm, for before/after comparisons.
#[derive(Debug, PartialEq)]
pub(super) struct StateDump {
    pub epoch: u64,
    pub positions: Vec<Vec<f64>>,
    pub velocities: Vec<Vec<f64>>,
    pub f_values: Vec<f64>,
    pub personal_best_positions: Vec<Vec<f64>>,
    pub personal_best_values: Vec<f64>,
    pub local_best_positions: Vec<Vec<f64>>,
}

pub(super) fn dump<O: Objective>(swarm: &Swarm<'_, O>) -> StateDump {
    StateDump {
        epoch: swarm.epoch_count(),
        positions: as_rows(swarm.positions()),
        velocities: as_rows(swarm.velocities()),
        f_values: swarm.f_values().to_vec(),
        personal_best_positions: as_rows(swarm.personal_best_positions()),
        personal_best_values: swarm.personal_best_values().to_vec(),
        local_best_positions: as_rows(swarm.local_best_positions()),
    }
}
