use serde::{Deserialize, Serialize};

use crate::prelude::*;

/// Hyperparameters of a swarm run.
///
/// The defaults follow Bratton & Kennedy, "Defining a Standard for Particle Swarm
/// Optimization" (2007).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwarmConfig {
    /// Number of particles in the ring.
    pub n_particles: usize,

    /// Weight of the local-best (neighborhood) term of the velocity update.
    pub c1: f64,
    /// Weight of the personal-best term of the velocity update.
    pub c2: f64,

    /// Epoch cap. Reaching it ends the run even if the swarm has not collapsed.
    pub max_epochs: u64,

    /// Seed of the swarm's `StdRng`. Identical seeds and inputs give identical trajectories.
    pub seed: u64,
}

impl Default for SwarmConfig {
    fn default() -> Self {
        Self {
            n_particles: 50,
            c1: 2.05,
            c2: 2.05,
            max_epochs: 2000,
            seed: 42,
        }
    }
}

impl SwarmConfig {
    pub fn with_n_particles(mut self, n_particles: usize) -> Self {
        self.n_particles = n_particles;
        self
    }

    pub fn with_coefficients(mut self, c1: f64, c2: f64) -> Self {
        self.c1 = c1;
        self.c2 = c2;
        self
    }

    pub fn with_max_epochs(mut self, max_epochs: u64) -> Self {
        self.max_epochs = max_epochs;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Checks everything except the search space and tolerance, and returns the
    /// constriction factor for `c1`, `c2`.
    pub fn validate(&self) -> SwarmResult<f64> {
        if self.n_particles == 0 {
            return Err(SwarmError::InvalidHyperparameters(
                "n_particles must be at least 1".to_string(),
            ));
        }
        if self.max_epochs == 0 {
            return Err(SwarmError::InvalidHyperparameters(
                "max_epochs must be at least 1".to_string(),
            ));
        }
        constriction_factor(self.c1, self.c2)
    }
}

/// Clerc's constriction factor `2 / |2 - c - sqrt(c^2 - 4c)|` with `c = c1 + c2`.
///
/// Only defined for `c1 + c2 >= 4`; below that the square root has a negative argument.
pub fn constriction_factor(c1: f64, c2: f64) -> SwarmResult<f64> {
    // `!(x > 0.0)` also rejects NaN
    if !c1.is_finite() || !c2.is_finite() || !(c1 > 0.0) || !(c2 > 0.0) {
        return Err(SwarmError::InvalidHyperparameters(format!(
            "c1 and c2 must be positive finite numbers, got c1={} c2={}",
            c1, c2
        )));
    }

    let c = c1 + c2;
    if c < 4.0 {
        return Err(SwarmError::InvalidHyperparameters(format!(
            "c1 + c2 must be at least 4 for the constriction factor to be defined, got c1={} c2={} (sum {})",
            c1, c2, c
        )));
    }

    let discriminant = (c * c - 4.0 * c).max(0.0);
    Ok(2.0 / (2.0 - c - discriminant.sqrt()).abs())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(2.05, 2.05, 0.729_843_788_1; "standard coefficients")]
    #[test_case(2.0, 2.0, 1.0; "sum exactly four")]
    #[test_case(3.0, 3.0, 0.267_949_192_4; "sum six")]
    fn test_constriction_factor_values(c1: f64, c2: f64, expected: f64) {
        let chi = constriction_factor(c1, c2).unwrap();
        assert!(
            (chi - expected).abs() < 1e-9,
            "chi({}, {}) = {} expected {}",
            c1,
            c2,
            chi,
            expected
        );
    }

    #[test_case(1.0, 1.0; "sum below four")]
    #[test_case(0.0, 4.5; "zero c1")]
    #[test_case(4.5, -1.0; "negative c2")]
    #[test_case(f64::NAN, 4.0; "nan c1")]
    fn test_constriction_factor_rejects(c1: f64, c2: f64) {
        assert!(matches!(
            constriction_factor(c1, c2),
            Err(SwarmError::InvalidHyperparameters(_))
        ));
    }

    #[test]
    fn test_validate_rejects_empty_swarm_and_zero_cap() {
        let cfg = SwarmConfig::default().with_n_particles(0);
        assert!(matches!(
            cfg.validate(),
            Err(SwarmError::InvalidHyperparameters(_))
        ));

        let cfg = SwarmConfig::default().with_max_epochs(0);
        assert!(matches!(
            cfg.validate(),
            Err(SwarmError::InvalidHyperparameters(_))
        ));
    }

    #[test]
    fn test_config_deserializes_with_defaults_for_missing_fields() {
        let cfg: SwarmConfig = serde_json::from_str(r#"{"n_particles": 12, "seed": 7}"#).unwrap();
        assert_eq!(
            cfg,
            SwarmConfig::default().with_n_particles(12).with_seed(7)
        );
    }
}
