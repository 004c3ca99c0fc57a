use nalgebra::DVector;
use serde::{Deserialize, Serialize};

use crate::prelude::*;

/// Closed interval `[min, max]` for one coordinate of the search space.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bound {
    pub min: f64,
    pub max: f64,
}

impl Bound {
    pub fn width(&self) -> f64 {
        self.max - self.min
    }

    pub fn contains(&self, x: f64) -> bool {
        self.min <= x && x <= self.max
    }

    /// Coordinates outside the interval are set exactly to the violated bound.
    pub fn clamp(&self, x: f64) -> f64 {
        if x < self.min {
            self.min
        } else if x > self.max {
            self.max
        } else {
            x
        }
    }
}

/// Box-shaped search space, one [`Bound`] per dimension.
///
/// Every bound is finite with `min < max`; this is checked once in [`SearchSpace::new`]
/// (deserialization goes through the same check) and the bounds are immutable afterwards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "UncheckedSearchSpace")]
pub struct SearchSpace {
    bounds: Vec<Bound>,
}

/// Wire form of [`SearchSpace`] before validation.
#[derive(Deserialize)]
struct UncheckedSearchSpace {
    bounds: Vec<Bound>,
}

impl TryFrom<UncheckedSearchSpace> for SearchSpace {
    type Error = SwarmError;

    fn try_from(raw: UncheckedSearchSpace) -> SwarmResult<Self> {
        let pairs: Vec<(f64, f64)> = raw.bounds.iter().map(|b| (b.min, b.max)).collect();
        Self::new(&pairs)
    }
}

impl SearchSpace {
    pub fn new(bounds: &[(f64, f64)]) -> SwarmResult<Self> {
        if bounds.is_empty() {
            return Err(SwarmError::EmptySearchSpace);
        }

        let bounds = bounds
            .iter()
            .enumerate()
            .map(|(dim, &(min, max))| {
                // `!(min < max)` also rejects NaN
                if !min.is_finite() || !max.is_finite() || !(min < max) {
                    return Err(SwarmError::InvalidBounds { dim, min, max });
                }
                Ok(Bound { min, max })
            })
            .collect::<SwarmResult<Vec<Bound>>>()?;

        Ok(Self { bounds })
    }

    pub fn dimension(&self) -> usize {
        self.bounds.len()
    }

    pub fn bounds(&self) -> &[Bound] {
        &self.bounds
    }

    pub fn bound(&self, dim: usize) -> Option<&Bound> {
        self.bounds.get(dim)
    }

    pub fn contains(&self, x: &DVector<f64>) -> bool {
        x.len() == self.dimension()
            && self
                .bounds
                .iter()
                .zip(x.iter())
                .all(|(bound, &xj)| bound.contains(xj))
    }

    /// Clamps every coordinate of `x` in place.
    pub fn clamp(&self, x: &mut DVector<f64>) {
        debug_assert!(
            x.len() == self.dimension(),
            "Position length ({}) does not match search space dimension ({})",
            x.len(),
            self.dimension()
        );
        for (xj, bound) in x.iter_mut().zip(self.bounds.iter()) {
            *xj = bound.clamp(*xj);
        }
    }
}

impl TryFrom<&[(f64, f64)]> for SearchSpace {
    type Error = SwarmError;

    fn try_from(bounds: &[(f64, f64)]) -> SwarmResult<Self> {
        Self::new(bounds)
    }
}

impl TryFrom<Vec<(f64, f64)>> for SearchSpace {
    type Error = SwarmError;

    fn try_from(bounds: Vec<(f64, f64)>) -> SwarmResult<Self> {
        Self::new(&bounds)
    }
}

impl<const D: usize> TryFrom<[(f64, f64); D]> for SearchSpace {
    type Error = SwarmError;

    fn try_from(bounds: [(f64, f64); D]) -> SwarmResult<Self> {
        Self::new(&bounds)
    }
}
