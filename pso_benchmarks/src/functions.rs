//! Standard test functions for non-convex minimizers.
//!
//! Each function is defined for any dimension it makes sense in; [`BenchmarkInfo`] describes the
//! two-dimensional setup used by the driver.

use std::{f64::consts::PI, fmt, str::FromStr};

use argmin::core::{CostFunction, Error as ArgminError};
use nalgebra::DVector;
use serde::{Deserialize, Serialize};

use crate::error::{BenchmarkError, BenchmarkResult};

/// Default convergence tolerance for the benchmark runs.
pub const BENCHMARK_TOLERANCE: f64 = 1e-4;

/// `sum x_i^2`. Global minimum 0 at the origin.
pub fn sphere(x: &[f64]) -> f64 {
    x.iter().map(|v| v * v).sum()
}

/// `10 n + sum (x_i^2 - 10 cos(2 pi x_i))`.
///
/// Global minimum 0 at the origin, surrounded by a regular grid of local minima.
pub fn rastrigin(x: &[f64]) -> f64 {
    10.0 * x.len() as f64
        + x.iter()
            .map(|v| v * v - 10.0 * (2.0 * PI * v).cos())
            .sum::<f64>()
}

/// `sum (1 - x_i)^2 + 100 (x_{i+1} - x_i^2)^2`.
///
/// Global minimum 0 at `(1, ..., 1)`, at the bottom of a long, narrow, flat parabolic valley.
/// Finding the valley is easy; converging along it is not.
pub fn rosenbrock(x: &[f64]) -> f64 {
    x.windows(2)
        .map(|w| (1.0 - w[0]).powi(2) + 100.0 * (w[1] - w[0] * w[0]).powi(2))
        .sum()
}

/// Search box and known minimum of a benchmark in two dimensions.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BenchmarkInfo {
    pub name: &'static str,
    pub bounds: [(f64, f64); 2],
    pub min_point: [f64; 2],
    pub min_value: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Benchmark {
    Sphere,
    Rastrigin,
    Rosenbrock,
}

impl Benchmark {
    pub const ALL: [Benchmark; 3] = [Benchmark::Sphere, Benchmark::Rastrigin, Benchmark::Rosenbrock];

    pub fn name(self) -> &'static str {
        match self {
            Benchmark::Sphere => "sphere",
            Benchmark::Rastrigin => "rastrigin",
            Benchmark::Rosenbrock => "rosenbrock",
        }
    }

    pub fn min_dimension(self) -> usize {
        match self {
            Benchmark::Sphere | Benchmark::Rastrigin => 1,
            Benchmark::Rosenbrock => 2,
        }
    }

    pub fn info(self) -> BenchmarkInfo {
        let (bounds, min_point) = match self {
            Benchmark::Sphere => ([(-10.0, 10.0), (-10.0, 10.0)], [0.0, 0.0]),
            Benchmark::Rastrigin => ([(-5.0, 5.0), (-5.0, 5.0)], [0.0, 0.0]),
            Benchmark::Rosenbrock => ([(-1.5, 2.0), (-0.5, 3.0)], [1.0, 1.0]),
        };
        BenchmarkInfo {
            name: self.name(),
            bounds,
            min_point,
            min_value: 0.0,
        }
    }

    pub fn evaluate(self, x: &[f64]) -> BenchmarkResult<f64> {
        if x.len() < self.min_dimension() {
            return Err(BenchmarkError::TooFewDimensions {
                name: self.name(),
                min: self.min_dimension(),
                got: x.len(),
            });
        }
        Ok(match self {
            Benchmark::Sphere => sphere(x),
            Benchmark::Rastrigin => rastrigin(x),
            Benchmark::Rosenbrock => rosenbrock(x),
        })
    }
}

impl fmt::Display for Benchmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Benchmark {
    type Err = BenchmarkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Benchmark::ALL
            .into_iter()
            .find(|b| b.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| BenchmarkError::UnknownBenchmark(s.to_string()))
    }
}

impl CostFunction for Benchmark {
    type Param = DVector<f64>;
    type Output = f64;

    fn cost(&self, p: &Self::Param) -> Result<Self::Output, ArgminError> {
        Ok(self.evaluate(p.as_slice())?)
    }
}
