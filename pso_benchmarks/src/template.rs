//! Object detection by template matching.
//!
//! Given a grayscale model image of the sought object and a larger target image, the object is
//! located by minimizing the dissimilarity between the model and the equally sized window of the
//! target whose top-left corner sits at pixel `(x, y)`.

use argmin::core::{CostFunction, Error as ArgminError};
use nalgebra::{DMatrix, DVector};
use ring_pso::prelude::{MinimizeReport, SearchSpace, Swarm, SwarmConfig};

use crate::error::{BenchmarkError, BenchmarkResult};

/// Convergence tolerance for template matching; particles only need to agree to within a pixel.
pub const TEMPLATE_TOLERANCE: f64 = 0.5;

/// Frobenius norm of the pixel-wise difference between `model` and the window of `target` with
/// top-left corner at column `floor(x)`, row `floor(y)`.
pub fn dissimilarity(
    x: f64,
    y: f64,
    model: &DMatrix<f64>,
    target: &DMatrix<f64>,
) -> BenchmarkResult<f64> {
    let out_of_bounds = BenchmarkError::WindowOutOfBounds { x, y };
    if !(x >= 0.0 && y >= 0.0) || !x.is_finite() || !y.is_finite() {
        return Err(out_of_bounds);
    }
    let (row, col) = (y.floor() as usize, x.floor() as usize);
    let (rows, cols) = model.shape();
    if row + rows > target.nrows() || col + cols > target.ncols() {
        return Err(out_of_bounds);
    }

    let window = target.view((row, col), (rows, cols));
    Ok((window.clone_owned() - model).norm())
}

/// Grayscale `rows x cols` image, dark except for one smooth, slightly elongated bright spot
/// centred on `center = (row, col)`.
pub fn synthetic_scene(rows: usize, cols: usize, center: (f64, f64)) -> DMatrix<f64> {
    DMatrix::from_fn(rows, cols, |i, j| {
        let (di, dj) = (i as f64 - center.0, j as f64 - center.1);
        (-(di * di / 30.0 + dj * dj / 45.0)).exp()
    })
}

/// Runs a swarm over the valid window corners of `problem` with [`TEMPLATE_TOLERANCE`].
/// The reported minimum is the `(x, y)` top-left corner of the best match.
pub fn detect(problem: &TemplateMatch, config: SwarmConfig) -> BenchmarkResult<MinimizeReport> {
    let mut swarm =
        Swarm::from_search_space(problem.search_space()?, problem, TEMPLATE_TOLERANCE, config)?;
    Ok(swarm.minimize()?)
}

/// Template matching problem as an objective over `(x, y)` pixel coordinates.
#[derive(Clone, Debug)]
pub struct TemplateMatch {
    model: DMatrix<f64>,
    target: DMatrix<f64>,
}

impl TemplateMatch {
    /// The model must be non-empty and strictly smaller than the target in both directions,
    /// otherwise the search box degenerates.
    pub fn new(model: DMatrix<f64>, target: DMatrix<f64>) -> BenchmarkResult<Self> {
        let fits = !model.is_empty()
            && model.nrows() < target.nrows()
            && model.ncols() < target.ncols();
        if !fits {
            return Err(BenchmarkError::ModelDoesNotFit {
                model_rows: model.nrows(),
                model_cols: model.ncols(),
                target_rows: target.nrows(),
                target_cols: target.ncols(),
            });
        }
        Ok(Self { model, target })
    }

    /// Cuts the model out of the target at the given top-left corner.
    pub fn from_window(
        target: DMatrix<f64>,
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    ) -> BenchmarkResult<Self> {
        if row + rows > target.nrows() || col + cols > target.ncols() {
            return Err(BenchmarkError::WindowOutOfBounds {
                x: col as f64,
                y: row as f64,
            });
        }
        let model = target.view((row, col), (rows, cols)).clone_owned();
        Self::new(model, target)
    }

    /// `x` spans `[0, W - w]` and `y` spans `[0, H - h]`.
    pub fn search_space(&self) -> BenchmarkResult<SearchSpace> {
        let x_max = (self.target.ncols() - self.model.ncols()) as f64;
        let y_max = (self.target.nrows() - self.model.nrows()) as f64;
        Ok(SearchSpace::new(&[(0.0, x_max), (0.0, y_max)])?)
    }

    pub fn model(&self) -> &DMatrix<f64> {
        &self.model
    }

    pub fn target(&self) -> &DMatrix<f64> {
        &self.target
    }

    pub fn dissimilarity_at(&self, x: f64, y: f64) -> BenchmarkResult<f64> {
        dissimilarity(x, y, &self.model, &self.target)
    }
}

impl CostFunction for TemplateMatch {
    type Param = DVector<f64>;
    type Output = f64;

    fn cost(&self, p: &Self::Param) -> Result<Self::Output, ArgminError> {
        if p.len() != 2 {
            anyhow::bail!(
                "Template matching takes an (x, y) pixel position, got {} coordinates",
                p.len()
            );
        }
        Ok(self.dissimilarity_at(p[0], p[1])?)
    }
}
