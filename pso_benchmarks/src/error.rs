use ring_pso::prelude::SwarmError;
use thiserror::Error;

pub type BenchmarkResult<T> = Result<T, BenchmarkError>;

#[derive(Error, Debug)]
pub enum BenchmarkError {
    #[error("Unknown benchmark function '{0}'; expected one of sphere, rastrigin, rosenbrock")]
    UnknownBenchmark(String),

    #[error("The {name} function needs at least {min} dimensions, got {got}")]
    TooFewDimensions {
        name: &'static str,
        min: usize,
        got: usize,
    },

    #[error(
        "Model image ({model_rows}x{model_cols}) must be non-empty and strictly smaller than the target image ({target_rows}x{target_cols})"
    )]
    ModelDoesNotFit {
        model_rows: usize,
        model_cols: usize,
        target_rows: usize,
        target_cols: usize,
    },

    #[error("Window with top-left corner at (x={x}, y={y}) does not fit inside the target image")]
    WindowOutOfBounds { x: f64, y: f64 },

    #[error("Swarm error: {0}")]
    Swarm(#[from] SwarmError),
}
