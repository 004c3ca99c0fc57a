use thiserror::Error;

pub type SwarmResult<T> = Result<T, SwarmError>;

#[derive(Error, Debug)]
pub enum SwarmError {
    #[error("Search space must have at least one dimension")]
    EmptySearchSpace,

    #[error("Invalid bounds for dimension {dim}: min ({min}) must be finite and less than max ({max})")]
    InvalidBounds { dim: usize, min: f64, max: f64 },

    #[error("Invalid tolerance {0}: must be a positive finite number")]
    InvalidTolerance(f64),

    #[error("Invalid hyperparameters: {0}")]
    InvalidHyperparameters(String),

    #[error("Objective evaluation failed: {0}")]
    ObjectiveEvaluationError(#[from] argmin::core::Error),
}
