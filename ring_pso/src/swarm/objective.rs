use std::marker::PhantomData;

use argmin::core::{CostFunction, Error as ArgminError};
use nalgebra::DVector;

use crate::prelude::*;

/// Anything the swarm can minimize: an argmin cost function over `DVector<f64>` returning `f64`.
///
/// Blanket-implemented, so problem types that already implement `CostFunction` can be handed
/// to a [`Swarm`] directly; plain closures go through [`FnObjective`] or [`TryFnObjective`].
pub trait Objective: CostFunction<Param = DVector<f64>, Output = f64> {}

impl<O> Objective for O where O: CostFunction<Param = DVector<f64>, Output = f64> {}

/// Evaluates `objective` at `x`, passing any failure through unchanged.
pub fn evaluate<O: Objective>(objective: &O, x: &DVector<f64>) -> SwarmResult<f64> {
    Ok(objective.cost(x)?)
}

/// Wraps an infallible closure of the coordinates.
#[derive(Clone)]
pub struct FnObjective<F> {
    f: F,
}

impl<F> FnObjective<F>
where
    F: Fn(&[f64]) -> f64,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> CostFunction for FnObjective<F>
where
    F: Fn(&[f64]) -> f64,
{
    type Param = DVector<f64>;
    type Output = f64;

    fn cost(&self, p: &Self::Param) -> Result<Self::Output, ArgminError> {
        Ok((self.f)(p.as_slice()))
    }
}

/// Wraps a fallible closure of the coordinates. Its errors become
/// [`SwarmError::ObjectiveEvaluationError`] when raised during a swarm update.
#[derive(Clone)]
pub struct TryFnObjective<F, E> {
    f: F,
    _err: PhantomData<fn() -> E>,
}

impl<F, E> TryFnObjective<F, E>
where
    F: Fn(&[f64]) -> Result<f64, E>,
    E: std::error::Error + Send + Sync + 'static,
{
    pub fn new(f: F) -> Self {
        Self {
            f,
            _err: PhantomData,
        }
    }
}

impl<F, E> CostFunction for TryFnObjective<F, E>
where
    F: Fn(&[f64]) -> Result<f64, E>,
    E: std::error::Error + Send + Sync + 'static,
{
    type Param = DVector<f64>;
    type Output = f64;

    fn cost(&self, p: &Self::Param) -> Result<Self::Output, ArgminError> {
        (self.f)(p.as_slice()).map_err(anyhow::Error::new)
    }
}
