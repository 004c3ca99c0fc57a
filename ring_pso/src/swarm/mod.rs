//! Particle swarm minimizer with a ring neighborhood topology.
//!
//! Each particle only knows the best position among itself and its two index-adjacent
//! particles (with wraparound), rather than the best position of the whole swarm. Information
//! spreads more slowly around the ring, which helps the swarm escape local minima before
//! collapsing (Bratton & Kennedy, "Defining a Standard for Particle Swarm Optimization", 2007).
//!
//! Velocities are damped with Clerc's constriction factor instead of an inertia weight.

use nalgebra::DVector;
use rand::{Rng, rngs::StdRng};
use rand_core::SeedableRng;
use rand_distr::{Distribution, Uniform};
use tracing::{debug, info, warn};

use crate::prelude::*;

pub mod config;
pub mod convergence;
pub mod objective;
pub mod observer;
pub mod report;
pub mod search_space;
pub mod topology;

#[cfg(test)]
mod tests;

/// Swarm state for one optimization run.
///
/// Particle state is kept as parallel arrays indexed by particle. Objective values of the
/// current and personal-best positions are cached, so every position is evaluated exactly once.
pub struct Swarm<'a, O: Objective> {
    objective: &'a O,
    space: SearchSpace,
    tolerance: f64,
    config: SwarmConfig,
    constriction_factor: f64,

    positions: Vec<DVector<f64>>,
    velocities: Vec<DVector<f64>>,
    f_values: Vec<f64>,
    personal_best_positions: Vec<DVector<f64>>,
    personal_best_values: Vec<f64>,
    local_best_positions: Vec<DVector<f64>>,

    rng: StdRng,
    epoch_count: u64,
}

impl<'a, O: Objective> Swarm<'a, O> {
    /// Creates a swarm with the default [`SwarmConfig`].
    pub fn new(bounds: &[(f64, f64)], objective: &'a O, tolerance: f64) -> SwarmResult<Self> {
        Self::with_config(bounds, objective, tolerance, SwarmConfig::default())
    }

    pub fn with_config(
        bounds: &[(f64, f64)],
        objective: &'a O,
        tolerance: f64,
        config: SwarmConfig,
    ) -> SwarmResult<Self> {
        Self::from_search_space(SearchSpace::new(bounds)?, objective, tolerance, config)
    }

    /// All inputs are validated before the generator is seeded, so a rejected configuration
    /// never consumes random state.
    pub fn from_search_space(
        space: SearchSpace,
        objective: &'a O,
        tolerance: f64,
        config: SwarmConfig,
    ) -> SwarmResult<Self> {
        // `!(x > 0.0)` also rejects NaN
        if !tolerance.is_finite() || !(tolerance > 0.0) {
            return Err(SwarmError::InvalidTolerance(tolerance));
        }
        let constriction_factor = config.validate()?;

        let samplers = space
            .bounds()
            .iter()
            .enumerate()
            .map(|(dim, bound)| {
                Uniform::<f64>::new(bound.min, bound.max).map_err(|_| SwarmError::InvalidBounds {
                    dim,
                    min: bound.min,
                    max: bound.max,
                })
            })
            .collect::<SwarmResult<Vec<_>>>()?;

        let mut rng = StdRng::seed_from_u64(config.seed);
        let n = config.n_particles;

        // all positions first, then all velocities
        let positions: Vec<DVector<f64>> =
            (0..n).map(|_| sample_point(&samplers, &mut rng)).collect();
        let velocities: Vec<DVector<f64>> =
            (0..n).map(|_| sample_point(&samplers, &mut rng)).collect();

        let f_values = positions
            .iter()
            .map(|x| evaluate(objective, x))
            .collect::<SwarmResult<Vec<f64>>>()?;

        let mut swarm = Swarm {
            objective,
            space,
            tolerance,
            config,
            constriction_factor,
            personal_best_positions: positions.clone(),
            personal_best_values: f_values.clone(),
            local_best_positions: positions.clone(),
            positions,
            velocities,
            f_values,
            rng,
            epoch_count: 0,
        };
        swarm.update_local_bests();

        debug!(
            n_particles = swarm.n_particles(),
            dimension = swarm.dimension(),
            constriction_factor = swarm.constriction_factor,
            "swarm initialized"
        );

        Ok(swarm)
    }

    /// Advances the swarm by one epoch.
    ///
    /// Every particle moves using the local and personal bests settled at the end of the
    /// previous epoch; bests are recomputed only once all particles have moved. If the
    /// objective fails at any new position the epoch is abandoned: the error is returned and
    /// the swarm, including its generator, is left as it was before the call.
    pub fn step(&mut self) -> SwarmResult<()> {
        let rng_checkpoint = self.rng.clone();
        let n = self.n_particles();
        let d = self.dimension();

        // all r1 first, then all r2
        let r1 = unit_factors(&mut self.rng, n, d);
        let r2 = unit_factors(&mut self.rng, n, d);

        let chi = self.constriction_factor;
        let (c1, c2) = (self.config.c1, self.config.c2);

        let mut velocities = Vec::with_capacity(n);
        let mut positions = Vec::with_capacity(n);
        for i in 0..n {
            let x = &self.positions[i];
            let social = (&r1[i] * c1).component_mul(&(&self.local_best_positions[i] - x));
            let cognitive = (&r2[i] * c2).component_mul(&(&self.personal_best_positions[i] - x));
            let v = (&self.velocities[i] + social + cognitive) * chi;

            let mut x_next = x + &v;
            self.space.clamp(&mut x_next);

            velocities.push(v);
            positions.push(x_next);
        }

        let evaluated = positions
            .iter()
            .map(|x| evaluate(self.objective, x))
            .collect::<SwarmResult<Vec<f64>>>();
        let f_values = match evaluated {
            Ok(f_values) => f_values,
            Err(err) => {
                warn!(epoch = self.epoch_count + 1, error = %err, "epoch aborted");
                self.rng = rng_checkpoint;
                return Err(err);
            }
        };

        self.positions = positions;
        self.velocities = velocities;
        self.f_values = f_values;

        self.update_personal_bests();
        self.update_local_bests();

        self.epoch_count += 1;

        debug!(
            epoch = self.epoch_count,
            best_value = self.f_values[self.min_index()],
            spread = position_spread(&self.positions),
            "epoch complete"
        );

        Ok(())
    }

    /// A personal best only moves on a strict improvement.
    fn update_personal_bests(&mut self) {
        for ((best_x, best_f), (x, &f)) in self
            .personal_best_positions
            .iter_mut()
            .zip(self.personal_best_values.iter_mut())
            .zip(self.positions.iter().zip(self.f_values.iter()))
        {
            if is_better(f, *best_f) {
                best_x.copy_from(x);
                *best_f = f;
            }
        }
    }

    fn update_local_bests(&mut self) {
        let best_idxs = local_best_indices(&self.f_values);
        for (local_best, j) in self.local_best_positions.iter_mut().zip(best_idxs) {
            local_best.copy_from(&self.positions[j]);
        }
    }

    pub fn check_convergence(&self) -> ConvergenceCheck {
        ConvergenceCheck::evaluate(
            self.epoch_count,
            position_spread(&self.positions),
            self.tolerance,
            self.config.max_epochs,
        )
    }

    /// True once the run has reached either terminal state.
    pub fn is_converged(&self) -> bool {
        !self.check_convergence().should_continue()
    }

    /// Steps the swarm until the convergence check reports a terminal state.
    pub fn minimize(&mut self) -> SwarmResult<MinimizeReport> {
        self.run(|_| {})
    }

    pub fn minimize_with_observer<Obs: SwarmObserver>(
        &mut self,
        observer: &mut Obs,
    ) -> SwarmResult<MinimizeReport> {
        observer.observe_init(&self.snapshot());
        self.run(|swarm| observer.observe_epoch(&swarm.snapshot()))
    }

    fn run<F: FnMut(&Self)>(&mut self, mut after_epoch: F) -> SwarmResult<MinimizeReport> {
        loop {
            let check = self.check_convergence();
            if let Some(termination) = check.termination {
                let minimum = self.min_point();
                info!(
                    %termination,
                    epochs = self.epoch_count,
                    spread = check.spread,
                    min_value = minimum.value,
                    min_point = ?minimum.position.as_slice(),
                    "swarm stopped"
                );
                return Ok(MinimizeReport {
                    termination,
                    epochs: self.epoch_count,
                    spread: check.spread,
                    minimum,
                });
            }
            self.step()?;
            after_epoch(self);
        }
    }

    /// Iterator that steps the swarm once per `next()` and yields the state after each epoch,
    /// stopping when the convergence check does. An objective failure is yielded once and
    /// ends the iteration.
    pub fn epochs(&mut self) -> Epochs<'_, 'a, O> {
        Epochs {
            swarm: self,
            failed: false,
        }
    }

    /// Objective value at every current particle position.
    pub fn f_values(&self) -> &[f64] {
        &self.f_values
    }

    fn min_index(&self) -> usize {
        (1..self.f_values.len()).fold(0, |best, i| {
            if is_better(self.f_values[i], self.f_values[best]) {
                i
            } else {
                best
            }
        })
    }

    /// Current particle position with the lowest objective value; ties go to the lowest index.
    pub fn min_point(&self) -> BestPoint {
        let particle = self.min_index();
        BestPoint {
            particle,
            position: self.positions[particle].clone(),
            value: self.f_values[particle],
        }
    }

    pub fn snapshot(&self) -> EpochSnapshot {
        EpochSnapshot {
            epoch: self.epoch_count,
            positions: self
                .positions
                .iter()
                .map(|x| x.as_slice().to_vec())
                .collect(),
            f_values: self.f_values.clone(),
            best_value: self.f_values[self.min_index()],
        }
    }

    pub fn positions(&self) -> &[DVector<f64>] {
        &self.positions
    }

    pub fn velocities(&self) -> &[DVector<f64>] {
        &self.velocities
    }

    pub fn personal_best_positions(&self) -> &[DVector<f64>] {
        &self.personal_best_positions
    }

    pub fn personal_best_values(&self) -> &[f64] {
        &self.personal_best_values
    }

    pub fn local_best_positions(&self) -> &[DVector<f64>] {
        &self.local_best_positions
    }

    pub fn epoch_count(&self) -> u64 {
        self.epoch_count
    }

    pub fn constriction_factor(&self) -> f64 {
        self.constriction_factor
    }

    pub fn dimension(&self) -> usize {
        self.space.dimension()
    }

    pub fn n_particles(&self) -> usize {
        self.positions.len()
    }

    pub fn search_space(&self) -> &SearchSpace {
        &self.space
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn config(&self) -> &SwarmConfig {
        &self.config
    }
}

/// See [`Swarm::epochs`].
pub struct Epochs<'s, 'a, O: Objective> {
    swarm: &'s mut Swarm<'a, O>,
    failed: bool,
}

impl<O: Objective> Iterator for Epochs<'_, '_, O> {
    type Item = SwarmResult<EpochSnapshot>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || !self.swarm.check_convergence().should_continue() {
            return None;
        }
        match self.swarm.step() {
            Ok(()) => Some(Ok(self.swarm.snapshot())),
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}

fn sample_point(samplers: &[Uniform<f64>], rng: &mut StdRng) -> DVector<f64> {
    DVector::from_iterator(samplers.len(), samplers.iter().map(|s| s.sample(rng)))
}

/// `n` vectors of `d` independent draws from [0, 1), particle-major.
fn unit_factors(rng: &mut StdRng, n: usize, d: usize) -> Vec<DVector<f64>> {
    (0..n)
        .map(|_| DVector::from_iterator(d, (0..d).map(|_| rng.random::<f64>())))
        .collect()
}
