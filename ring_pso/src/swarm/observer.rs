use std::{cell::RefCell, rc::Rc};

use crate::prelude::*;

/// Hook called by [`Swarm::minimize_with_observer`].
pub trait SwarmObserver {
    /// Called once, before the first epoch.
    fn observe_init(&mut self, _snapshot: &EpochSnapshot) {}

    /// Called after every completed epoch.
    fn observe_epoch(&mut self, snapshot: &EpochSnapshot);
}

/// Records the best objective value of the swarm after initialization and after every epoch.
///
/// Clones share the same history, so a clone can be handed to the run and the original read
/// afterwards.
#[derive(Clone, Default)]
pub struct BestValueHistory {
    best_values: Rc<RefCell<Vec<f64>>>,
}

impl BestValueHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn best_values(&self) -> Vec<f64> {
        self.best_values.borrow().clone()
    }

    pub fn observe_value(&self, value: f64) {
        self.best_values.borrow_mut().push(value);
    }
}

impl SwarmObserver for BestValueHistory {
    fn observe_init(&mut self, snapshot: &EpochSnapshot) {
        self.observe_value(snapshot.best_value);
    }

    fn observe_epoch(&mut self, snapshot: &EpochSnapshot) {
        self.observe_value(snapshot.best_value);
    }
}
