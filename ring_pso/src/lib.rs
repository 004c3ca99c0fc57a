pub mod error;
pub mod swarm;

pub mod prelude {
    pub use crate::{
        error::*,
        swarm::{
            Epochs, Swarm, config::*, convergence::*, objective::*, observer::*, report::*,
            search_space::*, topology::*,
        },
    };

    pub use argmin;
    pub use nalgebra;
}

pub use swarm::Swarm;
