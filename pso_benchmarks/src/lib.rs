pub mod error;
pub mod functions;
pub mod template;

pub mod prelude {
    pub use crate::{error::*, functions::*, template::*};
}
