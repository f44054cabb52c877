pub mod energy;
pub mod metropolis;
pub mod sweep;

pub use metropolis::{Accumulators, Reservoir, Trial};
