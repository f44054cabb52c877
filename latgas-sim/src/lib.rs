//! Grand-canonical lattice gas on 1D, 2D and 3D grids, evolved by
//! single-site Metropolis Monte Carlo with a tabulated pair potential.

pub mod config;
pub mod error;
pub mod geometry;
pub mod mcmc;
pub mod potential;
pub mod simulation;
pub mod statistics;

mod parallel;

pub use config::{SimConfig, SweepMode};
pub use error::{LatgasError, Result};
pub use geometry::{Boundary, BoundaryPolicy, Lattice};
pub use potential::Potential;
pub use simulation::{run_sweep_loop, System};
pub use statistics::{RunAverages, SweepResult};
