//! Error types for latgas-sim.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LatgasError {
    #[error("invalid potential table: {0}")]
    InvalidPotential(String),

    #[error("invalid lattice: {0}")]
    InvalidLattice(String),

    #[error("invalid boundary policy: {0}")]
    InvalidBoundary(String),

    #[error("temperature must be finite and > 0, got {0}")]
    InvalidTemperature(f64),

    #[error("sites {site} and {neighbor} are both occupied but closer than the core radius")]
    CoreOverlap { site: usize, neighbor: usize },

    #[error("invalid simulation config: {0}")]
    InvalidConfig(String),

    #[error("interrupted")]
    Interrupted,
}

impl From<validator::ValidationErrors> for LatgasError {
    fn from(e: validator::ValidationErrors) -> Self {
        Self::InvalidConfig(format!("{e}"))
    }
}

pub type Result<T> = std::result::Result<T, LatgasError>;
