use validator::{Validate, ValidationError};

/// Acceptance rule used for single-site trial flips.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SweepMode {
    #[default]
    Metropolis,
    Gibbs,
}

impl TryFrom<&str> for SweepMode {
    type Error = String;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "metropolis" => Ok(Self::Metropolis),
            "gibbs" => Ok(Self::Gibbs),
            _ => Err(format!(
                "unknown sweep_mode '{s}', expected 'metropolis' or 'gibbs'"
            )),
        }
    }
}

fn validate_sim_config(cfg: &SimConfig) -> Result<(), ValidationError> {
    if cfg.n_sweeps < 1 {
        return Err(ValidationError::new("n_sweeps must be >= 1"));
    }
    if cfg.warmup_sweeps > cfg.n_sweeps {
        return Err(ValidationError::new("warmup_sweeps must be <= n_sweeps"));
    }
    Ok(())
}

#[derive(Debug, Clone, Validate)]
#[validate(schema(function = "validate_sim_config"))]
pub struct SimConfig {
    pub n_sweeps: usize,
    /// Sweeps run before `E` and `N` are recorded.
    pub warmup_sweeps: usize,
    pub sweep_mode: SweepMode,
    /// Evaluate the cutoff-sphere energy sum on the current thread instead
    /// of the rayon pool.
    pub sequential: bool,
}

impl SimConfig {
    pub fn new(n_sweeps: usize) -> Self {
        Self {
            n_sweeps,
            warmup_sweeps: 0,
            sweep_mode: SweepMode::Metropolis,
            sequential: true,
        }
    }
}
