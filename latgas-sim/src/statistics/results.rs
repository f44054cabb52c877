/// Outcome of a [`run_sweep_loop`](crate::simulation::run_sweep_loop) call.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepResult {
    /// ⟨E⟩ over the measurement sweeps.
    pub energy: f64,
    /// ⟨N⟩ over the measurement sweeps.
    pub population: f64,
    /// `E` after the last sweep.
    pub final_energy: f64,
    /// `N` after the last sweep.
    pub final_population: usize,
    /// Number of sweeps that contributed to the averages.
    pub n_measurements: usize,
}

/// Averages of `E` and `N` over the sweeps of a [`System::run`](crate::System::run).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunAverages {
    pub energy: f64,
    pub population: f64,
}
