pub mod system;

pub use system::System;

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{info, trace};
use validator::Validate;

use crate::config::SimConfig;
use crate::error::{LatgasError, Result};
use crate::statistics::{Statistics, SweepResult};

/// Run the full Monte Carlo loop (warmup + measurement) on one [`System`].
///
/// Each sweep consists of:
/// 1. `Lx*Ly*Lz` single-site trial flips (`sweep_mode`: Metropolis or Gibbs)
/// 2. Recording `E` and `N` (after `warmup_sweeps`)
///
/// `on_sweep` is called once per sweep (useful for progress bars). Setting
/// `interrupted` stops the loop before the next sweep.
///
/// `config.sequential` applies for the duration of the loop only; the
/// system's own setting is restored on every exit path.
pub fn run_sweep_loop(
    system: &mut System,
    config: &SimConfig,
    interrupted: &AtomicBool,
    on_sweep: &(dyn Fn() + Sync),
) -> Result<SweepResult> {
    config.validate()?;

    let previous = std::mem::replace(&mut system.sequential, config.sequential);
    let result = sweep_loop(system, config, interrupted, on_sweep);
    system.sequential = previous;
    result
}

fn sweep_loop(
    system: &mut System,
    config: &SimConfig,
    interrupted: &AtomicBool,
    on_sweep: &(dyn Fn() + Sync),
) -> Result<SweepResult> {
    let n_sweeps = config.n_sweeps;
    let warmup_sweeps = config.warmup_sweeps;

    info!(
        n_sweeps,
        warmup_sweeps,
        sweep_mode = ?config.sweep_mode,
        temperature = system.temperature(),
        chemical_potential = system.chemical_potential(),
        "starting sweep loop"
    );

    let mut energy_stat = Statistics::new();
    let mut population_stat = Statistics::new();

    for sweep_id in 0..n_sweeps {
        if interrupted.load(Ordering::Relaxed) {
            return Err(LatgasError::Interrupted);
        }
        on_sweep();

        let accepted = system.sweep(config.sweep_mode);
        trace!(
            sweep_id,
            accepted,
            energy = system.energy(),
            population = system.population(),
            "sweep done"
        );

        if sweep_id >= warmup_sweeps {
            energy_stat.update(system.energy());
            population_stat.update(system.population() as f64);
        }
    }

    let result = SweepResult {
        energy: energy_stat.average(),
        population: population_stat.average(),
        final_energy: system.energy(),
        final_population: system.population(),
        n_measurements: energy_stat.count,
    };
    info!(
        energy = result.energy,
        population = result.population,
        "sweep loop finished"
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SweepMode;
    use crate::geometry::{BoundaryPolicy, Lattice};
    use crate::potential::Potential;
    use std::sync::atomic::AtomicUsize;

    fn small_system(seed: u64) -> System {
        let lat = Lattice::cubic(6, 2, BoundaryPolicy::Periodic).unwrap();
        let pot = Potential::tabulate(|_| -4.0, 1.0, 5, 0.0).unwrap();
        System::new(pot, lat, 2.0, 8.0, Some(seed)).unwrap()
    }

    #[test]
    fn test_measurement_count() {
        let mut sys = small_system(1);
        let mut cfg = SimConfig::new(30);
        cfg.warmup_sweeps = 10;
        let calls = AtomicUsize::new(0);
        let res = run_sweep_loop(&mut sys, &cfg, &AtomicBool::new(false), &|| {
            calls.fetch_add(1, Ordering::Relaxed);
        })
        .unwrap();
        assert_eq!(res.n_measurements, 20);
        assert_eq!(calls.load(Ordering::Relaxed), 30);
        assert_eq!(res.final_population, sys.total_population());
    }

    #[test]
    fn test_invalid_config() {
        let mut sys = small_system(1);
        let mut cfg = SimConfig::new(5);
        cfg.warmup_sweeps = 6;
        let err = run_sweep_loop(&mut sys, &cfg, &AtomicBool::new(false), &|| {}).unwrap_err();
        assert!(matches!(err, LatgasError::InvalidConfig(_)));
    }

    #[test]
    fn test_interrupt() {
        let mut sys = small_system(1);
        let cfg = SimConfig::new(5);
        let err = run_sweep_loop(&mut sys, &cfg, &AtomicBool::new(true), &|| {}).unwrap_err();
        assert!(matches!(err, LatgasError::Interrupted));
    }

    #[test]
    fn test_sequential_setting_is_restored() {
        let mut sys = small_system(2);
        assert!(sys.sequential);
        let mut cfg = SimConfig::new(3);
        cfg.sequential = false;
        run_sweep_loop(&mut sys, &cfg, &AtomicBool::new(false), &|| {}).unwrap();
        assert!(sys.sequential);

        run_sweep_loop(&mut sys, &cfg, &AtomicBool::new(true), &|| {}).unwrap_err();
        assert!(sys.sequential);

        sys.sequential = false;
        cfg.sequential = true;
        run_sweep_loop(&mut sys, &cfg, &AtomicBool::new(false), &|| {}).unwrap();
        assert!(!sys.sequential);
    }

    #[test]
    fn test_gibbs_mode_runs_consistently() {
        let mut sys = small_system(3);
        let mut cfg = SimConfig::new(20);
        cfg.sweep_mode = SweepMode::Gibbs;
        cfg.sequential = false;
        run_sweep_loop(&mut sys, &cfg, &AtomicBool::new(false), &|| {}).unwrap();
        assert_eq!(sys.population(), sys.total_population());
        approx::assert_abs_diff_eq!(sys.energy(), sys.total_energy(), epsilon = 1e-9);
    }
}
