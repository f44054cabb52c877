use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;
use tracing::debug;

use crate::config::SweepMode;
use crate::error::{LatgasError, Result};
use crate::geometry::{cutoff_sphere, Lattice, Offset};
use crate::mcmc::{self, Accumulators, Reservoir};
use crate::potential::Potential;
use crate::statistics::{RunAverages, Statistics};

/// Complete state of a grand-canonical lattice gas.
///
/// Owns the potential table, the lattice, and the random source, and keeps
/// the running totals `E` and `N` in step with the lattice. Every accepted
/// flip goes through [`System::flip`], so
/// `energy() == total_energy()` and `population() == total_population()`
/// hold after any sequence of sweeps (up to floating-point rounding).
pub struct System {
    potential: Potential,
    lattice: Lattice,
    reservoir: Reservoir,
    acc: Accumulators,
    /// Non-zero offsets inside the cutoff sphere for this lattice's `dim`.
    offsets: Vec<Offset>,
    /// One-shot seed, consumed by the next sweep.
    seed: Option<u64>,
    rng: Xoshiro256StarStar,
    /// Sum the cutoff sphere on the current thread instead of the rayon pool.
    pub sequential: bool,
}

impl System {
    /// Build a system around an already-populated lattice.
    ///
    /// `E` and `N` are computed from the lattice as given. Without a `seed`
    /// the random source is seeded from OS entropy.
    pub fn new(
        potential: Potential,
        lattice: Lattice,
        temperature: f64,
        chemical_potential: f64,
        seed: Option<u64>,
    ) -> Result<Self> {
        check_temperature(temperature)?;

        let offsets = cutoff_sphere(lattice.dim, potential.rcut);
        let mut sys = Self {
            potential,
            lattice,
            reservoir: Reservoir {
                temperature,
                chemical_potential,
            },
            acc: Accumulators::default(),
            offsets,
            seed,
            rng: Xoshiro256StarStar::from_entropy(),
            sequential: true,
        };
        sys.recompute_accumulators()?;
        Ok(sys)
    }

    pub fn potential(&self) -> &Potential {
        &self.potential
    }

    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    /// Mutable access to the lattice for external edits.
    ///
    /// Call [`System::recompute_accumulators`] afterwards.
    pub fn lattice_mut(&mut self) -> &mut Lattice {
        &mut self.lattice
    }

    pub fn temperature(&self) -> f64 {
        self.reservoir.temperature
    }

    pub fn set_temperature(&mut self, temperature: f64) -> Result<()> {
        check_temperature(temperature)?;
        self.reservoir.temperature = temperature;
        Ok(())
    }

    pub fn chemical_potential(&self) -> f64 {
        self.reservoir.chemical_potential
    }

    pub fn set_chemical_potential(&mut self, mu: f64) {
        self.reservoir.chemical_potential = mu;
    }

    /// Running total energy `E`.
    pub fn energy(&self) -> f64 {
        self.acc.energy
    }

    /// Running particle count `N`.
    pub fn population(&self) -> usize {
        self.acc.population
    }

    pub fn offsets(&self) -> &[Offset] {
        &self.offsets
    }

    /// Arm the one-shot seed; the next sweep reseeds the random source.
    pub fn set_seed(&mut self, seed: u64) {
        self.seed = Some(seed);
    }

    pub fn pending_seed(&self) -> Option<u64> {
        self.seed
    }

    /// Recompute `E` and `N` from the lattice.
    ///
    /// Fails if the lattice now holds a pair closer than the core radius.
    pub fn recompute_accumulators(&mut self) -> Result<()> {
        if let Some((site, neighbor)) =
            mcmc::energy::find_core_overlap(&self.lattice, &self.potential, &self.offsets)
        {
            return Err(LatgasError::CoreOverlap { site, neighbor });
        }
        self.acc = Accumulators {
            energy: self.total_energy(),
            population: self.total_population(),
        };
        Ok(())
    }

    /// Occupy each site independently with probability `p`, drawing from the
    /// system's random source (consuming a pending seed first).
    ///
    /// On a core overlap the previous configuration is restored.
    pub fn random_fill(&mut self, p: f64) -> Result<()> {
        self.consume_seed();
        let mut lattice = self.lattice.clone();
        lattice.random_fill(p, &mut self.rng);
        let previous = std::mem::replace(&mut self.lattice, lattice);
        if let Err(e) = self.recompute_accumulators() {
            self.lattice = previous;
            return Err(e);
        }
        Ok(())
    }

    /// Energy site `(x, y, z)` would have if occupied.
    pub fn energy_if_occupied(&self, x: usize, y: usize, z: usize) -> f64 {
        mcmc::energy::energy_if_occupied(
            &self.lattice,
            &self.potential,
            &self.offsets,
            [x, y, z],
            self.sequential,
        )
    }

    /// Energy of site `(x, y, z)`: zero when empty.
    pub fn site_energy(&self, x: usize, y: usize, z: usize) -> f64 {
        mcmc::energy::site_energy(
            &self.lattice,
            &self.potential,
            &self.offsets,
            [x, y, z],
            self.sequential,
        )
    }

    /// Total pair energy recomputed from scratch.
    pub fn total_energy(&self) -> f64 {
        mcmc::energy::total_energy(&self.lattice, &self.potential, &self.offsets, self.sequential)
    }

    /// Occupied-site count recomputed from scratch.
    pub fn total_population(&self) -> usize {
        self.lattice.occupied_count()
    }

    /// Attempt a Metropolis flip at `(x, y, z)`. Returns whether it was accepted.
    pub fn flip(&mut self, x: usize, y: usize, z: usize) -> bool {
        self.flip_with(x, y, z, SweepMode::Metropolis)
    }

    /// Attempt a flip at `(x, y, z)` with the given acceptance rule.
    pub fn flip_with(&mut self, x: usize, y: usize, z: usize, mode: SweepMode) -> bool {
        mcmc::metropolis::try_flip(
            &mut self.lattice,
            &self.potential,
            &self.offsets,
            &self.reservoir,
            &mut self.acc,
            [x, y, z],
            mode,
            self.sequential,
            &mut self.rng,
        )
    }

    fn consume_seed(&mut self) {
        if let Some(seed) = self.seed.take() {
            debug!(seed, "reseeding random source");
            self.rng = Xoshiro256StarStar::seed_from_u64(seed);
        }
    }

    /// One Metropolis sweep of `Lx*Ly*Lz` random trial flips.
    ///
    /// Returns the number of accepted flips.
    pub fn whole_lattice_sweep(&mut self) -> usize {
        self.sweep(SweepMode::Metropolis)
    }

    /// One sweep with the given acceptance rule.
    pub fn sweep(&mut self, mode: SweepMode) -> usize {
        self.consume_seed();
        mcmc::sweep::whole_lattice_sweep(
            &mut self.lattice,
            &self.potential,
            &self.offsets,
            &self.reservoir,
            &mut self.acc,
            mode,
            self.sequential,
            &mut self.rng,
        )
    }

    /// Run `nsteps` Metropolis sweeps and average `E` and `N` after each.
    pub fn run(&mut self, nsteps: usize) -> RunAverages {
        let mut energy = Statistics::new();
        let mut population = Statistics::new();
        for _ in 0..nsteps {
            self.whole_lattice_sweep();
            energy.update(self.acc.energy);
            population.update(self.acc.population as f64);
        }
        RunAverages {
            energy: energy.average(),
            population: population.average(),
        }
    }
}

fn check_temperature(temperature: f64) -> Result<()> {
    if temperature.is_finite() && temperature > 0.0 {
        Ok(())
    } else {
        Err(LatgasError::InvalidTemperature(temperature))
    }
}
