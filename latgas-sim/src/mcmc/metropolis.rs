use rand::Rng;

use super::energy::energy_if_occupied;
use crate::config::SweepMode;
use crate::geometry::{Lattice, Offset};
use crate::potential::Potential;

/// Thermodynamic reservoir the lattice exchanges energy and particles with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reservoir {
    pub temperature: f64,
    pub chemical_potential: f64,
}

/// Running totals kept in step with the lattice.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Accumulators {
    /// Total pair energy `E`.
    pub energy: f64,
    /// Number of occupied sites `N`.
    pub population: usize,
}

/// A proposed occupation flip at one site.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trial {
    /// Flat index of the site.
    pub site: usize,
    /// `+1` for an insertion, `-1` for a removal.
    pub dn: i32,
    /// Change in pair energy.
    pub de: f64,
    /// Grand-canonical trial energy `de + mu * dn`.
    pub du: f64,
}

/// Build the trial for flipping site `(x, y, z)`.
pub fn propose(
    lattice: &Lattice,
    potential: &Potential,
    offsets: &[Offset],
    reservoir: &Reservoir,
    site: [usize; 3],
    sequential: bool,
) -> Trial {
    let [x, y, z] = site;
    let idx = lattice.index(x, y, z);
    let dn = if lattice.get(idx) { -1 } else { 1 };
    let de = dn as f64 * energy_if_occupied(lattice, potential, offsets, site, sequential);
    Trial {
        site: idx,
        dn,
        de,
        du: de + reservoir.chemical_potential * dn as f64,
    }
}

/// Decide whether a trial with energy `du` is accepted at `temperature`.
///
/// Metropolis accepts `du < 0` without touching the RNG; otherwise one
/// uniform draw is compared with `exp(-du / T)`. Gibbs always draws and
/// accepts with probability `1 / (1 + exp(du / T))`.
#[inline]
pub fn accept<R: Rng>(du: f64, temperature: f64, mode: SweepMode, rng: &mut R) -> bool {
    match mode {
        SweepMode::Metropolis => du < 0.0 || rng.gen::<f64>() < (-du / temperature).exp(),
        SweepMode::Gibbs => rng.gen::<f64>() < 1.0 / (1.0 + (du / temperature).exp()),
    }
}

/// Apply an accepted trial to the lattice and the running totals.
#[inline]
pub fn commit(lattice: &mut Lattice, acc: &mut Accumulators, trial: &Trial) {
    lattice.toggle(trial.site);
    acc.energy += trial.de;
    if trial.dn > 0 {
        acc.population += 1;
    } else {
        acc.population -= 1;
    }
}

/// Attempt one single-site flip. Returns whether it was accepted.
#[allow(clippy::too_many_arguments)]
pub fn try_flip<R: Rng>(
    lattice: &mut Lattice,
    potential: &Potential,
    offsets: &[Offset],
    reservoir: &Reservoir,
    acc: &mut Accumulators,
    site: [usize; 3],
    mode: SweepMode,
    sequential: bool,
    rng: &mut R,
) -> bool {
    let trial = propose(lattice, potential, offsets, reservoir, site, sequential);
    if !accept(trial.du, reservoir.temperature, mode, rng) {
        return false;
    }
    commit(lattice, acc, &trial);
    true
}
