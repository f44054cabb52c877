use rand::Rng;

use super::metropolis::{try_flip, Accumulators, Reservoir};
use crate::config::SweepMode;
use crate::geometry::{Lattice, Offset};
use crate::potential::Potential;

/// One Monte Carlo sweep: `n_sites` trial flips at uniformly random sites.
///
/// Sites are drawn independently, so a sweep may visit some sites more than
/// once and skip others. Flips are applied in order; each trial sees the
/// lattice left by the previous one. Returns the number of accepted flips.
#[allow(clippy::too_many_arguments)]
#[cfg_attr(feature = "profile", inline(never))]
pub fn whole_lattice_sweep<R: Rng>(
    lattice: &mut Lattice,
    potential: &Potential,
    offsets: &[Offset],
    reservoir: &Reservoir,
    acc: &mut Accumulators,
    mode: SweepMode,
    sequential: bool,
    rng: &mut R,
) -> usize {
    let [lx, ly, lz] = lattice.shape;
    let mut accepted = 0;
    for _ in 0..lattice.n_sites {
        let site = [rng.gen_range(0..lx), rng.gen_range(0..ly), rng.gen_range(0..lz)];
        if try_flip(
            lattice, potential, offsets, reservoir, acc, site, mode, sequential, rng,
        ) {
            accepted += 1;
        }
    }
    accepted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{cutoff_sphere, BoundaryPolicy};
    use crate::mcmc::energy::total_energy;
    use approx::assert_abs_diff_eq;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256StarStar;

    #[test]
    fn test_sweep_keeps_accumulators_consistent() {
        let mut lat = Lattice::cubic(8, 2, BoundaryPolicy::Free).unwrap();
        let pot = Potential::tabulate(|r| if r <= 1.0 { -4.0 } else { 1.0 }, 2.0, 9, 0.0).unwrap();
        let offsets = cutoff_sphere(2, pot.rcut);
        let reservoir = Reservoir {
            temperature: 3.0,
            chemical_potential: 2.0,
        };
        let mut acc = Accumulators::default();
        let mut rng = Xoshiro256StarStar::seed_from_u64(99);

        for _ in 0..20 {
            whole_lattice_sweep(
                &mut lat,
                &pot,
                &offsets,
                &reservoir,
                &mut acc,
                SweepMode::Metropolis,
                true,
                &mut rng,
            );
            assert_eq!(acc.population, lat.occupied_count());
            assert_abs_diff_eq!(
                acc.energy,
                total_energy(&lat, &pot, &offsets, true),
                epsilon = 1e-9
            );
        }
    }

    #[test]
    fn test_accepted_count_bounded_by_sites() {
        let mut lat = Lattice::cubic(4, 3, BoundaryPolicy::Periodic).unwrap();
        let pot = Potential::tabulate(|_| 0.0, 1.0, 5, 0.0).unwrap();
        let offsets = cutoff_sphere(3, pot.rcut);
        // Ideal gas with mu = 0 accepts every trial
        let reservoir = Reservoir {
            temperature: 1.0,
            chemical_potential: 0.0,
        };
        let mut acc = Accumulators::default();
        let mut rng = Xoshiro256StarStar::seed_from_u64(0);
        let accepted = whole_lattice_sweep(
            &mut lat,
            &pot,
            &offsets,
            &reservoir,
            &mut acc,
            SweepMode::Metropolis,
            true,
            &mut rng,
        );
        assert_eq!(accepted, 64);
    }
}
