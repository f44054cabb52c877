use crate::geometry::{Lattice, Offset};
use crate::parallel::sum_over_offsets;
use crate::potential::Potential;

/// Energy that site `(x, y, z)` would have if it were occupied.
///
/// Sums `potential.v(dist)` over every occupied site inside the cutoff
/// sphere, with `dist` the truncated offset length. Periodic images of the site itself are skipped, so a site never
/// interacts with its own copy in a small periodic box.
#[inline]
pub fn energy_if_occupied(
    lattice: &Lattice,
    potential: &Potential,
    offsets: &[Offset],
    [x, y, z]: [usize; 3],
    sequential: bool,
) -> f64 {
    let site = lattice.index(x, y, z);
    let (x, y, z) = (x as isize, y as isize, z as isize);
    sum_over_offsets(offsets, sequential, |o| {
        match lattice.resolve(x + o.delta[0], y + o.delta[1], z + o.delta[2]) {
            Some(j) if j != site && lattice.get(j) => potential.v(o.dist),
            _ => 0.0,
        }
    })
}

/// Energy of site `(x, y, z)`: zero when empty, else [`energy_if_occupied`].
pub fn site_energy(
    lattice: &Lattice,
    potential: &Potential,
    offsets: &[Offset],
    site: [usize; 3],
    sequential: bool,
) -> f64 {
    let [x, y, z] = site;
    if !lattice.get(lattice.index(x, y, z)) {
        return 0.0;
    }
    energy_if_occupied(lattice, potential, offsets, site, sequential)
}

/// Total configuration energy, recomputed from scratch.
///
/// Every pair is seen from both ends, hence the factor 1/2.
pub fn total_energy(
    lattice: &Lattice,
    potential: &Potential,
    offsets: &[Offset],
    sequential: bool,
) -> f64 {
    (0..lattice.n_sites)
        .filter(|&i| lattice.get(i))
        .map(|i| energy_if_occupied(lattice, potential, offsets, lattice.coords(i), sequential))
        .sum::<f64>()
        / 2.0
}

/// First pair of occupied sites closer than the core radius, if any.
pub fn find_core_overlap(
    lattice: &Lattice,
    potential: &Potential,
    offsets: &[Offset],
) -> Option<(usize, usize)> {
    for i in (0..lattice.n_sites).filter(|&i| lattice.get(i)) {
        let [x, y, z] = lattice.coords(i);
        for o in offsets.iter().filter(|o| o.dist < potential.rcore) {
            let j = lattice.resolve(
                x as isize + o.delta[0],
                y as isize + o.delta[1],
                z as isize + o.delta[2],
            );
            if let Some(j) = j.filter(|&j| j != i && lattice.get(j)) {
                return Some((i, j));
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{cutoff_sphere, BoundaryPolicy};
    use approx::assert_relative_eq;

    fn nearest_neighbor(eps: f64) -> Potential {
        Potential::tabulate(|_| eps, 1.0, 5, 0.0).unwrap()
    }

    #[test]
    fn test_empty_neighborhood() {
        let lat = Lattice::cubic(4, 2, BoundaryPolicy::Periodic).unwrap();
        let pot = nearest_neighbor(-4.0);
        let offsets = cutoff_sphere(2, pot.rcut);
        assert_eq!(energy_if_occupied(&lat, &pot, &offsets, [1, 1, 0], true), 0.0);
    }

    #[test]
    fn test_full_periodic_square() {
        let mut lat = Lattice::cubic(4, 2, BoundaryPolicy::Periodic).unwrap();
        lat.fill(true);
        let pot = nearest_neighbor(-4.0);
        let offsets = cutoff_sphere(2, pot.rcut);
        // Corner site still has 4 neighbors through the wrap
        assert_relative_eq!(
            energy_if_occupied(&lat, &pot, &offsets, [0, 0, 0], true),
            -16.0
        );
        // 16 sites * 2 bonds each
        assert_relative_eq!(total_energy(&lat, &pot, &offsets, true), -4.0 * 32.0);
    }

    #[test]
    fn test_full_free_square() {
        let mut lat = Lattice::cubic(4, 2, BoundaryPolicy::Free).unwrap();
        lat.fill(true);
        let pot = nearest_neighbor(-1.0);
        let offsets = cutoff_sphere(2, pot.rcut);
        assert_relative_eq!(
            energy_if_occupied(&lat, &pot, &offsets, [0, 0, 0], true),
            -2.0
        );
        assert_relative_eq!(
            energy_if_occupied(&lat, &pot, &offsets, [0, 1, 0], true),
            -3.0
        );
        assert_relative_eq!(
            energy_if_occupied(&lat, &pot, &offsets, [1, 1, 0], true),
            -4.0
        );
        // 2 * 4 * 3 bonds on an open 4x4 grid
        assert_relative_eq!(total_energy(&lat, &pot, &offsets, true), -24.0);
    }

    #[test]
    fn test_self_image_is_skipped() {
        let mut lat = Lattice::cubic(1, 3, BoundaryPolicy::Periodic).unwrap();
        lat.fill(true);
        let pot = nearest_neighbor(-4.0);
        let offsets = cutoff_sphere(3, pot.rcut);
        assert_eq!(energy_if_occupied(&lat, &pot, &offsets, [0, 0, 0], true), 0.0);
        assert_eq!(total_energy(&lat, &pot, &offsets, true), 0.0);
    }

    #[test]
    fn test_site_energy_of_empty_site() {
        let mut lat = Lattice::cubic(5, 1, BoundaryPolicy::Periodic).unwrap();
        lat.set(1, true);
        let pot = nearest_neighbor(-4.0);
        let offsets = cutoff_sphere(1, pot.rcut);
        assert_eq!(site_energy(&lat, &pot, &offsets, [0, 0, 0], true), 0.0);
        assert_eq!(
            energy_if_occupied(&lat, &pot, &offsets, [0, 0, 0], true),
            -4.0
        );
    }

    #[test]
    fn test_parallel_sum_matches() {
        let mut lat = Lattice::cubic(6, 3, BoundaryPolicy::Periodic).unwrap();
        for i in (0..lat.n_sites).step_by(3) {
            lat.set(i, true);
        }
        let pot = Potential::tabulate(|r| 1.0 / (r * r), 2.5, 50, 0.0).unwrap();
        let offsets = cutoff_sphere(3, pot.rcut);
        assert_relative_eq!(
            total_energy(&lat, &pot, &offsets, true),
            total_energy(&lat, &pot, &offsets, false),
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_diagonal_neighbor_reads_unit_entry() {
        // -4 up to r = 1, +1 beyond; the sqrt(2) diagonal truncates to 1
        let pot = Potential::new(1.5, 0.0, 4.0, vec![-4.0, -4.0, -4.0, -4.0, -4.0, 1.0, 1.0])
            .unwrap();
        let offsets = cutoff_sphere(2, pot.rcut);
        let mut lat = Lattice::cubic(5, 2, BoundaryPolicy::Free).unwrap();
        lat.set(lat.index(3, 3, 0), true);
        assert_eq!(energy_if_occupied(&lat, &pot, &offsets, [2, 2, 0], true), -4.0);

        lat.set(lat.index(2, 3, 0), true);
        assert_eq!(energy_if_occupied(&lat, &pot, &offsets, [2, 2, 0], true), -8.0);
    }

    #[test]
    fn test_diagonal_inside_core_overlaps() {
        // Truncated diagonal distance 1 is inside rcore = 1.2
        let pot = Potential::tabulate(|_| -1.0, 2.0, 5, 1.2).unwrap();
        let offsets = cutoff_sphere(2, pot.rcut);
        let mut lat = Lattice::cubic(4, 2, BoundaryPolicy::Free).unwrap();
        lat.set(lat.index(0, 0, 0), true);
        lat.set(lat.index(2, 2, 0), true);
        assert_eq!(find_core_overlap(&lat, &pot, &offsets), None);
        lat.set(lat.index(1, 1, 0), true);
        assert!(find_core_overlap(&lat, &pot, &offsets).is_some());
    }

    #[test]
    fn test_core_overlap_detection() {
        let mut lat = Lattice::cubic(5, 1, BoundaryPolicy::Free).unwrap();
        let pot = Potential::tabulate(|_| -1.0, 3.0, 10, 1.5).unwrap();
        let offsets = cutoff_sphere(1, pot.rcut);
        lat.set(0, true);
        lat.set(2, true);
        assert_eq!(find_core_overlap(&lat, &pot, &offsets), None);
        lat.set(1, true);
        assert_eq!(find_core_overlap(&lat, &pot, &offsets), Some((0, 1)));
    }
}
