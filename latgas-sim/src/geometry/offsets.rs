/// Integer displacement to a lattice point inside the cutoff sphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Offset {
    pub delta: [isize; 3],
    /// Euclidean length of `delta`, truncated to an integer.
    pub dist: f64,
}

/// All non-zero offsets with `|delta|² <= rcut²`, restricted to the first
/// `dim` axes.
///
/// The sphere test uses the exact squared length; the stored `dist` is
/// truncated, so a diagonal neighbor at `sqrt(2)` reads the table at 1.
///
/// The search cube is `[-rmax, rmax]` on each active axis, `rmax = floor(rcut)`.
/// For `dim = 2` and `rcut = 1` this returns the four nearest neighbors.
pub fn cutoff_sphere(dim: usize, rcut: f64) -> Vec<Offset> {
    let rmax = rcut.floor() as isize;
    let rcutsq = rcut * rcut;
    let imax = rmax;
    let jmax = if dim > 1 { rmax } else { 0 };
    let kmax = if dim > 2 { rmax } else { 0 };

    let mut offsets = Vec::new();
    for i in -imax..=imax {
        for j in -jmax..=jmax {
            for k in -kmax..=kmax {
                if i == 0 && j == 0 && k == 0 {
                    continue;
                }
                let d2 = (i * i + j * j + k * k) as f64;
                if d2 > rcutsq {
                    continue;
                }
                offsets.push(Offset {
                    delta: [i, j, k],
                    dist: d2.sqrt().floor(),
                });
            }
        }
    }
    offsets
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nearest_neighbors() {
        assert_eq!(cutoff_sphere(1, 1.0).len(), 2);
        assert_eq!(cutoff_sphere(2, 1.0).len(), 4);
        assert_eq!(cutoff_sphere(3, 1.0).len(), 6);
        assert!(cutoff_sphere(3, 1.0).iter().all(|o| o.dist == 1.0));
    }

    #[test]
    fn test_sphere_counts() {
        // 2D, rcut = 3: lattice points with 0 < i²+j² <= 9
        assert_eq!(cutoff_sphere(2, 3.0).len(), 28);
        // 2D, rcut = sqrt(2): nearest + diagonal
        assert_eq!(cutoff_sphere(2, 2.0f64.sqrt()).len(), 8);
        // 3D, rcut = 1.5: 6 faces + 12 edges
        assert_eq!(cutoff_sphere(3, 1.5).len(), 18);
    }

    #[test]
    fn test_distances_are_truncated() {
        let offsets = cutoff_sphere(3, 3.0);
        let dist_of = |delta: [isize; 3]| {
            offsets
                .iter()
                .find(|o| o.delta == delta)
                .map(|o| o.dist)
                .unwrap()
        };
        assert_eq!(dist_of([1, 1, 0]), 1.0);
        assert_eq!(dist_of([1, 1, 1]), 1.0);
        assert_eq!(dist_of([2, 0, 0]), 2.0);
        assert_eq!(dist_of([2, 1, 0]), 2.0);
        assert_eq!(dist_of([2, 2, 0]), 2.0);
        assert_eq!(dist_of([2, 2, 1]), 3.0);
        assert!(offsets.iter().all(|o| o.dist.fract() == 0.0));
    }

    #[test]
    fn test_inactive_axes_are_zero() {
        for o in cutoff_sphere(2, 2.5) {
            assert_eq!(o.delta[2], 0);
        }
        for o in cutoff_sphere(1, 2.5) {
            assert_eq!(o.delta[1], 0);
            assert_eq!(o.delta[2], 0);
        }
    }

    #[test]
    fn test_below_one_is_empty() {
        assert!(cutoff_sphere(3, 0.9).is_empty());
    }
}
