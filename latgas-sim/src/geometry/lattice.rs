use rand::Rng;

use crate::error::{LatgasError, Result};

/// Boundary condition along a single axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    /// Coordinates wrap around the extent.
    Periodic,
    /// Coordinates outside the extent are absent (always empty).
    Free,
}

impl TryFrom<&str> for Boundary {
    type Error = String;
    fn try_from(s: &str) -> std::result::Result<Self, Self::Error> {
        match s.trim() {
            "periodic" => Ok(Self::Periodic),
            "free" => Ok(Self::Free),
            other => Err(format!(
                "unknown boundary '{other}', expected 'periodic' or 'free'"
            )),
        }
    }
}

/// Boundary policy for the whole lattice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryPolicy {
    Periodic,
    Free,
    /// Independent boundary per axis, ordered `[x, y, z]`.
    Mixed([Boundary; 3]),
}

impl BoundaryPolicy {
    /// Map the legacy `periodic` / `free` flag pair onto a policy.
    ///
    /// Exactly one flag must be set.
    pub fn from_flags(periodic: bool, free: bool) -> Result<Self> {
        match (periodic, free) {
            (true, false) => Ok(Self::Periodic),
            (false, true) => Ok(Self::Free),
            (true, true) => Err(LatgasError::InvalidBoundary(
                "both periodic and free are set".to_string(),
            )),
            (false, false) => Err(LatgasError::InvalidBoundary(
                "neither periodic nor free is set".to_string(),
            )),
        }
    }

    #[inline]
    pub fn axis(&self, axis: usize) -> Boundary {
        match self {
            Self::Periodic => Boundary::Periodic,
            Self::Free => Boundary::Free,
            Self::Mixed(axes) => axes[axis],
        }
    }
}

impl TryFrom<&str> for BoundaryPolicy {
    type Error = String;
    fn try_from(s: &str) -> std::result::Result<Self, Self::Error> {
        match s.trim() {
            "periodic" => Ok(Self::Periodic),
            "free" => Ok(Self::Free),
            _ if s.contains(',') => {
                let axes: Vec<Boundary> = s
                    .split(',')
                    .map(Boundary::try_from)
                    .collect::<std::result::Result<_, _>>()?;
                let axes: [Boundary; 3] = axes.try_into().map_err(|v: Vec<Boundary>| {
                    format!("mixed boundary needs 3 axes, got {} in '{s}'", v.len())
                })?;
                Ok(Self::Mixed(axes))
            }
            _ => Err(format!(
                "unknown boundary '{s}', expected 'periodic', 'free', or 'x,y,z' axis list"
            )),
        }
    }
}

/// Occupation grid of a 1D, 2D, or 3D lattice gas.
///
/// Sites are stored flat with `x` fastest: `index = x + y*Lx + z*Lx*Ly`.
/// Axes beyond `dim` have extent 1.
#[derive(Debug, Clone)]
pub struct Lattice {
    /// Extent along each axis, `[Lx, Ly, Lz]`.
    pub shape: [usize; 3],
    /// Flat-index strides, `[1, Lx, Lx*Ly]`.
    pub strides: [usize; 3],
    /// Number of active dimensions.
    pub dim: usize,
    /// Total number of sites.
    pub n_sites: usize,
    pub boundary: BoundaryPolicy,
    sites: Vec<bool>,
}

impl Lattice {
    /// Create an empty lattice.
    pub fn new(shape: [usize; 3], dim: usize, boundary: BoundaryPolicy) -> Result<Self> {
        if !(1..=3).contains(&dim) {
            return Err(LatgasError::InvalidLattice(format!(
                "dim must be 1, 2 or 3, got {dim}"
            )));
        }
        if let Some(axis) = shape.iter().position(|&l| l == 0) {
            return Err(LatgasError::InvalidLattice(format!(
                "extent along axis {axis} is zero"
            )));
        }
        if let Some(axis) = (dim..3).find(|&d| shape[d] != 1) {
            return Err(LatgasError::InvalidLattice(format!(
                "axis {axis} is inactive for dim = {dim} but has extent {}",
                shape[axis]
            )));
        }

        let strides = [1, shape[0], shape[0] * shape[1]];
        let n_sites = shape.iter().product();

        Ok(Self {
            shape,
            strides,
            dim,
            n_sites,
            boundary,
            sites: vec![false; n_sites],
        })
    }

    /// Square or cubic lattice of side `l` in `dim` dimensions.
    pub fn cubic(l: usize, dim: usize, boundary: BoundaryPolicy) -> Result<Self> {
        let mut shape = [1usize; 3];
        for s in shape.iter_mut().take(dim.min(3)) {
            *s = l;
        }
        Self::new(shape, dim, boundary)
    }

    /// Flat index of an in-range coordinate.
    #[inline]
    pub fn index(&self, x: usize, y: usize, z: usize) -> usize {
        assert!(
            x < self.shape[0] && y < self.shape[1] && z < self.shape[2],
            "site ({x}, {y}, {z}) outside lattice {:?}",
            self.shape
        );
        x + y * self.strides[1] + z * self.strides[2]
    }

    /// Coordinates of a flat index.
    #[inline]
    pub fn coords(&self, idx: usize) -> [usize; 3] {
        [
            idx % self.shape[0],
            (idx / self.strides[1]) % self.shape[1],
            idx / self.strides[2],
        ]
    }

    /// Map a possibly out-of-range coordinate onto a site.
    ///
    /// Periodic axes wrap; free axes return `None` when out of range.
    #[inline]
    pub fn resolve(&self, x: isize, y: isize, z: isize) -> Option<usize> {
        let mut flat = 0usize;
        for (axis, c) in [x, y, z].into_iter().enumerate() {
            let extent = self.shape[axis] as isize;
            let c = match self.boundary.axis(axis) {
                Boundary::Periodic => c.rem_euclid(extent),
                Boundary::Free if (0..extent).contains(&c) => c,
                Boundary::Free => return None,
            };
            flat += c as usize * self.strides[axis];
        }
        Some(flat)
    }

    /// Occupation at a possibly out-of-range coordinate. Absent sites are empty.
    #[inline]
    pub fn status(&self, x: isize, y: isize, z: isize) -> bool {
        self.resolve(x, y, z).is_some_and(|i| self.sites[i])
    }

    #[inline]
    pub fn get(&self, idx: usize) -> bool {
        self.sites[idx]
    }

    #[inline]
    pub fn set(&mut self, idx: usize, occupied: bool) {
        self.sites[idx] = occupied;
    }

    /// Flip the occupation of site `idx` and return the new value.
    #[inline]
    pub fn toggle(&mut self, idx: usize) -> bool {
        let s = &mut self.sites[idx];
        *s = !*s;
        *s
    }

    pub fn sites(&self) -> &[bool] {
        &self.sites
    }

    pub fn fill(&mut self, occupied: bool) {
        self.sites.fill(occupied);
    }

    pub fn clear(&mut self) {
        self.fill(false);
    }

    /// Occupy each site independently with probability `p`.
    pub fn random_fill<R: Rng>(&mut self, p: f64, rng: &mut R) {
        for s in self.sites.iter_mut() {
            *s = rng.gen::<f64>() < p;
        }
    }

    pub fn occupied_count(&self) -> usize {
        self.sites.iter().filter(|&&s| s).count()
    }
}
