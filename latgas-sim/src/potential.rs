use crate::error::{LatgasError, Result};

/// Tabulated, radially symmetric pair potential with a finite cutoff.
///
/// Values are stored on a uniform grid starting at `rcore` with spacing
/// `1 / invdr`. A lookup at distance `dist` reads entry
/// `floor((dist - rcore) * invdr)` with no interpolation.
#[derive(Debug, Clone)]
pub struct Potential {
    /// Interaction cutoff. Pairs farther apart than this do not interact.
    pub rcut: f64,
    /// Hard-core radius. Pairs closer than this are forbidden.
    pub rcore: f64,
    /// Inverse tabulation step.
    pub invdr: f64,
    /// Tabulated distances, `r[i] = rcore + i / invdr`.
    r: Vec<f64>,
    /// Tabulated potential values.
    v: Vec<f64>,
}

impl Potential {
    /// Build a potential from an explicit table.
    ///
    /// Fails unless `v` covers every index reachable from a distance in
    /// `[rcore, rcut]`.
    pub fn new(rcut: f64, rcore: f64, invdr: f64, v: Vec<f64>) -> Result<Self> {
        if !(rcut.is_finite() && rcore.is_finite() && invdr.is_finite()) {
            return Err(LatgasError::InvalidPotential(format!(
                "parameters must be finite (rcut={rcut}, rcore={rcore}, invdr={invdr})"
            )));
        }
        if rcore < 0.0 {
            return Err(LatgasError::InvalidPotential(format!(
                "rcore must be >= 0, got {rcore}"
            )));
        }
        if rcut <= rcore {
            return Err(LatgasError::InvalidPotential(format!(
                "rcut ({rcut}) must be greater than rcore ({rcore})"
            )));
        }
        if invdr <= 0.0 {
            return Err(LatgasError::InvalidPotential(format!(
                "invdr must be > 0, got {invdr}"
            )));
        }

        let required = Self::index_of(rcut, rcore, invdr) + 1;
        if v.len() < required {
            return Err(LatgasError::InvalidPotential(format!(
                "table has {} entries but [rcore, rcut] = [{rcore}, {rcut}] needs {required}",
                v.len()
            )));
        }
        if let Some(i) = v.iter().position(|x| x.is_nan()) {
            return Err(LatgasError::InvalidPotential(format!(
                "table entry {i} is NaN"
            )));
        }

        let r = (0..v.len()).map(|i| rcore + i as f64 / invdr).collect();

        Ok(Self {
            rcut,
            rcore,
            invdr,
            r,
            v,
        })
    }

    /// Sample `inter` on `npoints` evenly spaced distances from `rcore` to
    /// `rcut` inclusive.
    pub fn tabulate(
        inter: impl Fn(f64) -> f64,
        rcut: f64,
        npoints: usize,
        rcore: f64,
    ) -> Result<Self> {
        let grid = Self::grid(rcut, npoints, rcore)?;
        let v = grid.iter().map(|&r| inter(r)).collect();
        let invdr = (npoints - 1) as f64 / (rcut - rcore);
        Self::new(rcut, rcore, invdr, v)
    }

    /// The sampling grid used by [`Potential::tabulate`].
    pub fn grid(rcut: f64, npoints: usize, rcore: f64) -> Result<Vec<f64>> {
        if npoints < 2 {
            return Err(LatgasError::InvalidPotential(format!(
                "npoints must be >= 2, got {npoints}"
            )));
        }
        if !(rcut > rcore) {
            return Err(LatgasError::InvalidPotential(format!(
                "rcut ({rcut}) must be greater than rcore ({rcore})"
            )));
        }
        let step = (rcut - rcore) / (npoints - 1) as f64;
        Ok((0..npoints)
            .map(|i| {
                if i == npoints - 1 {
                    rcut
                } else {
                    rcore + i as f64 * step
                }
            })
            .collect())
    }

    #[inline]
    fn index_of(dist: f64, rcore: f64, invdr: f64) -> usize {
        ((dist - rcore) * invdr).floor() as usize
    }

    /// Pair energy at distance `dist`.
    ///
    /// Zero beyond the cutoff, `+inf` inside the core.
    #[inline]
    pub fn v(&self, dist: f64) -> f64 {
        if dist > self.rcut {
            return 0.0;
        }
        if dist < self.rcore {
            return f64::INFINITY;
        }
        let idx = Self::index_of(dist, self.rcore, self.invdr);
        debug_assert!(idx < self.v.len(), "index {idx} past table end");
        self.v[idx]
    }

    pub fn distances(&self) -> &[f64] {
        &self.r
    }

    pub fn values(&self) -> &[f64] {
        &self.v
    }
}
