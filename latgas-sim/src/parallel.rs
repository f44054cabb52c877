use rayon::prelude::*;

use crate::geometry::Offset;

/// Sum a per-offset term over the cutoff sphere, optionally in parallel.
///
/// When `sequential` is true the sum runs on the current thread (no rayon
/// overhead, best for short-ranged potentials where the sphere holds only a
/// handful of offsets). Otherwise it is a rayon reduction; `term` only reads
/// shared state, so offsets are independent.
pub fn sum_over_offsets(
    offsets: &[Offset],
    sequential: bool,
    term: impl Fn(&Offset) -> f64 + Send + Sync,
) -> f64 {
    if sequential {
        offsets.iter().map(term).sum()
    } else {
        offsets.par_iter().map(term).sum()
    }
}
