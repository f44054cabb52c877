pub mod lattice;
pub mod offsets;

pub use lattice::{Boundary, BoundaryPolicy, Lattice};
pub use offsets::{cutoff_sphere, Offset};
