pub mod results;
mod stats;

pub use results::{RunAverages, SweepResult};
pub use stats::Statistics;
