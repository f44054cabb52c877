use std::sync::atomic::AtomicBool;

use indicatif::{ProgressBar, ProgressStyle};
use latgas_sim::{
    run_sweep_loop, BoundaryPolicy, Lattice, LatgasError, Potential, SimConfig, SweepMode, System,
};
use numpy::ndarray::Array3;
use numpy::{IntoPyArray, PyArray3};
use pyo3::exceptions::{PyIndexError, PyKeyboardInterrupt, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyDict;

fn to_py_err(e: LatgasError) -> PyErr {
    match e {
        LatgasError::Interrupted => PyKeyboardInterrupt::new_err(e.to_string()),
        _ => PyValueError::new_err(e.to_string()),
    }
}

#[pyclass]
struct LatticeGas {
    system: System,
}

impl LatticeGas {
    fn check_site(&self, x: usize, y: usize, z: usize) -> PyResult<()> {
        let shape = self.system.lattice().shape;
        if x >= shape[0] || y >= shape[1] || z >= shape[2] {
            return Err(PyIndexError::new_err(format!(
                "site ({x}, {y}, {z}) outside lattice {shape:?}"
            )));
        }
        Ok(())
    }
}

#[pymethods]
impl LatticeGas {
    /// Create a lattice gas on an empty lattice.
    ///
    /// Arguments:
    ///   shape: lattice extents [Lx], [Lx, Ly] or [Lx, Ly, Lz]
    ///   inter: callable r -> V(r), sampled on npoints distances in [rcore, rcut]
    ///   rcut: interaction cutoff
    ///   npoints: number of table entries (>= 2)
    ///   dim: dimensionality (default len(shape))
    ///   boundary: "periodic", "free", or per-axis "periodic,free,periodic"
    ///   rcore: hard-core radius (default 0)
    ///   T, mu: temperature and chemical potential
    ///   seed: one-shot seed for the first sweep (default: OS entropy)
    #[new]
    #[pyo3(signature = (shape, inter, rcut, npoints, dim=None, boundary="periodic", rcore=0.0, T=1.0, mu=0.0, seed=None))]
    #[allow(clippy::too_many_arguments, non_snake_case)]
    fn new(
        shape: Vec<usize>,
        inter: &Bound<'_, PyAny>,
        rcut: f64,
        npoints: usize,
        dim: Option<usize>,
        boundary: &str,
        rcore: f64,
        T: f64,
        mu: f64,
        seed: Option<u64>,
    ) -> PyResult<Self> {
        if shape.is_empty() || shape.len() > 3 {
            return Err(PyValueError::new_err(format!(
                "shape must have 1 to 3 entries, got {}",
                shape.len()
            )));
        }
        let dim = dim.unwrap_or(shape.len());
        let mut extents = [1usize; 3];
        extents[..shape.len()].copy_from_slice(&shape);

        let boundary = BoundaryPolicy::try_from(boundary).map_err(PyValueError::new_err)?;
        let lattice = Lattice::new(extents, dim, boundary).map_err(to_py_err)?;

        let grid = Potential::grid(rcut, npoints, rcore).map_err(to_py_err)?;
        let values = grid
            .iter()
            .map(|&r| inter.call1((r,))?.extract::<f64>())
            .collect::<PyResult<Vec<f64>>>()?;
        let invdr = (npoints - 1) as f64 / (rcut - rcore);
        let potential = Potential::new(rcut, rcore, invdr, values).map_err(to_py_err)?;

        let system = System::new(potential, lattice, T, mu, seed).map_err(to_py_err)?;
        Ok(Self { system })
    }

    /// Attempt Lx * Ly * Lz flips at random sites. Returns the accepted count.
    fn whole_lattice(&mut self) -> usize {
        self.system.whole_lattice_sweep()
    }

    /// Run `nsteps` sweeps and return the averages (E, N) over them.
    fn run(&mut self, nsteps: usize) -> (f64, f64) {
        let avg = self.system.run(nsteps);
        (avg.energy, avg.population)
    }

    /// Run the full sampling loop with a progress bar.
    ///
    /// Arguments:
    ///   n_sweeps: total number of sweeps
    ///   sweep_mode: "metropolis" or "gibbs"
    ///   warmup_sweeps: sweeps to discard before averaging (default 0)
    ///   sequential: sum the cutoff sphere on one thread (default True)
    ///
    /// Returns: dict with keys "energy", "population", "final_energy",
    ///   "final_population", "n_measurements".
    #[pyo3(signature = (n_sweeps, sweep_mode="metropolis", warmup_sweeps=0, sequential=true))]
    fn sample<'py>(
        &mut self,
        py: Python<'py>,
        n_sweeps: usize,
        sweep_mode: &str,
        warmup_sweeps: usize,
        sequential: bool,
    ) -> PyResult<Bound<'py, PyDict>> {
        let config = SimConfig {
            n_sweeps,
            warmup_sweeps,
            sweep_mode: SweepMode::try_from(sweep_mode).map_err(PyValueError::new_err)?,
            sequential,
        };

        let pb = ProgressBar::new(n_sweeps as u64);
        pb.set_style(
            ProgressStyle::with_template(
                "{msg} [{bar:40}] {pos}/{len} [{elapsed_precise} < {eta_precise}, {per_sec}]",
            )
            .map_err(|e| PyValueError::new_err(e.to_string()))?
            .progress_chars("=> "),
        );
        pb.set_message("sweeps");

        let interrupted = AtomicBool::new(false);
        let result = run_sweep_loop(&mut self.system, &config, &interrupted, &|| pb.inc(1))
            .map_err(to_py_err)?;
        pb.finish();

        let dict = PyDict::new(py);
        dict.set_item("energy", result.energy)?;
        dict.set_item("population", result.population)?;
        dict.set_item("final_energy", result.final_energy)?;
        dict.set_item("final_population", result.final_population)?;
        dict.set_item("n_measurements", result.n_measurements)?;
        Ok(dict)
    }

    /// Fill the lattice randomly with occupation probability p.
    #[pyo3(signature = (p=0.5))]
    fn random(&mut self, p: f64) -> PyResult<()> {
        self.system.random_fill(p).map_err(to_py_err)
    }

    /// Attempt a Metropolis flip at (x, y, z). Returns whether it was accepted.
    fn flip(&mut self, x: usize, y: usize, z: usize) -> PyResult<bool> {
        self.check_site(x, y, z)?;
        Ok(self.system.flip(x, y, z))
    }

    fn energy(&self, x: usize, y: usize, z: usize) -> PyResult<f64> {
        self.check_site(x, y, z)?;
        Ok(self.system.site_energy(x, y, z))
    }

    fn energy_if_occupied(&self, x: usize, y: usize, z: usize) -> PyResult<f64> {
        self.check_site(x, y, z)?;
        Ok(self.system.energy_if_occupied(x, y, z))
    }

    fn tot_energy(&self) -> f64 {
        self.system.total_energy()
    }

    fn tot_population(&self) -> usize {
        self.system.total_population()
    }

    /// Arm a one-shot seed for the next sweep.
    fn set_seed(&mut self, seed: u64) {
        self.system.set_seed(seed);
    }

    /// Return occupations as a bool array of shape (Lz, Ly, Lx).
    fn get_sites<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyArray3<bool>>> {
        let lattice = self.system.lattice();
        let [lx, ly, lz] = lattice.shape;
        let sites = Array3::from_shape_vec((lz, ly, lx), lattice.sites().to_vec())
            .map_err(|e| PyValueError::new_err(e.to_string()))?;
        Ok(sites.into_pyarray(py))
    }

    #[getter(T)]
    fn temperature(&self) -> f64 {
        self.system.temperature()
    }

    #[setter(T)]
    fn set_temperature(&mut self, t: f64) -> PyResult<()> {
        self.system.set_temperature(t).map_err(to_py_err)
    }

    #[getter]
    fn mu(&self) -> f64 {
        self.system.chemical_potential()
    }

    #[setter]
    fn set_mu(&mut self, mu: f64) {
        self.system.set_chemical_potential(mu);
    }

    #[getter(E)]
    fn total_energy_accumulator(&self) -> f64 {
        self.system.energy()
    }

    #[getter(N)]
    fn population_accumulator(&self) -> usize {
        self.system.population()
    }
}

#[pymodule]
fn _core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<LatticeGas>()?;
    Ok(())
}
