//! Orchestration of a single run.
//!
//! A run builds a Hamiltonian, binds a dynamics engine to it, selects the
//! initial state (time-dependent runs only) and solves, either headless
//! ([`Mode::Batch`]) or through a visualization adapter with the console
//! teed into `<base>.log` ([`Mode::Interactive`]). The steps themselves are
//! supplied by a [`Simulation`]; the [`Driver`] only fixes their order and
//! which of them happen in each mode.
//!
//! ```ignore
//! use xchain::{ Driver, Mode };
//!
//! let driver = Driver::from_script(file!(), Mode::Interactive)?;
//! driver.run(&MyChain)?; // MyChain: Simulation
//! ```

use std::path::Path;
use crate::{
    artifacts::RunArtifacts,
    dynamics::{ Dynamics, InitialState, Kind, Solve },
    error::{ RunError, RunResult },
    logging::{ self, LogGuard },
};

/// Whether a run is rendered.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    /// Solve without visualization; no log, image, or movie files are written.
    Batch,
    /// Solve through a visualization adapter, logging to `<base>.log`.
    #[default]
    Interactive,
}

/// The steps of a run.
pub trait Simulation {
    type Hamiltonian;
    type Dynamics: Dynamics;
    type Visual: Solve<Output = <Self::Dynamics as Solve>::Output>;

    /// Configure the model and build its operator representation.
    fn hamiltonian(&self) -> RunResult<Self::Hamiltonian>;

    /// Bind a dynamics engine to the Hamiltonian.
    fn dynamics(&self, hamilton: Self::Hamiltonian, artifacts: &RunArtifacts)
        -> RunResult<Self::Dynamics>;

    /// Starting wavefunction; required for time-dependent runs.
    fn initial_state(&self) -> Option<InitialState> { None }

    /// Wrap the dynamics engine in a visualization adapter.
    fn visual(&self, dynamics: Self::Dynamics, artifacts: &RunArtifacts)
        -> RunResult<Self::Visual>;
}

/// Runs a [`Simulation`] in a given [`Mode`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Driver {
    mode: Mode,
    artifacts: RunArtifacts,
}

impl Driver {
    pub fn new(artifacts: RunArtifacts, mode: Mode) -> Self {
        Self { mode, artifacts }
    }

    /// Name all outputs after `script`; see [`RunArtifacts::from_script`].
    pub fn from_script<P>(script: P, mode: Mode) -> RunResult<Self>
    where P: AsRef<Path>
    {
        Ok(Self::new(RunArtifacts::from_script(script)?, mode))
    }

    pub fn mode(&self) -> Mode { self.mode }

    pub fn artifacts(&self) -> &RunArtifacts { &self.artifacts }

    /// Run a simulation to completion, returning the engine's output.
    pub fn run<S>(&self, sim: &S)
        -> RunResult<<S::Dynamics as Solve>::Output>
    where S: Simulation
    {
        let _log = match self.mode {
            Mode::Interactive
                => Some(LogGuard::acquire(self.artifacts.log_file())?),
            Mode::Batch => { logging::init(); None },
        };
        log::info!(
            "run '{}': {} {}",
            self.artifacts.base(),
            S::Dynamics::KIND.name(),
            match self.mode {
                Mode::Batch => "in batch mode",
                Mode::Interactive => "with visualization",
            },
        );

        let hamilton = sim.hamiltonian()?;
        let mut dynamics = sim.dynamics(hamilton, &self.artifacts)?;
        if S::Dynamics::KIND == Kind::Tdse {
            let init
                = sim.initial_state().ok_or(RunError::MissingInitialState)?;
            dynamics.set_initial_state(init)?;
        }

        let output = match self.mode {
            Mode::Batch => dynamics.solve()?,
            Mode::Interactive => {
                let mut visual = sim.visual(dynamics, &self.artifacts)?;
                visual.solve()?
            },
        };
        log::info!("run '{}' done", self.artifacts.base());
        Ok(output)
    }
}
