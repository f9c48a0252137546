//! Run configuration read from YAML.
//!
//! A [`RunConfig`] holds everything a hardcoded driver would otherwise spell
//! out in code: the chain, the basis, the engine with its numerical parameters
//! and the rendering options. For example:
//!
//! ```yaml
//! model:
//!   n_site: 15
//!   alpha: 0.1
//!   beta: -0.01
//!   nu: 0.001
//!   omg: 0.0014142135623730951
//!   sig: 0.001
//! basis:
//!   n_basis: [2, 4]
//! dynamics:
//!   kind: tdse
//!   initial: fundamental
//!   spec:
//!     num_steps: 25
//!     step_size: 10.0
//!     sub_steps: 10
//!     solver: sm
//! plot:
//!   frame_rate: 1
//! ```

use std::{ fs, path::{ Path, PathBuf } };
use serde::{ Deserialize, Serialize };
use crate::{
    artifacts::RunArtifacts,
    basis::BasisSpec,
    driver::{ Driver, Simulation },
    dynamics::{
        InitialState,
        Kind,
        tdse::{ Tdse, TdseSpec },
        tise::{ Tise, TiseSpec },
    },
    error::{ ConfigError, RunResult },
    graphics::{ PlotConfig, Rendered, Visual },
    hamilton::Coupled,
    model::ChainModel,
    store::{ Persistence, Record },
};

/// Engine selection and parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DynamicsConfig {
    Tdse {
        spec: TdseSpec,
        /// Starting wavefunction; the run fails without one.
        #[serde(default)]
        initial: Option<InitialState>,
    },
    Tise {
        spec: TiseSpec,
    },
}

impl DynamicsConfig {
    pub fn kind(&self) -> Kind {
        match self {
            Self::Tdse { .. } => Kind::Tdse,
            Self::Tise { .. } => Kind::Tise,
        }
    }
}

fn def_save() -> bool { true }

/// A complete run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    pub model: ChainModel,
    pub basis: BasisSpec,
    pub dynamics: DynamicsConfig,
    #[serde(default)]
    pub plot: PlotConfig,
    /// Save results to `<base>.pic`.
    #[serde(default = "def_save")]
    pub save: bool,
    /// Reference data to load.
    #[serde(default)]
    pub load_file: Option<PathBuf>,
    /// How to compare against the reference data.
    #[serde(default)]
    pub compare: Option<String>,
}

impl RunConfig {
    /// Read and validate a run configuration.
    pub fn load<P>(path: P) -> RunResult<Self>
    where P: AsRef<Path>
    {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        let config = Self::from_yaml(&text)?;
        log::debug!("loaded run configuration from {}", path.display());
        Ok(config)
    }

    /// Parse and validate a run configuration.
    pub fn from_yaml(text: &str) -> RunResult<Self> {
        let config: Self
            = serde_yaml::from_str(text).map_err(ConfigError::from)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> RunResult<()> {
        self.model.validate()?;
        self.basis.validate()?;
        match &self.dynamics {
            DynamicsConfig::Tdse { spec, .. } => spec.validate()?,
            DynamicsConfig::Tise { spec } => spec.validate()?,
        }
        self.plot.validate(self.dynamics.kind())?;
        self.persistence(None).validate()?;
        Ok(())
    }

    fn persistence(&self, artifacts: Option<&RunArtifacts>) -> Persistence {
        Persistence {
            save_file: artifacts.filter(|_| self.save).map(|a| a.save_file()),
            load_file: self.load_file.clone(),
            compare: self.compare.clone(),
        }
    }

    fn hamiltonian(&self) -> RunResult<Coupled> {
        let mut hamilton = Coupled::new(self.model.clone())?;
        hamilton.get_tt(self.basis.clone())?;
        Ok(hamilton)
    }

    /// Run the configured pipeline through `driver`.
    pub fn run(&self, driver: &Driver) -> RunResult<Record> {
        match &self.dynamics {
            DynamicsConfig::Tdse { spec, initial } => {
                let sim = TdseRun { config: self, spec, initial: *initial };
                driver.run(&sim).map(Record::Tdse)
            },
            DynamicsConfig::Tise { spec } => {
                let sim = TiseRun { config: self, spec };
                driver.run(&sim).map(Record::Tise)
            },
        }
    }
}

struct TdseRun<'a> {
    config: &'a RunConfig,
    spec: &'a TdseSpec,
    initial: Option<InitialState>,
}

impl<'a> Simulation for TdseRun<'a> {
    type Hamiltonian = Coupled;
    type Dynamics = Tdse;
    type Visual = Rendered<Tdse>;

    fn hamiltonian(&self) -> RunResult<Coupled> { self.config.hamiltonian() }

    fn dynamics(&self, hamilton: Coupled, artifacts: &RunArtifacts)
        -> RunResult<Tdse>
    {
        Tdse::new(
            hamilton,
            self.spec.clone(),
            self.config.persistence(Some(artifacts)),
        )
    }

    fn initial_state(&self) -> Option<InitialState> { self.initial }

    fn visual(&self, dynamics: Tdse, artifacts: &RunArtifacts)
        -> RunResult<Rendered<Tdse>>
    {
        Visual::new(dynamics, self.config.plot.clone().for_run(artifacts))
            .create()
    }
}

struct TiseRun<'a> {
    config: &'a RunConfig,
    spec: &'a TiseSpec,
}

impl<'a> Simulation for TiseRun<'a> {
    type Hamiltonian = Coupled;
    type Dynamics = Tise;
    type Visual = Rendered<Tise>;

    fn hamiltonian(&self) -> RunResult<Coupled> { self.config.hamiltonian() }

    fn dynamics(&self, hamilton: Coupled, artifacts: &RunArtifacts)
        -> RunResult<Tise>
    {
        Tise::new(
            hamilton,
            self.spec.clone(),
            self.config.persistence(Some(artifacts)),
        )
    }

    fn visual(&self, dynamics: Tise, artifacts: &RunArtifacts)
        -> RunResult<Rendered<Tise>>
    {
        Visual::new(dynamics, self.config.plot.clone().for_run(artifacts))
            .create()
    }
}
