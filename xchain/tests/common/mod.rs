//! Collaborators shared by the driver tests.
//!
//! The mocks record every call made on them into a shared [`Journal`] so that
//! tests can check which steps a run performs, and in what order. The real
//! simulations mirror the two example drivers with the real Hamiltonian and
//! engines.

#![allow(dead_code)]

use std::{ cell::RefCell, rc::Rc };
use xchain::{
    RunArtifacts,
    RunResult,
    Simulation,
    basis::BasisSpec,
    dynamics::{
        Dynamics,
        Frame,
        InitialState,
        Kind,
        Observer,
        Solve,
        tdse::{ Normalize, Tdse, TdseMethod, TdseSpec },
        tise::{ MicroEigen, Tise, TiseMethod, TiseSpec },
    },
    error::{ ModelError, SolverError },
    graphics::{ PlotConfig, Rendered, Visual },
    hamilton::Coupled,
    model::ChainModel,
    store::Persistence,
};

// =================================================================================================
// Mocks
// =================================================================================================

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Hamiltonian,
    Dynamics,
    InitialState(InitialState),
    /// Visual adapter constructed; whether the run's log file existed then.
    Visual { log_attached: bool },
    /// Solve through the visual adapter.
    Rendered,
    Solve,
}

pub type Journal = Rc<RefCell<Vec<Event>>>;

pub fn journal() -> Journal { Rc::new(RefCell::new(Vec::new())) }

/// Engine recording its calls; time-dependent if `TDSE`.
pub struct MockEngine<const TDSE: bool> {
    journal: Journal,
    initialized: bool,
}

impl<const TDSE: bool> Dynamics for MockEngine<TDSE> {
    const KIND: Kind = if TDSE { Kind::Tdse } else { Kind::Tise };

    fn set_initial_state(&mut self, init: InitialState) -> RunResult<()> {
        self.journal.borrow_mut().push(Event::InitialState(init));
        self.initialized = true;
        Ok(())
    }

    fn solve_with(&mut self, _observer: &mut dyn Observer) -> RunResult<usize> {
        if TDSE && !self.initialized {
            return Err(SolverError::NoInitialState.into());
        }
        self.journal.borrow_mut().push(Event::Solve);
        Ok(self.journal.borrow().len())
    }

    fn n_site(&self) -> usize { 1 }
}

impl<const TDSE: bool> Solve for MockEngine<TDSE> {
    type Output = usize;

    fn solve(&mut self) -> RunResult<usize> { self.solve_with(&mut ()) }
}

pub struct MockVisual<const TDSE: bool>(MockEngine<TDSE>);

impl<const TDSE: bool> Solve for MockVisual<TDSE> {
    type Output = usize;

    fn solve(&mut self) -> RunResult<usize> {
        self.0.journal.borrow_mut().push(Event::Rendered);
        self.0.solve_with(&mut ())
    }
}

/// Simulation recording its calls.
pub struct MockSim<const TDSE: bool> {
    pub journal: Journal,
    pub initial: Option<InitialState>,
    pub fail_hamiltonian: bool,
}

impl<const TDSE: bool> MockSim<TDSE> {
    pub fn new(initial: Option<InitialState>) -> Self {
        Self { journal: journal(), initial, fail_hamiltonian: false }
    }

    pub fn events(&self) -> Vec<Event> { self.journal.borrow().clone() }

    pub fn count(&self, event: Event) -> usize {
        self.journal.borrow().iter().filter(|e| **e == event).count()
    }
}

impl<const TDSE: bool> Simulation for MockSim<TDSE> {
    type Hamiltonian = ();
    type Dynamics = MockEngine<TDSE>;
    type Visual = MockVisual<TDSE>;

    fn hamiltonian(&self) -> RunResult<()> {
        self.journal.borrow_mut().push(Event::Hamiltonian);
        if self.fail_hamiltonian {
            return Err(ModelError::NoSites.into());
        }
        Ok(())
    }

    fn dynamics(&self, _hamilton: (), _artifacts: &RunArtifacts)
        -> RunResult<MockEngine<TDSE>>
    {
        self.journal.borrow_mut().push(Event::Dynamics);
        Ok(MockEngine { journal: self.journal.clone(), initialized: false })
    }

    fn initial_state(&self) -> Option<InitialState> { self.initial }

    fn visual(&self, dynamics: MockEngine<TDSE>, artifacts: &RunArtifacts)
        -> RunResult<MockVisual<TDSE>>
    {
        let log_attached = artifacts.log_file().is_file();
        self.journal.borrow_mut().push(Event::Visual { log_attached });
        Ok(MockVisual(dynamics))
    }
}

/// Observer counting frames.
#[derive(Default)]
pub struct FrameCount(pub usize);

impl Observer for FrameCount {
    fn observe(&mut self, _frame: &Frame) -> RunResult<()> {
        self.0 += 1;
        Ok(())
    }
}

// =================================================================================================
// Real simulations
// =================================================================================================

fn model(n_site: usize, periodic: bool, sig: f64) -> ChainModel {
    ChainModel {
        n_site,
        periodic,
        homogen: true,
        alpha: 1e-1.into(),
        beta: (-1e-2).into(),
        eta: 0.0,
        mass: 1.0,
        nu: 1e-3.into(),
        omg: (1e-3 * 2.0_f64.sqrt()).into(),
        chi: 0.0.into(),
        rho: 0.0.into(),
        sig: sig.into(),
        tau: 0.0.into(),
    }
}

fn plot() -> PlotConfig {
    PlotConfig { figure_size: (210, 90), ..PlotConfig::default() }
}

/// Fundamental excitation on an open chain.
pub struct ChainTdse {
    pub n_site: usize,
    pub num_steps: usize,
}

impl Simulation for ChainTdse {
    type Hamiltonian = Coupled;
    type Dynamics = Tdse;
    type Visual = Rendered<Tdse>;

    fn hamiltonian(&self) -> RunResult<Coupled> {
        let mut hamilton = Coupled::new(model(self.n_site, false, 1e-3))?;
        hamilton.get_tt(BasisSpec::new(vec![2, 4], false)?)?;
        Ok(hamilton)
    }

    fn dynamics(&self, hamilton: Coupled, artifacts: &RunArtifacts)
        -> RunResult<Tdse>
    {
        let step_size = 0.01 / hamilton.sig()[0];
        let spec = TdseSpec {
            num_steps: self.num_steps,
            step_size,
            sub_steps: 10,
            solver: TdseMethod::Sm,
            normalize: Normalize::Off,
            max_rank: 12,
            repeats: 15,
            threshold: 1e-12,
        };
        Tdse::new(hamilton, spec, Persistence::from_artifacts(artifacts))
    }

    fn initial_state(&self) -> Option<InitialState> {
        Some(InitialState::Fundamental)
    }

    fn visual(&self, dynamics: Tdse, artifacts: &RunArtifacts)
        -> RunResult<Rendered<Tdse>>
    {
        Visual::new(dynamics, plot().for_run(artifacts)).create()
    }
}

/// Lowest levels of a five-site ring.
pub struct RingTise;

impl Simulation for RingTise {
    type Hamiltonian = Coupled;
    type Dynamics = Tise;
    type Visual = Rendered<Tise>;

    fn hamiltonian(&self) -> RunResult<Coupled> {
        let mut hamilton = Coupled::new(model(5, true, 2e-4))?;
        hamilton.get_tt(BasisSpec::new(vec![2, 4], false)?)?;
        Ok(hamilton)
    }

    fn dynamics(&self, hamilton: Coupled, artifacts: &RunArtifacts)
        -> RunResult<Tise>
    {
        let spec = TiseSpec {
            n_levels: 4,
            solver: TiseMethod::Als,
            eigen: MicroEigen::Eigs,
            ranks: 20,
            repeats: 20,
            conv_eps: 1e-8,
            e_est: 0.070,
            e_min: 0.070,
            e_max: 0.100,
        };
        Tise::new(hamilton, spec, Persistence::from_artifacts(artifacts))
    }

    fn visual(&self, dynamics: Tise, artifacts: &RunArtifacts)
        -> RunResult<Rendered<Tise>>
    {
        Visual::new(dynamics, plot().for_run(artifacts)).create()
    }
}
