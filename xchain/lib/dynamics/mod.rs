//! Dynamics engines bound to a built [`Coupled`][crate::hamilton::Coupled]
//! Hamiltonian.
//!
//! Callers treat an engine as an opaque capability exposing [`Solve::solve`];
//! the concrete numerical method lives behind it. Engines report each computed
//! step to an [`Observer`] as a [`Frame`], which is how the
//! [visualization adapter][crate::graphics] renders a run while it is being
//! computed.

use serde::{ Deserialize, Serialize };
use crate::error::RunResult;

pub mod tdse;
pub mod tise;

/// The equation an engine solves.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Kind {
    /// Time-dependent Schrödinger equation.
    Tdse,
    /// Time-independent Schrödinger equation.
    Tise,
}

impl Kind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Tdse => "TDSE",
            Self::Tise => "TISE",
        }
    }
}

/// Starting wavefunction for time evolution.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitialState {
    /// Fundamental excitation near the center of the chain with the lattice in
    /// its ground state.
    Fundamental,
    /// Exciton localized on the given site with the lattice in its ground
    /// state.
    Site(usize),
}

/// Expectation values attached to a [`Frame`].
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Expectations {
    pub energy: f64,
    pub norm: f64,
    /// Mean site index of the exciton.
    pub position: f64,
    /// Standard deviation of the exciton site index.
    pub spread: f64,
}

/// One computed step: a time step for TDSE, an energy level for TISE.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    /// Step counter, starting at 0.
    pub index: usize,
    /// Time (TDSE) or energy (TISE) of this step.
    pub label: f64,
    /// Exciton population on each site.
    pub populations: Vec<f64>,
    pub expect: Expectations,
}

/// Receives each [`Frame`] as soon as it has been computed.
pub trait Observer {
    fn observe(&mut self, frame: &Frame) -> RunResult<()>;
}

impl Observer for () {
    fn observe(&mut self, _frame: &Frame) -> RunResult<()> { Ok(()) }
}

/// Anything that can be solved.
pub trait Solve {
    type Output;

    fn solve(&mut self) -> RunResult<Self::Output>;
}

/// A dynamics engine.
pub trait Dynamics: Solve {
    /// The equation this engine solves.
    const KIND: Kind;

    /// Select the starting wavefunction.
    ///
    /// Engines that determine their states internally accept and ignore this.
    fn set_initial_state(&mut self, init: InitialState) -> RunResult<()>;

    /// Solve, reporting every computed step to `observer`.
    ///
    /// [`Solve::solve`] is this with a no-op observer.
    fn solve_with(&mut self, observer: &mut dyn Observer)
        -> RunResult<Self::Output>;

    /// Number of sites along the chain.
    fn n_site(&self) -> usize;

    /// Preferred range of the energy axis for level plots.
    fn plot_range(&self) -> Option<(f64, f64)> { None }
}
