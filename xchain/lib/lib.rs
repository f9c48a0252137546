#![allow(dead_code)]

//! Set up and launch simulation runs for a coupled exciton-phonon chain.
//!
//! A run is a linear pipeline:
//! - a [`ChainModel`][model::ChainModel] describes the chain (site count,
//!   topology, coupling constants);
//! - a [`Coupled`][hamilton::Coupled] Hamiltonian is built from it for a given
//!   [`BasisSpec`][basis::BasisSpec];
//! - a dynamics engine ([`Tdse`][dynamics::tdse::Tdse] or
//!   [`Tise`][dynamics::tise::Tise]) is bound to the Hamiltonian;
//! - the [`Driver`][driver::Driver] runs the engine, either headless or
//!   through a [`Visual`][graphics::Visual] adapter that renders each computed
//!   step.
//!
//! Output files for a run are namespaced by the name of the script that
//! launched it; see [`artifacts`].
//!
//! See [`docs`] for the model Hamiltonian.

pub mod artifacts;
pub mod basis;
pub mod config;
pub mod driver;
pub mod dynamics;
pub mod error;
pub mod graphics;
pub mod hamilton;
pub mod logging;
pub mod model;
pub mod store;
pub mod utils;

pub mod docs;

pub use artifacts::RunArtifacts;
pub use driver::{ Driver, Mode, Simulation };
pub use error::{ RunError, RunResult };

pub type Arr1<S> = ndarray::ArrayBase<S, ndarray::Ix1>;
pub type Arr2<S> = ndarray::ArrayBase<S, ndarray::Ix2>;
