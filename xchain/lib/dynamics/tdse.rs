//! Time evolution of the chain under the time-dependent Schrödinger equation
//! (TDSE).
//!
//! A run is divided into `num_steps` main steps of size `step_size`, each made
//! of `sub_steps` sub steps. A [`Frame`] is reported at t = 0 and after every
//! main step. With the reference operator representation the exciton is
//! propagated exactly in the eigenbasis of the single-exciton block while the
//! lattice stays in its ground state, so the method identifier in
//! [`TdseSpec::solver`] is recorded but does not change the result.

use std::{ fmt, str::FromStr };
use ndarray as nd;
use num_complex::Complex64 as C64;
use serde::{ Deserialize, Serialize };
use crate::{
    dynamics::{ Dynamics, Expectations, Frame, InitialState, Kind, Observer, Solve },
    error::{ RunResult, SolverError },
    hamilton::Coupled,
    store::{ Persistence, Record },
    utils::{ norm_sq, populations, position_moments, renormalize },
};

/// Time-stepping scheme.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TdseMethod {
    /// Lie-Trotter splitting.
    Lt,
    /// Strang-Marchuk splitting.
    Sm,
    /// Yoshida splitting.
    Yo,
    /// Symmetrized Euler.
    Se,
    /// Implicit Euler.
    Ie,
    /// Trapezoidal rule.
    Tr,
    /// Quasi-exact propagation.
    Qe,
}

impl TdseMethod {
    pub fn name(self) -> &'static str {
        match self {
            Self::Lt => "lt",
            Self::Sm => "sm",
            Self::Yo => "yo",
            Self::Se => "se",
            Self::Ie => "ie",
            Self::Tr => "tr",
            Self::Qe => "qe",
        }
    }

    /// Return `true` for schemes that solve a linear system per step, which is
    /// what `repeats` (sweeps) applies to.
    pub fn is_implicit(self) -> bool { matches!(self, Self::Ie | Self::Tr) }
}

impl fmt::Display for TdseMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TdseMethod {
    type Err = SolverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lt" => Ok(Self::Lt),
            "sm" => Ok(Self::Sm),
            "yo" => Ok(Self::Yo),
            "se" => Ok(Self::Se),
            "ie" => Ok(Self::Ie),
            "tr" => Ok(Self::Tr),
            "qe" => Ok(Self::Qe),
            _ => Err(SolverError::UnknownMethod("TDSE", s.to_string())),
        }
    }
}

/// Whether and how to normalize the solution; given as `0` or `2`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Normalize {
    /// `0`: leave the norm alone.
    #[default]
    Off,
    /// `2`: rescale to unit 2-norm after every sub step.
    L2,
}

impl TryFrom<u8> for Normalize {
    type Error = SolverError;

    fn try_from(mode: u8) -> Result<Self, Self::Error> {
        match mode {
            0 => Ok(Self::Off),
            2 => Ok(Self::L2),
            _ => Err(SolverError::BadNormalize(mode)),
        }
    }
}

impl From<Normalize> for u8 {
    fn from(mode: Normalize) -> Self {
        match mode {
            Normalize::Off => 0,
            Normalize::L2 => 2,
        }
    }
}

fn def_sub_steps() -> usize { 1 }

fn def_max_rank() -> usize { 8 }

fn def_repeats() -> usize { 1 }

fn def_threshold() -> f64 { 1e-12 }

/// Numerical parameters of a TDSE run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TdseSpec {
    /// Number of main time steps.
    pub num_steps: usize,
    /// Size of main time steps.
    pub step_size: f64,
    /// Number of sub steps per main step.
    #[serde(default = "def_sub_steps")]
    pub sub_steps: usize,
    pub solver: TdseMethod,
    #[serde(default)]
    pub normalize: Normalize,
    /// Maximum rank of the solution.
    #[serde(default = "def_max_rank")]
    pub max_rank: usize,
    /// Number of sweeps (implicit schemes only).
    #[serde(default = "def_repeats")]
    pub repeats: usize,
    /// Threshold in the ALS decomposition.
    #[serde(default = "def_threshold")]
    pub threshold: f64,
}

impl TdseSpec {
    pub fn validate(&self) -> Result<(), SolverError> {
        SolverError::check_count("num_steps", self.num_steps)?;
        SolverError::check_step_size(self.step_size)?;
        SolverError::check_count("sub_steps", self.sub_steps)?;
        SolverError::check_count("max_rank", self.max_rank)?;
        SolverError::check_count("repeats", self.repeats)?;
        SolverError::check_threshold("threshold", self.threshold)?;
        Ok(())
    }
}

/// Results of a TDSE run.
///
/// Row `k` of each 2D array belongs to `times[k]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TdseRecord {
    pub solver: TdseMethod,
    pub times: nd::Array1<f64>,
    /// Exciton population on each site.
    pub populations: nd::Array2<f64>,
    pub energies: nd::Array1<f64>,
    pub norms: nd::Array1<f64>,
    /// Exciton amplitudes (site basis) at the last time.
    pub final_state: nd::Array1<C64>,
}

/// TDSE engine.
#[derive(Clone, Debug)]
pub struct Tdse {
    hamilton: Coupled,
    spec: TdseSpec,
    persistence: Persistence,
    reference: Option<Record>,
    /// Initial exciton amplitudes in the site basis.
    init: Option<nd::Array1<C64>>,
}

impl Tdse {
    /// Bind a TDSE solver to a Hamiltonian whose operator has been built.
    pub fn new(hamilton: Coupled, spec: TdseSpec, persistence: Persistence)
        -> RunResult<Self>
    {
        spec.validate()?;
        persistence.validate()?;
        hamilton.require_operator()?;
        let reference
            = persistence.load_reference(Kind::Tdse, hamilton.n_site())?;
        log::info!(
            "TDSE: {} steps of {:.4e} ({} sub steps), solver '{}', max rank {}",
            spec.num_steps,
            spec.step_size,
            spec.sub_steps,
            spec.solver,
            spec.max_rank,
        );
        if spec.repeats > 1 && !spec.solver.is_implicit() {
            log::warn!(
                "repeats = {} has no effect on explicit solver '{}'",
                spec.repeats, spec.solver,
            );
        }
        Ok(Self { hamilton, spec, persistence, reference, init: None })
    }

    pub fn hamilton(&self) -> &Coupled { &self.hamilton }

    pub fn spec(&self) -> &TdseSpec { &self.spec }

    /// Reference data loaded from [`Persistence::load_file`], if any.
    pub fn reference(&self) -> Option<&Record> { self.reference.as_ref() }

    /// Start from a fundamental excitation near the center of the chain.
    pub fn fundamental(&mut self) -> RunResult<()> {
        self.set_initial_state(InitialState::Fundamental)
    }
}

impl Dynamics for Tdse {
    const KIND: Kind = Kind::Tdse;

    fn set_initial_state(&mut self, init: InitialState) -> RunResult<()> {
        let n_site = self.hamilton.n_site();
        let site = match init {
            InitialState::Fundamental => n_site / 2,
            InitialState::Site(site) => site,
        };
        if site >= n_site {
            return Err(SolverError::BadInitialSite { site, n_site }.into());
        }
        let mut q0: nd::Array1<C64> = nd::Array1::zeros(n_site);
        q0[site] = C64::from(1.0);
        log::info!("initial state: exciton on site {} of {}", site, n_site);
        self.init = Some(q0);
        Ok(())
    }

    fn solve_with(&mut self, observer: &mut dyn Observer)
        -> RunResult<TdseRecord>
    {
        let op = self.hamilton.require_operator()?;
        let q0 = self.init.as_ref().ok_or(SolverError::NoInitialState)?;
        let n = op.n_site();
        let nt = self.spec.num_steps + 1;
        let dt = self.spec.step_size / self.spec.sub_steps as f64;
        let zpe = op.zero_point();
        let evals = &op.exciton_energies;
        let evecs: nd::Array2<C64> = op.exciton_states.mapv(C64::from);
        let phases: nd::Array1<C64> = evals.mapv(|e| C64::cis(-e * dt));

        let mut c: nd::Array1<C64> = evecs.t().dot(q0);
        let mut q: nd::Array1<C64> = q0.clone();
        let times: nd::Array1<f64>
            = (0..nt).map(|k| k as f64 * self.spec.step_size).collect();
        let mut pops: nd::Array2<f64> = nd::Array2::zeros((nt, n));
        let mut energies: nd::Array1<f64> = nd::Array1::zeros(nt);
        let mut norms: nd::Array1<f64> = nd::Array1::zeros(nt);
        for (k, &t) in times.iter().enumerate() {
            if k > 0 {
                for _ in 0..self.spec.sub_steps {
                    c.iter_mut().zip(&phases)
                        .for_each(|(cj, pj)| { *cj *= *pj; });
                    if self.spec.normalize == Normalize::L2 {
                        renormalize(&mut c);
                    }
                }
                q = evecs.dot(&c);
            }
            let p = populations(&q);
            let norm = norm_sq(&c);
            let energy: f64
                = c.iter().zip(evals)
                .map(|(cj, ej)| cj.norm_sqr() * ej)
                .sum::<f64>() + zpe * norm;
            let (position, spread) = position_moments(&p);
            log::info!(
                "step {:>5}: t = {:.4e}, E = {:.8e}, norm = {:.8e}, <n> = {:.3}",
                k, t, energy, norm, position,
            );
            let frame = Frame {
                index: k,
                label: t,
                populations: p.to_vec(),
                expect: Expectations { energy, norm, position, spread },
            };
            observer.observe(&frame)?;
            pops.row_mut(k).assign(&p);
            energies[k] = energy;
            norms[k] = norm;
        }

        let record = TdseRecord {
            solver: self.spec.solver,
            times,
            populations: pops,
            energies,
            norms,
            final_state: q,
        };
        self.persistence.save(&Record::Tdse(record.clone()))?;
        Ok(record)
    }

    fn n_site(&self) -> usize { self.hamilton.n_site() }
}

impl Solve for Tdse {
    type Output = TdseRecord;

    fn solve(&mut self) -> RunResult<TdseRecord> { self.solve_with(&mut ()) }
}
