//! Stationary states of the chain under the time-independent Schrödinger
//! equation (TISE).
//!
//! The engine reports the `n_levels` energy levels closest to an estimate
//! `e_est`, in ascending order, one [`Frame`] per level. With the reference
//! operator representation the spectrum is that of the uncoupled system,
//! ```text
//! E = ε_k + Σ_j (n_j + ½) Ω_j
//! ```
//! with ε_k the single-exciton energies, Ω_j the lattice normal-mode
//! frequencies, and total vibrational quanta Σ_j n_j below the phonon basis
//! size.

use std::{
    cmp::Ordering,
    collections::{ BinaryHeap, VecDeque },
    fmt,
    str::FromStr,
};
use ndarray as nd;
use serde::{ Deserialize, Serialize };
use crate::{
    dynamics::{ Dynamics, Expectations, Frame, InitialState, Kind, Observer, Solve },
    error::{ RunResult, SolverError },
    hamilton::Coupled,
    store::{ Persistence, Record },
    utils::position_moments,
};

/// Eigensolver for the full system.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TiseMethod {
    /// Alternating least squares sweeps.
    Als,
    /// Quasi-exact diagonalization.
    Qe,
}

impl TiseMethod {
    pub fn name(self) -> &'static str {
        match self {
            Self::Als => "als",
            Self::Qe => "qe",
        }
    }
}

impl fmt::Display for TiseMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TiseMethod {
    type Err = SolverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "als" => Ok(Self::Als),
            "qe" => Ok(Self::Qe),
            _ => Err(SolverError::UnknownMethod("TISE", s.to_string())),
        }
    }
}

/// Eigensolver for the micro systems of a sweep.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MicroEigen {
    Eig,
    Eigs,
    Eigh,
    Eigsh,
}

impl MicroEigen {
    pub fn name(self) -> &'static str {
        match self {
            Self::Eig => "eig",
            Self::Eigs => "eigs",
            Self::Eigh => "eigh",
            Self::Eigsh => "eigsh",
        }
    }
}

impl fmt::Display for MicroEigen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MicroEigen {
    type Err = SolverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "eig" => Ok(Self::Eig),
            "eigs" => Ok(Self::Eigs),
            "eigh" => Ok(Self::Eigh),
            "eigsh" => Ok(Self::Eigsh),
            _ => Err(SolverError::UnknownMethod("micro eigen", s.to_string())),
        }
    }
}

/// Numerical parameters of a TISE run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TiseSpec {
    /// Number of energy levels to compute.
    pub n_levels: usize,
    pub solver: TiseMethod,
    pub eigen: MicroEigen,
    /// Rank of the initial guess.
    pub ranks: usize,
    /// Number of sweeps.
    pub repeats: usize,
    /// Convergence threshold on eigenvalues.
    pub conv_eps: f64,
    /// Levels closest to this energy are computed.
    pub e_est: f64,
    /// Lower end of the energy plot axis.
    pub e_min: f64,
    /// Upper end of the energy plot axis.
    pub e_max: f64,
}

impl TiseSpec {
    pub fn validate(&self) -> Result<(), SolverError> {
        SolverError::check_count("n_levels", self.n_levels)?;
        SolverError::check_count("ranks", self.ranks)?;
        SolverError::check_count("repeats", self.repeats)?;
        SolverError::check_threshold("conv_eps", self.conv_eps)?;
        if !self.e_est.is_finite() {
            return Err(SolverError::BadThreshold("e_est", self.e_est));
        }
        (self.e_min.is_finite() && self.e_max.is_finite()
            && self.e_min < self.e_max)
            .then_some(())
            .ok_or(SolverError::BadEnergyWindow(self.e_min, self.e_max))
    }
}

/// Results of a TISE run, one entry (row) per level in ascending energy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TiseRecord {
    pub energies: nd::Array1<f64>,
    /// Total vibrational quanta of each level.
    pub quanta: Vec<usize>,
    /// Exciton population on each site.
    pub populations: nd::Array2<f64>,
}

/// Upper bound on the number of levels visited while searching for the ones
/// closest to `e_est`.
pub const MAX_LEVEL_SEARCH: usize = 1 << 20;

#[derive(Copy, Clone, Debug)]
struct Level {
    energy: f64,
    exciton: usize,
    quanta: usize,
}

// search state: a level plus the lattice mode that received its most recent
// quantum (`None` for the lattice ground state)
//
// quanta are always added in non-decreasing mode order, so every distribution
// is reached exactly once: a popped level spawns its first child (one more
// quantum in the same mode) and its next sibling (the last quantum moved one
// mode up). With mode frequencies in ascending order neither is below its
// parent, so the heap yields levels in ascending energy.
#[derive(Copy, Clone, Debug)]
struct Candidate {
    level: Level,
    last: Option<usize>,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool { self.cmp(other) == Ordering::Equal }
}

impl Eq for Candidate { }

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    // reversed: `BinaryHeap` is a max-heap
    fn cmp(&self, other: &Self) -> Ordering {
        other.level.energy.total_cmp(&self.level.energy)
    }
}

// walk the spectrum upward from the ground level, keeping a sliding window of
// the `n_levels` levels closest to `e_est`; stops as soon as the next level is
// no closer than the lowest one in a full window
fn nearest_levels(
    exciton_energies: &[f64],
    freqs: &[f64],
    zero_point: f64,
    max_quanta: usize,
    e_est: f64,
    n_levels: usize,
) -> Result<Vec<Level>, SolverError>
{
    let n_modes = freqs.len();
    let mut heap: BinaryHeap<Candidate>
        = exciton_energies.iter().enumerate()
        .map(|(k, ek)| {
            let level = Level { energy: ek + zero_point, exciton: k, quanta: 0 };
            Candidate { level, last: None }
        })
        .collect();
    let mut window: VecDeque<Level>
        = VecDeque::with_capacity(n_levels.min(MAX_LEVEL_SEARCH));
    let mut visited: usize = 0;
    while let Some(Candidate { level, last }) = heap.pop() {
        visited += 1;
        if visited > MAX_LEVEL_SEARCH {
            return Err(SolverError::LevelSearch(MAX_LEVEL_SEARCH));
        }
        if window.len() == n_levels {
            let dist = (level.energy - e_est).abs();
            match window.front() {
                Some(low) if (low.energy - e_est).abs() > dist => {
                    window.pop_front();
                },
                _ => { break; },
            }
        }
        window.push_back(level);

        let mode = last.unwrap_or(0);
        if level.quanta < max_quanta && mode < n_modes {
            let child = Level {
                energy: level.energy + freqs[mode],
                quanta: level.quanta + 1,
                ..level
            };
            heap.push(Candidate { level: child, last: Some(mode) });
        }
        if let Some(j) = last.filter(|j| j + 1 < n_modes) {
            let sibling = Level {
                energy: level.energy - freqs[j] + freqs[j + 1],
                ..level
            };
            heap.push(Candidate { level: sibling, last: Some(j + 1) });
        }
    }
    log::debug!("level search visited {} states", visited);
    let mut levels: Vec<Level> = window.into();
    levels.sort_by(|l, r| l.energy.total_cmp(&r.energy));
    Ok(levels)
}

/// TISE engine.
#[derive(Clone, Debug)]
pub struct Tise {
    hamilton: Coupled,
    spec: TiseSpec,
    persistence: Persistence,
    reference: Option<Record>,
}

impl Tise {
    /// Bind a TISE solver to a Hamiltonian whose operator has been built.
    pub fn new(hamilton: Coupled, spec: TiseSpec, persistence: Persistence)
        -> RunResult<Self>
    {
        spec.validate()?;
        persistence.validate()?;
        hamilton.require_operator()?;
        let reference
            = persistence.load_reference(Kind::Tise, hamilton.n_site())?;
        log::info!(
            "TISE: {} levels near {:.4e}, solver '{}' / '{}', rank {}, {} sweeps",
            spec.n_levels,
            spec.e_est,
            spec.solver,
            spec.eigen,
            spec.ranks,
            spec.repeats,
        );
        Ok(Self { hamilton, spec, persistence, reference })
    }

    pub fn hamilton(&self) -> &Coupled { &self.hamilton }

    pub fn spec(&self) -> &TiseSpec { &self.spec }

    /// Reference data loaded from [`Persistence::load_file`], if any.
    pub fn reference(&self) -> Option<&Record> { self.reference.as_ref() }

    // levels closest to `e_est`, ascending in energy
    fn select_levels(&self) -> RunResult<Vec<Level>> {
        let op = self.hamilton.require_operator()?;
        let exciton_energies: Vec<f64> = op.exciton_energies.to_vec();
        let freqs: Vec<f64> = op.phonon_freqs.to_vec();
        let levels = nearest_levels(
            &exciton_energies,
            &freqs,
            op.zero_point(),
            op.basis.n_phonon() - 1,
            self.spec.e_est,
            self.spec.n_levels,
        )?;
        if levels.len() < self.spec.n_levels {
            log::warn!(
                "only {} levels exist within the basis; {} requested",
                levels.len(), self.spec.n_levels,
            );
        }
        Ok(levels)
    }
}

impl Dynamics for Tise {
    const KIND: Kind = Kind::Tise;

    fn set_initial_state(&mut self, init: InitialState) -> RunResult<()> {
        log::debug!("TISE ignores initial state {:?}", init);
        Ok(())
    }

    fn solve_with(&mut self, observer: &mut dyn Observer)
        -> RunResult<TiseRecord>
    {
        let levels = self.select_levels()?;
        let op = self.hamilton.require_operator()?;
        let n = op.n_site();
        let mut energies: nd::Array1<f64> = nd::Array1::zeros(levels.len());
        let mut pops: nd::Array2<f64> = nd::Array2::zeros((levels.len(), n));
        for (i, level) in levels.iter().enumerate() {
            let p: nd::Array1<f64>
                = op.exciton_states.column(level.exciton).mapv(|v| v * v);
            let (position, spread) = position_moments(&p);
            log::info!(
                "level {:>3}: E = {:.8e} (exciton state {}, {} vibrational quanta)",
                i, level.energy, level.exciton, level.quanta,
            );
            let frame = Frame {
                index: i,
                label: level.energy,
                populations: p.to_vec(),
                expect: Expectations {
                    energy: level.energy,
                    norm: p.sum(),
                    position,
                    spread,
                },
            };
            observer.observe(&frame)?;
            energies[i] = level.energy;
            pops.row_mut(i).assign(&p);
        }
        let record = TiseRecord {
            energies,
            quanta: levels.iter().map(|l| l.quanta).collect(),
            populations: pops,
        };
        self.persistence.save(&Record::Tise(record.clone()))?;
        Ok(record)
    }

    fn n_site(&self) -> usize { self.hamilton.n_site() }

    fn plot_range(&self) -> Option<(f64, f64)> {
        Some((self.spec.e_min, self.spec.e_max))
    }
}

impl Solve for Tise {
    type Output = TiseRecord;

    fn solve(&mut self) -> RunResult<TiseRecord> { self.solve_with(&mut ()) }
}
