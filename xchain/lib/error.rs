//! Collection of all error types.
//!
//! All errors derive [`thiserror::Error`], making them composable when allowed
//! and compatible with application code using [`anyhow`][anyhow]. Everything
//! funnels into [`RunError`], which is what the [driver][crate::driver]
//! returns.
//!
//! [anyhow]: https://crates.io/crates/anyhow

use std::path::PathBuf;
use thiserror::Error;

pub type RunResult<T> = Result<T, RunError>;

/// Returned when a [`ChainModel`][crate::model::ChainModel] is not physically
/// meaningful.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Returned when the chain has no sites.
    #[error("a chain must have at least one site")]
    NoSites,

    /// Returned when a periodic chain has fewer than 3 sites.
    #[error("a periodic chain needs at least 3 sites to form a ring; got {0}")]
    RingTooSmall(usize),

    /// Returned when a coefficient is NaN or infinite.
    #[error("coefficient `{0}` must be finite; got {1}")]
    NonFinite(&'static str, f64),

    /// Returned when a non-positive particle mass is encountered.
    #[error("mass must be greater than 0; got {0}")]
    BadMass(f64),

    /// Returned when a homogeneous chain is given varying per-site values.
    #[error("coefficient `{0}` varies along the chain, but the chain is homogeneous")]
    Inhomogeneous(&'static str),

    /// Returned when a per-site or per-bond list has the wrong length.
    #[error("coefficient `{name}` needs {expected} values; got {got}")]
    Length { name: &'static str, expected: usize, got: usize },
}

impl ModelError {
    pub(crate) fn check_finite(name: &'static str, x: f64)
        -> Result<(), Self>
    {
        x.is_finite().then_some(()).ok_or(Self::NonFinite(name, x))
    }

    pub(crate) fn check_mass(mass: f64) -> Result<(), Self> {
        (mass > 0.0).then_some(()).ok_or(Self::BadMass(mass))
    }
}

/// Returned when a [`BasisSpec`][crate::basis::BasisSpec] is unusable.
#[derive(Debug, Error)]
pub enum BasisError {
    /// Returned when the basis does not give exactly one excitonic and one
    /// phononic size.
    #[error("basis must give exactly 2 sizes (excitonic, phononic); got {0}")]
    Dimensions(usize),

    /// Returned when the excitonic basis cannot hold an excitation.
    #[error("excitonic basis size must be at least 2; got {0}")]
    Exciton(usize),

    /// Returned when the phononic basis is empty.
    #[error("phononic basis size must be at least 1; got {0}")]
    Phonon(usize),

    /// Returned when a quantized encoding is requested for a size that is not
    /// a power of two.
    #[error("quantized encoding needs power-of-two basis sizes; got {0}")]
    Quantized(usize),
}

/// Returned when a solver is configured or driven incorrectly.
#[derive(Debug, Error)]
pub enum SolverError {
    /// Returned when a non-positive or non-finite step size is encountered.
    #[error("step size must be finite and greater than 0; got {0}")]
    BadStepSize(f64),

    /// Returned when a non-positive or non-finite threshold is encountered.
    #[error("threshold `{0}` must be finite and greater than 0; got {1}")]
    BadThreshold(&'static str, f64),

    /// Returned when a count parameter is zero.
    #[error("`{0}` must be greater than 0")]
    BadCount(&'static str),

    /// Returned when a method identifier is not recognized.
    #[error("unknown {0} method `{1}`")]
    UnknownMethod(&'static str, String),

    /// Returned when a normalization mode other than 0 or 2 is requested.
    #[error("normalization mode must be 0 or 2; got {0}")]
    BadNormalize(u8),

    /// Returned when the energy window is empty or not finite.
    #[error("energy window must satisfy e_min < e_max; got ({0}, {1})")]
    BadEnergyWindow(f64, f64),

    /// Returned when a dynamics engine is bound to a Hamiltonian whose
    /// operator representation has not been built.
    #[error("Hamiltonian operator has not been built; call `get_tt` first")]
    NotBuilt,

    /// Returned when an initial state refers to a site outside the chain.
    #[error("initial site {site} is outside a chain of {n_site} sites")]
    BadInitialSite { site: usize, n_site: usize },

    /// Returned when a time-dependent engine is solved without an initial
    /// state.
    #[error("no initial state has been selected")]
    NoInitialState,

    /// Returned when a comparison against reference data is requested.
    #[error("comparison mode `{0}` is not supported")]
    UnsupportedCompare(String),

    /// Returned when more than the given number of levels lie below the
    /// requested ones.
    #[error("level search visited {0} states without reaching `e_est`; lower `e_est` or shrink the phonon basis")]
    LevelSearch(usize),
}

impl SolverError {
    pub(crate) fn check_step_size(dt: f64) -> Result<(), Self> {
        (dt.is_finite() && dt > 0.0).then_some(()).ok_or(Self::BadStepSize(dt))
    }

    pub(crate) fn check_threshold(name: &'static str, eps: f64)
        -> Result<(), Self>
    {
        (eps.is_finite() && eps > 0.0).then_some(())
            .ok_or(Self::BadThreshold(name, eps))
    }

    pub(crate) fn check_count(name: &'static str, n: usize)
        -> Result<(), Self>
    {
        (n != 0).then_some(()).ok_or(Self::BadCount(name))
    }
}

/// Returned from save/load of computed results.
#[derive(Debug, Error)]
pub enum StoreError {
    /// [`std::io::Error`] with the offending path.
    #[error("{0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),

    /// [`bincode::Error`].
    #[error("encoding error: {0}")]
    Codec(#[from] bincode::Error),

    /// Returned when a loaded record is for the other kind of dynamics.
    #[error("reference data in {0} holds {1} results; expected {2}")]
    WrongKind(PathBuf, &'static str, &'static str),

    /// Returned when a loaded record is for a chain of different length.
    #[error("reference data in {0} is for {1} sites; expected {2}")]
    SiteCount(PathBuf, usize, usize),
}

/// Returned from YAML run configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// [`std::io::Error`] with the offending path.
    #[error("{0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),

    /// [`serde_yaml::Error`].
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Returned when plotting fails.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Returned when a plot type does not apply to the visualized dynamics.
    #[error("plot type `{0}` cannot show {1} results")]
    PlotType(&'static str, &'static str),

    /// Returned when the figure has zero width or height.
    #[error("figure size must be non-zero; got {0}x{1}")]
    FigureSize(u32, u32),

    /// Returned when a zero frame rate is requested.
    #[error("frame rate must be greater than 0")]
    FrameRate,

    /// Error reported by the drawing backend.
    #[error("drawing error: {0}")]
    Draw(String),
}

/// Returned when a log file cannot be attached.
#[derive(Debug, Error)]
#[error("cannot open log file {0}: {1}")]
pub struct LogError(pub PathBuf, #[source] pub std::io::Error);

/// Returned from the [driver][crate::driver] and everything it calls.
#[derive(Debug, Error)]
pub enum RunError {
    /// Returned when a script path has no usable file name.
    #[error("cannot derive a run name from {0}")]
    BadScript(PathBuf),

    /// Returned when a time-dependent run supplies no initial state.
    #[error("time-dependent runs need an initial state")]
    MissingInitialState,

    /// [`ModelError`]
    #[error("model error: {0}")]
    Model(#[from] ModelError),

    /// [`BasisError`]
    #[error("basis error: {0}")]
    Basis(#[from] BasisError),

    /// [`SolverError`]
    #[error("solver error: {0}")]
    Solver(#[from] SolverError),

    /// [`StoreError`]
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// [`ConfigError`]
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// [`RenderError`]
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// [`LogError`]
    #[error("log error: {0}")]
    Log(#[from] LogError),
}
