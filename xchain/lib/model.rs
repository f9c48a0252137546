//! Declarative description of a coupled exciton-phonon chain.
//!
//! A [`ChainModel`] is a plain record: constructing one performs no
//! computation. It is checked once by [`ChainModel::validate`] (which
//! [`Coupled::new`][crate::hamilton::Coupled::new] calls) and is immutable
//! afterwards.

use ndarray as nd;
use serde::{ Deserialize, Serialize };
use crate::error::ModelError;

/// Value of a coefficient along the chain.
///
/// Either one value shared by every site (or bond), or one value per site (or
/// bond). Deserializes from a bare number or a list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SiteValues {
    /// The same value everywhere.
    Uniform(f64),
    /// One value per site or bond.
    List(Vec<f64>),
}

impl Default for SiteValues {
    fn default() -> Self { Self::Uniform(0.0) }
}

impl From<f64> for SiteValues {
    fn from(x: f64) -> Self { Self::Uniform(x) }
}

impl From<Vec<f64>> for SiteValues {
    fn from(xs: Vec<f64>) -> Self { Self::List(xs) }
}

impl SiteValues {
    /// Return `true` if every site or bond carries the same value.
    pub fn is_uniform(&self) -> bool {
        match self {
            Self::Uniform(_) => true,
            Self::List(xs) => xs.windows(2).all(|w| w[0] == w[1]),
        }
    }

    /// Return `true` if every value is zero.
    pub fn is_zero(&self) -> bool {
        match self {
            Self::Uniform(x) => *x == 0.0,
            Self::List(xs) => xs.iter().all(|x| *x == 0.0),
        }
    }

    fn check(&self, name: &'static str, n: usize, homogen: bool)
        -> Result<(), ModelError>
    {
        match self {
            Self::Uniform(x) => ModelError::check_finite(name, *x),
            Self::List(xs) => {
                if xs.len() != n {
                    return Err(
                        ModelError::Length { name, expected: n, got: xs.len() });
                }
                xs.iter()
                    .try_for_each(|x| ModelError::check_finite(name, *x))?;
                if homogen && !self.is_uniform() {
                    return Err(ModelError::Inhomogeneous(name));
                }
                Ok(())
            },
        }
    }

    /// Expand into an array of `n` values.
    ///
    /// Lists are assumed to have been validated to length `n`.
    pub fn expand(&self, n: usize) -> nd::Array1<f64> {
        match self {
            Self::Uniform(x) => nd::Array1::from_elem(n, *x),
            Self::List(xs) => xs.iter().copied().collect(),
        }
    }
}

/// A chain (or ring) of sites, each carrying an excitonic two-level system and
/// a harmonic lattice coordinate.
///
/// Site quantities (one value per site): `alpha`, `nu`, `chi`, `rho`, `sig`.
/// Bond quantities (one value per nearest-neighbor pair): `beta`, `omg`, `tau`.
///
/// See [`docs`][crate::docs#model-hamiltonian] for the role of each
/// coefficient.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChainModel {
    /// Number of sites.
    pub n_site: usize,
    /// Periodic boundary conditions (ring instead of chain).
    #[serde(default)]
    pub periodic: bool,
    /// Homogeneous chain: every coefficient is the same on each site/bond.
    #[serde(default = "default_homogen")]
    pub homogen: bool,
    /// Excitonic site energy.
    #[serde(default)]
    pub alpha: SiteValues,
    /// Nearest-neighbor excitonic coupling strength.
    #[serde(default)]
    pub beta: SiteValues,
    /// Constant energy offset.
    #[serde(default)]
    pub eta: f64,
    /// Particle mass.
    #[serde(default = "default_mass")]
    pub mass: f64,
    /// Position restraint frequency.
    #[serde(default)]
    pub nu: SiteValues,
    /// Nearest-neighbor spring frequency.
    #[serde(default)]
    pub omg: SiteValues,
    /// Exciton-phonon tuning: localized.
    #[serde(default)]
    pub chi: SiteValues,
    /// Exciton-phonon tuning: non-symmetric.
    #[serde(default)]
    pub rho: SiteValues,
    /// Exciton-phonon tuning: symmetrized.
    #[serde(default)]
    pub sig: SiteValues,
    /// Exciton-phonon coupling: pair distance.
    #[serde(default)]
    pub tau: SiteValues,
}

fn default_homogen() -> bool { true }

fn default_mass() -> f64 { 1.0 }

impl Default for ChainModel {
    fn default() -> Self {
        Self {
            n_site: 1,
            periodic: false,
            homogen: default_homogen(),
            alpha: SiteValues::default(),
            beta: SiteValues::default(),
            eta: 0.0,
            mass: default_mass(),
            nu: SiteValues::default(),
            omg: SiteValues::default(),
            chi: SiteValues::default(),
            rho: SiteValues::default(),
            sig: SiteValues::default(),
            tau: SiteValues::default(),
        }
    }
}

impl ChainModel {
    /// Number of nearest-neighbor bonds.
    pub fn n_bond(&self) -> usize {
        if self.periodic { self.n_site } else { self.n_site.saturating_sub(1) }
    }

    /// Check that the model describes a meaningful chain.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.n_site == 0 { return Err(ModelError::NoSites); }
        if self.periodic && self.n_site < 3 {
            return Err(ModelError::RingTooSmall(self.n_site));
        }
        ModelError::check_finite("eta", self.eta)?;
        ModelError::check_finite("mass", self.mass)?;
        ModelError::check_mass(self.mass)?;
        let n = self.n_site;
        let b = self.n_bond();
        let h = self.homogen;
        self.alpha.check("alpha", n, h)?;
        self.nu.check("nu", n, h)?;
        self.chi.check("chi", n, h)?;
        self.rho.check("rho", n, h)?;
        self.sig.check("sig", n, h)?;
        self.beta.check("beta", b, h)?;
        self.omg.check("omg", b, h)?;
        self.tau.check("tau", b, h)?;
        Ok(())
    }

    /// Return `true` if any exciton-phonon constant is non-zero.
    pub fn is_coupled(&self) -> bool {
        [&self.chi, &self.rho, &self.sig, &self.tau].into_iter()
            .any(|c| !c.is_zero())
    }

    /// Site index pairs `(n, m)` joined by each bond, in bond order.
    pub fn bonds(&self) -> Vec<(usize, usize)> {
        (0..self.n_bond())
            .map(|b| (b, (b + 1) % self.n_site))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(n_site: usize, periodic: bool) -> ChainModel {
        ChainModel {
            n_site,
            periodic,
            alpha: 0.1.into(),
            beta: (-0.01).into(),
            nu: 1e-3.into(),
            omg: (1e-3 * 2.0_f64.sqrt()).into(),
            ..ChainModel::default()
        }
    }

    #[test]
    fn open_chain_is_valid() {
        let model = chain(15, false);
        assert!(model.validate().is_ok());
        assert_eq!(model.n_bond(), 14);
        assert_eq!(model.bonds()[13], (13, 14));
    }

    #[test]
    fn ring_wraps_last_bond() {
        let model = chain(5, true);
        assert!(model.validate().is_ok());
        assert_eq!(model.n_bond(), 5);
        assert_eq!(model.bonds()[4], (4, 0));
    }

    #[test]
    fn ring_needs_three_sites() {
        let model = chain(2, true);
        assert!(matches!(model.validate(), Err(ModelError::RingTooSmall(2))));
    }

    #[test]
    fn empty_chain_is_rejected() {
        let model = chain(0, false);
        assert!(matches!(model.validate(), Err(ModelError::NoSites)));
    }

    #[test]
    fn non_finite_coefficient_is_rejected() {
        let mut model = chain(4, false);
        model.sig = f64::NAN.into();
        assert!(matches!(
            model.validate(), Err(ModelError::NonFinite("sig", _))));
        let mut model = chain(4, false);
        model.eta = f64::INFINITY;
        assert!(matches!(
            model.validate(), Err(ModelError::NonFinite("eta", _))));
    }

    #[test]
    fn bad_mass_is_rejected() {
        let mut model = chain(4, false);
        model.mass = 0.0;
        assert!(matches!(model.validate(), Err(ModelError::BadMass(_))));
    }

    #[test]
    fn per_site_lists_need_matching_length() {
        let mut model = chain(4, false);
        model.homogen = false;
        model.alpha = vec![0.1, 0.2, 0.3].into();
        assert!(matches!(
            model.validate(),
            Err(ModelError::Length { name: "alpha", expected: 4, got: 3 }),
        ));
        model.alpha = vec![0.1, 0.2, 0.3, 0.4].into();
        model.beta = vec![-0.01; 3].into();
        assert!(model.validate().is_ok());
    }

    #[test]
    fn homogeneous_chain_rejects_varying_values() {
        let mut model = chain(3, false);
        model.alpha = vec![0.1, 0.2, 0.1].into();
        assert!(matches!(
            model.validate(), Err(ModelError::Inhomogeneous("alpha"))));
        model.alpha = vec![0.1; 3].into();
        assert!(model.validate().is_ok());
    }

    #[test]
    fn coupling_detection() {
        let mut model = chain(3, false);
        assert!(!model.is_coupled());
        model.sig = 1e-3.into();
        assert!(model.is_coupled());
    }

    #[test]
    fn deserializes_scalars_and_lists() {
        let yaml = "
n_site: 3
periodic: false
homogen: false
alpha: [0.1, 0.2, 0.3]
beta: -0.01
";
        let model: ChainModel = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(model.alpha, SiteValues::List(vec![0.1, 0.2, 0.3]));
        assert_eq!(model.beta, SiteValues::Uniform(-0.01));
        assert_eq!(model.mass, 1.0);
        assert!(model.validate().is_ok());
    }
}
