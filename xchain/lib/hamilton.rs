//! The coupled exciton-phonon Hamiltonian for a chain or ring.
//!
//! [`Coupled`] owns a validated [`ChainModel`] and, once
//! [`Coupled::get_tt`] has been called, the operator representation that
//! dynamics engines consume.

use ndarray as nd;
use crate::{
    basis::BasisSpec,
    error::{ RunResult, SolverError },
    model::ChainModel,
    utils::eigh,
};

/// Operator representation of the chain Hamiltonian, restricted to the
/// uncoupled blocks: the single-exciton manifold and the harmonic lattice.
///
/// See [`docs`][crate::docs#reference-representation].
#[derive(Clone, Debug)]
pub struct CoupledOperator {
    /// Single-exciton Hamiltonian in the site basis.
    pub exciton: nd::Array2<f64>,
    /// Eigenvalues of `exciton`, ascending.
    pub exciton_energies: nd::Array1<f64>,
    /// Eigenvectors of `exciton` (columns).
    pub exciton_states: nd::Array2<f64>,
    /// Frequencies of the lattice normal modes, ascending.
    pub phonon_freqs: nd::Array1<f64>,
    /// Basis the operator was built for.
    pub basis: BasisSpec,
}

impl CoupledOperator {
    /// Number of sites.
    pub fn n_site(&self) -> usize { self.exciton.nrows() }

    /// Zero-point energy of the lattice.
    pub fn zero_point(&self) -> f64 { 0.5 * self.phonon_freqs.sum() }
}

/// Coupled exciton-phonon Hamiltonian.
#[derive(Clone, Debug)]
pub struct Coupled {
    model: ChainModel,
    alpha: nd::Array1<f64>,
    beta: nd::Array1<f64>,
    nu: nd::Array1<f64>,
    omg: nd::Array1<f64>,
    chi: nd::Array1<f64>,
    rho: nd::Array1<f64>,
    sig: nd::Array1<f64>,
    tau: nd::Array1<f64>,
    operator: Option<CoupledOperator>,
}

impl Coupled {
    /// Validate a model and expand its coefficients along the chain.
    pub fn new(model: ChainModel) -> RunResult<Self> {
        model.validate()?;
        let n = model.n_site;
        let b = model.n_bond();
        log::info!(
            "coupled exciton-phonon {}: {} sites, {}",
            if model.periodic { "ring" } else { "chain" },
            n,
            if model.homogen { "homogeneous" } else { "inhomogeneous" },
        );
        Ok(Self {
            alpha: model.alpha.expand(n),
            beta: model.beta.expand(b),
            nu: model.nu.expand(n),
            omg: model.omg.expand(b),
            chi: model.chi.expand(n),
            rho: model.rho.expand(n),
            sig: model.sig.expand(n),
            tau: model.tau.expand(b),
            model,
            operator: None,
        })
    }

    pub fn model(&self) -> &ChainModel { &self.model }

    pub fn n_site(&self) -> usize { self.model.n_site }

    /// Excitonic site energies.
    pub fn alpha(&self) -> &nd::Array1<f64> { &self.alpha }

    /// Nearest-neighbor couplings, one per bond.
    pub fn beta(&self) -> &nd::Array1<f64> { &self.beta }

    /// Position restraints.
    pub fn nu(&self) -> &nd::Array1<f64> { &self.nu }

    /// Nearest-neighbor springs, one per bond.
    pub fn omg(&self) -> &nd::Array1<f64> { &self.omg }

    /// Localized exciton-phonon tuning.
    pub fn chi(&self) -> &nd::Array1<f64> { &self.chi }

    /// Non-symmetric exciton-phonon tuning.
    pub fn rho(&self) -> &nd::Array1<f64> { &self.rho }

    /// Symmetrized exciton-phonon tuning.
    pub fn sig(&self) -> &nd::Array1<f64> { &self.sig }

    /// Pair-distance exciton-phonon coupling, one per bond.
    pub fn tau(&self) -> &nd::Array1<f64> { &self.tau }

    /// Build the operator representation for the given basis, replacing any
    /// previously built one.
    pub fn get_tt(&mut self, basis: BasisSpec) -> RunResult<()> {
        basis.validate()?;
        let n = self.n_site();
        let bonds = self.model.bonds();

        let mut exciton: nd::Array2<f64>
            = nd::Array2::from_diag(&self.alpha.mapv(|a| a + self.model.eta));
        let mut dyn_mat: nd::Array2<f64>
            = nd::Array2::from_diag(&self.nu.mapv(|v| v.powi(2)));
        for (&(i, j), (&b, &w)) in bonds.iter().zip(self.beta.iter().zip(&self.omg)) {
            exciton[[i, j]] += b;
            exciton[[j, i]] += b;
            let k = w.powi(2);
            dyn_mat[[i, i]] += k;
            dyn_mat[[j, j]] += k;
            dyn_mat[[i, j]] -= k;
            dyn_mat[[j, i]] -= k;
        }
        let (exciton_energies, exciton_states) = eigh(&exciton);
        let (stiffness, _) = eigh(&dyn_mat);
        let phonon_freqs: nd::Array1<f64>
            = stiffness.mapv(|k| k.max(0.0).sqrt());

        if self.model.is_coupled() {
            log::warn!(
                "exciton-phonon constants are not contracted into the \
                reference representation; results are exact only for \
                vanishing coupling"
            );
        }
        if basis.qtt {
            log::info!("quantized encoding requested; dense blocks are stored as-is");
        }
        log::info!(
            "built operator: {} exciton states in [{:.4e}, {:.4e}], {} phonon modes \
            with {} levels each",
            n,
            exciton_energies[0],
            exciton_energies[n - 1],
            phonon_freqs.len(),
            basis.n_phonon(),
        );
        self.operator = Some(CoupledOperator {
            exciton,
            exciton_energies,
            exciton_states,
            phonon_freqs,
            basis,
        });
        Ok(())
    }

    /// Return the built operator, if any.
    pub fn operator(&self) -> Option<&CoupledOperator> {
        self.operator.as_ref()
    }

    /// Return the built operator, failing if [`Self::get_tt`] has not been
    /// called.
    pub fn require_operator(&self) -> Result<&CoupledOperator, SolverError> {
        self.operator.as_ref().ok_or(SolverError::NotBuilt)
    }
}
