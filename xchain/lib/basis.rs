//! Basis truncation sizes for the Hamiltonian representation.

use serde::{ Deserialize, Serialize };
use crate::error::BasisError;

/// Per-degree-of-freedom basis truncation.
///
/// `n_basis[0]` is the size of the excitonic basis on each site and
/// `n_basis[1]` the number of phonon levels kept per mode. `qtt` selects the
/// quantized encoding, which requires power-of-two sizes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasisSpec {
    pub n_basis: Vec<usize>,
    #[serde(default)]
    pub qtt: bool,
}

impl BasisSpec {
    /// Construct and validate.
    pub fn new(n_basis: Vec<usize>, qtt: bool) -> Result<Self, BasisError> {
        let spec = Self { n_basis, qtt };
        spec.validate()?;
        Ok(spec)
    }

    pub fn validate(&self) -> Result<(), BasisError> {
        let &[n_exc, n_pho] = self.n_basis.as_slice()
            else { return Err(BasisError::Dimensions(self.n_basis.len())); };
        (n_exc >= 2).then_some(()).ok_or(BasisError::Exciton(n_exc))?;
        (n_pho >= 1).then_some(()).ok_or(BasisError::Phonon(n_pho))?;
        if self.qtt {
            self.n_basis.iter()
                .find(|n| !n.is_power_of_two())
                .map_or(Ok(()), |n| Err(BasisError::Quantized(*n)))?;
        }
        Ok(())
    }

    /// Size of the excitonic basis.
    ///
    /// *Panics if the basis has not been validated*.
    pub fn n_exciton(&self) -> usize { self.n_basis[0] }

    /// Number of phonon levels per mode.
    ///
    /// *Panics if the basis has not been validated*.
    pub fn n_phonon(&self) -> usize { self.n_basis[1] }
}
