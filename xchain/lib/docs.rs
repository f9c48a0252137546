//! Theoretical background.
//!
//! # Contents
//! - [Model Hamiltonian](#model-hamiltonian)
//! - [Reference representation](#reference-representation)
//! - [Time dependence](#time-dependence)
//! - [Energy levels](#energy-levels)
//!
//! # Model Hamiltonian
//! The chain consists of *N* sites, each carrying an excitonic two-level
//! system (creation/annihilation operators *B*ₙ†, *B*ₙ) and a lattice
//! coordinate *R*ₙ with conjugate momentum *P*ₙ. The total Hamiltonian is a
//! sum of excitonic, phononic and coupling terms,
//! ```text
//! H = Hₑ + Hₚ + Hₑₚ
//! ```
//! with
//! ```text
//! Hₑ  = Σₙ (αₙ + η) Bₙ† Bₙ + Σₙ βₙ (Bₙ† Bₙ₊₁ + Bₙ₊₁† Bₙ)
//!
//! Hₚ  = Σₙ Pₙ² / (2 m) + (m / 2) Σₙ νₙ² Rₙ² + (m / 2) Σₙ ωₙ² (Rₙ₊₁ - Rₙ)²
//!
//! Hₑₚ = Σₙ χₙ Rₙ Bₙ† Bₙ + Σₙ ρₙ (Rₙ₊₁ - Rₙ) Bₙ† Bₙ
//!     + Σₙ σₙ (Rₙ₊₁ - Rₙ₋₁) Bₙ† Bₙ + Σₙ τₙ (Rₙ₊₁ - Rₙ) (Bₙ† Bₙ₊₁ + Bₙ₊₁† Bₙ)
//! ```
//! where the sums over nearest-neighbor pairs include the pair (*N* - 1, 0)
//! for a ring (periodic boundary conditions) and stop at *N* - 2 otherwise.
//!
//! The constants are
//! | name | role                                   | per  |
//! |------|----------------------------------------|------|
//! | α    | excitonic site energy                  | site |
//! | β    | excitonic nearest-neighbor coupling    | bond |
//! | η    | constant energy offset                 | -    |
//! | m    | particle mass                          | -    |
//! | ν    | position restraint                     | site |
//! | ω    | nearest-neighbor spring                | bond |
//! | χ    | exciton-phonon tuning: localized       | site |
//! | ρ    | exciton-phonon tuning: non-symmetric   | site |
//! | σ    | exciton-phonon tuning: symmetrized     | site |
//! | τ    | exciton-phonon coupling: pair distance | bond |
//!
//! A homogeneous chain has the same value of each constant on every site and
//! bond.
//!
//! # Reference representation
//! The operator built by [`Coupled::get_tt`][crate::hamilton::Coupled::get_tt]
//! keeps the two uncoupled blocks of *H*, which suffice whenever χ, ρ, σ and τ
//! all vanish.
//!
//! Within the single-exciton manifold, *H*ₑ is the *N*×*N* tridiagonal
//! (cyclic, for a ring) matrix
//! ```text
//! h[n, n] = αₙ + η
//! h[n, n + 1] = h[n + 1, n] = βₙ
//! ```
//! whose eigenpairs (*ε*ₖ, *φ*ₖ) are the exciton band. For a homogeneous open
//! chain
//! ```text
//! εₖ = α + η + 2 β cos(π k / (N + 1)), k ∊ {1, ..., N}
//! ```
//!
//! *H*ₚ is a set of coupled oscillators. Going to mass-weighted coordinates,
//! the normal-mode frequencies Ω are the square roots of the eigenvalues of
//! the dynamical matrix
//! ```text
//! D = diag(ν²) + L
//! ```
//! where *L* is the graph Laplacian of the chain weighted by ω² on each bond.
//! Each mode is truncated to the lowest `n_basis[1]` oscillator levels.
//!
//! Since ν and ω are given as frequencies, *D* carries no mass: the mass *m*
//! only rescales the displacement coordinates, which the uncoupled reference
//! operator never needs. It is validated (it must be positive) but leaves
//! every energy and frequency unchanged.
//!
//! # Time dependence
//! With the lattice in its ground state, an exciton state
//! |ψ(0)⟩ = Σₙ *q*ₙ |n⟩ evolves as
//! ```text
//! |ψ(t)⟩ = Σₖ exp(-i εₖ t) ⟨φₖ|ψ(0)⟩ |φₖ⟩
//! ```
//! which is evaluated exactly on every sub step. Its energy expectation
//! includes the lattice zero-point energy ½ Σⱼ Ωⱼ.
//!
//! # Energy levels
//! The stationary states of the uncoupled system are products of an exciton
//! eigenstate and a lattice Fock state |*n*₁, ..., *n*ₙ⟩, with energies
//! ```text
//! E = εₖ + Σⱼ (nⱼ + ½) Ωⱼ
//! ```
//! restricted to Σⱼ *n*ⱼ < `n_basis[1]`.
