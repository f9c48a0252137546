//! Miscellaneous tools.

use ndarray as nd;
use nalgebra as na;
use num_complex::Complex64 as C64;
use crate::{ Arr1, Arr2 };

/// Diagonalize a real symmetric matrix, returning eigenvalues in ascending
/// order with the corresponding eigenvectors as columns.
///
/// *Panics if `h` is not square*.
pub fn eigh<S>(h: &Arr2<S>) -> (nd::Array1<f64>, nd::Array2<f64>)
where S: nd::Data<Elem = f64>
{
    let n = h.nrows();
    assert_eq!(n, h.ncols(), "eigh: matrix must be square");
    let m: na::DMatrix<f64> = na::DMatrix::from_fn(n, n, |i, j| h[[i, j]]);
    let eig = m.symmetric_eigen();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&l, &r| eig.eigenvalues[l].total_cmp(&eig.eigenvalues[r]));
    let evals: nd::Array1<f64>
        = order.iter().map(|&k| eig.eigenvalues[k]).collect();
    let evecs: nd::Array2<f64>
        = nd::Array2::from_shape_fn((n, n), |(i, j)| {
            eig.eigenvectors[(i, order[j])]
        });
    (evals, evecs)
}

/// Calculate the squared 2-norm of a state vector.
pub fn norm_sq<S>(q: &Arr1<S>) -> f64
where S: nd::Data<Elem = C64>
{
    q.iter().map(|qk| qk.norm_sqr()).sum()
}

/// Renormalize a state vector to unit 2-norm in place.
///
/// Zero vectors are left untouched.
pub fn renormalize<S>(q: &mut Arr1<S>)
where S: nd::DataMut<Elem = C64>
{
    let norm = norm_sq(q).sqrt();
    if norm > 0.0 { q.map_inplace(|qk| { *qk /= norm; }); }
}

/// Compute the occupation probability of each site.
pub fn populations<S>(q: &Arr1<S>) -> nd::Array1<f64>
where S: nd::Data<Elem = C64>
{
    q.mapv(|qk| qk.norm_sqr())
}

/// Compute the mean site index and its standard deviation for a set of
/// (not necessarily normalized) site populations.
///
/// Returns `(0, 0)` if all populations vanish.
pub fn position_moments<S>(p: &Arr1<S>) -> (f64, f64)
where S: nd::Data<Elem = f64>
{
    let total: f64 = p.sum();
    if total <= 0.0 { return (0.0, 0.0); }
    let mean: f64
        = p.iter().enumerate()
        .map(|(n, pn)| n as f64 * pn)
        .sum::<f64>() / total;
    let var: f64
        = p.iter().enumerate()
        .map(|(n, pn)| (n as f64 - mean).powi(2) * pn)
        .sum::<f64>() / total;
    (mean, var.max(0.0).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eigh_sorts_ascending() {
        let h = nd::array![[2.0, 1.0], [1.0, 2.0]];
        let (evals, evecs) = eigh(&h);
        assert!((evals[0] - 1.0).abs() < 1e-12);
        assert!((evals[1] - 3.0).abs() < 1e-12);
        // H v = e v for each column
        for (k, e) in evals.iter().enumerate() {
            let v = evecs.column(k);
            let hv = h.dot(&v);
            hv.iter().zip(v.iter())
                .for_each(|(a, b)| assert!((a - e * b).abs() < 1e-12));
        }
    }

    #[test]
    fn renormalize_gives_unit_norm() {
        let mut q: nd::Array1<C64>
            = nd::array![C64::new(3.0, 0.0), C64::new(0.0, 4.0)];
        renormalize(&mut q);
        assert!((norm_sq(&q) - 1.0).abs() < 1e-12);
        let mut z: nd::Array1<C64> = nd::Array1::zeros(3);
        renormalize(&mut z);
        assert_eq!(norm_sq(&z), 0.0);
    }

    #[test]
    fn moments_of_localized_and_split_states() {
        let p = nd::array![0.0, 0.0, 1.0, 0.0];
        assert_eq!(position_moments(&p), (2.0, 0.0));
        let p = nd::array![0.5, 0.0, 0.5];
        let (mean, spread) = position_moments(&p);
        assert!((mean - 1.0).abs() < 1e-12);
        assert!((spread - 1.0).abs() < 1e-12);
        assert_eq!(position_moments(&nd::Array1::<f64>::zeros(3)), (0.0, 0.0));
    }
}
