//! Reduced-density-matrix diagonalization and adaptive truncation.

extern crate nalgebra as na;

use crate::error::{DmrgError, Result};
use na::DMatrix;
use std::cmp::Ordering;

/// Allowed deviation of the RDM trace from unity, and the floor below which
/// an eigenvalue counts as negative rather than as rounding noise.
pub const TRACE_TOLERANCE: f64 = 1e-8;

/// Eigen-decomposition of a reduced density matrix, eigenvalues sorted in
/// descending order with the eigenvector columns aligned.
#[derive(Debug, Clone)]
pub struct DensityMatrixEigen {
    pub values: Vec<f64>,
    pub vectors: DMatrix<f64>,
}

/// Diagonalize a reduced density matrix and validate its contract: trace 1
/// and non-negative spectrum, both within [`TRACE_TOLERANCE`].
pub fn diagonalize(rho: &DMatrix<f64>) -> Result<DensityMatrixEigen> {
    let eig = rho.clone().symmetric_eigen();

    let trace: f64 = eig.eigenvalues.iter().sum();
    if (trace - 1.0).abs() > TRACE_TOLERANCE {
        return Err(DmrgError::NumericalInstability {
            message: format!("density matrix trace {trace} deviates from unity"),
        });
    }
    if let Some(min) = eig
        .eigenvalues
        .iter()
        .cloned()
        .min_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal))
    {
        if min < -TRACE_TOLERANCE {
            return Err(DmrgError::NumericalInstability {
                message: format!("density matrix has negative eigenvalue {min}"),
            });
        }
    }

    // Descending occupation order. The sort is stable: exact ties keep
    // their input order, so a degenerate cutoff retains whichever state
    // came first.
    let mut indices: Vec<usize> = (0..eig.eigenvalues.len()).collect();
    indices.sort_by(|&a, &b| {
        eig.eigenvalues[b]
            .partial_cmp(&eig.eigenvalues[a])
            .unwrap_or(Ordering::Equal)
    });

    let values: Vec<f64> = indices.iter().map(|&i| eig.eigenvalues[i]).collect();
    let vectors = eig.eigenvectors.select_columns(&indices);
    Ok(DensityMatrixEigen { values, vectors })
}

/// The outcome of truncating an RDM spectrum to at most `max_states` states.
#[derive(Debug, Clone)]
pub struct Truncation {
    /// Isometry whose columns are the retained eigenvectors.
    pub basis: DMatrix<f64>,
    /// Retained eigenvalues, descending.
    pub retained: Vec<f64>,
    /// Von Neumann entropy of the retained spectrum.
    pub entropy: f64,
    /// Total discarded eigenvalue mass.
    pub truncation_error: f64,
}

/// Keep the `min(max_states, available)` most occupied eigenvectors.
///
/// Requests beyond the available dimension clamp silently: that is the
/// normal situation early in the infinite algorithm, before the block
/// Hilbert space has grown past the target.
pub fn truncate(eigen: &DensityMatrixEigen, max_states: usize) -> Truncation {
    let kept = max_states.min(eigen.values.len());
    let retained: Vec<f64> = eigen.values[..kept].to_vec();
    let basis = eigen.vectors.columns(0, kept).into_owned();

    let entropy = entropy_of(&retained);
    let truncation_error = (1.0 - retained.iter().sum::<f64>()).max(0.0);

    Truncation {
        basis,
        retained,
        entropy,
        truncation_error,
    }
}

/// Von Neumann entropy `-sum_i p_i ln p_i`, with the `0 ln 0 = 0` convention.
pub fn entropy_of(probabilities: &[f64]) -> f64 {
    probabilities
        .iter()
        .filter(|&&p| p > 0.0)
        .map(|&p| -p * p.ln())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn eigen_of(rho: &DMatrix<f64>) -> DensityMatrixEigen {
        diagonalize(rho).expect("valid density matrix")
    }

    #[test]
    fn eigenvalues_come_out_descending() {
        let rho = DMatrix::from_diagonal(&na::DVector::from_vec(vec![0.1, 0.6, 0.3]));
        let eigen = eigen_of(&rho);
        assert_relative_eq!(eigen.values[0], 0.6, epsilon = 1e-12);
        assert_relative_eq!(eigen.values[1], 0.3, epsilon = 1e-12);
        assert_relative_eq!(eigen.values[2], 0.1, epsilon = 1e-12);
    }

    #[test]
    fn trace_violation_is_rejected() {
        let rho = DMatrix::from_diagonal(&na::DVector::from_vec(vec![0.7, 0.7]));
        match diagonalize(&rho) {
            Err(DmrgError::NumericalInstability { .. }) => {}
            other => panic!("expected instability, got {other:?}"),
        }
    }

    #[test]
    fn negative_eigenvalue_is_rejected() {
        let rho = DMatrix::from_diagonal(&na::DVector::from_vec(vec![1.1, -0.1]));
        match diagonalize(&rho) {
            Err(DmrgError::NumericalInstability { .. }) => {}
            other => panic!("expected instability, got {other:?}"),
        }
    }

    #[test]
    fn retained_mass_plus_error_is_one() {
        let rho = DMatrix::from_diagonal(&na::DVector::from_vec(vec![0.5, 0.3, 0.15, 0.05]));
        let truncation = truncate(&eigen_of(&rho), 2);
        assert_eq!(truncation.retained.len(), 2);
        let retained_mass: f64 = truncation.retained.iter().sum();
        assert_abs_diff_eq!(
            retained_mass + truncation.truncation_error,
            1.0,
            epsilon = 1e-10
        );
        assert_abs_diff_eq!(truncation.truncation_error, 0.2, epsilon = 1e-10);
    }

    #[test]
    fn request_beyond_dimension_clamps() {
        let rho = DMatrix::from_diagonal(&na::DVector::from_vec(vec![0.9, 0.1]));
        let truncation = truncate(&eigen_of(&rho), 64);
        assert_eq!(truncation.retained.len(), 2);
        assert_abs_diff_eq!(truncation.truncation_error, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn pure_state_has_zero_entropy() {
        let rho = DMatrix::from_diagonal(&na::DVector::from_vec(vec![1.0, 0.0, 0.0]));
        let truncation = truncate(&eigen_of(&rho), 3);
        assert_abs_diff_eq!(truncation.entropy, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn flat_spectrum_has_maximal_entropy() {
        let rho = DMatrix::from_diagonal(&na::DVector::from_vec(vec![0.25; 4]));
        let truncation = truncate(&eigen_of(&rho), 4);
        assert_relative_eq!(truncation.entropy, 4.0_f64.ln(), epsilon = 1e-12);
    }

    #[test]
    fn truncation_is_deterministic() {
        let rho = DMatrix::from_fn(4, 4, |i, j| if i == j { 0.25 } else { 0.01 });
        let first = truncate(&eigen_of(&rho), 2);
        let second = truncate(&eigen_of(&rho), 2);
        assert_eq!(first.entropy, second.entropy);
        assert_eq!(first.truncation_error, second.truncation_error);
        assert_eq!(first.basis, second.basis);
    }
}
