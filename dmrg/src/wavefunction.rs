//! Ground-state wavefunctions over a chain bipartition.

extern crate nalgebra as na;

use crate::block::Side;
use na::{DMatrix, DVector};

/// A bipartite wavefunction stored as a matrix: rows index the left
/// (block ⊗ site) basis, columns the right (site ⊗ block) basis.
///
/// Produced by the eigensolver once per step and consumed immediately to
/// build a reduced density matrix; never kept across steps.
#[derive(Debug, Clone)]
pub struct Wavefunction {
    pub matrix: DMatrix<f64>,
}

impl Wavefunction {
    pub fn new(matrix: DMatrix<f64>) -> Self {
        Wavefunction { matrix }
    }

    /// Reshape a flat state vector, row-major over (left, right).
    pub fn from_vector(vector: &DVector<f64>, rows: usize, cols: usize) -> Self {
        assert_eq!(vector.len(), rows * cols);
        let matrix = DMatrix::from_fn(rows, cols, |i, j| vector[i * cols + j]);
        Wavefunction { matrix }
    }

    /// Flatten back to a vector, row-major over (left, right).
    pub fn to_vector(&self) -> DVector<f64> {
        let (rows, cols) = self.matrix.shape();
        DVector::from_fn(rows * cols, |k, _| self.matrix[(k / cols, k % cols)])
    }

    pub fn norm(&self) -> f64 {
        self.matrix.norm()
    }

    /// Reduced density matrix left after tracing out `traced_out`.
    ///
    /// Tracing out the right side leaves `psi psi^T` over the left basis;
    /// tracing out the left leaves `psi^T psi` over the right basis. The
    /// eigenvectors of the result are the Schmidt vectors of the kept side.
    pub fn reduced_density_matrix(&self, traced_out: Side) -> DMatrix<f64> {
        match traced_out {
            Side::Right => &self.matrix * self.matrix.transpose(),
            Side::Left => self.matrix.transpose() * &self.matrix,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn singlet(psi: f64) -> Wavefunction {
        // Two-qbit singlet-sector state parametrized by an angle.
        let mut m = DMatrix::zeros(2, 2);
        m[(0, 1)] = psi.cos();
        m[(1, 0)] = psi.sin();
        Wavefunction::new(m)
    }

    #[test]
    fn vector_round_trip() {
        let v = DVector::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let wf = Wavefunction::from_vector(&v, 2, 3);
        assert_eq!(wf.matrix[(0, 2)], 3.0);
        assert_eq!(wf.matrix[(1, 0)], 4.0);
        assert_eq!(wf.to_vector(), v);
    }

    #[test]
    fn reduced_density_matrices_have_unit_trace() {
        let wf = singlet(0.3);
        for side in [Side::Left, Side::Right] {
            let rho = wf.reduced_density_matrix(side);
            assert_relative_eq!(rho.trace(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn both_cuts_share_a_spectrum() {
        let wf = singlet(std::f64::consts::FRAC_PI_4);
        let rho_left = wf.reduced_density_matrix(Side::Right);
        let rho_right = wf.reduced_density_matrix(Side::Left);
        // at psi = pi/4 both sides are maximally mixed
        assert_relative_eq!(rho_left[(0, 0)], 0.5, epsilon = 1e-12);
        assert_relative_eq!(rho_right[(1, 1)], 0.5, epsilon = 1e-12);
    }

    #[test]
    fn two_qbit_entropy_peaks_at_the_balanced_angle() {
        use crate::truncation::{diagonalize, entropy_of};

        let entropy = |psi: f64| {
            let rho = singlet(psi).reduced_density_matrix(Side::Left);
            entropy_of(&diagonalize(&rho).unwrap().values)
        };

        // product state at psi = 0, maximal entanglement at psi = pi/4
        assert_relative_eq!(entropy(0.0), 0.0, epsilon = 1e-12);
        assert_relative_eq!(
            entropy(std::f64::consts::FRAC_PI_4),
            2.0_f64.ln(),
            epsilon = 1e-12
        );
        for &psi in &[0.2, 0.5, 1.1] {
            assert!(entropy(psi) <= 2.0_f64.ln() + 1e-12);
        }
    }
}
