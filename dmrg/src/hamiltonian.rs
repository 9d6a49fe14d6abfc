//! Superblock Hamiltonian assembly.
//!
//! The assembled operator is an immutable value, built once per step from
//! the model's coupling and on-site lists plus the current block contents
//! and handed to the eigensolver.

extern crate nalgebra as na;

use crate::block::{Block, Side};
use crate::error::Result;
use crate::wavefunction::Wavefunction;
use lattice::{Model, Site};
use na::{DMatrix, DVector};
use rayon::prelude::*;

/// The Hamiltonian of the four-part superblock
/// `left block | left site | right site | right block`, kept as a sum of
/// product terms `L ⊗ R`, where `L` acts on the (block ⊗ site) left space
/// and `R` on the (site ⊗ block) right space.
#[derive(Debug, Clone)]
pub struct SuperblockHamiltonian {
    terms: Vec<(DMatrix<f64>, DMatrix<f64>)>,
    left_dim: usize,
    right_dim: usize,
}

impl SuperblockHamiltonian {
    pub fn new(left_dim: usize, right_dim: usize) -> Self {
        SuperblockHamiltonian {
            terms: Vec::new(),
            left_dim,
            right_dim,
        }
    }

    /// Add `strength * left ⊗ right`. The scalar is folded into the left
    /// factor immediately.
    pub fn add_term(&mut self, left: DMatrix<f64>, right: DMatrix<f64>, strength: f64) {
        assert_eq!(left.nrows(), self.left_dim);
        assert_eq!(right.nrows(), self.right_dim);
        self.terms.push((left * strength, right));
    }

    pub fn left_dim(&self) -> usize {
        self.left_dim
    }

    pub fn right_dim(&self) -> usize {
        self.right_dim
    }

    /// Total superblock dimension.
    pub fn dim(&self) -> usize {
        self.left_dim * self.right_dim
    }

    /// Assemble the superblock Hamiltonian for the current partition.
    ///
    /// Each block contributes its accumulated Hamiltonian if it has one, or
    /// its bare on-site terms if it is still a single site; the two free
    /// sites contribute their on-site terms; every coupling is applied at
    /// the three junctions of the partition.
    pub fn assemble<M: Model>(
        model: &M,
        left: &Block,
        site: &Site,
        right: &Block,
    ) -> Result<Self> {
        let site_id = DMatrix::identity(site.dim(), site.dim());
        let left_id = DMatrix::identity(left.dim(), left.dim());
        let right_id = DMatrix::identity(right.dim(), right.dim());
        let left_dim = left.dim() * site.dim();
        let right_dim = site.dim() * right.dim();
        let left_space_id = DMatrix::identity(left_dim, left_dim);
        let right_space_id = DMatrix::identity(right_dim, right_dim);

        let mut hamiltonian = SuperblockHamiltonian::new(left_dim, right_dim);
        let on_site = model.on_site_terms();

        // Block interiors.
        if let Some(bh) = left.hamiltonian() {
            hamiltonian.add_term(bh.kronecker(&site_id), right_space_id.clone(), 1.0);
        } else {
            for term in &on_site {
                let op = left.operator(term.role, Side::Left)?;
                hamiltonian.add_term(
                    op.kronecker(&site_id),
                    right_space_id.clone(),
                    term.strength,
                );
            }
        }
        if let Some(bh) = right.hamiltonian() {
            hamiltonian.add_term(left_space_id.clone(), site_id.kronecker(bh), 1.0);
        } else {
            for term in &on_site {
                let op = right.operator(term.role, Side::Right)?;
                hamiltonian.add_term(
                    left_space_id.clone(),
                    site_id.kronecker(&op),
                    term.strength,
                );
            }
        }

        // The two free sites.
        for term in &on_site {
            let op = site.operator(term.role).expect("model role exists on site");
            hamiltonian.add_term(
                left_id.kronecker(&op),
                right_space_id.clone(),
                term.strength,
            );
            hamiltonian.add_term(
                left_space_id.clone(),
                op.kronecker(&right_id),
                term.strength,
            );
        }

        // Couplings across the three junctions.
        for coupling in model.couplings() {
            let first = site.operator(coupling.first).expect("role exists on site");
            let second = site.operator(coupling.second).expect("role exists on site");

            // left block edge -- left site
            let block_op = left.operator(coupling.first, Side::Left)?;
            hamiltonian.add_term(
                block_op.kronecker(&second),
                right_space_id.clone(),
                coupling.strength,
            );

            // left site -- right site
            hamiltonian.add_term(
                left_id.kronecker(&first),
                second.kronecker(&right_id),
                coupling.strength,
            );

            // right site -- right block edge
            let block_op = right.operator(coupling.second, Side::Right)?;
            hamiltonian.add_term(
                left_space_id.clone(),
                first.kronecker(&block_op),
                coupling.strength,
            );
        }

        Ok(hamiltonian)
    }

    /// Apply to a wavefunction: `H psi = sum_t L_t psi R_t^T`.
    ///
    /// Terms are independent, so they are applied in parallel and summed;
    /// this is the only parallelism in a step.
    pub fn apply(&self, psi: &Wavefunction) -> DMatrix<f64> {
        self.terms
            .par_iter()
            .map(|(left, right)| left * &psi.matrix * right.transpose())
            .reduce(
                || DMatrix::zeros(self.left_dim, self.right_dim),
                |a, b| a + b,
            )
    }

    /// Apply to a flat state vector (row-major over left ⊗ right).
    pub fn apply_vector(&self, vector: &DVector<f64>) -> DVector<f64> {
        let psi = Wavefunction::from_vector(vector, self.left_dim, self.right_dim);
        Wavefunction::new(self.apply(&psi)).to_vector()
    }

    /// Materialize the full matrix. Only sensible for small superblocks;
    /// the dense reference solver and tests use it.
    pub fn to_dense(&self) -> DMatrix<f64> {
        let dim = self.dim();
        let mut dense = DMatrix::zeros(dim, dim);
        for (left, right) in &self.terms {
            dense += left.kronecker(right);
        }
        dense
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use lattice::HeisenbergModel;

    fn seed_hamiltonian() -> SuperblockHamiltonian {
        let model = HeisenbergModel::new();
        let site = model.site().clone();
        let left = Block::from_site(&site);
        let right = Block::from_site(&site);
        SuperblockHamiltonian::assemble(&model, &left, &site, &right).unwrap()
    }

    #[test]
    fn seed_superblock_has_four_site_dimension() {
        let h = seed_hamiltonian();
        assert_eq!(h.left_dim(), 4);
        assert_eq!(h.right_dim(), 4);
        assert_eq!(h.dim(), 16);
    }

    #[test]
    fn dense_matrix_is_symmetric() {
        let dense = seed_hamiltonian().to_dense();
        assert_relative_eq!((&dense - dense.transpose()).norm(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn apply_matches_dense() {
        let h = seed_hamiltonian();
        let dense = h.to_dense();
        for seed in 0..4 {
            let v = DVector::from_fn(h.dim(), |i, _| {
                (((i + 1 + seed * 137) as f64) * 0.618033988749895).fract() - 0.5
            });
            let via_terms = h.apply_vector(&v);
            let via_dense = &dense * &v;
            assert_relative_eq!((via_terms - via_dense).norm(), 0.0, epsilon = 1e-10);
        }
    }

    #[test]
    fn total_spin_z_commutes_with_heisenberg() {
        // sum of s_z over the four parts commutes with H on the seed chain
        let model = HeisenbergModel::new();
        let site = model.site().clone();
        let s_z = site.operator(lattice::OperatorRole::SpinZ).unwrap();
        let id2 = DMatrix::identity(2, 2);

        let mut total = SuperblockHamiltonian::new(4, 4);
        let id4 = DMatrix::identity(4, 4);
        total.add_term(s_z.kronecker(&id2), id4.clone(), 1.0);
        total.add_term(id2.kronecker(&s_z), id4.clone(), 1.0);
        total.add_term(id4.clone(), s_z.kronecker(&id2), 1.0);
        total.add_term(id4, id2.kronecker(&s_z), 1.0);

        let h = seed_hamiltonian().to_dense();
        let sz = total.to_dense();
        assert_relative_eq!((&h * &sz - &sz * &h).norm(), 0.0, epsilon = 1e-10);
    }
}
