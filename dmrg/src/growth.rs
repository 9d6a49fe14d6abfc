//! Growing a block by one site through density-matrix truncation.
//!
//! This is the primitive both DMRG phases share: given the current ground
//! state, enlarge one block's represented region by the adjacent free site
//! and re-express every operator the model needs in the truncated basis that
//! best reproduces that ground state.

extern crate nalgebra as na;

use crate::block::{Block, Side};
use crate::error::Result;
use crate::truncation::{diagonalize, truncate};
use crate::wavefunction::Wavefunction;
use lattice::{Model, Site};
use na::DMatrix;
use std::collections::HashMap;
use tracing::debug;

/// Observables of a single growth step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrowthReport {
    pub entropy: f64,
    pub truncation_error: f64,
}

/// Grow `block` by one site on `side` of the chain.
///
/// The reduced density matrix of the enlarged (block ⊗ site) space is built
/// by tracing the ground state over the shrinking side, so the retained
/// eigenvectors are exactly the Schmidt vectors of the growing side. The
/// returned block carries the model's edge operators and the accumulated
/// block Hamiltonian, all rotated into the truncated basis.
pub fn grow_block<M: Model>(
    model: &M,
    block: &Block,
    site: &Site,
    side: Side,
    ground_state: &Wavefunction,
    max_states: usize,
) -> Result<(Block, GrowthReport)> {
    let rho = ground_state.reduced_density_matrix(side.opposite());
    let eigen = diagonalize(&rho)?;
    let truncation = truncate(&eigen, max_states);

    let enlarged_dim = block.dim() * site.dim();
    let hamiltonian = growth_hamiltonian(model, block, site, side)?;

    let mut operators = HashMap::new();
    for role in model.operators_to_propagate() {
        let op = site.operator(role).expect("propagated role exists on site");
        let embedded = embed_site_operator(&op, block.dim(), side);
        operators.insert(role, rotate(&embedded, &truncation.basis));
    }
    let rotated_hamiltonian = rotate(&hamiltonian, &truncation.basis);

    debug!(
        side = %side,
        sites = block.sites() + 1,
        kept = truncation.retained.len(),
        available = enlarged_dim,
        truncation_error = truncation.truncation_error,
        "block grown"
    );

    let grown = Block::new(
        truncation.basis.ncols(),
        block.sites() + 1,
        operators,
        Some(rotated_hamiltonian),
    );
    let report = GrowthReport {
        entropy: truncation.entropy,
        truncation_error: truncation.truncation_error,
    };
    Ok((grown, report))
}

/// Hamiltonian of the enlarged (block ⊗ site) space, before truncation:
/// the block interior, the edge bond to the new site, and the new site's
/// on-site terms.
pub fn growth_hamiltonian<M: Model>(
    model: &M,
    block: &Block,
    site: &Site,
    side: Side,
) -> Result<DMatrix<f64>> {
    let dim = block.dim() * site.dim();
    let mut hamiltonian = DMatrix::zeros(dim, dim);
    let on_site = model.on_site_terms();

    // Interior of the old block: its accumulated Hamiltonian, or its bare
    // on-site terms while it is still a single site.
    if let Some(bh) = block.hamiltonian() {
        hamiltonian += embed_block_operator(bh, site.dim(), side);
    } else {
        for term in &on_site {
            let op = block.operator(term.role, side)?;
            hamiltonian += embed_block_operator(&op, site.dim(), side) * term.strength;
        }
    }

    // Bond between the block edge and the site being absorbed. For the left
    // block the new site sits to its right, and mirrored for the right block.
    for coupling in model.couplings() {
        let (block_role, site_role) = match side {
            Side::Left => (coupling.first, coupling.second),
            Side::Right => (coupling.second, coupling.first),
        };
        let block_op = block.operator(block_role, side)?;
        let site_op = site.operator(site_role).expect("role exists on site");
        let term = match side {
            Side::Left => block_op.kronecker(&site_op),
            Side::Right => site_op.kronecker(&block_op),
        };
        hamiltonian += term * coupling.strength;
    }

    // On-site terms of the absorbed site.
    for term in &on_site {
        let op = site.operator(term.role).expect("role exists on site");
        hamiltonian += embed_site_operator(&op, block.dim(), side) * term.strength;
    }

    Ok(hamiltonian)
}

/// Embed a single-site operator in the enlarged (block ⊗ site) space. The
/// left block appends its new site on the right, the right block on the left.
fn embed_site_operator(op: &DMatrix<f64>, block_dim: usize, side: Side) -> DMatrix<f64> {
    let block_id = DMatrix::identity(block_dim, block_dim);
    match side {
        Side::Left => block_id.kronecker(op),
        Side::Right => op.kronecker(&block_id),
    }
}

fn embed_block_operator(op: &DMatrix<f64>, site_dim: usize, side: Side) -> DMatrix<f64> {
    let site_id = DMatrix::identity(site_dim, site_dim);
    match side {
        Side::Left => op.kronecker(&site_id),
        Side::Right => site_id.kronecker(op),
    }
}

/// Similarity transform into the truncated basis: `U^T O U`.
fn rotate(op: &DMatrix<f64>, basis: &DMatrix<f64>) -> DMatrix<f64> {
    basis.transpose() * op * basis
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hamiltonian::SuperblockHamiltonian;
    use crate::lanczos::{EigenSolver, LanczosSolver};
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use lattice::HeisenbergModel;

    fn seed_ground_state(model: &HeisenbergModel) -> Wavefunction {
        let site = model.site().clone();
        let left = Block::from_site(&site);
        let right = Block::from_site(&site);
        let h = SuperblockHamiltonian::assemble(model, &left, &site, &right).unwrap();
        let (_, wf) = LanczosSolver::default().ground_state(&h).unwrap();
        wf
    }

    #[test]
    fn untruncated_growth_has_no_error() {
        let model = HeisenbergModel::new();
        let site = model.site().clone();
        let block = Block::from_site(&site);
        let wf = seed_ground_state(&model);

        let (grown, report) =
            grow_block(&model, &block, &site, Side::Left, &wf, 16).unwrap();
        assert_eq!(grown.dim(), 4);
        assert_eq!(grown.sites(), 2);
        assert!(grown.has_hamiltonian());
        assert_abs_diff_eq!(report.truncation_error, 0.0, epsilon = 1e-10);
    }

    #[test]
    fn truncated_growth_clamps_to_request() {
        let model = HeisenbergModel::new();
        let site = model.site().clone();
        let block = Block::from_site(&site);
        let wf = seed_ground_state(&model);

        let (grown, report) =
            grow_block(&model, &block, &site, Side::Left, &wf, 2).unwrap();
        assert_eq!(grown.dim(), 2);
        assert!(report.truncation_error >= 0.0);
    }

    #[test]
    fn growth_is_idempotent_on_identical_input() {
        let model = HeisenbergModel::new();
        let site = model.site().clone();
        let block = Block::from_site(&site);
        let wf = seed_ground_state(&model);

        let (_, first) = grow_block(&model, &block, &site, Side::Left, &wf, 3).unwrap();
        let (_, second) = grow_block(&model, &block, &site, Side::Left, &wf, 3).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn both_sides_see_the_same_entropy_at_a_symmetric_cut() {
        let model = HeisenbergModel::new();
        let site = model.site().clone();
        let block = Block::from_site(&site);
        let wf = seed_ground_state(&model);

        let (_, left) = grow_block(&model, &block, &site, Side::Left, &wf, 16).unwrap();
        let (_, right) = grow_block(&model, &block, &site, Side::Right, &wf, 16).unwrap();
        assert_relative_eq!(left.entropy, right.entropy, epsilon = 1e-10);
    }

    #[test]
    fn grown_block_hamiltonian_keeps_the_two_site_energy() {
        // with no truncation the rotated block Hamiltonian is the two-site
        // Hamiltonian in another basis, so its spectrum is unchanged
        let model = HeisenbergModel::new();
        let site = model.site().clone();
        let block = Block::from_site(&site);
        let wf = seed_ground_state(&model);

        let bare = growth_hamiltonian(&model, &block, &site, Side::Left).unwrap();
        let (grown, _) = grow_block(&model, &block, &site, Side::Left, &wf, 16).unwrap();
        let rotated = grown.hamiltonian().unwrap();

        let mut bare_eigs: Vec<f64> =
            bare.symmetric_eigen().eigenvalues.iter().cloned().collect();
        let mut rotated_eigs: Vec<f64> = rotated
            .clone()
            .symmetric_eigen()
            .eigenvalues
            .iter()
            .cloned()
            .collect();
        bare_eigs.sort_by(|a, b| a.partial_cmp(b).unwrap());
        rotated_eigs.sort_by(|a, b| a.partial_cmp(b).unwrap());
        for (a, b) in bare_eigs.iter().zip(&rotated_eigs) {
            assert_relative_eq!(*a, *b, epsilon = 1e-8);
        }
    }
}
