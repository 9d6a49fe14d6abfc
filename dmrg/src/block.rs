//! Truncated block representations of chain segments.

extern crate nalgebra as na;

use crate::error::{DmrgError, Result};
use lattice::{OperatorRole, Site};
use na::DMatrix;
use std::collections::HashMap;
use std::fmt;

/// One of the two halves of the chain bipartition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => write!(f, "left"),
            Side::Right => write!(f, "right"),
        }
    }
}

/// A contiguous chain segment represented in a truncated effective basis.
///
/// A block owns the operators a model needs at its open edge, expressed in
/// the current basis, plus (once it spans more than one site) its own
/// accumulated Hamiltonian. Blocks are owned exclusively by the running
/// system and mutated only by whole-block replacement after a growth step.
#[derive(Debug, Clone)]
pub struct Block {
    dim: usize,
    sites: usize,
    operators: HashMap<OperatorRole, DMatrix<f64>>,
    hamiltonian: Option<DMatrix<f64>>,
}

impl Block {
    /// A fresh single-site block. Its operator table is the site's own and
    /// it carries no block Hamiltonian: the on-site terms of a bare site
    /// enter the superblock Hamiltonian directly.
    pub fn from_site(site: &Site) -> Self {
        let mut operators = HashMap::new();
        for role in site.roles() {
            operators.insert(role, site.operator(role).expect("listed role exists"));
        }
        Block {
            dim: site.dim(),
            sites: 1,
            operators,
            hamiltonian: None,
        }
    }

    /// Assembles a grown block from already-rotated pieces.
    pub fn new(
        dim: usize,
        sites: usize,
        operators: HashMap<OperatorRole, DMatrix<f64>>,
        hamiltonian: Option<DMatrix<f64>>,
    ) -> Self {
        Block {
            dim,
            sites,
            operators,
            hamiltonian,
        }
    }

    /// Number of retained basis states.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of lattice sites this block represents.
    pub fn sites(&self) -> usize {
        self.sites
    }

    pub fn has_hamiltonian(&self) -> bool {
        self.hamiltonian.is_some()
    }

    pub fn hamiltonian(&self) -> Option<&DMatrix<f64>> {
        self.hamiltonian.as_ref()
    }

    /// Operator for `role` in the block basis. `Identity` is synthesized;
    /// anything else must have been propagated into this basis.
    pub fn operator(&self, role: OperatorRole, side: Side) -> Result<DMatrix<f64>> {
        if role == OperatorRole::Identity {
            return Ok(DMatrix::identity(self.dim, self.dim));
        }
        self.operators
            .get(&role)
            .cloned()
            .ok_or(DmrgError::MissingOperator { role, side })
    }
}
