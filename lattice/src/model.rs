//! Model definitions: nearest-neighbor couplings and on-site terms.
//!
//! A model describes a translationally invariant 1-D Hamiltonian through two
//! lists: couplings applied across every nearest-neighbor bond, and on-site
//! terms applied at every site. The DMRG engine assembles superblock and
//! block-growth Hamiltonians from these lists, so models never touch matrices
//! larger than the single-site operators.

use crate::site::{OperatorRole, Site};

/// A two-site product term `first ⊗ second` acting across a bond, where
/// `first` sits on the left end of the bond.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coupling {
    pub first: OperatorRole,
    pub second: OperatorRole,
    pub strength: f64,
}

impl Coupling {
    pub fn new(first: OperatorRole, second: OperatorRole, strength: f64) -> Self {
        Coupling {
            first,
            second,
            strength,
        }
    }
}

/// A single-site term `strength * op` applied at every site.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OnSiteTerm {
    pub role: OperatorRole,
    pub strength: f64,
}

impl OnSiteTerm {
    pub fn new(role: OperatorRole, strength: f64) -> Self {
        OnSiteTerm { role, strength }
    }
}

/// The interface the DMRG engine consumes a model through.
pub trait Model {
    /// The local Hilbert space shared by all sites of the chain.
    fn site(&self) -> &Site;

    /// Couplings applied across every nearest-neighbor bond.
    fn couplings(&self) -> Vec<Coupling>;

    /// On-site terms applied at every site. Empty by default.
    fn on_site_terms(&self) -> Vec<OnSiteTerm> {
        Vec::new()
    }

    /// Operators a block must carry at its open edge so that the next bond
    /// coupling can be formed. By default, every role that appears on either
    /// end of a coupling.
    fn operators_to_propagate(&self) -> Vec<OperatorRole> {
        let mut roles = Vec::new();
        for coupling in self.couplings() {
            for role in [coupling.first, coupling.second] {
                if role != OperatorRole::Identity && !roles.contains(&role) {
                    roles.push(role);
                }
            }
        }
        roles
    }
}

/// Antiferromagnetic S=1/2 Heisenberg chain,
/// `H = sum_i s^z_i s^z_{i+1} + (s^+_i s^-_{i+1} + s^-_i s^+_{i+1}) / 2`.
#[derive(Debug, Clone)]
pub struct HeisenbergModel {
    site: Site,
}

impl HeisenbergModel {
    pub fn new() -> Self {
        HeisenbergModel {
            site: Site::spin_one_half(),
        }
    }
}

impl Default for HeisenbergModel {
    fn default() -> Self {
        Self::new()
    }
}

impl Model for HeisenbergModel {
    fn site(&self) -> &Site {
        &self.site
    }

    fn couplings(&self) -> Vec<Coupling> {
        vec![
            Coupling::new(OperatorRole::SpinZ, OperatorRole::SpinZ, 1.0),
            Coupling::new(OperatorRole::SpinPlus, OperatorRole::SpinMinus, 0.5),
            Coupling::new(OperatorRole::SpinMinus, OperatorRole::SpinPlus, 0.5),
        ]
    }
}

/// One-band Hubbard chain with hopping `t = 1` and interaction `u`,
/// `H = -sum_{i,sigma} (c^+_{i,sigma} c_{i+1,sigma} + h.c.) + u sum_i n_up n_down`.
#[derive(Debug, Clone)]
pub struct HubbardModel {
    pub u: f64,
    site: Site,
}

impl HubbardModel {
    pub fn new(u: f64) -> Self {
        HubbardModel {
            u,
            site: Site::electronic(),
        }
    }
}

impl Model for HubbardModel {
    fn site(&self) -> &Site {
        &self.site
    }

    fn couplings(&self) -> Vec<Coupling> {
        vec![
            Coupling::new(OperatorRole::AnnihilateUp, OperatorRole::CreateUp, -1.0),
            Coupling::new(OperatorRole::CreateUp, OperatorRole::AnnihilateUp, -1.0),
            Coupling::new(OperatorRole::AnnihilateDown, OperatorRole::CreateDown, -1.0),
            Coupling::new(OperatorRole::CreateDown, OperatorRole::AnnihilateDown, -1.0),
        ]
    }

    fn on_site_terms(&self) -> Vec<OnSiteTerm> {
        vec![OnSiteTerm::new(OperatorRole::DoubleOccupancy, self.u)]
    }
}

/// Ising chain in a transverse field,
/// `H = -sum_i s^x_i s^x_{i+1} - field * sum_i s^z_i`.
#[derive(Debug, Clone)]
pub struct TfimModel {
    pub field: f64,
    site: Site,
}

impl TfimModel {
    pub fn new(field: f64) -> Self {
        TfimModel {
            field,
            site: Site::spin_one_half(),
        }
    }
}

impl Model for TfimModel {
    fn site(&self) -> &Site {
        &self.site
    }

    fn couplings(&self) -> Vec<Coupling> {
        vec![Coupling::new(OperatorRole::SpinX, OperatorRole::SpinX, -1.0)]
    }

    fn on_site_terms(&self) -> Vec<OnSiteTerm> {
        vec![OnSiteTerm::new(OperatorRole::SpinZ, -self.field)]
    }
}
