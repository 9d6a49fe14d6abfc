//! Single-site Hilbert spaces and their local operator tables.

extern crate nalgebra as na;

use na::DMatrix;
use std::collections::HashMap;

/// Role an operator plays in a model Hamiltonian.
///
/// Operator tables are keyed by role instead of by name, so a model term can
/// only ever reference operators that exist at initialization time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorRole {
    /// The identity on the local space. Never stored; resolved on demand.
    Identity,
    SpinZ,
    SpinPlus,
    SpinMinus,
    SpinX,
    CreateUp,
    AnnihilateUp,
    CreateDown,
    AnnihilateDown,
    NumberUp,
    NumberDown,
    Number,
    DoubleOccupancy,
}

/// A single lattice site: local dimension plus the operators acting on it.
#[derive(Debug, Clone)]
pub struct Site {
    dim: usize,
    operators: HashMap<OperatorRole, DMatrix<f64>>,
}

impl Site {
    pub fn new(dim: usize) -> Self {
        Site {
            dim,
            operators: HashMap::new(),
        }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Register an operator matrix for `role`. Replaces any previous entry.
    pub fn add_operator(&mut self, role: OperatorRole, matrix: DMatrix<f64>) {
        assert_eq!(matrix.nrows(), self.dim);
        assert_eq!(matrix.ncols(), self.dim);
        self.operators.insert(role, matrix);
    }

    /// Look up the operator for `role`. `Identity` is synthesized on demand.
    pub fn operator(&self, role: OperatorRole) -> Option<DMatrix<f64>> {
        if role == OperatorRole::Identity {
            return Some(DMatrix::identity(self.dim, self.dim));
        }
        self.operators.get(&role).cloned()
    }

    pub fn roles(&self) -> impl Iterator<Item = OperatorRole> + '_ {
        self.operators.keys().copied()
    }

    /// Spin one-half site.
    ///
    /// Basis ordering is `{|down>, |up>}`, with `s_z = diag(-1/2, +1/2)`,
    /// `s_p |down> = |up>` and `s_m |up> = |down>`. `s_x` is `(s_p + s_m)/2`.
    pub fn spin_one_half() -> Self {
        let mut site = Site::new(2);

        let mut s_z = DMatrix::zeros(2, 2);
        s_z[(0, 0)] = -0.5;
        s_z[(1, 1)] = 0.5;
        site.add_operator(OperatorRole::SpinZ, s_z);

        let mut s_p = DMatrix::zeros(2, 2);
        s_p[(1, 0)] = 1.0;
        site.add_operator(OperatorRole::SpinPlus, s_p);

        let mut s_m = DMatrix::zeros(2, 2);
        s_m[(0, 1)] = 1.0;
        site.add_operator(OperatorRole::SpinMinus, s_m);

        let mut s_x = DMatrix::zeros(2, 2);
        s_x[(0, 1)] = 0.5;
        s_x[(1, 0)] = 0.5;
        site.add_operator(OperatorRole::SpinX, s_x);

        site
    }

    /// Electron site for Hubbard-type models.
    ///
    /// Basis ordering is `{empty, down, up, double}`. The number operators
    /// count occupations and `DoubleOccupancy` projects on the doubly
    /// occupied state.
    pub fn electronic() -> Self {
        let mut site = Site::new(4);

        let mut c_up = DMatrix::zeros(4, 4);
        c_up[(0, 2)] = 1.0;
        c_up[(1, 3)] = 1.0;
        site.add_operator(OperatorRole::AnnihilateUp, c_up);

        let mut c_up_dag = DMatrix::zeros(4, 4);
        c_up_dag[(2, 0)] = 1.0;
        c_up_dag[(3, 1)] = 1.0;
        site.add_operator(OperatorRole::CreateUp, c_up_dag);

        let mut c_down = DMatrix::zeros(4, 4);
        c_down[(0, 1)] = 1.0;
        c_down[(2, 3)] = 1.0;
        site.add_operator(OperatorRole::AnnihilateDown, c_down);

        let mut c_down_dag = DMatrix::zeros(4, 4);
        c_down_dag[(1, 0)] = 1.0;
        c_down_dag[(3, 2)] = 1.0;
        site.add_operator(OperatorRole::CreateDown, c_down_dag);

        let mut s_z = DMatrix::zeros(4, 4);
        s_z[(1, 1)] = -1.0;
        s_z[(2, 2)] = 1.0;
        site.add_operator(OperatorRole::SpinZ, s_z);

        let mut n_up = DMatrix::zeros(4, 4);
        n_up[(2, 2)] = 1.0;
        n_up[(3, 3)] = 1.0;
        site.add_operator(OperatorRole::NumberUp, n_up);

        let mut n_down = DMatrix::zeros(4, 4);
        n_down[(1, 1)] = 1.0;
        n_down[(3, 3)] = 1.0;
        site.add_operator(OperatorRole::NumberDown, n_down);

        let mut n = DMatrix::zeros(4, 4);
        n[(1, 1)] = 1.0;
        n[(2, 2)] = 1.0;
        n[(3, 3)] = 2.0;
        site.add_operator(OperatorRole::Number, n);

        let mut u = DMatrix::zeros(4, 4);
        u[(3, 3)] = 1.0;
        site.add_operator(OperatorRole::DoubleOccupancy, u);

        site
    }
}
