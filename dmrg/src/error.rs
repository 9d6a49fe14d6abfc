//! Error types for DMRG runs.
//!
//! Every error here is fatal to the run it occurs in: a corrupted
//! intermediate basis cannot be resumed, so nothing is retried internally.

use crate::block::Side;
use lattice::OperatorRole;
use thiserror::Error;

/// Result type for DMRG operations.
pub type Result<T> = std::result::Result<T, DmrgError>;

/// Errors that can occur while driving a DMRG calculation.
#[derive(Error, Debug)]
pub enum DmrgError {
    /// Malformed states-kept schedule request.
    #[error(
        "invalid states-kept schedule: initial {initial}, final {final_states}, sweeps {sweeps}"
    )]
    InvalidSchedule {
        initial: usize,
        final_states: usize,
        sweeps: usize,
    },

    /// Chain too short for the minimal seed of the infinite algorithm.
    #[error("chain of {number_of_sites} sites is shorter than the minimal seed of {minimum}")]
    InsufficientSites {
        number_of_sites: usize,
        minimum: usize,
    },

    /// Sweep midpoints are only defined for even chain lengths.
    #[error("chain length {number_of_sites} is odd, sweeps require an even number of sites")]
    OddChainLength { number_of_sites: usize },

    /// A computed sweep range turned out empty.
    #[error("sweep range {start}..={end} over left-block sizes is empty")]
    DegenerateSchedule { start: usize, end: usize },

    /// The reduced density matrix violates its trace or positivity contract.
    /// Signals an upstream model or operator bug, not recoverable here.
    #[error("numerical instability: {message}")]
    NumericalInstability { message: String },

    /// A block is missing an operator a model term refers to.
    #[error("operator {role:?} is missing from the {side} block")]
    MissingOperator { role: OperatorRole, side: Side },

    /// The sweep controller asked for a block size nothing has stored yet.
    #[error("no stored {side} block covering {sites} sites")]
    MissingStoredBlock { side: Side, sites: usize },

    /// The eigensolver could not produce a ground state.
    #[error("eigensolver failure: {message}")]
    EigensolverFailure { message: String },
}
