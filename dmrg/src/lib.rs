//! Density-Matrix Renormalization Group engine for 1-D quantum lattice
//! models.
//!
//! The crate bootstraps block representations with the infinite algorithm,
//! then refines them with finite-algorithm sweeps under an adaptive
//! states-kept schedule, recording energy, entanglement entropy and
//! truncation error at every step. Model definitions live in the `lattice`
//! crate and reach the engine through the [`lattice::Model`] trait.

pub mod block;
pub mod config;
pub mod error;
pub mod growth;
pub mod hamiltonian;
pub mod lanczos;
pub mod schedule;
pub mod sweep;
pub mod system;
pub mod trace;
pub mod truncation;
pub mod wavefunction;

pub use block::{Block, Side};
pub use config::DmrgParams;
pub use error::{DmrgError, Result};
pub use growth::GrowthReport;
pub use lanczos::{DenseSolver, EigenSolver, LanczosSolver};
pub use schedule::states_to_keep;
pub use system::System;
pub use trace::{RunTrace, StepRecord};
pub use wavefunction::Wavefunction;
