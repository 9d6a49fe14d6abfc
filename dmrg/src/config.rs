//! Run parameters for DMRG calculations.

use crate::error::{DmrgError, Result};
use serde::{Deserialize, Serialize};

/// Number of states the infinite algorithm keeps while it seeds the chain.
/// Accuracy barely matters there; the finite sweeps refine everything.
pub const DEFAULT_INFINITE_STATES: usize = 10;

/// Parameters of a full DMRG run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DmrgParams {
    /// Total chain length. Must be even and at least 4.
    pub number_of_sites: usize,
    /// Maximum basis dimension the final sweep converges at.
    pub states_to_keep: usize,
    /// Number of full finite-algorithm sweeps.
    pub sweeps: usize,
    /// Truncation target of the infinite (seeding) phase.
    pub infinite_states: usize,
}

impl DmrgParams {
    pub fn new(number_of_sites: usize, states_to_keep: usize, sweeps: usize) -> Self {
        DmrgParams {
            number_of_sites,
            states_to_keep,
            sweeps,
            infinite_states: DEFAULT_INFINITE_STATES,
        }
    }

    /// Check the chain-shape constraints. The last-sweep shortcut stops at
    /// the chain midpoint, which is only defined for even lengths; odd
    /// chains are rejected up front.
    pub fn validate(&self) -> Result<()> {
        if self.number_of_sites < 4 {
            return Err(DmrgError::InsufficientSites {
                number_of_sites: self.number_of_sites,
                minimum: 4,
            });
        }
        if self.number_of_sites % 2 != 0 {
            return Err(DmrgError::OddChainLength {
                number_of_sites: self.number_of_sites,
            });
        }
        Ok(())
    }

    /// The states-kept target the finite algorithm ends at. Never below the
    /// infinite-phase target, so the schedule always ramps upward.
    pub fn effective_states_to_keep(&self) -> usize {
        self.states_to_keep.max(self.infinite_states)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_seeding_convention() {
        let params = DmrgParams::new(16, 64, 3);
        assert_eq!(params.infinite_states, 10);
        assert_eq!(params.effective_states_to_keep(), 64);
    }

    #[test]
    fn small_requests_are_lifted_to_the_infinite_target() {
        let params = DmrgParams::new(8, 4, 2);
        assert_eq!(params.effective_states_to_keep(), 10);
    }

    #[test]
    fn rejects_short_chains() {
        assert!(matches!(
            DmrgParams::new(2, 10, 1).validate(),
            Err(DmrgError::InsufficientSites { .. })
        ));
    }

    #[test]
    fn rejects_odd_chains() {
        assert!(matches!(
            DmrgParams::new(9, 10, 1).validate(),
            Err(DmrgError::OddChainLength { .. })
        ));
    }

    #[test]
    fn accepts_the_minimal_seed() {
        assert!(DmrgParams::new(4, 10, 1).validate().is_ok());
    }
}
