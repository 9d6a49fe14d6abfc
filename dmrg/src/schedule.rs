//! Per-half-sweep truncation targets for the finite algorithm.

use crate::error::{DmrgError, Result};

/// Compute the states-kept ramp for a finite-algorithm run.
///
/// Returns one target per half-sweep, `2 * sweeps` entries in total. Both
/// half-sweeps of a sweep share a target; targets interpolate linearly from
/// `initial` on the first sweep to `final_states` on the last, so early
/// sweeps run on a small, cheap basis and the final sweep converges at the
/// requested accuracy.
pub fn states_to_keep(initial: usize, final_states: usize, sweeps: usize) -> Result<Vec<usize>> {
    if sweeps == 0 || final_states < initial {
        return Err(DmrgError::InvalidSchedule {
            initial,
            final_states,
            sweeps,
        });
    }

    let mut targets = Vec::with_capacity(2 * sweeps);
    for sweep in 0..sweeps {
        let target = if sweeps == 1 {
            final_states
        } else {
            let ramp =
                (final_states - initial) as f64 * sweep as f64 / (sweeps - 1) as f64;
            initial + ramp.round() as usize
        };
        targets.push(target);
        targets.push(target);
    }
    Ok(targets)
}
