//! Finite-algorithm sweep bookkeeping.
//!
//! The controller turns a states-kept schedule into the exact sequence of
//! growth steps the finite algorithm performs, tracking which block grows,
//! at which left-block size, under which truncation target. It owns no
//! Hilbert-space data, so the bookkeeping is testable on its own.

use crate::block::Side;
use crate::error::{DmrgError, Result};

/// Phase of the finite algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepPhase {
    /// Growing the right block while the left is read back from storage.
    SweepingRight,
    /// Growing the left block while the right is read back from storage.
    SweepingLeft,
    Done,
}

/// One scheduled step of the finite algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepStep {
    pub growing: Side,
    /// Left-block size of the partition this step solves.
    pub left_size: usize,
    /// Truncation target for this step's growth.
    pub states: usize,
    pub half_sweep: usize,
}

/// Drives left-block sizes up and down the chain until the schedule is
/// consumed.
///
/// The left-block size runs over `1..=number_of_sites - 3` in both
/// directions, except on the last half-sweep, which stops once the grown
/// left block reaches the chain midpoint: the run has converged by then and
/// the remaining half pass would be redundant.
#[derive(Debug, Clone)]
pub struct SweepController {
    number_of_sites: usize,
    max_left: usize,
    schedule: Vec<usize>,
    half_sweep: usize,
    phase: SweepPhase,
    left_size: usize,
}

impl SweepController {
    pub fn new(number_of_sites: usize, schedule: Vec<usize>) -> Result<Self> {
        let max_left = number_of_sites.saturating_sub(3);
        let midpoint_top = number_of_sites / 2 - 1;
        if max_left < 1 || midpoint_top < 1 || schedule.is_empty() {
            return Err(DmrgError::DegenerateSchedule {
                start: 1,
                end: max_left.min(midpoint_top),
            });
        }
        Ok(SweepController {
            number_of_sites,
            max_left,
            schedule,
            half_sweep: 0,
            phase: SweepPhase::SweepingRight,
            left_size: max_left,
        })
    }

    pub fn phase(&self) -> SweepPhase {
        self.phase
    }

    pub fn half_sweep(&self) -> usize {
        self.half_sweep
    }

    /// Upper bound of the current left-growing range; shortened to the
    /// midpoint on the final half-sweep.
    fn left_sweep_top(&self) -> usize {
        if self.half_sweep == self.schedule.len() - 1 {
            self.number_of_sites / 2 - 1
        } else {
            self.max_left
        }
    }

    /// The next step to perform, or `None` once the schedule is consumed.
    pub fn next_step(&mut self) -> Option<SweepStep> {
        match self.phase {
            SweepPhase::Done => None,
            SweepPhase::SweepingRight => {
                let step = SweepStep {
                    growing: Side::Right,
                    left_size: self.left_size,
                    states: self.schedule[self.half_sweep],
                    half_sweep: self.half_sweep,
                };
                if self.left_size > 1 {
                    self.left_size -= 1;
                } else {
                    self.half_sweep += 1;
                    self.phase = SweepPhase::SweepingLeft;
                    self.left_size = 1;
                }
                Some(step)
            }
            SweepPhase::SweepingLeft => {
                let step = SweepStep {
                    growing: Side::Left,
                    left_size: self.left_size,
                    states: self.schedule[self.half_sweep],
                    half_sweep: self.half_sweep,
                };
                if self.left_size < self.left_sweep_top() {
                    self.left_size += 1;
                } else {
                    self.half_sweep += 1;
                    if self.half_sweep >= self.schedule.len() {
                        self.phase = SweepPhase::Done;
                    } else {
                        self.phase = SweepPhase::SweepingRight;
                        self.left_size = self.max_left;
                    }
                }
                Some(step)
            }
        }
    }
}
