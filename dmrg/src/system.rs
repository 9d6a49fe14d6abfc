//! The DMRG system: chain state, phase drivers, and the run loop.

use crate::block::{Block, Side};
use crate::config::DmrgParams;
use crate::error::{DmrgError, Result};
use crate::growth::{self, GrowthReport};
use crate::hamiltonian::SuperblockHamiltonian;
use crate::lanczos::{EigenSolver, LanczosSolver};
use crate::schedule::states_to_keep;
use crate::sweep::SweepController;
use crate::trace::{RunTrace, StepRecord};
use crate::wavefunction::Wavefunction;
use lattice::{Model, Site};
use std::collections::HashMap;
use tracing::info;

/// A chain being solved by DMRG.
///
/// Owns the two block representations, the per-size block storage the finite
/// algorithm reads back, and the accumulated run trace. Steps are strictly
/// sequential: each superblock Hamiltonian is assembled from the previous
/// step's truncated operators.
pub struct System<M: Model> {
    model: M,
    params: DmrgParams,
    site: Site,
    solver: Box<dyn EigenSolver>,
    left: Block,
    right: Block,
    left_store: HashMap<usize, Block>,
    right_store: HashMap<usize, Block>,
    trace: RunTrace,
}

impl<M: Model> System<M> {
    pub fn new(model: M, params: DmrgParams) -> Result<Self> {
        params.validate()?;
        let site = model.site().clone();
        let left = Block::from_site(&site);
        let right = Block::from_site(&site);
        let mut left_store = HashMap::new();
        let mut right_store = HashMap::new();
        left_store.insert(1, left.clone());
        right_store.insert(1, right.clone());

        Ok(System {
            model,
            params,
            site,
            solver: Box::<LanczosSolver>::default(),
            left,
            right,
            left_store,
            right_store,
            trace: RunTrace::new(),
        })
    }

    /// Swap the ground-state solver, e.g. for the dense reference in tests.
    pub fn set_solver(&mut self, solver: Box<dyn EigenSolver>) {
        self.solver = solver;
    }

    pub fn params(&self) -> &DmrgParams {
        &self.params
    }

    pub fn trace(&self) -> &RunTrace {
        &self.trace
    }

    pub fn into_trace(self) -> RunTrace {
        self.trace
    }

    pub fn left_block(&self) -> &Block {
        &self.left
    }

    pub fn right_block(&self) -> &Block {
        &self.right
    }

    /// Full DMRG: seed with the asymmetric infinite algorithm, then sweep.
    pub fn run(&mut self) -> Result<&RunTrace> {
        info!(
            "dmrg run: {} sites, {} states, {} sweeps",
            self.params.number_of_sites,
            self.params.effective_states_to_keep(),
            self.params.sweeps
        );
        self.infinite_algorithm()?;
        self.finite_algorithm()?;
        Ok(&self.trace)
    }

    fn solve_ground_state(&self) -> Result<(f64, Wavefunction)> {
        let hamiltonian =
            SuperblockHamiltonian::assemble(&self.model, &self.left, &self.site, &self.right)?;
        self.solver.ground_state(&hamiltonian)
    }

    /// Grow one side by one site and store the grown block under its size.
    fn grow(&mut self, side: Side, ground_state: &Wavefunction, states: usize) -> Result<GrowthReport> {
        let block = match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        };
        let (grown, report) =
            growth::grow_block(&self.model, block, &self.site, side, ground_state, states)?;
        match side {
            Side::Left => {
                self.left_store.insert(grown.sites(), grown.clone());
                self.left = grown;
            }
            Side::Right => {
                self.right_store.insert(grown.sites(), grown.clone());
                self.right = grown;
            }
        }
        Ok(report)
    }

    /// One step of the asymmetric infinite algorithm: solve the current
    /// partition and grow the left block, leaving the right side one site
    /// long. Cheap and rough; the sweeps refine it afterwards.
    pub fn infinite_dmrg_step(&mut self, states: usize) -> Result<StepRecord> {
        let cut = self.left.sites();
        let chain_size = cut + self.right.sites() + 2;
        let (energy, ground_state) = self.solve_ground_state()?;
        let report = self.grow(Side::Left, &ground_state, states)?;

        let record = StepRecord {
            chain_size,
            cut,
            energy,
            entropy: report.entropy,
            truncation_error: report.truncation_error,
        };
        self.trace.record(record);
        Ok(record)
    }

    /// One step of the symmetric infinite algorithm: both blocks grow from
    /// the same ground state. Twice the truncation cost per step, but the
    /// cut sits at the chain center throughout.
    ///
    /// Returns the step record (with the left side's entropy) and the right
    /// side's growth report; at a symmetric cut the two must agree.
    pub fn symmetric_infinite_dmrg_step(
        &mut self,
        states: usize,
    ) -> Result<(StepRecord, GrowthReport)> {
        let cut = self.left.sites();
        let chain_size = cut + self.right.sites() + 2;
        let (energy, ground_state) = self.solve_ground_state()?;
        let left_report = self.grow(Side::Left, &ground_state, states)?;
        let right_report = self.grow(Side::Right, &ground_state, states)?;

        let record = StepRecord {
            chain_size,
            cut,
            energy,
            entropy: left_report.entropy,
            truncation_error: left_report.truncation_error,
        };
        self.trace.record(record);
        Ok((record, right_report))
    }

    /// One step of the finite algorithm at a fixed chain length: read both
    /// blocks back from storage for the requested partition, solve, and grow
    /// the sweeping side.
    pub fn finite_dmrg_step(
        &mut self,
        growing: Side,
        left_size: usize,
        states: usize,
    ) -> Result<StepRecord> {
        let n = self.params.number_of_sites;
        if left_size < 1 || left_size + 2 >= n {
            return Err(DmrgError::DegenerateSchedule {
                start: 1,
                end: n.saturating_sub(3),
            });
        }
        let right_size = n - left_size - 2;

        self.left = self
            .left_store
            .get(&left_size)
            .cloned()
            .ok_or(DmrgError::MissingStoredBlock {
                side: Side::Left,
                sites: left_size,
            })?;
        self.right = self
            .right_store
            .get(&right_size)
            .cloned()
            .ok_or(DmrgError::MissingStoredBlock {
                side: Side::Right,
                sites: right_size,
            })?;

        let (energy, ground_state) = self.solve_ground_state()?;
        let report = self.grow(growing, &ground_state, states)?;

        let record = StepRecord {
            chain_size: n,
            cut: left_size,
            energy,
            entropy: report.entropy,
            truncation_error: report.truncation_error,
        };
        self.trace.record(record);
        Ok(record)
    }

    /// Asymmetric infinite algorithm: bootstrap left-block representations
    /// at every size up to `number_of_sites - 3`.
    pub fn infinite_algorithm(&mut self) -> Result<()> {
        let n = self.params.number_of_sites;
        let max_left = n - 3;
        for _ in 1..=max_left {
            let record = self.infinite_dmrg_step(self.params.infinite_states)?;
            info!(
                "infinite step: {} sites, E = {:.12}, S = {:.6}, eps = {:.3e}",
                record.chain_size, record.energy, record.entropy, record.truncation_error
            );
        }
        Ok(())
    }

    /// Symmetric infinite algorithm: grow both blocks until the superblock
    /// spans the whole chain. A standalone strategy; it does not seed the
    /// finite algorithm, which reads asymmetric storage.
    pub fn infinite_algorithm_symmetric(&mut self, states: usize) -> Result<()> {
        let n = self.params.number_of_sites;
        let mut chain_size = self.left.sites() + self.right.sites() + 2;
        while chain_size <= n {
            let (record, _) = self.symmetric_infinite_dmrg_step(states)?;
            info!(
                "symmetric infinite step: {} sites, E = {:.12}, S = {:.6}",
                record.chain_size, record.energy, record.entropy
            );
            chain_size = self.left.sites() + self.right.sites() + 2;
        }
        Ok(())
    }

    /// Finite algorithm: sweep at fixed chain length under the states-kept
    /// schedule until the schedule is consumed.
    pub fn finite_algorithm(&mut self) -> Result<()> {
        let schedule = states_to_keep(
            self.params.infinite_states,
            self.params.effective_states_to_keep(),
            self.params.sweeps,
        )?;
        let mut controller = SweepController::new(self.params.number_of_sites, schedule)?;

        let mut current_half_sweep = 0;
        while let Some(step) = controller.next_step() {
            if step.half_sweep != current_half_sweep {
                current_half_sweep = step.half_sweep;
                info!(
                    "half-sweep {} begins, keeping {} states",
                    step.half_sweep, step.states
                );
            }
            let record = self.finite_dmrg_step(step.growing, step.left_size, step.states)?;
            info!(
                "finite step: cut {} growing {}, E = {:.12}, eps = {:.3e}",
                record.cut, step.growing, record.energy, record.truncation_error
            );
        }
        Ok(())
    }
}
