//! Solving strategies and their shared seam.
//!
//! Every solver consumes a fully materialized roster plus requirement list
//! and produces an in-memory result; nothing here performs I/O or suspends.
//! Input validation is shared: the conditions in [`SolveError`] fail fast,
//! everything past them degrades to a best-available partition with an
//! explicit violation list.

pub mod exact;
pub mod fallback;
pub mod greedy;

pub use exact::{ExactRules, ExactSolver, SolvedSquad, SolverReport};
pub use fallback::round_robin;
pub use greedy::GreedySolver;

use thiserror::Error;

use crate::partition::Partition;
use crate::requirement::AbilityRequirement;
use crate::roster::{Character, Role};

/// Attempt budget for the greedy multi-restart solver.
pub const MAX_ATTEMPTS: usize = 1600;

/// Input errors shared by the solvers. These are the only caller-visible
/// hard failures; a solver that cannot find a feasible partition reports
/// that through its result type instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SolveError {
    #[error("roster is empty")]
    EmptyRoster,

    #[error("group size must be at least 1, got {0}")]
    InvalidGroupSize(usize),

    #[error("group count must be at least 1, got {0}")]
    InvalidGroupCount(usize),

    #[error("requirement `{name}` is malformed: {reason}")]
    MalformedRequirement { name: String, reason: String },
}

/// A solver that turns a roster + requirement list into a partition.
///
/// The trait is the seam between the solvers and the fairness auditor: the
/// auditor re-solves through it, and tests substitute stub implementations.
pub trait PartitionSolver {
    fn solve(
        &mut self,
        roster: &[Character],
        requirements: &[AbilityRequirement],
    ) -> Result<Partition, SolveError>;
}

/// Configuration shared by the greedy solver and the fallback partitioner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverConfig {
    /// Target squad size.
    pub group_size: usize,
    /// Role every squad must contain at least once.
    pub critical_role: Role,
    /// Greedy restart budget.
    pub max_attempts: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            group_size: 3,
            critical_role: Role::Healer,
            max_attempts: MAX_ATTEMPTS,
        }
    }
}

/// Fail-fast validation applied before any solving starts.
pub(crate) fn validate_inputs(
    roster: &[Character],
    group_size: usize,
    requirements: &[AbilityRequirement],
) -> Result<(), SolveError> {
    if roster.is_empty() {
        return Err(SolveError::EmptyRoster);
    }
    if group_size == 0 {
        return Err(SolveError::InvalidGroupSize(group_size));
    }
    for r in requirements {
        if r.name.is_empty() {
            return Err(SolveError::MalformedRequirement {
                name: r.name.clone(),
                reason: "empty ability name".into(),
            });
        }
        if r.per_group_cap == 0 {
            return Err(SolveError::MalformedRequirement {
                name: r.name.clone(),
                reason: "per-squad cap must be at least 1".into(),
            });
        }
    }
    Ok(())
}
