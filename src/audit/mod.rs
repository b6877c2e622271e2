//! Post-hoc fairness auditing with a bounded re-solve loop.
//!
//! The per-placement scoring optimizes each squad in isolation; two
//! distributional properties are checked only after a partition is complete:
//!
//! - **Flagged characters** (rule A): a designated set of characters must
//!   not share a squad.
//! - **Watched abilities** (rule B): for each high-value ability at a fixed
//!   level, if the partition holds more carriers than half the squad count
//!   but fewer than the squad count, no squad may hold two; if the carrier
//!   count equals the squad count, every squad must hold exactly one.
//!
//! A violated rule triggers a full re-solve through the configured
//! [`PartitionSolver`] - never an in-place patch - at most [`MAX_RERUNS`]
//! times per job. Past the bound, the last partition is returned as-is with
//! the outstanding findings attached.
//!
//! The rerun count is owned by the caller through [`RerunLedger`], keyed by
//! job id. A concurrent host must wrap the ledger in its own
//! synchronization; two simultaneous audits of the same job id would race
//! on the counter.

use std::collections::{HashMap, HashSet};

use crate::partition::Partition;
use crate::requirement::AbilityRequirement;
use crate::roster::Character;
use crate::solver::{PartitionSolver, SolveError};
use crate::Id;

/// Maximum full re-solves per job before the audit gives up.
pub const MAX_RERUNS: u32 = 5;

/// A high-value ability watched by rule B.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WatchedAbility {
    pub name: String,
    /// Carrier threshold; a member counts if its level is >= this.
    pub level: u32,
}

/// Configuration of the fairness rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FairnessRules {
    /// Character ids that must not share a squad (rule A).
    pub flagged: HashSet<Id>,
    /// Abilities whose carriers must spread across squads (rule B).
    pub watched: Vec<WatchedAbility>,
}

/// Caller-owned rerun counters, keyed by job id.
///
/// Job ids are whatever identity the caller schedules under (a schedule id,
/// a week key); [`crate::generate_id`] serves callers that have none.
#[derive(Debug, Clone, Default)]
pub struct RerunLedger {
    counts: HashMap<Id, u32>,
}

impl RerunLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-solves consumed so far for `job`.
    pub fn count(&self, job: &str) -> u32 {
        self.counts.get(job).copied().unwrap_or(0)
    }

    fn bump(&mut self, job: &str) -> u32 {
        let count = self.counts.entry(job.to_string()).or_insert(0);
        *count += 1;
        *count
    }
}

/// Result of one audit run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditOutcome {
    /// All fairness rules pass.
    Accepted(Partition),
    /// The rerun budget ran out with rules still violated; the partition is
    /// the last one produced and `unresolved` lists the open findings.
    AcceptedWithWarning {
        partition: Partition,
        unresolved: Vec<String>,
    },
}

impl AuditOutcome {
    pub fn partition(&self) -> &Partition {
        match self {
            AuditOutcome::Accepted(p) => p,
            AuditOutcome::AcceptedWithWarning { partition, .. } => partition,
        }
    }

    pub fn into_partition(self) -> Partition {
        match self {
            AuditOutcome::Accepted(p) => p,
            AuditOutcome::AcceptedWithWarning { partition, .. } => partition,
        }
    }

    pub fn is_clean(&self) -> bool {
        matches!(self, AuditOutcome::Accepted(_))
    }
}

/// Checks completed partitions against the fairness rules and drives the
/// bounded re-solve loop.
pub struct FairnessAuditor {
    rules: FairnessRules,
}

impl FairnessAuditor {
    pub fn new(rules: FairnessRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &FairnessRules {
        &self.rules
    }

    /// Pure rule check: returns the findings for `partition`, empty if all
    /// rules pass. Does not touch the ledger.
    pub fn review(&self, partition: &Partition) -> Vec<String> {
        let mut findings = Vec::new();
        self.check_flagged(partition, &mut findings);
        self.check_watched(partition, &mut findings);
        findings
    }

    /// Audits `partition`, re-solving through `solver` while rules are
    /// violated and the job's rerun budget lasts.
    ///
    /// Every re-solve is a brand-new full solve with the same inputs; the
    /// previous partition is discarded, never patched.
    pub fn audit<S: PartitionSolver>(
        &self,
        job: &str,
        partition: Partition,
        solver: &mut S,
        roster: &[Character],
        requirements: &[AbilityRequirement],
        ledger: &mut RerunLedger,
    ) -> Result<AuditOutcome, SolveError> {
        let mut current = partition;

        loop {
            let findings = self.review(&current);
            if findings.is_empty() {
                tracing::debug!(job, reruns = ledger.count(job), "fairness audit passed");
                return Ok(AuditOutcome::Accepted(current));
            }

            if ledger.count(job) >= MAX_RERUNS {
                tracing::warn!(
                    job,
                    reruns = ledger.count(job),
                    findings = findings.len(),
                    "fairness violations unresolved after rerun limit"
                );
                return Ok(AuditOutcome::AcceptedWithWarning {
                    partition: current,
                    unresolved: findings,
                });
            }

            let rerun = ledger.bump(job);
            tracing::info!(job, rerun, finding = %findings[0], "fairness rule violated, re-solving");
            current = solver.solve(roster, requirements)?;
        }
    }

    fn check_flagged(&self, partition: &Partition, findings: &mut Vec<String>) {
        if self.rules.flagged.is_empty() {
            return;
        }
        for (i, squad) in partition.squads().iter().enumerate() {
            let count = squad
                .members()
                .iter()
                .filter(|c| self.rules.flagged.contains(&c.id))
                .count();
            if count > 1 {
                findings.push(format!("squad {}: {count} flagged characters", i + 1));
            }
        }
    }

    fn check_watched(&self, partition: &Partition, findings: &mut Vec<String>) {
        let squad_count = partition.squads().len();
        if squad_count == 0 {
            return;
        }

        for watched in &self.rules.watched {
            let per_squad: Vec<u32> = partition
                .squads()
                .iter()
                .map(|s| s.carrier_count(&watched.name, watched.level))
                .collect();
            let total: u32 = per_squad.iter().sum();

            if total as usize == squad_count {
                // Enough for everyone: demand exactly one per squad.
                if let Some(i) = per_squad.iter().position(|&c| c != 1) {
                    findings.push(format!(
                        "squad {}: ability {} should appear exactly once, has {}",
                        i + 1,
                        watched.name,
                        per_squad[i]
                    ));
                }
            } else if 2 * total as usize > squad_count && (total as usize) < squad_count {
                // More than half but not enough for all: no squad may stack.
                if let Some(i) = per_squad.iter().position(|&c| c > 1) {
                    findings.push(format!(
                        "squad {}: ability {} stacked {} times",
                        i + 1,
                        watched.name,
                        per_squad[i]
                    ));
                }
            }
        }
    }
}
