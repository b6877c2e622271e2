//! Deterministic round-robin fallback partitioner.
//!
//! Used when the greedy solver exhausts its attempt budget. Placement is
//! strict round-robin over the unshuffled roster, so every character is
//! placed exactly once, but nothing beyond squad capacity is guaranteed:
//! the resulting partition's violation list is likely non-empty and callers
//! must treat it that way.

use super::SolverConfig;
use crate::partition::{Partition, PartitionSource, Squad};
use crate::requirement::{AbilityRequirement, DerivedModel};
use crate::roster::Character;

/// Assigns character `i` to squad `i % group_count`.
///
/// Never fails; violations are surfaced through the returned partition.
pub fn round_robin(
    roster: &[Character],
    config: &SolverConfig,
    requirements: &[AbilityRequirement],
) -> Partition {
    let model = DerivedModel::derive(roster, config.group_size, requirements);

    let mut squads: Vec<Squad> = (0..model.group_count)
        .map(|_| Squad::new(config.group_size))
        .collect();
    for (i, character) in roster.iter().enumerate() {
        squads[i % model.group_count].push(character.clone());
    }

    Partition::from_squads(
        squads,
        config.critical_role,
        &model,
        PartitionSource::RoundRobin,
    )
}
