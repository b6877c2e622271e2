//! One randomized greedy construction attempt.
//!
//! An attempt either places every character or dies; partial placements are
//! discarded by the caller, which simply starts the next attempt with fresh
//! shuffles. Every placement in every phase goes through the legality
//! predicate, so a completed attempt respects account uniqueness and the
//! cap/overflow budget by construction.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;

use super::scoring::{can_place, place, score};
use crate::partition::Squad;
use crate::requirement::DerivedModel;
use crate::roster::{Character, Role};

/// Runs a single attempt. Returns the finished squads, or `None` if some
/// character could not be placed anywhere.
pub(super) fn run_attempt<R: Rng>(
    rng: &mut R,
    roster: &[Character],
    group_size: usize,
    critical_role: Role,
    model: &DerivedModel,
) -> Option<Vec<Squad>> {
    let mut squads: Vec<Squad> = (0..model.group_count)
        .map(|_| Squad::new(group_size))
        .collect();
    let mut used_overflow = vec![0u32; model.requirements.len()];
    let mut placed: HashSet<&str> = HashSet::with_capacity(roster.len());

    // Phase 1: critical-role characters, shuffled. A character no squad
    // accepts here is left for the final pass rather than force-placed.
    let mut critical: Vec<&Character> = roster
        .iter()
        .filter(|c| c.role == critical_role)
        .collect();
    critical.shuffle(rng);
    for c in critical {
        try_place_ranked(&mut squads, c, critical_role, model, &mut used_overflow, &mut placed);
    }

    // Phase 2: spread the carriers of each tracked ability.
    for req in &model.requirements {
        let mut carriers: Vec<&Character> = roster
            .iter()
            .filter(|c| !placed.contains(c.id.as_str()) && c.carries(&req.name, req.level))
            .collect();
        carriers.shuffle(rng);
        for c in carriers {
            try_place_ranked(&mut squads, c, critical_role, model, &mut used_overflow, &mut placed);
        }
    }

    // Phase 3: everyone still unplaced. Here a dead end kills the attempt.
    let mut remaining: Vec<&Character> = roster
        .iter()
        .filter(|c| !placed.contains(c.id.as_str()))
        .collect();
    remaining.shuffle(rng);
    for c in remaining {
        if !try_place_ranked(&mut squads, c, critical_role, model, &mut used_overflow, &mut placed)
        {
            return None;
        }
    }

    Some(squads)
}

/// Ranks squads for `character` by score (descending, stable) and places it
/// into the best one that accepts it. Returns false if none does.
fn try_place_ranked<'a>(
    squads: &mut [Squad],
    character: &'a Character,
    critical_role: Role,
    model: &DerivedModel,
    used_overflow: &mut [u32],
    placed: &mut HashSet<&'a str>,
) -> bool {
    let mut ranked: Vec<usize> = (0..squads.len()).collect();
    ranked.sort_by_key(|&i| -score(&squads[i], character, critical_role, model));

    for i in ranked {
        if can_place(&squads[i], character, model, used_overflow) {
            place(&mut squads[i], character, model, used_overflow);
            placed.insert(character.id.as_str());
            return true;
        }
    }
    false
}
