//! Placement scoring and legality predicates for one greedy attempt.

use crate::partition::Squad;
use crate::requirement::DerivedModel;
use crate::roster::{Character, Role};

/// Bonus for supplying a squad's still-missing critical role.
const CRITICAL_ROLE_BONUS: i64 = 1000;
/// Bonus for being the first carrier of a tracked ability in a squad.
const FIRST_COVERAGE_BONUS: i64 = 200;
/// Bonus for joining a squad that still has cap room for the ability.
const ROOM_BONUS: i64 = 30;

/// Scores how attractive `squad` is for `character`. Higher is better;
/// the free-slot count acts as a small tie-break favoring emptier squads.
pub(super) fn score(
    squad: &Squad,
    character: &Character,
    critical_role: Role,
    model: &DerivedModel,
) -> i64 {
    let mut score = 0;

    if character.role == critical_role && !squad.has_role(critical_role) {
        score += CRITICAL_ROLE_BONUS;
    }

    for req in &model.requirements {
        if !character.carries(&req.name, req.level) {
            continue;
        }
        let usage = squad.carrier_count(&req.name, req.level);
        if usage == 0 {
            score += FIRST_COVERAGE_BONUS;
        } else if usage < req.per_group_cap {
            score += ROOM_BONUS;
        }
    }

    score + squad.free_slots() as i64
}

/// Returns true if `character` may legally join `squad`.
///
/// A placement that would push an ability past its per-squad cap is allowed
/// only while the ability's global overflow budget has unconsumed units;
/// checking does not consume anything, [`place`] does.
pub(super) fn can_place(
    squad: &Squad,
    character: &Character,
    model: &DerivedModel,
    used_overflow: &[u32],
) -> bool {
    if squad.is_full() {
        return false;
    }
    if squad.has_account(&character.account) {
        return false;
    }

    for (idx, req) in model.requirements.iter().enumerate() {
        if !character.carries(&req.name, req.level) {
            continue;
        }
        let next = squad.carrier_count(&req.name, req.level) + 1;
        if next > req.per_group_cap && used_overflow[idx] >= req.allowed_overflow {
            return false;
        }
    }

    true
}

/// Adds `character` to `squad`, consuming one overflow unit for every
/// tracked ability this placement pushes past its cap. Callers must have
/// checked [`can_place`] first.
pub(super) fn place(
    squad: &mut Squad,
    character: &Character,
    model: &DerivedModel,
    used_overflow: &mut [u32],
) {
    for (idx, req) in model.requirements.iter().enumerate() {
        if !character.carries(&req.name, req.level) {
            continue;
        }
        if squad.carrier_count(&req.name, req.level) + 1 > req.per_group_cap {
            used_overflow[idx] += 1;
            tracing::debug!(
                ability = %req.name,
                used = used_overflow[idx],
                allowed = req.allowed_overflow,
                "overflow unit consumed"
            );
        }
    }
    squad.push(character.clone());
}
