//! Ability requirements and the derived per-solve constraint model.
//!
//! A requirement tracks one scarce ability at a threshold level. The weekly
//! availability computation upstream decides which requirements are enabled;
//! disabled requirements are ignored entirely without removing the data.
//!
//! [`DerivedModel::derive`] turns the roster plus the enabled requirements
//! into the numbers the solvers work with: how many squads exist, how many
//! carriers each ability has, and how many squads are permitted to exceed
//! the per-squad cap because perfect distribution is numerically impossible.

use crate::roster::Character;

/// Default per-squad cap on carriers of one tracked ability.
pub const DEFAULT_PER_GROUP_CAP: u32 = 2;

/// One tracked ability requirement.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilityRequirement {
    pub name: String,
    /// A character carries the ability only if its level is >= this.
    pub level: u32,
    pub per_group_cap: u32,
    pub enabled: bool,
    /// Marks the requirement as part of the hard-checked weekly core set.
    /// Carried through to diagnostics; enforcement is identical either way.
    pub core: bool,
}

impl AbilityRequirement {
    pub fn new(name: impl Into<String>, level: u32) -> Self {
        Self {
            name: name.into(),
            level,
            per_group_cap: DEFAULT_PER_GROUP_CAP,
            enabled: true,
            core: false,
        }
    }

    pub fn with_cap(mut self, cap: u32) -> Self {
        self.per_group_cap = cap;
        self
    }

    pub fn core(mut self) -> Self {
        self.core = true;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Converts a weekly availability checklist into requirements, keeping
    /// only the entries marked available.
    pub fn from_checklist(entries: &[ChecklistEntry]) -> Vec<Self> {
        entries
            .iter()
            .filter(|e| e.available)
            .map(|e| AbilityRequirement::new(e.name.clone(), e.level))
            .collect()
    }
}

/// One row of the weekly availability checklist produced upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChecklistEntry {
    pub name: String,
    pub level: u32,
    pub available: bool,
}

/// A requirement annotated with roster-wide carrier statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedRequirement {
    pub name: String,
    pub level: u32,
    pub per_group_cap: u32,
    pub core: bool,
    /// Characters in the roster carrying the ability at/above `level`.
    pub carriers: u32,
    /// Squads globally permitted to exceed `per_group_cap`:
    /// `max(0, carriers - group_count * per_group_cap)`.
    pub allowed_overflow: u32,
}

/// Constraint model derived from one roster + requirement list.
///
/// Deriving never fails: an empty roster yields `group_count = 1` and no
/// carriers anywhere. Callers must run their own input validation before
/// handing the model to a solver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedModel {
    pub group_count: usize,
    pub requirements: Vec<DerivedRequirement>,
}

impl DerivedModel {
    /// Derives the model for `roster` split into squads of `group_size`.
    ///
    /// Disabled requirements are dropped here and never seen by a solver.
    /// `group_size` values below 1 are treated as 1.
    pub fn derive(
        roster: &[Character],
        group_size: usize,
        requirements: &[AbilityRequirement],
    ) -> Self {
        let group_size = group_size.max(1);
        let group_count = roster.len().div_ceil(group_size).max(1);

        let requirements = requirements
            .iter()
            .filter(|r| r.enabled)
            .map(|r| {
                let carriers = roster
                    .iter()
                    .filter(|c| c.carries(&r.name, r.level))
                    .count() as u32;
                let allowed_overflow =
                    carriers.saturating_sub(group_count as u32 * r.per_group_cap);
                DerivedRequirement {
                    name: r.name.clone(),
                    level: r.level,
                    per_group_cap: r.per_group_cap,
                    core: r.core,
                    carriers,
                    allowed_overflow,
                }
            })
            .collect::<Vec<_>>();

        for r in &requirements {
            tracing::debug!(
                ability = %r.name,
                level = r.level,
                carriers = r.carriers,
                cap = r.per_group_cap,
                allowed_overflow = r.allowed_overflow,
                "derived requirement"
            );
        }

        Self {
            group_count,
            requirements,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.requirements.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::Role;

    fn carrier(id: u32, account: &str, level: u32) -> Character {
        Character::new(id.to_string(), format!("c{id}"), account, Role::Dps)
            .with_ability("Wolfsbane", level)
    }

    #[test]
    fn group_count_rounds_up_and_never_zero() {
        let roster: Vec<Character> = (0..7).map(|i| carrier(i, &format!("a{i}"), 0)).collect();
        let model = DerivedModel::derive(&roster, 3, &[]);
        assert_eq!(model.group_count, 3);

        let model = DerivedModel::derive(&[], 3, &[]);
        assert_eq!(model.group_count, 1);
    }

    #[test]
    fn overflow_is_clamped_at_zero() {
        // 4 carriers, 3 squads, cap 2 -> 4 - 6 clamps to 0.
        let mut roster: Vec<Character> =
            (0..4).map(|i| carrier(i, &format!("a{i}"), 10)).collect();
        roster.extend((4..9).map(|i| carrier(i, &format!("a{i}"), 0)));

        let req = AbilityRequirement::new("Wolfsbane", 10);
        let model = DerivedModel::derive(&roster, 3, &[req]);
        assert_eq!(model.requirements[0].carriers, 4);
        assert_eq!(model.requirements[0].allowed_overflow, 0);
    }

    #[test]
    fn overflow_counts_excess_carriers() {
        // 8 carriers, 3 squads, cap 2 -> 2 squads may run over.
        let roster: Vec<Character> =
            (0..8).map(|i| carrier(i, &format!("a{i}"), 10)).collect();

        let req = AbilityRequirement::new("Wolfsbane", 10);
        let model = DerivedModel::derive(&roster, 3, &[req]);
        assert_eq!(model.group_count, 3);
        assert_eq!(model.requirements[0].allowed_overflow, 2);
    }

    #[test]
    fn derive_is_idempotent() {
        let roster: Vec<Character> =
            (0..6).map(|i| carrier(i, &format!("a{i}"), 10)).collect();
        let reqs = vec![AbilityRequirement::new("Wolfsbane", 9).with_cap(1)];

        let a = DerivedModel::derive(&roster, 2, &reqs);
        let b = DerivedModel::derive(&roster, 2, &reqs);
        assert_eq!(a, b);
    }

    #[test]
    fn disabled_requirements_are_dropped() {
        let roster = vec![carrier(0, "a0", 10)];
        let reqs = vec![
            AbilityRequirement::new("Wolfsbane", 10).disabled(),
            AbilityRequirement::new("Ignite", 9),
        ];
        let model = DerivedModel::derive(&roster, 3, &reqs);
        assert_eq!(model.requirements.len(), 1);
        assert_eq!(model.requirements[0].name, "Ignite");
    }

    #[test]
    fn checklist_keeps_available_entries() {
        let entries = vec![
            ChecklistEntry {
                name: "Ignite".into(),
                level: 9,
                available: true,
            },
            ChecklistEntry {
                name: "Wolfsbane".into(),
                level: 10,
                available: false,
            },
        ];
        let reqs = AbilityRequirement::from_checklist(&entries);
        assert_eq!(reqs.len(), 1);
        assert_eq!(reqs[0].name, "Ignite");
        assert!(reqs[0].enabled);
        assert_eq!(reqs[0].per_group_cap, DEFAULT_PER_GROUP_CAP);
    }
}
