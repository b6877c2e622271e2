//! Roster inputs: characters, roles, and ability levels.
//!
//! A roster is a flat list of [`Character`] values. Characters are immutable
//! inputs to a solve; the solvers clone them into squads and never mutate
//! the originals.

use std::collections::BTreeMap;
use std::fmt;

use crate::Id;

/// Combat role of a character. The set is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Role {
    Tank,
    Dps,
    Healer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Tank => "Tank",
            Role::Dps => "DPS",
            Role::Healer => "Healer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A schedulable character.
///
/// # Invariants
///
/// - `id` uniquely identifies the character within a roster
/// - `account` identifies the owning player; two characters with the same
///   account must never end up in the same squad
/// - `ability_levels` maps ability name to level; an absent entry means
///   level 0. This map is the single canonical representation of ability
///   ownership used everywhere in the crate.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Character {
    pub id: Id,
    pub name: String,
    pub account: String,
    pub role: Role,
    pub ability_levels: BTreeMap<String, u32>,
}

impl Character {
    pub fn new(
        id: impl Into<Id>,
        name: impl Into<String>,
        account: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            account: account.into(),
            role,
            ability_levels: BTreeMap::new(),
        }
    }

    /// Sets an ability level, replacing any previous value. Builder-style.
    pub fn with_ability(mut self, ability: impl Into<String>, level: u32) -> Self {
        self.ability_levels.insert(ability.into(), level);
        self
    }

    /// Returns the level of the named ability, 0 if absent.
    pub fn level_of(&self, ability: &str) -> u32 {
        self.ability_levels.get(ability).copied().unwrap_or(0)
    }

    /// Returns true if the character carries `ability` at `level` or above.
    pub fn carries(&self, ability: &str, level: u32) -> bool {
        self.level_of(ability) >= level
    }
}

/// Per-role headcount of a roster, used for diagnostic snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RosterStats {
    pub total: usize,
    pub tanks: usize,
    pub dps: usize,
    pub healers: usize,
}

impl RosterStats {
    pub fn collect(roster: &[Character]) -> Self {
        let mut stats = Self {
            total: roster.len(),
            ..Self::default()
        };
        for c in roster {
            match c.role {
                Role::Tank => stats.tanks += 1,
                Role::Dps => stats.dps += 1,
                Role::Healer => stats.healers += 1,
            }
        }
        stats
    }

    pub fn count_of(&self, role: Role) -> usize {
        match role {
            Role::Tank => self.tanks,
            Role::Dps => self.dps,
            Role::Healer => self.healers,
        }
    }
}
