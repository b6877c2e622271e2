//! Squads and partitions: the output side of a solve.
//!
//! A [`Squad`] is a pure aggregate computed during a solve attempt; it has no
//! lifecycle outside a [`Partition`]. A `Partition` is created fresh per
//! solve call and carries, next to the squads themselves, the post-hoc
//! violation scan and the list of required abilities no squad could cover.

use crate::requirement::DerivedModel;
use crate::roster::{Character, Role};


/// One squad: a capacity-bounded ordered set of characters.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Squad {
    capacity: usize,
    members: Vec<Character>,
}

impl Squad {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            members: Vec::with_capacity(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn members(&self) -> &[Character] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.members.len() >= self.capacity
    }

    pub fn free_slots(&self) -> usize {
        self.capacity.saturating_sub(self.members.len())
    }

    /// Adds a member without any constraint checking. The solvers are
    /// responsible for checking placement legality first.
    pub(crate) fn push(&mut self, character: Character) {
        self.members.push(character);
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.members.iter().any(|c| c.role == role)
    }

    pub fn has_account(&self, account: &str) -> bool {
        self.members.iter().any(|c| c.account == account)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.members.iter().any(|c| c.id == id)
    }

    /// Counts members carrying `ability` at `level` or above.
    pub fn carrier_count(&self, ability: &str, level: u32) -> u32 {
        self.members
            .iter()
            .filter(|c| c.carries(ability, level))
            .count() as u32
    }

    /// Accounts appearing more than once, each listed once, in member order.
    pub fn duplicate_accounts(&self) -> Vec<String> {
        let mut seen = Vec::new();
        let mut dups = Vec::new();
        for c in &self.members {
            if seen.contains(&c.account.as_str()) {
                if !dups.contains(&c.account) {
                    dups.push(c.account.clone());
                }
            } else {
                seen.push(c.account.as_str());
            }
        }
        dups
    }

    /// Tracked abilities this squad has zero carriers of.
    pub fn missing(&self, model: &DerivedModel) -> Vec<String> {
        model
            .requirements
            .iter()
            .filter(|r| self.carrier_count(&r.name, r.level) == 0)
            .map(|r| r.name.clone())
            .collect()
    }
}

/// How a partition was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PartitionSource {
    /// Produced by the greedy solver on the given 1-based attempt.
    Greedy { attempts: usize },
    /// Produced by the round-robin fallback after the greedy budget ran out.
    RoundRobin,
}

/// The complete assignment of characters to squads produced by one solve.
///
/// `violations` is a post-hoc audit of the finished squads, not a
/// correctness proof: the overflow mechanism can legitimately exceed
/// per-squad caps within the allowed budget, and the round-robin fallback
/// guarantees nothing beyond capacity. Callers must inspect it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Partition {
    squads: Vec<Squad>,
    violations: Vec<String>,
    unassigned: Vec<String>,
    source: PartitionSource,
}

impl Partition {
    /// Builds a partition from finished squads, re-scanning them for
    /// constraint breaches against `model` and `critical_role`.
    pub fn from_squads(
        squads: Vec<Squad>,
        critical_role: Role,
        model: &DerivedModel,
        source: PartitionSource,
    ) -> Self {
        let violations = scan_violations(&squads, critical_role, model);
        let unassigned = scan_unassigned(&squads, model);
        Self {
            squads,
            violations,
            unassigned,
            source,
        }
    }

    pub fn squads(&self) -> &[Squad] {
        &self.squads
    }

    pub fn violations(&self) -> &[String] {
        &self.violations
    }

    /// Required abilities no squad covers at all.
    pub fn unassigned(&self) -> &[String] {
        &self.unassigned
    }

    pub fn source(&self) -> PartitionSource {
        self.source
    }

    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    /// Total characters placed across all squads.
    pub fn member_count(&self) -> usize {
        self.squads.iter().map(Squad::len).sum()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.squads.iter().any(|s| s.contains(id))
    }
}

/// Scans finished squads for human-readable constraint breaches.
///
/// Reported per squad: duplicate accounts, missing critical role, members
/// over capacity, and per-ability usage above the per-squad cap. Squad
/// numbering in the messages is 1-based.
fn scan_violations(squads: &[Squad], critical_role: Role, model: &DerivedModel) -> Vec<String> {
    let mut violations = Vec::new();

    for (i, squad) in squads.iter().enumerate() {
        let label = i + 1;

        for account in squad.duplicate_accounts() {
            violations.push(format!("squad {label}: duplicate account {account}"));
        }

        if !squad.is_empty() && !squad.has_role(critical_role) {
            violations.push(format!("squad {label}: missing {critical_role}"));
        }

        if squad.len() > squad.capacity() {
            violations.push(format!(
                "squad {label}: over capacity ({}/{})",
                squad.len(),
                squad.capacity()
            ));
        }

        for req in &model.requirements {
            let usage = squad.carrier_count(&req.name, req.level);
            if usage > req.per_group_cap {
                violations.push(format!(
                    "squad {label}: ability {} over cap ({usage}/{})",
                    req.name, req.per_group_cap
                ));
            }
        }
    }

    violations
}

fn scan_unassigned(squads: &[Squad], model: &DerivedModel) -> Vec<String> {
    model
        .requirements
        .iter()
        .filter(|r| {
            squads
                .iter()
                .all(|s| s.carrier_count(&r.name, r.level) == 0)
        })
        .map(|r| r.name.clone())
        .collect()
}
