//! Exhaustive backtracking solver for strictly-validated setups.
//!
//! Where the greedy solver balances soft caps, this one enforces a rigid
//! rule set: a fixed squad count and size, a designated critical role whose
//! holder must also meet every mandatory ability requirement, and strictly
//! unique accounts. It enumerates size-`group_size` member combinations in
//! canonical index order for each squad slot in turn, backtracking when a
//! choice leaves a later squad unfillable. Tractable only for small
//! rosters; correct whenever the constraints are rigid rather than
//! capacity-bounded.

mod combinations;

use combinations::Combinations;

use super::SolveError;
use crate::requirement::AbilityRequirement;
use crate::roster::{Character, Role};

/// Rule set for one exact solve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExactRules {
    pub group_count: usize,
    pub group_size: usize,
    /// Role each squad must contain at least once.
    pub critical_role: Role,
    /// Requirements the critical-role member must personally meet. A
    /// single-element list is the common case.
    pub mandatory: Vec<AbilityRequirement>,
}

/// One solved squad with the mandatory abilities it covers.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolvedSquad {
    /// 1-based squad index.
    pub index: usize,
    pub members: Vec<Character>,
    pub covered: Vec<String>,
}

/// Outcome of an exact solve. Infeasibility is reported here, never as an
/// error: `success` is false, `missing` names the mandatory abilities no
/// accepted squad covers, and `errors` carries human-readable detail.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolverReport {
    pub success: bool,
    pub groups: Vec<SolvedSquad>,
    pub missing: Vec<String>,
    pub errors: Vec<String>,
}

/// Backtracking solver over index-ordered member combinations.
pub struct ExactSolver {
    rules: ExactRules,
}

impl ExactSolver {
    pub fn new(rules: ExactRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &ExactRules {
        &self.rules
    }

    /// Searches the full combination space.
    ///
    /// Input errors fail fast; an exhausted search space is reported through
    /// the returned [`SolverReport`].
    pub fn solve(&self, roster: &[Character]) -> Result<SolverReport, SolveError> {
        super::validate_inputs(roster, self.rules.group_size, &self.rules.mandatory)?;
        if self.rules.group_count == 0 {
            return Err(SolveError::InvalidGroupCount(self.rules.group_count));
        }

        let needed = self.rules.group_count * self.rules.group_size;
        if roster.len() < needed {
            return Ok(self.infeasible(vec![format!(
                "roster too small: {} characters for {} squads of {}",
                roster.len(),
                self.rules.group_count,
                self.rules.group_size
            )]));
        }

        let mut used = vec![false; roster.len()];
        let mut chosen: Vec<Vec<usize>> = Vec::with_capacity(self.rules.group_count);
        let mut backtracks = 0u64;

        let found = self.search(roster, 0, &mut used, &mut chosen, &mut backtracks);
        tracing::debug!(backtracks, found, "exact search finished");

        if found {
            let groups = chosen
                .iter()
                .enumerate()
                .map(|(i, picks)| {
                    let members: Vec<Character> =
                        picks.iter().map(|&p| roster[p].clone()).collect();
                    let covered = self
                        .rules
                        .mandatory
                        .iter()
                        .filter(|m| members.iter().any(|c| c.carries(&m.name, m.level)))
                        .map(|m| m.name.clone())
                        .collect();
                    SolvedSquad {
                        index: i + 1,
                        members,
                        covered,
                    }
                })
                .collect();
            Ok(SolverReport {
                success: true,
                groups,
                missing: Vec::new(),
                errors: Vec::new(),
            })
        } else {
            let mut errors = vec!["no squad assignment satisfies the constraints".to_string()];
            for m in &self.rules.mandatory {
                errors.push(format!(
                    "required ability {} (level {}) not covered",
                    m.name, m.level
                ));
            }
            Ok(self.infeasible(errors))
        }
    }

    fn infeasible(&self, errors: Vec<String>) -> SolverReport {
        SolverReport {
            success: false,
            groups: Vec::new(),
            missing: self
                .rules
                .mandatory
                .iter()
                .map(|m| m.name.clone())
                .collect(),
            errors,
        }
    }

    /// Fills squad slots in order, one combination of unused characters per
    /// slot, undoing the last acceptance whenever no later slot can be
    /// completed.
    fn search(
        &self,
        roster: &[Character],
        depth: usize,
        used: &mut [bool],
        chosen: &mut Vec<Vec<usize>>,
        backtracks: &mut u64,
    ) -> bool {
        if depth == self.rules.group_count {
            return true;
        }

        let available: Vec<usize> = (0..roster.len()).filter(|&i| !used[i]).collect();

        for combo in Combinations::new(available.len(), self.rules.group_size) {
            let picks: Vec<usize> = combo.iter().map(|&j| available[j]).collect();
            if !self.valid_squad(roster, &picks) {
                continue;
            }

            for &p in &picks {
                used[p] = true;
            }
            chosen.push(picks.clone());

            if self.search(roster, depth + 1, used, chosen, backtracks) {
                return true;
            }

            chosen.pop();
            for &p in &picks {
                used[p] = false;
            }
            *backtracks += 1;
        }

        false
    }

    /// A squad is valid iff some critical-role member meets every mandatory
    /// requirement and no account appears twice.
    fn valid_squad(&self, roster: &[Character], picks: &[usize]) -> bool {
        let anchored = picks.iter().any(|&p| {
            roster[p].role == self.rules.critical_role
                && self
                    .rules
                    .mandatory
                    .iter()
                    .all(|m| roster[p].carries(&m.name, m.level))
        });
        if !anchored {
            return false;
        }

        for (i, &a) in picks.iter().enumerate() {
            for &b in &picks[i + 1..] {
                if roster[a].account == roster[b].account {
                    return false;
                }
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chr(id: u32, account: &str, role: Role) -> Character {
        Character::new(id.to_string(), format!("c{id}"), account, role)
    }

    fn rules(group_count: usize, group_size: usize) -> ExactRules {
        ExactRules {
            group_count,
            group_size,
            critical_role: Role::Healer,
            mandatory: vec![AbilityRequirement::new("Mend", 9)],
        }
    }

    #[test]
    fn finds_a_valid_assignment() {
        // Two squads of two; the healers must split so each squad keeps an
        // anchor.
        let roster = vec![
            chr(1, "a", Role::Healer).with_ability("Mend", 9),
            chr(2, "b", Role::Dps),
            chr(3, "c", Role::Healer).with_ability("Mend", 10),
            chr(4, "d", Role::Dps),
        ];
        let report = ExactSolver::new(rules(2, 2)).solve(&roster).unwrap();

        assert!(report.success);
        assert_eq!(report.groups.len(), 2);
        for squad in &report.groups {
            assert_eq!(squad.members.len(), 2);
            assert!(squad
                .members
                .iter()
                .any(|c| c.role == Role::Healer && c.carries("Mend", 9)));
            assert_eq!(squad.covered, vec!["Mend".to_string()]);
        }
        assert!(report.missing.is_empty());
        assert!(report.errors.is_empty());
    }

    #[test]
    fn first_solution_follows_index_order() {
        // Several valid assignments exist. Pairing both healers into squad 1
        // is enumerated first but leaves squad 2 without an anchor, so the
        // first full success pairs healer 1 with the lowest-index partner.
        let roster = vec![
            chr(1, "a", Role::Healer).with_ability("Mend", 9),
            chr(2, "b", Role::Healer).with_ability("Mend", 9),
            chr(3, "c", Role::Dps),
            chr(4, "d", Role::Dps),
        ];
        let report = ExactSolver::new(rules(2, 2)).solve(&roster).unwrap();

        assert!(report.success);
        let ids: Vec<Vec<&str>> = report
            .groups
            .iter()
            .map(|g| g.members.iter().map(|c| c.id.as_str()).collect())
            .collect();
        assert_eq!(ids, vec![vec!["1", "3"], vec!["2", "4"]]);
    }

    #[test]
    fn no_valid_anchor_reports_missing_and_errors() {
        // Healers exist but none carries Mend at the threshold.
        let roster = vec![
            chr(1, "a", Role::Healer).with_ability("Mend", 5),
            chr(2, "b", Role::Dps),
            chr(3, "c", Role::Healer),
            chr(4, "d", Role::Dps),
        ];
        let report = ExactSolver::new(rules(2, 2)).solve(&roster).unwrap();

        assert!(!report.success);
        assert!(report.groups.is_empty());
        assert_eq!(report.missing, vec!["Mend".to_string()]);
        assert!(!report.errors.is_empty());
    }

    #[test]
    fn duplicate_accounts_force_the_unique_assignment() {
        // Each healer shares an account with one DPS, so the only valid
        // pairing is cross-account: healer 1 with DPS 4, healer 3 with
        // DPS 2. Reaching it requires undoing the earlier two-healer pick.
        let roster = vec![
            chr(1, "a", Role::Healer).with_ability("Mend", 9),
            chr(2, "a", Role::Dps),
            chr(3, "b", Role::Healer).with_ability("Mend", 9),
            chr(4, "b", Role::Dps),
        ];
        let report = ExactSolver::new(rules(2, 2)).solve(&roster).unwrap();

        assert!(report.success);
        let ids: Vec<Vec<&str>> = report
            .groups
            .iter()
            .map(|g| g.members.iter().map(|c| c.id.as_str()).collect())
            .collect();
        assert_eq!(ids, vec![vec!["1", "4"], vec!["2", "3"]]);
        for squad in &report.groups {
            let mut accounts: Vec<&str> =
                squad.members.iter().map(|c| c.account.as_str()).collect();
            accounts.sort();
            accounts.dedup();
            assert_eq!(accounts.len(), squad.members.len());
        }
    }

    #[test]
    fn undersized_roster_is_infeasible_not_an_error() {
        let roster = vec![chr(1, "a", Role::Healer).with_ability("Mend", 9)];
        let report = ExactSolver::new(rules(2, 2)).solve(&roster).unwrap();
        assert!(!report.success);
        assert!(report.errors[0].contains("roster too small"));
    }

    #[test]
    fn empty_roster_is_an_input_error() {
        assert_eq!(
            ExactSolver::new(rules(1, 2)).solve(&[]),
            Err(SolveError::EmptyRoster)
        );
    }

    #[test]
    fn multiple_mandatory_requirements_must_share_an_anchor() {
        let mut r = rules(1, 2);
        r.mandatory = vec![
            AbilityRequirement::new("Mend", 9),
            AbilityRequirement::new("Cleanse", 9),
        ];

        // A healer with only one of the two abilities is not a valid anchor.
        let partial = vec![
            chr(1, "a", Role::Healer).with_ability("Mend", 9),
            chr(2, "b", Role::Dps).with_ability("Cleanse", 9),
        ];
        let report = ExactSolver::new(r.clone()).solve(&partial).unwrap();
        assert!(!report.success);

        let complete = vec![
            chr(1, "a", Role::Healer)
                .with_ability("Mend", 9)
                .with_ability("Cleanse", 9),
            chr(2, "b", Role::Dps),
        ];
        let report = ExactSolver::new(r).solve(&complete).unwrap();
        assert!(report.success);
    }
}
