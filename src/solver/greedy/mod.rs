//! Randomized greedy multi-restart solver.
//!
//! The primary solving strategy: each attempt shuffles the roster into a
//! critical-role stream and an everyone-else stream, then builds squads with
//! scored greedy placement under a per-attempt overflow budget. The first
//! attempt that places every character wins and is returned immediately;
//! when the whole attempt budget is exhausted the solver degrades to the
//! deterministic round-robin fallback instead of failing.
//!
//! The random source is injectable so tests can pin the shuffle sequence;
//! production callers normally use [`GreedySolver::new`].

mod attempt;
mod scoring;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::{fallback, validate_inputs, PartitionSolver, SolveError, SolverConfig};
use crate::partition::{Partition, PartitionSource};
use crate::requirement::{AbilityRequirement, DerivedModel};
use crate::roster::{Character, RosterStats};

/// Dead-end attempts are logged once per this many attempts.
const LOG_INTERVAL: usize = 200;

/// Randomized greedy solver with a bounded restart budget.
pub struct GreedySolver<R: Rng> {
    config: SolverConfig,
    rng: R,
}

impl GreedySolver<SmallRng> {
    /// Creates a solver with an entropy-seeded RNG.
    pub fn new(config: SolverConfig) -> Self {
        Self::with_rng(config, SmallRng::from_entropy())
    }

    /// Creates a solver with a deterministic RNG, for reproducible runs.
    pub fn seeded(config: SolverConfig, seed: u64) -> Self {
        Self::with_rng(config, SmallRng::seed_from_u64(seed))
    }
}

impl<R: Rng> GreedySolver<R> {
    /// Creates a solver driven by the given random source.
    pub fn with_rng(config: SolverConfig, rng: R) -> Self {
        Self { config, rng }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Runs the multi-restart search.
    ///
    /// Returns a partition from the first successful attempt, or the
    /// round-robin fallback partition if every attempt dead-ends. Input
    /// errors are the only failure mode.
    pub fn solve(
        &mut self,
        roster: &[Character],
        requirements: &[AbilityRequirement],
    ) -> Result<Partition, SolveError> {
        validate_inputs(roster, self.config.group_size, requirements)?;

        let model = DerivedModel::derive(roster, self.config.group_size, requirements);
        let stats = RosterStats::collect(roster);
        tracing::debug!(
            roster = stats.total,
            healers = stats.healers,
            tanks = stats.tanks,
            dps = stats.dps,
            squads = model.group_count,
            tracked = model.requirements.len(),
            "starting greedy solve"
        );

        for attempt in 0..self.config.max_attempts {
            if let Some(squads) = attempt::run_attempt(
                &mut self.rng,
                roster,
                self.config.group_size,
                self.config.critical_role,
                &model,
            ) {
                tracing::debug!(attempt = attempt + 1, "greedy placement complete");
                return Ok(Partition::from_squads(
                    squads,
                    self.config.critical_role,
                    &model,
                    PartitionSource::Greedy {
                        attempts: attempt + 1,
                    },
                ));
            }
            if attempt % LOG_INTERVAL == 0 {
                tracing::debug!(attempt, "attempt dead-ended, restarting");
            }
        }

        tracing::warn!(
            attempts = self.config.max_attempts,
            "greedy budget exhausted, falling back to round-robin"
        );
        Ok(fallback::round_robin(roster, &self.config, requirements))
    }
}

impl<R: Rng> PartitionSolver for GreedySolver<R> {
    fn solve(
        &mut self,
        roster: &[Character],
        requirements: &[AbilityRequirement],
    ) -> Result<Partition, SolveError> {
        GreedySolver::solve(self, roster, requirements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::Role;

    fn chr(id: u32, account: &str, role: Role) -> Character {
        Character::new(id.to_string(), format!("c{id}"), account, role)
    }

    fn nine_character_roster() -> Vec<Character> {
        // 3 healers, 6 others; 4 carriers of Wolfsbane at level 10.
        let mut roster = vec![
            chr(1, "a1", Role::Healer),
            chr(2, "a2", Role::Healer),
            chr(3, "a3", Role::Healer),
        ];
        for i in 4..=9 {
            let mut c = chr(i, &format!("a{i}"), if i % 2 == 0 { Role::Dps } else { Role::Tank });
            if i <= 7 {
                c = c.with_ability("Wolfsbane", 10);
            }
            roster.push(c);
        }
        roster
    }

    #[test]
    fn solve_rejects_empty_roster() {
        let mut solver = GreedySolver::seeded(SolverConfig::default(), 1);
        assert_eq!(solver.solve(&[], &[]), Err(SolveError::EmptyRoster));
    }

    #[test]
    fn nine_character_scenario_respects_caps_and_roles() {
        let roster = nine_character_roster();
        let reqs = vec![AbilityRequirement::new("Wolfsbane", 10)];

        let mut solver = GreedySolver::seeded(SolverConfig::default(), 42);
        let partition = solver.solve(&roster, &reqs).unwrap();

        assert!(matches!(
            partition.source(),
            PartitionSource::Greedy { .. }
        ));
        assert_eq!(partition.squads().len(), 3);
        assert_eq!(partition.member_count(), 9);
        for squad in partition.squads() {
            assert!(squad.carrier_count("Wolfsbane", 10) <= 2);
            assert_eq!(
                squad
                    .members()
                    .iter()
                    .filter(|c| c.role == Role::Healer)
                    .count(),
                1
            );
        }
        assert!(partition.is_clean());
    }

    #[test]
    fn successful_partitions_never_share_accounts() {
        let roster = nine_character_roster();
        let reqs = vec![AbilityRequirement::new("Wolfsbane", 10)];

        for seed in 0..10 {
            let mut solver = GreedySolver::seeded(SolverConfig::default(), seed);
            let partition = solver.solve(&roster, &reqs).unwrap();
            for squad in partition.squads() {
                assert!(squad.duplicate_accounts().is_empty(), "seed {seed}");
            }
        }
    }

    #[test]
    fn overflow_breaches_stay_within_budget() {
        // 8 carriers across 9 characters, 3 squads, cap 2 -> budget 2.
        let mut roster = nine_character_roster();
        for c in roster.iter_mut().take(8) {
            c.ability_levels.insert("Wolfsbane".into(), 10);
        }
        let reqs = vec![AbilityRequirement::new("Wolfsbane", 10)];

        let mut solver = GreedySolver::seeded(SolverConfig::default(), 3);
        let partition = solver.solve(&roster, &reqs).unwrap();

        let over_cap = partition
            .squads()
            .iter()
            .filter(|s| s.carrier_count("Wolfsbane", 10) > 2)
            .count();
        assert!(over_cap <= 2, "{over_cap} squads over cap");
        assert_eq!(partition.member_count(), 9);
    }

    #[test]
    fn infeasible_roster_falls_back_to_round_robin() {
        // Two characters of one account forced into a single squad: every
        // attempt dies, the fallback must flag the duplicate account.
        let roster = vec![chr(1, "same", Role::Healer), chr(2, "same", Role::Dps)];
        let config = SolverConfig {
            group_size: 2,
            max_attempts: 50,
            ..SolverConfig::default()
        };
        let mut solver = GreedySolver::seeded(config, 9);
        let partition = solver.solve(&roster, &[]).unwrap();

        assert_eq!(partition.source(), PartitionSource::RoundRobin);
        assert_eq!(partition.member_count(), 2);
        assert!(partition
            .violations()
            .iter()
            .any(|v| v.contains("duplicate account same")));
    }

    #[test]
    fn seeded_solves_are_reproducible() {
        let roster = nine_character_roster();
        let reqs = vec![AbilityRequirement::new("Wolfsbane", 10)];

        let a = GreedySolver::seeded(SolverConfig::default(), 11)
            .solve(&roster, &reqs)
            .unwrap();
        let b = GreedySolver::seeded(SolverConfig::default(), 11)
            .solve(&roster, &reqs)
            .unwrap();
        assert_eq!(a, b);
    }
}
