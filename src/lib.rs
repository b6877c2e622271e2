//! squadplan - constraint-based squad partitioning for fixed-size rosters
//!
//! A library for assigning a roster of characters into fixed-size squads so
//! that each squad satisfies hard role and account-uniqueness requirements
//! while a shared pool of scarce abilities stays within per-squad usage caps,
//! with a bounded global overflow budget when caps cannot be met everywhere.
//!
//! Three solving strategies are provided:
//!
//! - [`solver::GreedySolver`] - randomized greedy construction with scored
//!   placement, retried up to a bounded attempt budget (the primary solver)
//! - [`solver::ExactSolver`] - exhaustive backtracking over index-ordered
//!   member combinations, for small strictly-validated setups
//! - [`solver::round_robin`] - deterministic fallback that always places
//!   every character but guarantees nothing beyond capacity
//!
//! A completed [`partition::Partition`] can be handed to the
//! [`audit::FairnessAuditor`], which checks distributional properties the
//! per-placement scoring does not optimize for and triggers a bounded number
//! of full re-solves.

pub mod audit;
pub mod partition;
pub mod requirement;
pub mod roster;
pub mod solver;

/// Identifier type used for characters, schedules, and audit jobs.
pub type Id = String;

/// Generates a new unique identifier (UUID v4).
pub fn generate_id() -> Id {
    uuid::Uuid::new_v4().to_string()
}
