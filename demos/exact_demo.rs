//! Demonstration of the exact backtracking solver on a rigid two-squad setup.

use squadplan::requirement::AbilityRequirement;
use squadplan::roster::{Character, Role};
use squadplan::solver::{ExactRules, ExactSolver};

fn main() {
    tracing_subscriber::fmt::init();

    let roster = vec![
        Character::new("1", "Willow", "alice", Role::Healer).with_ability("Mend", 10),
        Character::new("2", "Brand", "bob", Role::Tank),
        Character::new("3", "Sable", "carol", Role::Dps),
        Character::new("4", "Rook", "dave", Role::Healer).with_ability("Mend", 9),
        Character::new("5", "Fenn", "erin", Role::Dps),
        Character::new("6", "Moss", "frank", Role::Tank),
    ];

    let solver = ExactSolver::new(ExactRules {
        group_count: 2,
        group_size: 3,
        critical_role: Role::Healer,
        mandatory: vec![AbilityRequirement::new("Mend", 9)],
    });

    let report = solver.solve(&roster).expect("inputs are well-formed");

    if report.success {
        println!("exact assignment found:");
        for squad in &report.groups {
            let members: Vec<&str> = squad.members.iter().map(|c| c.name.as_str()).collect();
            println!(
                "squad {}: {} (covers: {})",
                squad.index,
                members.join(", "),
                squad.covered.join(", ")
            );
        }
    } else {
        println!("no assignment satisfies the constraints");
        for e in &report.errors {
            println!("  - {e}");
        }
        if !report.missing.is_empty() {
            println!("uncovered: {}", report.missing.join(", "));
        }
    }
}
