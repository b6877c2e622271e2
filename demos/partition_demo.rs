//! Demonstration of the greedy solver plus fairness audit on a small roster.

use squadplan::audit::{FairnessAuditor, FairnessRules, RerunLedger, WatchedAbility};
use squadplan::requirement::AbilityRequirement;
use squadplan::roster::{Character, Role};
use squadplan::solver::{GreedySolver, SolverConfig};

fn main() {
    tracing_subscriber::fmt::init();

    let mut roster = vec![
        Character::new("1", "Willow", "alice", Role::Healer).with_ability("Mend", 10),
        Character::new("2", "Brand", "bob", Role::Tank),
        Character::new("3", "Sable", "carol", Role::Dps).with_ability("Ignite", 10),
        Character::new("4", "Rook", "dave", Role::Healer).with_ability("Mend", 9),
        Character::new("5", "Fenn", "erin", Role::Dps).with_ability("Ignite", 10),
        Character::new("6", "Moss", "frank", Role::Tank).with_ability("Ignite", 9),
        Character::new("7", "Vesper", "gwen", Role::Healer),
        Character::new("8", "Thorn", "hugo", Role::Dps).with_ability("Ignite", 10),
        Character::new("9", "Larch", "iris", Role::Dps),
    ];
    // A second character on an existing account, to exercise the
    // account-uniqueness constraint.
    roster.push(Character::new("10", "Willow II", "alice", Role::Dps));

    let requirements = vec![
        AbilityRequirement::new("Ignite", 10).core(),
        AbilityRequirement::new("Mend", 9),
    ];

    let mut solver = GreedySolver::seeded(SolverConfig::default(), 2024);
    let partition = solver
        .solve(&roster, &requirements)
        .expect("roster and requirements are well-formed");

    let auditor = FairnessAuditor::new(FairnessRules {
        flagged: ["1", "3"].into_iter().map(String::from).collect(),
        watched: vec![WatchedAbility {
            name: "Ignite".into(),
            level: 10,
        }],
    });
    let mut ledger = RerunLedger::new();
    let outcome = auditor
        .audit(
            "demo-schedule",
            partition,
            &mut solver,
            &roster,
            &requirements,
            &mut ledger,
        )
        .expect("re-solve inputs are unchanged");

    let partition = outcome.partition();
    println!("Squad assignment ({:?}):", partition.source());
    println!("=======================");
    for (i, squad) in partition.squads().iter().enumerate() {
        let members: Vec<String> = squad
            .members()
            .iter()
            .map(|c| format!("{} [{}/{}]", c.name, c.role, c.account))
            .collect();
        println!("squad {}: {}", i + 1, members.join(", "));
    }

    if partition.violations().is_empty() {
        println!("\nno violations");
    } else {
        println!("\nviolations:");
        for v in partition.violations() {
            println!("  - {v}");
        }
    }
    if !partition.unassigned().is_empty() {
        println!("uncovered abilities: {}", partition.unassigned().join(", "));
    }
    println!("reruns used: {}", ledger.count("demo-schedule"));
}
