//! Integration tests for the pot-based league phase.

use std::collections::{HashMap, HashSet};
use tournament_draw::{
    build_league_phase, valid_field_sizes, ConfigError, DrawError, DrawResult,
    LeaguePhaseOptions, Participant, PotLayout, ScheduleError,
};

fn seeded(n: usize) -> Vec<Participant> {
    (1..=n)
        .map(|i| Participant::new(i.to_string(), format!("Club {i}")).with_seed(i as u32))
        .collect()
}

fn options(rounds: usize, seed: u64) -> LeaguePhaseOptions {
    LeaguePhaseOptions {
        rounds,
        seed: Some(seed),
        ..LeaguePhaseOptions::default()
    }
}

/// Checks every structural property of a league-phase draw.
fn assert_valid(result: &DrawResult, field: &[Participant], rounds: usize) {
    let layout = PotLayout::new(field.len(), rounds).unwrap();
    assert_eq!(result.matches.len(), field.len() * rounds / 2);
    assert_eq!(result.rounds.len(), rounds);
    assert_eq!(result.groups.len(), layout.pot_count);

    let pot_of: HashMap<&str, usize> = result
        .groups
        .iter()
        .enumerate()
        .flat_map(|(i, g)| g.participant_ids.iter().map(move |id| (id.as_str(), i)))
        .collect();
    assert_eq!(pot_of.len(), field.len());

    let mut pairs = HashSet::new();
    for m in &result.matches {
        let (a, b) = m.sides().unwrap();
        assert_ne!(a, b);
        let key = if a < b { (a, b) } else { (b, a) };
        assert!(pairs.insert(key), "{a} vs {b} drawn twice");
    }

    for round in &result.rounds {
        let matches = result.round_matches(round.index);
        assert_eq!(matches.len(), field.len() / 2, "round {}", round.index);
        let mut busy = HashSet::new();
        for m in matches {
            let (a, b) = m.sides().unwrap();
            assert!(busy.insert(a) && busy.insert(b), "round {}", round.index);
        }
    }

    for p in field {
        let mine: Vec<_> = result.matches_of(&p.id).collect();
        assert_eq!(mine.len(), rounds, "{}", p.id);
        let mut per_pot = vec![0; layout.pot_count];
        for m in &mine {
            let (a, b) = m.sides().unwrap();
            let opponent = if a == p.id { b } else { a };
            per_pot[pot_of[opponent]] += 1;
        }
        assert!(per_pot.iter().all(|&c| c == layout.per_pot), "{}", p.id);
    }
}

#[test]
fn thirty_six_clubs_over_eight_rounds() {
    let field = seeded(36);
    let result = build_league_phase(&field, &options(8, 42)).unwrap();
    assert_valid(&result, &field, 8);
    assert_eq!(result.matches.len(), 144);
    assert_eq!(result.groups[0].id, "POT1");
    assert_eq!(
        result.groups[0].participant_ids,
        (1..=9).map(|i| i.to_string()).collect::<Vec<_>>()
    );
    assert_eq!(
        result.description,
        "League phase: 36 participants, 4 pots of 9, 8 matches each (2 from every pot)"
    );
}

#[test]
fn thirty_six_clubs_split_home_and_away_evenly() {
    let field = seeded(36);
    for seed in [1, 2, 3] {
        let result = build_league_phase(&field, &options(8, seed)).unwrap();
        for p in &field {
            let home = result
                .matches
                .iter()
                .filter(|m| m.participant_a.as_deref() == Some(p.id.as_str()))
                .count();
            assert_eq!(home, 4, "seed {seed}, {}", p.id);
        }
    }
}

#[test]
fn other_layouts_are_scheduled() {
    for (n, rounds) in [(18, 8), (10, 4), (4, 3), (2, 1)] {
        let field = seeded(n);
        let result = build_league_phase(&field, &options(rounds, 9)).unwrap();
        assert_valid(&result, &field, rounds);
    }
}

#[test]
fn same_seed_same_draw() {
    let field = seeded(36);
    let a = build_league_phase(&field, &options(8, 2024)).unwrap();
    let b = build_league_phase(&field, &options(8, 2024)).unwrap();
    assert_eq!(
        serde_json::to_string(&a).unwrap(),
        serde_json::to_string(&b).unwrap()
    );
}

#[test]
fn pots_follow_seed_order_not_input_order() {
    let mut field = seeded(36);
    field.reverse();
    let result = build_league_phase(&field, &options(8, 1)).unwrap();
    assert_eq!(result.groups[3].participant_ids[8], "36");
    assert_eq!(result.groups[0].participant_ids[0], "1");
}

#[test]
fn field_size_errors_come_before_any_work() {
    let cases = [
        (37, 8, ConfigError::OddFieldSize(37)),
        (
            38,
            8,
            ConfigError::FieldNotDivisibleByPotSize {
                participants: 38,
                pot_size: 9,
            },
        ),
        (
            54,
            8,
            ConfigError::RoundsNotDivisibleByPots { rounds: 8, pots: 6 },
        ),
        (
            6,
            2,
            ConfigError::OddPotQuota {
                pot_size: 3,
                per_pot: 1,
            },
        ),
        (36, 0, ConfigError::ZeroRounds),
    ];
    for (n, rounds, expected) in cases {
        assert_eq!(
            build_league_phase(&seeded(n), &options(rounds, 1)),
            Err(DrawError::Config(expected)),
            "{n} participants, {rounds} rounds"
        );
    }
}

#[test]
fn valid_sizes_for_eight_rounds() {
    assert_eq!(valid_field_sizes(8), (18, vec![18, 36]));
    assert_eq!(valid_field_sizes(3), (4, vec![4, 12]));
    assert!(PotLayout::new(72, 8).is_err());
}

#[test]
fn every_listed_size_builds() {
    for rounds in 1..=12 {
        let (min, valid) = valid_field_sizes(rounds);
        assert_eq!(valid.first().copied().unwrap_or(0), min);
        for n in valid {
            let field = seeded(n);
            for seed in [0, 7] {
                let result = build_league_phase(&field, &options(rounds, seed))
                    .unwrap_or_else(|e| panic!("{n} participants, {rounds} rounds: {e}"));
                assert_valid(&result, &field, rounds);
            }
        }
    }
}

#[test]
fn no_layout_is_dropped_for_scheduling() {
    for rounds in 1..=12 {
        let layouts: Vec<usize> = (1..=rounds)
            .filter(|pots| rounds % pots == 0)
            .map(|pots| (rounds + 1) * pots)
            .filter(|&n| PotLayout::new(n, rounds).is_ok())
            .collect();
        assert_eq!(valid_field_sizes(rounds).1, layouts, "{rounds} rounds");
    }
}

#[test]
fn layouts_that_defeat_greedy_colouring_are_scheduled() {
    // Complete graphs (a single pot) and pots meeting every other pot once.
    for (n, rounds) in [(14, 13), (12, 11), (20, 19), (12, 3), (30, 5), (78, 12)] {
        let field = seeded(n);
        let result = build_league_phase(&field, &options(rounds, 3)).unwrap();
        assert_valid(&result, &field, rounds);
    }
}

#[test]
fn country_lock_rejects_compatriots() {
    let mut field = seeded(36);
    field[0] = field[0].clone().with_country("ENG");
    field[1] = field[1].clone().with_country("eng");
    let opts = LeaguePhaseOptions {
        country_lock: true,
        max_per_country: 0,
        ..options(8, 3)
    };
    assert!(matches!(
        build_league_phase(&field, &opts),
        Err(DrawError::Schedule(ScheduleError::CountryLockViolated { .. }))
    ));
}

#[test]
fn country_limit_counts_opponents() {
    let field: Vec<Participant> = seeded(36)
        .into_iter()
        .map(|p| p.with_country("ESP"))
        .collect();
    assert_eq!(
        build_league_phase(&field, &options(8, 3)),
        Err(DrawError::Schedule(ScheduleError::CountryLimitExceeded {
            participant: "1".to_string(),
            country: "ESP".to_string(),
            count: 8,
            max: 2,
        }))
    );

    let relaxed = LeaguePhaseOptions {
        max_per_country: 0,
        ..options(8, 3)
    };
    assert!(build_league_phase(&field, &relaxed).is_ok());
}

#[test]
fn blank_countries_are_ignored() {
    let field: Vec<Participant> = seeded(36)
        .into_iter()
        .map(|p| p.with_country("  "))
        .collect();
    let opts = LeaguePhaseOptions {
        country_lock: true,
        ..options(8, 3)
    };
    assert!(build_league_phase(&field, &opts).is_ok());
}
