//! Integration tests for the circle-method round robin.

use std::collections::{HashMap, HashSet};
use tournament_draw::{build_round_robin, ConfigError, Participant, RoundRobinOptions};

fn seeded(n: usize) -> Vec<Participant> {
    (1..=n)
        .map(|i| Participant::new(i.to_string(), format!("Team {i}")).with_seed(i as u32))
        .collect()
}

fn key(a: &str, b: &str) -> (String, String) {
    if a < b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

#[test]
fn everyone_meets_everyone_once() {
    for n in 2..=12 {
        let result = build_round_robin(&seeded(n), &RoundRobinOptions::default()).unwrap();
        let expected_rounds = if n % 2 == 0 { n - 1 } else { n };
        assert_eq!(result.rounds.len(), expected_rounds, "n = {n}");
        assert_eq!(result.matches.len(), n * (n - 1) / 2, "n = {n}");

        let mut pairs = HashSet::new();
        for m in &result.matches {
            let (a, b) = m.sides().unwrap();
            assert_ne!(a, b);
            assert!(pairs.insert(key(a, b)), "n = {n}: {a} vs {b} twice");
        }
        for round in &result.rounds {
            assert_eq!(round.match_ids.len(), n / 2, "n = {n}");
            let mut busy = HashSet::new();
            for m in result.round_matches(round.index) {
                let (a, b) = m.sides().unwrap();
                assert!(busy.insert(a) && busy.insert(b), "n = {n}");
            }
        }
    }
}

#[test]
fn odd_field_sits_each_participant_out_once() {
    let field = seeded(7);
    let result = build_round_robin(&field, &RoundRobinOptions::default()).unwrap();
    let mut rests: HashMap<&str, usize> = HashMap::new();
    for round in &result.rounds {
        let playing: HashSet<&str> = result
            .round_matches(round.index)
            .into_iter()
            .flat_map(|m| [m.participant_a.as_deref(), m.participant_b.as_deref()])
            .flatten()
            .collect();
        for p in &field {
            if !playing.contains(p.id.as_str()) {
                *rests.entry(p.id.as_str()).or_insert(0) += 1;
            }
        }
    }
    assert_eq!(rests.len(), 7);
    assert!(rests.values().all(|&r| r == 1));
}

#[test]
fn second_leg_swaps_home_and_away() {
    let opts = RoundRobinOptions {
        legs: 2,
        ..RoundRobinOptions::default()
    };
    let result = build_round_robin(&seeded(6), &opts).unwrap();
    assert_eq!(result.rounds.len(), 10);
    assert_eq!(result.matches.len(), 30);
    for r in 1..=5 {
        let first = result.round_matches(r);
        let second = result.round_matches(r + 5);
        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.leg_number, Some(1));
            assert_eq!(b.leg_number, Some(2));
            assert_eq!(a.participant_a, b.participant_b);
            assert_eq!(a.participant_b, b.participant_a);
        }
    }
    assert!(result.description.starts_with("Double round robin"));
}

#[test]
fn three_legs_meet_three_times() {
    let opts = RoundRobinOptions {
        legs: 3,
        ..RoundRobinOptions::default()
    };
    let result = build_round_robin(&seeded(5), &opts).unwrap();
    let mut count: HashMap<(String, String), usize> = HashMap::new();
    for m in &result.matches {
        let (a, b) = m.sides().unwrap();
        *count.entry(key(a, b)).or_insert(0) += 1;
    }
    assert_eq!(count.len(), 10);
    assert!(count.values().all(|&c| c == 3));
    assert_eq!(result.rounds.len(), 15);
}

#[test]
fn match_ids_name_round_and_slot() {
    let result = build_round_robin(&seeded(4), &RoundRobinOptions::default()).unwrap();
    let ids: Vec<&str> = result.matches.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(
        ids,
        vec!["R1-M1", "R1-M2", "R2-M1", "R2-M2", "R3-M1", "R3-M2"]
    );
}

#[test]
fn shuffled_order_is_reproducible() {
    let opts = RoundRobinOptions {
        seed: Some(5),
        ..RoundRobinOptions::default()
    };
    let a = build_round_robin(&seeded(9), &opts).unwrap();
    let b = build_round_robin(&seeded(9), &opts).unwrap();
    assert_eq!(a, b);
}

#[test]
fn invalid_configurations_are_rejected() {
    let opts = RoundRobinOptions {
        legs: 0,
        ..RoundRobinOptions::default()
    };
    assert_eq!(
        build_round_robin(&seeded(4), &opts),
        Err(ConfigError::ZeroLegs)
    );
    assert_eq!(
        build_round_robin(&seeded(1), &RoundRobinOptions::default()),
        Err(ConfigError::NotEnoughParticipants {
            required: 2,
            got: 1
        })
    );
}
