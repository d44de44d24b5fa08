//! Integration tests for elimination brackets: ladder placement, byes and multi-elimination links.

use std::collections::{HashMap, HashSet};
use tournament_draw::{
    build_bracket, BracketOptions, BracketSegment, ConfigError, DrawResult, Elimination,
    Participant,
};

fn seeded(n: usize) -> Vec<Participant> {
    (1..=n)
        .map(|i| Participant::new(i.to_string(), format!("Team {i}")).with_seed(i as u32))
        .collect()
}

fn options(elimination: Elimination) -> BracketOptions {
    BracketOptions {
        elimination,
        ..BracketOptions::default()
    }
}

fn sides(result: &DrawResult, id: &str) -> (String, String) {
    let m = result.get_match(id).unwrap();
    (
        m.participant_a.clone().unwrap_or_default(),
        m.participant_b.clone().unwrap_or_default(),
    )
}

#[test]
fn eight_seeded_follow_the_ladder() {
    let result = build_bracket(&seeded(8), &options(Elimination::Single)).unwrap();
    assert_eq!(result.matches.len(), 7);
    assert_eq!(result.rounds.len(), 3);
    assert!(result.byes.is_empty());
    assert_eq!(sides(&result, "M1"), ("1".into(), "8".into()));
    assert_eq!(sides(&result, "M2"), ("4".into(), "5".into()));
    assert_eq!(sides(&result, "M3"), ("2".into(), "7".into()));
    assert_eq!(sides(&result, "M4"), ("3".into(), "6".into()));
    assert_eq!(
        result.get_match("M1").unwrap().advances_to.as_deref(),
        Some("M5")
    );
    assert_eq!(
        result.get_match("M3").unwrap().advances_to.as_deref(),
        Some("M6")
    );
    assert_eq!(
        result.get_match("M6").unwrap().advances_to.as_deref(),
        Some("M7")
    );
    assert_eq!(result.get_match("M7").unwrap().advances_to, None);
    assert_eq!(
        result.description,
        "Single elimination (8 participants), 8 seeded"
    );
}

#[test]
fn round_sizes_halve() {
    for n in 2..=40 {
        let result = build_bracket(&seeded(n), &options(Elimination::Single)).unwrap();
        let size = n.next_power_of_two();
        assert_eq!(result.rounds.len(), size.trailing_zeros() as usize, "n = {n}");
        assert_eq!(result.matches.len(), n - 1, "n = {n}");
        assert_eq!(result.byes.len(), size - n, "n = {n}");
        assert_eq!(result.rounds[0].match_ids.len(), n - size / 2, "n = {n}");
        for round in &result.rounds[1..] {
            assert_eq!(
                round.match_ids.len(),
                size >> round.index,
                "n = {n}, round {}",
                round.index
            );
        }
    }
}

#[test]
fn five_seeded_give_byes_to_top_three() {
    let result = build_bracket(&seeded(5), &options(Elimination::Single)).unwrap();
    let byes: Vec<&str> = result.byes.iter().map(|b| b.participant.as_str()).collect();
    assert_eq!(byes, vec!["1", "2", "3"]);
    assert_eq!(result.round_matches(1).len(), 1);
    assert_eq!(sides(&result, "M1"), ("4".into(), "5".into()));
    assert_eq!(result.byes[0].advances_to.as_deref(), Some("M2"));
    assert_eq!(
        result.get_match("M1").unwrap().advances_to.as_deref(),
        Some("M2")
    );
    assert_eq!(result.byes[1].advances_to.as_deref(), Some("M3"));
    assert_eq!(result.byes[2].advances_to.as_deref(), Some("M3"));
}

#[test]
fn every_participant_starts_exactly_once() {
    for seed in 0..5 {
        let opts = BracketOptions {
            seed: Some(seed),
            seeded: false,
            ..BracketOptions::default()
        };
        let result = build_bracket(&seeded(13), &opts).unwrap();
        let mut seen = HashSet::new();
        for m in result.round_matches(1) {
            let (a, b) = m.sides().unwrap();
            assert!(seen.insert(a.to_string()));
            assert!(seen.insert(b.to_string()));
        }
        for bye in &result.byes {
            assert!(seen.insert(bye.participant.clone()));
        }
        assert_eq!(seen.len(), 13);
    }
}

#[test]
fn partial_seeding_fixes_only_the_seeded() {
    let opts = BracketOptions {
        num_seeded: Some(2),
        seed: Some(11),
        ..BracketOptions::default()
    };
    for _ in 0..2 {
        let result = build_bracket(&seeded(8), &opts).unwrap();
        let m1 = result.get_match("M1").unwrap();
        let m3 = result.get_match("M3").unwrap();
        assert_eq!(m1.participant_a.as_deref(), Some("1"));
        assert_eq!(m3.participant_a.as_deref(), Some("2"));
        assert!(result.description.ends_with("2 seeded"));
    }
}

#[test]
fn same_seed_same_bracket() {
    let opts = BracketOptions {
        seeded: false,
        seed: Some(42),
        ..BracketOptions::default()
    };
    let a = build_bracket(&seeded(11), &opts).unwrap();
    let b = build_bracket(&seeded(11), &opts).unwrap();
    assert_eq!(
        serde_json::to_string(&a).unwrap(),
        serde_json::to_string(&b).unwrap()
    );
}

#[test]
fn two_participants_play_a_final() {
    let result = build_bracket(&seeded(2), &options(Elimination::Single)).unwrap();
    assert_eq!(result.matches.len(), 1);
    assert_eq!(result.matches[0].advances_to, None);
    assert!(result.byes.is_empty());
}

#[test]
fn invalid_configurations_are_rejected() {
    assert_eq!(
        build_bracket(&seeded(1), &BracketOptions::default()),
        Err(ConfigError::NotEnoughParticipants {
            required: 2,
            got: 1
        })
    );
    let opts = BracketOptions {
        num_seeded: Some(9),
        ..BracketOptions::default()
    };
    assert_eq!(
        build_bracket(&seeded(8), &opts),
        Err(ConfigError::SeedCountOutOfRange {
            num_seeded: 9,
            participants: 8
        })
    );
    let mut field = seeded(4);
    field[3].id = "1".to_string();
    assert_eq!(
        build_bracket(&field, &BracketOptions::default()),
        Err(ConfigError::DuplicateParticipant("1".to_string()))
    );
}

/// Number of byes and matches sending a participant into each match.
fn feeder_counts(result: &DrawResult) -> HashMap<&str, usize> {
    let mut counts = HashMap::new();
    let targets = result
        .byes
        .iter()
        .map(|b| b.advances_to.as_deref())
        .chain(result.matches.iter().map(|m| m.advances_to.as_deref()))
        .chain(result.matches.iter().map(|m| m.loser_advances_to.as_deref()));
    for target in targets.flatten() {
        *counts.entry(target).or_insert(0) += 1;
    }
    counts
}

#[test]
fn no_match_has_more_than_two_feeders() {
    for elimination in [Elimination::Single, Elimination::Double, Elimination::Triple] {
        for n in 2..=33 {
            let result = build_bracket(&seeded(n), &options(elimination)).unwrap();
            let counts = feeder_counts(&result);
            for m in &result.matches {
                let fed = counts.get(m.id.as_str()).copied().unwrap_or(0);
                let placed = m.participant_a.iter().count() + m.participant_b.iter().count();
                assert_eq!(fed + placed, 2, "{elimination:?}, n={n}, {}", m.id);
                for next in [&m.advances_to, &m.loser_advances_to].into_iter().flatten() {
                    let later = result.get_match(next).unwrap();
                    assert!(later.round_index > m.round_index, "{} -> {}", m.id, next);
                }
            }
            if elimination != Elimination::Single {
                assert_eq!(counts["FINAL"], 2, "{elimination:?}, n={n}");
                let open: Vec<_> = result
                    .matches
                    .iter()
                    .filter(|m| m.advances_to.is_none())
                    .map(|m| m.id.as_str())
                    .collect();
                assert_eq!(open, ["FINAL"], "{elimination:?}, n={n}");
            }
        }
    }
}

#[test]
fn double_elimination_drops_every_upper_loser() {
    for n in 2..=33 {
        let result = build_bracket(&seeded(n), &options(Elimination::Double)).unwrap();
        let upper: Vec<_> = result
            .matches
            .iter()
            .filter(|m| m.segment == BracketSegment::Upper)
            .collect();
        assert_eq!(upper.len(), n - 1);
        assert!(upper.iter().all(|m| m.loser_advances_to.is_some()), "n={n}");
        // Each lower match eliminates one participant.
        let lower = result
            .matches
            .iter()
            .filter(|m| m.segment == BracketSegment::Lower)
            .count();
        assert_eq!(lower, n - 2, "n={n}");
    }
}

#[test]
fn double_elimination_of_eight() {
    let result = build_bracket(&seeded(8), &options(Elimination::Double)).unwrap();
    assert_eq!(result.matches.len(), 7 + 6 + 1);
    assert_eq!(result.rounds.len(), 6);
    for (upper, lower) in [
        ("U-M1", "L-R1-M1"),
        ("U-M2", "L-R1-M1"),
        ("U-M4", "L-R1-M2"),
        ("U-M5", "L-R2-M1"),
        ("U-M6", "L-R2-M2"),
        ("U-M7", "L-R3-M1"),
    ] {
        assert_eq!(
            result.get_match(upper).unwrap().loser_advances_to.as_deref(),
            Some(lower),
            "{upper}"
        );
    }
    assert_eq!(
        result.get_match("U-M7").unwrap().advances_to.as_deref(),
        Some("FINAL")
    );
    let lower_final = result.get_match("L-R4-M1").unwrap();
    assert_eq!(lower_final.segment, BracketSegment::Lower);
    assert_eq!(lower_final.round_index, 5);
    assert_eq!(lower_final.advances_to.as_deref(), Some("FINAL"));
    let last = result.get_match("FINAL").unwrap();
    assert_eq!(last.segment, BracketSegment::Final);
    assert_eq!(last.round_index, 6);
    assert!(result.description.contains("a second loss eliminates"));
}

#[test]
fn two_participants_meet_again_in_the_final() {
    let result = build_bracket(&seeded(2), &options(Elimination::Double)).unwrap();
    assert_eq!(result.matches.len(), 2);
    let first = result.get_match("U-M1").unwrap();
    assert_eq!(first.advances_to.as_deref(), Some("FINAL"));
    assert_eq!(first.loser_advances_to.as_deref(), Some("FINAL"));
}

#[test]
fn triple_elimination_of_eight() {
    let result = build_bracket(&seeded(8), &options(Elimination::Triple)).unwrap();
    assert_eq!(result.matches.len(), 20);
    assert_eq!(result.rounds.len(), 9);
    for (lower, third) in [
        ("L-R1-M1", "LL-R1-M1"),
        ("L-R1-M2", "LL-R1-M1"),
        ("L-R2-M1", "LL-R2-M1"),
        ("L-R4-M1", "LL-R4-M1"),
    ] {
        assert_eq!(
            result.get_match(lower).unwrap().loser_advances_to.as_deref(),
            Some(third),
            "{lower}"
        );
    }
    let deciders: Vec<_> = result
        .matches
        .iter()
        .filter(|m| m.advances_to.as_deref() == Some("L-FINAL"))
        .map(|m| m.id.as_str())
        .collect();
    assert_eq!(deciders, ["L-R4-M1", "LL-R5-M1"]);
    assert_eq!(
        result.get_match("L-FINAL").unwrap().advances_to.as_deref(),
        Some("FINAL")
    );
    assert_eq!(result.get_match("FINAL").unwrap().round_index, 9);
    assert!(result.description.starts_with("Triple elimination"));
}

#[test]
fn render_names_losers_feeding_the_lower_bracket() {
    let field = seeded(4);
    let result = build_bracket(&field, &options(Elimination::Double)).unwrap();
    let text = result.render(&field);
    assert!(text.contains("[L-R1-M1] Loser of U-M1 vs Loser of U-M2"));
    assert!(text.contains("[FINAL] Winner of L-R2-M1 vs Winner of U-M3"));
}

#[test]
fn render_names_feeders_of_open_slots() {
    let field = seeded(5);
    let result = build_bracket(&field, &BracketOptions::default()).unwrap();
    let text = result.render(&field);
    assert!(text.contains("Byes: Team 1, Team 2, Team 3"));
    assert!(text.contains("[M1] Team 4 vs Team 5"));
    assert!(text.contains("[M2] Team 1 vs Winner of M1"));
    assert!(text.contains("--- Round 3 ---"));
}
