//! Round robin by the circle method, with any number of legs.

use crate::logic::rounds_of;
use crate::logic::seed_order::{shuffle, sort_by_seed};
use crate::models::{
    check_roster, ConfigError, DrawResult, Match, Participant, ParticipantId, RoundRobinOptions,
};

/// Every participant meets every other once per leg.
///
/// Participants are ordered by seed rank (`seeded`) or shuffled with `seed`, then paired
/// with the circle method. An odd field gets a phantom slot; whoever draws it sits out.
/// Even legs repeat the base rounds with home and away swapped.
pub fn build_round_robin(
    participants: &[Participant],
    options: &RoundRobinOptions,
) -> Result<DrawResult, ConfigError> {
    check_roster(participants, 2)?;
    if options.legs == 0 {
        return Err(ConfigError::ZeroLegs);
    }
    let ordered = if options.seeded {
        sort_by_seed(participants)
    } else {
        shuffle(participants, options.seed)
    };
    let ids: Vec<ParticipantId> = ordered.into_iter().map(|p| p.id).collect();

    let matches = circle_schedule(&ids, options.legs, "");
    let rounds = rounds_of(&matches);
    log::debug!(
        "round robin: {} participants, {} legs, {} rounds, {} matches",
        ids.len(),
        options.legs,
        rounds.len(),
        matches.len()
    );

    let description = match options.legs {
        1 => format!(
            "Round robin ({} participants), everyone plays everyone once",
            ids.len()
        ),
        2 => format!(
            "Double round robin ({} participants), home and away",
            ids.len()
        ),
        legs => format!("Round robin ({} participants), {} legs", ids.len(), legs),
    };
    Ok(DrawResult {
        matches,
        rounds,
        description,
        ..DrawResult::default()
    })
}

/// Matches for `legs` passes over the circle-method rounds of `ids`.
/// Round indices start at 1 and continue across legs; ids look like `{prefix}R3-M2`.
pub(crate) fn circle_schedule(ids: &[ParticipantId], legs: u32, prefix: &str) -> Vec<Match> {
    let base = base_rounds(ids);
    let per_leg = base.len() as u32;
    let mut matches = Vec::new();
    for leg in 1..=legs {
        for (offset, pairs) in base.iter().enumerate() {
            let round_index = (leg - 1) * per_leg + offset as u32 + 1;
            for (k, &(a, b)) in pairs.iter().enumerate() {
                let (home, away) = if leg % 2 == 0 { (b, a) } else { (a, b) };
                let mut m = Match::pairing(
                    format!("{}R{}-M{}", prefix, round_index, k + 1),
                    round_index,
                    home.clone(),
                    away.clone(),
                );
                m.leg_number = Some(leg);
                matches.push(m);
            }
        }
    }
    matches
}

/// One leg of pairings. The first participant stays fixed and meets the head of the
/// ring; the rest of the ring pairs up from both ends; then the ring rotates by one.
fn base_rounds(ids: &[ParticipantId]) -> Vec<Vec<(&ParticipantId, &ParticipantId)>> {
    let mut slots: Vec<Option<&ParticipantId>> = ids.iter().map(Some).collect();
    if slots.len() % 2 == 1 {
        slots.push(None);
    }
    let n = slots.len();
    if n < 2 {
        return Vec::new();
    }
    let fixed = slots[0];
    let mut ring: Vec<Option<&ParticipantId>> = slots[1..].to_vec();

    let mut rounds = Vec::with_capacity(n - 1);
    for _ in 0..n - 1 {
        let mut pairs = vec![(fixed, ring[0])];
        for i in 1..n / 2 {
            pairs.push((ring[i], ring[n - 1 - i]));
        }
        rounds.push(
            pairs
                .into_iter()
                .filter_map(|(a, b)| Some((a?, b?)))
                .collect(),
        );
        ring.rotate_right(1);
    }
    rounds
}
