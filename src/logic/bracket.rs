//! Elimination brackets: single, double and triple, with seeding ladder and byes.

use crate::logic::rounds_of;
use crate::logic::seed_order::{bracket_seed_order, next_power_of_two, shuffle, sort_by_seed};
use crate::models::{
    check_roster, BracketOptions, BracketSegment, Bye, ConfigError, DrawResult, Elimination, Match,
    MatchId, Participant, ParticipantId, Round,
};

/// Build an elimination bracket.
///
/// 1. Size = next power of two; the difference is the number of byes.
/// 2. The first `num_seeded` participants (by seed rank) take the ladder slots of their rank.
/// 3. The rest are shuffled into the remaining ladder slots of ranks `num_seeded+1..=n`.
/// 4. Round 1 holds only fully occupied slot pairs; a lone occupant gets a bye.
///    Later rounds are empty placeholders linked by `advances_to`.
/// 5. Double/triple elimination namespace the upper bracket with `U-`, send every upper
///    loser into a lower tier (and lower-tier losers into a second tier for triple), and
///    end with a `FINAL` match.
pub fn build_bracket(
    participants: &[Participant],
    options: &BracketOptions,
) -> Result<DrawResult, ConfigError> {
    check_roster(participants, 2)?;
    let n = participants.len();
    if let Some(k) = options.num_seeded {
        if k > n {
            return Err(ConfigError::SeedCountOutOfRange {
                num_seeded: k,
                participants: n,
            });
        }
    }
    let num_seeded = if options.seeded {
        options.num_seeded.unwrap_or(n)
    } else {
        0
    };

    let slots = place_slots(participants, num_seeded, options.seed)?;
    let mut result = match options.elimination {
        Elimination::Single => upper_bracket(&slots, ""),
        Elimination::Double | Elimination::Triple => {
            multi_elimination(&slots, options.elimination.lower_tiers())
        }
    };
    log::debug!(
        "bracket: {} participants, {} slots, {} byes, {} matches",
        n,
        slots.len(),
        result.byes.len(),
        result.matches.len()
    );

    let mut description = match options.elimination {
        Elimination::Single => format!("Single elimination ({} participants)", n),
        Elimination::Double => format!(
            "Double elimination ({} participants): a first loss drops into the lower bracket, a second loss eliminates",
            n
        ),
        Elimination::Triple => format!(
            "Triple elimination ({} participants): losers drop from the upper to the lower to a third bracket, a loss there eliminates; bracket winners meet in single deciding matches",
            n
        ),
    };
    if num_seeded > 0 {
        description.push_str(&format!(", {} seeded", num_seeded));
    }
    result.description = description;
    Ok(result)
}

/// Slot contents in bracket order; `None` is an empty slot (its partner has a bye).
fn place_slots(
    participants: &[Participant],
    num_seeded: usize,
    seed: Option<u64>,
) -> Result<Vec<Option<ParticipantId>>, ConfigError> {
    let n = participants.len();
    let size = next_power_of_two(n);
    let ladder = bracket_seed_order(size)?;
    let ordered = sort_by_seed(participants);
    let num_seeded = num_seeded.min(n);
    let drawn = shuffle(&ordered[num_seeded..], seed);

    // slot_of_rank[r] = slot holding ladder rank r + 1
    let mut slot_of_rank: Vec<usize> = (0..size).collect();
    slot_of_rank.sort_by_key(|&slot| ladder[slot]);

    let mut slots = vec![None; size];
    for (rank, &slot) in slot_of_rank.iter().take(n).enumerate() {
        let p = if rank < num_seeded {
            &ordered[rank]
        } else {
            &drawn[rank - num_seeded]
        };
        slots[slot] = Some(p.id.clone());
    }
    Ok(slots)
}

/// Single-elimination structure over `slots`, ids prefixed with `prefix`.
fn upper_bracket(slots: &[Option<ParticipantId>], prefix: &str) -> DrawResult {
    let size = slots.len();
    let round_count = size.trailing_zeros();
    let mut counter = 0;
    let mut next_id = || -> MatchId {
        counter += 1;
        format!("{}M{}", prefix, counter)
    };

    // Round 1: (slot pair index, match) for every fully occupied pair.
    let mut first: Vec<(usize, Match)> = Vec::new();
    let mut lone: Vec<(usize, ParticipantId)> = Vec::new();
    for (pair, chunk) in slots.chunks(2).enumerate() {
        match (&chunk[0], &chunk[1]) {
            (Some(a), Some(b)) => {
                first.push((pair, Match::pairing(next_id(), 1, a.clone(), b.clone())))
            }
            (Some(p), None) | (None, Some(p)) => lone.push((pair, p.clone())),
            (None, None) => {}
        }
    }

    let mut later: Vec<Vec<Match>> = Vec::new();
    for round in 2..=round_count {
        let count = size >> round;
        let matches = (0..count)
            .map(|_| Match::new(next_id(), round, BracketSegment::Upper))
            .collect();
        later.push(matches);
    }

    let round_two_id = |pair: usize| later.first().map(|r| r[pair / 2].id.clone());
    for (pair, m) in first.iter_mut() {
        m.advances_to = round_two_id(*pair);
    }
    let byes = lone
        .into_iter()
        .map(|(pair, participant)| Bye {
            participant,
            advances_to: round_two_id(pair),
        })
        .collect();
    for r in 1..later.len() {
        let (done, rest) = later.split_at_mut(r);
        for (i, m) in done[r - 1].iter_mut().enumerate() {
            m.advances_to = Some(rest[0][i / 2].id.clone());
        }
    }

    let mut rounds = vec![Round {
        index: 1,
        match_ids: first.iter().map(|(_, m)| m.id.clone()).collect(),
    }];
    rounds.extend(later.iter().zip(2..).map(|(ms, index)| Round {
        index,
        match_ids: ms.iter().map(|m| m.id.clone()).collect(),
    }));
    let matches = first
        .into_iter()
        .map(|(_, m)| m)
        .chain(later.into_iter().flatten())
        .collect();

    DrawResult {
        matches,
        rounds,
        byes,
        ..DrawResult::default()
    }
}

/// Where a lower-bracket slot is filled from.
#[derive(Clone, Debug, Eq, PartialEq)]
enum Source {
    Winner(MatchId),
    Loser(MatchId),
}

impl Source {
    fn match_id(&self) -> &str {
        match self {
            Source::Winner(id) | Source::Loser(id) => id,
        }
    }
}

/// Upper bracket plus `tiers` lower tiers and the deciding matches.
///
/// Every loser of upper round `r` drops into tier `L` as batch `r`; with a second tier,
/// every loser of a tier-`L` round drops into tier `LL`. Each tier plays down to one
/// winner. Tier winners meet from the deepest tier up (`L-FINAL`), and the last one
/// standing meets the upper-bracket winner in `FINAL`. No match has more than two feeders.
fn multi_elimination(slots: &[Option<ParticipantId>], tiers: usize) -> DrawResult {
    let mut result = upper_bracket(slots, "U-");
    let mut matches = std::mem::take(&mut result.matches);
    let upper_winner = result
        .rounds
        .last()
        .and_then(|r| r.match_ids.last())
        .map(|id| Source::Winner(id.clone()));

    let mut batches: Vec<Vec<Source>> = result
        .rounds
        .iter()
        .map(|r| r.match_ids.iter().cloned().map(Source::Loser).collect())
        .collect();
    let mut tier_winners = Vec::new();
    for tier in 0..tiers {
        let tag = "L".repeat(tier + 1);
        let (winner, losers) = lower_tier(&tag, batches, &mut matches);
        tier_winners.push((tag, winner));
        batches = losers;
    }

    let mut lower: Option<Source> = None;
    for (tag, winner) in tier_winners.into_iter().rev() {
        lower = match (winner, lower) {
            (Some(a), Some(b)) => Some(decider(
                format!("{}-FINAL", tag),
                BracketSegment::Lower,
                [a, b],
                &mut matches,
            )),
            (a, b) => a.or(b),
        };
    }
    if let (Some(a), Some(b)) = (upper_winner, lower) {
        decider("FINAL".to_string(), BracketSegment::Final, [a, b], &mut matches);
    }

    result.rounds = rounds_of(&matches);
    result.matches = matches;
    result
}

/// Play one lower tier fed by `batches` of drop-ins, one batch per round.
///
/// Survivors and drop-ins alternate in the pool, consecutive entries meet, and an odd
/// entry waits for the next round. Returns the tier winner and the losers of every
/// tier round.
fn lower_tier(
    tag: &str,
    batches: Vec<Vec<Source>>,
    matches: &mut Vec<Match>,
) -> (Option<Source>, Vec<Vec<Source>>) {
    let mut alive: Vec<Source> = Vec::new();
    let mut round_losers = Vec::new();
    for batch in batches {
        let pool = interleave(alive, batch);
        alive = if pool.len() >= 2 {
            let (winners, losers) = tier_round(tag, round_losers.len() + 1, &pool, matches);
            round_losers.push(losers);
            winners
        } else {
            pool
        };
    }
    while alive.len() >= 2 {
        let (winners, losers) = tier_round(tag, round_losers.len() + 1, &alive, matches);
        round_losers.push(losers);
        alive = winners;
    }
    (alive.pop(), round_losers)
}

fn interleave(survivors: Vec<Source>, drop_ins: Vec<Source>) -> Vec<Source> {
    let mut pool = Vec::with_capacity(survivors.len() + drop_ins.len());
    let mut s = survivors.into_iter();
    let mut d = drop_ins.into_iter();
    loop {
        match (s.next(), d.next()) {
            (None, None) => break,
            (a, b) => pool.extend(a.into_iter().chain(b)),
        }
    }
    pool
}

/// Pair consecutive entries of `pool` into `{tag}-R{round}-M{i}`; an odd last entry
/// carries over. All matches of a tier round share one round index, after their feeders.
fn tier_round(
    tag: &str,
    round: usize,
    pool: &[Source],
    matches: &mut Vec<Match>,
) -> (Vec<Source>, Vec<Source>) {
    let paired = pool.len() - pool.len() % 2;
    let existing: &[Match] = matches;
    let round_index = pool[..paired]
        .iter()
        .map(|s| round_of(existing, s.match_id()))
        .max()
        .unwrap_or(0)
        + 1;
    let mut winners = Vec::new();
    let mut losers = Vec::new();
    for (i, pair) in pool[..paired].chunks(2).enumerate() {
        let id = format!("{}-R{}-M{}", tag, round, i + 1);
        for source in pair {
            link(matches, source, &id);
        }
        matches.push(Match::new(id.clone(), round_index, BracketSegment::Lower));
        winners.push(Source::Winner(id.clone()));
        losers.push(Source::Loser(id));
    }
    winners.extend(pool[paired..].iter().cloned());
    (winners, losers)
}

/// A single match between two bracket winners, after both of their last matches.
fn decider(
    id: MatchId,
    segment: BracketSegment,
    sides: [Source; 2],
    matches: &mut Vec<Match>,
) -> Source {
    let existing: &[Match] = matches;
    let round_index = sides
        .iter()
        .map(|s| round_of(existing, s.match_id()))
        .max()
        .unwrap_or(0)
        + 1;
    for source in &sides {
        link(matches, source, &id);
    }
    matches.push(Match::new(id.clone(), round_index, segment));
    Source::Winner(id)
}

fn round_of(matches: &[Match], id: &str) -> u32 {
    matches
        .iter()
        .find(|m| m.id == id)
        .map_or(0, |m| m.round_index)
}

fn link(matches: &mut [Match], source: &Source, target: &str) {
    if let Some(m) = matches.iter_mut().find(|m| m.id == source.match_id()) {
        let slot = match source {
            Source::Winner(_) => &mut m.advances_to,
            Source::Loser(_) => &mut m.loser_advances_to,
        };
        *slot = Some(target.to_string());
    }
}
