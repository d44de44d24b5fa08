//! Pot-based league phase: every participant plays `rounds` different opponents,
//! the same number from each pot, spread over `rounds` conflict-free rounds.
//!
//! Pots hold `rounds + 1` participants in seed order (pot 1 = strongest). The pairing
//! graph is a union of circulant families:
//! - inside a pot, distance-`d` cycles (plus a diametrical matching when the quota is odd);
//! - between two pots, `per_pot` rotations of the identity matching.
//!
//! Pairings are fixed by the layout; the seed only decides home and away.

use crate::logic::colouring::{first_fit, recolour};
use crate::logic::matching::maximum_matching;
use crate::logic::rounds_of;
use crate::logic::seed_order::{draw_rng, shuffle_with, sort_by_seed};
use crate::models::{
    check_roster, ConfigError, DrawError, DrawResult, Group, LeaguePhaseOptions, Match,
    Participant, ScheduleError,
};
use rand::rngs::StdRng;
use rand::Rng;
use std::cmp::Reverse;
use std::collections::HashMap;

/// Derived league-phase dimensions.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PotLayout {
    pub pot_size: usize,
    pub pot_count: usize,
    /// Opponents each participant draws from every pot, its own included.
    pub per_pot: usize,
}

impl PotLayout {
    /// Validate a field of `participants` playing `rounds` matches each.
    pub fn new(participants: usize, rounds: usize) -> Result<Self, ConfigError> {
        if rounds == 0 {
            return Err(ConfigError::ZeroRounds);
        }
        if participants % 2 == 1 {
            return Err(ConfigError::OddFieldSize(participants));
        }
        let pot_size = rounds + 1;
        if participants == 0 || participants % pot_size != 0 {
            return Err(ConfigError::FieldNotDivisibleByPotSize {
                participants,
                pot_size,
            });
        }
        let pot_count = participants / pot_size;
        if rounds % pot_count != 0 {
            return Err(ConfigError::RoundsNotDivisibleByPots {
                rounds,
                pots: pot_count,
            });
        }
        let per_pot = rounds / pot_count;
        // Intra-pot pairings form a per_pot-regular graph on pot_size vertices.
        if (pot_size * per_pot) % 2 == 1 {
            return Err(ConfigError::OddPotQuota { pot_size, per_pot });
        }
        Ok(Self {
            pot_size,
            pot_count,
            per_pot,
        })
    }

    pub fn rounds(&self) -> usize {
        self.pot_size - 1
    }

    pub fn participants(&self) -> usize {
        self.pot_size * self.pot_count
    }
}

/// Field sizes that pass every league-phase check for `rounds` rounds and whose pairings
/// split into `rounds` rounds, with the smallest one first (0 when there is none).
///
/// Pairings and round assignment do not depend on the draw seed, so every size listed
/// here builds for any seed (country rules aside).
pub fn valid_field_sizes(rounds: usize) -> (usize, Vec<usize>) {
    let valid: Vec<usize> = (1..=rounds)
        .filter(|pots| rounds % pots == 0)
        .filter_map(|pots| PotLayout::new((rounds + 1) * pots, rounds).ok())
        .filter(|layout| {
            let edges: Vec<(usize, usize)> = pairing_families(layout)
                .iter()
                .flat_map(|f| f.edges.iter().map(|&(a, b)| undirected(a, b)))
                .collect();
            assign_rounds(layout.participants(), layout.rounds(), &edges).is_ok()
        })
        .map(|layout| layout.participants())
        .collect();
    (valid.first().copied().unwrap_or(0), valid)
}

/// Draw the league phase.
///
/// Fails with a [`ConfigError`] before any construction when the field does not fit the
/// pot layout, and with a [`ScheduleError`] when a country rule is broken or the
/// pairings cannot be split into `rounds` rounds.
pub fn build_league_phase(
    participants: &[Participant],
    options: &LeaguePhaseOptions,
) -> Result<DrawResult, DrawError> {
    check_roster(participants, 2)?;
    let layout = PotLayout::new(participants.len(), options.rounds)?;
    let ordered = sort_by_seed(participants);

    let families = pairing_families(&layout);
    let mut rng = draw_rng(options.seed);
    let pairings = orient(&families, &mut rng);
    check_countries(&ordered, &pairings, options)?;

    let edges: Vec<(usize, usize)> = pairings
        .iter()
        .map(|p| undirected(p.home, p.away))
        .collect();
    let (colours, strategy) = assign_rounds(layout.participants(), layout.rounds(), &edges)?;
    match strategy {
        Strategy::MaximumMatchings => log::warn!(
            "league phase: colouring needs more than {} rounds, extracted matchings instead",
            layout.rounds()
        ),
        other => log::debug!("league phase: rounds assigned by {:?}", other),
    }

    let mut by_round: Vec<Vec<&Pairing>> = vec![Vec::new(); layout.rounds()];
    for (pairing, &colour) in pairings.iter().zip(&colours) {
        by_round[colour].push(pairing);
    }
    let mut matches = Vec::with_capacity(pairings.len());
    for (r, round) in by_round.iter().enumerate() {
        let round_index = r as u32 + 1;
        for (i, p) in round.iter().enumerate() {
            matches.push(Match::pairing(
                format!("L-R{}-M{}", round_index, i + 1),
                round_index,
                ordered[p.home].id.clone(),
                ordered[p.away].id.clone(),
            ));
        }
    }
    let rounds = rounds_of(&matches);

    let groups = ordered
        .chunks(layout.pot_size)
        .enumerate()
        .map(|(i, pot)| Group {
            id: format!("POT{}", i + 1),
            name: format!("Pot {}", i + 1),
            participant_ids: pot.iter().map(|p| p.id.clone()).collect(),
            match_ids: Vec::new(),
        })
        .collect();

    log::info!(
        "league phase: {} participants, {} pots of {}, {} matches over {} rounds",
        layout.participants(),
        layout.pot_count,
        layout.pot_size,
        matches.len(),
        layout.rounds()
    );
    Ok(DrawResult {
        matches,
        rounds,
        groups,
        description: format!(
            "League phase: {} participants, {} pots of {}, {} matches each ({} from every pot)",
            layout.participants(),
            layout.pot_count,
            layout.pot_size,
            layout.rounds(),
            layout.per_pot
        ),
        ..DrawResult::default()
    })
}

/// How a family keeps home and away balanced when oriented.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Balance {
    /// A cycle family: orienting every edge the same way gives everyone one home, one away.
    Cyclic,
    /// One of two consecutive rotation families that take opposite directions.
    Paired,
    /// No structure to exploit; each edge is oriented on its own.
    Free,
}

struct Family {
    /// Edges as (index, index) in seed order.
    edges: Vec<(usize, usize)>,
    balance: Balance,
}

/// An oriented pairing; indices into the seed-ordered field.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct Pairing {
    home: usize,
    away: usize,
}

/// All pairing families: intra-pot first (pot by pot), then every pot pair.
fn pairing_families(layout: &PotLayout) -> Vec<Family> {
    let s = layout.pot_size;
    let k = layout.per_pot;
    let mut families = Vec::new();

    for pot in 0..layout.pot_count {
        let base = pot * s;
        for d in 1..=k / 2 {
            families.push(Family {
                edges: (0..s).map(|i| (base + i, base + (i + d) % s)).collect(),
                balance: Balance::Cyclic,
            });
        }
        if k % 2 == 1 {
            // s is even here, otherwise the layout is rejected.
            families.push(Family {
                edges: (0..s / 2).map(|i| (base + i, base + i + s / 2)).collect(),
                balance: Balance::Free,
            });
        }
    }

    for a in 0..layout.pot_count {
        for b in a + 1..layout.pot_count {
            for r in 0..k {
                let balance = if k % 2 == 1 && r == k - 1 {
                    Balance::Free
                } else {
                    Balance::Paired
                };
                families.push(Family {
                    edges: (0..s).map(|i| (a * s + i, b * s + (i + r) % s)).collect(),
                    balance,
                });
            }
        }
    }
    families
}

/// Decide home and away. Cyclic families flip once as a whole, paired rotation families
/// share one flip in opposite directions, free edges flip individually.
fn orient(families: &[Family], rng: &mut StdRng) -> Vec<Pairing> {
    let mut pairings = Vec::new();
    let mut open_pair: Option<bool> = None;
    for family in families {
        let forward = match family.balance {
            Balance::Cyclic => Some(rng.gen_bool(0.5)),
            Balance::Paired => Some(match open_pair.take() {
                Some(previous) => !previous,
                None => {
                    let flip = rng.gen_bool(0.5);
                    open_pair = Some(flip);
                    flip
                }
            }),
            Balance::Free => None,
        };
        for &(a, b) in &family.edges {
            let (home, away) = match forward {
                Some(true) => (a, b),
                Some(false) => (b, a),
                None => {
                    let ends = shuffle_with(&[a, b], rng);
                    (ends[0], ends[1])
                }
            };
            pairings.push(Pairing { home, away });
        }
    }
    pairings
}

/// Validation only: no repair is attempted.
fn check_countries(
    ordered: &[Participant],
    pairings: &[Pairing],
    options: &LeaguePhaseOptions,
) -> Result<(), ScheduleError> {
    if !options.country_lock && options.max_per_country == 0 {
        return Ok(());
    }
    let mut faced: Vec<HashMap<String, usize>> = vec![HashMap::new(); ordered.len()];
    for p in pairings {
        let home = &ordered[p.home];
        let away = &ordered[p.away];
        let (hc, ac) = (home.country(), away.country());
        if let (true, Some(h), Some(a)) = (options.country_lock, hc, ac) {
            if h.eq_ignore_ascii_case(a) {
                return Err(ScheduleError::CountryLockViolated {
                    first: home.id.clone(),
                    second: away.id.clone(),
                    country: h.to_string(),
                });
            }
        }
        if let Some(a) = ac {
            *faced[p.home].entry(a.to_ascii_uppercase()).or_insert(0) += 1;
        }
        if let Some(h) = hc {
            *faced[p.away].entry(h.to_ascii_uppercase()).or_insert(0) += 1;
        }
    }
    if options.max_per_country == 0 {
        return Ok(());
    }
    for (i, counts) in faced.iter().enumerate() {
        let mut over: Vec<(&String, &usize)> = counts
            .iter()
            .filter(|(_, count)| **count > options.max_per_country)
            .collect();
        over.sort();
        if let Some(&(country, count)) = over.first() {
            return Err(ScheduleError::CountryLimitExceeded {
                participant: ordered[i].id.clone(),
                country: country.clone(),
                count: *count,
                max: options.max_per_country,
            });
        }
    }
    Ok(())
}

/// Edge with the lower index first, so round assignment never sees home and away.
fn undirected(a: usize, b: usize) -> (usize, usize) {
    (a.min(b), a.max(b))
}

/// Which step of [`assign_rounds`] placed every pairing.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Strategy {
    FirstFit(&'static str),
    Recolouring,
    MaximumMatchings,
}

/// Round (0-based) of every edge, no vertex twice in a round.
///
/// Tries first-fit colouring under three edge orders, then recolouring with
/// alternating-chain swaps, then peeling off one maximum matching per round.
fn assign_rounds(
    vertex_count: usize,
    rounds: usize,
    edges: &[(usize, usize)],
) -> Result<(Vec<usize>, Strategy), ScheduleError> {
    let mut degree = vec![0usize; vertex_count];
    for &(u, v) in edges {
        degree[u] += 1;
        degree[v] += 1;
    }
    let natural: Vec<usize> = (0..edges.len()).collect();
    let mut by_lowest = natural.clone();
    by_lowest.sort_by_key(|&e| edges[e].0.min(edges[e].1));
    let mut by_degree = natural.clone();
    by_degree.sort_by_key(|&e| Reverse(degree[edges[e].0] + degree[edges[e].1]));

    for (name, order) in [
        ("natural order", &natural),
        ("lowest endpoint", &by_lowest),
        ("degree", &by_degree),
    ] {
        if let Some(colours) = first_fit(vertex_count, rounds, edges, order) {
            return Ok((colours, Strategy::FirstFit(name)));
        }
    }
    if let Some(colours) = recolour(vertex_count, rounds, edges, &natural) {
        return Ok((colours, Strategy::Recolouring));
    }
    peel_matchings(vertex_count, rounds, edges).map(|c| (c, Strategy::MaximumMatchings))
}

/// One maximum matching per round. Duplicate pairings are taken one copy at a time.
fn peel_matchings(
    vertex_count: usize,
    rounds: usize,
    edges: &[(usize, usize)],
) -> Result<Vec<usize>, ScheduleError> {
    let mut colours = vec![0; edges.len()];
    let mut remaining: Vec<usize> = (0..edges.len()).collect();
    for round in 0..rounds {
        if remaining.is_empty() {
            break;
        }
        let mut simple: Vec<(usize, usize)> = remaining
            .iter()
            .map(|&e| {
                let (u, v) = edges[e];
                (u.min(v), u.max(v))
            })
            .collect();
        simple.sort_unstable();
        simple.dedup();
        let mate = maximum_matching(vertex_count, &simple);

        let mut taken = vec![false; vertex_count];
        let mut left = Vec::new();
        for e in remaining {
            let (u, v) = edges[e];
            if !taken[u] && !taken[v] && mate[u] == Some(v) {
                taken[u] = true;
                taken[v] = true;
                colours[e] = round;
            } else {
                left.push(e);
            }
        }
        remaining = left;
    }
    if remaining.is_empty() {
        Ok(colours)
    } else {
        Err(ScheduleError::RoundAssignmentFailed {
            rounds,
            unassigned: remaining.len(),
        })
    }
}
