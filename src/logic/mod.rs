//! Draw algorithms: seeding helpers, brackets, round robin, league phase and formulas.

mod bracket;
mod colouring;
mod formula;
mod league_phase;
mod matching;
mod pipeline;
mod round_robin;
pub mod seed_order;

pub use bracket::build_bracket;
pub use formula::{parse_formula, Step};
pub use league_phase::{build_league_phase, valid_field_sizes, PotLayout};
pub use pipeline::{run_formula, run_steps, Cohort, GroupMembers};
pub use round_robin::build_round_robin;

use crate::models::{Match, Round};
use std::collections::BTreeMap;

/// Round view over `matches`, ordered by round index, matches in list order.
pub(crate) fn rounds_of(matches: &[Match]) -> Vec<Round> {
    let mut by_index: BTreeMap<u32, Vec<String>> = BTreeMap::new();
    for m in matches {
        by_index.entry(m.round_index).or_default().push(m.id.clone());
    }
    by_index
        .into_iter()
        .map(|(index, match_ids)| Round { index, match_ids })
        .collect()
}
