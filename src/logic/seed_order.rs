//! Ordering helpers shared by every scheduler: seeding sort, seeded shuffle,
//! snake distribution into groups and the standard bracket seed ladder.

use crate::models::{ConfigError, Participant};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Random generator scoped to one draw call.
///
/// With a seed the sequence is reproducible; without one it is seeded from OS entropy.
pub fn draw_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    }
}

/// Ascending by seed rank; unranked participants keep their input order after all ranked ones.
pub fn sort_by_seed(participants: &[Participant]) -> Vec<Participant> {
    let mut ordered = participants.to_vec();
    ordered.sort_by_key(|p| (p.seed_rank.is_none(), p.seed_rank.unwrap_or(0)));
    ordered
}

/// New ordering of `items`. Same seed, same ordering.
pub fn shuffle<T: Clone>(items: &[T], seed: Option<u64>) -> Vec<T> {
    shuffle_with(items, &mut draw_rng(seed))
}

/// Like [`shuffle`], drawing from a generator the caller already holds.
pub fn shuffle_with<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut out = items.to_vec();
    out.shuffle(rng);
    out
}

/// Split into `group_count` groups with a snake pattern (A B C D D C B A A B ...),
/// so every group gets a comparable mix of strengths.
pub fn distribute_into_groups(
    participants: &[Participant],
    group_count: usize,
    seeded: bool,
    seed: Option<u64>,
) -> Result<Vec<Vec<Participant>>, ConfigError> {
    if group_count == 0 {
        return Err(ConfigError::ZeroGroups);
    }
    let ordered = if seeded {
        sort_by_seed(participants)
    } else {
        shuffle(participants, seed)
    };
    let mut groups: Vec<Vec<Participant>> = vec![Vec::new(); group_count];
    for (i, p) in ordered.into_iter().enumerate() {
        groups[snake_index(i, group_count)].push(p);
    }
    Ok(groups)
}

fn snake_index(position: usize, group_count: usize) -> usize {
    let lap = position / group_count;
    let offset = position % group_count;
    if lap % 2 == 1 {
        group_count - 1 - offset
    } else {
        offset
    }
}

/// Smallest power of two >= n (1 for n <= 1).
pub fn next_power_of_two(n: usize) -> usize {
    if n <= 1 {
        1
    } else {
        n.next_power_of_two()
    }
}

/// Standard bracket ladder for `n` slots: entry `i` is the seed rank placed in slot `i`.
///
/// Built by interleaving the ladder for `n / 2` with its mirror (`n + 1 - s`),
/// so ranks 1 and 2 sit in opposite halves and can only meet in the final.
/// For 8 slots: `[1, 8, 4, 5, 2, 7, 3, 6]`.
pub fn bracket_seed_order(n: usize) -> Result<Vec<usize>, ConfigError> {
    if n == 0 || !n.is_power_of_two() {
        return Err(ConfigError::NotPowerOfTwo(n));
    }
    let mut order = vec![1];
    let mut size = 1;
    while size < n {
        size *= 2;
        order = order
            .iter()
            .flat_map(|&s| [s, size + 1 - s])
            .collect();
    }
    Ok(order)
}
