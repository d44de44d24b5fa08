//! Proper edge colouring with a fixed number of colours (rounds).
//!
//! [`first_fit`] is the plain greedy pass. [`recolour`] keeps going where greedy gets stuck:
//! it swaps two colours along an alternating chain to free a colour at both endpoints, and
//! when every chain loops back it evicts the clashing edges and colours them again later.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Attempts per edge before [`recolour`] gives up.
const STEPS_PER_EDGE: usize = 50;

/// Fixed so the outcome depends on the graph alone, never on the caller's seed.
const REPAIR_SEED: u64 = 0x5eed_0f_d4a3;

/// Lowest free colour for every edge in `order`, or `None` as soon as an edge has none.
pub(crate) fn first_fit(
    vertex_count: usize,
    colours: usize,
    edges: &[(usize, usize)],
    order: &[usize],
) -> Option<Vec<usize>> {
    let mut busy = vec![vec![false; colours]; vertex_count];
    let mut out = vec![0; edges.len()];
    for &e in order {
        let (u, v) = edges[e];
        let c = (0..colours).find(|&c| !busy[u][c] && !busy[v][c])?;
        busy[u][c] = true;
        busy[v][c] = true;
        out[e] = c;
    }
    Some(out)
}

/// Colour every edge with `colours` colours, repairing dead ends with alternating-chain
/// swaps and evictions. Deterministic for a given graph and order.
pub(crate) fn recolour(
    vertex_count: usize,
    colours: usize,
    edges: &[(usize, usize)],
    order: &[usize],
) -> Option<Vec<usize>> {
    if colours == 0 {
        return edges.is_empty().then(Vec::new);
    }
    let mut state = Colouring::new(vertex_count, colours, edges);
    let mut rng = StdRng::seed_from_u64(REPAIR_SEED ^ edges.len() as u64);
    let mut pending: Vec<usize> = order.iter().rev().copied().collect();
    let limit = STEPS_PER_EDGE * edges.len().max(1);
    let mut steps = 0;

    while let Some(e) = pending.pop() {
        steps += 1;
        if steps > limit {
            return None;
        }
        let (u, v) = edges[e];
        if let Some(c) = state.common_free(u, v) {
            state.put(e, c);
            continue;
        }
        if state.swap_into(e) {
            continue;
        }
        let c = rng.gen_range(0..colours);
        for w in [u, v] {
            if let Some(evicted) = state.at[w][c] {
                state.take(evicted);
                pending.push(evicted);
            }
        }
        state.put(e, c);
    }
    state.colour.into_iter().collect()
}

struct Colouring<'a> {
    edges: &'a [(usize, usize)],
    colours: usize,
    /// at[vertex][colour] = edge holding that colour at the vertex
    at: Vec<Vec<Option<usize>>>,
    colour: Vec<Option<usize>>,
}

impl<'a> Colouring<'a> {
    fn new(vertex_count: usize, colours: usize, edges: &'a [(usize, usize)]) -> Self {
        Self {
            edges,
            colours,
            at: vec![vec![None; colours]; vertex_count],
            colour: vec![None; edges.len()],
        }
    }

    fn put(&mut self, e: usize, c: usize) {
        let (u, v) = self.edges[e];
        self.at[u][c] = Some(e);
        self.at[v][c] = Some(e);
        self.colour[e] = Some(c);
    }

    fn take(&mut self, e: usize) {
        if let Some(c) = self.colour[e].take() {
            let (u, v) = self.edges[e];
            self.at[u][c] = None;
            self.at[v][c] = None;
        }
    }

    fn free(&self, w: usize) -> Vec<usize> {
        (0..self.colours)
            .filter(|&c| self.at[w][c].is_none())
            .collect()
    }

    fn common_free(&self, u: usize, v: usize) -> Option<usize> {
        (0..self.colours).find(|&c| self.at[u][c].is_none() && self.at[v][c].is_none())
    }

    /// Edges of the a/b alternating chain leaving `start` on colour `a`.
    /// `start` has `b` free, so the chain is a path.
    fn chain(&self, start: usize, a: usize, b: usize) -> Vec<usize> {
        let mut path = Vec::new();
        let mut w = start;
        let mut c = a;
        while let Some(e) = self.at[w][c] {
            if path.len() >= self.edges.len() {
                break;
            }
            path.push(e);
            let (x, y) = self.edges[e];
            w = if x == w { y } else { x };
            c = if c == a { b } else { a };
        }
        path
    }

    /// Free a colour at both ends of the uncoloured edge `e` by swapping a chain at its
    /// second endpoint, then colour `e`. False when every chain runs into the first endpoint.
    fn swap_into(&mut self, e: usize) -> bool {
        let (u, v) = self.edges[e];
        let free_v = self.free(v);
        for a in self.free(u) {
            for &b in &free_v {
                let path = self.chain(v, a, b);
                let touches_u = path.iter().any(|&p| {
                    let (x, y) = self.edges[p];
                    x == u || y == u
                });
                if touches_u {
                    continue;
                }
                let flipped: Vec<(usize, usize)> = path
                    .iter()
                    .map(|&p| (p, if self.colour[p] == Some(a) { b } else { a }))
                    .collect();
                for &(p, _) in &flipped {
                    self.take(p);
                }
                for (p, c) in flipped {
                    self.put(p, c);
                }
                self.put(e, a);
                return true;
            }
        }
        false
    }
}
