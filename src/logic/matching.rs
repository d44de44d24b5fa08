//! Maximum-cardinality matching in a general graph (Edmonds' blossom algorithm).

use std::collections::VecDeque;

/// Mate of every vertex in a maximum matching of the simple graph `edges`
/// over vertices `0..vertex_count`. Parallel edges and self-loops are ignored.
pub(crate) fn maximum_matching(
    vertex_count: usize,
    edges: &[(usize, usize)],
) -> Vec<Option<usize>> {
    let mut adj: Vec<Vec<usize>> = vec![Vec::new(); vertex_count];
    for &(u, v) in edges {
        if u != v && !adj[u].contains(&v) {
            adj[u].push(v);
            adj[v].push(u);
        }
    }
    let mut search = Blossom::new(adj);
    for root in 0..vertex_count {
        if search.mate[root].is_none() {
            if let Some(end) = search.find_augmenting_path(root) {
                search.augment(end);
            }
        }
    }
    search.mate
}

struct Blossom {
    adj: Vec<Vec<usize>>,
    mate: Vec<Option<usize>>,
    parent: Vec<Option<usize>>,
    base: Vec<usize>,
    used: Vec<bool>,
    in_blossom: Vec<bool>,
    queue: VecDeque<usize>,
}

impl Blossom {
    fn new(adj: Vec<Vec<usize>>) -> Self {
        let n = adj.len();
        Self {
            adj,
            mate: vec![None; n],
            parent: vec![None; n],
            base: (0..n).collect(),
            used: vec![false; n],
            in_blossom: vec![false; n],
            queue: VecDeque::new(),
        }
    }

    /// BFS over alternating paths from `root`; returns the free vertex ending an
    /// augmenting path, contracting odd cycles on the way.
    fn find_augmenting_path(&mut self, root: usize) -> Option<usize> {
        let n = self.adj.len();
        self.parent.iter_mut().for_each(|p| *p = None);
        self.used.iter_mut().for_each(|u| *u = false);
        for (i, b) in self.base.iter_mut().enumerate() {
            *b = i;
        }
        self.queue.clear();
        self.used[root] = true;
        self.queue.push_back(root);

        while let Some(v) = self.queue.pop_front() {
            for idx in 0..self.adj[v].len() {
                let to = self.adj[v][idx];
                if self.base[v] == self.base[to] || self.mate[v] == Some(to) {
                    continue;
                }
                let closes_cycle =
                    to == root || self.mate[to].is_some_and(|m| self.parent[m].is_some());
                if closes_cycle {
                    let cur_base = self.lowest_common_ancestor(v, to);
                    self.in_blossom.iter_mut().for_each(|b| *b = false);
                    self.mark_path(v, cur_base, to);
                    self.mark_path(to, cur_base, v);
                    for i in 0..n {
                        if self.in_blossom[self.base[i]] {
                            self.base[i] = cur_base;
                            if !self.used[i] {
                                self.used[i] = true;
                                self.queue.push_back(i);
                            }
                        }
                    }
                } else if self.parent[to].is_none() {
                    self.parent[to] = Some(v);
                    match self.mate[to] {
                        None => return Some(to),
                        Some(next) => {
                            self.used[next] = true;
                            self.queue.push_back(next);
                        }
                    }
                }
            }
        }
        None
    }

    fn lowest_common_ancestor(&self, a: usize, b: usize) -> usize {
        let mut seen = vec![false; self.adj.len()];
        let mut a = a;
        loop {
            a = self.base[a];
            seen[a] = true;
            match self.mate[a].and_then(|m| self.parent[m]) {
                Some(up) => a = up,
                None => break,
            }
        }
        let mut b = b;
        loop {
            b = self.base[b];
            if seen[b] {
                return b;
            }
            match self.mate[b].and_then(|m| self.parent[m]) {
                Some(up) => b = up,
                None => return b,
            }
        }
    }

    fn mark_path(&mut self, mut v: usize, cycle_base: usize, mut child: usize) {
        while self.base[v] != cycle_base {
            let Some(m) = self.mate[v] else { break };
            self.in_blossom[self.base[v]] = true;
            self.in_blossom[self.base[m]] = true;
            self.parent[v] = Some(child);
            child = m;
            match self.parent[m] {
                Some(up) => v = up,
                None => break,
            }
        }
    }

    fn augment(&mut self, end: usize) {
        let mut v = Some(end);
        while let Some(cur) = v {
            let Some(pv) = self.parent[cur] else { break };
            let next = self.mate[pv];
            self.mate[cur] = Some(pv);
            self.mate[pv] = Some(cur);
            v = next;
        }
    }
}
