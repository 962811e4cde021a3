//! Left-to-right layered layout.
//!
//! 1. Rank nodes by longest path from a source (Kahn's algorithm).
//! 2. Keep snapshot order within each rank.
//! 3. Place node centres on a grid of rank columns.
//!
//! Self-loops and dangling edges are ignored. Nodes that never reach
//! in-degree zero (on or behind a cycle) share one extra rank at the end.

use crate::graph::{Position, Snapshot};
use std::collections::{HashMap, VecDeque};

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    pub node_width: f64,
    pub node_height: f64,
    /// Horizontal gap between rank columns.
    pub rank_sep: f64,
    /// Vertical gap between nodes of one rank.
    pub node_sep: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_width: 172.0,
            node_height: 36.0,
            rank_sep: 50.0,
            node_sep: 50.0,
        }
    }
}

/// Rank per node id.
pub(crate) fn assign_ranks(snapshot: &Snapshot) -> HashMap<&str, usize> {
    let mut in_degree: HashMap<&str, usize> = HashMap::new();
    let mut successors: HashMap<&str, Vec<&str>> = HashMap::new();
    for n in &snapshot.nodes {
        in_degree.entry(n.id.as_str()).or_insert(0);
    }
    for e in &snapshot.edges {
        if e.is_self_loop()
            || !in_degree.contains_key(e.source.as_str())
            || !in_degree.contains_key(e.target.as_str())
        {
            continue;
        }
        successors
            .entry(e.source.as_str())
            .or_default()
            .push(e.target.as_str());
        if let Some(d) = in_degree.get_mut(e.target.as_str()) {
            *d += 1;
        }
    }

    let mut ranks: HashMap<&str, usize> = HashMap::new();
    let mut queue: VecDeque<&str> = VecDeque::new();
    for n in &snapshot.nodes {
        let id = n.id.as_str();
        if in_degree.get(id) == Some(&0) && !ranks.contains_key(id) {
            ranks.insert(id, 0);
            queue.push_back(id);
        }
    }

    while let Some(current) = queue.pop_front() {
        let rank = ranks.get(current).copied().unwrap_or(0);
        for &succ in successors.get(current).map(Vec::as_slice).unwrap_or(&[]) {
            let r = ranks.entry(succ).or_insert(0);
            *r = (*r).max(rank + 1);
            if let Some(d) = in_degree.get_mut(succ) {
                *d = d.saturating_sub(1);
                if *d == 0 {
                    queue.push_back(succ);
                }
            }
        }
    }

    // Whatever is left never drained: park it after the last rank.
    let drained: Vec<&str> = in_degree
        .iter()
        .filter(|&(_, &d)| d > 0)
        .map(|(&id, _)| id)
        .collect();
    if !drained.is_empty() {
        let tail = ranks.values().copied().max().map_or(0, |m| m + 1);
        for id in drained {
            ranks.insert(id, tail);
        }
    }

    ranks
}

/// Overwrite every node position with its layered position.
pub fn apply_layout(snapshot: &mut Snapshot, config: &LayoutConfig) {
    let placed: HashMap<String, Position> = {
        let ranks = assign_ranks(snapshot);
        let mut per_rank: HashMap<usize, usize> = HashMap::new();
        let mut placed = HashMap::new();
        for n in &snapshot.nodes {
            let Some(&rank) = ranks.get(n.id.as_str()) else {
                continue;
            };
            if placed.contains_key(&n.id) {
                continue;
            }
            let slot = per_rank.entry(rank).or_insert(0);
            let x = rank as f64 * (config.node_width + config.rank_sep) + config.node_width / 2.0;
            let y = *slot as f64 * (config.node_height + config.node_sep) + config.node_height / 2.0;
            *slot += 1;
            placed.insert(n.id.clone(), Position::new(x, y));
        }
        placed
    };

    for n in &mut snapshot.nodes {
        if let Some(&p) = placed.get(&n.id) {
            n.position = p;
        }
    }
}
