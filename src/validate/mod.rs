//! DAG well-formedness verdict for a node/edge snapshot.
//!
//! Checks run in a fixed order and the first failure wins:
//! 1) at least 2 nodes
//! 2) self-loops are noted (no early exit)
//! 3) every node touches at least one edge (otherwise every edge is flagged)
//! 4) no cycle (only the first cycle found is reported)
//! 5) no self-loop
//!
//! Edges whose source or target is not a node id never enter the adjacency,
//! so they take no part in checks 2, 4 and 5. Check 3 looks at the endpoints
//! of every edge, dangling or not.
//!
//! Never fails and never mutates its inputs.

mod cycle;

use crate::graph::{Edge, Node};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt;
use tracing::debug;

/// Which check decided the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    TooFewNodes,
    Disconnected,
    Cycle,
    SelfLoop,
    Valid,
}

impl Verdict {
    pub fn message(self) -> &'static str {
        match self {
            Verdict::TooFewNodes => "INVALID: Add at least 2 nodes",
            Verdict::Disconnected => "INVALID: All nodes must be connected to at least one edge",
            Verdict::Cycle => "INVALID: The graph contains a cycle",
            Verdict::SelfLoop => "INVALID: The graph contains a self-loop",
            Verdict::Valid => "VALID: The graph is a valid DAG",
        }
    }

    pub fn is_valid(self) -> bool {
        self == Verdict::Valid
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub valid: bool,
    pub message: String,
    /// Edges implicated in the failure, without duplicates, in the order they
    /// were reported. Empty when valid.
    pub invalid_edge_ids: Vec<String>,
    pub verdict: Verdict,
}

impl ValidationResult {
    fn new(verdict: Verdict, invalid_edge_ids: Vec<String>) -> Self {
        Self {
            valid: verdict.is_valid(),
            message: verdict.message().to_string(),
            invalid_edge_ids,
            verdict,
        }
    }

    pub fn is_edge_invalid(&self, edge_id: &str) -> bool {
        self.invalid_edge_ids.iter().any(|id| id == edge_id)
    }
}

/// Insertion-ordered id list that drops repeats.
#[derive(Default)]
struct EdgeIds<'a> {
    seen: HashSet<&'a str>,
    ids: Vec<String>,
}

impl<'a> EdgeIds<'a> {
    fn push(&mut self, id: &'a str) {
        if self.seen.insert(id) {
            self.ids.push(id.to_string());
        }
    }

    fn into_vec(self) -> Vec<String> {
        self.ids
    }
}

pub fn validate(nodes: &[Node], edges: &[Edge]) -> ValidationResult {
    // 1) Minimum size.
    if nodes.len() < 2 {
        return ValidationResult::new(Verdict::TooFewNodes, Vec::new());
    }

    // Node ids in traversal order, first occurrence wins.
    let mut known = HashSet::<&str>::new();
    let mut order = Vec::<&str>::new();
    for n in nodes {
        if known.insert(n.id.as_str()) {
            order.push(n.id.as_str());
        }
    }

    let live: Vec<&Edge> = edges
        .iter()
        .filter(|e| {
            let ok = known.contains(e.source.as_str()) && known.contains(e.target.as_str());
            if !ok {
                debug!(edge = %e.id, source = %e.source, target = %e.target, "ignoring dangling edge");
            }
            ok
        })
        .collect();

    // 2) Self-loops.
    let mut self_loops = EdgeIds::default();
    for e in live.iter().filter(|e| e.is_self_loop()) {
        self_loops.push(e.id.as_str());
    }

    // 3) Connectivity.
    let connected: HashSet<&str> = edges
        .iter()
        .flat_map(|e| [e.source.as_str(), e.target.as_str()])
        .collect();
    if let Some(lonely) = order.iter().find(|id| !connected.contains(*id)) {
        debug!(node = %lonely, "node has no incident edge");
        let mut all = EdgeIds::default();
        for e in edges {
            all.push(e.id.as_str());
        }
        return ValidationResult::new(Verdict::Disconnected, all.into_vec());
    }

    // 4) Cycles.
    let mut adjacency = HashMap::<&str, Vec<&str>>::new();
    for e in &live {
        adjacency
            .entry(e.source.as_str())
            .or_default()
            .push(e.target.as_str());
    }

    if let Some(cycle) = cycle::find_first_cycle(&order, &adjacency) {
        debug!(cycle = %cycle.join(" -> "), "cycle detected");
        let mut ids = self_loops;
        for (i, &from) in cycle.iter().enumerate() {
            let to = cycle[(i + 1) % cycle.len()];
            if let Some(e) = live.iter().find(|e| e.source == from && e.target == to) {
                ids.push(e.id.as_str());
            }
        }
        return ValidationResult::new(Verdict::Cycle, ids.into_vec());
    }

    // 5) Self-loops that did not surface as a cycle.
    if !self_loops.ids.is_empty() {
        return ValidationResult::new(Verdict::SelfLoop, self_loops.into_vec());
    }

    ValidationResult::new(Verdict::Valid, Vec::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn nodes(ids: &[&str]) -> Vec<Node> {
        ids.iter().map(|id| Node::new(*id, format!("stage {id}"))).collect()
    }

    fn edges(links: &[(&str, &str, &str)]) -> Vec<Edge> {
        links.iter().map(|&(id, s, t)| Edge::new(id, s, t)).collect()
    }

    fn ids(result: &ValidationResult) -> Vec<&str> {
        result.invalid_edge_ids.iter().map(String::as_str).collect()
    }

    #[test]
    fn fewer_than_two_nodes_is_invalid_regardless_of_edges() {
        for (n, e) in [
            (nodes(&[]), edges(&[])),
            (nodes(&["1"]), edges(&[])),
            (nodes(&["1"]), edges(&[("e1", "1", "1")])),
        ] {
            let r = validate(&n, &e);
            assert!(!r.valid);
            assert_eq!(r.verdict, Verdict::TooFewNodes);
            assert_eq!(r.message, "INVALID: Add at least 2 nodes");
            assert!(r.invalid_edge_ids.is_empty());
        }
    }

    #[test]
    fn two_node_chain_then_back_edge() {
        let n = nodes(&["1", "2"]);
        let mut e = edges(&[("e1", "1", "2")]);

        let r = validate(&n, &e);
        assert!(r.valid);
        assert_eq!(r.message, "VALID: The graph is a valid DAG");
        assert!(r.invalid_edge_ids.is_empty());

        e.push(Edge::new("e2", "2", "1"));
        let r = validate(&n, &e);
        assert!(!r.valid);
        assert_eq!(r.message, "INVALID: The graph contains a cycle");
        assert_eq!(ids(&r), vec!["e1", "e2"]);
        assert!(r.is_edge_invalid("e2"));
    }

    #[test]
    fn unconnected_node_flags_every_edge() {
        let n = nodes(&["a", "b", "c", "lonely"]);
        let e = edges(&[("ab", "a", "b"), ("bc", "b", "c")]);
        let r = validate(&n, &e);
        assert_eq!(r.verdict, Verdict::Disconnected);
        assert_eq!(
            r.message,
            "INVALID: All nodes must be connected to at least one edge"
        );
        assert_eq!(ids(&r), vec!["ab", "bc"]);
    }

    #[test]
    fn connectivity_wins_over_cycle() {
        let n = nodes(&["a", "b", "c"]);
        let e = edges(&[("ab", "a", "b"), ("ba", "b", "a")]);
        let r = validate(&n, &e);
        assert_eq!(r.verdict, Verdict::Disconnected);
        assert_eq!(ids(&r), vec!["ab", "ba"]);
    }

    #[test]
    fn three_cycle_reports_exactly_its_edges() {
        let n = nodes(&["s", "a", "b", "c"]);
        let e = edges(&[
            ("sa", "s", "a"),
            ("ab", "a", "b"),
            ("bc", "b", "c"),
            ("ca", "c", "a"),
        ]);
        let r = validate(&n, &e);
        assert_eq!(r.verdict, Verdict::Cycle);
        let mut got = ids(&r);
        got.sort();
        assert_eq!(got, vec!["ab", "bc", "ca"]);
    }

    #[test]
    fn self_loop_reports_its_edge_once() {
        let n = nodes(&["a", "b"]);
        let e = edges(&[("ab", "a", "b"), ("loop", "b", "b")]);
        let r = validate(&n, &e);
        assert!(!r.valid);
        assert_eq!(r.verdict, Verdict::Cycle);
        assert_eq!(ids(&r), vec!["loop"]);
    }

    #[test]
    fn only_first_cycle_is_reported() {
        let n = nodes(&["a", "b", "c", "d"]);
        let e = edges(&[
            ("ab", "a", "b"),
            ("ba", "b", "a"),
            ("cd", "c", "d"),
            ("dc", "d", "c"),
        ]);
        let r = validate(&n, &e);
        assert_eq!(ids(&r), vec!["ab", "ba"]);
    }

    #[test]
    fn parallel_edges_report_first_match() {
        let n = nodes(&["a", "b"]);
        let e = edges(&[("ab1", "a", "b"), ("ab2", "a", "b"), ("ba", "b", "a")]);
        let r = validate(&n, &e);
        assert_eq!(ids(&r), vec!["ab1", "ba"]);
    }

    #[test]
    fn valid_dag_with_diamond() {
        let n = nodes(&["src", "l", "r", "sink"]);
        let e = edges(&[
            ("1", "src", "l"),
            ("2", "src", "r"),
            ("3", "l", "sink"),
            ("4", "r", "sink"),
        ]);
        assert!(validate(&n, &e).valid);
    }

    #[test]
    fn dangling_edges_are_inert_for_cycles() {
        let n = nodes(&["a", "b"]);
        // A cycle through a missing node does not count.
        let e = edges(&[("ab", "a", "b"), ("bx", "b", "ghost"), ("xa", "ghost", "a")]);
        assert!(validate(&n, &e).valid);
    }

    #[test]
    fn dangling_edge_still_connects_its_real_endpoint() {
        // b's only edge points at a removed node; b still counts as connected.
        let n = nodes(&["a", "b", "c"]);
        let e = edges(&[("ac", "a", "c"), ("bx", "b", "ghost")]);
        let r = validate(&n, &e);
        assert_eq!(r.verdict, Verdict::Valid);
        assert!(r.invalid_edge_ids.is_empty());
    }

    #[test]
    fn duplicate_node_ids_count_toward_minimum_size() {
        let n = nodes(&["a", "a"]);
        let r = validate(&n, &[]);
        assert_eq!(r.verdict, Verdict::Disconnected);
        assert!(r.invalid_edge_ids.is_empty());
    }

    #[test]
    fn duplicate_edge_ids_are_reported_once() {
        let n = nodes(&["a", "b", "lonely"]);
        let e = edges(&[("dup", "a", "b"), ("dup", "b", "a")]);
        let r = validate(&n, &e);
        assert_eq!(r.verdict, Verdict::Disconnected);
        assert_eq!(ids(&r), vec!["dup"]);
    }

    #[test]
    fn duplicated_node_inside_cycle_is_walked_once() {
        let n = nodes(&["a", "b", "a", "c"]);
        let e = edges(&[("ab", "a", "b"), ("bc", "b", "c"), ("ca", "c", "a")]);
        let r = validate(&n, &e);
        assert_eq!(r.verdict, Verdict::Cycle);
        assert_eq!(ids(&r), vec!["ab", "bc", "ca"]);
    }

    #[test]
    fn long_chain_validates() {
        let ids: Vec<String> = (0..100_000).map(|i| i.to_string()).collect();
        let n: Vec<Node> = ids.iter().map(|id| Node::new(id.as_str(), id.as_str())).collect();
        let e: Vec<Edge> = ids
            .windows(2)
            .map(|w| Edge::new(format!("{}-{}", w[0], w[1]), w[0].as_str(), w[1].as_str()))
            .collect();
        assert!(validate(&n, &e).valid);
    }

    #[test]
    fn validation_is_idempotent() {
        let n = nodes(&["1", "2", "3"]);
        let e = edges(&[("a", "1", "2"), ("b", "2", "3"), ("c", "3", "2")]);
        let before = (n.clone(), e.clone());
        let first = validate(&n, &e);
        let second = validate(&n, &e);
        assert_eq!(first, second);
        assert_eq!((n, e), before);
    }

    #[test]
    fn serializes_with_camel_case_ids() {
        let r = validate(&nodes(&["1"]), &[]);
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "valid": false,
                "message": "INVALID: Add at least 2 nodes",
                "invalidEdgeIds": [],
                "verdict": "too_few_nodes"
            })
        );
    }
}
