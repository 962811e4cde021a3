//! First-cycle search over a directed adjacency relation.
//!
//! DFS with Temp/Perm marks, driven by an explicit frame stack. Marks are
//! shared across start nodes, so a node finished from one start is never
//! walked again. The reported cycle depends on start order and neighbour
//! order; only the first one found is returned.

use std::collections::HashMap;

#[derive(Copy, Clone, PartialEq, Eq)]
enum Mark {
    /// On the current DFS path.
    Temp,
    /// Fully explored.
    Perm,
}

/// Returns the node sequence of the first cycle reached, starting at the node
/// that closed it. The closing edge runs from the last element back to the
/// first. A self-loop comes back as a single-element cycle.
///
/// Iterative: each frame is a node on the current path plus the index of the
/// next neighbour to visit, so path length is bounded by memory, not stack.
pub(crate) fn find_first_cycle<'a>(
    order: &[&'a str],
    adjacency: &HashMap<&'a str, Vec<&'a str>>,
) -> Option<Vec<&'a str>> {
    let mut marks = HashMap::<&str, Mark>::new();
    // frames[i] pairs with path[i].
    let mut frames = Vec::<usize>::new();
    let mut path = Vec::<&str>::new();

    for &start in order {
        if marks.contains_key(start) {
            continue;
        }
        marks.insert(start, Mark::Temp);
        path.push(start);
        frames.push(0);

        while let (Some(&v), Some(next)) = (path.last(), frames.last_mut()) {
            let neighbours = adjacency.get(v).map(Vec::as_slice).unwrap_or(&[]);
            let Some(&w) = neighbours.get(*next) else {
                // All neighbours done.
                marks.insert(v, Mark::Perm);
                path.pop();
                frames.pop();
                continue;
            };
            *next += 1;

            match marks.get(w) {
                None => {
                    marks.insert(w, Mark::Temp);
                    path.push(w);
                    frames.push(0);
                }
                Some(Mark::Temp) => {
                    // w is on the current path => the path suffix from w is a cycle.
                    let at = path.iter().position(|&p| p == w).unwrap_or(0);
                    return Some(path[at..].to_vec());
                }
                Some(Mark::Perm) => {}
            }
        }
    }
    None
}
