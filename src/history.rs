//! Linear undo stack of full graph snapshots.
//!
//! One entry per undoable action, pushed *before* the action mutates
//! anything. Popped entries are dropped (there is no redo).

use crate::graph::{Edge, Node, Snapshot};
use std::collections::VecDeque;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct EditHistory {
    entries: VecDeque<Snapshot>,
    /// Oldest entries are evicted beyond this many. `None` = unbounded.
    limit: Option<usize>,
}

impl EditHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// History that keeps at most `limit` entries. A limit of 0 keeps nothing.
    pub fn with_capacity_limit(limit: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            limit: Some(limit),
        }
    }

    /// Record the state as it is right before a structural mutation.
    pub fn snapshot(&mut self, nodes: &[Node], edges: &[Edge]) {
        self.push(Snapshot::new(nodes.to_vec(), edges.to_vec()));
    }

    pub fn push(&mut self, snapshot: Snapshot) {
        self.entries.push_back(snapshot);
        if let Some(limit) = self.limit {
            while self.entries.len() > limit {
                self.entries.pop_front();
            }
        }
        debug!(depth = self.entries.len(), "history snapshot");
    }

    /// Pop the most recent snapshot. `None` (and no change) when empty.
    pub fn undo(&mut self) -> Option<Snapshot> {
        let prev = self.entries.pop_back();
        if prev.is_some() {
            debug!(depth = self.entries.len(), "history undo");
        }
        prev
    }

    pub fn can_undo(&self) -> bool {
        !self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshot `state`, then apply `mutate` to it, as one step.
    ///
    /// `mutate` runs on a working copy. On `Ok` the old state is pushed and
    /// the copy replaces `state`; on `Err` neither `state` nor the history
    /// changes.
    pub fn record<T, E>(
        &mut self,
        state: &mut Snapshot,
        mutate: impl FnOnce(&mut Snapshot) -> Result<T, E>,
    ) -> Result<T, E> {
        let mut next = state.clone();
        let out = mutate(&mut next)?;
        let prev = std::mem::replace(state, next);
        self.push(prev);
        Ok(out)
    }
}
