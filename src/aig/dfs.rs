//! Provides a post-order DFS visitor to allow simple AIG traversal.
//!
//! See [`Dfs`] for details.

use std::collections::HashSet;

use super::{Aig, AigError, GateId, Result};

/// A simple post-order DFS visitor, fanins always come before the gates using them.
///
/// You can:
/// - start a DFS from a gate using [`from_gate`]
/// - or visit all the active netlist by starting from the outputs using [`from_outputs`].
///
/// In the latter case, outputs are processed in declaration order: the fanin cone of the first
/// output comes first, then the non-previously-explored part of the second output, and so on.
/// Within a gate, fanin 0 is explored before fanin 1. Undefined gates are never yielded.
///
/// The traversal keeps an explicit stack, so arbitrarily deep circuits are fine.
///
/// [`from_gate`]: Dfs::from_gate
/// [`from_outputs`]: Dfs::from_outputs
///
/// Example:
///
/// ```rust
/// use fraig::{Aig, AigEdge, aig::dfs::Dfs};
/// let mut aig = Aig::new();
/// let a = aig.new_input().unwrap();
/// let b = aig.new_input().unwrap();
/// let x = aig.new_and(AigEdge::new(a, false), AigEdge::new(b, true)).unwrap();
/// let o = aig.new_output(AigEdge::new(x, false)).unwrap();
///
/// let mut dfs = Dfs::from_outputs(&aig);
/// let mut order = Vec::new();
/// while let Some(id) = dfs.next(&aig).unwrap() {
///     // You can still borrow mut aig here
///     order.push(id);
/// }
/// assert_eq!(order, vec![a, b, x, o]);
/// ```
pub struct Dfs {
    /// Pending gates. A gate is pushed once with `expanded = false` when discovered,
    /// and once more with `expanded = true` when its fanins have been pushed.
    stack: Vec<(GateId, bool)>,
    /// Gates expanded but not yielded yet. Meeting one again means the graph has a cycle.
    in_progress: HashSet<GateId>,
    done: HashSet<GateId>,
    /// Reversed, so that the next start is on top.
    starts: Vec<GateId>,
}

impl Dfs {
    /// Create a DFS from the initial start gate.
    /// You will only browse the fanin cone of this gate.
    pub fn from_gate(start: GateId) -> Self {
        Dfs::from_starts(vec![start])
    }

    /// Create a DFS from the outputs of the given AIG.
    pub fn from_outputs(aig: &Aig) -> Self {
        Dfs::from_starts(aig.get_outputs().to_vec())
    }

    /// Create a DFS visiting every gate reachable from any of `starts`, in that order.
    pub fn from_starts(mut starts: Vec<GateId>) -> Self {
        starts.reverse();
        Dfs {
            stack: Vec::new(),
            in_progress: HashSet::new(),
            done: HashSet::new(),
            starts,
        }
    }

    /// Yield the next gate of the DFS, or None if it is done.
    ///
    /// Fails if a gate does not exist or if a cycle is found.
    pub fn next(&mut self, aig: &Aig) -> Result<Option<GateId>> {
        loop {
            while let Some((id, expanded)) = self.stack.pop() {
                if expanded {
                    self.in_progress.remove(&id);
                    self.done.insert(id);
                    return Ok(Some(id));
                }
                if self.done.contains(&id) {
                    continue;
                }
                if self.in_progress.contains(&id) {
                    return Err(AigError::InvalidState(format!(
                        "gate {} is part of a cycle",
                        id
                    )));
                }

                let gate = aig.gate(id)?;
                if gate.is_undefined() {
                    continue;
                }
                self.in_progress.insert(id);
                self.stack.push((id, true));
                for fanin in gate.get_fanins().iter().rev() {
                    if !self.done.contains(&fanin.gate) {
                        self.stack.push((fanin.gate, false));
                    }
                }
            }

            // Maybe we can start from a different gate?
            match self.starts.pop() {
                Some(id) => self.stack.push((id, false)),
                None => return Ok(None),
            }
        }
    }

    /// Run the DFS to completion, returning gates in post-order.
    pub fn post_order(mut self, aig: &Aig) -> Result<Vec<GateId>> {
        let mut order = Vec::new();
        while let Some(id) = self.next(aig)? {
            order.push(id);
        }
        Ok(order)
    }
}
