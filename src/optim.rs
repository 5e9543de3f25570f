//! Cleanup passes: removing dead logic and propagating trivial simplifications.

use std::collections::HashSet;

use log::{debug, info};

use crate::{Aig, AigEdge, FaninId, GateId, Result};

/// What an AND gate reduces to, if it trivially does.
///
/// - `x & x` is `x`, `x & !x` is constant 0
/// - `0 & x` is constant 0, `1 & x` is `x`
fn simplify(fanin0: AigEdge, fanin1: AigEdge) -> Option<AigEdge> {
    let zero = AigEdge::new(0, false);
    if fanin0.is_complement_of(&fanin1) {
        return Some(zero);
    }
    if fanin0.get_gate_id() == fanin1.get_gate_id() {
        return Some(fanin0);
    }
    for (constant, other) in [(fanin0, fanin1), (fanin1, fanin0)] {
        if constant.is_cst_false() {
            return Some(zero);
        }
        if constant.is_cst_true() {
            return Some(other);
        }
    }
    None
}

impl Aig {
    /// Delete every AND gate outside of the active netlist, and every undefined gate no one uses.
    /// Constant, inputs and outputs are kept.
    ///
    /// Returns the number of deleted gates.
    pub fn sweep(&mut self) -> Result<usize> {
        self.refresh()?;
        let active: HashSet<GateId> = self.active.iter().copied().collect();
        let mut dead: Vec<GateId> = self
            .gates
            .values()
            .filter(|g| g.is_and() && !active.contains(&g.get_id()))
            .map(|g| g.get_id())
            .collect();
        dead.sort_unstable();

        // Dead gates only feed dead gates: once all of them are disconnected, none has fanouts.
        for &id in &dead {
            self.disconnect_fanins(id)?;
        }
        for &id in &dead {
            debug!("sweep: AIG({}) removed", id);
            self.delete_gate(id)?;
        }

        let mut orphans: Vec<GateId> = self
            .gates
            .values()
            .filter(|g| g.is_undefined() && g.get_fanouts().is_empty())
            .map(|g| g.get_id())
            .collect();
        orphans.sort_unstable();
        for &id in &orphans {
            debug!("sweep: UNDEF({}) removed", id);
            self.delete_gate(id)?;
        }

        self.refresh()?;
        let removed = dead.len() + orphans.len();
        info!("sweep: {} gate(s) removed", removed);
        Ok(removed)
    }

    /// Simplify trivial AND gates (see the rules below) in topological order, so that
    /// simplifications propagate forward:
    /// - `x & x` becomes `x`, `x & !x` becomes constant 0
    /// - `0 & x` becomes constant 0, `1 & x` becomes `x`
    ///
    /// Simplified gates are merged into what they reduce to and deleted. Undefined gates
    /// left without fanouts are deleted too.
    ///
    /// Returns the number of simplified gates.
    pub fn optimize(&mut self) -> Result<usize> {
        self.refresh()?;
        let order = self.active.clone();
        let mut simplified = 0;

        for id in order {
            let gate = self.gate(id)?;
            if !gate.is_and() {
                continue;
            }
            let fanin0 = gate.get_fanin(FaninId::Fanin0)?;
            let fanin1 = gate.get_fanin(FaninId::Fanin1)?;
            let Some(replacement) = simplify(fanin0, fanin1) else {
                continue;
            };

            debug!(
                "optimize: {} merging {}{}",
                replacement.get_gate_id(),
                if replacement.get_complement() { "!" } else { "" },
                id
            );
            self.merge_gates(replacement.get_gate_id(), id, replacement.get_complement())?;
            self.delete_gate(id)?;
            simplified += 1;

            for target in [fanin0.get_gate_id(), fanin1.get_gate_id()] {
                if let Some(g) = self.get_gate(target) {
                    if g.is_undefined() && g.get_fanouts().is_empty() {
                        debug!("optimize: UNDEF({}) removed", target);
                        self.delete_gate(target)?;
                    }
                }
            }
        }

        self.refresh()?;
        info!("optimize: {} gate(s) simplified", simplified);
        Ok(simplified)
    }
}
