use super::dfs::Dfs;
use super::{Aig, AigError, FaninId, Fanout, Gate, GateId, Result};

impl Aig {
    /// Checking if the AIG structure is correct.
    /// This function was written for debug purposes, as the library is supposed to maintain
    /// integrity of the AIG at any moment (once all gates have their fanins connected).
    ///
    /// It checks that:
    /// - only the constant has id 0, and it exists
    /// - every gate has all its fanin slots connected, to gates of the AIG which are not outputs
    /// - every fanin is mirrored by exactly one fanout on its target, and conversely
    /// - floating flags match undefined targets
    /// - interface lists only refer to gates of the right kind
    /// - the whole graph is acyclic
    pub fn check_integrity(&self) -> Result<()> {
        match self.gates.get(&0) {
            Some(g) if g.is_const() => (),
            _ => {
                return Err(AigError::InvalidState(
                    "gate 0 is missing or is not the constant".to_string(),
                ));
            }
        }

        for (&id, gate) in &self.gates {
            if gate.get_id() != id {
                return Err(AigError::InvalidState("incoherent gate id".to_string()));
            }
            if gate.is_const() && id != 0 {
                return Err(AigError::IdZeroButNotConst);
            }
            self.check_gate_integrity(gate)?;
        }

        for &id in &self.inputs {
            if !self.gate(id)?.is_input() {
                return Err(AigError::InvalidState(format!(
                    "gate {} is registered as an input but is not one",
                    id
                )));
            }
        }
        for &id in &self.outputs {
            if !self.gate(id)?.is_output() {
                return Err(AigError::InvalidState(format!(
                    "gate {} is registered as an output but is not one",
                    id
                )));
            }
        }

        // Checks for acyclicity
        let mut ids: Vec<GateId> = self.gates.keys().copied().collect();
        ids.sort_unstable();
        Dfs::from_starts(ids).post_order(self)?;

        Ok(())
    }

    fn check_gate_integrity(&self, gate: &Gate) -> Result<()> {
        let id = gate.get_id();
        if gate.fanins.len() != gate.get_kind().arity() {
            return Err(AigError::InvalidState(format!(
                "gate {} ({}) has {} fanin slots",
                id,
                gate.get_kind(),
                gate.fanins.len()
            )));
        }

        for slot in 0..gate.fanins.len() {
            let edge = gate.get_fanin(FaninId::from(slot))?;
            let target = self.gates.get(&edge.gate).ok_or(AigError::InvalidState(format!(
                "edge of gate {} pointing at gate {} which is not in the AIG anymore",
                id, edge.gate
            )))?;
            if target.is_output() {
                return Err(AigError::InvalidState(format!(
                    "gate {} uses output {} as a fanin",
                    id, edge.gate
                )));
            }
            if edge.floating != target.is_undefined() {
                return Err(AigError::InvalidState(format!(
                    "fanin {} of gate {} has a wrong floating flag",
                    slot, id
                )));
            }
            let mirror = Fanout {
                gate: id,
                slot: FaninId::from(slot),
                complement: edge.complement,
            };
            let count = target.fanouts.iter().filter(|&&f| f == mirror).count();
            if count != 1 {
                return Err(AigError::InvalidState(format!(
                    "fanin {} of gate {} is mirrored {} times on gate {}",
                    slot, id, count, edge.gate
                )));
            }
        }

        for fanout in &gate.fanouts {
            let consumer = self
                .gates
                .get(&fanout.gate)
                .ok_or(AigError::InvalidState(format!(
                    "fanout {} of gate {} is no longer in the AIG",
                    fanout.gate, id
                )))?;
            let edge = consumer.get_fanin(fanout.slot)?;
            if edge.gate != id || edge.complement != fanout.complement {
                return Err(AigError::InvalidState(format!(
                    "fanout {} of gate {} is not mirrored by a fanin",
                    fanout.gate, id
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use crate::{Aig, AigEdge, FaninId, Fanout};

    #[test]
    fn integrity_test() {
        let mut aig = Aig::new();
        let a = aig.new_input().unwrap();
        let b = aig.new_input().unwrap();
        let x = aig
            .new_and(AigEdge::new(a, false), AigEdge::new(b, true))
            .unwrap();
        aig.new_output(AigEdge::new(x, true)).unwrap();
        assert!(aig.check_integrity().is_ok());

        // Corrupting a mirror on purpose
        aig.gates.get_mut(&a).unwrap().fanouts.push(Fanout {
            gate: x,
            slot: FaninId::Fanin1,
            complement: false,
        });
        assert!(aig.check_integrity().is_err());
    }

    #[test]
    fn unconnected_slot() {
        let mut aig = Aig::new();
        let a = aig.new_input().unwrap();
        let x = aig.create_gate(crate::GateKind::And, 2).unwrap();
        aig.connect_input(x, FaninId::Fanin0, a, false).unwrap();
        assert!(aig.check_integrity().is_err());
        aig.connect_input(x, FaninId::Fanin1, 0, true).unwrap();
        assert!(aig.check_integrity().is_ok());
    }
}
