use std::fmt::Display;

use crate::sim::SimVector;

use super::{AigEdge, AigError, FaninId, Fanout, Result};

/// A gate id.
///
/// The constant gate [`GateKind::Const0`] has id 0 by convention. Ids are unique and are
/// never reused once a gate was deleted.
pub type GateId = u64;

/// Largest valid gate id, so that every literal `id << 1 | 1` fits in a `u64`.
pub const MAX_GATE_ID: GateId = GateId::MAX >> 1;

/// The kind of an AIG gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GateKind {
    /// The constant low/false signal, always id 0.
    Const0,
    /// A primary input.
    Input,
    /// A primary output, with exactly one fanin.
    Output,
    /// An AND gate with exactly two fanins.
    And,
    /// An id referenced as a fanin but never defined. A leaf without fanins.
    Undefined,
}

impl GateKind {
    /// Number of fanin slots of a gate of this kind.
    pub fn arity(self) -> usize {
        match self {
            GateKind::And => 2,
            GateKind::Output => 1,
            _ => 0,
        }
    }
}

impl Display for GateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            GateKind::Const0 => "CONST",
            GateKind::Input => "PI",
            GateKind::Output => "PO",
            GateKind::And => "AIG",
            GateKind::Undefined => "UNDEF",
        };
        write!(f, "{}", s)
    }
}

/// Position of a gate inside its functionally equivalent candidate class.
///
/// `inverted` is relative to the first member of the class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FecTag {
    pub group: usize,
    pub inverted: bool,
}

/// An AIG gate.
///
/// Internal note: gates carry both their fanins and their fanouts.
/// Only the owning [`Aig`] mutates them, so that both sides always mirror each other.
///
/// [`Aig`]: crate::Aig
#[derive(Debug, Clone)]
pub struct Gate {
    id: GateId,
    kind: GateKind,
    pub(super) fanins: Vec<Option<AigEdge>>,
    pub(super) fanouts: Vec<Fanout>,
    pub(crate) value: SimVector,
    pub(crate) fec: Option<FecTag>,
}

impl Gate {
    pub(super) fn new(kind: GateKind, id: GateId) -> Self {
        Gate {
            id,
            kind,
            fanins: vec![None; kind.arity()],
            fanouts: Vec::new(),
            value: SimVector::zero(),
            fec: None,
        }
    }

    pub fn get_id(&self) -> GateId {
        self.id
    }

    pub fn get_kind(&self) -> GateKind {
        self.kind
    }

    pub fn is_const(&self) -> bool {
        self.kind == GateKind::Const0
    }

    pub fn is_input(&self) -> bool {
        self.kind == GateKind::Input
    }

    pub fn is_output(&self) -> bool {
        self.kind == GateKind::Output
    }

    pub fn is_and(&self) -> bool {
        self.kind == GateKind::And
    }

    pub fn is_undefined(&self) -> bool {
        self.kind == GateKind::Undefined
    }

    /// Returns the fanin at `slot`, or an error if the slot does not exist or is not connected yet.
    pub fn get_fanin(&self, slot: FaninId) -> Result<AigEdge> {
        self.fanins
            .get(slot.index())
            .ok_or(AigError::NoFanin(self.id))?
            .ok_or(AigError::InvalidState(format!(
                "fanin {} of gate {} is not connected",
                slot.index(),
                self.id
            )))
    }

    /// Connected fanins, in slot order.
    pub fn get_fanins(&self) -> Vec<AigEdge> {
        self.fanins.iter().flatten().copied().collect()
    }

    pub fn get_fanouts(&self) -> &[Fanout] {
        &self.fanouts
    }

    /// Simulation value of the last batch.
    pub fn get_value(&self) -> &SimVector {
        &self.value
    }

    pub fn get_fec(&self) -> Option<FecTag> {
        self.fec
    }

    /// Removes the back-edge mirroring fanin `slot` of `consumer`.
    pub(super) fn remove_fanout(&mut self, consumer: GateId, slot: FaninId) -> Result<Fanout> {
        let pos = self
            .fanouts
            .iter()
            .position(|f| f.gate == consumer && f.slot == slot)
            .ok_or(AigError::InvalidState(format!(
                "failed to remove fanout {} (slot {}) from gate {}: not found",
                consumer,
                slot.index(),
                self.id
            )))?;
        Ok(self.fanouts.remove(pos))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn new_gate_arity() {
        assert_eq!(Gate::new(GateKind::And, 3).fanins.len(), 2);
        assert_eq!(Gate::new(GateKind::Output, 3).fanins.len(), 1);
        assert!(Gate::new(GateKind::Input, 3).fanins.is_empty());
        assert!(Gate::new(GateKind::Undefined, 3).get_fanins().is_empty());
    }

    #[test]
    fn unconnected_fanin() {
        let g = Gate::new(GateKind::And, 3);
        assert!(g.get_fanin(FaninId::Fanin0).is_err());
        let i = Gate::new(GateKind::Input, 1);
        assert!(matches!(
            i.get_fanin(FaninId::Fanin0),
            Err(AigError::NoFanin(1))
        ));
    }

    #[test]
    fn kind_display() {
        assert_eq!(GateKind::And.to_string(), "AIG");
        assert_eq!(GateKind::Undefined.to_string(), "UNDEF");
    }
}
