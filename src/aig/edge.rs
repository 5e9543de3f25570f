//! An [`AigEdge`] points at a [`Gate`] and can be complemented (indicates the presence of a NOT gate).
//!
//! Edges only carry gate ids: the [`Aig`] owns every gate and keeps each fanin mirrored
//! by a [`Fanout`] on the target gate.
//!
//! [`Gate`]: crate::Gate
//! [`Aig`]: crate::Aig

use std::ops::Not;

use super::GateId;

/// Unambiguous fanin selector.
///
/// Outputs only have [`FaninId::Fanin0`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FaninId {
    Fanin0,
    Fanin1,
}

impl FaninId {
    pub fn index(self) -> usize {
        match self {
            FaninId::Fanin0 => 0,
            FaninId::Fanin1 => 1,
        }
    }
}

impl From<usize> for FaninId {
    fn from(value: usize) -> Self {
        if value == 0 {
            FaninId::Fanin0
        } else if value == 1 {
            FaninId::Fanin1
        } else {
            panic!("could not create FaninId from value={}", value)
        }
    }
}

/// A directed edge representing a fanin of an AND gate or an output.
///
/// The edge can carry an inverter according to the value of `complement`.
/// `floating` records that the target was an undefined gate when the edge was connected.
///
/// ```rust
/// use fraig::AigEdge;
/// let e = AigEdge::new(3, false);
/// assert_eq!(!e, AigEdge::new(3, true));
/// assert!(e.is_complement_of(&AigEdge::new(3, true)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AigEdge {
    pub(super) gate: GateId,
    pub(super) complement: bool,
    pub(super) floating: bool,
}

impl Not for AigEdge {
    type Output = Self;

    fn not(mut self) -> Self::Output {
        self.complement = !self.complement;
        self
    }
}

impl AigEdge {
    pub fn new(gate: GateId, complement: bool) -> Self {
        AigEdge {
            gate,
            complement,
            floating: false,
        }
    }

    pub fn get_gate_id(&self) -> GateId {
        self.gate
    }

    pub fn get_complement(&self) -> bool {
        self.complement
    }

    pub fn is_floating(&self) -> bool {
        self.floating
    }

    /// The AIGER literal of this edge: `id << 1 | complement`.
    pub fn literal(&self) -> u64 {
        (self.gate << 1) | self.complement as u64
    }

    pub fn is_cst_false(&self) -> bool {
        self.gate == 0 && !self.complement
    }

    pub fn is_cst_true(&self) -> bool {
        self.gate == 0 && self.complement
    }

    pub fn is_complement_of(&self, other: &AigEdge) -> bool {
        self.gate == other.gate && self.complement ^ other.complement
    }
}

/// The mirror of an [`AigEdge`], stored on the target gate.
///
/// `slot` is the fanin slot of the consumer this back-edge mirrors, so a consumer
/// using the same gate on both slots owns two distinct fanouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fanout {
    pub(super) gate: GateId,
    pub(super) slot: FaninId,
    pub(super) complement: bool,
}

impl Fanout {
    pub fn get_gate_id(&self) -> GateId {
        self.gate
    }

    pub fn get_slot(&self) -> FaninId {
        self.slot
    }

    pub fn get_complement(&self) -> bool {
        self.complement
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn edge_not_and_literal() {
        let e = AigEdge::new(5, false);
        assert_eq!(e.literal(), 10);
        assert_eq!((!e).literal(), 11);
        assert_eq!(!!e, e);
        assert!(AigEdge::new(0, false).is_cst_false());
        assert!(AigEdge::new(0, true).is_cst_true());
        assert!(!e.is_complement_of(&e));
    }

    #[test]
    fn fanin_id_conversions() {
        assert_eq!(FaninId::from(0usize), FaninId::Fanin0);
        assert_eq!(FaninId::from(1usize), FaninId::Fanin1);
        assert_eq!(FaninId::Fanin1.index(), 1);
    }

    #[test]
    #[should_panic]
    fn fanin_id_out_of_range() {
        let _ = FaninId::from(2usize);
    }
}
