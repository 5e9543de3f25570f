//! Module defining the [`Aig`] struct, as well as [`Gate`], [`AigEdge`] and some others relevant structs.
//!
//! To start reducing a circuit, check [`Aig::strash`], [`Aig::random_sim`] and [`Aig::fraig`].

pub mod dfs;
pub mod edge;
pub mod error;
pub mod gate;
mod integrity;
mod parser;
mod writer;

use std::collections::{HashMap, HashSet};

pub use edge::{AigEdge, FaninId, Fanout};
pub use error::{AigError, ParserError, ParserErrorKind, Result};
pub use gate::{FecTag, Gate, GateId, GateKind, MAX_GATE_ID};

use crate::sim::FecGroup;
use dfs::Dfs;

/// A whole combinational AIG.
///
/// Gates live in an arena keyed by their id, and edges refer to gates by id.
/// Every fanin stored on a gate is mirrored by a [`Fanout`] stored on its target: the only
/// way to create, rewrite or drop an edge is through the methods of this struct
/// ([`connect_input`], [`merge_gates`], [`delete_gate`]) which always update both sides.
///
/// After any structural rewrite, call [`refresh`] to recompute the active netlist
/// (all gates reachable from the outputs, in post-order) and the diagnostics lists.
/// The passes of this crate ([`strash`], [`fraig`], [`sweep`], [`optimize`]) do it for you.
///
/// [`connect_input`]: Aig::connect_input
/// [`merge_gates`]: Aig::merge_gates
/// [`delete_gate`]: Aig::delete_gate
/// [`refresh`]: Aig::refresh
/// [`strash`]: Aig::strash
/// [`fraig`]: Aig::fraig
/// [`sweep`]: Aig::sweep
/// [`optimize`]: Aig::optimize
#[derive(Debug, Clone)]
pub struct Aig {
    pub(crate) gates: HashMap<GateId, Gate>,
    /// Ids of deleted gates, never handed out again.
    retired: HashSet<GateId>,
    /// Interface, in declaration order.
    pub(crate) inputs: Vec<GateId>,
    pub(crate) outputs: Vec<GateId>,
    /// Largest input/and/undefined id, the `M` of the exchange format.
    max_var: GateId,
    next_id: GateId,
    pub(crate) active: Vec<GateId>,
    unused: Vec<GateId>,
    floating: Vec<GateId>,
    pub(crate) fec_groups: Vec<FecGroup>,
    /// Set once a simulation batch built the first partition, cleared by fraig.
    pub(crate) fec_initialized: bool,
    symbols: HashMap<GateId, String>,
}

impl Default for Aig {
    fn default() -> Self {
        Aig::new()
    }
}

impl Aig {
    /// Create a brand new AIG (constant gate [`GateKind::Const0`] included).
    pub fn new() -> Self {
        let gates = HashMap::from([(0, Gate::new(GateKind::Const0, 0))]);
        Aig {
            gates,
            retired: HashSet::new(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            max_var: 0,
            next_id: 1,
            active: Vec::new(),
            unused: Vec::new(),
            floating: Vec::new(),
            fec_groups: Vec::new(),
            fec_initialized: false,
            symbols: HashMap::new(),
        }
    }

    /// Retrieves a gate by id, if it exists.
    pub fn get_gate(&self, id: GateId) -> Option<&Gate> {
        self.gates.get(&id)
    }

    /// Retrieves a gate by id, or fails with [`AigError::GateDoesNotExist`].
    pub fn gate(&self, id: GateId) -> Result<&Gate> {
        self.gates.get(&id).ok_or(AigError::GateDoesNotExist(id))
    }

    pub(crate) fn gate_mut(&mut self, id: GateId) -> Result<&mut Gate> {
        self.gates.get_mut(&id).ok_or(AigError::GateDoesNotExist(id))
    }

    /// All live gates, sorted by id.
    pub fn get_gates(&self) -> Vec<&Gate> {
        let mut gates: Vec<&Gate> = self.gates.values().collect();
        gates.sort_unstable_by_key(|g| g.get_id());
        gates
    }

    pub fn num_gates(&self) -> usize {
        self.gates.len()
    }

    /// Number of live AND gates (active or not).
    pub fn num_ands(&self) -> usize {
        self.gates.values().filter(|g| g.is_and()).count()
    }

    /// Inputs ids, in declaration order.
    pub fn get_inputs(&self) -> &[GateId] {
        &self.inputs
    }

    /// Outputs ids, in declaration order.
    pub fn get_outputs(&self) -> &[GateId] {
        &self.outputs
    }

    /// The fanin edge of the `index`-th output.
    pub fn get_output_edge(&self, index: usize) -> Result<AigEdge> {
        let id = *self.outputs.get(index).ok_or(AigError::InvalidState(format!(
            "output index {} out of range",
            index
        )))?;
        self.gate(id)?.get_fanin(FaninId::Fanin0)
    }

    /// The active netlist: gates reachable from the outputs, fanins strictly before their consumers.
    pub fn get_active(&self) -> &[GateId] {
        &self.active
    }

    /// Inputs and AND gates without any fanout, sorted by id.
    pub fn get_unused(&self) -> &[GateId] {
        &self.unused
    }

    /// AND gates and outputs with at least one undefined fanin, sorted by id.
    pub fn get_floating(&self) -> &[GateId] {
        &self.floating
    }

    /// The `M` of the exchange format header.
    pub fn get_max_var(&self) -> GateId {
        self.max_var
    }

    pub(crate) fn set_max_var(&mut self, max_var: GateId) {
        self.max_var = self.max_var.max(max_var);
        self.next_id = self.next_id.max(max_var.saturating_add(1));
    }

    /// Returns an id that was never used by any gate of this AIG.
    pub fn fresh_id(&self) -> GateId {
        self.next_id
    }

    pub fn get_symbol(&self, id: GateId) -> Option<&str> {
        self.symbols.get(&id).map(String::as_str)
    }

    /// Names an input or an output.
    pub fn set_symbol(&mut self, id: GateId, name: impl Into<String>) -> Result<()> {
        let gate = self.gate(id)?;
        if !gate.is_input() && !gate.is_output() {
            return Err(AigError::InvalidState(format!(
                "only inputs and outputs carry symbols, gate {} is {}",
                id,
                gate.get_kind()
            )));
        }
        self.symbols.insert(id, name.into());
        Ok(())
    }

    /// Create a new gate within the AIG.
    ///
    /// This will fail if a gate with the same id already exists or existed before,
    /// or if a gate other than the constant uses id 0 (only one constant exists and it is
    /// created along with the AIG).
    ///
    /// ```rust
    /// use fraig::{Aig, GateKind};
    /// let mut aig = Aig::new();
    /// aig.create_gate(GateKind::Input, 1).unwrap();
    /// assert!(aig.create_gate(GateKind::And, 1).is_err());
    /// assert!(aig.create_gate(GateKind::Input, 0).is_err());
    /// ```
    pub fn create_gate(&mut self, kind: GateKind, id: GateId) -> Result<GateId> {
        if self.gates.contains_key(&id) {
            return Err(AigError::DuplicateId(id));
        }
        if id == 0 || kind == GateKind::Const0 {
            return Err(AigError::IdZeroButNotConst);
        }
        if self.retired.contains(&id) {
            return Err(AigError::RetiredId(id));
        }
        if id > MAX_GATE_ID {
            return Err(AigError::IdTooBig(id));
        }

        match kind {
            GateKind::Input => self.inputs.push(id),
            GateKind::Output => self.outputs.push(id),
            _ => (),
        }
        if kind != GateKind::Output {
            self.max_var = self.max_var.max(id);
        }
        self.next_id = self.next_id.max(id + 1);
        self.gates.insert(id, Gate::new(kind, id));
        Ok(id)
    }

    /// Create a new input with a fresh id.
    pub fn new_input(&mut self) -> Result<GateId> {
        self.create_gate(GateKind::Input, self.fresh_id())
    }

    /// Create a new and gate with a fresh id, connected to the given fanins.
    pub fn new_and(&mut self, fanin0: AigEdge, fanin1: AigEdge) -> Result<GateId> {
        let id = self.create_gate(GateKind::And, self.fresh_id())?;
        self.connect_input(id, FaninId::Fanin0, fanin0.gate, fanin0.complement)?;
        self.connect_input(id, FaninId::Fanin1, fanin1.gate, fanin1.complement)?;
        Ok(id)
    }

    /// Create a new output with a fresh id, driven by `fanin`.
    pub fn new_output(&mut self, fanin: AigEdge) -> Result<GateId> {
        let id = self.create_gate(GateKind::Output, self.fresh_id())?;
        self.connect_input(id, FaninId::Fanin0, fanin.gate, fanin.complement)?;
        Ok(id)
    }

    /// Set fanin `slot` of `gate` to point at `target`, and mirror it with a fanout on `target`.
    ///
    /// An edge previously connected on that slot is dropped along with its mirror.
    /// The edge is marked floating iff `target` is an undefined gate.
    pub fn connect_input(
        &mut self,
        gate: GateId,
        slot: FaninId,
        target: GateId,
        inverted: bool,
    ) -> Result<()> {
        if self.gate(gate)?.get_kind().arity() <= slot.index() {
            return Err(AigError::NoFanin(gate));
        }
        let target_gate = self.gate(target)?;
        if target_gate.is_output() {
            return Err(AigError::InvalidState(format!(
                "output {} cannot drive gate {}",
                target, gate
            )));
        }
        if target == gate {
            return Err(AigError::InvalidState(format!(
                "gate {} cannot be its own fanin",
                gate
            )));
        }
        let floating = target_gate.is_undefined();

        if let Some(old) = self.gate(gate)?.fanins[slot.index()] {
            self.gate_mut(old.gate)?.remove_fanout(gate, slot)?;
        }
        self.gate_mut(gate)?.fanins[slot.index()] = Some(AigEdge {
            gate: target,
            complement: inverted,
            floating,
        });
        self.gate_mut(target)?.fanouts.push(Fanout {
            gate,
            slot,
            complement: inverted,
        });
        Ok(())
    }

    /// Merge `remove` into `keep`: every consumer of `remove` is rewired to `keep`,
    /// with its inversion XORed with `relative_inversion`.
    ///
    /// The rewrite is driven by the fanouts of `remove` only. Afterwards `remove` has no fanouts
    /// and no fanins anymore, and is ready for [`Aig::delete_gate`].
    pub fn merge_gates(
        &mut self,
        keep: GateId,
        remove: GateId,
        relative_inversion: bool,
    ) -> Result<()> {
        if keep == remove {
            return Err(AigError::SelfMerge(keep));
        }
        let keep_gate = self.gate(keep)?;
        if keep_gate.is_output() {
            return Err(AigError::InvalidState(format!(
                "cannot merge gate {} into output {}",
                remove, keep
            )));
        }
        let floating = keep_gate.is_undefined();
        let remove_gate = self.gate(remove)?;
        if !remove_gate.is_and() && !remove_gate.is_undefined() {
            return Err(AigError::CannotDelete(remove));
        }

        let fanouts = std::mem::take(&mut self.gate_mut(remove)?.fanouts);
        for fanout in fanouts {
            let consumer = self.gate_mut(fanout.gate)?;
            let edge = consumer.fanins[fanout.slot.index()]
                .as_mut()
                .filter(|edge| edge.gate == remove)
                .ok_or(AigError::InvalidState(format!(
                    "fanout {} of gate {} is not mirrored by a fanin",
                    fanout.gate, remove
                )))?;
            edge.gate = keep;
            edge.complement = fanout.complement ^ relative_inversion;
            edge.floating = floating;
            let complement = edge.complement;

            self.gate_mut(keep)?.fanouts.push(Fanout {
                gate: fanout.gate,
                slot: fanout.slot,
                complement,
            });
        }

        self.disconnect_fanins(remove)
    }

    /// Drops every fanin of `id`, along with their mirrors.
    pub(crate) fn disconnect_fanins(&mut self, id: GateId) -> Result<()> {
        let fanins = std::mem::take(&mut self.gate_mut(id)?.fanins);
        for (slot, fanin) in fanins.iter().enumerate() {
            if let Some(edge) = fanin {
                self.gate_mut(edge.gate)?
                    .remove_fanout(id, FaninId::from(slot))?;
            }
        }
        self.gate_mut(id)?.fanins = vec![None; fanins.len()];
        Ok(())
    }

    /// Delete a gate which is not used anymore. Its id is retired.
    ///
    /// Fails if the gate still has fanouts, or if it is part of the interface
    /// (constant, inputs and outputs are never deleted).
    pub fn delete_gate(&mut self, id: GateId) -> Result<()> {
        let gate = self.gate(id)?;
        if gate.is_const() || gate.is_input() || gate.is_output() {
            return Err(AigError::CannotDelete(id));
        }
        if !gate.fanouts.is_empty() {
            return Err(AigError::GateStillReferenced(id, gate.fanouts.len()));
        }
        self.disconnect_fanins(id)?;
        self.gates.remove(&id);
        self.retired.insert(id);
        Ok(())
    }

    /// Recompute the active netlist, the unused and floating lists, and drop candidate
    /// equivalence classes members which are not part of the active netlist anymore.
    ///
    /// Running it twice in a row yields the same result.
    pub fn refresh(&mut self) -> Result<()> {
        self.active = Dfs::from_outputs(self).post_order(self)?;

        let mut unused: Vec<GateId> = self
            .gates
            .values()
            .filter(|g| (g.is_input() || g.is_and()) && g.fanouts.is_empty())
            .map(|g| g.get_id())
            .collect();
        unused.sort_unstable();
        self.unused = unused;

        let mut floating: Vec<GateId> = self
            .gates
            .values()
            .filter(|g| g.is_and() || g.is_output())
            .filter(|g| {
                g.get_fanins().iter().any(|edge| {
                    self.gates
                        .get(&edge.gate)
                        .is_some_and(|target| target.is_undefined())
                })
            })
            .map(|g| g.get_id())
            .collect();
        floating.sort_unstable();
        self.floating = floating;

        self.prune_fec_groups();
        Ok(())
    }
}
