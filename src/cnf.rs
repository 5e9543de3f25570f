//! Tseitin encoding of an [`Aig`] into the clauses of a SAT solver.
//!
//! Every input and every active AND gate gets its own variable, and the constant gate gets one
//! more variable forced to false by a unit clause. Undefined gates read as the constant,
//! like in simulation.
//!
//! Clauses are emitted through [`varisat::ExtendFormula`], so the same code feeds a
//! [`varisat::Solver`] or a [`varisat::CnfFormula`].

use std::collections::HashMap;

use varisat::{ExtendFormula, Lit};

use crate::{Aig, AigEdge, FaninId, GateId, Result, fraig::FraigError};

/// Add clauses that encode `z = AND(a, b)`.
pub fn add_and(formula: &mut impl ExtendFormula, a: Lit, b: Lit, z: Lit) {
    formula.add_clause(&[a, !z]);
    formula.add_clause(&[b, !z]);
    formula.add_clause(&[!a, !b, z]);
}

/// Add clauses that encode `z = XOR(a, b)`.
pub fn add_xor(formula: &mut impl ExtendFormula, a: Lit, b: Lit, z: Lit) {
    add_guarded_xor(formula, None, a, b, z);
}

/// Add clauses that encode `guard -> (z = XOR(a, b))`.
///
/// Once `!guard` is added as a unit clause, these clauses are satisfied for good and do not
/// constrain anything anymore. This is how one-shot queries are scoped on an incremental solver.
pub fn add_guarded_xor(formula: &mut impl ExtendFormula, guard: Option<Lit>, a: Lit, b: Lit, z: Lit) {
    let clauses = [[a, b, !z], [a, !b, z], [!a, b, z], [!a, !b, !z]];
    for clause in clauses {
        match guard {
            Some(g) => formula.add_clause(&[clause[0], clause[1], clause[2], !g]),
            None => formula.add_clause(&clause),
        }
    }
}

/// Maps gates to solver literals.
#[derive(Debug, Clone)]
pub struct GateLits {
    lits: HashMap<GateId, Lit>,
}

impl GateLits {
    /// Literal of a gate, the constant included.
    pub fn gate_lit(&self, id: GateId) -> Result<Lit> {
        Ok(*self.lits.get(&id).ok_or(FraigError::UnmappedGate(id))?)
    }

    /// Literal of an edge: the literal of its target, complemented if needed.
    /// Floating edges read the constant.
    pub fn edge_lit(&self, edge: AigEdge) -> Result<Lit> {
        let target = if edge.is_floating() { 0 } else { edge.get_gate_id() };
        let lit = self.gate_lit(target)?;
        Ok(if edge.get_complement() { !lit } else { lit })
    }
}

/// Encode the inputs and the active AND gates of `aig`.
///
/// The active netlist must be up to date, as its order guarantees that every fanin
/// already has a literal when a gate is encoded.
pub fn encode(aig: &Aig, formula: &mut impl ExtendFormula) -> Result<GateLits> {
    let const_lit = formula.new_lit();
    formula.add_clause(&[!const_lit]);
    let mut lits = GateLits {
        lits: HashMap::from([(0, const_lit)]),
    };

    for &id in aig.get_inputs() {
        lits.lits.insert(id, formula.new_lit());
    }
    for &id in aig.get_active() {
        let gate = aig.gate(id)?;
        if !gate.is_and() {
            continue;
        }
        let a = lits.edge_lit(gate.get_fanin(FaninId::Fanin0)?)?;
        let b = lits.edge_lit(gate.get_fanin(FaninId::Fanin1)?)?;
        let z = formula.new_lit();
        add_and(formula, a, b, z);
        lits.lits.insert(id, z);
    }
    Ok(lits)
}
