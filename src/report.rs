//! Plain text reports on an [`Aig`]. They only read the AIG.
//!
//! Every report is a small struct implementing [`Display`]:
//!
//! ```rust
//! use fraig::Aig;
//! let aig = Aig::from_ascii("aag 3 2 0 1 1\n2\n4\n6\n6 2 5\ni0 a\n".as_bytes()).unwrap();
//! let summary = aig.summary().to_string();
//! assert!(summary.contains("  AIG          1"));
//! println!("{}", aig.netlist());
//! ```

use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::{Aig, AigEdge, FaninId, Gate, GateId, GateKind, Result};

/// Number of simulation lanes shown by [`GateReport`].
const SHOWN_LANES: usize = 64;

/// Gate counts per kind.
pub struct Summary<'a>(&'a Aig);

/// Active gates in topological order, one per line.
pub struct Netlist<'a>(&'a Aig);

/// Inputs then outputs ids.
pub struct Interface<'a>(&'a Aig);

/// Gates with undefined fanins, and gates defined but not used.
pub struct Floating<'a>(&'a Aig);

/// FEC classes of the last simulation.
pub struct FecGroups<'a>(&'a Aig);

/// Everything about a single gate.
pub struct GateReport<'a> {
    aig: &'a Aig,
    gate: &'a Gate,
}

fn write_ids(f: &mut Formatter<'_>, title: &str, ids: &[GateId]) -> FmtResult {
    write!(f, "{}:", title)?;
    for id in ids {
        write!(f, " {}", id)?;
    }
    writeln!(f)
}

/// `*` marks a floating fanin, `!` an inverted one.
fn write_edge(f: &mut Formatter<'_>, edge: &AigEdge) -> FmtResult {
    write!(
        f,
        " {}{}{}",
        if edge.is_floating() { "*" } else { "" },
        if edge.get_complement() { "!" } else { "" },
        edge.get_gate_id()
    )
}

impl Display for Summary<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let pis = self.0.get_inputs().len();
        let pos = self.0.get_outputs().len();
        let ands = self.0.num_ands();
        writeln!(f)?;
        writeln!(f, "Circuit Statistics")?;
        writeln!(f, "==================")?;
        writeln!(f, "  PI   {:>9}", pis)?;
        writeln!(f, "  PO   {:>9}", pos)?;
        writeln!(f, "  AIG  {:>9}", ands)?;
        writeln!(f, "------------------")?;
        writeln!(f, "  Total{:>9}", pis + pos + ands)
    }
}

impl Display for Netlist<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        writeln!(f)?;
        for (k, &id) in self.0.get_active().iter().enumerate() {
            let Some(gate) = self.0.get_gate(id) else {
                continue;
            };
            match gate.get_kind() {
                GateKind::Const0 => write!(f, "[{}] CONST0", k)?,
                kind => {
                    write!(f, "[{}] {:<4}{}", k, kind.to_string(), id)?;
                    for edge in gate.get_fanins() {
                        write_edge(f, &edge)?;
                    }
                    if let Some(name) = self.0.get_symbol(id) {
                        write!(f, " ({})", name)?;
                    }
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl Display for Interface<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write_ids(f, "PIs of the circuit", self.0.get_inputs())?;
        write_ids(f, "POs of the circuit", self.0.get_outputs())
    }
}

impl Display for Floating<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        if !self.0.get_floating().is_empty() {
            write_ids(f, "Gates with floating fanin(s)", self.0.get_floating())?;
        }
        if !self.0.get_unused().is_empty() {
            write_ids(f, "Gates defined but not used  ", self.0.get_unused())?;
        }
        Ok(())
    }
}

impl Display for FecGroups<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        for (k, group) in self.0.get_fec_groups().iter().enumerate() {
            write!(f, "[{}]", k)?;
            for member in group {
                write!(
                    f,
                    " {}{}",
                    if member.inverted { "!" } else { "" },
                    member.gate
                )?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl Display for GateReport<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let gate = self.gate;
        let rule = "=".repeat(50);
        writeln!(f, "{}", rule)?;
        write!(f, "= {}({})", gate.get_kind(), gate.get_id())?;
        if let Some(name) = self.aig.get_symbol(gate.get_id()) {
            write!(f, "\"{}\"", name)?;
        }
        writeln!(f)?;

        write!(f, "= Fanins:")?;
        for edge in gate.get_fanins() {
            write_edge(f, &edge)?;
        }
        writeln!(f)?;
        write!(f, "= Fanouts:")?;
        for fanout in gate.get_fanouts() {
            write!(
                f,
                " {}{}/{}",
                if fanout.get_complement() { "!" } else { "" },
                fanout.get_gate_id(),
                fanout.get_slot().index()
            )?;
        }
        writeln!(f)?;

        // Other members of its class, with polarity relative to this gate.
        write!(f, "= FECs:")?;
        if let Some(tag) = gate.get_fec() {
            if let Some(group) = self.aig.get_fec_groups().get(tag.group) {
                for member in group.iter().filter(|m| m.gate != gate.get_id()) {
                    let inverted = member.inverted ^ tag.inverted;
                    write!(f, " {}{}", if inverted { "!" } else { "" }, member.gate)?;
                }
            }
        }
        writeln!(f)?;

        write!(f, "= Value: ")?;
        for lane in 0..SHOWN_LANES {
            if lane > 0 && lane % 8 == 0 {
                write!(f, "_")?;
            }
            write!(f, "{}", if gate.get_value().get(lane) { 1 } else { 0 })?;
        }
        writeln!(f)?;
        writeln!(f, "{}", rule)
    }
}

impl Aig {
    pub fn summary(&self) -> Summary<'_> {
        Summary(self)
    }

    pub fn netlist(&self) -> Netlist<'_> {
        Netlist(self)
    }

    pub fn interface(&self) -> Interface<'_> {
        Interface(self)
    }

    pub fn floating_report(&self) -> Floating<'_> {
        Floating(self)
    }

    pub fn fec_report(&self) -> FecGroups<'_> {
        FecGroups(self)
    }

    pub fn gate_report(&self, id: GateId) -> Result<GateReport<'_>> {
        let gate = self.gate(id)?;
        // Only fully connected gates are reported.
        if gate.get_kind().arity() > 0 {
            gate.get_fanin(FaninId::Fanin0)?;
        }
        Ok(GateReport { aig: self, gate })
    }
}
