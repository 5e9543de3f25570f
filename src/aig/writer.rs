use std::io::Write;

use super::{Aig, AigEdge, FaninId, Result};

impl Aig {
    /// Writes the active netlist in ASCII AIGER format.
    ///
    /// The header keeps the maximum variable index, inputs and outputs are written in
    /// declaration order and AND gates in active (topological) order. Only active AND gates
    /// are written, so reading the file back yields a circuit computing the same outputs.
    /// Symbols follow, then a comment section.
    pub fn write_aag(&self, w: &mut impl Write) -> Result<()> {
        let ands: Vec<&crate::Gate> = self
            .active
            .iter()
            .filter_map(|&id| self.gates.get(&id))
            .filter(|g| g.is_and())
            .collect();

        writeln!(
            w,
            "aag {} {} 0 {} {}",
            self.max_var,
            self.inputs.len(),
            self.outputs.len(),
            ands.len()
        )?;
        for &id in &self.inputs {
            writeln!(w, "{}", AigEdge::new(id, false).literal())?;
        }
        for k in 0..self.outputs.len() {
            writeln!(w, "{}", self.get_output_edge(k)?.literal())?;
        }
        for gate in ands {
            writeln!(
                w,
                "{} {} {}",
                AigEdge::new(gate.get_id(), false).literal(),
                gate.get_fanin(FaninId::Fanin0)?.literal(),
                gate.get_fanin(FaninId::Fanin1)?.literal()
            )?;
        }

        for (k, id) in self.inputs.iter().enumerate() {
            if let Some(name) = self.get_symbol(*id) {
                writeln!(w, "i{} {}", k, name)?;
            }
        }
        for (k, id) in self.outputs.iter().enumerate() {
            if let Some(name) = self.get_symbol(*id) {
                writeln!(w, "o{} {}", k, name)?;
            }
        }
        writeln!(w, "c")?;
        writeln!(w, "written by {} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))?;
        Ok(())
    }

    /// Same as [`Aig::write_aag`], into a string.
    pub fn to_aag_string(&self) -> Result<String> {
        let mut buf = Vec::new();
        self.write_aag(&mut buf)?;
        String::from_utf8(buf).map_err(|e| crate::AigError::InvalidState(e.to_string()))
    }
}
