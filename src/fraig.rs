//! SAT sweeping: prove or refute the candidate equivalences found by simulation.
//!
//! See [`Aig::fraig`].

use std::collections::{HashMap, HashSet};

use log::{debug, info, trace};
use thiserror::Error;
use varisat::{ExtendFormula, Lit, Solver};

use crate::{
    Aig, GateId, Result,
    cancel::{self, CancelFlag},
    cnf::{self, GateLits},
    sim::{FecGroup, FecMember},
};

/// Error returned when SAT sweeping failed.
#[derive(Debug, Error)]
pub enum FraigError {
    /// The SAT backend reported a failure.
    #[error("SAT solver failure: {0}")]
    Solver(String),

    /// A gate was not mapped to any SAT literal.
    #[error("gate {0} is not mapped to any literal")]
    UnmappedGate(GateId),
}

/// Fraig settings.
#[derive(Debug, Clone, Default)]
pub struct FraigOptions {
    pub cancel: Option<CancelFlag>,
}

/// An input assignment telling two gates of a class apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Counterexample {
    pub first: FecMember,
    pub second: FecMember,
    /// One value per input, in declaration order.
    pub inputs: Vec<bool>,
}

/// What a fraig run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FraigReport {
    /// Gates merged into an equivalent one and deleted.
    pub merged: usize,
    /// Queries answered UNSAT.
    pub proved: usize,
    /// Queries answered SAT.
    pub refuted: usize,
    pub counterexamples: Vec<Counterexample>,
}

enum Verdict {
    Equivalent,
    Distinct(Vec<bool>),
}

/// An incremental SAT instance encoding the whole active netlist once.
///
/// Each query adds its clauses behind a fresh activation literal, which is disabled for good
/// once the query is answered.
struct Oracle<'a> {
    solver: Solver<'a>,
    lits: GateLits,
    inputs: Vec<GateId>,
}

impl Oracle<'_> {
    fn new(aig: &Aig) -> Result<Self> {
        let mut solver = Solver::new();
        let lits = cnf::encode(aig, &mut solver)?;
        Ok(Oracle {
            solver,
            lits,
            inputs: aig.get_inputs().to_vec(),
        })
    }

    fn member_lit(&self, member: FecMember) -> Result<Lit> {
        let lit = self.lits.gate_lit(member.gate)?;
        Ok(if member.inverted { !lit } else { lit })
    }

    /// Can `a` and `b` (with their polarity) ever differ?
    fn prove_equal(&mut self, a: FecMember, b: FecMember) -> Result<Verdict> {
        let la = self.member_lit(a)?;
        let lb = self.member_lit(b)?;
        let diff = self.solver.new_lit();
        let activation = self.solver.new_lit();
        cnf::add_guarded_xor(&mut self.solver, Some(activation), la, lb, diff);

        self.solver.assume(&[activation, diff]);
        let outcome = self.solver.solve();
        // The model only survives until the solver is touched again.
        let model: Option<HashSet<Lit>> = match outcome {
            Ok(true) => self.solver.model().map(|m| m.into_iter().collect()),
            _ => None,
        };
        // This query must never constrain the next ones.
        self.solver.add_clause(&[!activation]);

        let sat = outcome.map_err(|e| FraigError::Solver(format!("{:?}", e)))?;
        if !sat {
            return Ok(Verdict::Equivalent);
        }
        let model =
            model.ok_or(FraigError::Solver("no model for a satisfiable query".to_string()))?;
        let mut inputs = Vec::with_capacity(self.inputs.len());
        for &id in &self.inputs {
            inputs.push(model.contains(&self.lits.gate_lit(id)?));
        }
        Ok(Verdict::Distinct(inputs))
    }
}

impl Aig {
    /// Functionally reduce the AIG: every pair of gates sharing a FEC class (see
    /// [`Aig::random_sim`] and [`Aig::file_sim`]) is checked with a SAT solver.
    /// Proven equivalent gates are merged into the one coming first in topological order
    /// (the constant first), which is then the only one left.
    ///
    /// The classes are consumed: run a simulation again before another fraig.
    ///
    /// On a solver error or a cancellation, merges already done are kept, the AIG is refreshed
    /// and the error is returned.
    pub fn fraig(&mut self, options: &FraigOptions) -> Result<FraigReport> {
        self.refresh()?;
        let groups = std::mem::take(&mut self.fec_groups);
        self.clear_fec_groups();

        // Constant first, then active order
        let rank: HashMap<GateId, usize> = std::iter::once(0)
            .chain(self.active.iter().copied().filter(|&id| id != 0))
            .enumerate()
            .map(|(k, id)| (id, k))
            .collect();

        let mut report = FraigReport::default();
        let mut removed = Vec::new();
        let outcome = match Oracle::new(self) {
            Ok(mut oracle) => {
                info!("fraig: {} FEC group(s) to check", groups.len());
                self.fraig_groups(&groups, &rank, &mut oracle, options, &mut report, &mut removed)
            }
            Err(e) => Err(e),
        };

        for &id in &removed {
            self.delete_gate(id)?;
        }
        report.merged = removed.len();
        self.refresh()?;
        info!(
            "fraig: {} gate(s) merged, {} pair(s) refuted",
            report.merged, report.refuted
        );
        outcome.map(|_| report)
    }

    fn fraig_groups(
        &mut self,
        groups: &[FecGroup],
        rank: &HashMap<GateId, usize>,
        oracle: &mut Oracle,
        options: &FraigOptions,
        report: &mut FraigReport,
        removed: &mut Vec<GateId>,
    ) -> Result<()> {
        for group in groups {
            let mut members: Vec<FecMember> = group
                .iter()
                .copied()
                .filter(|m| rank.contains_key(&m.gate))
                .collect();
            members.sort_by_key(|m| rank[&m.gate]);

            let mut dead = vec![false; members.len()];
            for i in 0..members.len() {
                if dead[i] {
                    continue;
                }
                for j in i + 1..members.len() {
                    if dead[j] {
                        continue;
                    }
                    cancel::check(&options.cancel)?;
                    let (keep, remove) = (members[i], members[j]);
                    match oracle.prove_equal(keep, remove)? {
                        Verdict::Equivalent => {
                            trace!("fraig: {} == {} (UNSAT)", keep.gate, remove.gate);
                            report.proved += 1;
                            let inversion = keep.inverted ^ remove.inverted;
                            debug!(
                                "fraig: {} merging {}{}",
                                keep.gate,
                                if inversion { "!" } else { "" },
                                remove.gate
                            );
                            self.merge_gates(keep.gate, remove.gate, inversion)?;
                            removed.push(remove.gate);
                            dead[j] = true;
                        }
                        Verdict::Distinct(inputs) => {
                            trace!("fraig: {} != {} (SAT)", keep.gate, remove.gate);
                            report.refuted += 1;
                            report.counterexamples.push(Counterexample {
                                first: keep,
                                second: remove,
                                inputs,
                            });
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{AigError, SimOptions, testing::random_aig};
    use test_log::test;

    fn outputs_under(aig: &Aig, inputs: &[bool]) -> Vec<bool> {
        let values = aig.evaluate(inputs).unwrap();
        aig.get_outputs().iter().map(|id| values[id]).collect()
    }

    fn all_assignments(n: usize) -> impl Iterator<Item = Vec<bool>> {
        (0..1u64 << n).map(move |k| (0..n).map(|i| (k >> i) & 1 == 1).collect())
    }

    #[test]
    fn refutes_complementary_candidates() {
        // p = a & !b, q = !a & b
        let src = "aag 4 2 0 2 2\n2\n4\n6\n8\n6 2 5\n8 3 4\n";
        let mut aig = Aig::from_ascii(src.as_bytes()).unwrap();
        aig.file_sim("01 10".as_bytes(), SimOptions::default()).unwrap();
        assert_eq!(aig.get_fec_groups().len(), 1);

        let report = aig.fraig(&FraigOptions::default()).unwrap();
        assert_eq!(report.merged, 0);
        assert_eq!(report.refuted, 1);
        assert!(aig.get_gate(3).is_some() && aig.get_gate(4).is_some());
        assert!(aig.get_fec_groups().is_empty());

        let cex = &report.counterexamples[0];
        let values = aig.evaluate(&cex.inputs).unwrap();
        assert_ne!(
            values[&cex.first.gate] ^ cex.first.inverted,
            values[&cex.second.gate] ^ cex.second.inverted
        );
    }

    #[test]
    fn refuted_and_proven_pairs_in_one_group() {
        // 4 = a & b, 5 = 4 & c, 6 = b & c, 7 = a & 6: 4, 5 and 7 look constant
        let src = "aag 7 3 0 2 4\n2\n4\n6\n10\n14\n8 2 4\n10 8 6\n12 4 6\n14 2 12\n";
        let mut aig = Aig::from_ascii(src.as_bytes()).unwrap();
        aig.file_sim("011 101 010 100 000".as_bytes(), SimOptions::default())
            .unwrap();
        let members: Vec<GateId> = aig.get_fec_groups()[0].iter().map(|m| m.gate).collect();
        assert_eq!(members, vec![0, 4, 5, 7]);

        let reference = aig.clone();
        let report = aig.fraig(&FraigOptions::default()).unwrap();
        assert_eq!((report.proved, report.refuted, report.merged), (1, 5, 1));
        assert!(aig.get_gate(7).is_none());
        assert_eq!(aig.get_output_edge(1).unwrap().get_gate_id(), 5);
        assert!(aig.check_integrity().is_ok());

        for cex in &report.counterexamples {
            let values = reference.evaluate(&cex.inputs).unwrap();
            assert_ne!(
                values[&cex.first.gate] ^ cex.first.inverted,
                values[&cex.second.gate] ^ cex.second.inverted
            );
        }
    }

    #[test]
    fn merges_associativity() {
        // 4 = (a & b) & c, 6 = a & (b & c), both driving outputs
        let src = "aag 7 3 0 2 4\n2\n4\n6\n8\n12\n8 10 6\n10 2 4\n12 2 14\n14 4 6\n";
        let mut aig = Aig::from_ascii(src.as_bytes()).unwrap();
        aig.random_sim(SimOptions {
            seed: Some(3),
            ..Default::default()
        })
        .unwrap();
        let report = aig.fraig(&FraigOptions::default()).unwrap();
        assert_eq!(report.merged, 1);
        assert!(aig.get_gate(6).is_none());
        assert_eq!(aig.get_output_edge(1).unwrap().get_gate_id(), 4);
        // b & c is left without fanouts
        assert_eq!(aig.num_ands(), 3);
        assert_eq!(aig.get_unused(), &[7]);
        assert!(aig.check_integrity().is_ok());
    }

    #[test]
    fn fixture_end_to_end() {
        let mut aig = Aig::from_file("assets/circuits/fec.aag").unwrap();
        assert_eq!(aig.strash().unwrap(), 0);
        aig.random_sim(SimOptions {
            seed: Some(11),
            ..Default::default()
        })
        .unwrap();
        let report = aig.fraig(&FraigOptions::default()).unwrap();
        assert_eq!((report.merged, report.refuted), (1, 0));
        assert_eq!(aig.sweep().unwrap(), 1);
        assert_eq!(aig.num_ands(), 3);
        let left = aig.get_output_edge(0).unwrap();
        let right = aig.get_output_edge(1).unwrap();
        assert_eq!(left, right);
    }

    #[test]
    fn merges_into_constant() {
        // 3 = a & !a drives output 0, 4 = !(3) & b drives output 1
        let src = "aag 4 2 0 2 2\n2\n4\n6\n8\n6 2 3\n8 7 4\n";
        let mut aig = Aig::from_ascii(src.as_bytes()).unwrap();
        aig.random_sim(SimOptions {
            seed: Some(5),
            ..Default::default()
        })
        .unwrap();
        let report = aig.fraig(&FraigOptions::default()).unwrap();
        assert_eq!(report.merged, 1);
        assert!(aig.get_output_edge(0).unwrap().is_cst_false());
        let edge = aig
            .gate(4)
            .unwrap()
            .get_fanin(crate::FaninId::Fanin0)
            .unwrap();
        assert!(edge.is_cst_true());
    }

    #[test]
    fn fraig_preserves_outputs() {
        for seed in 0..4 {
            let mut aig = random_aig(seed, 6, 150, 6);
            let reference = aig.clone();
            aig.random_sim(SimOptions {
                seed: Some(seed),
                batches: Some(1),
                ..Default::default()
            })
            .unwrap();
            let report = aig.fraig(&FraigOptions::default()).unwrap();
            assert!(aig.check_integrity().is_ok());
            assert!(aig.num_ands() + report.merged <= reference.num_ands());
            for inputs in all_assignments(6) {
                assert_eq!(outputs_under(&aig, &inputs), outputs_under(&reference, &inputs));
            }
            for cex in &report.counterexamples {
                let values = reference.evaluate(&cex.inputs).unwrap();
                assert_ne!(
                    values[&cex.first.gate] ^ cex.first.inverted,
                    values[&cex.second.gate] ^ cex.second.inverted
                );
            }
        }
    }

    #[test]
    fn no_equivalent_pair_left() {
        let mut aig = random_aig(21, 5, 120, 5);
        aig.random_sim(SimOptions {
            seed: Some(1),
            ..Default::default()
        })
        .unwrap();
        aig.fraig(&FraigOptions::default()).unwrap();

        // Exhaustive patterns: any remaining class is a real equivalence.
        let patterns: Vec<String> = all_assignments(5)
            .map(|p| p.iter().map(|&b| if b { '1' } else { '0' }).collect())
            .collect();
        aig.file_sim(patterns.join(" ").as_bytes(), SimOptions::default())
            .unwrap();
        assert!(aig.get_fec_groups().is_empty());
    }

    #[test]
    fn cancelled_fraig_keeps_aig_consistent() {
        let src = "aag 7 3 0 2 4\n2\n4\n6\n8\n12\n8 10 6\n10 2 4\n12 2 14\n14 4 6\n";
        let mut aig = Aig::from_ascii(src.as_bytes()).unwrap();
        aig.random_sim(SimOptions {
            seed: Some(2),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(aig.get_fec_groups().len(), 1);
        let flag = CancelFlag::new();
        flag.cancel();
        let res = aig.fraig(&FraigOptions { cancel: Some(flag) });
        assert!(matches!(res, Err(AigError::Cancelled)));
        assert!(aig.get_gate(6).is_some());
        assert!(aig.check_integrity().is_ok());
        assert!(aig.get_fec_groups().is_empty());
    }
}
