//! Bit-parallel simulation and functionally equivalent candidate (FEC) classes.
//!
//! Every gate holds a [`SimVector`] of [`PATTERN_WIDTH`] bits: one input pattern per bit lane.
//! A batch evaluates the whole active netlist once, and the candidate classes are refined
//! with the new vectors. Classes only ever split from one batch to the next.
//!
//! Gates with an undefined fanin read that fanin as constant 0 (before its inversion).
//! This is a convention, not a don't-care semantics.

use std::{
    collections::{HashMap, HashSet},
    io::{Read, Write},
    ops::{BitAnd, Not},
};

use log::{debug, info};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

use crate::{
    Aig, AigEdge, AigError, FaninId, FecTag, GateId, GateKind, Result,
    cancel::{self, CancelFlag},
};

/// Number of patterns simulated at once.
pub const PATTERN_WIDTH: usize = 2048;
const WORDS: usize = PATTERN_WIDTH / 64;

/// [`PATTERN_WIDTH`] simulation bits, lane `k` being the value under the `k`-th pattern of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SimVector([u64; WORDS]);

impl SimVector {
    pub fn zero() -> Self {
        SimVector([0; WORDS])
    }

    pub fn ones() -> Self {
        SimVector([u64::MAX; WORDS])
    }

    pub fn random(rng: &mut impl RngCore) -> Self {
        let mut words = [0; WORDS];
        for w in words.iter_mut() {
            *w = rng.next_u64();
        }
        SimVector(words)
    }

    pub fn get(&self, lane: usize) -> bool {
        (self.0[lane / 64] >> (lane % 64)) & 1 == 1
    }

    pub fn set(&mut self, lane: usize, value: bool) {
        let mask = 1u64 << (lane % 64);
        if value {
            self.0[lane / 64] |= mask;
        } else {
            self.0[lane / 64] &= !mask;
        }
    }

    pub fn complement_if(&self, complement: bool) -> SimVector {
        if complement { !self } else { self.clone() }
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&w| w == 0)
    }
}

impl Not for &SimVector {
    type Output = SimVector;

    fn not(self) -> SimVector {
        let mut words = self.0;
        for w in words.iter_mut() {
            *w = !*w;
        }
        SimVector(words)
    }
}

impl BitAnd for &SimVector {
    type Output = SimVector;

    fn bitand(self, rhs: &SimVector) -> SimVector {
        let mut words = self.0;
        for (w, r) in words.iter_mut().zip(rhs.0.iter()) {
            *w &= r;
        }
        SimVector(words)
    }
}

/// A member of a FEC class. `inverted` is relative to the first member once the class is finalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FecMember {
    pub gate: GateId,
    pub inverted: bool,
}

/// A class of gates with identical (or complementary) simulation values so far.
pub type FecGroup = Vec<FecMember>;

/// Error returned when simulation patterns are malformed.
///
/// Patterns are numbered from 1, in file order.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PatternError {
    #[error(
        "error: pattern({pattern}) length({len}) does not match the number of inputs({expected}) in a circuit (pattern {index})"
    )]
    Length {
        index: usize,
        pattern: String,
        len: usize,
        expected: usize,
    },

    #[error("error: pattern({pattern}) contains a non-0/1 character('{ch}') (pattern {index})")]
    Character {
        index: usize,
        pattern: String,
        ch: char,
    },

    /// Single pattern evaluation with a wrong number of input values.
    #[error("expected {expected} input values, got {got}")]
    InputCount { got: usize, expected: usize },

    #[error("cannot read patterns: {0}")]
    Io(String),
}

/// Simulation settings. Everything is optional.
#[derive(Default)]
pub struct SimOptions<'a> {
    /// Seed of the random pattern generator. A fresh one is drawn (and logged) when missing.
    pub seed: Option<u64>,
    /// Number of random batches, instead of the default depending on the number of inputs.
    pub batches: Option<usize>,
    /// Receives one line per simulated pattern: input bits, a space, output bits.
    pub trace: Option<&'a mut dyn Write>,
    pub cancel: Option<CancelFlag>,
}

/// What a simulation run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimReport {
    pub batches: usize,
    pub patterns: usize,
    /// Number of FEC classes after the run.
    pub groups: usize,
    /// Seed used for random simulation.
    pub seed: Option<u64>,
}

/// Default number of random batches for a circuit with `num_inputs` inputs.
pub fn default_batches(num_inputs: usize) -> usize {
    if num_inputs < 1000 {
        let n = num_inputs as f64;
        1 + (n * n * 0.381924) as usize / PATTERN_WIDTH
    } else {
        40000 / PATTERN_WIDTH
    }
}

/// Validates every pattern first, so that a bad file does not simulate anything.
fn validate_patterns(text: &str, num_inputs: usize) -> std::result::Result<Vec<&[u8]>, PatternError> {
    let mut patterns = Vec::new();
    for (k, pattern) in text.split_whitespace().enumerate() {
        let len = pattern.chars().count();
        if len != num_inputs {
            return Err(PatternError::Length {
                index: k + 1,
                pattern: pattern.to_string(),
                len,
                expected: num_inputs,
            });
        }
        if let Some(ch) = pattern.chars().find(|&c| c != '0' && c != '1') {
            return Err(PatternError::Character {
                index: k + 1,
                pattern: pattern.to_string(),
                ch,
            });
        }
        patterns.push(pattern.as_bytes());
    }
    Ok(patterns)
}

impl Aig {
    /// Simulate random patterns and refine the FEC classes.
    ///
    /// Returns [`AigError::Cancelled`] if the flag of `options` is raised between two batches.
    /// Classes refined so far are kept in that case.
    pub fn random_sim(&mut self, mut options: SimOptions) -> Result<SimReport> {
        self.refresh()?;
        let seed = options.seed.unwrap_or_else(|| rand::rng().next_u64());
        let batches = options
            .batches
            .unwrap_or_else(|| default_batches(self.inputs.len()));
        info!("random simulation: {} batch(es), seed {}", batches, seed);

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let inputs = self.inputs.clone();
        for _ in 0..batches {
            self.check_cancel(&options.cancel)?;
            for &id in &inputs {
                self.gate_mut(id)?.value = SimVector::random(&mut rng);
            }
            self.run_batch(&mut options.trace, PATTERN_WIDTH)?;
        }
        self.finalize_fec_groups();

        let report = SimReport {
            batches,
            patterns: batches * PATTERN_WIDTH,
            groups: self.fec_groups.len(),
            seed: Some(seed),
        };
        info!(
            "{} patterns simulated, {} FEC group(s)",
            report.patterns, report.groups
        );
        Ok(report)
    }

    /// Simulate the patterns read from `reader`: whitespace separated strings of `0` and `1`,
    /// one character per input in declaration order.
    ///
    /// Nothing is simulated if any pattern is malformed.
    pub fn file_sim(&mut self, mut reader: impl Read, mut options: SimOptions) -> Result<SimReport> {
        let mut text = String::new();
        reader
            .read_to_string(&mut text)
            .map_err(|e| PatternError::Io(e.to_string()))?;
        let patterns = validate_patterns(&text, self.inputs.len())?;

        self.refresh()?;
        let inputs = self.inputs.clone();
        let mut batches = 0;
        for chunk in patterns.chunks(PATTERN_WIDTH) {
            self.check_cancel(&options.cancel)?;
            for (i, &id) in inputs.iter().enumerate() {
                let mut value = SimVector::zero();
                for lane in 0..PATTERN_WIDTH {
                    // Unused lanes of the last batch replay its first pattern.
                    let pattern = chunk.get(lane).unwrap_or(&chunk[0]);
                    value.set(lane, pattern[i] == b'1');
                }
                self.gate_mut(id)?.value = value;
            }
            self.run_batch(&mut options.trace, chunk.len())?;
            batches += 1;
        }
        self.finalize_fec_groups();

        let report = SimReport {
            batches,
            patterns: patterns.len(),
            groups: self.fec_groups.len(),
            seed: None,
        };
        info!(
            "{} patterns simulated, {} FEC group(s)",
            report.patterns, report.groups
        );
        Ok(report)
    }

    fn check_cancel(&mut self, flag: &Option<CancelFlag>) -> Result<()> {
        if let Err(e) = cancel::check(flag) {
            info!("simulation cancelled");
            self.finalize_fec_groups();
            return Err(e);
        }
        Ok(())
    }

    /// Simulate the current input values, refine the classes and trace the first `lanes` patterns.
    fn run_batch(&mut self, trace: &mut Option<&mut dyn Write>, lanes: usize) -> Result<()> {
        self.simulate_batch()?;
        self.refine_fec_groups()?;
        if let Some(w) = trace {
            self.write_trace(&mut **w, lanes)?;
        }
        Ok(())
    }

    fn edge_value(&self, edge: AigEdge) -> Result<SimVector> {
        let value = match edge.is_floating() {
            true => SimVector::zero(),
            false => self.gate(edge.get_gate_id())?.value.clone(),
        };
        Ok(value.complement_if(edge.get_complement()))
    }

    /// Evaluate the active netlist in order, inputs keeping their current values.
    pub(crate) fn simulate_batch(&mut self) -> Result<()> {
        for k in 0..self.active.len() {
            let id = self.active[k];
            let gate = self.gate(id)?;
            let value = match gate.get_kind() {
                GateKind::Input => continue,
                GateKind::Const0 | GateKind::Undefined => SimVector::zero(),
                GateKind::And => {
                    let v0 = self.edge_value(gate.get_fanin(FaninId::Fanin0)?)?;
                    let v1 = self.edge_value(gate.get_fanin(FaninId::Fanin1)?)?;
                    &v0 & &v1
                }
                GateKind::Output => self.edge_value(gate.get_fanin(FaninId::Fanin0)?)?,
            };
            self.gate_mut(id)?.value = value;
        }
        Ok(())
    }

    /// Split the classes with the values of the last batch.
    ///
    /// The first batch builds the partition, matching each gate on its value or its complement.
    /// Later batches only split classes, keeping members with the same value relative to
    /// their tag together: a member whose polarity relation with the others flips is split off,
    /// even if it is still the exact complement of another member.
    fn refine_fec_groups(&mut self) -> Result<()> {
        if !self.fec_initialized {
            // The constant seeds the very first partition.
            let candidates = std::iter::once(0).chain(
                self.active
                    .iter()
                    .copied()
                    .filter(|id| self.gates.get(id).is_some_and(|g| g.is_and())),
            );
            let mut table: HashMap<SimVector, usize> = HashMap::new();
            let mut entries: Vec<FecGroup> = Vec::new();
            for id in candidates {
                let value = &self.gate(id)?.value;
                if let Some(&e) = table.get(value) {
                    entries[e].push(FecMember { gate: id, inverted: false });
                } else if let Some(&e) = table.get(&!value) {
                    entries[e].push(FecMember { gate: id, inverted: true });
                } else {
                    table.insert(value.clone(), entries.len());
                    entries.push(vec![FecMember { gate: id, inverted: false }]);
                }
            }
            self.fec_groups = entries.into_iter().filter(|g| g.len() >= 2).collect();
            self.fec_initialized = true;
            debug!("initial partition: {} FEC group(s)", self.fec_groups.len());
            return Ok(());
        }

        // Members are keyed by their value normalized by their tag, so that a pair keeps
        // the polarity relation it had when the class was formed. There is no complement
        // lookup here: two members whose relative polarity flips end up in different classes.
        let mut groups = Vec::new();
        for group in std::mem::take(&mut self.fec_groups) {
            let mut table: HashMap<SimVector, usize> = HashMap::new();
            let mut entries: Vec<FecGroup> = Vec::new();
            for member in group {
                let key = self.gate(member.gate)?.value.complement_if(member.inverted);
                match table.get(&key) {
                    Some(&e) => entries[e].push(member),
                    None => {
                        table.insert(key, entries.len());
                        entries.push(vec![member]);
                    }
                }
            }
            groups.extend(entries.into_iter().filter(|g| g.len() >= 2));
        }
        self.fec_groups = groups;
        Ok(())
    }

    /// Sorts the classes, re-bases their tags on their first member and stamps every member.
    pub(crate) fn finalize_fec_groups(&mut self) {
        for gate in self.gates.values_mut() {
            gate.fec = None;
        }
        let mut groups: Vec<FecGroup> = std::mem::take(&mut self.fec_groups)
            .into_iter()
            .filter(|g| g.len() >= 2)
            .collect();
        for group in groups.iter_mut() {
            group.sort_unstable_by_key(|m| m.gate);
            let base = group[0].inverted;
            for member in group.iter_mut() {
                member.inverted ^= base;
            }
        }
        groups.sort_unstable();

        for (k, group) in groups.iter().enumerate() {
            for member in group {
                if let Some(gate) = self.gates.get_mut(&member.gate) {
                    gate.fec = Some(FecTag {
                        group: k,
                        inverted: member.inverted,
                    });
                }
            }
        }
        self.fec_groups = groups;
    }

    /// Drops members that left the active netlist. Called on every refresh.
    pub(crate) fn prune_fec_groups(&mut self) {
        if !self.fec_initialized {
            return;
        }
        let active: HashSet<GateId> = self.active.iter().copied().collect();
        for group in self.fec_groups.iter_mut() {
            group.retain(|m| m.gate == 0 || active.contains(&m.gate));
        }
        self.finalize_fec_groups();
    }

    /// Forget every class, the next simulation starts a new partition.
    pub(crate) fn clear_fec_groups(&mut self) {
        self.fec_groups.clear();
        self.fec_initialized = false;
        for gate in self.gates.values_mut() {
            gate.fec = None;
        }
    }

    fn write_trace(&self, w: &mut dyn Write, lanes: usize) -> Result<()> {
        let mut line = String::with_capacity(self.inputs.len() + self.outputs.len() + 2);
        for lane in 0..lanes {
            line.clear();
            for &id in &self.inputs {
                line.push(if self.gate(id)?.value.get(lane) { '1' } else { '0' });
            }
            line.push(' ');
            for &id in &self.outputs {
                line.push(if self.gate(id)?.value.get(lane) { '1' } else { '0' });
            }
            writeln!(w, "{}", line)?;
        }
        Ok(())
    }

    /// FEC classes of the last simulation, sorted. Empty after fraig.
    pub fn get_fec_groups(&self) -> &[FecGroup] {
        &self.fec_groups
    }

    /// Evaluate the active netlist under a single input assignment (inputs in declaration order).
    ///
    /// Returns the value of every active gate, with the constant and all inputs.
    /// The active netlist must be up to date (see [`Aig::refresh`]).
    pub fn evaluate(&self, inputs: &[bool]) -> Result<HashMap<GateId, bool>> {
        if inputs.len() != self.inputs.len() {
            return Err(PatternError::InputCount {
                got: inputs.len(),
                expected: self.inputs.len(),
            }
            .into());
        }
        let mut values: HashMap<GateId, bool> = HashMap::from([(0, false)]);
        values.extend(self.inputs.iter().copied().zip(inputs.iter().copied()));

        let edge_value = |values: &HashMap<GateId, bool>, edge: AigEdge| -> Result<bool> {
            let value = match edge.is_floating() {
                true => false,
                false => *values.get(&edge.get_gate_id()).ok_or(AigError::InvalidState(
                    format!("gate {} evaluated before its fanin", edge.get_gate_id()),
                ))?,
            };
            Ok(value ^ edge.get_complement())
        };

        for &id in &self.active {
            let gate = self.gate(id)?;
            let value = match gate.get_kind() {
                GateKind::Input => continue,
                GateKind::Const0 | GateKind::Undefined => false,
                GateKind::And => {
                    edge_value(&values, gate.get_fanin(FaninId::Fanin0)?)?
                        & edge_value(&values, gate.get_fanin(FaninId::Fanin1)?)?
                }
                GateKind::Output => edge_value(&values, gate.get_fanin(FaninId::Fanin0)?)?,
            };
            values.insert(id, value);
        }
        Ok(values)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::testing::random_aig;
    use test_log::test;

    fn members(group: &FecGroup) -> Vec<GateId> {
        group.iter().map(|m| m.gate).collect()
    }

    #[test]
    fn sim_vector_ops() {
        let mut v = SimVector::zero();
        v.set(3, true);
        v.set(2047, true);
        assert!(v.get(3) && v.get(2047) && !v.get(4));
        assert_eq!(&!&v & &v, SimVector::zero());
        assert_eq!(!&SimVector::zero(), SimVector::ones());
        assert_eq!(v.complement_if(false), v);
        v.set(3, false);
        assert!(!v.get(3));
        assert!(SimVector::zero().is_zero());
    }

    #[test]
    fn default_batches_test() {
        assert_eq!(default_batches(0), 1);
        assert_eq!(default_batches(100), 2);
        assert_eq!(default_batches(999), 187);
        assert_eq!(default_batches(5000), 19);
    }

    #[test]
    fn file_sim_and_trace() {
        let mut aig = Aig::from_ascii("aag 3 2 0 2 1\n2\n4\n6\n7\n6 2 4\n".as_bytes()).unwrap();
        let mut trace = Vec::new();
        let report = aig
            .file_sim(
                "00 01\n10 11".as_bytes(),
                SimOptions {
                    trace: Some(&mut trace),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(report.patterns, 4);
        assert_eq!(report.batches, 1);
        assert_eq!(
            String::from_utf8(trace).unwrap(),
            "00 01\n01 01\n10 01\n11 10\n"
        );
        // Lanes after the last pattern replay the first one.
        assert!(!aig.gate(3).unwrap().get_value().get(100));
        assert!(aig.gate(3).unwrap().get_value().get(3));
    }

    #[test]
    fn pattern_errors_leave_state_untouched() {
        let mut aig = Aig::from_ascii("aag 4 2 0 2 2\n2\n4\n6\n8\n6 2 4\n8 4 2\n".as_bytes()).unwrap();
        aig.file_sim("01 11 10".as_bytes(), SimOptions::default()).unwrap();
        let groups = aig.get_fec_groups().to_vec();
        let value = aig.gate(3).unwrap().get_value().clone();
        assert_eq!(groups.len(), 1);

        let err = aig
            .file_sim("00 01 1x".as_bytes(), SimOptions::default())
            .unwrap_err();
        assert!(matches!(
            err,
            AigError::PatternError(PatternError::Character { index: 3, ch: 'x', .. })
        ));
        let err = aig
            .file_sim("00 011".as_bytes(), SimOptions::default())
            .unwrap_err();
        assert!(matches!(
            err,
            AigError::PatternError(PatternError::Length { index: 2, len: 3, expected: 2, .. })
        ));
        assert_eq!(aig.get_fec_groups(), groups.as_slice());
        assert_eq!(aig.gate(3).unwrap().get_value(), &value);
    }

    #[test]
    fn empty_pattern_file() {
        let mut aig = Aig::from_ascii("aag 3 2 0 1 1\n2\n4\n6\n6 2 4\n".as_bytes()).unwrap();
        let report = aig.file_sim("  \n".as_bytes(), SimOptions::default()).unwrap();
        assert_eq!(report.batches, 0);
        assert!(aig.get_fec_groups().is_empty());
    }

    #[test]
    fn floating_fanin_reads_zero() {
        // 3 = a & u, 4 = a & !u with u undefined
        let src = "aag 5 1 0 2 2\n2\n6\n8\n6 2 10\n8 2 11\n";
        let mut aig = Aig::from_ascii(src.as_bytes()).unwrap();
        aig.file_sim("0 1".as_bytes(), SimOptions::default()).unwrap();
        let x = aig.gate(3).unwrap().get_value();
        let y = aig.gate(4).unwrap().get_value();
        assert!(!x.get(0) && !x.get(1));
        assert!(!y.get(0) && y.get(1));

        let values = aig.evaluate(&[true]).unwrap();
        assert!(!values[&3]);
        assert!(values[&4]);
    }

    #[test]
    fn complementary_pair_grouped() {
        // p = a & !b, q = !a & b, on patterns where they are complements
        let src = "aag 4 2 0 2 2\n2\n4\n6\n8\n6 2 5\n8 3 4\n";
        let mut aig = Aig::from_ascii(src.as_bytes()).unwrap();
        aig.file_sim("01 10".as_bytes(), SimOptions::default()).unwrap();
        assert_eq!(
            aig.get_fec_groups(),
            &[vec![
                FecMember { gate: 3, inverted: false },
                FecMember { gate: 4, inverted: true }
            ]]
        );
        assert_eq!(aig.gate(4).unwrap().get_fec(), Some(FecTag { group: 0, inverted: true }));

        // The four patterns separate them.
        aig.file_sim("00 11".as_bytes(), SimOptions::default()).unwrap();
        assert!(aig.get_fec_groups().is_empty());
        assert_eq!(aig.gate(4).unwrap().get_fec(), None);
    }

    #[test]
    fn polarity_flip_splits_class() {
        // p = a & b, q = a & c
        let src = "aag 5 3 0 2 2\n2\n4\n6\n8\n10\n8 2 4\n10 2 6\n";
        let mut aig = Aig::from_ascii(src.as_bytes()).unwrap();
        aig.file_sim("111".as_bytes(), SimOptions::default()).unwrap();
        assert_eq!(aig.get_fec_groups().len(), 1);
        assert_eq!(aig.get_fec_groups()[0].len(), 3);

        // q is now the exact complement of p, which is not the relation it had with p.
        aig.file_sim("110".as_bytes(), SimOptions::default()).unwrap();
        assert_eq!(
            aig.get_fec_groups(),
            &[vec![
                FecMember { gate: 0, inverted: false },
                FecMember { gate: 4, inverted: true }
            ]]
        );
        assert_eq!(aig.gate(5).unwrap().get_fec(), None);
    }

    #[test]
    fn constant_seeds_partition() {
        // 3 = a & !a is constant 0, 4 = !3 & !3 is constant 1
        let src = "aag 4 1 0 2 2\n2\n6\n8\n6 2 3\n8 7 7\n";
        let mut aig = Aig::from_ascii(src.as_bytes()).unwrap();
        aig.random_sim(SimOptions {
            seed: Some(1),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(
            aig.get_fec_groups(),
            &[vec![
                FecMember { gate: 0, inverted: false },
                FecMember { gate: 3, inverted: false },
                FecMember { gate: 4, inverted: true }
            ]]
        );
    }

    #[test]
    fn partition_only_splits() {
        let mut aig = random_aig(7, 6, 200, 8);
        aig.random_sim(SimOptions {
            seed: Some(1),
            batches: Some(1),
            ..Default::default()
        })
        .unwrap();
        for seed in 2..6 {
            let before: Vec<HashSet<GateId>> = aig
                .get_fec_groups()
                .iter()
                .map(|g| members(g).into_iter().collect())
                .collect();
            aig.random_sim(SimOptions {
                seed: Some(seed),
                batches: Some(1),
                ..Default::default()
            })
            .unwrap();
            for group in aig.get_fec_groups() {
                let ids: HashSet<GateId> = members(group).into_iter().collect();
                assert!(before.iter().any(|old| ids.is_subset(old)));
            }
        }
    }

    #[test]
    fn class_members_agree_with_tags() {
        let mut aig = random_aig(3, 5, 150, 6);
        aig.random_sim(SimOptions {
            seed: Some(11),
            ..Default::default()
        })
        .unwrap();
        for group in aig.get_fec_groups() {
            let first = aig.gate(group[0].gate).unwrap().get_value();
            assert!(!group[0].inverted);
            for m in group {
                let v = aig.gate(m.gate).unwrap().get_value();
                assert_eq!(&v.complement_if(m.inverted), first);
            }
        }
    }

    #[test]
    fn same_seed_same_classes() {
        let mut a = random_aig(5, 8, 120, 4);
        let mut b = a.clone();
        let options = || SimOptions {
            seed: Some(42),
            batches: Some(2),
            ..Default::default()
        };
        let ra = a.random_sim(options()).unwrap();
        let rb = b.random_sim(options()).unwrap();
        assert_eq!(ra, rb);
        assert_eq!(a.get_fec_groups(), b.get_fec_groups());
    }

    #[test]
    fn cancelled_simulation() {
        let mut aig = random_aig(1, 4, 50, 3);
        let flag = CancelFlag::new();
        flag.cancel();
        let res = aig.random_sim(SimOptions {
            seed: Some(1),
            cancel: Some(flag),
            ..Default::default()
        });
        assert!(matches!(res, Err(AigError::Cancelled)));
        assert!(aig.get_fec_groups().is_empty());
    }

    #[test]
    fn evaluate_matches_simulation() {
        let mut aig = random_aig(9, 4, 60, 5);
        let patterns = ["0000", "1010", "1111", "0110"];
        aig.file_sim(patterns.join(" ").as_bytes(), SimOptions::default())
            .unwrap();
        for (lane, p) in patterns.iter().enumerate() {
            let inputs: Vec<bool> = p.chars().map(|c| c == '1').collect();
            let values = aig.evaluate(&inputs).unwrap();
            for &id in aig.get_active() {
                assert_eq!(values[&id], aig.gate(id).unwrap().get_value().get(lane));
            }
        }
        assert!(aig.evaluate(&[true]).is_err());
    }
}
