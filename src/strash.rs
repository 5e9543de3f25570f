//! Structural hashing: AND gates with the same fanins are merged.

use std::collections::HashMap;

use log::{debug, info};

use crate::{Aig, AigEdge, FaninId, GateId, Result};

/// Order-insensitive key of an AND gate: fanins sorted by id then complement,
/// the smaller one in the low word.
pub fn strash_key(fanin0: AigEdge, fanin1: AigEdge) -> u128 {
    let (lo, hi) = if (fanin0.get_gate_id(), fanin0.get_complement())
        <= (fanin1.get_gate_id(), fanin1.get_complement())
    {
        (fanin0, fanin1)
    } else {
        (fanin1, fanin0)
    };
    ((hi.literal() as u128) << 64) | lo.literal() as u128
}

impl Aig {
    /// Merge structurally identical AND gates, in active order: the first gate seen with
    /// some key is kept and later ones are merged into it then deleted.
    ///
    /// Returns the number of merged gates. Running it twice in a row merges nothing the
    /// second time.
    pub fn strash(&mut self) -> Result<usize> {
        self.refresh()?;
        let order = self.active.clone();
        let mut table: HashMap<u128, GateId> = HashMap::new();
        let mut merged = 0;

        for id in order {
            let gate = self.gate(id)?;
            if !gate.is_and() {
                continue;
            }
            // Fanins are read again here, as previous merges may have rewired them.
            let key = strash_key(gate.get_fanin(FaninId::Fanin0)?, gate.get_fanin(FaninId::Fanin1)?);
            match table.get(&key) {
                Some(&rep) => {
                    debug!("strash: {} merging {}", rep, id);
                    self.merge_gates(rep, id, false)?;
                    self.delete_gate(id)?;
                    merged += 1;
                }
                None => {
                    table.insert(key, id);
                }
            }
        }

        self.refresh()?;
        info!("strash: {} gate(s) merged", merged);
        Ok(merged)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{SimOptions, testing::random_aig};
    use test_log::test;

    #[test]
    fn strash_key_test() {
        let a = AigEdge::new(3, false);
        let b = AigEdge::new(5, true);
        assert_eq!(strash_key(a, b), strash_key(b, a));
        assert_eq!(strash_key(a, b), (11u128 << 64) | 6);
        assert_ne!(strash_key(a, b), strash_key(a, !b));
        assert_ne!(strash_key(a, !a), strash_key(a, a));
    }

    #[test]
    fn two_identical_ands() {
        // x = a & b, y = b & a, outputs x and !y
        let src = "aag 4 2 0 2 2\n2\n4\n6\n9\n6 2 4\n8 4 2\n";
        let mut aig = Aig::from_ascii(src.as_bytes()).unwrap();
        assert_eq!(aig.strash().unwrap(), 1);
        assert_eq!(aig.num_ands(), 1);
        assert!(aig.get_gate(4).is_none());
        let o0 = aig.get_output_edge(0).unwrap();
        let o1 = aig.get_output_edge(1).unwrap();
        assert_eq!((o0.get_gate_id(), o0.get_complement()), (3, false));
        assert_eq!((o1.get_gate_id(), o1.get_complement()), (3, true));
        assert!(aig.check_integrity().is_ok());
    }

    #[test]
    fn cascading_merges() {
        // 4 = a & b, 5 = a & b, 6 = 4 & c, 7 = 5 & c: merging 5 makes 7 a copy of 6
        let src = "aag 7 3 0 2 4\n2\n4\n6\n12\n14\n8 2 4\n10 2 4\n12 8 6\n14 10 6\n";
        let mut aig = Aig::from_ascii(src.as_bytes()).unwrap();
        assert_eq!(aig.strash().unwrap(), 2);
        assert_eq!(aig.num_ands(), 2);
        assert_eq!(aig.get_output_edge(1).unwrap().get_gate_id(), 6);
    }

    #[test]
    fn strash_idempotent() {
        for seed in 0..5 {
            let mut aig = random_aig(seed, 5, 200, 6);
            aig.strash().unwrap();
            let text = aig.to_aag_string().unwrap();
            assert_eq!(aig.strash().unwrap(), 0);
            assert_eq!(aig.to_aag_string().unwrap(), text);
        }
    }

    #[test]
    fn strash_preserves_outputs() {
        let mut aig = random_aig(17, 6, 300, 8);
        let mut reference = aig.clone();
        aig.strash().unwrap();
        assert!(aig.check_integrity().is_ok());

        let patterns = "000000 111111 101010 010101 110011 001100 100001 011110";
        aig.file_sim(patterns.as_bytes(), SimOptions::default()).unwrap();
        reference.file_sim(patterns.as_bytes(), SimOptions::default()).unwrap();
        for (a, b) in aig.get_outputs().iter().zip(reference.get_outputs()) {
            assert_eq!(aig.gate(*a).unwrap().get_value(), reference.gate(*b).unwrap().get_value());
        }
    }
}
