//! Random circuits for tests.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::{Aig, AigEdge, GateId};

/// A random AIG with `inputs` inputs, about `ands` AND gates and `outputs` outputs.
///
/// Some gates are structural duplicates of earlier ones, and some rebuild `(x & y) & z`
/// as `x & (y & z)`, so that the passes have something to merge.
pub(crate) fn random_aig(seed: u64, inputs: usize, ands: usize, outputs: usize) -> Aig {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut aig = Aig::new();
    let mut pool: Vec<GateId> = (0..inputs).map(|_| aig.new_input().unwrap()).collect();
    let mut built: Vec<(AigEdge, AigEdge)> = Vec::new();

    let pick = |rng: &mut ChaCha8Rng, pool: &[GateId]| {
        // The constant shows up once in a while.
        let gate = if rng.random_bool(0.02) {
            0
        } else {
            pool[rng.random_range(0..pool.len())]
        };
        AigEdge::new(gate, rng.random_bool(0.5))
    };

    while built.len() < ands {
        let roll = rng.random_range(0..10);
        if roll == 0 && !built.is_empty() {
            // Same fanins as an earlier gate, maybe swapped.
            let (f0, f1) = built[rng.random_range(0..built.len())];
            let (f0, f1) = if rng.random_bool(0.5) { (f0, f1) } else { (f1, f0) };
            pool.push(aig.new_and(f0, f1).unwrap());
            built.push((f0, f1));
        } else if roll == 1 && pool.len() >= 3 {
            let (x, y, z) = (pick(&mut rng, &pool), pick(&mut rng, &pool), pick(&mut rng, &pool));
            let xy = AigEdge::new(aig.new_and(x, y).unwrap(), false);
            let left = aig.new_and(xy, z).unwrap();
            let yz = AigEdge::new(aig.new_and(y, z).unwrap(), false);
            let right = aig.new_and(x, yz).unwrap();
            built.extend([(x, y), (xy, z), (y, z), (x, yz)]);
            pool.extend([xy.get_gate_id(), left, yz.get_gate_id(), right]);
        } else {
            let (f0, f1) = (pick(&mut rng, &pool), pick(&mut rng, &pool));
            pool.push(aig.new_and(f0, f1).unwrap());
            built.push((f0, f1));
        }
    }

    // Outputs favour the most recent gates, so that most of the circuit is active.
    let recent = pool.len().saturating_sub(pool.len() / 4 + 1);
    for _ in 0..outputs {
        let gate = pool[rng.random_range(recent..pool.len())];
        aig.new_output(AigEdge::new(gate, rng.random_bool(0.5))).unwrap();
    }
    aig.refresh().unwrap();
    aig
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn random_aig_is_valid() {
        let aig = random_aig(3, 4, 100, 5);
        assert!(aig.check_integrity().is_ok());
        assert_eq!(aig.get_inputs().len(), 4);
        assert_eq!(aig.get_outputs().len(), 5);
        assert!(aig.num_ands() >= 100);
        assert!(aig.get_floating().is_empty());
        assert_eq!(aig.to_aag_string().unwrap(), random_aig(3, 4, 100, 5).to_aag_string().unwrap());
    }
}
