//! Functionally reduced AIGs.
//!
//! Read a combinational circuit from the ASCII AIGER format, then shrink it without changing
//! what its outputs compute:
//!
//! ```rust
//! use fraig::{Aig, FraigOptions, SimOptions};
//!
//! // o0 = (a & b) & c, o1 = a & (b & c)
//! let src = "aag 7 3 0 2 4\n2\n4\n6\n10\n14\n8 2 4\n10 8 6\n12 4 6\n14 2 12\n";
//! let mut aig = Aig::from_ascii(src.as_bytes()).unwrap();
//! aig.strash().unwrap();
//! aig.random_sim(SimOptions::default()).unwrap();
//! let report = aig.fraig(&FraigOptions::default()).unwrap();
//! assert_eq!(report.merged, 1);
//! aig.sweep().unwrap();
//! assert_eq!(aig.num_ands(), 2);
//! ```

pub mod aig;
pub mod cancel;
pub mod cnf;
pub mod fraig;
pub mod optim;
pub mod report;
pub mod sim;
pub mod strash;

#[cfg(test)]
mod testing;

// Re-exporting symbols and modules.
pub use aig::dfs;
pub use aig::{
    Aig, AigEdge, AigError, FaninId, Fanout, FecTag, Gate, GateId, GateKind, MAX_GATE_ID, ParserError,
    ParserErrorKind, Result,
};
pub use cancel::CancelFlag;
pub use fraig::{Counterexample, FraigError, FraigOptions, FraigReport};
pub use sim::{FecGroup, FecMember, PATTERN_WIDTH, PatternError, SimOptions, SimReport, SimVector};
