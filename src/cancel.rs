//! Cooperative cancellation of long running passes.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use crate::{AigError, Result};

/// A flag shared between a running pass and whoever wants to stop it.
///
/// Simulation checks it between batches and fraig between SAT queries. A cancelled pass
/// returns [`AigError::Cancelled`] and leaves the AIG consistent: work done so far is kept.
///
/// ```rust
/// use fraig::CancelFlag;
/// let flag = CancelFlag::new();
/// let handle = flag.clone();
/// handle.cancel();
/// assert!(flag.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        CancelFlag::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Fails with [`AigError::Cancelled`] if a flag is given and raised.
pub(crate) fn check(flag: &Option<CancelFlag>) -> Result<()> {
    match flag {
        Some(flag) if flag.is_cancelled() => Err(AigError::Cancelled),
        _ => Ok(()),
    }
}
