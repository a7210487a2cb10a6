use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{PlannerError, Result};

/// Disables a control while its own request is in flight.
#[derive(Debug, Clone, Default)]
pub struct InFlight {
    busy: Arc<AtomicBool>,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims the control, or fails with [`PlannerError::Busy`] if it is already claimed.
    pub fn try_begin(&self) -> Result<InFlightGuard> {
        if self.busy.swap(true, Ordering::AcqRel) {
            return Err(PlannerError::Busy);
        }
        Ok(InFlightGuard {
            busy: Arc::clone(&self.busy),
        })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Re-enables the control when dropped.
#[derive(Debug)]
pub struct InFlightGuard {
    busy: Arc<AtomicBool>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}
