//! Single-flight guard for summarization commands.
//!
//! At most one acquisition runs at a time; a second request is rejected
//! immediately rather than queued. The guard belongs to the command layer
//! so the acquisition pipeline itself stays reentrant.

use crate::error::{Result, ResymeError};
use std::sync::atomic::{AtomicBool, Ordering};

static IN_FLIGHT: AtomicBool = AtomicBool::new(false);

/// RAII permit for the single processing slot.
pub struct ProcessingSlot(());

impl ProcessingSlot {
    /// Claim the slot, failing fast if a request is already being processed.
    pub fn acquire() -> Result<Self> {
        if IN_FLIGHT
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            Ok(ProcessingSlot(()))
        } else {
            Err(ResymeError::AlreadyProcessing)
        }
    }
}

impl Drop for ProcessingSlot {
    fn drop(&mut self) {
        IN_FLIGHT.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_acquire_is_rejected_until_release() {
        let slot = ProcessingSlot::acquire().unwrap();
        assert!(matches!(
            ProcessingSlot::acquire(),
            Err(ResymeError::AlreadyProcessing)
        ));
        drop(slot);
        assert!(ProcessingSlot::acquire().is_ok());
    }
}
