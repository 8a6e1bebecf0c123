//! In-flight submission lock
//!
//! Only one mutation may be appending to the ledger at a time. A second
//! submission arriving while the first is still open is turned away instead
//! of queued.

use std::sync::{Mutex, MutexGuard, TryLockError};

use tracing::warn;

use crate::error::{MealPoolError, MealPoolResult};

/// Single-slot lock around ledger mutations
#[derive(Debug, Default)]
pub struct SubmissionGuard {
    slot: Mutex<()>,
}

/// Proof that a submission is open; releases the slot when dropped
#[derive(Debug)]
#[must_use = "the submission closes as soon as this is dropped"]
pub struct Submission<'a> {
    _held: MutexGuard<'a, ()>,
}

impl SubmissionGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a submission, or fail if one is already in flight
    pub fn try_begin(&self) -> MealPoolResult<Submission<'_>> {
        match self.slot.try_lock() {
            Ok(held) => Ok(Submission { _held: held }),
            // A submission that panicked still released the slot
            Err(TryLockError::Poisoned(poisoned)) => Ok(Submission {
                _held: poisoned.into_inner(),
            }),
            Err(TryLockError::WouldBlock) => {
                warn!("rejected submission while another is in progress");
                Err(MealPoolError::SubmissionInProgress)
            }
        }
    }

    /// Whether a submission is currently open
    pub fn is_busy(&self) -> bool {
        matches!(self.slot.try_lock(), Err(TryLockError::WouldBlock))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_submission_is_rejected() {
        let guard = SubmissionGuard::new();
        let first = guard.try_begin().unwrap();

        let err = guard.try_begin().unwrap_err();
        assert!(matches!(err, MealPoolError::SubmissionInProgress));
        assert!(guard.is_busy());

        drop(first);
        assert!(!guard.is_busy());
        assert!(guard.try_begin().is_ok());
    }

    #[test]
    fn test_released_on_error_path() {
        let guard = SubmissionGuard::new();

        let failing = || -> MealPoolResult<()> {
            let _submission = guard.try_begin()?;
            Err(MealPoolError::Validation("amount must be positive".into()))
        };
        assert!(failing().is_err());
        assert!(!guard.is_busy());
    }

    #[test]
    fn test_rejected_across_threads() {
        let guard = SubmissionGuard::new();
        let _open = guard.try_begin().unwrap();

        std::thread::scope(|scope| {
            let handle = scope.spawn(|| guard.try_begin().is_err());
            assert!(handle.join().unwrap());
        });
    }
}
