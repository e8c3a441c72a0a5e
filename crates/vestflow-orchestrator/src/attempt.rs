//! Claim attempt working state
//!
//! Owned exclusively by the orchestrator for the duration of one `execute`
//! call; a new attempt starts fresh.

use crate::phase::{validate_transition, ClaimPhase, PhaseError};
use std::time::Instant;
use vestflow_types::{AttemptId, TxSignature};

/// Mutable state of one claim invocation
#[derive(Debug, Clone)]
pub struct ClaimAttempt {
    /// Attempt identifier
    pub id: AttemptId,
    /// Current phase
    pub phase: ClaimPhase,
    /// Last progress value reached, 0..=100
    pub progress_percent: u8,
    /// Fee payment signature once broadcast
    pub fee_signature: Option<TxSignature>,
    /// Message of the error that ended the attempt, if any
    pub last_error: Option<String>,
    /// When the attempt started
    pub started_at: Instant,
}

impl ClaimAttempt {
    /// Start a fresh attempt in `Idle`
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: AttemptId::new(),
            phase: ClaimPhase::Idle,
            progress_percent: 0,
            fee_signature: None,
            last_error: None,
            started_at: Instant::now(),
        }
    }

    /// Move to the next phase, updating progress
    ///
    /// # Errors
    /// [`PhaseError::IllegalTransition`] when the saga would move backwards
    /// or out of a terminal phase.
    pub fn transition(&mut self, to: ClaimPhase) -> Result<(), PhaseError> {
        validate_transition(self.phase, to)?;
        self.phase = to;
        if let Some(percent) = to.progress_percent() {
            self.progress_percent = percent;
        }
        Ok(())
    }

    /// Record the broadcast fee signature
    #[inline]
    pub fn set_fee_signature(&mut self, signature: TxSignature) {
        self.fee_signature = Some(signature);
    }

    /// End the attempt in `Error`, keeping the last progress value
    pub fn fail(&mut self, message: impl Into<String>) {
        // Terminal phases stay terminal; anything else may fail
        let _ = self.transition(ClaimPhase::Error);
        self.last_error = Some(message.into());
    }
}

impl Default for ClaimAttempt {
    fn default() -> Self {
        Self::new()
    }
}
