//! Claim phases
//!
//! The saga is linear: no phase ever returns to an earlier one. Retries
//! happen inside a phase (completion, status polling), never across phases.

use serde::{Deserialize, Serialize};

/// Phase of a claim attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimPhase {
    /// No attempt running
    Idle,
    /// Requesting a quote and fee transaction
    Preparing,
    /// Waiting for the user to sign the fee payment
    SigningFee,
    /// Fee payment broadcast, waiting for chain confirmation
    ConfirmingFee,
    /// Asking the backend to transfer tokens
    ProcessingClaim,
    /// Waiting for the token transfer to settle
    ConfirmingClaim,
    /// Terminal: claim fulfilled
    Success,
    /// Terminal: attempt failed
    Error,
}

impl ClaimPhase {
    /// Phases reachable from this one
    #[must_use]
    pub fn allowed_transitions(self) -> Vec<ClaimPhase> {
        use ClaimPhase::*;
        match self {
            Idle => vec![Preparing],
            Preparing => vec![SigningFee, Error],
            SigningFee => vec![ConfirmingFee, Error],
            ConfirmingFee => vec![ProcessingClaim, Error],
            ProcessingClaim => vec![ConfirmingClaim, Error],
            ConfirmingClaim => vec![Success, Error],
            Success => vec![],
            Error => vec![],
        }
    }

    /// UI progress for this phase
    ///
    /// Feedback only, not a correctness contract. `Error` carries no value
    /// of its own; the attempt keeps the last percentage it reached.
    #[must_use]
    pub fn progress_percent(self) -> Option<u8> {
        match self {
            Self::Idle => Some(0),
            Self::Preparing => Some(10),
            Self::SigningFee => Some(25),
            Self::ConfirmingFee => Some(40),
            Self::ProcessingClaim => Some(60),
            Self::ConfirmingClaim => Some(80),
            Self::Success => Some(100),
            Self::Error => None,
        }
    }

    /// Whether the attempt is over
    #[inline]
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Success | Self::Error)
    }
}

impl std::fmt::Display for ClaimPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Preparing => "preparing",
            Self::SigningFee => "signing_fee",
            Self::ConfirmingFee => "confirming_fee",
            Self::ProcessingClaim => "processing_claim",
            Self::ConfirmingClaim => "confirming_claim",
            Self::Success => "success",
            Self::Error => "error",
        };
        f.write_str(name)
    }
}

/// Phase transition violations
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PhaseError {
    /// Transition not in the allowed set
    #[error("illegal phase transition: {from} -> {to}")]
    IllegalTransition {
        /// Current phase
        from: ClaimPhase,
        /// Requested phase
        to: ClaimPhase,
    },
}

/// Validate a phase transition
///
/// # Errors
/// [`PhaseError::IllegalTransition`] when `to` is not reachable from `from`.
pub fn validate_transition(from: ClaimPhase, to: ClaimPhase) -> Result<(), PhaseError> {
    if from.allowed_transitions().contains(&to) {
        Ok(())
    } else {
        Err(PhaseError::IllegalTransition { from, to })
    }
}
