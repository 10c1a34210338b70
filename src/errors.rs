//! Claimlink error types.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors that can occur while issuing, verifying or redeeming a claim.
#[derive(Debug, Error)]
pub enum ClaimError {
    /// Claim fields are malformed, missing, or reuse a reserved name.
    #[error("Invalid claim: {0}")]
    InvalidClaim(String),

    /// Signing secret is empty.
    #[error("Signing secret is empty")]
    InvalidSecret,

    /// Token was altered or signed with a different secret.
    #[error("Claim signature verification failed")]
    SignatureMismatch,

    /// Signature is valid but the claim is past its expiry.
    #[error("Claim expired at {expired_at}")]
    ClaimExpired {
        /// The `date_expires` carried by the claim.
        expired_at: DateTime<Utc>,
    },

    /// Claim has already been redeemed.
    #[error("Claim already redeemed")]
    ClaimReplayed,

    /// Configuration is invalid.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Redemption ledger I/O error.
    #[error("Ledger I/O error: {0}")]
    LedgerIO(String),
}

impl ClaimError {
    /// Whether this error is a security event rather than a routine failure.
    ///
    /// Covers altered or forged tokens and reuse of an already redeemed
    /// claim (a leaked or shared link). Expiry is routine: the user just
    /// needs a fresh link.
    pub fn is_security_event(&self) -> bool {
        matches!(self, ClaimError::SignatureMismatch | ClaimError::ClaimReplayed)
    }
}
