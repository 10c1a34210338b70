//! Benefit grant hand-off model.
//!
//! A verified claim identifies who is being enrolled. The benefit ledger
//! service additionally needs the window the benefit covers; this struct
//! is the triple passed along to it. Transport is the caller's concern.

use crate::protocol::claim::InvitationClaim;
use crate::ClaimError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Request body for granting a benefit to a learner under a partner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantRequest {
    /// Tenant scope, copied from the claim.
    pub partner: String,

    /// Opaque learner identifier, copied from the claim.
    pub learner_key: String,

    /// Start of the benefit window.
    pub starts_at: DateTime<Utc>,

    /// End of the benefit window (exclusive).
    pub ends_at: DateTime<Utc>,
}

impl GrantRequest {
    /// Build a grant request for a verified claim.
    ///
    /// # Errors
    /// * `InvalidClaim` - `ends_at` is not after `starts_at`
    pub fn from_claim(
        claim: &InvitationClaim,
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
    ) -> Result<Self, ClaimError> {
        if ends_at <= starts_at {
            return Err(ClaimError::InvalidClaim(format!(
                "grant window ends ({}) before it starts ({})",
                ends_at, starts_at
            )));
        }

        Ok(Self {
            partner: claim.partner().to_string(),
            learner_key: claim.learner_key().to_string(),
            starts_at,
            ends_at,
        })
    }

    /// Serialize to the JSON body expected by the ledger service.
    pub fn to_json(&self) -> Result<String, ClaimError> {
        serde_json::to_string(self)
            .map_err(|e| ClaimError::InvalidClaim(format!("Failed to serialize grant: {}", e)))
    }
}
