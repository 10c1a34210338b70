//! Replay prevention for the verifying side.
//!
//! A signed claim stays cryptographically valid until it expires, so a
//! verifier that must honor each link once records every redeemed claim.
//! Entries are kept only until the claim's own expiry; after that the
//! claim fails verification anyway.

pub mod file;
pub mod memory;

use crate::protocol::claim::InvitationClaim;
use crate::ClaimError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use tracing::warn;

pub use file::FileLedger;
pub use memory::MemoryLedger;

/// Store of redeemed claims.
pub trait RedemptionLedger: Send + Sync {
    /// Record `claim` as redeemed.
    ///
    /// # Errors
    /// * `ClaimReplayed` - the claim was redeemed before
    /// * `LedgerIO` - the ledger could not be read or written
    fn consume(&self, claim: &InvitationClaim, now: DateTime<Utc>) -> Result<(), ClaimError>;
}

/// Compute the ledger key for a claim.
///
/// Hashes partner, learner key and salt so the ledger never stores the
/// identifiers themselves.
pub fn redemption_key(claim: &InvitationClaim) -> String {
    let mut hasher = Sha256::new();
    hasher.update(claim.partner().as_bytes());
    hasher.update([0u8]);
    hasher.update(claim.learner_key().as_bytes());
    hasher.update([0u8]);
    hasher.update(claim.salt().as_bytes());
    hex::encode(hasher.finalize())
}

/// Redeemed claim keys and the instant each stops mattering.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RedemptionSet {
    /// Ledger key to claim expiry.
    pub entries: BTreeMap<String, DateTime<Utc>>,
}

impl RedemptionSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop entries whose claims expired before `now`.
    pub fn prune(&mut self, now: DateTime<Utc>) {
        self.entries.retain(|_, expires_at| *expires_at >= now);
    }

    /// Prune, then record the claim or report a replay.
    pub fn consume(
        &mut self,
        claim: &InvitationClaim,
        now: DateTime<Utc>,
    ) -> Result<(), ClaimError> {
        self.prune(now);

        let key = redemption_key(claim);
        if self.entries.contains_key(&key) {
            warn!(partner = claim.partner(), "claim replay rejected");
            return Err(ClaimError::ClaimReplayed);
        }

        self.entries.insert(key, claim.expires_at());
        Ok(())
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
