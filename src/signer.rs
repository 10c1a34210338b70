//! Claim Signer - the main public API for Claimlink.
//!
//! The `ClaimSigner` provides a simple interface around the pure pipeline:
//! - Signing claims and building invitation links
//! - Verifying tokens and links against the current time
//! - One-time redemption through a ledger

use crate::clock::{Clock, SystemClock};
use crate::config::ClaimConfig;
use crate::crypto::pipeline::{sign_claim, verify_claim};
use crate::entropy::{EntropySource, OsEntropy};
use crate::ledger::RedemptionLedger;
use crate::protocol::claim::{ClaimBuilder, InvitationClaim};
use crate::ClaimError;
use std::sync::Arc;
use tracing::debug;

/// Path segment the signed query string is appended under.
pub const INVITATION_PATH: &str = "/invitation-claim/?";

/// Issues and verifies signed invitation claims.
///
/// Holds no mutable state; share one instance freely across threads.
pub struct ClaimSigner {
    config: ClaimConfig,
    clock: Arc<dyn Clock>,
    entropy: Arc<dyn EntropySource>,
}

impl ClaimSigner {
    /// Create a signer with the system clock and OS entropy.
    ///
    /// # Errors
    /// Returns an error if configuration validation fails.
    pub fn new(config: ClaimConfig) -> Result<Self, ClaimError> {
        Self::with_sources(config, Arc::new(SystemClock), Arc::new(OsEntropy))
    }

    /// Create a signer with a custom clock and entropy source.
    pub fn with_sources(
        config: ClaimConfig,
        clock: Arc<dyn Clock>,
        entropy: Arc<dyn EntropySource>,
    ) -> Result<Self, ClaimError> {
        config.validate()?;
        Ok(Self {
            config,
            clock,
            entropy,
        })
    }

    /// Resolve salt and expiry defaults for a claim.
    pub fn complete(&self, draft: ClaimBuilder) -> Result<InvitationClaim, ClaimError> {
        let duration = chrono::Duration::from_std(self.config.claim_duration)
            .map_err(|e| ClaimError::ConfigError(format!("claim_duration out of range: {}", e)))?;
        draft.build(self.clock.as_ref(), self.entropy.as_ref(), duration)
    }

    /// Sign a fully specified claim.
    ///
    /// # Errors
    /// * `InvalidClaim` - the claim is malformed or not in the future
    pub fn sign(&self, claim: &InvitationClaim) -> Result<String, ClaimError> {
        sign_claim(claim, &self.config.secret, self.clock.now_utc())
    }

    /// Build `<base_url>/invitation-claim/?<signed claim>`.
    ///
    /// Salt and expiry omitted from `draft` are filled in first.
    pub fn build_link(&self, draft: ClaimBuilder) -> Result<String, ClaimError> {
        let claim = self.complete(draft)?;
        let link = build_link(&self.config.base_url, &self.sign(&claim)?);
        debug!(partner = claim.partner(), "invitation link built");
        Ok(link)
    }

    /// Verify a signed claim token at the current time.
    pub fn verify(&self, token: &str) -> Result<InvitationClaim, ClaimError> {
        verify_claim(token, &self.config.secret, self.clock.now_utc())
    }

    /// Verify a full invitation link.
    ///
    /// # Errors
    /// * `InvalidClaim` - the link has no query string
    /// * anything [`ClaimSigner::verify`] returns
    pub fn verify_link(&self, link: &str) -> Result<InvitationClaim, ClaimError> {
        let (_, token) = link
            .split_once('?')
            .ok_or_else(|| ClaimError::InvalidClaim("link has no query string".to_string()))?;
        self.verify(token)
    }

    /// Verify a token and consume it so it cannot be used again.
    ///
    /// # Errors
    /// * `ClaimReplayed` - the claim was redeemed before
    /// * anything [`ClaimSigner::verify`] returns
    pub fn redeem(
        &self,
        token: &str,
        ledger: &dyn RedemptionLedger,
    ) -> Result<InvitationClaim, ClaimError> {
        let now = self.clock.now_utc();
        let claim = verify_claim(token, &self.config.secret, now)?;
        ledger.consume(&claim, now)?;
        Ok(claim)
    }

    /// Get the current configuration.
    pub fn config(&self) -> &ClaimConfig {
        &self.config
    }
}

/// Join a base URL and a signed claim into an invitation link.
///
/// No normalization: a trailing slash on `base_url` is kept.
pub fn build_link(base_url: &str, signed_claim: &str) -> String {
    format!("{}{}{}", base_url, INVITATION_PATH, signed_claim)
}
