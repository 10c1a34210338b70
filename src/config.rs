//! Claimlink configuration.

use crate::clock::{Clock, SystemClock};
use crate::crypto::expiry::CLAIM_DURATION_SECONDS;
use crate::secret::SigningSecret;
use crate::ClaimError;
use std::time::Duration;
use tracing::warn;

/// Configuration for issuing and verifying invitation claims.
#[derive(Debug, Clone)]
pub struct ClaimConfig {
    /// Base URL that links are built under, without a trailing slash
    /// (e.g., "https://learn.example.com").
    /// Not normalized: a trailing slash produces `//invitation-claim/`.
    pub base_url: String,

    /// Shared HMAC secret.
    /// SECURITY: load from a secret store; it must never be logged.
    pub secret: SigningSecret,

    /// Lifetime of claims issued without an explicit expiry.
    pub claim_duration: Duration,
}

impl ClaimConfig {
    /// Create a configuration with the default 15-minute claim lifetime.
    pub fn new(base_url: impl Into<String>, secret: impl Into<SigningSecret>) -> Self {
        Self {
            base_url: base_url.into(),
            secret: secret.into(),
            claim_duration: Duration::from_secs(CLAIM_DURATION_SECONDS as u64),
        }
    }

    /// Override the default claim lifetime.
    pub fn with_claim_duration(mut self, claim_duration: Duration) -> Self {
        self.claim_duration = claim_duration;
        self
    }

    /// Validate configuration for obvious errors.
    pub fn validate(&self) -> Result<(), ClaimError> {
        if self.base_url.is_empty() {
            return Err(ClaimError::ConfigError(
                "base_url cannot be empty".to_string(),
            ));
        }
        self.secret.ensure_present()?;
        if self.claim_duration.is_zero() {
            return Err(ClaimError::ConfigError(
                "claim_duration must be positive".to_string(),
            ));
        }
        let in_range = chrono::Duration::from_std(self.claim_duration)
            .ok()
            .and_then(|d| SystemClock.expiry_after(d))
            .is_some();
        if !in_range {
            return Err(ClaimError::ConfigError(format!(
                "claim_duration out of range: {:?}",
                self.claim_duration
            )));
        }
        if self.base_url.ends_with('/') {
            warn!(base_url = %self.base_url, "base_url has a trailing slash; links will contain '//'");
        }
        Ok(())
    }
}
