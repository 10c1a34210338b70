//! Signing and verification pipelines.
//!
//! Verification runs in this order:
//! 1. Split the token and rebuild the canonical string
//! 2. Verify the HMAC (constant-time)
//! 3. Interpret the parameters as a claim
//! 4. Check expiry
//!
//! Both functions are pure: the current time is passed in.

use crate::crypto::{
    canonical::{encode, SIGNATURE},
    expiry::check_not_expired,
    mac::{sign_hex, verify_hex},
    token::parse_token,
};
use crate::protocol::claim::InvitationClaim;
use crate::secret::SigningSecret;
use crate::ClaimError;
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

/// Sign a claim, producing `<canonical>&signature=<hex>`.
///
/// # Errors
/// * `InvalidSecret` - the secret is empty
/// * `InvalidClaim` - the claim is malformed or already expired at `now`
pub fn sign_claim(
    claim: &InvitationClaim,
    secret: &SigningSecret,
    now: DateTime<Utc>,
) -> Result<String, ClaimError> {
    secret.ensure_present()?;
    let canonical = encode(claim, now)?;
    let signature = sign_hex(secret, &canonical)?;

    debug!(
        partner = claim.partner(),
        fields = claim.fields().len(),
        "claim signed"
    );

    Ok(format!("{}&{}={}", canonical, SIGNATURE, signature))
}

/// Verify a signed claim and return the reconstructed claim.
///
/// # Returns
/// * `Ok(claim)` - signature valid and `now` is not past `date_expires`
/// * `Err(InvalidSecret)` - the secret is empty
/// * `Err(SignatureMismatch)` - altered token, wrong secret, or no signature
/// * `Err(InvalidClaim)` - authentic but structurally unusable token
/// * `Err(ClaimExpired)` - authentic but stale
pub fn verify_claim(
    token: &str,
    secret: &SigningSecret,
    now: DateTime<Utc>,
) -> Result<InvitationClaim, ClaimError> {
    secret.ensure_present()?;

    // 1. Fail-closed on missing signature
    let parsed = parse_token(token);
    let Some(signature) = parsed.signature else {
        warn!("claim token carries no signature");
        return Err(ClaimError::SignatureMismatch);
    };

    // 2. Verify HMAC over the rebuilt canonical string
    let canonical = parsed.canonical_string();
    if let Err(e) = verify_hex(secret, &canonical, signature) {
        if matches!(e, ClaimError::SignatureMismatch) {
            warn!("claim signature mismatch");
        }
        return Err(e);
    }

    // 3. Interpret
    let claim = parsed.to_claim()?;

    // 4. Expiry
    if let Err(e) = check_not_expired(claim.expires_at(), now) {
        info!(partner = claim.partner(), "claim expired");
        return Err(e);
    }

    Ok(claim)
}
