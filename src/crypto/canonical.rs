//! Canonical string construction for invitation claims.
//!
//! The canonical string is the exact byte sequence that gets signed:
//! ```text
//! partner=<partner>&learner_key=<key>&salt=<salt>&date_expires=<YYYY-MM-DDTHH:MM:SS>[&field_<k>=<v>]*
//! ```
//! Extra fields follow the fixed ones, sorted by key. Values are not
//! URL-encoded.

use crate::crypto::expiry::{check_issuable, format_date_expires};
use crate::protocol::claim::InvitationClaim;
use crate::ClaimError;
use chrono::{DateTime, Utc};

/// Parameter carrying the tenant scope.
pub const PARTNER: &str = "partner";
/// Parameter carrying the learner key.
pub const LEARNER_KEY: &str = "learner_key";
/// Parameter carrying the salt.
pub const SALT: &str = "salt";
/// Parameter carrying the expiry.
pub const DATE_EXPIRES: &str = "date_expires";
/// Parameter carrying the HMAC, appended after the canonical string.
pub const SIGNATURE: &str = "signature";
/// Prefix applied to every extra field key.
pub const FIELD_PREFIX: &str = "field_";

/// Fixed parameters, in canonical order.
pub const FIXED_PARAMS: [&str; 4] = [PARTNER, LEARNER_KEY, SALT, DATE_EXPIRES];

/// Names extra fields may not use.
pub const RESERVED_NAMES: [&str; 5] = [PARTNER, LEARNER_KEY, SALT, DATE_EXPIRES, SIGNATURE];

/// Characters that may not appear in a field key.
pub const KEY_SEPARATORS: [char; 2] = ['&', '='];

/// Check the structural rules of a claim, independent of time.
///
/// # Errors
/// * `InvalidClaim` - empty partner or learner key, empty field key, a
///   field key containing a separator, or a field key that collides with a
///   reserved name
pub fn validate_structure(claim: &InvitationClaim) -> Result<(), ClaimError> {
    if claim.partner().is_empty() {
        return Err(ClaimError::InvalidClaim("partner cannot be empty".to_string()));
    }
    if claim.learner_key().is_empty() {
        return Err(ClaimError::InvalidClaim(
            "learner_key cannot be empty".to_string(),
        ));
    }
    for key in claim.fields().keys() {
        if key.is_empty() {
            return Err(ClaimError::InvalidClaim(
                "field key cannot be empty".to_string(),
            ));
        }
        // `field_a=b` + `c` and `field_a` + `b=c` would encode identically
        if key.contains(KEY_SEPARATORS) {
            return Err(ClaimError::InvalidClaim(format!(
                "field key '{}' contains '&' or '='",
                key
            )));
        }
        if RESERVED_NAMES.contains(&key.as_str()) {
            return Err(ClaimError::InvalidClaim(format!(
                "field key '{}' is reserved",
                key
            )));
        }
    }
    Ok(())
}

/// Build the canonical string without any validation.
///
/// Pure and deterministic: equal claims always produce identical bytes.
pub fn canonical_string(claim: &InvitationClaim) -> String {
    let mut out = format!(
        "{}={}&{}={}&{}={}&{}={}",
        PARTNER,
        claim.partner(),
        LEARNER_KEY,
        claim.learner_key(),
        SALT,
        claim.salt(),
        DATE_EXPIRES,
        format_date_expires(claim.expires_at()),
    );

    // BTreeMap iteration is sorted by key
    for (key, value) in claim.fields() {
        out.push('&');
        out.push_str(FIELD_PREFIX);
        out.push_str(key);
        out.push('=');
        out.push_str(value);
    }

    out
}

/// Validate a claim for issuance at `now` and build its canonical string.
///
/// # Errors
/// * `InvalidClaim` - structural violation, or `expires_at` not after `now`
pub fn encode(claim: &InvitationClaim, now: DateTime<Utc>) -> Result<String, ClaimError> {
    validate_structure(claim)?;
    check_issuable(claim.expires_at(), now)?;
    Ok(canonical_string(claim))
}
