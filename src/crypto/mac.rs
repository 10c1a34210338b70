//! HMAC-SHA256 signing and constant-time comparison.

use crate::secret::SigningSecret;
use crate::ClaimError;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Length of a hex-encoded HMAC-SHA256 tag.
pub const SIGNATURE_HEX_LEN: usize = 64;

/// Compute `hex(HMAC-SHA256(secret, message))`, lowercase.
///
/// # Errors
/// * `InvalidSecret` - the secret is empty
pub fn sign_hex(secret: &SigningSecret, message: &str) -> Result<String, ClaimError> {
    secret.ensure_present()?;

    // HMAC accepts keys of any length; the error arm is unreachable
    let mut mac =
        HmacSha256::new_from_slice(secret.expose()).map_err(|_| ClaimError::InvalidSecret)?;
    mac.update(message.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Compare two hex signatures without short-circuiting.
///
/// Slices of different length compare unequal.
pub fn signatures_match(expected: &str, provided: &str) -> bool {
    expected.as_bytes().ct_eq(provided.as_bytes()).into()
}

/// Recompute the signature over `message` and compare it to `provided`.
///
/// # Errors
/// * `InvalidSecret` - the secret is empty
/// * `SignatureMismatch` - the signatures differ
pub fn verify_hex(
    secret: &SigningSecret,
    message: &str,
    provided: &str,
) -> Result<(), ClaimError> {
    let expected = sign_hex(secret, message)?;
    if !signatures_match(&expected, provided) {
        return Err(ClaimError::SignatureMismatch);
    }
    Ok(())
}
