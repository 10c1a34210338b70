//! Shared HMAC signing secret.

use crate::ClaimError;
use std::fmt;
use zeroize::Zeroizing;

/// The shared secret used to sign and verify claims.
///
/// Memory is zeroized on drop and the value never appears in `Debug` output.
#[derive(Clone)]
pub struct SigningSecret(Zeroizing<Vec<u8>>);

impl SigningSecret {
    /// Wrap raw key bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(Zeroizing::new(bytes.to_vec()))
    }

    /// Fail with `InvalidSecret` if the secret is empty.
    pub fn ensure_present(&self) -> Result<(), ClaimError> {
        if self.0.is_empty() {
            return Err(ClaimError::InvalidSecret);
        }
        Ok(())
    }

    pub(crate) fn expose(&self) -> &[u8] {
        &self.0
    }
}

impl From<&str> for SigningSecret {
    fn from(value: &str) -> Self {
        Self::from_bytes(value.as_bytes())
    }
}

impl From<String> for SigningSecret {
    fn from(value: String) -> Self {
        Self(Zeroizing::new(value.into_bytes()))
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningSecret(REDACTED)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_is_redacted() {
        let secret = SigningSecret::from("s3cr3t");
        let rendered = format!("{:?}", secret);
        assert_eq!(rendered, "SigningSecret(REDACTED)");
        assert!(!rendered.contains("s3cr3t"));
    }

    #[test]
    fn test_empty_secret_rejected() {
        let secret = SigningSecret::from("");
        assert!(matches!(
            secret.ensure_present(),
            Err(ClaimError::InvalidSecret)
        ));
    }

    #[test]
    fn test_present_secret_accepted() {
        assert!(SigningSecret::from(String::from("k")).ensure_present().is_ok());
    }
}
