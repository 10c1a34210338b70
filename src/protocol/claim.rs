//! Invitation claim model and builder.

use crate::clock::Clock;
use crate::entropy::{generate_salt, EntropySource};
use crate::ClaimError;
use chrono::{DateTime, Duration, SubsecRound, Utc};
use std::collections::BTreeMap;

/// The set of fields identifying and scoping one invitation.
///
/// `expires_at` is always truncated to whole seconds. Extra fields live in
/// a `BTreeMap`, so iteration is sorted by key regardless of insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvitationClaim {
    partner: String,
    learner_key: String,
    salt: String,
    expires_at: DateTime<Utc>,
    fields: BTreeMap<String, String>,
}

impl InvitationClaim {
    /// Create a claim with no extra fields.
    pub fn new(
        partner: impl Into<String>,
        learner_key: impl Into<String>,
        salt: impl Into<String>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            partner: partner.into(),
            learner_key: learner_key.into(),
            salt: salt.into(),
            expires_at: expires_at.trunc_subsecs(0),
            fields: BTreeMap::new(),
        }
    }

    /// Start a builder that can fill in salt and expiry defaults.
    pub fn builder(partner: impl Into<String>, learner_key: impl Into<String>) -> ClaimBuilder {
        ClaimBuilder {
            partner: partner.into(),
            learner_key: learner_key.into(),
            salt: None,
            expires_at: None,
            fields: BTreeMap::new(),
        }
    }

    /// Add (or replace) an extra natural-key field.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Tenant scope.
    pub fn partner(&self) -> &str {
        &self.partner
    }

    /// Opaque per-learner identifier.
    pub fn learner_key(&self) -> &str {
        &self.learner_key
    }

    /// Single-use salt.
    pub fn salt(&self) -> &str {
        &self.salt
    }

    /// Expiry instant, whole seconds.
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Extra fields, sorted by key.
    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    /// Look up one extra field.
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }
}

/// Builder for [`InvitationClaim`] where salt and expiry may be omitted.
#[derive(Debug, Clone)]
pub struct ClaimBuilder {
    partner: String,
    learner_key: String,
    salt: Option<String>,
    expires_at: Option<DateTime<Utc>>,
    fields: BTreeMap<String, String>,
}

impl ClaimBuilder {
    /// Use an explicit salt instead of a random one.
    pub fn salt(mut self, salt: impl Into<String>) -> Self {
        self.salt = Some(salt.into());
        self
    }

    /// Use an explicit expiry instead of `now + duration`.
    pub fn expires_at(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Add (or replace) an extra natural-key field.
    pub fn field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Resolve defaults and produce the claim.
    ///
    /// A missing salt is drawn from `entropy`; a missing expiry is
    /// `clock.now_utc() + duration`.
    ///
    /// # Errors
    /// * `ConfigError` - `now + duration` is not a representable instant
    pub fn build(
        self,
        clock: &dyn Clock,
        entropy: &dyn EntropySource,
        duration: Duration,
    ) -> Result<InvitationClaim, ClaimError> {
        let expires_at = match self.expires_at {
            Some(at) => at,
            None => clock.expiry_after(duration).ok_or_else(|| {
                ClaimError::ConfigError(format!(
                    "claim duration of {}s overflows from {}",
                    duration.num_seconds(),
                    clock.now_utc()
                ))
            })?,
        };
        let salt = self.salt.unwrap_or_else(|| generate_salt(entropy));

        Ok(InvitationClaim {
            partner: self.partner,
            learner_key: self.learner_key,
            salt,
            expires_at: expires_at.trunc_subsecs(0),
            fields: self.fields,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::MockClock;
    use crate::entropy::FixedEntropy;
    use chrono::TimeZone;

    #[test]
    fn test_new_truncates_subseconds() {
        let at = Utc.with_ymd_and_hms(2025, 1, 1, 0, 15, 0).unwrap() + Duration::milliseconds(750);
        let claim = InvitationClaim::new("acme", "lk_001", "deadbeef", at);
        assert_eq!(
            claim.expires_at(),
            Utc.with_ymd_and_hms(2025, 1, 1, 0, 15, 0).unwrap()
        );
    }

    #[test]
    fn test_fields_are_sorted_regardless_of_insertion() {
        let at = Utc.with_ymd_and_hms(2025, 1, 1, 0, 15, 0).unwrap();
        let a = InvitationClaim::new("acme", "lk", "s", at)
            .with_field("zeta", "1")
            .with_field("alpha", "2");
        let b = InvitationClaim::new("acme", "lk", "s", at)
            .with_field("alpha", "2")
            .with_field("zeta", "1");

        assert_eq!(a, b);
        let keys: Vec<_> = a.fields().keys().cloned().collect();
        assert_eq!(keys, vec!["alpha", "zeta"]);
    }

    #[test]
    fn test_builder_defaults() {
        let clock = MockClock::from_rfc3339("2025-01-01T00:00:00.400Z").unwrap();
        let entropy = FixedEntropy::new(&[0xab]);

        let claim = InvitationClaim::builder("acme", "lk_001")
            .field("code", "ABC123")
            .build(&clock, &entropy, Duration::seconds(900))
            .unwrap();

        assert_eq!(claim.salt(), "ab".repeat(16));
        assert_eq!(
            claim.expires_at(),
            Utc.with_ymd_and_hms(2025, 1, 1, 0, 15, 0).unwrap()
        );
        assert_eq!(claim.field("code"), Some("ABC123"));
    }

    #[test]
    fn test_builder_explicit_values_win() {
        let clock = MockClock::from_rfc3339("2025-01-01T00:00:00Z").unwrap();
        let entropy = FixedEntropy::new(&[0xab]);
        let at = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();

        let claim = InvitationClaim::builder("acme", "lk_001")
            .salt("deadbeef")
            .expires_at(at)
            .build(&clock, &entropy, Duration::seconds(900))
            .unwrap();

        assert_eq!(claim.salt(), "deadbeef");
        assert_eq!(claim.expires_at(), at);
        assert!(claim.fields().is_empty());
    }

    #[test]
    fn test_builder_overflowing_duration() {
        let clock = MockClock::from_rfc3339("2025-01-01T00:00:00Z").unwrap();
        let entropy = FixedEntropy::new(&[0xab]);

        let result = InvitationClaim::builder("acme", "lk_001").build(
            &clock,
            &entropy,
            Duration::days(365 * 280_000),
        );
        assert!(matches!(result, Err(ClaimError::ConfigError(_))));
    }

    #[test]
    fn test_builder_explicit_expiry_ignores_duration() {
        let clock = MockClock::from_rfc3339("2025-01-01T00:00:00Z").unwrap();
        let entropy = FixedEntropy::new(&[0xab]);
        let at = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();

        let claim = InvitationClaim::builder("acme", "lk_001")
            .expires_at(at)
            .build(&clock, &entropy, Duration::days(365 * 280_000))
            .unwrap();
        assert_eq!(claim.expires_at(), at);
    }
}
