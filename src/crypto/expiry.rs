//! Claim expiry enforcement.

use crate::ClaimError;
use chrono::{DateTime, NaiveDateTime, Utc};

/// Default claim lifetime (15 minutes).
pub const CLAIM_DURATION_SECONDS: i64 = 15 * 60;

/// Wire format of `date_expires`: ISO-8601, second precision, no zone (UTC).
pub const DATE_EXPIRES_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Render an expiry instant for the canonical string.
///
/// Sub-second precision is dropped.
pub fn format_date_expires(at: DateTime<Utc>) -> String {
    at.format(DATE_EXPIRES_FORMAT).to_string()
}

/// Parse a `date_expires` value.
///
/// Example: "2025-01-01T00:15:00"
pub fn parse_date_expires(value: &str) -> Result<DateTime<Utc>, ClaimError> {
    NaiveDateTime::parse_from_str(value, DATE_EXPIRES_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|e| ClaimError::InvalidClaim(format!("Invalid date_expires: {} ({})", value, e)))
}

/// Check that a claim may be issued: expiry strictly after `now`.
///
/// # Errors
/// * `InvalidClaim` - `expires_at` is at or before `now`
pub fn check_issuable(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> Result<(), ClaimError> {
    if expires_at <= now {
        return Err(ClaimError::InvalidClaim(format!(
            "date_expires {} is not in the future",
            format_date_expires(expires_at)
        )));
    }
    Ok(())
}

/// Check that a verified claim is still valid at `now`.
///
/// A claim expiring at T is accepted at exactly T.
///
/// # Errors
/// * `ClaimExpired` - `now` is after `expires_at`
pub fn check_not_expired(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> Result<(), ClaimError> {
    if now > expires_at {
        return Err(ClaimError::ClaimExpired {
            expired_at: expires_at,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 15, 0).unwrap()
    }

    #[test]
    fn test_format_truncates() {
        let at = t() + Duration::milliseconds(999);
        assert_eq!(format_date_expires(at), "2025-01-01T00:15:00");
    }

    #[test]
    fn test_parse_valid() {
        assert_eq!(parse_date_expires("2025-01-01T00:15:00").unwrap(), t());
    }

    #[test]
    fn test_parse_rejects_timezone_and_fraction() {
        assert!(matches!(
            parse_date_expires("2025-01-01T00:15:00Z"),
            Err(ClaimError::InvalidClaim(_))
        ));
        assert!(matches!(
            parse_date_expires("2025-01-01T00:15:00.5"),
            Err(ClaimError::InvalidClaim(_))
        ));
        assert!(matches!(
            parse_date_expires("not a date"),
            Err(ClaimError::InvalidClaim(_))
        ));
    }

    #[test]
    fn test_issuable_requires_future() {
        assert!(check_issuable(t(), t() - Duration::seconds(1)).is_ok());
        assert!(matches!(
            check_issuable(t(), t()),
            Err(ClaimError::InvalidClaim(_))
        ));
        assert!(matches!(
            check_issuable(t(), t() + Duration::seconds(1)),
            Err(ClaimError::InvalidClaim(_))
        ));
    }

    #[test]
    fn test_expiry_boundary() {
        assert!(check_not_expired(t(), t() - Duration::seconds(1)).is_ok());
        assert!(check_not_expired(t(), t()).is_ok());
        assert!(matches!(
            check_not_expired(t(), t() + Duration::seconds(1)),
            Err(ClaimError::ClaimExpired { .. })
        ));
    }

    #[test]
    fn test_expiry_subsecond_past() {
        let result = check_not_expired(t(), t() + Duration::milliseconds(1));
        assert!(matches!(result, Err(ClaimError::ClaimExpired { expired_at }) if expired_at == t()));
    }
}
