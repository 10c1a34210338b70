//! Signed claim token parsing.
//!
//! Parsing happens in two stages. First the token is split into raw pairs
//! and the canonical string is rebuilt from them; this stage never fails,
//! so any edit to the signed bytes surfaces as a signature mismatch. Only
//! after the signature is accepted are the pairs interpreted as a claim.

use crate::crypto::canonical::{
    validate_structure, DATE_EXPIRES, FIELD_PREFIX, FIXED_PARAMS, LEARNER_KEY, PARTNER, SALT,
    SIGNATURE,
};
use crate::crypto::expiry::parse_date_expires;
use crate::protocol::claim::InvitationClaim;
use crate::ClaimError;

/// One `key=value` segment of a token, borrowed from the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawParam<'a> {
    /// Text before the first `=`.
    pub key: &'a str,
    /// Text after the first `=`, or `None` for a bare segment.
    pub value: Option<&'a str>,
}

impl RawParam<'_> {
    fn render(&self, out: &mut String) {
        out.push_str(self.key);
        if let Some(value) = self.value {
            out.push('=');
            out.push_str(value);
        }
    }
}

/// A token split into its signature and the remaining parameters.
#[derive(Debug, Clone)]
pub struct ParsedToken<'a> {
    /// Parameters other than `signature`, in arrival order.
    pub params: Vec<RawParam<'a>>,
    /// The `signature` value, if exactly one was present.
    pub signature: Option<&'a str>,
}

/// Split a token into raw parameters.
///
/// Format: `k1=v1&k2=v2&...&signature=<hex>`. A leading `?` is ignored.
/// If `signature` appears more than once the token carries no usable
/// signature.
pub fn parse_token(token: &str) -> ParsedToken<'_> {
    let token = token.strip_prefix('?').unwrap_or(token);

    let mut params = Vec::new();
    let mut signatures = Vec::new();

    for segment in token.split('&') {
        let param = match segment.split_once('=') {
            Some((key, value)) => RawParam {
                key,
                value: Some(value),
            },
            None => RawParam {
                key: segment,
                value: None,
            },
        };

        if param.key == SIGNATURE {
            signatures.push(param.value.unwrap_or_default());
        } else {
            params.push(param);
        }
    }

    let signature = match signatures.as_slice() {
        [only] => Some(*only),
        _ => None,
    };

    ParsedToken { params, signature }
}

impl<'a> ParsedToken<'a> {
    /// Rebuild the canonical string from the parameters.
    ///
    /// Fixed parameters come first in canonical order, then everything else
    /// sorted by key. Arrival order does not matter.
    pub fn canonical_string(&self) -> String {
        let mut fixed: Vec<&RawParam<'a>> = Vec::with_capacity(FIXED_PARAMS.len());
        for name in FIXED_PARAMS {
            fixed.extend(self.params.iter().filter(|p| p.key == name));
        }

        let mut rest: Vec<&RawParam<'a>> = self
            .params
            .iter()
            .filter(|p| !FIXED_PARAMS.contains(&p.key))
            .collect();
        rest.sort_by(|a, b| a.key.cmp(b.key));

        let mut out = String::new();
        for (i, param) in fixed.into_iter().chain(rest).enumerate() {
            if i > 0 {
                out.push('&');
            }
            param.render(&mut out);
        }
        out
    }

    /// Interpret the parameters as a claim.
    ///
    /// # Errors
    /// * `InvalidClaim` - missing or duplicated fixed parameter, bare
    ///   segment, unknown parameter, bad `date_expires`, or a structural
    ///   violation of the claim itself
    pub fn to_claim(&self) -> Result<InvitationClaim, ClaimError> {
        let partner = self.required(PARTNER)?;
        let learner_key = self.required(LEARNER_KEY)?;
        let salt = self.required(SALT)?;
        let expires_at = parse_date_expires(self.required(DATE_EXPIRES)?)?;

        let mut claim = InvitationClaim::new(partner, learner_key, salt, expires_at);

        for param in &self.params {
            if FIXED_PARAMS.contains(&param.key) {
                continue;
            }
            let Some(field_key) = param.key.strip_prefix(FIELD_PREFIX) else {
                return Err(ClaimError::InvalidClaim(format!(
                    "unknown parameter '{}'",
                    param.key
                )));
            };
            let Some(value) = param.value else {
                return Err(ClaimError::InvalidClaim(format!(
                    "parameter '{}' has no value",
                    param.key
                )));
            };
            if claim.field(field_key).is_some() {
                return Err(ClaimError::InvalidClaim(format!(
                    "duplicate parameter '{}'",
                    param.key
                )));
            }
            claim = claim.with_field(field_key, value);
        }

        validate_structure(&claim)?;
        Ok(claim)
    }

    fn required(&self, name: &str) -> Result<&'a str, ClaimError> {
        let mut matches = self.params.iter().filter(|p| p.key == name);
        let first = matches
            .next()
            .ok_or_else(|| ClaimError::InvalidClaim(format!("missing parameter '{}'", name)))?;
        if matches.next().is_some() {
            return Err(ClaimError::InvalidClaim(format!(
                "duplicate parameter '{}'",
                name
            )));
        }
        first
            .value
            .ok_or_else(|| ClaimError::InvalidClaim(format!("parameter '{}' has no value", name)))
    }
}
