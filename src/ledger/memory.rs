//! In-process redemption ledger.

use crate::ledger::{RedemptionLedger, RedemptionSet};
use crate::protocol::claim::InvitationClaim;
use crate::ClaimError;
use chrono::{DateTime, Utc};
use std::sync::Mutex;

/// Redemption ledger held in memory, shared across threads.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    set: Mutex<RedemptionSet>,
}

impl MemoryLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live entries.
    ///
    /// Reads through a poisoned lock.
    pub fn len(&self) -> usize {
        self.set
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    /// Whether the ledger holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RedemptionLedger for MemoryLedger {
    fn consume(&self, claim: &InvitationClaim, now: DateTime<Utc>) -> Result<(), ClaimError> {
        let mut set = self
            .set
            .lock()
            .map_err(|_| ClaimError::LedgerIO("ledger lock poisoned".to_string()))?;
        set.consume(claim, now)
    }
}
