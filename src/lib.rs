//! # Claimlink
//!
//! **Signed, time-bounded invitation claims for enrollment links.**
//!
//! Claimlink builds a compact, URL-embeddable token that authenticates a
//! request to enroll a specific learner under a specific partner, using a
//! shared secret instead of a server round-trip.
//!
//! ## Features
//!
//! - **Canonical encoding** — fixed field order, extra fields sorted by key
//! - **HMAC-SHA256 signatures** — lowercase hex, verified in constant time
//! - **Expiry** — claims default to a 15-minute lifetime and cannot be renewed
//! - **One-time redemption** — optional ledger rejects replayed claims
//! - **Injectable time and randomness** — deterministic tests
//!
//! ## Quickstart
//!
//! ```no_run
//! use claimlink::{ClaimConfig, ClaimSigner, InvitationClaim};
//!
//! fn main() -> Result<(), claimlink::ClaimError> {
//!     let config = ClaimConfig::new("https://learn.example.com", "shared-secret");
//!     let signer = ClaimSigner::new(config)?;
//!
//!     let link = signer.build_link(
//!         InvitationClaim::builder("acme", "lk_001").field("code", "ABC123"),
//!     )?;
//!
//!     let claim = signer.verify_link(&link)?;
//!     assert_eq!(claim.partner(), "acme");
//!     Ok(())
//! }
//! ```
//!
//! ## Token Format
//!
//! ```text
//! partner=<p>&learner_key=<k>&salt=<s>&date_expires=<YYYY-MM-DDTHH:MM:SS>[&field_<key>=<value>]*&signature=<hex>
//! ```
//!
//! Values are not URL-encoded. A value containing `&` cannot be verified.
//!
//! ## Threat Model
//!
//! Claimlink protects against:
//! - **Forgery** — a party without the secret cannot produce a valid signature
//! - **Tampering** — any edit to the signed portion fails verification
//! - **Stale links** — claims are rejected after `date_expires`
//! - **Replay** — when redeemed through a [`ledger::RedemptionLedger`]
//!
//! Transport security is assumed (links travel over HTTPS).

#![deny(warnings)]
#![deny(missing_docs)]

// Core modules
pub mod clock;
pub mod config;
pub mod entropy;
pub mod errors;
pub mod secret;

// Protocol layer
pub mod protocol;

// Crypto layer
pub mod crypto;

// Replay prevention
pub mod ledger;

// Signer (main public API)
pub mod signer;

// Re-exports for public API
pub use clock::{Clock, SystemClock};
pub use config::ClaimConfig;
pub use crypto::expiry::CLAIM_DURATION_SECONDS;
pub use crypto::pipeline::{sign_claim, verify_claim};
pub use entropy::{EntropySource, OsEntropy};
pub use errors::ClaimError;
pub use ledger::{FileLedger, MemoryLedger, RedemptionLedger};
pub use protocol::claim::{ClaimBuilder, InvitationClaim};
pub use protocol::grant::GrantRequest;
pub use secret::SigningSecret;
pub use signer::ClaimSigner;

#[cfg(any(test, feature = "test-seams"))]
pub use clock::MockClock;
#[cfg(any(test, feature = "test-seams"))]
pub use entropy::FixedEntropy;
