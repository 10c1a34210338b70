//! Cryptographic primitives for claim signing and verification.

pub mod canonical;
pub mod expiry;
pub mod mac;
pub mod pipeline;
pub mod token;
