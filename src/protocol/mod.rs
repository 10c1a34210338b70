//! Claim data model and collaborator hand-off types.

pub mod claim;
pub mod grant;
