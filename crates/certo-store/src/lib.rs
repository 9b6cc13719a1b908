//! # certo-store — Credential Records & Store
//!
//! The durable heart of Certo: [`CredentialRecord`] is the immutable
//! record proving a learner completed a course, and [`CredentialStore`]
//! owns the two invariants that make it trustworthy:
//!
//! 1. **At most one credential per (user, course) pair, ever.** Racing
//!    issuance calls converge on a single record; losers observe the
//!    winner's record rather than an error.
//! 2. **Verification codes are globally unique and never reused.**
//!
//! Records are created exactly once, never mutated, never deleted by this
//! subsystem. There are no status transitions — revocation is out of
//! scope and deliberately unsupported.

pub mod record;
pub mod store;

pub use record::{CompletionSnapshot, CredentialRecord};
pub use store::{CredentialStore, StoreError};
