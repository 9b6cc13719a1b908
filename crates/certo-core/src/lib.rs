#![deny(missing_docs)]

//! # certo-core — Foundational Types for Certo
//!
//! This crate defines the types every other crate in the workspace depends
//! on. It has no internal crate dependencies — only `serde`, `thiserror`,
//! `uuid`, `rand_core`, and `base64` from the external ecosystem.
//!
//! ## Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** Every identifier is a
//!    distinct type. You cannot pass a [`CourseId`] where a [`UserId`] is
//!    expected, and a credential can never be keyed by the wrong id.
//!
//! 2. **[`VerificationCode`] is the only public handle to a credential.**
//!    Codes carry 128 bits of OS randomness and are validated at every
//!    parse site, so the unauthenticated verification path can reject
//!    malformed input before touching any store.
//!
//! 3. **Structured errors with `thiserror`.** No `Box<dyn Error>`, no
//!    `.unwrap()` outside tests.

pub mod code;
pub mod error;
pub mod identity;

// Re-export primary types at crate root for ergonomic imports.
pub use code::VerificationCode;
pub use error::ValidationError;
pub use identity::{CourseId, CredentialId, LessonId, ModuleId, UserId};
