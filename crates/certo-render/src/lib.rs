//! # certo-render — Certificate Document Rendering
//!
//! Turns a credential view into a durable, fixed-layout document: one
//! A4-landscape PDF page with a title block, the recipient's name, the
//! course title and description, the issue date, two signature-line
//! placeholders, and a footer carrying the verification code and a
//! human-readable verification URL.
//!
//! ## Determinism
//!
//! Rendering is a pure transformation: the same [`CertificateData`] and
//! [`RenderConfig`] produce byte-identical output within one renderer
//! version. The PDF is emitted directly (base-14 fonts, uncompressed
//! content stream) rather than through a layout engine, which is what
//! keeps the bytes stable.
//!
//! ## Non-authoritative output
//!
//! The document carries no cryptographic signature. Its verification
//! code checked against the credential store is the source of truth; the
//! PDF is presentation. Render failures are always retryable and never
//! touch the underlying credential.

mod certificate;
mod error;
mod pdf;

pub use certificate::{render_certificate, CertificateData, RenderConfig};
pub use error::RenderError;
