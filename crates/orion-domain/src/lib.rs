//! Domain types for the ORION publication core
//!
//! This crate provides the canonical models the portal stores and serves:
//! - Publication: a registered work keyed by DOI
//! - Researcher: contributor with name, institution, email, ORCID
//! - Validation: field-level checks applied before registration

pub mod publication;
pub mod researcher;
pub mod validation;

pub use publication::*;
pub use researcher::*;
pub use validation::*;
