//! Identifier handling for the ORION publication core
//!
//! This crate provides pure functions for:
//! - DOI normalization and well-formedness checks
//! - DOI extraction from free text (conflict-message recovery)
//! - ORCID normalization and checksum validation

pub mod extractors;
pub mod validators;

pub use extractors::*;
pub use validators::*;
