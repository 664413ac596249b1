//! Validation for publication registrations

use super::Publication;
use serde::{Deserialize, Serialize};

/// Severity of a validation finding
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ValidationSeverity {
    Error,
    Warning,
}

/// A field-level validation finding
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationIssue {
    pub field: String,
    pub message: String,
    pub severity: ValidationSeverity,
}

impl ValidationIssue {
    pub fn error(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
            severity: ValidationSeverity::Error,
        }
    }

    pub fn warning(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
            severity: ValidationSeverity::Warning,
        }
    }
}

/// Validate a registration and return findings.
///
/// DOI well-formedness is checked upstream before any network call; this
/// covers the field requirements the registration endpoint enforces.
pub fn validate_registration(publication: &Publication) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if publication.doi.is_empty() {
        issues.push(ValidationIssue::error("doi", "DOI is required"));
    }

    if publication.title.is_empty() {
        issues.push(ValidationIssue::error("title", "Title is required"));
    }

    if publication.researchers.is_empty() {
        issues.push(ValidationIssue::error(
            "researchers",
            "At least one researcher is required",
        ));
    }

    for (idx, researcher) in publication.researchers.iter().enumerate() {
        if researcher.name.is_empty() {
            issues.push(ValidationIssue::warning(
                "researchers",
                &format!("Researcher {} has no name", idx + 1),
            ));
        }
    }

    if let Some(year) = publication.year {
        if !(1500..=2100).contains(&year) {
            issues.push(ValidationIssue::warning(
                "year",
                "Year is outside the plausible publication range",
            ));
        }
    }

    issues
}

/// True when the findings contain no hard errors
pub fn is_submittable(issues: &[ValidationIssue]) -> bool {
    issues
        .iter()
        .all(|i| i.severity != ValidationSeverity::Error)
}
