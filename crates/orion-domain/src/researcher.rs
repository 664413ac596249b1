//! Researcher representation

use serde::{Deserialize, Serialize};

/// A contributor to a registered publication.
///
/// The portal identifies researchers positionally (the first entry on a
/// publication is the primary contact) and by ORCID where one is known.
/// `orcid_id` is stored bare (16 digits, dash-grouped), never as a URL.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Researcher {
    pub name: String,
    #[serde(default)]
    pub institution: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub orcid_id: String,
}

impl Researcher {
    /// Create a researcher with just a display name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            institution: String::new(),
            email: String::new(),
            orcid_id: String::new(),
        }
    }

    /// A blank entry for manual completion in the registration form
    pub fn blank() -> Self {
        Self::new("")
    }

    /// Builder method to add an institution
    pub fn with_institution(mut self, institution: impl Into<String>) -> Self {
        self.institution = institution.into();
        self
    }

    /// Builder method to add an email address
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    /// Builder method to add a bare ORCID
    pub fn with_orcid(mut self, orcid_id: impl Into<String>) -> Self {
        self.orcid_id = orcid_id.into();
        self
    }

    pub fn is_blank(&self) -> bool {
        self.name.is_empty()
            && self.institution.is_empty()
            && self.email.is_empty()
            && self.orcid_id.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let r = Researcher::new("Jane Doe")
            .with_institution("MIT")
            .with_orcid("0000-0002-1825-0097");
        assert_eq!(r.name, "Jane Doe");
        assert_eq!(r.institution, "MIT");
        assert_eq!(r.email, "");
        assert_eq!(r.orcid_id, "0000-0002-1825-0097");
    }

    #[test]
    fn test_blank() {
        assert!(Researcher::blank().is_blank());
        assert!(!Researcher::new("A").is_blank());
    }

    #[test]
    fn test_deserialize_defaults_missing_fields() {
        let r: Researcher = serde_json::from_str(r#"{"name": "Jane Doe"}"#).unwrap();
        assert_eq!(r.email, "");
        assert_eq!(r.orcid_id, "");
    }
}
