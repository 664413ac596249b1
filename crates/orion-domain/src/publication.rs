//! Publication domain model

use super::Researcher;
use serde::{Deserialize, Serialize};

/// A publication registered on the platform, keyed by DOI.
///
/// This is the wire shape of `GET /publications/{doi}/` and the body of
/// `POST /publications/register/`. Optional fields are omitted from the
/// payload when unset so the server applies its own defaults.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Publication {
    pub doi: String,
    pub title: String,
    #[serde(rename = "abstract", skip_serializing_if = "Option::is_none")]
    pub abstract_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub journal: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pages: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub is_peer_reviewed: bool,
    #[serde(default)]
    pub researchers: Vec<Researcher>,
}

impl Publication {
    /// Create a publication with the required fields
    pub fn new(doi: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            doi: doi.into(),
            title: title.into(),
            abstract_text: None,
            journal: None,
            volume: None,
            issue: None,
            pages: None,
            year: None,
            publisher: None,
            url: None,
            is_public: false,
            is_peer_reviewed: false,
            researchers: Vec::new(),
        }
    }

    /// The primary (corresponding) contact, by convention the first entry
    pub fn primary_researcher(&self) -> Option<&Researcher> {
        self.researchers.first()
    }

    /// Portal route for this record. The DOI's slash would split the URL
    /// segment, so it is replaced with an underscore.
    pub fn detail_path(&self) -> String {
        detail_path_for(&self.doi)
    }
}

/// Portal route for a record keyed by `doi`
pub fn detail_path_for(doi: &str) -> String {
    format!("/publications/{}", doi.replace('/', "_"))
}
