//! External-record to canonical-schema mapping
//!
//! Pure and deterministic: identical input yields identical output, and
//! nothing here touches the network or any shared state.

use crate::crossref::{CrossrefAuthor, CrossrefWork};
use lazy_static::lazy_static;
use orion_domain::{Publication, Researcher};
use orion_identifiers::normalize_orcid;
use regex::Regex;
use serde::Serialize;

lazy_static! {
    static ref JATS_TAG: Regex = Regex::new(r"</?jats:[^>]+>").unwrap();
}

/// Display-only companion to the mapped publication: shown in the
/// confirmation dialog, never persisted on the canonical record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkPreview {
    pub abstract_text: Option<String>,
    pub subjects: Vec<String>,
    pub funders: Vec<FunderPreview>,
    pub reference_count: Option<i32>,
    pub cited_by_count: Option<i32>,
    pub work_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunderPreview {
    pub name: String,
    pub awards: Vec<String>,
}

/// Result of mapping one external record
#[derive(Debug, Clone, PartialEq)]
pub struct MappedWork {
    pub publication: Publication,
    pub preview: WorkPreview,
}

impl MappedWork {
    /// Apply the snapshot: the complete registration record, produced in
    /// one step so a partial overwrite cannot occur. Acceptance is total
    /// replacement; any previously entered field values are gone.
    pub fn into_registration(self) -> Publication {
        let mut publication = self.publication;
        publication.abstract_text = self.preview.abstract_text;
        publication
    }
}

/// Map a raw external record into the platform's canonical shape
pub fn map_work(work: &CrossrefWork) -> MappedWork {
    let title = work.title.first().cloned().unwrap_or_default();

    let researchers: Vec<Researcher> = work.author.iter().map(map_author).collect();

    let mut publication = Publication::new(work.doi.clone(), title);
    publication.journal = work.container_title.first().cloned();
    publication.volume = work.volume.clone();
    publication.issue = work.issue.clone();
    publication.pages = work.page.clone();
    publication.year = work.earliest_year();
    publication.publisher = work.publisher.clone();
    publication.url = work.url.clone();
    publication.researchers = researchers;

    let preview = WorkPreview {
        abstract_text: work.abstract_text.as_deref().map(strip_jats_markup),
        subjects: work.subject.clone(),
        funders: work
            .funder
            .iter()
            .map(|f| FunderPreview {
                name: f.name.clone().unwrap_or_default(),
                awards: f.award.clone(),
            })
            .collect(),
        reference_count: work.reference_count,
        cited_by_count: work.cited_by_count,
        work_type: work.work_type.clone(),
    };

    MappedWork {
        publication,
        preview,
    }
}

/// One external author becomes one researcher, order preserved. The
/// registry never supplies an email address; it stays empty for manual
/// entry. The `sequence` tag does not reorder anything.
fn map_author(author: &CrossrefAuthor) -> Researcher {
    let name = [author.given.as_deref(), author.family.as_deref()]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    let institution = author
        .affiliation
        .first()
        .and_then(|a| a.name.clone())
        .unwrap_or_default();

    let orcid_id = author
        .orcid
        .as_deref()
        .map(normalize_orcid)
        .unwrap_or_default();

    Researcher {
        name,
        institution,
        email: String::new(),
        orcid_id,
    }
}

/// Strip the JATS XML markup the registry embeds in abstracts
fn strip_jats_markup(text: &str) -> String {
    JATS_TAG.replace_all(text, "").trim().to_string()
}
