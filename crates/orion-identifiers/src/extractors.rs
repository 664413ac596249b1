//! DOI extraction from free text
//!
//! The registration endpoint reports duplicates with the conflicting DOI
//! embedded in a prose error message. Extraction recovers it so the caller
//! can redirect to the existing record.

use crate::validators::is_well_formed_doi;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Suffix class is printable ASCII minus the quoting and angle
    // characters ("&'<>) that delimit DOIs embedded in markup or prose.
    static ref DOI_IN_TEXT: Regex = Regex::new(
        r#"(?:doi[:\s]*)?(?:https?://(?:dx\.)?doi\.org/)?(?P<doi>10\.[0-9]{4,}(?:\.[0-9]+)*/[!#-%(-;=?-~]+)"#
    )
    .unwrap();
}

/// Extract the first well-formed DOI from free text.
///
/// Returns `None` when no DOI-shaped substring survives validation, in
/// which case a conflict message degrades to a plain rejection.
pub fn extract_doi(text: &str) -> Option<String> {
    extract_dois(text).into_iter().next()
}

/// Extract every well-formed DOI from free text, in order of appearance
pub fn extract_dois(text: &str) -> Vec<String> {
    DOI_IN_TEXT
        .captures_iter(text)
        .filter_map(|cap| cap.name("doi"))
        .map(|m| clean_doi(m.as_str()))
        .filter(|doi| is_well_formed_doi(doi))
        .collect()
}

/// Drop trailing sentence punctuation the pattern may have captured
fn clean_doi(doi: &str) -> String {
    let mut s = doi.to_string();
    while let Some(c) = s.chars().last() {
        if c == '.' || c == ',' || c == ';' || c == ')' || c == ']' {
            s.pop();
        } else {
            break;
        }
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_from_conflict_message() {
        let text = "Publication already exists at 10.1021/jacs.0c01924";
        assert_eq!(extract_doi(text), Some("10.1021/jacs.0c01924".to_string()));
    }

    #[test]
    fn test_extract_stops_at_quote() {
        let text = r#"A publication with DOI "10.1038/nature12373" already exists"#;
        assert_eq!(extract_doi(text), Some("10.1038/nature12373".to_string()));
    }

    #[test]
    fn test_extract_trims_sentence_punctuation() {
        let text = "Duplicate of 10.1021/jacs.0c01924.";
        assert_eq!(extract_doi(text), Some("10.1021/jacs.0c01924".to_string()));
    }

    #[test]
    fn test_no_doi_shaped_substring() {
        assert_eq!(extract_doi("A publication with this DOI already exists"), None);
        assert_eq!(extract_doi(""), None);
    }

    #[test]
    fn test_extract_from_url_form() {
        let text = "See https://doi.org/10.1038/nature12373 instead";
        assert_eq!(extract_doi(text), Some("10.1038/nature12373".to_string()));
    }

    #[test]
    fn test_extract_multiple_in_order() {
        let text = "Conflicts: 10.1234/a then 10.5678/b";
        assert_eq!(extract_dois(text), vec!["10.1234/a", "10.5678/b"]);
    }

    #[test]
    fn test_short_registrant_rejected() {
        assert_eq!(extract_doi("Bad id 10.12/short here"), None);
    }
}
