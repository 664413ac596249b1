//! Identifier validation functions

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // DOI validation regex: registrant code may carry dotted sub-divisions
    static ref DOI_PATTERN: Regex = Regex::new(r"^10\.\d{4,}(?:\.\d+)*/\S+$").unwrap();

    // Bare ORCID: four dash-grouped blocks, checksum char may be X
    static ref ORCID_PATTERN: Regex = Regex::new(r"^\d{4}-\d{4}-\d{4}-\d{3}[\dX]$").unwrap();
}

/// Check a bare DOI against the well-formedness pattern.
///
/// Used as the pre-flight gate before any network call; matching is an
/// opaque case-sensitive string check.
pub fn is_well_formed_doi(doi: &str) -> bool {
    DOI_PATTERN.is_match(doi)
}

/// Normalize a user-entered DOI to its bare form.
///
/// Trims whitespace, strips known URL and scheme prefixes, and drops
/// trailing punctuation. Never fails; input that is not DOI-shaped passes
/// through unchanged so downstream validation can report it.
pub fn normalize_doi(doi: &str) -> String {
    let mut result = doi.trim().to_string();

    let prefixes = [
        "https://doi.org/",
        "http://doi.org/",
        "https://dx.doi.org/",
        "http://dx.doi.org/",
        "doi:",
        "DOI:",
    ];

    for prefix in prefixes {
        if let Some(stripped) = result.strip_prefix(prefix) {
            result = stripped.to_string();
            break;
        }
    }

    while let Some(c) = result.chars().last() {
        if c == '.' || c == ',' || c == ';' {
            result.pop();
        } else {
            break;
        }
    }

    result
}

/// Strip the registry's URL prefix from an ORCID, leaving the bare id
pub fn normalize_orcid(orcid: &str) -> String {
    let trimmed = orcid.trim();
    let prefixes = ["https://orcid.org/", "http://orcid.org/"];
    for prefix in prefixes {
        if let Some(stripped) = trimmed.strip_prefix(prefix) {
            return stripped.to_string();
        }
    }
    trimmed.to_string()
}

/// Validate a bare ORCID: shape plus ISO 7064 mod 11-2 check digit
pub fn is_valid_orcid(orcid: &str) -> bool {
    if !ORCID_PATTERN.is_match(orcid) {
        return false;
    }

    let digits: Vec<char> = orcid.chars().filter(|c| *c != '-').collect();
    let mut total: u32 = 0;
    for &c in &digits[..15] {
        total = (total + c.to_digit(10).unwrap_or(0)) * 2;
    }
    let remainder = total % 11;
    let result = (12 - remainder) % 11;
    let expected = if result == 10 {
        'X'
    } else {
        char::from_digit(result, 10).unwrap_or('0')
    };

    digits[15] == expected
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_formed_dois() {
        assert!(is_well_formed_doi("10.1038/nature12373"));
        assert!(is_well_formed_doi("10.1126/science.1234567"));
        assert!(is_well_formed_doi("10.1000/182"));
        assert!(is_well_formed_doi("10.1002.12/abc"));
    }

    #[test]
    fn test_malformed_dois() {
        assert!(!is_well_formed_doi("11.1038/nature12373")); // Wrong directory code
        assert!(!is_well_formed_doi("10.12/test")); // Registrant too short
        assert!(!is_well_formed_doi("nature12373")); // Missing 10.
        assert!(!is_well_formed_doi("10.1038/")); // Empty suffix
        assert!(!is_well_formed_doi("10.1038/na ture")); // Whitespace in suffix
    }

    #[test]
    fn test_normalize_doi_prefixes() {
        assert_eq!(
            normalize_doi("https://doi.org/10.1038/nature12373"),
            "10.1038/nature12373"
        );
        assert_eq!(
            normalize_doi("http://dx.doi.org/10.1038/nature12373"),
            "10.1038/nature12373"
        );
        assert_eq!(normalize_doi("doi:10.1038/nature12373"), "10.1038/nature12373");
        assert_eq!(
            normalize_doi("  10.1038/nature12373.  "),
            "10.1038/nature12373"
        );
    }

    #[test]
    fn test_normalize_passes_through_unparsable_input() {
        assert_eq!(normalize_doi("not-a-doi"), "not-a-doi");
        assert_eq!(normalize_doi(""), "");
    }

    #[test]
    fn test_normalize_preserves_case() {
        assert_eq!(
            normalize_doi("10.1002/(SICI)1097-4679"),
            "10.1002/(SICI)1097-4679"
        );
    }

    #[test]
    fn test_normalize_orcid() {
        assert_eq!(
            normalize_orcid("http://orcid.org/0000-0002-1825-0097"),
            "0000-0002-1825-0097"
        );
        assert_eq!(
            normalize_orcid("https://orcid.org/0000-0002-1825-0097"),
            "0000-0002-1825-0097"
        );
        assert_eq!(normalize_orcid("0000-0002-1825-0097"), "0000-0002-1825-0097");
    }

    #[test]
    fn test_valid_orcids() {
        // Reference ids from the ORCID support pages
        assert!(is_valid_orcid("0000-0002-1825-0097"));
        assert!(is_valid_orcid("0000-0001-5109-3700"));
        assert!(is_valid_orcid("0000-0002-1694-233X"));
    }

    #[test]
    fn test_invalid_orcids() {
        assert!(!is_valid_orcid("0000-0002-1825-0098")); // Bad check digit
        assert!(!is_valid_orcid("0000-0002-1825")); // Too short
        assert!(!is_valid_orcid("0000000218250097")); // Missing dashes
        assert!(!is_valid_orcid("http://orcid.org/0000-0002-1825-0097")); // Not bare
    }
}
