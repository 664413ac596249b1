//! External bibliographic registry client (Crossref wire format)
//!
//! Envelope: `GET /works/{doi}` returns `{ "message": <work> }`;
//! `GET /works?filter=doi:{doi}` returns `{ "message": { "items": [...] } }`.
//! No authentication. Records are fetched fresh per resolution request and
//! never persisted as-is.

use crate::config::RegistryConfig;
use crate::error::RegistryError;
use crate::http::HttpClient;
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct WorksResponse {
    message: WorksMessage,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WorksMessage {
    WorkList(WorkList),
    Work(Box<CrossrefWork>),
}

#[derive(Debug, Deserialize)]
struct WorkList {
    items: Vec<CrossrefWork>,
}

/// One work as the external registry describes it
#[derive(Debug, Clone, Deserialize)]
pub struct CrossrefWork {
    #[serde(rename = "DOI")]
    pub doi: String,
    #[serde(default)]
    pub title: Vec<String>,
    #[serde(default)]
    pub author: Vec<CrossrefAuthor>,
    #[serde(rename = "container-title", default)]
    pub container_title: Vec<String>,
    pub volume: Option<String>,
    pub issue: Option<String>,
    pub page: Option<String>,
    pub publisher: Option<String>,
    #[serde(rename = "URL")]
    pub url: Option<String>,
    #[serde(rename = "type")]
    pub work_type: Option<String>,
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    #[serde(default)]
    pub subject: Vec<String>,
    #[serde(default)]
    pub funder: Vec<CrossrefFunder>,
    pub issued: Option<CrossrefDate>,
    #[serde(rename = "published-print")]
    pub published_print: Option<CrossrefDate>,
    #[serde(rename = "published-online")]
    pub published_online: Option<CrossrefDate>,
    #[serde(rename = "reference-count")]
    pub reference_count: Option<i32>,
    #[serde(rename = "is-referenced-by-count")]
    pub cited_by_count: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CrossrefAuthor {
    pub given: Option<String>,
    pub family: Option<String>,
    /// `first` or `additional`; informational only, the list order is
    /// already authoritative
    pub sequence: Option<String>,
    #[serde(default)]
    pub affiliation: Vec<CrossrefAffiliation>,
    #[serde(rename = "ORCID")]
    pub orcid: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CrossrefAffiliation {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CrossrefFunder {
    pub name: Option<String>,
    #[serde(default)]
    pub award: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CrossrefDate {
    #[serde(rename = "date-parts")]
    pub date_parts: Option<Vec<Vec<i32>>>,
}

impl CrossrefDate {
    /// Year is the first date-part; month and day may be absent
    pub fn year(&self) -> Option<i32> {
        self.date_parts
            .as_ref()
            .and_then(|dp| dp.first())
            .and_then(|parts| parts.first().copied())
    }
}

impl CrossrefWork {
    /// Earliest year across the published dates the registry supplies
    pub fn earliest_year(&self) -> Option<i32> {
        [&self.issued, &self.published_print, &self.published_online]
            .into_iter()
            .filter_map(|d| d.as_ref().and_then(CrossrefDate::year))
            .min()
    }
}

/// Parse the single-work envelope (DOI lookup)
pub fn parse_work_response(json: &str) -> Result<CrossrefWork, RegistryError> {
    let response: WorksResponse = serde_json::from_str(json)
        .map_err(|e| RegistryError::parse(format!("invalid registry JSON: {}", e)))?;

    match response.message {
        WorksMessage::Work(work) => Ok(*work),
        WorksMessage::WorkList(_) => Err(RegistryError::parse(
            "expected a single work, got a collection",
        )),
    }
}

/// Parse the collection envelope (filtered search)
pub fn parse_search_response(json: &str) -> Result<Vec<CrossrefWork>, RegistryError> {
    let response: WorksResponse = serde_json::from_str(json)
        .map_err(|e| RegistryError::parse(format!("invalid registry JSON: {}", e)))?;

    match response.message {
        WorksMessage::WorkList(list) => Ok(list.items),
        WorksMessage::Work(work) => Ok(vec![*work]),
    }
}

pub struct CrossrefClient {
    client: HttpClient,
    base_url: String,
}

impl CrossrefClient {
    pub fn new(config: &RegistryConfig) -> Self {
        Self {
            client: HttpClient::new(&config.user_agent, config.timeout()),
            base_url: config.crossref_base_url.clone(),
        }
    }

    /// Exact lookup: `GET /works/{doi}`.
    ///
    /// 200 yields a record; 404 and other 4xx yield `Ok(None)`, meaning
    /// the DOI is not resolvable rather than a system failure. 5xx and
    /// network-level failures surface as retryable transport errors.
    pub async fn fetch_by_doi(&self, doi: &str) -> Result<Option<CrossrefWork>, RegistryError> {
        let url = format!("{}/works/{}", self.base_url, urlencoding::encode(doi));
        let response = self.client.get(&url).await?;

        if response.is_server_error() {
            return Err(RegistryError::transport(format!(
                "registry returned status {}",
                response.status
            )));
        }
        if !response.is_success() {
            debug!(doi, status = response.status, "DOI not resolvable");
            return Ok(None);
        }

        parse_work_response(&response.body).map(Some)
    }

    /// Filtered search: `GET /works?filter=doi:{doi}`.
    ///
    /// The collection form of the same lookup; callers treat the first
    /// item as authoritative.
    pub async fn search_by_doi(&self, doi: &str) -> Result<Vec<CrossrefWork>, RegistryError> {
        self.search_filtered(&format!("doi:{}", doi)).await
    }

    /// Filtered search over a contributor ORCID
    pub async fn search_by_orcid(&self, orcid: &str) -> Result<Vec<CrossrefWork>, RegistryError> {
        self.search_filtered(&format!("orcid:{}", orcid)).await
    }

    async fn search_filtered(&self, filter: &str) -> Result<Vec<CrossrefWork>, RegistryError> {
        let url = format!("{}/works", self.base_url);
        let response = self
            .client
            .get_with_params(&url, &[("filter", filter)])
            .await?;

        if response.is_server_error() {
            return Err(RegistryError::transport(format!(
                "registry returned status {}",
                response.status
            )));
        }
        if !response.is_success() {
            debug!(filter, status = response.status, "empty search result");
            return Ok(Vec::new());
        }

        parse_search_response(&response.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORK_RESPONSE: &str = r#"{
        "message": {
            "DOI": "10.1038/s41586-020-2649-2",
            "title": ["Array programming with NumPy"],
            "author": [
                {"given": "Charles R.", "family": "Harris", "sequence": "first",
                 "affiliation": [{"name": "Independent Researcher"}]},
                {"given": "K. Jarrod", "family": "Millman", "sequence": "additional",
                 "ORCID": "http://orcid.org/0000-0002-5263-5070"}
            ],
            "container-title": ["Nature"],
            "volume": "585",
            "issue": "7825",
            "page": "357-362",
            "publisher": "Springer Science and Business Media LLC",
            "issued": {"date-parts": [[2020, 9, 17]]},
            "published-online": {"date-parts": [[2020, 9, 16]]},
            "reference-count": 46,
            "is-referenced-by-count": 1200
        }
    }"#;

    const SEARCH_RESPONSE: &str = r#"{
        "message": {
            "items": [{
                "DOI": "10.1234/test",
                "title": ["A Test Paper"],
                "author": [{"given": "John", "family": "Smith"}],
                "container-title": ["Test Journal"],
                "published-print": {"date-parts": [[2023, 1, 15]]}
            }]
        }
    }"#;

    #[test]
    fn test_parse_work_response() {
        let work = parse_work_response(WORK_RESPONSE).unwrap();
        assert_eq!(work.doi, "10.1038/s41586-020-2649-2");
        assert_eq!(work.title[0], "Array programming with NumPy");
        assert_eq!(work.author.len(), 2);
        assert_eq!(work.author[0].sequence.as_deref(), Some("first"));
        assert_eq!(work.volume.as_deref(), Some("585"));
        assert_eq!(work.cited_by_count, Some(1200));
    }

    #[test]
    fn test_parse_search_response() {
        let works = parse_search_response(SEARCH_RESPONSE).unwrap();
        assert_eq!(works.len(), 1);
        assert_eq!(works[0].doi, "10.1234/test");
        assert_eq!(works[0].container_title[0], "Test Journal");
    }

    #[test]
    fn test_earliest_year_prefers_earlier_date() {
        let work = parse_work_response(WORK_RESPONSE).unwrap();
        // Online date (2020-09-16) precedes the issued date within the
        // same year; the year itself is what matters here.
        assert_eq!(work.earliest_year(), Some(2020));
    }

    #[test]
    fn test_missing_optional_fields() {
        let json = r#"{"message": {"DOI": "10.1000/bare"}}"#;
        let work = parse_work_response(json).unwrap();
        assert!(work.title.is_empty());
        assert!(work.author.is_empty());
        assert_eq!(work.earliest_year(), None);
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let err = parse_work_response("{not json").unwrap_err();
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_single_work_envelope_parses_as_collection() {
        let works = parse_search_response(WORK_RESPONSE).unwrap();
        assert_eq!(works.len(), 1);
    }
}
