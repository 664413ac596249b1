//! The portal's own publication API
//!
//! Two duplicate-detection paths live here: the proactive lookup by DOI
//! that runs before any external resolution, and the reactive
//! interpretation of a conflict response from the registration endpoint.

use crate::config::RegistryConfig;
use crate::error::RegistryError;
use crate::http::HttpClient;
use orion_domain::Publication;
use orion_identifiers::{extract_doi, is_well_formed_doi};
use serde::Deserialize;
use tracing::{debug, warn};

/// Result of one registration attempt. Transport failures are `Err` on
/// the call itself; these are the server-decided outcomes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationOutcome {
    /// Accepted; the record now exists under this DOI
    Created { doi: String },
    /// The work is already registered, and the existing DOI was
    /// recoverable from the response
    Conflict { existing_doi: String, message: String },
    /// Any other rejection; the message is shown verbatim
    Rejected { message: String },
}

#[derive(Debug, Deserialize)]
struct RegisterAccepted {
    doi: String,
}

/// Conflict payloads carry a prose `error` plus, on newer servers, a
/// structured `doi` field (alongside an `exists` flag this client does
/// not need).
#[derive(Debug, Deserialize, Default)]
struct RegisterRejection {
    error: Option<String>,
    doi: Option<String>,
}

/// Summary row of the portal's publication listing
#[derive(Debug, Clone, Deserialize)]
pub struct PublicationSummary {
    pub doi: String,
    pub title: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub citations: Option<i64>,
    #[serde(default)]
    pub is_public: bool,
}

/// Filters accepted by the listing endpoint
#[derive(Debug, Clone, Default)]
pub struct PublicationQuery {
    pub query: Option<String>,
    pub year: Option<i32>,
    pub is_public: Option<bool>,
    pub sort_by: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

pub struct PortalClient {
    client: HttpClient,
    base_url: String,
}

impl PortalClient {
    pub fn new(config: &RegistryConfig) -> Self {
        Self {
            client: HttpClient::new(&config.user_agent, config.timeout()),
            base_url: config.portal_base_url.clone(),
        }
    }

    /// Proactive duplicate check: `GET /publications/{doi}/`.
    ///
    /// The DOI's slash is sent as an underscore, matching the route the
    /// portal serves record pages under; the server folds it back. 200
    /// yields the existing record; any other status is a miss. DOI
    /// equality is an opaque case-sensitive match.
    pub async fn fetch_by_doi(&self, doi: &str) -> Result<Option<Publication>, RegistryError> {
        let url = format!(
            "{}/publications/{}/",
            self.base_url,
            urlencoding::encode(&doi.replace('/', "_"))
        );
        let response = self.client.get(&url).await?;

        if response.is_server_error() {
            return Err(RegistryError::transport(format!(
                "portal returned status {}",
                response.status
            )));
        }
        if !response.is_success() {
            debug!(doi, status = response.status, "no local record");
            return Ok(None);
        }

        serde_json::from_str(&response.body)
            .map(Some)
            .map_err(|e| RegistryError::parse(format!("invalid publication payload: {}", e)))
    }

    /// Browse the portal's own registry: `GET /publications/`
    pub async fn list(
        &self,
        query: &PublicationQuery,
    ) -> Result<Vec<PublicationSummary>, RegistryError> {
        let url = format!("{}/publications/", self.base_url);

        let mut params: Vec<(&str, String)> = Vec::new();
        if let Some(q) = &query.query {
            params.push(("query", q.clone()));
        }
        if let Some(year) = query.year {
            params.push(("year", year.to_string()));
        }
        if let Some(is_public) = query.is_public {
            params.push(("is_public", is_public.to_string()));
        }
        if let Some(sort_by) = &query.sort_by {
            params.push(("sort_by", sort_by.clone()));
        }
        if let Some(page) = query.page {
            params.push(("page", page.to_string()));
        }
        if let Some(per_page) = query.per_page {
            params.push(("per_page", per_page.to_string()));
        }
        let borrowed: Vec<(&str, &str)> = params.iter().map(|(k, v)| (*k, v.as_str())).collect();

        let response = self.client.get_with_params(&url, &borrowed).await?;

        if !response.is_success() {
            return Err(RegistryError::transport(format!(
                "portal returned status {}",
                response.status
            )));
        }

        serde_json::from_str(&response.body)
            .map_err(|e| RegistryError::parse(format!("invalid listing payload: {}", e)))
    }

    /// Commit a registration: `POST /publications/register/`
    pub async fn register(
        &self,
        publication: &Publication,
    ) -> Result<RegistrationOutcome, RegistryError> {
        let url = format!("{}/publications/register/", self.base_url);
        let response = self.client.post_json(&url, publication).await?;

        if response.is_server_error() {
            return Err(RegistryError::transport(format!(
                "portal returned status {}",
                response.status
            )));
        }

        if response.is_success() {
            let doi = match serde_json::from_str::<RegisterAccepted>(&response.body) {
                Ok(accepted) => accepted.doi,
                Err(e) => {
                    warn!(error = %e, "acceptance body unreadable, keeping submitted DOI");
                    publication.doi.clone()
                }
            };
            return Ok(RegistrationOutcome::Created { doi });
        }

        Ok(interpret_rejection(&response.body))
    }
}

/// Turn a non-2xx registration body into an outcome.
///
/// The structured `doi` field is the primary contract; regex extraction
/// over the prose `error` is the compatibility fallback. A conflict with
/// no recoverable DOI degrades to a plain rejection.
fn interpret_rejection(body: &str) -> RegistrationOutcome {
    let rejection: RegisterRejection = serde_json::from_str(body).unwrap_or_default();

    let message = rejection
        .error
        .unwrap_or_else(|| "Registration failed".to_string());

    let existing_doi = rejection
        .doi
        .filter(|doi| is_well_formed_doi(doi))
        .or_else(|| extract_doi(&message));

    match existing_doi {
        Some(existing_doi) => RegistrationOutcome::Conflict {
            existing_doi,
            message,
        },
        None => RegistrationOutcome::Rejected { message },
    }
}
