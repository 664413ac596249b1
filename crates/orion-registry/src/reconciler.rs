//! Registration reconciliation state machine
//!
//! The one component with branching: normalize → local duplicate check →
//! external resolution → mapping → confirmation → commit → conflict
//! recovery. The local check always completes before external resolution
//! begins, so a local hit prevents any external call.
//!
//! Exactly one attempt is in flight per reconciler: the caller holds it
//! exclusively, and a [`CancelHandle`] invalidates an attempt that is
//! still suspended when the user navigates away. A late-arriving
//! response to an abandoned attempt is discarded, never applied.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use orion_domain::{
    detail_path_for, is_submittable, validate_registration, Publication, Researcher,
    ValidationIssue,
};
use orion_identifiers::{is_well_formed_doi, normalize_doi};
use tracing::{debug, warn};

use crate::config::RegistryConfig;
use crate::crossref::{CrossrefClient, CrossrefWork};
use crate::error::RegistryError;
use crate::mapper::{map_work, MappedWork};
use crate::portal::{PortalClient, RegistrationOutcome};

/// External registry operations the reconciler drives
pub trait ExternalSource {
    async fn fetch_by_doi(&self, doi: &str) -> Result<Option<CrossrefWork>, RegistryError>;
    async fn search_by_doi(&self, doi: &str) -> Result<Vec<CrossrefWork>, RegistryError>;
}

/// Local publication store operations the reconciler drives
pub trait PublicationStore {
    async fn fetch_by_doi(&self, doi: &str) -> Result<Option<Publication>, RegistryError>;
    async fn register(
        &self,
        publication: &Publication,
    ) -> Result<RegistrationOutcome, RegistryError>;
}

impl ExternalSource for CrossrefClient {
    async fn fetch_by_doi(&self, doi: &str) -> Result<Option<CrossrefWork>, RegistryError> {
        CrossrefClient::fetch_by_doi(self, doi).await
    }

    async fn search_by_doi(&self, doi: &str) -> Result<Vec<CrossrefWork>, RegistryError> {
        CrossrefClient::search_by_doi(self, doi).await
    }
}

impl PublicationStore for PortalClient {
    async fn fetch_by_doi(&self, doi: &str) -> Result<Option<Publication>, RegistryError> {
        PortalClient::fetch_by_doi(self, doi).await
    }

    async fn register(
        &self,
        publication: &Publication,
    ) -> Result<RegistrationOutcome, RegistryError> {
        PortalClient::register(self, publication).await
    }
}

/// Where one registration attempt currently stands
#[derive(Debug, Clone)]
pub enum ReconcilerState {
    Idle,
    Normalizing,
    CheckingLocal {
        doi: String,
    },
    /// Terminal for this cycle: the work is already registered here;
    /// the existing record is the navigation target
    FoundLocal {
        existing: Publication,
    },
    Resolving {
        doi: String,
    },
    /// External record mapped; confirmation dialog open. Every mapped
    /// field is read-only except email, which the registry never
    /// supplies.
    Mapped {
        mapped: MappedWork,
    },
    /// The registry has no record; manual entry with the DOI pre-filled
    NotResolvable {
        doi: String,
    },
    AwaitingConfirmation {
        form: Publication,
    },
    Committing,
    Created {
        doi: String,
        target: String,
    },
    /// The server reported a duplicate and the existing DOI was
    /// recovered; the target is that record's path, not the submitted one
    ConflictDetected {
        existing_doi: String,
        target: String,
        message: String,
    },
    Failed {
        message: String,
        retryable: bool,
    },
}

/// Invalidates the in-flight attempt of the reconciler it came from.
/// Cloneable so the UI can keep one across an await.
#[derive(Clone)]
pub struct CancelHandle {
    generation: Arc<AtomicU64>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}

pub struct Reconciler<E, S> {
    external: E,
    store: S,
    state: ReconcilerState,
    generation: Arc<AtomicU64>,
}

/// The production wiring: Crossref-format registry plus the portal API
pub type PortalReconciler = Reconciler<CrossrefClient, PortalClient>;

impl Reconciler<CrossrefClient, PortalClient> {
    pub fn from_config(config: &RegistryConfig) -> Self {
        Reconciler::new(CrossrefClient::new(config), PortalClient::new(config))
    }
}

impl<E: ExternalSource, S: PublicationStore> Reconciler<E, S> {
    pub fn new(external: E, store: S) -> Self {
        Self {
            external,
            store,
            state: ReconcilerState::Idle,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn state(&self) -> &ReconcilerState {
        &self.state
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            generation: Arc::clone(&self.generation),
        }
    }

    /// Abandon the current attempt and return to idle
    pub fn reset(&mut self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.state = ReconcilerState::Idle;
    }

    /// Run one verification cycle for a user-entered DOI.
    ///
    /// Empty input is rejected inline with no state change. A malformed
    /// DOI fails before any network call. A local hit ends the cycle
    /// without touching the external registry. Re-running after
    /// `FoundLocal` or `Created` re-checks the local store, so the same
    /// DOI always lands back on `FoundLocal`.
    pub async fn verify(&mut self, raw: &str) -> Result<ReconcilerState, RegistryError> {
        if raw.trim().is_empty() {
            return Err(RegistryError::validation(
                "DOI is required",
                vec![ValidationIssue::error("doi", "Please enter a DOI to verify")],
            ));
        }

        let generation = self.begin_attempt();

        self.state = ReconcilerState::Normalizing;
        let doi = normalize_doi(raw);
        if !is_well_formed_doi(&doi) {
            return Ok(self.fail(
                generation,
                RegistryError::MalformedDoi { input: doi },
            ));
        }

        self.state = ReconcilerState::CheckingLocal { doi: doi.clone() };
        let local = match self.store.fetch_by_doi(&doi).await {
            Ok(local) => local,
            Err(e) => return Ok(self.fail(generation, e)),
        };
        if self.is_stale(generation) {
            return Ok(self.abandon());
        }
        if let Some(existing) = local {
            debug!(doi, "already registered locally");
            self.state = ReconcilerState::FoundLocal { existing };
            return Ok(self.state.clone());
        }

        self.state = ReconcilerState::Resolving { doi: doi.clone() };
        let record = match self.resolve(&doi).await {
            Ok(record) => record,
            Err(e) => return Ok(self.fail(generation, e)),
        };
        if self.is_stale(generation) {
            return Ok(self.abandon());
        }

        self.state = match record {
            Some(work) => ReconcilerState::Mapped {
                mapped: map_work(&work),
            },
            None => ReconcilerState::NotResolvable { doi },
        };
        Ok(self.state.clone())
    }

    /// Filtered search first (its records carry the richer metadata the
    /// confirmation preview shows), exact lookup as fallback.
    async fn resolve(&self, doi: &str) -> Result<Option<CrossrefWork>, RegistryError> {
        let results = self.external.search_by_doi(doi).await?;
        if let Some(first) = results.into_iter().next() {
            return Ok(Some(first));
        }
        self.external.fetch_by_doi(doi).await
    }

    /// Accept the mapped record: apply the snapshot as a total
    /// replacement and move to confirmation
    pub fn accept_mapped(&mut self) -> Result<ReconcilerState, RegistryError> {
        match self.state.clone() {
            ReconcilerState::Mapped { mapped } => {
                self.state = ReconcilerState::AwaitingConfirmation {
                    form: mapped.into_registration(),
                };
                Ok(self.state.clone())
            }
            _ => Err(RegistryError::validation(
                "no mapped record to accept",
                Vec::new(),
            )),
        }
    }

    /// Discard the mapped record, keeping only the DOI for manual entry
    pub fn decline_mapped(&mut self) -> Result<ReconcilerState, RegistryError> {
        match &self.state {
            ReconcilerState::Mapped { mapped } => {
                let form = Publication::new(mapped.publication.doi.clone(), "");
                self.state = ReconcilerState::AwaitingConfirmation { form };
                Ok(self.state.clone())
            }
            _ => Err(RegistryError::validation(
                "no mapped record to discard",
                Vec::new(),
            )),
        }
    }

    /// Proceed to manual entry after the registry had no record
    pub fn begin_manual_entry(&mut self) -> Result<ReconcilerState, RegistryError> {
        match &self.state {
            ReconcilerState::NotResolvable { doi } => {
                let form = Publication::new(doi.clone(), "");
                self.state = ReconcilerState::AwaitingConfirmation { form };
                Ok(self.state.clone())
            }
            _ => Err(RegistryError::validation(
                "nothing to enter manually",
                Vec::new(),
            )),
        }
    }

    /// Submit the registration form, mapped-and-accepted or fully manual.
    ///
    /// Inline rejections (malformed DOI, incomplete fields) are `Err`
    /// with no transition and no network traffic. An empty researcher
    /// list is padded with a single blank entry before submission; an
    /// empty array is never sent.
    pub async fn commit(
        &mut self,
        mut form: Publication,
    ) -> Result<ReconcilerState, RegistryError> {
        form.doi = normalize_doi(&form.doi);
        if !is_well_formed_doi(&form.doi) {
            return Err(RegistryError::MalformedDoi { input: form.doi });
        }

        if form.researchers.is_empty() {
            form.researchers.push(Researcher::blank());
        }

        let issues = validate_registration(&form);
        if !is_submittable(&issues) {
            return Err(RegistryError::validation(
                "registration is incomplete",
                issues,
            ));
        }

        let generation = self.begin_attempt();

        self.state = ReconcilerState::Committing;
        let outcome = match self.store.register(&form).await {
            Ok(outcome) => outcome,
            Err(e) => return Ok(self.fail(generation, e)),
        };
        if self.is_stale(generation) {
            return Ok(self.abandon());
        }

        self.state = match outcome {
            RegistrationOutcome::Created { doi } => ReconcilerState::Created {
                target: detail_path_for(&doi),
                doi,
            },
            RegistrationOutcome::Conflict {
                existing_doi,
                message,
            } => ReconcilerState::ConflictDetected {
                target: detail_path_for(&existing_doi),
                existing_doi,
                message,
            },
            RegistrationOutcome::Rejected { message } => ReconcilerState::Failed {
                message,
                retryable: false,
            },
        };
        Ok(self.state.clone())
    }

    fn begin_attempt(&mut self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_stale(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) != generation
    }

    fn fail(&mut self, generation: u64, error: RegistryError) -> ReconcilerState {
        if self.is_stale(generation) {
            return self.abandon();
        }
        warn!(error = %error, "registration attempt failed");
        self.state = ReconcilerState::Failed {
            message: error.to_string(),
            retryable: error.is_retryable(),
        };
        self.state.clone()
    }

    fn abandon(&mut self) -> ReconcilerState {
        debug!("discarding result of an abandoned attempt");
        self.state = ReconcilerState::Idle;
        self.state.clone()
    }
}
