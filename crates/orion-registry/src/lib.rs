//! orion-registry: DOI resolution and duplicate-aware registration
//!
//! The networked core of the ORION publication portal:
//! - External bibliographic resolution (Crossref wire format)
//! - Mapping of external records into the canonical schema
//! - Proactive and reactive duplicate detection against the portal
//! - The registration reconciler state machine driving it all
//!
//! Data flows strictly downward: normalizer → external resolver →
//! mapper → duplicate detector, with the reconciler as the only
//! component holding state.

pub mod config;
pub mod crossref;
pub mod error;
pub mod http;
pub mod mapper;
pub mod portal;
pub mod reconciler;

pub use config::RegistryConfig;
pub use crossref::{CrossrefClient, CrossrefWork};
pub use error::RegistryError;
pub use mapper::{map_work, MappedWork, WorkPreview};
pub use portal::{PortalClient, PublicationQuery, PublicationSummary, RegistrationOutcome};
pub use reconciler::{
    CancelHandle, ExternalSource, PortalReconciler, PublicationStore, Reconciler, ReconcilerState,
};
