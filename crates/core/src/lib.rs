//! # Claims Core
//!
//! Client-side claim handling for the claims backend:
//! - normalisation of raw form/CSV records into canonical claims
//! - required-field validation before anything is sent
//! - prefixed identifier formatting and beneficiary autofill
//! - sequential, bounded-size bulk submission
//! - dashboard statistics shapes and password recovery request bodies
//!
//! **No transport concerns**: HTTP lives in `claims-client`, which implements
//! [`ClaimsApi`]. Environment and flags are read by the `claims` binary.

pub mod api;
pub mod autofill;
pub mod bulk;
pub mod config;
pub mod constants;
mod error;
pub mod form;
pub mod identifier;
pub mod ingest;
pub mod normalize;
pub mod record;
pub mod recovery;
pub mod stats;
pub mod status;
pub mod validation;
pub mod workflow;

pub use api::{BeneficiaryLookup, BeneficiaryRecord, BulkReceipt, ClaimsApi, SubmitReceipt};
pub use autofill::{AutofillOutcome, BeneficiaryAutofill, LookupTicket};
pub use bulk::{BulkReport, BulkSubmitter};
pub use config::ClaimsConfig;
pub use error::{ClaimsError, ClaimsResult};
pub use form::ClaimForm;
pub use identifier::{format_identifier, IdPrefix};
pub use normalize::normalize;
pub use record::{CanonicalClaim, ChronicCondition, RawRecord};
pub use status::ActionStatus;
pub use validation::validate_required;
pub use workflow::{ClaimsWorkflow, StagedUpload};

pub use claims_types::{Coerced, Gender, NonEmptyText, TriState};
