//! Constants used throughout the claims core crate.
//!
//! Field names match the backend's claim documents and the CSV header row
//! exactly, so they are kept here rather than spread across modules.

use std::time::Duration;

/// Prefix carried by every claim identifier.
pub const CLAIM_ID_PREFIX: &str = "CLM";

/// Prefix carried by every beneficiary identifier.
pub const BENE_ID_PREFIX: &str = "BENE";

pub const CLAIM_ID_FIELD: &str = "ClaimID";
pub const BENE_ID_FIELD: &str = "BeneID";
pub const GENDER_FIELD: &str = "Gender";
pub const AMOUNT_FIELD: &str = "InscClaimAmtReimbursed";
pub const DIAGNOSIS_FIELD: &str = "DiagnosisGroupCode";
pub const CLAIM_START_FIELD: &str = "ClaimStartDt";
pub const CLAIM_END_FIELD: &str = "ClaimEndDt";
pub const DOB_FIELD: &str = "DOB";
pub const ADMISSION_FIELD: &str = "AdmissionDt";

/// Date fields, in form order.
pub const DATE_FIELDS: [&str; 4] = [CLAIM_START_FIELD, CLAIM_END_FIELD, DOB_FIELD, ADMISSION_FIELD];

/// Fields that must be present before a claim is sent.
pub const REQUIRED_FIELDS: [&str; 2] = [CLAIM_ID_FIELD, BENE_ID_FIELD];

/// Default number of claims per bulk request.
pub const DEFAULT_BULK_BATCH_SIZE: usize = 1000;

/// Digits a beneficiary identifier needs before a lookup is issued.
pub const DEFAULT_LOOKUP_MIN_DIGITS: usize = 5;

/// Lifetime of transient status messages.
pub const DEFAULT_STATUS_TTL: Duration = Duration::from_secs(2);

/// Default request timeout for the HTTP transport.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Default backend base URL.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000/api";
