//! The claims backend as seen by the core.
//!
//! [`ClaimsApi`] is the seam between the core and the transport. The HTTP
//! implementation lives in the `claims-client` crate; tests use in-memory fakes.

use crate::normalize::{coerce_gender, coerce_tri_state};
use crate::record::{CanonicalClaim, ChronicCondition};
use crate::ClaimsResult;
use async_trait::async_trait;
use claims_types::{Gender, TriState};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Remote claims backend.
#[async_trait]
pub trait ClaimsApi: Send + Sync {
    /// `POST /claims/submit`
    async fn submit_claim(&self, claim: &CanonicalClaim) -> ClaimsResult<SubmitReceipt>;

    /// `POST /claims/submit-bulk` with `{items}`
    async fn submit_bulk(&self, items: &[CanonicalClaim]) -> ClaimsResult<BulkReceipt>;

    /// `GET /beneficiary/:id`
    async fn lookup_beneficiary(&self, bene_id: &str) -> ClaimsResult<BeneficiaryLookup>;
}

/// Response to a single claim submission.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct SubmitReceipt {
    #[serde(rename = "ClaimID", default)]
    pub claim_id: Option<String>,
}

/// Response to one bulk batch.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct BulkReceipt {
    #[serde(default)]
    pub inserted: Option<u64>,
}

impl BulkReceipt {
    pub fn new(inserted: u64) -> Self {
        Self {
            inserted: Some(inserted),
        }
    }

    /// Server-reported insert count; a missing count counts as zero.
    pub fn inserted_count(&self) -> u64 {
        self.inserted.unwrap_or(0)
    }
}

/// Beneficiary fields returned by a lookup. Only fields the backend returned are set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BeneficiaryRecord {
    pub bene_id: Option<String>,
    pub dob: Option<String>,
    pub gender: Option<Gender>,
    pub chronic_conditions: BTreeMap<ChronicCondition, TriState>,
}

impl BeneficiaryRecord {
    /// Read a beneficiary object. Coded values may be integers or text.
    pub fn from_json(object: &serde_json::Map<String, Value>) -> Self {
        let mut record = BeneficiaryRecord {
            bene_id: object.get("BeneID").and_then(non_empty_str),
            dob: object.get("DOB").and_then(non_empty_str),
            gender: object.get("Gender").and_then(|v| match v {
                Value::Number(n) => n.as_i64().and_then(Gender::from_code),
                Value::String(s) => coerce_gender(s.trim()).coded().copied(),
                _ => None,
            }),
            ..Default::default()
        };

        for condition in ChronicCondition::ALL {
            let value = match object.get(condition.field_name()) {
                Some(Value::Number(n)) => n.as_i64().map(TriState::from_code),
                Some(Value::String(s)) => Some(coerce_tri_state(Some(s.trim()))),
                _ => None,
            };
            if let Some(value) = value {
                record.chronic_conditions.insert(condition, value);
            }
        }

        record
    }
}

fn non_empty_str(value: &Value) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Outcome of a beneficiary lookup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BeneficiaryLookup {
    Found(BeneficiaryRecord),
    NotFound,
}

impl BeneficiaryLookup {
    /// Interpret a lookup response body.
    ///
    /// Accepts `{found, data}` envelopes and bare beneficiary objects. `null`, an
    /// empty object, `found: false` or a missing `data` all mean not found.
    pub fn from_json(body: &Value) -> Self {
        let Some(object) = body.as_object() else {
            return BeneficiaryLookup::NotFound;
        };

        match object.get("found") {
            Some(found) => match (found.as_bool(), object.get("data").and_then(Value::as_object)) {
                (Some(true), Some(data)) if !data.is_empty() => {
                    BeneficiaryLookup::Found(BeneficiaryRecord::from_json(data))
                }
                _ => BeneficiaryLookup::NotFound,
            },
            None if object.is_empty() => BeneficiaryLookup::NotFound,
            None => BeneficiaryLookup::Found(BeneficiaryRecord::from_json(object)),
        }
    }
}
