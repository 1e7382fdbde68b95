//! Raw record normalisation.
//!
//! Applies, per field:
//! - trim, then empty text becomes absent
//! - chronic conditions: substring `"Yes"` then `"No"`, anything else absent
//! - gender: substring `"M"` (covers `"Male"`) then `"F"`, otherwise kept verbatim
//! - reimbursed amount: finite number, otherwise kept verbatim
//! - identifiers: prefix plus digits, absent when there are no digits
//!
//! Matching is case-sensitive and substring based. A value such as `"Not Male"`
//! codes as male, and `"FEMALE"` codes as male because it contains `M`.
//! A flag containing both `"Yes"` and `"No"` codes as `Yes`.

use crate::constants::{
    ADMISSION_FIELD, AMOUNT_FIELD, BENE_ID_FIELD, CLAIM_END_FIELD, CLAIM_ID_FIELD,
    CLAIM_START_FIELD, DIAGNOSIS_FIELD, DOB_FIELD, GENDER_FIELD,
};
use crate::identifier::{canonical_identifier, IdPrefix};
use crate::record::{CanonicalClaim, ChronicCondition, RawRecord};
use claims_types::{Coerced, Gender, TriState};

/// Normalise a raw record into a canonical claim. Never fails.
pub fn normalize(raw: &RawRecord) -> CanonicalClaim {
    let mut claim = CanonicalClaim::default();

    for (field, value) in raw.iter() {
        let value = present(value);
        match field {
            CLAIM_ID_FIELD => {
                claim.claim_id = value.and_then(|v| canonical_identifier(IdPrefix::Claim, v))
            }
            BENE_ID_FIELD => {
                claim.bene_id = value.and_then(|v| canonical_identifier(IdPrefix::Beneficiary, v))
            }
            DIAGNOSIS_FIELD => claim.diagnosis_group_code = value.map(str::to_string),
            GENDER_FIELD => claim.gender = value.map(coerce_gender),
            AMOUNT_FIELD => claim.amount_reimbursed = value.map(coerce_amount),
            CLAIM_START_FIELD => claim.claim_start = value.map(str::to_string),
            CLAIM_END_FIELD => claim.claim_end = value.map(str::to_string),
            DOB_FIELD => claim.dob = value.map(str::to_string),
            ADMISSION_FIELD => claim.admission = value.map(str::to_string),
            other => match ChronicCondition::from_field_name(other) {
                Some(condition) => claim.set_chronic(condition, coerce_tri_state(value)),
                None => {
                    claim
                        .other
                        .insert(other.to_string(), value.map(str::to_string));
                }
            },
        }
    }

    claim
}

/// Tri-state coercion. `"Yes"` is checked first, so it wins over `"No"`.
pub fn coerce_tri_state(value: Option<&str>) -> TriState {
    match value {
        Some(v) if v.contains("Yes") => TriState::Yes,
        Some(v) if v.contains("No") => TriState::No,
        _ => TriState::Absent,
    }
}

/// Gender coercion. `"Male"` contains `M`, `"Female"` contains `F` and no `M`.
pub fn coerce_gender(value: &str) -> Coerced<Gender> {
    if value.contains("Male") || value.contains('M') {
        Coerced::Coded(Gender::Male)
    } else if value.contains("Female") || value.contains('F') {
        Coerced::Coded(Gender::Female)
    } else {
        Coerced::Verbatim(value.to_string())
    }
}

/// Amount coercion. Non-finite or unparsable values are kept as text.
pub fn coerce_amount(value: &str) -> Coerced<f64> {
    match value.parse::<f64>() {
        Ok(n) if n.is_finite() => Coerced::Coded(n),
        _ => Coerced::Verbatim(value.to_string()),
    }
}

fn present(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}
