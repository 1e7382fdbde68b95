//! Editable single-claim form state.

use crate::api::BeneficiaryRecord;
use crate::constants::{
    AMOUNT_FIELD, BENE_ID_FIELD, CLAIM_ID_FIELD, DIAGNOSIS_FIELD, DOB_FIELD, GENDER_FIELD,
};
use crate::identifier::{editable_digits, format_identifier, IdPrefix};
use crate::record::{known_fields, RawRecord};

/// In-memory form state. Every known field starts out empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClaimForm {
    fields: RawRecord,
}

impl Default for ClaimForm {
    fn default() -> Self {
        Self::new()
    }
}

impl ClaimForm {
    pub fn new() -> Self {
        Self {
            fields: known_fields().map(|f| (f, "")).collect(),
        }
    }

    pub fn get(&self, field: &str) -> &str {
        self.fields.get(field).unwrap_or_default()
    }

    pub fn set_field(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(field, value);
    }

    /// Keystroke in the claim identifier input. Returns the stored value.
    pub fn input_claim_id(&mut self, input: &str) -> &str {
        self.fields
            .insert(CLAIM_ID_FIELD, format_identifier(IdPrefix::Claim, input));
        self.get(CLAIM_ID_FIELD)
    }

    /// Keystroke in the beneficiary identifier input. Returns the stored value.
    pub fn input_bene_id(&mut self, input: &str) -> &str {
        self.fields
            .insert(BENE_ID_FIELD, format_identifier(IdPrefix::Beneficiary, input));
        self.get(BENE_ID_FIELD)
    }

    /// Digits shown in the beneficiary input, next to the fixed prefix.
    pub fn bene_id_digits(&self) -> String {
        editable_digits(IdPrefix::Beneficiary, self.get(BENE_ID_FIELD))
    }

    pub fn claim_id_digits(&self) -> String {
        editable_digits(IdPrefix::Claim, self.get(CLAIM_ID_FIELD))
    }

    /// Fill in a looked-up beneficiary.
    ///
    /// Only the fields the lookup returned are overwritten; everything else keeps
    /// its value. Coded values are written back as the text the normaliser reads
    /// (`Male`/`Female`, `Yes`/`No`).
    pub fn apply_beneficiary(&mut self, record: &BeneficiaryRecord) {
        if let Some(bene_id) = &record.bene_id {
            self.input_bene_id(bene_id);
        }
        if let Some(dob) = &record.dob {
            self.set_field(DOB_FIELD, dob.as_str());
        }
        if let Some(gender) = record.gender {
            self.set_field(GENDER_FIELD, gender.as_text());
        }
        for (condition, value) in &record.chronic_conditions {
            self.set_field(condition.field_name(), value.as_text());
        }
    }

    pub fn to_raw_record(&self) -> RawRecord {
        self.fields.clone()
    }

    /// Clear the per-claim fields after a successful submission.
    ///
    /// Dates, gender and chronic conditions stay, so the next claim for the
    /// same beneficiary starts pre-filled.
    pub fn reset_after_submit(&mut self) {
        for field in [CLAIM_ID_FIELD, BENE_ID_FIELD, AMOUNT_FIELD, DIAGNOSIS_FIELD] {
            self.fields.insert(field, "");
        }
    }
}
