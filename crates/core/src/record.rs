//! Raw and canonical claim records.
//!
//! A [`RawRecord`] is what a form or a CSV row produces: field names mapped to
//! text. A [`CanonicalClaim`] is the backend-ready shape produced by
//! [`crate::normalize::normalize`]. Field names on the wire match the CSV
//! header names exactly (`ClaimID`, `ChronicCond_Diabetes`, ...).

use crate::constants::{
    ADMISSION_FIELD, AMOUNT_FIELD, BENE_ID_FIELD, CLAIM_END_FIELD, CLAIM_ID_FIELD,
    CLAIM_START_FIELD, DIAGNOSIS_FIELD, DOB_FIELD, GENDER_FIELD,
};
use claims_types::{Coerced, Gender, TriState};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde::Deserialize;
use std::collections::BTreeMap;

/// Field name to text, as entered in a form or read from a CSV row.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, serde::Serialize)]
#[serde(transparent)]
pub struct RawRecord(BTreeMap<String, String>);

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.0.insert(field.into(), value.into());
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// The eleven chronic-condition flags carried on every claim.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ChronicCondition {
    Alzheimer,
    HeartFailure,
    KidneyDisease,
    Cancer,
    ObstrPulmonary,
    Depression,
    Diabetes,
    IschemicHeart,
    Osteoporosis,
    RheumatoidArthritis,
    Stroke,
}

impl ChronicCondition {
    pub const ALL: [ChronicCondition; 11] = [
        ChronicCondition::Alzheimer,
        ChronicCondition::HeartFailure,
        ChronicCondition::KidneyDisease,
        ChronicCondition::Cancer,
        ChronicCondition::ObstrPulmonary,
        ChronicCondition::Depression,
        ChronicCondition::Diabetes,
        ChronicCondition::IschemicHeart,
        ChronicCondition::Osteoporosis,
        ChronicCondition::RheumatoidArthritis,
        ChronicCondition::Stroke,
    ];

    /// Wire and CSV field name. The spellings are the backend's, typos included.
    pub fn field_name(self) -> &'static str {
        match self {
            ChronicCondition::Alzheimer => "ChronicCond_Alzheimer",
            ChronicCondition::HeartFailure => "ChronicCond_Heartfailure",
            ChronicCondition::KidneyDisease => "ChronicCond_KidneyDisease",
            ChronicCondition::Cancer => "ChronicCond_Cancer",
            ChronicCondition::ObstrPulmonary => "ChronicCond_ObstrPulmonary",
            ChronicCondition::Depression => "ChronicCond_Depression",
            ChronicCondition::Diabetes => "ChronicCond_Diabetes",
            ChronicCondition::IschemicHeart => "ChronicCond_IschemicHeart",
            ChronicCondition::Osteoporosis => "ChronicCond_Osteoporasis",
            ChronicCondition::RheumatoidArthritis => "ChronicCond_rheumatoidarthritis",
            ChronicCondition::Stroke => "ChronicCond_stroke",
        }
    }

    pub fn from_field_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.field_name() == name)
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Every field name the normaliser treats specially, in form order.
pub fn known_fields() -> impl Iterator<Item = &'static str> {
    [
        CLAIM_ID_FIELD,
        BENE_ID_FIELD,
        DIAGNOSIS_FIELD,
        GENDER_FIELD,
        AMOUNT_FIELD,
        CLAIM_START_FIELD,
        CLAIM_END_FIELD,
        DOB_FIELD,
        ADMISSION_FIELD,
    ]
    .into_iter()
    .chain(ChronicCondition::ALL.into_iter().map(ChronicCondition::field_name))
}

/// Backend-ready claim.
///
/// Absent values serialise as `null`. Known fields are always emitted; fields the
/// normaliser does not know are carried in `other` and emitted after them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CanonicalClaim {
    pub claim_id: Option<String>,
    pub bene_id: Option<String>,
    pub diagnosis_group_code: Option<String>,
    pub gender: Option<Coerced<Gender>>,
    pub amount_reimbursed: Option<Coerced<f64>>,
    pub claim_start: Option<String>,
    pub claim_end: Option<String>,
    pub dob: Option<String>,
    pub admission: Option<String>,
    pub chronic_conditions: [TriState; 11],
    pub other: BTreeMap<String, Option<String>>,
}

impl CanonicalClaim {
    pub fn chronic(&self, condition: ChronicCondition) -> TriState {
        self.chronic_conditions[condition.index()]
    }

    pub fn set_chronic(&mut self, condition: ChronicCondition, value: TriState) {
        self.chronic_conditions[condition.index()] = value;
    }

    /// Render back to raw text.
    ///
    /// Coded values are written as text that coerces to the same code, so
    /// normalising the result reproduces `self`.
    pub fn to_raw_record(&self) -> RawRecord {
        fn text(value: &Option<String>) -> String {
            value.clone().unwrap_or_default()
        }

        let mut raw = RawRecord::new();
        raw.insert(CLAIM_ID_FIELD, text(&self.claim_id));
        raw.insert(BENE_ID_FIELD, text(&self.bene_id));
        raw.insert(DIAGNOSIS_FIELD, text(&self.diagnosis_group_code));
        raw.insert(
            GENDER_FIELD,
            match &self.gender {
                Some(Coerced::Coded(g)) => g.as_text().to_string(),
                Some(Coerced::Verbatim(s)) => s.clone(),
                None => String::new(),
            },
        );
        raw.insert(
            AMOUNT_FIELD,
            match &self.amount_reimbursed {
                Some(Coerced::Coded(n)) => n.to_string(),
                Some(Coerced::Verbatim(s)) => s.clone(),
                None => String::new(),
            },
        );
        raw.insert(CLAIM_START_FIELD, text(&self.claim_start));
        raw.insert(CLAIM_END_FIELD, text(&self.claim_end));
        raw.insert(DOB_FIELD, text(&self.dob));
        raw.insert(ADMISSION_FIELD, text(&self.admission));
        for condition in ChronicCondition::ALL {
            raw.insert(condition.field_name(), self.chronic(condition).as_text());
        }
        for (field, value) in &self.other {
            raw.insert(field.clone(), text(value));
        }
        raw
    }
}

impl Serialize for CanonicalClaim {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(9 + 11 + self.other.len()))?;
        map.serialize_entry(CLAIM_ID_FIELD, &self.claim_id)?;
        map.serialize_entry(BENE_ID_FIELD, &self.bene_id)?;
        map.serialize_entry(DIAGNOSIS_FIELD, &self.diagnosis_group_code)?;
        map.serialize_entry(GENDER_FIELD, &self.gender)?;
        map.serialize_entry(AMOUNT_FIELD, &self.amount_reimbursed)?;
        map.serialize_entry(CLAIM_START_FIELD, &self.claim_start)?;
        map.serialize_entry(CLAIM_END_FIELD, &self.claim_end)?;
        map.serialize_entry(DOB_FIELD, &self.dob)?;
        map.serialize_entry(ADMISSION_FIELD, &self.admission)?;
        for condition in ChronicCondition::ALL {
            map.serialize_entry(condition.field_name(), &self.chronic(condition))?;
        }
        for (field, value) in &self.other {
            map.serialize_entry(field, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn chronic_field_names_round_trip() {
        for condition in ChronicCondition::ALL {
            assert_eq!(
                ChronicCondition::from_field_name(condition.field_name()),
                Some(condition)
            );
        }
        assert_eq!(ChronicCondition::from_field_name("ChronicCond_Osteoporosis"), None);
    }

    #[test]
    fn serialises_absent_values_as_null() {
        let mut claim = CanonicalClaim {
            claim_id: Some("CLM1".into()),
            bene_id: Some("BENE11001".into()),
            amount_reimbursed: Some(Coerced::Coded(250.0)),
            gender: Some(Coerced::Coded(Gender::Female)),
            ..Default::default()
        };
        claim.set_chronic(ChronicCondition::Diabetes, TriState::Yes);
        claim.other.insert("Provider".into(), None);

        let value = serde_json::to_value(&claim).unwrap();
        assert_eq!(value["ClaimID"], json!("CLM1"));
        assert_eq!(value["Gender"], json!(2));
        assert_eq!(value["InscClaimAmtReimbursed"], json!(250.0));
        assert_eq!(value["ChronicCond_Diabetes"], json!(1));
        assert!(value["ChronicCond_stroke"].is_null());
        assert!(value["DOB"].is_null());
        assert!(value["Provider"].is_null());
        assert_eq!(value.as_object().unwrap().len(), 21);
    }

    #[test]
    fn raw_record_collects_pairs() {
        let raw: RawRecord = [("ClaimID", "CLM1"), ("BeneID", "")].into_iter().collect();
        assert_eq!(raw.get("ClaimID"), Some("CLM1"));
        assert_eq!(raw.get("BeneID"), Some(""));
        assert_eq!(raw.len(), 2);
    }
}
