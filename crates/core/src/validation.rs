//! Pre-submission validation.
//!
//! Runs on normalised claims, before any network call is made.

use crate::constants::{BENE_ID_FIELD, CLAIM_ID_FIELD};
use crate::record::CanonicalClaim;
use crate::{ClaimsError, ClaimsResult};

/// Checks that both identifiers are present.
///
/// Every missing field is listed, `ClaimID` before `BeneID`. Other fields are
/// not inspected.
///
/// # Errors
///
/// Returns `ClaimsError::Validation` naming the missing fields.
pub fn validate_required(claim: &CanonicalClaim) -> ClaimsResult<()> {
    let missing = missing_required(claim);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ClaimsError::missing_fields(&missing))
    }
}

pub(crate) fn missing_required(claim: &CanonicalClaim) -> Vec<&'static str> {
    let mut missing = Vec::new();
    if claim.claim_id.is_none() {
        missing.push(CLAIM_ID_FIELD);
    }
    if claim.bene_id.is_none() {
        missing.push(BENE_ID_FIELD);
    }
    missing
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use crate::record::RawRecord;

    fn claim(pairs: &[(&str, &str)]) -> CanonicalClaim {
        normalize(&pairs.iter().copied().collect::<RawRecord>())
    }

    #[test]
    fn missing_bene_id_is_named() {
        let err = validate_required(&claim(&[("ClaimID", "CLM1")])).unwrap_err();
        assert_eq!(err.to_string(), "Missing required: BeneID");
    }

    #[test]
    fn lists_every_missing_field_in_order() {
        let err = validate_required(&claim(&[("Gender", "M")])).unwrap_err();
        match err {
            ClaimsError::Validation { missing } => {
                assert_eq!(missing, vec!["ClaimID".to_string(), "BeneID".to_string()]);
            }
            other => panic!("expected Validation error, got {other:?}"),
        }
    }

    #[test]
    fn both_identifiers_pass_regardless_of_other_fields() {
        let ok = claim(&[
            ("ClaimID", "CLM1"),
            ("BeneID", "BENE2"),
            ("InscClaimAmtReimbursed", "not a number"),
            ("Gender", "??"),
        ]);
        assert!(validate_required(&ok).is_ok());
    }

    #[test]
    fn prefix_only_identifier_counts_as_missing() {
        let err = validate_required(&claim(&[("ClaimID", "CLM"), ("BeneID", "BENE3")])).unwrap_err();
        assert_eq!(err.to_string(), "Missing required: ClaimID");
    }
}
