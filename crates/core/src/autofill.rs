//! Beneficiary autofill.
//!
//! Each keystroke in the beneficiary input may start a lookup. Lookups are not
//! cancelled, so responses can arrive out of order. Every input bumps a
//! sequence number and a response is applied only if its ticket carries the
//! latest one; anything older is dropped.

use crate::api::{BeneficiaryLookup, BeneficiaryRecord, ClaimsApi};
use crate::config::ClaimsConfig;
use crate::form::ClaimForm;
use crate::status::{ActionStatus, TransientStatus};
use crate::ClaimsResult;
use std::time::{Duration, Instant};

/// A lookup issued for one beneficiary input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LookupTicket {
    seq: u64,
    bene_id: String,
}

impl LookupTicket {
    pub fn bene_id(&self) -> &str {
        &self.bene_id
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AutofillOutcome {
    Loaded,
    NotFound,
    Failed(String),
    /// A newer input was made after this lookup was issued.
    Stale,
}

#[derive(Debug)]
pub struct BeneficiaryAutofill {
    min_digits: usize,
    status_ttl: Duration,
    latest_seq: u64,
    snapshot: Option<BeneficiaryRecord>,
    status: Option<TransientStatus>,
}

impl BeneficiaryAutofill {
    pub fn new(min_digits: usize, status_ttl: Duration) -> Self {
        Self {
            min_digits,
            status_ttl,
            latest_seq: 0,
            snapshot: None,
            status: None,
        }
    }

    pub fn from_config(cfg: &ClaimsConfig) -> Self {
        Self::new(cfg.lookup_min_digits(), cfg.status_ttl())
    }

    /// Apply a beneficiary input to the form.
    ///
    /// Returns a ticket when the digit portion is long enough to look up. Shorter
    /// input clears the loaded beneficiary. Either way earlier tickets go stale.
    pub fn on_bene_input(&mut self, form: &mut ClaimForm, input: &str) -> Option<LookupTicket> {
        let bene_id = form.input_bene_id(input).to_string();
        self.latest_seq += 1;

        if form.bene_id_digits().len() >= self.min_digits {
            Some(LookupTicket {
                seq: self.latest_seq,
                bene_id,
            })
        } else {
            self.snapshot = None;
            None
        }
    }

    /// Apply a finished lookup.
    pub fn complete(
        &mut self,
        form: &mut ClaimForm,
        ticket: &LookupTicket,
        result: ClaimsResult<BeneficiaryLookup>,
        now: Instant,
    ) -> AutofillOutcome {
        if ticket.seq != self.latest_seq {
            tracing::debug!(
                "dropping stale beneficiary lookup {} (latest is {})",
                ticket.seq,
                self.latest_seq
            );
            return AutofillOutcome::Stale;
        }

        match result {
            Ok(BeneficiaryLookup::Found(record)) => {
                form.apply_beneficiary(&record);
                self.snapshot = Some(record);
                self.flash(ActionStatus::success("Beneficiary details loaded"), now);
                AutofillOutcome::Loaded
            }
            Ok(BeneficiaryLookup::NotFound) => {
                self.snapshot = None;
                self.flash(ActionStatus::Failure("Beneficiary not found".into()), now);
                AutofillOutcome::NotFound
            }
            Err(err) => {
                tracing::warn!("beneficiary lookup for {} failed: {}", ticket.bene_id, err);
                self.snapshot = None;
                self.flash(ActionStatus::Failure("Beneficiary lookup failed".into()), now);
                AutofillOutcome::Failed(err.to_string())
            }
        }
    }

    /// Issue and apply a lookup in one step.
    pub async fn lookup<A: ClaimsApi + ?Sized>(
        &mut self,
        api: &A,
        form: &mut ClaimForm,
        ticket: &LookupTicket,
    ) -> AutofillOutcome {
        let result = api.lookup_beneficiary(ticket.bene_id()).await;
        self.complete(form, ticket, result, Instant::now())
    }

    pub fn snapshot(&self) -> Option<&BeneficiaryRecord> {
        self.snapshot.as_ref()
    }

    /// The current status line, if it has not expired.
    pub fn status(&self, now: Instant) -> Option<&ActionStatus> {
        self.status.as_ref().and_then(|s| s.visible_at(now))
    }

    fn flash(&mut self, status: ActionStatus, now: Instant) {
        self.status = Some(TransientStatus::new(status, now, self.status_ttl));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use crate::record::ChronicCondition;
    use crate::ClaimsError;
    use claims_types::{Coerced, Gender, TriState};

    fn autofill() -> BeneficiaryAutofill {
        BeneficiaryAutofill::new(5, Duration::from_secs(2))
    }

    fn found() -> BeneficiaryLookup {
        let mut record = BeneficiaryRecord {
            bene_id: Some("BENE11001".into()),
            dob: Some("1943-01-01".into()),
            gender: Some(Gender::Female),
            ..Default::default()
        };
        record
            .chronic_conditions
            .insert(ChronicCondition::Diabetes, TriState::Yes);
        BeneficiaryLookup::Found(record)
    }

    #[test]
    fn short_input_issues_no_lookup() {
        let mut form = ClaimForm::new();
        let mut af = autofill();
        assert!(af.on_bene_input(&mut form, "1100").is_none());
        assert_eq!(form.get("BeneID"), "BENE1100");
        let ticket = af.on_bene_input(&mut form, "11001").unwrap();
        assert_eq!(ticket.bene_id(), "BENE11001");
    }

    #[test]
    fn found_record_overwrites_only_returned_fields() {
        let mut form = ClaimForm::new();
        let mut af = autofill();
        form.set_field("DiagnosisGroupCode", "D077");
        form.set_field("ChronicCond_Cancer", "No");
        let ticket = af.on_bene_input(&mut form, "11001").unwrap();

        let now = Instant::now();
        assert_eq!(af.complete(&mut form, &ticket, Ok(found()), now), AutofillOutcome::Loaded);
        assert_eq!(form.get("DOB"), "1943-01-01");
        assert_eq!(form.get("Gender"), "Female");
        assert_eq!(form.get("ChronicCond_Diabetes"), "Yes");
        assert_eq!(form.get("ChronicCond_Cancer"), "No");
        assert_eq!(form.get("DiagnosisGroupCode"), "D077");
        assert!(af.snapshot().is_some());
        assert_eq!(
            af.status(now).map(ActionStatus::message),
            Some("Beneficiary details loaded")
        );

        let claim = normalize(&form.to_raw_record());
        assert_eq!(claim.gender, Some(Coerced::Coded(Gender::Female)));
        assert_eq!(claim.chronic(ChronicCondition::Diabetes), TriState::Yes);
    }

    #[test]
    fn failure_keeps_form_and_clears_snapshot() {
        let mut form = ClaimForm::new();
        let mut af = autofill();
        let now = Instant::now();
        let first = af.on_bene_input(&mut form, "11001").unwrap();
        af.complete(&mut form, &first, Ok(found()), now);
        let before = form.clone();

        let second = af.on_bene_input(&mut form, "110019").unwrap();
        let outcome = af.complete(
            &mut form,
            &second,
            Err(ClaimsError::Transport("timeout of 10000ms exceeded".into())),
            now,
        );
        assert_eq!(outcome, AutofillOutcome::Failed("timeout of 10000ms exceeded".into()));
        assert!(af.snapshot().is_none());
        assert_eq!(form.get("DOB"), before.get("DOB"));
        assert_eq!(form.get("BeneID"), "BENE110019");
        assert!(af.status(now).is_some());
        assert!(af.status(now + Duration::from_secs(3)).is_none());
    }

    #[test]
    fn not_found_clears_snapshot() {
        let mut form = ClaimForm::new();
        let mut af = autofill();
        let now = Instant::now();
        let ticket = af.on_bene_input(&mut form, "99999").unwrap();
        assert_eq!(
            af.complete(&mut form, &ticket, Ok(BeneficiaryLookup::NotFound), now),
            AutofillOutcome::NotFound
        );
        assert!(af.snapshot().is_none());
        assert_eq!(form.get("DOB"), "");
    }

    #[test]
    fn stale_response_is_dropped() {
        let mut form = ClaimForm::new();
        let mut af = autofill();
        let now = Instant::now();
        let older = af.on_bene_input(&mut form, "11001").unwrap();
        let newer = af.on_bene_input(&mut form, "11002").unwrap();

        assert_eq!(
            af.complete(&mut form, &newer, Ok(BeneficiaryLookup::NotFound), now),
            AutofillOutcome::NotFound
        );
        // The slower, older response arrives last.
        assert_eq!(af.complete(&mut form, &older, Ok(found()), now), AutofillOutcome::Stale);
        assert_eq!(form.get("DOB"), "");
        assert_eq!(form.get("BeneID"), "BENE11002");
    }

    #[test]
    fn shortening_input_invalidates_pending_lookup() {
        let mut form = ClaimForm::new();
        let mut af = autofill();
        let ticket = af.on_bene_input(&mut form, "11001").unwrap();
        assert!(af.on_bene_input(&mut form, "1100").is_none());
        assert_eq!(
            af.complete(&mut form, &ticket, Ok(found()), Instant::now()),
            AutofillOutcome::Stale
        );
    }
}
