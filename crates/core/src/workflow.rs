//! The claim submission actions: single claim, CSV staging and bulk upload.
//!
//! Each action returns a `ClaimsResult`; the `*_status` helpers turn that into
//! the single status line shown to the user.

use crate::api::ClaimsApi;
use crate::bulk::{BulkReport, BulkSubmitter};
use crate::config::ClaimsConfig;
use crate::ingest::read_csv;
use crate::normalize::normalize;
use crate::record::{CanonicalClaim, RawRecord};
use crate::status::ActionStatus;
use crate::validation::{missing_required, validate_required};
use crate::{ClaimsError, ClaimsResult};
use std::io::Read;
use std::num::NonZeroUsize;

/// Line numbers listed when CSV rows are skipped or rejected.
const MAX_REPORTED_LINES: usize = 5;

/// Normalised CSV rows waiting to be uploaded.
#[derive(Clone, Debug, PartialEq)]
pub struct StagedUpload {
    pub filename: String,
    pub claims: Vec<CanonicalClaim>,
    /// CSV line numbers of rows left out for lacking an identifier.
    pub skipped_lines: Vec<u64>,
}

impl StagedUpload {
    pub fn len(&self) -> usize {
        self.claims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }

    /// `<filename> • <n> rows parsed`, followed by the skipped lines if there were any.
    pub fn summary(&self) -> String {
        let parsed = format!("{} • {} rows parsed", self.filename, self.claims.len());
        if self.skipped_lines.is_empty() {
            return parsed;
        }
        format!(
            "{parsed}, {} skipped without ClaimID/BeneID (line(s) {})",
            self.skipped_lines.len(),
            list_lines(&self.skipped_lines)
        )
    }
}

pub struct ClaimsWorkflow<A> {
    api: A,
    batch_size: NonZeroUsize,
}

impl<A: ClaimsApi> ClaimsWorkflow<A> {
    pub fn new(api: A, cfg: &ClaimsConfig) -> Self {
        Self {
            api,
            batch_size: cfg.batch_size(),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Normalise, validate and submit one claim. Returns the submitted claim identifier.
    ///
    /// # Errors
    ///
    /// `ClaimsError::Validation` before any request if an identifier is missing,
    /// otherwise whatever the transport reports.
    pub async fn submit_single(&self, raw: &RawRecord) -> ClaimsResult<String> {
        let claim = normalize(raw);
        validate_required(&claim)?;

        let receipt = self.api.submit_claim(&claim).await?;
        let claim_id = receipt
            .claim_id
            .or(claim.claim_id)
            .unwrap_or_default();
        tracing::info!("submitted claim {}", claim_id);
        Ok(claim_id)
    }

    /// Parse and normalise a CSV upload.
    ///
    /// Rows without a claim or beneficiary identifier are left out and their
    /// line numbers recorded; every other row is staged as-is and the server
    /// decides what it accepts.
    ///
    /// # Errors
    ///
    /// `ClaimsError::Parse` for malformed or empty input, `ClaimsError::InvalidRows`
    /// if no row carries both identifiers. Nothing is staged in either case.
    pub fn stage_csv<R: Read>(&self, input: R, filename: &str) -> ClaimsResult<StagedUpload> {
        let rows = read_csv(input)?;

        let mut skipped_lines = Vec::new();
        let mut claims = Vec::with_capacity(rows.len());
        for row in &rows {
            let claim = normalize(&row.record);
            if missing_required(&claim).is_empty() {
                claims.push(claim);
            } else {
                skipped_lines.push(row.line);
            }
        }

        if claims.is_empty() {
            let count = skipped_lines.len();
            skipped_lines.truncate(MAX_REPORTED_LINES);
            return Err(ClaimsError::InvalidRows {
                count,
                lines: skipped_lines,
            });
        }

        if !skipped_lines.is_empty() {
            tracing::warn!(
                "skipping {} row(s) of {} without ClaimID/BeneID",
                skipped_lines.len(),
                filename
            );
        }
        tracing::info!("staged {} claims from {}", claims.len(), filename);
        Ok(StagedUpload {
            filename: filename.to_string(),
            claims,
            skipped_lines,
        })
    }

    /// Upload staged claims in sequential batches.
    pub async fn submit_staged(&self, staged: &StagedUpload) -> ClaimsResult<BulkReport> {
        if staged.is_empty() {
            return Err(ClaimsError::Parse("No CSV rows parsed.".into()));
        }
        BulkSubmitter::new(&self.api, self.batch_size)
            .submit_all(&staged.claims)
            .await
    }
}

fn list_lines(lines: &[u64]) -> String {
    let mut listed: Vec<String> = lines
        .iter()
        .take(MAX_REPORTED_LINES)
        .map(u64::to_string)
        .collect();
    if lines.len() > MAX_REPORTED_LINES {
        listed.push("…".to_string());
    }
    listed.join(", ")
}

pub fn single_status(result: &ClaimsResult<String>) -> ActionStatus {
    match result {
        Ok(claim_id) => ActionStatus::success(format!("Submitted claim {claim_id}")),
        Err(err) => ActionStatus::failure(err),
    }
}

pub fn staged_status(result: &ClaimsResult<StagedUpload>) -> ActionStatus {
    match result {
        Ok(staged) => ActionStatus::success(staged.summary()),
        Err(err) => ActionStatus::failure(err),
    }
}

pub fn bulk_status(result: &ClaimsResult<BulkReport>) -> ActionStatus {
    match result {
        Ok(report) => ActionStatus::success(format!("Bulk inserted {} documents", report.inserted)),
        Err(err) => ActionStatus::failure(err),
    }
}
