//! Sequential bulk submission.
//!
//! Claims are split into contiguous batches of at most `batch_size`, in input
//! order. Each batch is sent only after the previous response arrived. The first
//! failing batch stops the upload: nothing is retried and later batches are not
//! sent. Batches accepted before the failure may already be stored server-side.

use crate::api::ClaimsApi;
use crate::record::CanonicalClaim;
use crate::{ClaimsError, ClaimsResult};
use std::num::NonZeroUsize;

/// Totals for a completed bulk upload.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BulkReport {
    /// Sum of the server-reported insert counts. May be below `submitted`.
    pub inserted: u64,
    pub batches: usize,
    pub submitted: usize,
}

/// Submits claims in bounded, strictly sequential batches.
pub struct BulkSubmitter<'a, A: ClaimsApi + ?Sized> {
    api: &'a A,
    batch_size: NonZeroUsize,
}

impl<'a, A: ClaimsApi + ?Sized> BulkSubmitter<'a, A> {
    pub fn new(api: &'a A, batch_size: NonZeroUsize) -> Self {
        Self { api, batch_size }
    }

    /// Number of requests `submit_all` makes for `len` claims.
    pub fn batch_count(&self, len: usize) -> usize {
        len.div_ceil(self.batch_size.get())
    }

    /// Submit every claim.
    ///
    /// # Errors
    ///
    /// Returns `ClaimsError::BulkAborted` wrapping the first batch failure, with
    /// the failing batch index and the count inserted before it.
    pub async fn submit_all(&self, claims: &[CanonicalClaim]) -> ClaimsResult<BulkReport> {
        let total_batches = self.batch_count(claims.len());
        let mut report = BulkReport::default();

        for (batch_index, batch) in claims.chunks(self.batch_size.get()).enumerate() {
            tracing::info!(
                "submitting bulk batch {}/{} ({} claims)",
                batch_index + 1,
                total_batches,
                batch.len()
            );

            match self.api.submit_bulk(batch).await {
                Ok(receipt) => {
                    report.inserted += receipt.inserted_count();
                    report.batches += 1;
                    report.submitted += batch.len();
                }
                Err(err) => {
                    tracing::warn!("bulk batch {} failed: {}", batch_index + 1, err);
                    return Err(ClaimsError::BulkAborted {
                        batch_index,
                        inserted_before_failure: report.inserted,
                        source: Box::new(err),
                    });
                }
            }
        }

        Ok(report)
    }
}
