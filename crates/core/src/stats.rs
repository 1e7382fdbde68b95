//! Dashboard statistics.
//!
//! Response shapes for `/claims/provider-stats` and `/claims/admin-stats`, and
//! the shaping the dashboards apply before charting. Rendering is not done here.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Claim counts keyed by status (`Pending`, `Approved`, `Rejected`, ...).
pub type StatusCounts = BTreeMap<String, u64>;

/// Statuses in chart order.
pub const CHART_STATUSES: [&str; 3] = ["Pending", "Approved", "Rejected"];

const DEFAULT_STATUS: &str = "Pending";
const UNKNOWN_DIAGNOSIS: &str = "Unknown";

/// Provider dashboard figures.
///
/// Backends report counts under `statusCounts`, `typeCounts` or both; the two
/// maps are merged, with `statusCounts` winning for a status present in both.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(from = "ProviderStatsWire")]
pub struct ProviderStats {
    pub total_reimbursed: f64,
    pub avg_reimbursed: f64,
    pub status_counts: StatusCounts,
    pub recent: Vec<RecentClaim>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProviderStatsWire {
    #[serde(default)]
    total_reimbursed: f64,
    #[serde(default)]
    avg_reimbursed: f64,
    #[serde(default)]
    status_counts: Option<StatusCounts>,
    #[serde(default)]
    type_counts: Option<StatusCounts>,
    #[serde(default, deserialize_with = "lenient_vec")]
    recent: Vec<RecentClaim>,
}

impl From<ProviderStatsWire> for ProviderStats {
    fn from(wire: ProviderStatsWire) -> Self {
        let mut status_counts = wire.type_counts.unwrap_or_default();
        status_counts.extend(wire.status_counts.unwrap_or_default());
        Self {
            total_reimbursed: wire.total_reimbursed,
            avg_reimbursed: wire.avg_reimbursed,
            status_counts,
            recent: wire.recent,
        }
    }
}

impl ProviderStats {
    pub fn count(&self, status: &str) -> u64 {
        self.status_counts.get(status).copied().unwrap_or(0)
    }
}

/// One row of the provider's recent-claims table.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct RecentClaim {
    #[serde(rename = "ClaimID", default)]
    pub claim_id: Option<String>,
    #[serde(rename = "ClaimStartDt", default)]
    pub claim_start: Option<String>,
    #[serde(rename = "InscClaimAmtReimbursed", default)]
    pub amount_reimbursed: Option<Value>,
    #[serde(rename = "DiagnosisGroupCode", default)]
    pub diagnosis_group_code: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl RecentClaim {
    /// Status shown for the row; rows without one are pending.
    pub fn status_label(&self) -> &str {
        self.status
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_STATUS)
    }

    /// Reimbursed amount; numeric strings are accepted, anything else is zero.
    pub fn amount(&self) -> f64 {
        match &self.amount_reimbursed {
            Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
            Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
            _ => 0.0,
        }
    }

    /// Claim start date from either `YYYY-MM-DD` or an RFC 3339 timestamp.
    pub fn start_date(&self) -> Option<NaiveDate> {
        let raw = self.claim_start.as_deref()?.trim();
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.date_naive())
            .ok()
            .or_else(|| NaiveDate::parse_from_str(raw.get(..10)?, "%Y-%m-%d").ok())
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    #[serde(default = "empty_status_counts")]
    pub status_counts: StatusCounts,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub monthly: Vec<MonthlyClaims>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub reimb_by_diagnosis: Vec<DiagnosisAmount>,
}

impl Default for AdminStats {
    fn default() -> Self {
        Self {
            status_counts: empty_status_counts(),
            monthly: Vec::new(),
            reimb_by_diagnosis: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyClaims {
    /// `YYYY-MM`
    pub month: String,
    #[serde(default)]
    pub claims: u64,
}

impl MonthlyClaims {
    pub fn month_start(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&format!("{}-01", self.month.trim()), "%Y-%m-%d").ok()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DiagnosisAmount {
    pub diagnosis: String,
    #[serde(default)]
    pub amount: f64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StatusSlice {
    pub name: &'static str,
    pub value: u64,
}

/// Pie slices in Pending/Approved/Rejected order. Empty statuses are dropped.
pub fn status_slices(counts: &StatusCounts) -> Vec<StatusSlice> {
    CHART_STATUSES
        .into_iter()
        .map(|name| StatusSlice {
            name,
            value: counts.get(name).copied().unwrap_or(0),
        })
        .filter(|slice| slice.value > 0)
        .collect()
}

/// One bar per recent claim: diagnosis code (or `Unknown`) and amount.
pub fn reimbursement_by_diagnosis(recent: &[RecentClaim]) -> Vec<DiagnosisAmount> {
    recent
        .iter()
        .map(|claim| DiagnosisAmount {
            diagnosis: claim
                .diagnosis_group_code
                .clone()
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| UNKNOWN_DIAGNOSIS.to_string()),
            amount: claim.amount(),
        })
        .collect()
}

fn empty_status_counts() -> StatusCounts {
    CHART_STATUSES.iter().map(|s| (s.to_string(), 0)).collect()
}

/// Non-array values deserialise as an empty list.
fn lenient_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .map(|item| serde_json::from_value(item).map_err(serde::de::Error::custom))
            .collect(),
        _ => Ok(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn provider_stats_accept_type_counts_alias() {
        let stats: ProviderStats = serde_json::from_value(json!({
            "totalReimbursed": 1500,
            "avgReimbursed": 750.5,
            "typeCounts": { "Pending": 2, "Approved": 1 },
            "recent": [
                { "ClaimID": "CLM1", "ClaimStartDt": "2025-07-03T00:00:00.000Z",
                  "InscClaimAmtReimbursed": "1000.00", "DiagnosisGroupCode": "D077", "status": "Approved" },
                { "ClaimID": "CLM2", "ClaimStartDt": "2025-06-30",
                  "InscClaimAmtReimbursed": 500, "DiagnosisGroupCode": null }
            ]
        }))
        .unwrap();

        assert_eq!(stats.total_reimbursed, 1500.0);
        assert_eq!(stats.count("Pending"), 2);
        assert_eq!(stats.count("Rejected"), 0);
        assert_eq!(stats.recent[1].status_label(), "Pending");
        assert_eq!(
            stats.recent[0].start_date(),
            NaiveDate::from_ymd_opt(2025, 7, 3)
        );
        assert_eq!(
            stats.recent[1].start_date(),
            NaiveDate::from_ymd_opt(2025, 6, 30)
        );

        let bars = reimbursement_by_diagnosis(&stats.recent);
        assert_eq!(bars[0], DiagnosisAmount { diagnosis: "D077".into(), amount: 1000.0 });
        assert_eq!(bars[1], DiagnosisAmount { diagnosis: "Unknown".into(), amount: 500.0 });
    }

    #[test]
    fn provider_stats_merge_both_count_keys() {
        let stats: ProviderStats = serde_json::from_value(json!({
            "statusCounts": { "Approved": 2, "Pending": 4 },
            "typeCounts": { "Pending": 1, "Rejected": 3 },
            "recent": []
        }))
        .unwrap();

        assert_eq!(stats.count("Approved"), 2);
        assert_eq!(stats.count("Pending"), 4);
        assert_eq!(stats.count("Rejected"), 3);
    }

    #[test]
    fn slices_follow_chart_order_and_drop_zeros() {
        let counts: StatusCounts = [("Rejected", 4), ("Approved", 0), ("Pending", 1), ("Archived", 9)]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        let slices = status_slices(&counts);
        assert_eq!(
            slices,
            vec![
                StatusSlice { name: "Pending", value: 1 },
                StatusSlice { name: "Rejected", value: 4 },
            ]
        );
    }

    #[test]
    fn admin_stats_fall_back_on_missing_or_malformed_lists() {
        let stats: AdminStats = serde_json::from_value(json!({
            "monthly": "not a list",
            "reimbByDiagnosis": [{ "diagnosis": "D1", "amount": 12.5 }]
        }))
        .unwrap();
        assert!(stats.monthly.is_empty());
        assert_eq!(stats.status_counts.get("Approved"), Some(&0));
        assert_eq!(stats.reimb_by_diagnosis.len(), 1);
    }

    #[test]
    fn month_start_parses_year_month() {
        let m = MonthlyClaims { month: "2025-07".into(), claims: 12 };
        assert_eq!(m.month_start(), NaiveDate::from_ymd_opt(2025, 7, 1));
        let bad = MonthlyClaims { month: "July".into(), claims: 1 };
        assert_eq!(bad.month_start(), None);
    }
}
