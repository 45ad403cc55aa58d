use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use ts_rs::TS;

/// Dashboard totals for one org. Percentages are rounded to two decimals
/// for transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct MetricTotals {
    pub total_revenue: f64,
    pub total_leads: usize,
    pub won_leads: usize,
    pub open_leads: usize,
    pub win_rate: f64,
    pub average_deal_size: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SourceRevenue {
    pub revenue: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SourceCloseRate {
    pub rate: f64,
    pub won: usize,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DashboardMetrics {
    pub metrics: MetricTotals,
    /// WON leads only, keyed by source.
    pub revenue_by_source: HashMap<String, SourceRevenue>,
    /// All leads regardless of status, keyed by source.
    pub volume_by_source: HashMap<String, usize>,
    pub close_rate_by_source: HashMap<String, SourceCloseRate>,
}
