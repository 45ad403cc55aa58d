//! Dashboard aggregation: pure, read-only computation over an org's full
//! lead set. Revenue figures come from `estimate_amount` on WON leads;
//! the separately-tracked `revenue` field is not part of these totals.

use shared_types::{CloseStatus, DashboardMetrics, Lead, MetricTotals, SourceCloseRate, SourceRevenue};
use std::collections::HashMap;

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn compute_metrics(leads: &[Lead]) -> DashboardMetrics {
    let won: Vec<&Lead> = leads
        .iter()
        .filter(|l| l.close_status == CloseStatus::Won)
        .collect();
    let open_count = leads
        .iter()
        .filter(|l| l.close_status == CloseStatus::Open)
        .count();
    let total_leads = leads.len();

    let mut revenue_by_source: HashMap<String, SourceRevenue> = HashMap::new();
    for lead in &won {
        let entry = revenue_by_source
            .entry(lead.source.clone())
            .or_insert(SourceRevenue {
                revenue: 0.0,
                count: 0,
            });
        entry.revenue += lead.estimate_amount.unwrap_or(0.0);
        entry.count += 1;
    }

    let mut volume_by_source: HashMap<String, usize> = HashMap::new();
    for lead in leads {
        *volume_by_source.entry(lead.source.clone()).or_insert(0) += 1;
    }

    let mut close_rate_by_source: HashMap<String, SourceCloseRate> = HashMap::new();
    for (source, total) in &volume_by_source {
        let won_count = won.iter().filter(|l| &l.source == source).count();
        let rate = if *total > 0 {
            won_count as f64 / *total as f64 * 100.0
        } else {
            0.0
        };
        close_rate_by_source.insert(
            source.clone(),
            SourceCloseRate {
                rate: round2(rate),
                won: won_count,
                total: *total,
            },
        );
    }

    let total_revenue: f64 = won.iter().map(|l| l.estimate_amount.unwrap_or(0.0)).sum();
    let win_rate = if total_leads > 0 {
        won.len() as f64 / total_leads as f64 * 100.0
    } else {
        0.0
    };
    let average_deal_size = if !won.is_empty() {
        total_revenue / won.len() as f64
    } else {
        0.0
    };

    DashboardMetrics {
        metrics: MetricTotals {
            total_revenue,
            total_leads,
            won_leads: won.len(),
            open_leads: open_count,
            win_rate: round2(win_rate),
            average_deal_size: round2(average_deal_size),
        },
        revenue_by_source,
        volume_by_source,
        close_rate_by_source,
    }
}
