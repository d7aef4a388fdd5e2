//! # Aggregation
//!
//! Dashboard counters over a user's metric records. Only `ai_insight`
//! records contribute; every other metric type is ignored.
//!
//! Category ranking counts `metadata.category` over insight records and keeps
//! the three most frequent. Equal counts keep first-seen order.

use std::collections::HashMap;

use tracing::debug;

use crate::models::{DashboardSummary, Level, MetricRecord};

pub const TOP_CATEGORY_LIMIT: usize = 3;

/// Week-over-week growth is not computed from history yet and is reported as 0.
pub const WEEKLY_GROWTH: f64 = 0.0;

pub fn summarize(metrics: &[MetricRecord]) -> DashboardSummary {
    let insights: Vec<&MetricRecord> = metrics.iter().filter(|m| m.is_insight()).collect();

    let high_priority_count = insights
        .iter()
        .filter(|m| {
            m.metadata
                .as_ref()
                .is_some_and(|meta| meta.priority == Some(Level::High))
        })
        .count();

    let actionable_count = insights
        .iter()
        .filter(|m| {
            m.metadata
                .as_ref()
                .is_some_and(|meta| meta.actionable == Some(true))
        })
        .count();

    let summary = DashboardSummary {
        total_insights: insights.len(),
        high_priority_count,
        actionable_count,
        weekly_growth: WEEKLY_GROWTH,
        top_categories: top_categories(&insights, TOP_CATEGORY_LIMIT),
    };

    debug!(
        "Summarized {} metrics: {} insights, {} high priority, {} actionable",
        metrics.len(),
        summary.total_insights,
        summary.high_priority_count,
        summary.actionable_count
    );

    summary
}

/// Most frequent non-empty categories, descending by count, first-seen on ties.
fn top_categories(insights: &[&MetricRecord], limit: usize) -> Vec<String> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for category in insights
        .iter()
        .filter_map(|m| m.metadata.as_ref()?.category.as_deref())
        .filter(|c| !c.is_empty())
    {
        match index.get(category) {
            Some(&slot) => counts[slot].1 += 1,
            None => {
                index.insert(category, counts.len());
                counts.push((category, 1));
            }
        }
    }

    // Stable sort keeps first-seen order among equal counts.
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .take(limit)
        .map(|(category, _)| category.to_string())
        .collect()
}
