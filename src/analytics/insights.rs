//! # Insight Extraction
//!
//! Normalizes `ai_insight` metric records into [`Insight`]s. Output follows
//! input order. Missing or empty metadata fields fall back to:
//!
//! | field            | source                   | default        |
//! |------------------|--------------------------|----------------|
//! | id               | `metadata.insightId`     | record id      |
//! | type             | `metadata.type`          | `insight`      |
//! | title            | `metadata.title`         | `AI Insight`   |
//! | description      | `metadata.description`   | empty          |
//! | priority         | `metadata.priority`      | `medium`       |
//! | actionable       | `metadata.actionable`    | `false`        |
//! | category         | `metadata.category`      | `general`      |
//! | confidence       | record `value`           |                |
//! | source           | `metadata.source`        | `ai_analysis`  |
//! | tags             | `metadata.tags`          | `[]`           |
//! | suggestedActions | `metadata.suggestedActions` | `[]`        |
//! | estimatedImpact  | `metadata.estimatedImpact` | `medium`     |
//! | timeframe        | `metadata.timeframe`     | `short_term`   |

use crate::models::{Insight, InsightMetadata, Level, MetricRecord, Timeframe};

pub const DEFAULT_KIND: &str = "insight";
pub const DEFAULT_TITLE: &str = "AI Insight";
pub const DEFAULT_CATEGORY: &str = "general";
pub const DEFAULT_SOURCE: &str = "ai_analysis";

pub fn extract_insights(metrics: &[MetricRecord]) -> Vec<Insight> {
    metrics
        .iter()
        .filter(|m| m.is_insight())
        .map(to_insight)
        .collect()
}

fn to_insight(record: &MetricRecord) -> Insight {
    let empty = InsightMetadata::default();
    let meta = record.metadata.as_ref().unwrap_or(&empty);

    Insight {
        id: text_or(&meta.insight_id, &record.id.to_string()),
        kind: text_or(&meta.kind, DEFAULT_KIND),
        title: text_or(&meta.title, DEFAULT_TITLE),
        description: text_or(&meta.description, ""),
        priority: meta.priority.unwrap_or(Level::Medium),
        date: record.date_recorded,
        actionable: meta.actionable.unwrap_or(false),
        category: text_or(&meta.category, DEFAULT_CATEGORY),
        confidence: record.value,
        source: text_or(&meta.source, DEFAULT_SOURCE),
        tags: meta.tags.clone().unwrap_or_default(),
        suggested_actions: meta.suggested_actions.clone().unwrap_or_default(),
        estimated_impact: meta.estimated_impact.unwrap_or(Level::Medium),
        timeframe: meta.timeframe.unwrap_or(Timeframe::ShortTerm),
    }
}

fn text_or(value: &Option<String>, default: &str) -> String {
    match value.as_deref() {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => default.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn record(metric_type: &str, value: f64, metadata: Option<InsightMetadata>) -> MetricRecord {
        let date = Utc.with_ymd_and_hms(2025, 3, 14, 9, 0, 0).unwrap();
        MetricRecord {
            id: Uuid::new_v4(),
            user_id: "u1".into(),
            metric_type: metric_type.into(),
            value,
            date_recorded: date,
            product_name: None,
            price: None,
            quantity: None,
            material_cost: None,
            selling_price: None,
            metadata,
            created_at: date,
            updated_at: date,
        }
    }

    #[test]
    fn bare_record_takes_every_default() {
        let source = record("ai_insight", 0.42, None);
        let insights = extract_insights(std::slice::from_ref(&source));

        assert_eq!(insights.len(), 1);
        let insight = &insights[0];
        assert_eq!(insight.id, source.id.to_string());
        assert_eq!(insight.kind, "insight");
        assert_eq!(insight.title, "AI Insight");
        assert_eq!(insight.description, "");
        assert_eq!(insight.priority, Level::Medium);
        assert_eq!(insight.date, source.date_recorded);
        assert!(!insight.actionable);
        assert_eq!(insight.category, "general");
        assert_eq!(insight.confidence, 0.42);
        assert_eq!(insight.source, "ai_analysis");
        assert!(insight.tags.is_empty());
        assert!(insight.suggested_actions.is_empty());
        assert_eq!(insight.estimated_impact, Level::Medium);
        assert_eq!(insight.timeframe, Timeframe::ShortTerm);
    }

    #[test]
    fn metadata_overrides_defaults() {
        let source = record(
            "ai_insight",
            0.9,
            Some(InsightMetadata {
                insight_id: Some("ins-7".into()),
                kind: Some("trend".into()),
                title: Some("Weekend sales spike".into()),
                description: Some("Saturday revenue doubled".into()),
                priority: Some(Level::High),
                actionable: Some(true),
                category: Some("sales".into()),
                source: Some("forecaster".into()),
                tags: Some(vec!["weekend".into()]),
                suggested_actions: Some(vec!["Staff up on Saturdays".into()]),
                estimated_impact: Some(Level::Low),
                timeframe: Some(Timeframe::Immediate),
            }),
        );

        let insight = &extract_insights(&[source])[0];
        assert_eq!(insight.id, "ins-7");
        assert_eq!(insight.kind, "trend");
        assert_eq!(insight.title, "Weekend sales spike");
        assert_eq!(insight.description, "Saturday revenue doubled");
        assert_eq!(insight.priority, Level::High);
        assert!(insight.actionable);
        assert_eq!(insight.category, "sales");
        assert_eq!(insight.source, "forecaster");
        assert_eq!(insight.tags, vec!["weekend"]);
        assert_eq!(insight.suggested_actions, vec!["Staff up on Saturdays"]);
        assert_eq!(insight.estimated_impact, Level::Low);
        assert_eq!(insight.timeframe, Timeframe::Immediate);
    }

    #[test]
    fn empty_strings_fall_back() {
        let source = record(
            "ai_insight",
            0.5,
            Some(InsightMetadata {
                title: Some(String::new()),
                category: Some(String::new()),
                ..Default::default()
            }),
        );
        let insight = &extract_insights(&[source])[0];
        assert_eq!(insight.title, "AI Insight");
        assert_eq!(insight.category, "general");
    }

    #[test]
    fn skips_other_metrics_and_keeps_order() {
        let metrics = vec![
            record("ai_insight", 0.1, None),
            record("revenue", 500.0, None),
            record("ai_insight", 0.2, None),
            record("ai_insight", 0.3, None),
        ];
        let confidences: Vec<f64> = extract_insights(&metrics)
            .iter()
            .map(|i| i.confidence)
            .collect();
        assert_eq!(confidences, vec![0.1, 0.2, 0.3]);
    }

    #[test]
    fn serializes_with_client_field_names() {
        let insight = &extract_insights(&[record("ai_insight", 0.5, None)])[0];
        let body = serde_json::to_value(insight).unwrap();
        assert_eq!(body["type"], "insight");
        assert_eq!(body["timeframe"], "short_term");
        assert_eq!(body["estimatedImpact"], "medium");
        assert!(body["suggestedActions"].is_array());
    }
}
