//! # Recommendation Bucketing
//!
//! Splits recommendations into immediate / short-term / long-term groups by
//! their `timeframe`. Unlike insights, a recommendation has no default
//! timeframe: a missing or unrecognized value is an error, and producers must
//! populate it.

use std::sync::Arc;

use crate::error::BucketError;
use crate::models::{Insight, Recommendation, RecommendationBuckets, Timeframe};

/// Something that can propose recommendations from a user's insights.
pub trait RecommendationSource: Send + Sync {
    fn recommend(&self, insights: &[Insight]) -> Vec<Recommendation>;
}

pub type SharedRecommendationSource = Arc<dyn RecommendationSource>;

/// Produces nothing. Recommendation generation is not wired up yet.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoRecommendations;

impl RecommendationSource for NoRecommendations {
    fn recommend(&self, _insights: &[Insight]) -> Vec<Recommendation> {
        Vec::new()
    }
}

pub fn bucket(recommendations: Vec<Recommendation>) -> Result<RecommendationBuckets, BucketError> {
    let mut buckets = RecommendationBuckets::default();

    for rec in recommendations {
        let timeframe = match rec.timeframe.as_deref() {
            None | Some("") => return Err(BucketError::MissingTimeframe(rec.id)),
            Some(raw) => Timeframe::parse(raw).ok_or_else(|| BucketError::UnknownTimeframe {
                id: rec.id.clone(),
                value: raw.to_string(),
            })?,
        };

        match timeframe {
            Timeframe::Immediate => buckets.immediate.push(rec),
            Timeframe::ShortTerm => buckets.short_term.push(rec),
            Timeframe::LongTerm => buckets.long_term.push(rec),
        }
    }

    Ok(buckets)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(id: &str, timeframe: Option<&str>) -> Recommendation {
        Recommendation {
            id: id.into(),
            title: format!("Do {}", id),
            description: String::new(),
            category: None,
            priority: None,
            timeframe: timeframe.map(String::from),
        }
    }

    #[test]
    fn empty_input_gives_empty_buckets() {
        let buckets = bucket(Vec::new()).unwrap();
        assert_eq!(buckets, RecommendationBuckets::default());
        assert_eq!(NoRecommendations.recommend(&[]), Vec::new());
    }

    #[test]
    fn partitions_by_timeframe_preserving_order() {
        let buckets = bucket(vec![
            rec("a", Some("long_term")),
            rec("b", Some("immediate")),
            rec("c", Some("short_term")),
            rec("d", Some("immediate")),
        ])
        .unwrap();

        let ids = |recs: &[Recommendation]| recs.iter().map(|r| r.id.clone()).collect::<Vec<_>>();
        assert_eq!(ids(&buckets.immediate), vec!["b", "d"]);
        assert_eq!(ids(&buckets.short_term), vec!["c"]);
        assert_eq!(ids(&buckets.long_term), vec!["a"]);
    }

    #[test]
    fn missing_timeframe_is_an_error() {
        let err = bucket(vec![rec("a", Some("immediate")), rec("b", None)]).unwrap_err();
        assert_eq!(err, BucketError::MissingTimeframe("b".into()));
    }

    #[test]
    fn unknown_timeframe_is_an_error() {
        let err = bucket(vec![rec("a", Some("someday"))]).unwrap_err();
        assert_eq!(
            err,
            BucketError::UnknownTimeframe {
                id: "a".into(),
                value: "someday".into()
            }
        );
    }

    #[test]
    fn buckets_serialize_camel_case() {
        let body = serde_json::to_value(bucket(vec![rec("a", Some("short_term"))]).unwrap()).unwrap();
        assert_eq!(body["shortTerm"][0]["id"], "a");
        assert!(body["longTerm"].as_array().unwrap().is_empty());
    }
}
