//! Result values produced by the engine. All of them serialize with serde and
//! carry explicit insufficient-data markers instead of zeros.

use crate::trend::TrendSubject;
use crate::types::condition::Condition;
use crate::types::location::{LatLon, MonthDay};
use serde::Serialize;

/// A target month/day plus a symmetric tolerance in days, wrapping across the year boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateWindow {
    pub target: MonthDay,
    pub tolerance_days: u32,
}

impl DateWindow {
    /// Number of calendar slots the window spans.
    pub fn width_days(&self) -> u32 {
        2 * self.tolerance_days + 1
    }
}

/// Qualitative confidence derived from sample size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

/// A probability, or the explicit marker that the sample was too small.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbabilityValue {
    Probability(f64),
    InsufficientData,
}

impl ProbabilityValue {
    pub fn value(self) -> Option<f64> {
        match self {
            ProbabilityValue::Probability(p) => Some(p),
            ProbabilityValue::InsufficientData => None,
        }
    }
}

/// Probability that one condition occurs in the window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbabilityResult {
    pub condition: Condition,
    pub probability: ProbabilityValue,
    /// Window records with a defined outcome for this condition.
    pub sample_size: usize,
    /// Of those, how many met the condition.
    pub occurrences: usize,
    /// `None` when the probability is insufficient data.
    pub confidence: Option<Confidence>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
}

/// Fitted slope per year, or the insufficient-data marker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendOutcome {
    Fitted {
        slope: f64,
        direction: TrendDirection,
    },
    InsufficientData,
}

impl TrendOutcome {
    pub fn direction(self) -> Option<TrendDirection> {
        match self {
            TrendOutcome::Fitted { direction, .. } => Some(direction),
            TrendOutcome::InsufficientData => None,
        }
    }

    pub fn slope(self) -> Option<f64> {
        match self {
            TrendOutcome::Fitted { slope, .. } => Some(slope),
            TrendOutcome::InsufficientData => None,
        }
    }
}

/// One season year's aggregate inside the window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct YearlyAggregate {
    pub year: i32,
    /// Condition rate in [0, 1] or the variable's mean.
    pub value: f64,
    pub sample_size: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendResult {
    pub subject: TrendSubject,
    pub outcome: TrendOutcome,
    pub distinct_years: usize,
    pub yearly: Vec<YearlyAggregate>,
}

/// The series a query was answered from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedSeries {
    pub id: String,
    pub location: LatLon,
    /// Haversine distance from the requested point.
    pub distance_km: f64,
}

/// The full answer to one query. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbabilityReport {
    pub location: LatLon,
    pub resolved: ResolvedSeries,
    pub window: DateWindow,
    pub probabilities: Vec<ProbabilityResult>,
    /// Per-condition trends, `None` when trends were not requested.
    pub trends: Option<Vec<TrendResult>>,
    /// Per-variable trends, `None` when trends were not requested.
    pub variable_trends: Option<Vec<TrendResult>>,
    /// Records that fell inside the window.
    pub total_records: usize,
    /// Season years contributing at least one record, ascending.
    pub years_observed: Vec<i32>,
    pub total_years_observed: usize,
}

impl ProbabilityReport {
    pub fn probability(&self, condition: Condition) -> Option<&ProbabilityResult> {
        self.probabilities.iter().find(|p| p.condition == condition)
    }

    pub fn trend(&self, condition: Condition) -> Option<&TrendResult> {
        self.trends
            .as_ref()?
            .iter()
            .find(|t| t.subject == TrendSubject::Condition(condition))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_markers_serialize_as_strings() {
        let json = serde_json::to_string(&ProbabilityValue::InsufficientData).unwrap();
        assert_eq!(json, "\"insufficient_data\"");
        let json = serde_json::to_string(&TrendOutcome::InsufficientData).unwrap();
        assert_eq!(json, "\"insufficient_data\"");
    }

    #[test]
    fn test_probability_serializes_tagged() {
        let json = serde_json::to_string(&ProbabilityValue::Probability(0.5)).unwrap();
        assert_eq!(json, "{\"probability\":0.5}");
        let fitted = TrendOutcome::Fitted {
            slope: 0.25,
            direction: TrendDirection::Increasing,
        };
        assert_eq!(
            serde_json::to_string(&fitted).unwrap(),
            "{\"fitted\":{\"slope\":0.25,\"direction\":\"increasing\"}}"
        );
    }

    #[test]
    fn test_window_width() {
        let window = DateWindow {
            target: MonthDay::new(1, 3).unwrap(),
            tolerance_days: 5,
        };
        assert_eq!(window.width_days(), 11);
    }
}
