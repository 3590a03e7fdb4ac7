use crate::conditions::ConditionOutcomes;
use crate::config::{ConfidenceBands, EngineConfig};
use crate::types::condition::Condition;
use crate::types::report::{ProbabilityResult, ProbabilityValue};

/// Turns per-record outcomes into per-condition probabilities.
#[derive(Debug, Clone)]
pub struct ProbabilityEstimator {
    min_sample_size: usize,
    bands: ConfidenceBands,
}

impl ProbabilityEstimator {
    pub fn new(min_sample_size: usize, bands: ConfidenceBands) -> Self {
        Self {
            min_sample_size,
            bands,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.min_sample_size, config.confidence.clone())
    }

    /// Occurrences over defined outcomes. Records whose outcome is unavailable
    /// count in neither; below the minimum sample the result is insufficient data.
    pub fn estimate(&self, outcomes: &[ConditionOutcomes], condition: Condition) -> ProbabilityResult {
        let (sample_size, occurrences) = outcomes
            .iter()
            .filter_map(|o| o.get(condition))
            .fold((0usize, 0usize), |(n, k), occurred| (n + 1, k + usize::from(occurred)));

        if sample_size < self.min_sample_size {
            return ProbabilityResult {
                condition,
                probability: ProbabilityValue::InsufficientData,
                sample_size,
                occurrences,
                confidence: None,
            };
        }

        ProbabilityResult {
            condition,
            probability: ProbabilityValue::Probability(occurrences as f64 / sample_size as f64),
            sample_size,
            occurrences,
            confidence: Some(self.bands.classify(sample_size)),
        }
    }

    /// One result per condition, in [`Condition::ALL`] order.
    pub fn estimate_all(&self, outcomes: &[ConditionOutcomes]) -> Vec<ProbabilityResult> {
        Condition::ALL
            .iter()
            .map(|c| self.estimate(outcomes, *c))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conditions::ConditionEvaluator;
    use crate::types::condition::ConditionThresholds;
    use crate::types::daily_record::DailyRecord;
    use crate::types::report::Confidence;
    use chrono::NaiveDate;

    fn outcomes_for(records: &[DailyRecord]) -> Vec<ConditionOutcomes> {
        let evaluator = ConditionEvaluator::new(&ConditionThresholds::default());
        records.iter().map(|r| evaluator.evaluate(r)).collect()
    }

    fn hot_or_not(year: i32, hot: bool) -> DailyRecord {
        DailyRecord::builder()
            .date(NaiveDate::from_ymd_opt(year, 7, 15).unwrap())
            .temp_max(if hot { 34.0 } else { 28.0 })
            .build()
    }

    #[test]
    fn test_ten_of_fifteen_hot_days() {
        let records: Vec<_> = (0..15).map(|i| hot_or_not(2000 + i, i < 10)).collect();
        let estimator = ProbabilityEstimator::from_config(&EngineConfig::default());
        let result = estimator.estimate(&outcomes_for(&records), Condition::ExtremeHeat);

        assert_eq!(result.sample_size, 15);
        assert_eq!(result.occurrences, 10);
        let p = result.probability.value().unwrap();
        assert!((p - 10.0 / 15.0).abs() < 1e-12);
        assert_eq!(result.confidence, Some(Confidence::Low));
    }

    #[test]
    fn test_unavailable_outcomes_leave_denominator() {
        let mut records: Vec<_> = (0..6).map(|i| hot_or_not(2000 + i, i % 2 == 0)).collect();
        records.push(
            DailyRecord::builder()
                .date(NaiveDate::from_ymd_opt(2010, 7, 15).unwrap())
                .wind_speed(5.0)
                .build(),
        );
        let estimator = ProbabilityEstimator::new(5, ConfidenceBands::default());
        let outcomes = outcomes_for(&records);

        let heat = estimator.estimate(&outcomes, Condition::ExtremeHeat);
        assert_eq!(heat.sample_size, 6);
        assert_eq!(heat.probability, ProbabilityValue::Probability(0.5));

        let wind = estimator.estimate(&outcomes, Condition::HighWind);
        assert_eq!(wind.sample_size, 1);
        assert_eq!(wind.probability, ProbabilityValue::InsufficientData);
        assert_eq!(wind.confidence, None);
    }

    #[test]
    fn test_small_sample_is_insufficient_for_every_condition() {
        let records: Vec<_> = (0..3).map(|i| hot_or_not(2000 + i, true)).collect();
        let estimator = ProbabilityEstimator::from_config(&EngineConfig::default());
        let results = estimator.estimate_all(&outcomes_for(&records));
        assert_eq!(results.len(), Condition::ALL.len());
        assert!(results
            .iter()
            .all(|r| r.probability == ProbabilityValue::InsufficientData));
    }

    #[test]
    fn test_empty_sample() {
        let estimator = ProbabilityEstimator::from_config(&EngineConfig::default());
        let result = estimator.estimate(&[], Condition::HeavyPrecipitation);
        assert_eq!(result.sample_size, 0);
        assert_eq!(result.probability, ProbabilityValue::InsufficientData);
    }
}
