//! Year-over-year trends of condition rates and variable means inside a window.

use crate::conditions::ConditionOutcomes;
use crate::config::TrendPolicy;
use crate::types::condition::Condition;
use crate::types::daily_record::DailyRecord;
use crate::types::report::{TrendDirection, TrendOutcome, TrendResult, YearlyAggregate};
use crate::window::SampledRecord;
use serde::Serialize;
use std::collections::BTreeMap;

/// A raw measurement whose yearly mean can be trended.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendVariable {
    TempMax,
    TempMin,
    Precipitation,
    WindSpeed,
    HeatIndex,
}

impl TrendVariable {
    pub const ALL: [TrendVariable; 5] = [
        TrendVariable::TempMax,
        TrendVariable::TempMin,
        TrendVariable::Precipitation,
        TrendVariable::WindSpeed,
        TrendVariable::HeatIndex,
    ];

    pub fn observed(self, record: &DailyRecord) -> Option<f64> {
        match self {
            TrendVariable::TempMax => record.temp_max(),
            TrendVariable::TempMin => record.temp_min(),
            TrendVariable::Precipitation => record.precipitation(),
            TrendVariable::WindSpeed => record.wind_speed(),
            TrendVariable::HeatIndex => record.heat_index(),
        }
    }
}

/// What a trend was computed over.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendSubject {
    Condition(Condition),
    Variable(TrendVariable),
}

/// Ordinary least squares slope of y on x. `None` when x has no spread or the fit is not finite.
pub fn ols_slope(points: &[(f64, f64)]) -> Option<f64> {
    if points.len() < 2 {
        return None;
    }
    let n = points.len() as f64;
    let mean_x = points.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = points.iter().map(|p| p.1).sum::<f64>() / n;
    let (sxy, sxx) = points.iter().fold((0.0, 0.0), |(sxy, sxx), (x, y)| {
        let dx = x - mean_x;
        (sxy + dx * (y - mean_y), sxx + dx * dx)
    });
    if sxx == 0.0 {
        return None;
    }
    let slope = sxy / sxx;
    slope.is_finite().then_some(slope)
}

#[derive(Debug, Clone)]
pub struct TrendAnalyzer {
    policy: TrendPolicy,
}

impl TrendAnalyzer {
    pub fn new(policy: TrendPolicy) -> Self {
        Self { policy }
    }

    /// Trend of the yearly rate at which `condition` occurred.
    ///
    /// `labeled` pairs each sampled record's season year with its outcomes.
    /// Years where no record had a defined outcome are left out.
    pub fn analyze_condition(
        &self,
        labeled: &[(i32, ConditionOutcomes)],
        condition: Condition,
    ) -> TrendResult {
        let mut by_year: BTreeMap<i32, (usize, usize)> = BTreeMap::new();
        for (year, outcomes) in labeled {
            if let Some(occurred) = outcomes.get(condition) {
                let entry = by_year.entry(*year).or_default();
                entry.0 += 1;
                entry.1 += usize::from(occurred);
            }
        }
        let yearly = by_year
            .into_iter()
            .map(|(year, (n, k))| YearlyAggregate {
                year,
                value: k as f64 / n as f64,
                sample_size: n,
            })
            .collect();
        self.fit(
            TrendSubject::Condition(condition),
            yearly,
            self.policy.rate_slope_threshold,
        )
    }

    /// Trend of the yearly mean of `variable`, skipping records without it.
    pub fn analyze_variable(&self, sample: &[SampledRecord<'_>], variable: TrendVariable) -> TrendResult {
        let mut by_year: BTreeMap<i32, (usize, f64)> = BTreeMap::new();
        for s in sample {
            if let Some(v) = variable.observed(s.record).filter(|v| v.is_finite()) {
                let entry = by_year.entry(s.season_year).or_default();
                entry.0 += 1;
                entry.1 += v;
            }
        }
        let yearly = by_year
            .into_iter()
            .map(|(year, (n, sum))| YearlyAggregate {
                year,
                value: sum / n as f64,
                sample_size: n,
            })
            .collect();
        self.fit(
            TrendSubject::Variable(variable),
            yearly,
            self.policy.variable_threshold(variable),
        )
    }

    fn fit(&self, subject: TrendSubject, yearly: Vec<YearlyAggregate>, threshold: f64) -> TrendResult {
        let distinct_years = yearly.len();
        let outcome = if distinct_years < self.policy.min_years {
            TrendOutcome::InsufficientData
        } else {
            let constant = yearly.windows(2).all(|w| w[0].value == w[1].value);
            let points: Vec<(f64, f64)> = yearly
                .iter()
                .map(|a| (f64::from(a.year), a.value))
                .collect();
            match ols_slope(&points).filter(|_| !constant) {
                Some(slope) => TrendOutcome::Fitted {
                    slope,
                    direction: classify(slope, threshold),
                },
                None => TrendOutcome::Fitted {
                    slope: 0.0,
                    direction: TrendDirection::Stable,
                },
            }
        };
        TrendResult {
            subject,
            outcome,
            distinct_years,
            yearly,
        }
    }
}

fn classify(slope: f64, threshold: f64) -> TrendDirection {
    if slope > threshold {
        TrendDirection::Increasing
    } else if slope < -threshold {
        TrendDirection::Decreasing
    } else {
        TrendDirection::Stable
    }
}
