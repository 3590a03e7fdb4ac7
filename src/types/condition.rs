//! Defines the `Condition` enum, the fixed set of adverse weather conditions,
//! and the threshold specs that decide whether a day meets one.

use crate::conditions::{f_to_c, inches_to_mm, mph_to_kmh};
use crate::types::daily_record::DailyRecord;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An adverse weather condition tracked by the engine.
///
/// Adding a condition means adding a variant here, its threshold in
/// [`ConditionThresholds`] and its observed variable in [`Condition::observed`].
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    /// Maximum temperature above the heat threshold.
    ExtremeHeat,
    /// Minimum temperature below the cold threshold.
    ExtremeCold,
    /// Daily precipitation above the heavy-rain threshold.
    HeavyPrecipitation,
    /// Average wind speed above the wind threshold.
    HighWind,
    /// Heat index above the discomfort threshold.
    UncomfortableHeatIndex,
}

impl Condition {
    /// Every condition, in report order.
    pub const ALL: [Condition; 5] = [
        Condition::ExtremeHeat,
        Condition::ExtremeCold,
        Condition::HeavyPrecipitation,
        Condition::HighWind,
        Condition::UncomfortableHeatIndex,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Condition::ExtremeHeat => "extreme_heat",
            Condition::ExtremeCold => "extreme_cold",
            Condition::HeavyPrecipitation => "heavy_precipitation",
            Condition::HighWind => "high_wind",
            Condition::UncomfortableHeatIndex => "uncomfortable_heat_index",
        }
    }

    /// Position of this condition in [`Condition::ALL`].
    pub(crate) fn index(self) -> usize {
        self as usize
    }

    /// The record value this condition is judged on, if the record has it.
    pub fn observed(self, record: &DailyRecord) -> Option<f64> {
        match self {
            Condition::ExtremeHeat => record.temp_max(),
            Condition::ExtremeCold => record.temp_min(),
            Condition::HeavyPrecipitation => record.precipitation(),
            Condition::HighWind => record.wind_speed(),
            Condition::UncomfortableHeatIndex => record.heat_index(),
        }
    }

    /// The threshold spec for this condition under the given thresholds.
    pub fn spec(self, thresholds: &ConditionThresholds) -> ConditionSpec {
        let (threshold, comparison) = match self {
            Condition::ExtremeHeat => (thresholds.extreme_heat_c, Comparison::Above),
            Condition::ExtremeCold => (thresholds.extreme_cold_c, Comparison::Below),
            Condition::HeavyPrecipitation => {
                (thresholds.heavy_precipitation_mm, Comparison::Above)
            }
            Condition::HighWind => (thresholds.high_wind_kmh, Comparison::Above),
            Condition::UncomfortableHeatIndex => (thresholds.heat_index_c, Comparison::Above),
        };
        ConditionSpec {
            condition: self,
            threshold,
            comparison,
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Direction of a threshold test. Both are strict.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    Above,
    Below,
}

/// A condition bound to its numeric threshold.
#[derive(Debug, PartialEq, Clone, Copy, Serialize)]
pub struct ConditionSpec {
    pub condition: Condition,
    pub threshold: f64,
    pub comparison: Comparison,
}

impl ConditionSpec {
    /// `Some(true)` if the condition occurred on this record, `Some(false)` if it
    /// did not, `None` if the record lacks the value needed to tell.
    pub fn test(&self, record: &DailyRecord) -> Option<bool> {
        let value = self.condition.observed(record).filter(|v| v.is_finite())?;
        Some(match self.comparison {
            Comparison::Above => value > self.threshold,
            Comparison::Below => value < self.threshold,
        })
    }
}

/// Thresholds for every condition, in the metric units records are stored in.
///
/// Defaults are the classic dashboard cut-offs converted exactly: 90 °F,
/// 32 °F, 0.5 in, 15 mph and a heat index of 85 °F.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConditionThresholds {
    pub extreme_heat_c: f64,
    pub extreme_cold_c: f64,
    pub heavy_precipitation_mm: f64,
    pub high_wind_kmh: f64,
    pub heat_index_c: f64,
}

impl Default for ConditionThresholds {
    fn default() -> Self {
        Self {
            extreme_heat_c: f_to_c(90.0),
            extreme_cold_c: f_to_c(32.0),
            heavy_precipitation_mm: inches_to_mm(0.5),
            high_wind_kmh: mph_to_kmh(15.0),
            heat_index_c: f_to_c(85.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_all_matches_index() {
        for (i, condition) in Condition::ALL.iter().enumerate() {
            assert_eq!(condition.index(), i);
        }
    }

    #[test]
    fn test_spec_is_strict() {
        let thresholds = ConditionThresholds::default();
        let record = DailyRecord::builder()
            .date(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap())
            .temp_max(thresholds.extreme_heat_c)
            .temp_min(0.0)
            .build();
        assert_eq!(Condition::ExtremeHeat.spec(&thresholds).test(&record), Some(false));
        assert_eq!(Condition::ExtremeCold.spec(&thresholds).test(&record), Some(false));
        assert_eq!(Condition::HighWind.spec(&thresholds).test(&record), None);
    }

    #[test]
    fn test_default_thresholds_match_imperial_cut_offs() {
        let thresholds = ConditionThresholds::default();
        assert!((thresholds.extreme_heat_c - 32.222_222).abs() < 1e-5);
        assert!((thresholds.heat_index_c - 29.444_444).abs() < 1e-5);
        assert!((thresholds.heavy_precipitation_mm - 12.7).abs() < 1e-9);
        assert!((thresholds.high_wind_kmh - 24.140_16).abs() < 1e-9);
        assert_eq!(thresholds.extreme_cold_c, 0.0);

        // 89.98 °F is not above 90 °F.
        let record = DailyRecord::builder()
            .date(NaiveDate::from_ymd_opt(2020, 7, 1).unwrap())
            .temp_max(32.21)
            .build();
        assert_eq!(Condition::ExtremeHeat.spec(&thresholds).test(&record), Some(false));
    }

    #[test]
    fn test_condition_serializes_snake_case() {
        let json = serde_json::to_string(&Condition::UncomfortableHeatIndex).unwrap();
        assert_eq!(json, "\"uncomfortable_heat_index\"");
        assert_eq!(Condition::HighWind.to_string(), "high_wind");
    }
}
