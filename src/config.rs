//! Engine configuration. Passed in at construction; nothing is read from the environment.

use crate::error::WeatherOddsError;
use crate::trend::TrendVariable;
use crate::types::condition::ConditionThresholds;
use crate::types::report::Confidence;
use crate::window::MAX_TOLERANCE_DAYS;
use serde::{Deserialize, Serialize};

/// Sample-size cut-offs for the qualitative confidence label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceBands {
    /// Samples at least this large are `Medium`.
    pub medium_min: usize,
    /// Samples at least this large are `High`.
    pub high_min: usize,
}

impl Default for ConfidenceBands {
    fn default() -> Self {
        Self {
            medium_min: 30,
            high_min: 100,
        }
    }
}

impl ConfidenceBands {
    pub fn classify(&self, sample_size: usize) -> Confidence {
        if sample_size >= self.high_min {
            Confidence::High
        } else if sample_size >= self.medium_min {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    }
}

/// How yearly aggregates are turned into a trend direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendPolicy {
    /// Distinct years needed before a slope is fitted.
    pub min_years: usize,
    /// Slope (fraction per year) a condition rate must exceed to count as a trend.
    pub rate_slope_threshold: f64,
    /// °C per year.
    pub temp_max_slope_threshold: f64,
    /// °C per year.
    pub temp_min_slope_threshold: f64,
    /// mm per year.
    pub precipitation_slope_threshold: f64,
    /// km/h per year.
    pub wind_speed_slope_threshold: f64,
    /// °C per year.
    pub heat_index_slope_threshold: f64,
}

impl Default for TrendPolicy {
    fn default() -> Self {
        Self {
            min_years: 3,
            rate_slope_threshold: 0.005,
            temp_max_slope_threshold: 0.03,
            temp_min_slope_threshold: 0.03,
            precipitation_slope_threshold: 0.05,
            wind_speed_slope_threshold: 0.1,
            heat_index_slope_threshold: 0.03,
        }
    }
}

impl TrendPolicy {
    pub fn variable_threshold(&self, variable: TrendVariable) -> f64 {
        match variable {
            TrendVariable::TempMax => self.temp_max_slope_threshold,
            TrendVariable::TempMin => self.temp_min_slope_threshold,
            TrendVariable::Precipitation => self.precipitation_slope_threshold,
            TrendVariable::WindSpeed => self.wind_speed_slope_threshold,
            TrendVariable::HeatIndex => self.heat_index_slope_threshold,
        }
    }

    fn thresholds(&self) -> [(&'static str, f64); 6] {
        [
            ("rate_slope_threshold", self.rate_slope_threshold),
            ("temp_max_slope_threshold", self.temp_max_slope_threshold),
            ("temp_min_slope_threshold", self.temp_min_slope_threshold),
            (
                "precipitation_slope_threshold",
                self.precipitation_slope_threshold,
            ),
            ("wind_speed_slope_threshold", self.wind_speed_slope_threshold),
            ("heat_index_slope_threshold", self.heat_index_slope_threshold),
        ]
    }
}

/// What to do when no series sits exactly on the requested point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SpatialPolicy {
    /// Only a series at the requested coordinates (within 1e-6°) answers.
    #[default]
    Strict,
    /// The closest series within `max_distance_km` answers.
    Nearest { max_distance_km: f64 },
}

/// Everything tunable about report generation.
///
/// # Examples
///
/// ```
/// use weather_odds::{EngineConfig, SpatialPolicy};
///
/// let config = EngineConfig::from_json_str(
///     r#"{ "default_tolerance_days": 3, "spatial": { "mode": "nearest", "max_distance_km": 25.0 } }"#,
/// ).unwrap();
/// assert_eq!(config.default_tolerance_days, 3);
/// assert_eq!(config.spatial, SpatialPolicy::Nearest { max_distance_km: 25.0 });
/// assert_eq!(config.min_sample_size, 5);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub thresholds: ConditionThresholds,
    /// Tolerance used when a request does not name one.
    pub default_tolerance_days: u32,
    /// Defined outcomes needed before a probability is reported.
    pub min_sample_size: usize,
    pub confidence: ConfidenceBands,
    pub trend: TrendPolicy,
    pub spatial: SpatialPolicy,
    /// Whether reports carry trend sections unless the request says otherwise.
    pub include_trends: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            thresholds: ConditionThresholds::default(),
            default_tolerance_days: 7,
            min_sample_size: 5,
            confidence: ConfidenceBands::default(),
            trend: TrendPolicy::default(),
            spatial: SpatialPolicy::default(),
            include_trends: true,
        }
    }
}

impl EngineConfig {
    /// Parses and validates a JSON config. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`WeatherOddsError::InvalidInput`] for malformed JSON or a config
    /// that fails [`EngineConfig::validate`].
    pub fn from_json_str(json: &str) -> Result<Self, WeatherOddsError> {
        let config: EngineConfig = serde_json::from_str(json)
            .map_err(|e| WeatherOddsError::InvalidInput(format!("config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns [`WeatherOddsError::InvalidInput`] naming the first offending field.
    pub fn validate(&self) -> Result<(), WeatherOddsError> {
        let invalid = |msg: String| Err(WeatherOddsError::InvalidInput(msg));

        if self.default_tolerance_days > MAX_TOLERANCE_DAYS {
            return invalid(format!(
                "default_tolerance_days {} exceeds {MAX_TOLERANCE_DAYS}",
                self.default_tolerance_days
            ));
        }
        if self.min_sample_size == 0 {
            return invalid("min_sample_size must be at least 1".to_string());
        }
        if self.confidence.medium_min > self.confidence.high_min {
            return invalid(format!(
                "confidence bands not monotonic: medium_min {} > high_min {}",
                self.confidence.medium_min, self.confidence.high_min
            ));
        }
        if self.trend.min_years < 2 {
            return invalid("trend.min_years must be at least 2".to_string());
        }
        for (name, value) in self.trend.thresholds() {
            if !value.is_finite() || value < 0.0 {
                return invalid(format!("trend.{name} must be finite and >= 0, got {value}"));
            }
        }
        let t = &self.thresholds;
        for (name, value) in [
            ("extreme_heat_c", t.extreme_heat_c),
            ("extreme_cold_c", t.extreme_cold_c),
            ("heavy_precipitation_mm", t.heavy_precipitation_mm),
            ("high_wind_kmh", t.high_wind_kmh),
            ("heat_index_c", t.heat_index_c),
        ] {
            if !value.is_finite() {
                return invalid(format!("thresholds.{name} must be finite"));
            }
        }
        if let SpatialPolicy::Nearest { max_distance_km } = self.spatial {
            if !max_distance_km.is_finite() || max_distance_km <= 0.0 {
                return invalid(format!(
                    "spatial.max_distance_km must be positive, got {max_distance_km}"
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_confidence_bands_monotonic() {
        let bands = ConfidenceBands::default();
        let labels: Vec<_> = (0..200).map(|n| bands.classify(n)).collect();
        assert!(labels.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(bands.classify(29), Confidence::Low);
        assert_eq!(bands.classify(30), Confidence::Medium);
        assert_eq!(bands.classify(100), Confidence::High);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = EngineConfig {
            min_sample_size: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = EngineConfig {
            confidence: ConfidenceBands {
                medium_min: 50,
                high_min: 10,
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = EngineConfig {
            spatial: SpatialPolicy::Nearest {
                max_distance_km: -1.0,
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.trend.rate_slope_threshold = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_json_rejects_malformed() {
        assert!(matches!(
            EngineConfig::from_json_str("{ not json"),
            Err(WeatherOddsError::InvalidInput(_))
        ));
        assert!(EngineConfig::from_json_str(r#"{ "default_tolerance_days": 400 }"#).is_err());
    }
}
