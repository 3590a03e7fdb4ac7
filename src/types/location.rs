//! Geographic points and calendar days used to address a query.

use crate::error::WeatherOddsError;
use crate::types::utils::{days_in_month, REFERENCE_LEAP_YEAR};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Represents a geographical coordinate using latitude and longitude.
///
/// Latitude is the first element (index 0), and longitude is the second (index 1).
/// Both values are represented as `f64` decimal degrees.
///
/// # Examples
///
/// ```
/// use weather_odds::LatLon;
///
/// let berlin_center = LatLon(52.5200, 13.4050);
/// assert_eq!(berlin_center.0, 52.5200); // Latitude
/// assert_eq!(berlin_center.1, 13.4050); // Longitude
/// assert!(berlin_center.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon(pub f64, pub f64);

impl LatLon {
    pub fn latitude(self) -> f64 {
        self.0
    }

    pub fn longitude(self) -> f64 {
        self.1
    }

    /// Checks that latitude lies in [-90, 90] and longitude in [-180, 180].
    ///
    /// # Errors
    ///
    /// Returns [`WeatherOddsError::InvalidInput`] for out-of-range or non-finite coordinates.
    pub fn validate(self) -> Result<Self, WeatherOddsError> {
        if !self.0.is_finite() || !(-90.0..=90.0).contains(&self.0) {
            return Err(WeatherOddsError::InvalidInput(format!(
                "latitude {} outside [-90, 90]",
                self.0
            )));
        }
        if !self.1.is_finite() || !(-180.0..=180.0).contains(&self.1) {
            return Err(WeatherOddsError::InvalidInput(format!(
                "longitude {} outside [-180, 180]",
                self.1
            )));
        }
        Ok(self)
    }
}

impl fmt::Display for LatLon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.0, self.1)
    }
}

/// A calendar day without a year. Feb 29 is a valid value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MonthDay {
    pub month: u32,
    pub day: u32,
}

impl MonthDay {
    /// # Errors
    ///
    /// Returns [`WeatherOddsError::InvalidInput`] if the month/day never occurs,
    /// e.g. April 31 or month 13.
    pub fn new(month: u32, day: u32) -> Result<Self, WeatherOddsError> {
        let last_day = days_in_month(REFERENCE_LEAP_YEAR, month).ok_or_else(|| {
            WeatherOddsError::InvalidInput(format!("month {month} outside 1..=12"))
        })?;
        if day == 0 || day > last_day {
            return Err(WeatherOddsError::InvalidInput(format!(
                "day {day} outside 1..={last_day} for month {month}"
            )));
        }
        Ok(Self { month, day })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            month: date.month(),
            day: date.day(),
        }
    }

    /// This day in `year`. Feb 29 falls back to Feb 28 outside leap years.
    pub fn in_year(self, year: i32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(year, self.month, self.day).or_else(|| {
            (self.month == 2 && self.day == 29)
                .then(|| NaiveDate::from_ymd_opt(year, 2, 28))
                .flatten()
        })
    }
}

impl fmt::Display for MonthDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:02}", self.month, self.day)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_day_in_year() {
        let leap_day = MonthDay::new(2, 29).unwrap();
        assert_eq!(leap_day.in_year(2024), NaiveDate::from_ymd_opt(2024, 2, 29));
        assert_eq!(leap_day.in_year(2023), NaiveDate::from_ymd_opt(2023, 2, 28));
        let jan3 = MonthDay::new(1, 3).unwrap();
        assert_eq!(jan3.in_year(2020), NaiveDate::from_ymd_opt(2020, 1, 3));
    }

    #[test]
    fn test_latlon_validate_bounds() {
        assert!(LatLon(90.0, 180.0).validate().is_ok());
        assert!(LatLon(-90.0, -180.0).validate().is_ok());
        assert!(matches!(
            LatLon(90.5, 0.0).validate(),
            Err(WeatherOddsError::InvalidInput(_))
        ));
        assert!(matches!(
            LatLon(0.0, -180.1).validate(),
            Err(WeatherOddsError::InvalidInput(_))
        ));
        assert!(LatLon(f64::NAN, 0.0).validate().is_err());
    }

    #[test]
    fn test_month_day_accepts_leap_day() {
        let leap = MonthDay::new(2, 29).unwrap();
        assert_eq!(leap.to_string(), "02-29");
    }

    #[test]
    fn test_month_day_rejects_impossible_dates() {
        assert!(MonthDay::new(4, 31).is_err());
        assert!(MonthDay::new(13, 1).is_err());
        assert!(MonthDay::new(1, 0).is_err());
    }
}
