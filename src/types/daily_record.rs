use crate::conditions::{heat_index_c, relative_humidity_from_dew_point};
use bon::bon;
use chrono::NaiveDate;
use serde::Serialize;

/// One day of observations at one location.
///
/// Every measurement is optional; archives routinely miss single fields.
/// The heat index is derived once at construction from the maximum
/// temperature and the humidity (measured, or derived from dew point).
/// Records are read-only after construction so the heat index stays in step
/// with its inputs.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct DailyRecord {
    date: NaiveDate,               // date
    temp_min: Option<f64>,         // tmin (°C)
    temp_max: Option<f64>,         // tmax (°C)
    precipitation: Option<f64>,    // prcp (total mm)
    wind_speed: Option<f64>,       // wspd (avg km/h)
    relative_humidity: Option<f64>, // rhum (%)
    dew_point: Option<f64>,        // dwpt (°C)
    heat_index: Option<f64>,
}

#[bon]
impl DailyRecord {
    /// Builds a record and derives its heat index.
    ///
    /// # Example
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use weather_odds::DailyRecord;
    ///
    /// let record = DailyRecord::builder()
    ///     .date(NaiveDate::from_ymd_opt(2023, 7, 15).unwrap())
    ///     .temp_max(35.0)
    ///     .relative_humidity(60.0)
    ///     .build();
    /// assert!(record.heat_index().unwrap() > 35.0);
    /// ```
    #[builder]
    pub fn new(
        date: NaiveDate,
        temp_min: Option<f64>,
        temp_max: Option<f64>,
        precipitation: Option<f64>,
        wind_speed: Option<f64>,
        relative_humidity: Option<f64>,
        dew_point: Option<f64>,
    ) -> Self {
        let humidity = relative_humidity.or_else(|| {
            temp_max
                .zip(dew_point)
                .and_then(|(t, td)| relative_humidity_from_dew_point(t, td))
        });
        let heat_index = temp_max
            .zip(humidity)
            .and_then(|(t, rh)| heat_index_c(t, rh));
        Self {
            date,
            temp_min,
            temp_max,
            precipitation,
            wind_speed,
            relative_humidity,
            dew_point,
            heat_index,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Minimum temperature in °C.
    pub fn temp_min(&self) -> Option<f64> {
        self.temp_min
    }

    /// Maximum temperature in °C.
    pub fn temp_max(&self) -> Option<f64> {
        self.temp_max
    }

    /// Daily precipitation total in mm.
    pub fn precipitation(&self) -> Option<f64> {
        self.precipitation
    }

    /// Average wind speed in km/h.
    pub fn wind_speed(&self) -> Option<f64> {
        self.wind_speed
    }

    /// Measured relative humidity in percent.
    pub fn relative_humidity(&self) -> Option<f64> {
        self.relative_humidity
    }

    /// Dew point in °C.
    pub fn dew_point(&self) -> Option<f64> {
        self.dew_point
    }

    /// Heat index in °C, `None` when temperature or humidity is missing.
    pub fn heat_index(&self) -> Option<f64> {
        self.heat_index
    }
}
