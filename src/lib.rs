//! Historical weather odds for a place and a day of the year.
//!
//! Load per-location daily records into a [`RecordStore`], hand it to a
//! [`ProbabilityEngine`], and ask how often extreme heat, extreme cold, heavy
//! precipitation, high wind, or an uncomfortable heat index occurred around
//! that day in past years, together with how those rates have been trending.

mod conditions;
mod config;
mod engine;
mod error;
mod estimator;
mod store;
mod trend;
mod types;
mod window;

pub use config::*;
pub use engine::*;
pub use error::WeatherOddsError;

pub use conditions::{heat_index_c, relative_humidity_from_dew_point, ConditionEvaluator, ConditionOutcomes};
pub use estimator::ProbabilityEstimator;
pub use trend::{ols_slope, TrendAnalyzer, TrendSubject, TrendVariable};
pub use window::{SampledRecord, WindowSelector, MAX_TOLERANCE_DAYS};

pub use store::error::LoadError;
pub use store::handle::StoreHandle;
pub use store::loader::{RecordSource, SeriesLoader, SeriesSpec};
pub use store::record_store::{Lookup, RecordStore, RecordStoreBuilder, SeriesEntry};

pub use types::condition::*;
pub use types::daily_record::DailyRecord;
pub use types::location::{LatLon, MonthDay};
pub use types::report::*;
pub use types::series::RecordSeries;
