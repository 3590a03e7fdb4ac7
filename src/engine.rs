use crate::conditions::{ConditionEvaluator, ConditionOutcomes};
use crate::config::EngineConfig;
use crate::error::WeatherOddsError;
use crate::estimator::ProbabilityEstimator;
use crate::store::handle::StoreHandle;
use crate::trend::{TrendAnalyzer, TrendVariable};
use crate::types::condition::Condition;
use crate::types::location::LatLon;
use crate::types::report::ProbabilityReport;
use crate::window::WindowSelector;
use bon::bon;
use chrono::{Datelike, NaiveDate};
use log::debug;
use rayon::prelude::*;
use std::collections::BTreeSet;

/// One query: a point, a calendar day, and optional overrides of the engine defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRequest {
    pub location: LatLon,
    pub month: u32,
    pub day: u32,
    /// Falls back to [`EngineConfig::default_tolerance_days`].
    pub tolerance_days: Option<u32>,
    /// Falls back to [`EngineConfig::include_trends`].
    pub include_trends: Option<bool>,
}

impl ReportRequest {
    pub fn new(location: LatLon, month: u32, day: u32) -> Self {
        Self {
            location,
            month,
            day,
            tolerance_days: None,
            include_trends: None,
        }
    }

    /// Request for the month and day of `date`; its year is ignored.
    pub fn for_date(location: LatLon, date: NaiveDate) -> Self {
        Self::new(location, date.month(), date.day())
    }

    pub fn with_tolerance_days(mut self, tolerance_days: u32) -> Self {
        self.tolerance_days = Some(tolerance_days);
        self
    }

    pub fn with_trends(mut self, include_trends: bool) -> Self {
        self.include_trends = Some(include_trends);
        self
    }
}

/// Answers "how likely is this weather on this day here?" from historical records.
///
/// The engine is immutable after construction; share it behind an `Arc` to
/// serve queries from many threads. Data reloads go through the
/// [`StoreHandle`] returned by [`ProbabilityEngine::store`].
#[derive(Debug)]
pub struct ProbabilityEngine {
    store: StoreHandle,
    config: EngineConfig,
    evaluator: ConditionEvaluator,
    estimator: ProbabilityEstimator,
    analyzer: TrendAnalyzer,
}

#[bon]
impl ProbabilityEngine {
    /// # Errors
    ///
    /// Returns [`WeatherOddsError::InvalidInput`] if `config` fails validation.
    pub fn new(store: StoreHandle, config: EngineConfig) -> Result<Self, WeatherOddsError> {
        config.validate()?;
        Ok(Self {
            store,
            evaluator: ConditionEvaluator::new(&config.thresholds),
            estimator: ProbabilityEstimator::from_config(&config),
            analyzer: TrendAnalyzer::new(config.trend.clone()),
            config,
        })
    }

    pub fn store(&self) -> &StoreHandle {
        &self.store
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Builds the probability report for one request.
    ///
    /// Inputs are validated before any data is touched. Sparse data never
    /// fails the query; the affected statistics carry insufficient-data
    /// markers instead.
    ///
    /// # Errors
    ///
    /// * [`WeatherOddsError::InvalidInput`] for out-of-range coordinates, an
    ///   impossible month/day, or a tolerance above 182 days.
    /// * [`WeatherOddsError::LocationNotFound`] when no series serves the location.
    pub fn generate_report(&self, request: &ReportRequest) -> Result<ProbabilityReport, WeatherOddsError> {
        let location = request.location.validate()?;
        let tolerance = request
            .tolerance_days
            .unwrap_or(self.config.default_tolerance_days);
        let window = WindowSelector::window(request.month, request.day, tolerance)?;

        let store = self.store.snapshot();
        let lookup = store.lookup(location, self.config.spatial)?;
        let sample = WindowSelector::select(lookup.series(), &window);
        if sample.len() < self.config.min_sample_size {
            debug!(
                "Only {} records for {} ±{} days at series '{}'",
                sample.len(),
                window.target,
                window.tolerance_days,
                lookup.entry.id
            );
        }

        let outcomes: Vec<ConditionOutcomes> = sample
            .iter()
            .map(|s| self.evaluator.evaluate(s.record))
            .collect();
        let probabilities = self.estimator.estimate_all(&outcomes);

        let include_trends = request
            .include_trends
            .unwrap_or(self.config.include_trends);
        let (trends, variable_trends) = if include_trends {
            let labeled: Vec<(i32, ConditionOutcomes)> = sample
                .iter()
                .map(|s| s.season_year)
                .zip(outcomes.iter().copied())
                .collect();
            let trends = Condition::ALL
                .iter()
                .map(|c| self.analyzer.analyze_condition(&labeled, *c))
                .collect();
            let variable_trends = TrendVariable::ALL
                .iter()
                .map(|v| self.analyzer.analyze_variable(&sample, *v))
                .collect();
            (Some(trends), Some(variable_trends))
        } else {
            (None, None)
        };

        let years_observed: Vec<i32> = sample
            .iter()
            .map(|s| s.season_year)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        Ok(ProbabilityReport {
            location,
            resolved: lookup.resolved(),
            window,
            probabilities,
            trends,
            variable_trends,
            total_records: sample.len(),
            total_years_observed: years_observed.len(),
            years_observed,
        })
    }

    /// Builder form of [`ProbabilityEngine::generate_report`].
    ///
    /// # Example
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use weather_odds::{
    ///     DailyRecord, EngineConfig, LatLon, ProbabilityEngine, RecordSeries, RecordStore,
    ///     StoreHandle,
    /// };
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let records = (2005..2020)
    ///     .map(|year| {
    ///         DailyRecord::builder()
    ///             .date(NaiveDate::from_ymd_opt(year, 7, 15).unwrap())
    ///             .temp_max(if year % 3 == 0 { 34.0 } else { 29.0 })
    ///             .build()
    ///     })
    ///     .collect();
    /// let mut store = RecordStore::builder();
    /// store.insert("nyc", LatLon(40.71, -74.01), RecordSeries::from_records(records)?)?;
    /// let engine = ProbabilityEngine::new(StoreHandle::new(store.build()), EngineConfig::default())?;
    ///
    /// let report = engine
    ///     .report()
    ///     .location(LatLon(40.71, -74.01))
    ///     .month(7)
    ///     .day(15)
    ///     .tolerance_days(0)
    ///     .call()?;
    /// assert_eq!(report.total_records, 15);
    /// # Ok(())
    /// # }
    /// ```
    #[builder]
    pub fn report(
        &self,
        location: LatLon,
        month: u32,
        day: u32,
        tolerance_days: Option<u32>,
        include_trends: Option<bool>,
    ) -> Result<ProbabilityReport, WeatherOddsError> {
        self.generate_report(&ReportRequest {
            location,
            month,
            day,
            tolerance_days,
            include_trends,
        })
    }

    /// Runs independent requests in parallel. Output order matches `requests`.
    pub fn generate_reports(
        &self,
        requests: &[ReportRequest],
    ) -> Vec<Result<ProbabilityReport, WeatherOddsError>> {
        requests
            .par_iter()
            .map(|request| self.generate_report(request))
            .collect()
    }
}
