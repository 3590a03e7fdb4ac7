//! Contains the `RecordSeries` structure, the date-ordered history of one location.

use crate::store::error::LoadError;
use crate::types::daily_record::DailyRecord;
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeSet;

/// Date-ordered daily records for a single location.
///
/// Invariant: records are sorted by date and no two records share a date.
/// The only way to build one is [`RecordSeries::from_records`], which enforces this.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecordSeries {
    records: Vec<DailyRecord>,
}

impl RecordSeries {
    /// Sorts the records by date and rejects duplicates.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::DuplicateDate`] if two records carry the same date.
    pub fn from_records(mut records: Vec<DailyRecord>) -> Result<Self, LoadError> {
        records.sort_by_key(|r| r.date());
        if let Some(pair) = records.windows(2).find(|w| w[0].date() == w[1].date()) {
            return Err(LoadError::DuplicateDate(pair[0].date()));
        }
        Ok(Self { records })
    }

    pub fn records(&self) -> &[DailyRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.records.first().map(|r| r.date())
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.records.last().map(|r| r.date())
    }

    /// Distinct calendar years that have at least one record, ascending.
    pub fn years(&self) -> Vec<i32> {
        self.records
            .iter()
            .map(|r| r.date().year())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Records with `start <= date <= end`.
    pub fn get_range(&self, start: NaiveDate, end: NaiveDate) -> &[DailyRecord] {
        if start > end {
            return &[];
        }
        let lo = self.records.partition_point(|r| r.date() < start);
        let hi = self.records.partition_point(|r| r.date() <= end);
        &self.records[lo..hi]
    }

    /// The record for exactly `date`, if one exists.
    pub fn get_at(&self, date: NaiveDate) -> Option<&DailyRecord> {
        self.records
            .binary_search_by_key(&date, |r| r.date())
            .ok()
            .map(|idx| &self.records[idx])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(y: i32, m: u32, d: u32) -> DailyRecord {
        DailyRecord::builder()
            .date(NaiveDate::from_ymd_opt(y, m, d).unwrap())
            .temp_max(20.0)
            .build()
    }

    #[test]
    fn test_from_records_sorts_by_date() {
        let series = RecordSeries::from_records(vec![
            record(2021, 3, 1),
            record(2019, 5, 2),
            record(2020, 1, 1),
        ])
        .unwrap();
        let dates: Vec<_> = series.records().iter().map(|r| r.date()).collect();
        assert!(dates.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(series.years(), vec![2019, 2020, 2021]);
    }

    #[test]
    fn test_from_records_rejects_duplicate_dates() {
        let err = RecordSeries::from_records(vec![record(2020, 1, 1), record(2020, 1, 1)])
            .unwrap_err();
        assert!(matches!(err, LoadError::DuplicateDate(d) if d == NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()));
    }

    #[test]
    fn test_get_range_inclusive() {
        let series = RecordSeries::from_records(
            (1..=10).map(|d| record(2021, 3, d)).collect(),
        )
        .unwrap();
        let start = NaiveDate::from_ymd_opt(2021, 3, 3).unwrap();
        let end = NaiveDate::from_ymd_opt(2021, 3, 7).unwrap();
        assert_eq!(series.get_range(start, end).len(), 5);
        assert!(series.get_range(end, start).is_empty());
        assert!(series.get_at(start).is_some());
        assert!(series
            .get_at(NaiveDate::from_ymd_opt(2022, 1, 1).unwrap())
            .is_none());
    }
}
