//! Day-of-year window selection with calendar-aware wraparound.

use crate::error::WeatherOddsError;
use crate::types::daily_record::DailyRecord;
use crate::types::location::MonthDay;
use crate::types::report::DateWindow;
use crate::types::series::RecordSeries;
use crate::types::utils::{calendar_slot, CALENDAR_SLOTS};
use chrono::Datelike;

/// Largest tolerance that keeps the window narrower than a full year.
pub const MAX_TOLERANCE_DAYS: u32 = 182;

/// A record picked by the window, tagged with where it sits relative to the target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampledRecord<'a> {
    pub record: &'a DailyRecord,
    /// Year of the target occurrence this record is closest to. A Dec 29 record
    /// sampled for a Jan 3 target belongs to the following year's season.
    pub season_year: i32,
    /// Signed distance to the target in days, negative when before it.
    pub offset_days: i64,
}

pub struct WindowSelector;

impl WindowSelector {
    /// Builds a validated window.
    ///
    /// # Errors
    ///
    /// Returns [`WeatherOddsError::InvalidInput`] for an impossible month/day or a
    /// tolerance above [`MAX_TOLERANCE_DAYS`].
    pub fn window(month: u32, day: u32, tolerance_days: u32) -> Result<DateWindow, WeatherOddsError> {
        let target = MonthDay::new(month, day)?;
        if tolerance_days > MAX_TOLERANCE_DAYS {
            return Err(WeatherOddsError::InvalidInput(format!(
                "tolerance of {tolerance_days} days exceeds {MAX_TOLERANCE_DAYS}"
            )));
        }
        Ok(DateWindow {
            target,
            tolerance_days,
        })
    }

    /// Signed offset from `target` to `other` on the reference calendar, in
    /// (-183, 183]. Both arguments must be valid month/days.
    pub fn signed_offset(target: MonthDay, other: MonthDay) -> Option<i64> {
        let t = calendar_slot(target.month, target.day)?;
        let o = calendar_slot(other.month, other.day)?;
        let mut diff = o - t;
        if diff > CALENDAR_SLOTS / 2 {
            diff -= CALENDAR_SLOTS;
        } else if diff <= -CALENDAR_SLOTS / 2 {
            diff += CALENDAR_SLOTS;
        }
        Some(diff)
    }

    /// Every record of `series` whose month/day is within the window of the target.
    ///
    /// A season only counts when the series covers its target day, so a
    /// window reaching over New Year never invents a season from the last few
    /// December days of the series (or the first few January days). Returns
    /// an empty vector when nothing matches.
    pub fn select<'a>(series: &'a RecordSeries, window: &DateWindow) -> Vec<SampledRecord<'a>> {
        let (Some(first), Some(last)) = (series.first_date(), series.last_date()) else {
            return vec![];
        };
        let Some(target_slot) = calendar_slot(window.target.month, window.target.day) else {
            return vec![];
        };
        let tolerance = i64::from(window.tolerance_days);
        series
            .records()
            .iter()
            .filter_map(|record| {
                let date = record.date();
                let offset = Self::signed_offset(window.target, MonthDay::of(date))?;
                if offset.abs() > tolerance {
                    return None;
                }
                let record_slot = calendar_slot(date.month(), date.day())?;
                // Wrapped across the year boundary when the raw slot order disagrees with the offset.
                let season_year = if offset < 0 && record_slot > target_slot {
                    date.year() + 1
                } else if offset > 0 && record_slot < target_slot {
                    date.year() - 1
                } else {
                    date.year()
                };
                let season_target = window.target.in_year(season_year)?;
                if season_target < first || season_target > last {
                    return None;
                }
                Some(SampledRecord {
                    record,
                    season_year,
                    offset_days: offset,
                })
            })
            .collect()
    }
}
