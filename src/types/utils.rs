use chrono::{Datelike, Duration, NaiveDate};

/// Leap year used to lay every month/day on one fixed 366-slot calendar.
pub(crate) const REFERENCE_LEAP_YEAR: i32 = 2000;
/// Number of slots on the reference calendar.
pub(crate) const CALENDAR_SLOTS: i64 = 366;

pub(crate) fn days_in_month(year: i32, month: u32) -> Option<u32> {
    if !(1..=12).contains(&month) {
        return None;
    }
    let (next_month_year, next_month) = if month == 12 {
        (year.checked_add(1)?, 1)
    } else {
        (year, month + 1)
    };
    let first_day_of_next_month = NaiveDate::from_ymd_opt(next_month_year, next_month, 1)?;
    let last_day_of_current_month = first_day_of_next_month - Duration::days(1);
    Some(last_day_of_current_month.day())
}

/// Position (1..=366) of a month/day on the reference leap-year calendar.
///
/// Feb 29 keeps its own slot and every later day sits one slot further on in
/// all years, so the same calendar day always lands on the same position.
pub(crate) fn calendar_slot(month: u32, day: u32) -> Option<i64> {
    NaiveDate::from_ymd_opt(REFERENCE_LEAP_YEAR, month, day).map(|d| i64::from(d.ordinal()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2023, 2), Some(28));
        assert_eq!(days_in_month(2024, 2), Some(29));
        assert_eq!(days_in_month(2023, 12), Some(31));
        assert_eq!(days_in_month(2023, 13), None);
    }

    #[test]
    fn test_calendar_slot_is_year_independent() {
        assert_eq!(calendar_slot(1, 1), Some(1));
        assert_eq!(calendar_slot(2, 29), Some(60));
        assert_eq!(calendar_slot(3, 1), Some(61));
        assert_eq!(calendar_slot(12, 31), Some(CALENDAR_SLOTS));
        assert_eq!(calendar_slot(2, 30), None);
    }
}
