//! Date-recurrence calculations: rhythm stepping, month-end clamping and
//! weekend shifting for payment dates.
//!
//! Payment dates never land on a weekend: Saturdays and Sundays move back
//! to the preceding Friday. Month-end anchored definitions clamp to the
//! actual last day of each month, so a cost anchored on Jan 31 pays on
//! Feb 28 (29 in leap years), not on an invalid or rolled-over date.

use chrono::{Datelike, Duration, Months, NaiveDate, Weekday};
use shared::Rhythm;

use crate::domain::models::recurring::rhythm_months;

/// Step a date forward by one rhythm interval.
///
/// Month arithmetic clamps the day to the target month's length
/// (`min(day, days_in_result_month)`); no other adjustment happens here.
pub fn next_occurrence(date: NaiveDate, rhythm: Rhythm) -> NaiveDate {
    date.checked_add_months(Months::new(rhythm_months(rhythm)))
        .unwrap_or(NaiveDate::MAX)
}

/// Whether an anchor date counts as "end of month".
///
/// Deliberately loose: day 30 or 31 always counts, even in months where
/// that day is not actually the last. A definition anchored on the 30th of
/// a 30-day month therefore clamps to the month end everywhere. This
/// matches the shipped behavior and must not be tightened to a strict
/// equality check, or projected dates diverge for 30/31-anchored costs in
/// short months.
pub fn is_month_end_anchor(anchor: NaiveDate) -> bool {
    anchor.day() >= 30 || anchor.day() == last_day_of_month(anchor)
}

/// Adjust a scheduled payment date.
///
/// Order matters: the month-end clamp runs first, then the weekend shift
/// moves Saturday/Sunday back to Friday. Callers compare the result with
/// the input to detect whether a shift occurred.
pub fn adjust_payment_date(
    date: NaiveDate,
    month_end_anchor: bool,
    shift_weekends: bool,
) -> NaiveDate {
    let mut adjusted = date;

    if month_end_anchor {
        adjusted = NaiveDate::from_ymd_opt(
            adjusted.year(),
            adjusted.month(),
            last_day_of_month(adjusted),
        )
        .unwrap_or(adjusted);
    }

    if shift_weekends {
        adjusted = match adjusted.weekday() {
            Weekday::Sat => adjusted - Duration::days(1),
            Weekday::Sun => adjusted - Duration::days(2),
            _ => adjusted,
        };
    }

    adjusted
}

/// Last calendar day of the month `date` falls in.
pub fn last_day_of_month(date: NaiveDate) -> u32 {
    days_in_month(date.year(), date.month())
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

pub fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}
