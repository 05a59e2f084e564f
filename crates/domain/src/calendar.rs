// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Cycle and week-group arithmetic.
//!
//! Cycles are fixed-length accounting periods (28 days by default). Week
//! groups rotate A, B, C, D week by week, counted from the closest anchor
//! date at or before the target date.

use crate::error::DomainError;
use crate::types::WeekGroup;
use time::{Date, Duration, PrimitiveDateTime, Time};

/// Returns the Monday of the week containing `date`.
#[must_use]
pub fn monday_of(date: Date) -> Date {
    date - Duration::days(i64::from(date.weekday().number_days_from_monday()))
}

/// Returns midnight of `date`.
#[must_use]
pub const fn start_of_day(date: Date) -> PrimitiveDateTime {
    PrimitiveDateTime::new(date, Time::MIDNIGHT)
}

/// Returns the last representable second of `date`.
#[must_use]
pub fn end_of_day(date: Date) -> PrimitiveDateTime {
    PrimitiveDateTime::new(date, Time::MIDNIGHT) + Duration::days(1) - Duration::SECOND
}

/// Adds a number of days, reporting overflow as a domain error.
///
/// # Errors
///
/// Returns `DomainError::DateArithmeticOverflow` if the result is not representable.
pub fn add_days(date: Date, days: i64) -> Result<Date, DomainError> {
    date.checked_add(Duration::days(days))
        .ok_or_else(|| DomainError::DateArithmeticOverflow {
            operation: format!("adding {days} days to {date}"),
        })
}

/// Returns the week group of the week containing `date`.
///
/// The rotation is counted from the latest anchor at or before `date`. If
/// every anchor lies after `date`, the earliest anchor is used and the count
/// runs backwards. Returns `None` when no anchor is configured.
///
/// # Arguments
///
/// * `date` - The date to classify
/// * `anchors` - Dates on which a new A week starts
#[must_use]
pub fn week_group_at(date: Date, anchors: &[Date]) -> Option<WeekGroup> {
    let anchor: Date = anchors
        .iter()
        .copied()
        .filter(|anchor| *anchor <= date)
        .max()
        .or_else(|| anchors.iter().copied().min())?;

    let weeks_delta: i64 = (date - anchor).whole_days().div_euclid(7);
    Some(WeekGroup::from_index(weeks_delta))
}

/// Computes the start date of the next cycle to apply.
///
/// If a cycle was already applied, the next one starts one cycle later.
/// Otherwise the first cycle starts on the Monday of the first shift.
///
/// # Arguments
///
/// * `latest_applied` - The latest cycle start already applied
/// * `first_shift_date` - The date of the first generated shift
/// * `cycle_duration_days` - Cycle length in days
///
/// # Errors
///
/// Returns an error if the date arithmetic overflows.
pub fn next_cycle_start_date(
    latest_applied: Option<Date>,
    first_shift_date: Option<Date>,
    cycle_duration_days: i64,
) -> Result<Option<Date>, DomainError> {
    if let Some(latest) = latest_applied {
        return add_days(latest, cycle_duration_days).map(Some);
    }
    Ok(first_shift_date.map(monday_of))
}

/// Lists cycle starts from `start`, stepping one cycle at a time, up to and
/// including `end`.
///
/// # Errors
///
/// Returns an error if the date arithmetic overflows or the cycle length is
/// not positive.
pub fn cycle_start_dates_between(
    start: Date,
    end: Date,
    cycle_duration_days: i64,
) -> Result<Vec<Date>, DomainError> {
    if cycle_duration_days <= 0 {
        return Err(DomainError::InvalidPolicy {
            field: String::from("cycle_duration_days"),
            reason: String::from("must be greater than 0"),
        });
    }
    let mut dates: Vec<Date> = Vec::new();
    let mut current: Date = start;
    while current <= end {
        dates.push(current);
        current = add_days(current, cycle_duration_days)?;
    }
    Ok(dates)
}

/// Lists the Mondays of every week touching the range `[start, end]`.
///
/// # Errors
///
/// Returns an error if the date arithmetic overflows.
pub fn mondays_between(start: Date, end: Date) -> Result<Vec<Date>, DomainError> {
    let mut mondays: Vec<Date> = Vec::new();
    let mut current: Date = monday_of(start);
    while current <= end {
        mondays.push(current);
        current = add_days(current, 7)?;
    }
    Ok(mondays)
}

/// Formats a date the way cycle descriptions show it (`dd.mm.yy`).
#[must_use]
pub fn format_short_date(date: Date) -> String {
    format!(
        "{:02}.{:02}.{:02}",
        date.day(),
        u8::from(date.month()),
        date.year().rem_euclid(100)
    )
}
