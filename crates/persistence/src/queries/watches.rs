// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shift watch queries.

use coop_shifts_domain::{
    RecurringShiftWatch, Shift, ShiftWatch, StaffingStatus, parse_staffing_statuses,
};
use diesel::SqliteConnection;
use diesel::prelude::*;
use time::PrimitiveDateTime;

use crate::data_models::{format_datetime, parse_id_list, parse_week_groups, parse_weekdays};
use crate::diesel_schema::{recurring_shift_watches, shift_watches, shifts};
use crate::error::PersistenceError;
use crate::queries::shifts::ShiftRow;

#[derive(Queryable, Selectable)]
#[diesel(table_name = shift_watches)]
struct ShiftWatchRow {
    shift_watch_id: i64,
    member_id: i64,
    shift_id: i64,
    watched_statuses: String,
    last_status: Option<String>,
    recurring_watch_id: Option<i64>,
}

impl ShiftWatchRow {
    fn into_shift_watch(self) -> Result<ShiftWatch, PersistenceError> {
        Ok(ShiftWatch {
            shift_watch_id: Some(self.shift_watch_id),
            member_id: self.member_id,
            shift_id: self.shift_id,
            watched_statuses: parse_staffing_statuses(&self.watched_statuses)?,
            last_status: self
                .last_status
                .as_deref()
                .map(str::parse::<StaffingStatus>)
                .transpose()?,
            recurring_watch_id: self.recurring_watch_id,
        })
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = recurring_shift_watches)]
struct RecurringShiftWatchRow {
    recurring_watch_id: i64,
    member_id: i64,
    weekdays: String,
    week_groups: String,
    shift_template_ids: String,
    watched_statuses: String,
}

impl RecurringShiftWatchRow {
    fn into_recurring_watch(self) -> Result<RecurringShiftWatch, PersistenceError> {
        Ok(RecurringShiftWatch {
            recurring_watch_id: Some(self.recurring_watch_id),
            member_id: self.member_id,
            weekdays: parse_weekdays(&self.weekdays)?,
            week_groups: parse_week_groups(&self.week_groups)?,
            shift_template_ids: parse_id_list(&self.shift_template_ids)?,
            watched_statuses: parse_staffing_statuses(&self.watched_statuses)?,
        })
    }
}

/// Returns `true` if the member already watches the shift.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn shift_watch_exists(
    conn: &mut SqliteConnection,
    member_id: i64,
    shift_id: i64,
) -> Result<bool, PersistenceError> {
    let count: i64 = shift_watches::table
        .filter(shift_watches::member_id.eq(member_id))
        .filter(shift_watches::shift_id.eq(shift_id))
        .count()
        .get_result(conn)?;
    Ok(count > 0)
}

/// Lists every watch of a member.
///
/// # Errors
///
/// Returns an error if the query fails or a row is malformed.
pub fn list_shift_watches_for_member(
    conn: &mut SqliteConnection,
    member_id: i64,
) -> Result<Vec<ShiftWatch>, PersistenceError> {
    shift_watches::table
        .filter(shift_watches::member_id.eq(member_id))
        .order(shift_watches::shift_watch_id.asc())
        .select(ShiftWatchRow::as_select())
        .load(conn)?
        .into_iter()
        .map(ShiftWatchRow::into_shift_watch)
        .collect()
}

/// Lists the watches on non-cancelled shifts starting after `from`, with
/// their shift.
///
/// # Errors
///
/// Returns an error if the query fails or a row is malformed.
pub fn list_shift_watches_on_shifts_after(
    conn: &mut SqliteConnection,
    from: PrimitiveDateTime,
) -> Result<Vec<(ShiftWatch, Shift)>, PersistenceError> {
    let rows: Vec<(ShiftWatchRow, ShiftRow)> = shift_watches::table
        .inner_join(shifts::table)
        .filter(shifts::cancelled.eq(0))
        .filter(shifts::start_time.gt(format_datetime(from)?))
        .order((shifts::start_time.asc(), shift_watches::shift_watch_id.asc()))
        .select((ShiftWatchRow::as_select(), ShiftRow::as_select()))
        .load(conn)?;
    rows.into_iter()
        .map(|(watch, shift)| Ok((watch.into_shift_watch()?, shift.into_shift()?)))
        .collect()
}

/// Lists every recurring shift watch.
///
/// # Errors
///
/// Returns an error if the query fails or a row is malformed.
pub fn list_recurring_shift_watches(
    conn: &mut SqliteConnection,
) -> Result<Vec<RecurringShiftWatch>, PersistenceError> {
    recurring_shift_watches::table
        .order(recurring_shift_watches::recurring_watch_id.asc())
        .select(RecurringShiftWatchRow::as_select())
        .load(conn)?
        .into_iter()
        .map(RecurringShiftWatchRow::into_recurring_watch)
        .collect()
}
