// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Attendance queries.
//!
//! Most lookups join attendances through their slot to the shift, since
//! the shift carries the date every rule is evaluated against.

use coop_shifts_domain::{Attendance, AttendanceOrigin, AttendanceState, Shift};
use diesel::SqliteConnection;
use diesel::prelude::*;
use time::PrimitiveDateTime;

use crate::data_models::{flag, format_datetime, parse_datetime};
use crate::diesel_schema::{shift_attendances, shift_slots, shifts, solidarity_shifts};
use crate::error::PersistenceError;
use crate::queries::shifts::ShiftRow;

/// States that occupy a slot.
const VALID_STATES: [&str; 3] = [
    AttendanceState::Pending.as_str(),
    AttendanceState::Done.as_str(),
    AttendanceState::LookingForStandIn.as_str(),
];

/// States in which the member is expected at the shift.
const EXPECTED_STATES: [&str; 2] = [
    AttendanceState::Pending.as_str(),
    AttendanceState::LookingForStandIn.as_str(),
];

#[derive(Queryable, Selectable)]
#[diesel(table_name = shift_attendances)]
struct AttendanceRow {
    attendance_id: i64,
    member_id: i64,
    slot_id: i64,
    state: String,
    origin: String,
    excused_reason: Option<String>,
    account_entry_id: Option<i64>,
    last_state_update: String,
    reminder_sent: i32,
}

impl AttendanceRow {
    fn into_attendance(self) -> Result<Attendance, PersistenceError> {
        Ok(Attendance {
            attendance_id: Some(self.attendance_id),
            member_id: self.member_id,
            slot_id: self.slot_id,
            state: self.state.parse::<AttendanceState>()?,
            origin: self.origin.parse::<AttendanceOrigin>()?,
            excused_reason: self.excused_reason,
            account_entry_id: self.account_entry_id,
            last_state_update: parse_datetime(&self.last_state_update)?,
            reminder_sent: flag(self.reminder_sent),
        })
    }
}

fn into_pairs(
    rows: Vec<(AttendanceRow, ShiftRow)>,
) -> Result<Vec<(Attendance, Shift)>, PersistenceError> {
    rows.into_iter()
        .map(|(attendance, shift)| Ok((attendance.into_attendance()?, shift.into_shift()?)))
        .collect()
}

fn count_to_usize(count: i64) -> Result<usize, PersistenceError> {
    usize::try_from(count)
        .map_err(|_| PersistenceError::ReconstructionError(format!("invalid row count {count}")))
}

/// Retrieves an attendance by ID.
///
/// # Errors
///
/// Returns an error if the query fails or the row is malformed.
pub fn get_attendance(
    conn: &mut SqliteConnection,
    attendance_id: i64,
) -> Result<Option<Attendance>, PersistenceError> {
    shift_attendances::table
        .filter(shift_attendances::attendance_id.eq(attendance_id))
        .select(AttendanceRow::as_select())
        .first(conn)
        .optional()?
        .map(AttendanceRow::into_attendance)
        .transpose()
}

/// Lists every attendance of a slot, whatever its state.
///
/// # Errors
///
/// Returns an error if the query fails or a row is malformed.
pub fn list_attendances_for_slot(
    conn: &mut SqliteConnection,
    slot_id: i64,
) -> Result<Vec<Attendance>, PersistenceError> {
    shift_attendances::table
        .filter(shift_attendances::slot_id.eq(slot_id))
        .order(shift_attendances::attendance_id.asc())
        .select(AttendanceRow::as_select())
        .load(conn)?
        .into_iter()
        .map(AttendanceRow::into_attendance)
        .collect()
}

/// Returns `true` if the member holds a valid attendance on any slot of the shift.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn member_has_valid_attendance_on_shift(
    conn: &mut SqliteConnection,
    member_id: i64,
    shift_id: i64,
) -> Result<bool, PersistenceError> {
    let count: i64 = shift_attendances::table
        .inner_join(shift_slots::table)
        .filter(shift_slots::shift_id.eq(shift_id))
        .filter(shift_attendances::member_id.eq(member_id))
        .filter(shift_attendances::state.eq_any(VALID_STATES))
        .count()
        .get_result(conn)?;
    Ok(count > 0)
}

/// Counts the valid attendances on all slots of a shift.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_valid_attendances_for_shift(
    conn: &mut SqliteConnection,
    shift_id: i64,
) -> Result<usize, PersistenceError> {
    let count: i64 = shift_attendances::table
        .inner_join(shift_slots::table)
        .filter(shift_slots::shift_id.eq(shift_id))
        .filter(shift_attendances::state.eq_any(VALID_STATES))
        .count()
        .get_result(conn)?;
    count_to_usize(count)
}

/// Lists a member's attendances on shifts starting at or after `from`.
///
/// # Errors
///
/// Returns an error if the query fails or a row is malformed.
pub fn list_member_attendances_from(
    conn: &mut SqliteConnection,
    member_id: i64,
    from: PrimitiveDateTime,
) -> Result<Vec<(Attendance, Shift)>, PersistenceError> {
    let rows: Vec<(AttendanceRow, ShiftRow)> = shift_attendances::table
        .inner_join(shift_slots::table.inner_join(shifts::table))
        .filter(shift_attendances::member_id.eq(member_id))
        .filter(shifts::start_time.ge(format_datetime(from)?))
        .order((shifts::start_time.asc(), shift_attendances::attendance_id.asc()))
        .select((AttendanceRow::as_select(), ShiftRow::as_select()))
        .load(conn)?;
    into_pairs(rows)
}

/// Lists a member's attendances on slots generated from a slot template.
///
/// # Errors
///
/// Returns an error if the query fails or a row is malformed.
pub fn list_member_attendances_for_slot_template(
    conn: &mut SqliteConnection,
    member_id: i64,
    slot_template_id: i64,
) -> Result<Vec<(Attendance, Shift)>, PersistenceError> {
    let rows: Vec<(AttendanceRow, ShiftRow)> = shift_attendances::table
        .inner_join(shift_slots::table.inner_join(shifts::table))
        .filter(shift_attendances::member_id.eq(member_id))
        .filter(shift_slots::slot_template_id.eq(slot_template_id))
        .order((shifts::start_time.asc(), shift_attendances::attendance_id.asc()))
        .select((AttendanceRow::as_select(), ShiftRow::as_select()))
        .load(conn)?;
    into_pairs(rows)
}

/// Counts a member's pending or stand-in attendances on non-cancelled
/// shifts starting in `[from, until)`.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_upcoming_expected_attendances(
    conn: &mut SqliteConnection,
    member_id: i64,
    from: PrimitiveDateTime,
    until: PrimitiveDateTime,
) -> Result<usize, PersistenceError> {
    let count: i64 = shift_attendances::table
        .inner_join(shift_slots::table.inner_join(shifts::table))
        .filter(shift_attendances::member_id.eq(member_id))
        .filter(shift_attendances::state.eq_any(EXPECTED_STATES))
        .filter(shifts::cancelled.eq(0))
        .filter(shifts::start_time.ge(format_datetime(from)?))
        .filter(shifts::start_time.lt(format_datetime(until)?))
        .count()
        .get_result(conn)?;
    count_to_usize(count)
}

/// Counts a member's non-cancelled attendances on shifts starting in
/// `[from, until)`.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_member_attendances_between(
    conn: &mut SqliteConnection,
    member_id: i64,
    from: PrimitiveDateTime,
    until: PrimitiveDateTime,
) -> Result<usize, PersistenceError> {
    let count: i64 = shift_attendances::table
        .inner_join(shift_slots::table.inner_join(shifts::table))
        .filter(shift_attendances::member_id.eq(member_id))
        .filter(shift_attendances::state.ne(AttendanceState::Cancelled.as_str()))
        .filter(shifts::start_time.ge(format_datetime(from)?))
        .filter(shifts::start_time.lt(format_datetime(until)?))
        .count()
        .get_result(conn)?;
    count_to_usize(count)
}

/// Lists pending attendances without a reminder on non-cancelled shifts
/// starting in `[from, until)`.
///
/// # Errors
///
/// Returns an error if the query fails or a row is malformed.
pub fn list_pending_attendances_starting_between(
    conn: &mut SqliteConnection,
    from: PrimitiveDateTime,
    until: PrimitiveDateTime,
) -> Result<Vec<(Attendance, Shift)>, PersistenceError> {
    let rows: Vec<(AttendanceRow, ShiftRow)> = shift_attendances::table
        .inner_join(shift_slots::table.inner_join(shifts::table))
        .filter(shift_attendances::state.eq(AttendanceState::Pending.as_str()))
        .filter(shift_attendances::reminder_sent.eq(0))
        .filter(shifts::cancelled.eq(0))
        .filter(shifts::start_time.ge(format_datetime(from)?))
        .filter(shifts::start_time.lt(format_datetime(until)?))
        .order((shifts::start_time.asc(), shift_attendances::attendance_id.asc()))
        .select((AttendanceRow::as_select(), ShiftRow::as_select()))
        .load(conn)?;
    into_pairs(rows)
}

/// Returns the member's oldest done attendance that was not given to the
/// solidarity pool.
///
/// # Errors
///
/// Returns an error if the query fails or the row is malformed.
pub fn first_done_attendance_not_given(
    conn: &mut SqliteConnection,
    member_id: i64,
) -> Result<Option<Attendance>, PersistenceError> {
    let given = solidarity_shifts::table.select(solidarity_shifts::gifted_attendance_id);
    shift_attendances::table
        .filter(shift_attendances::member_id.eq(member_id))
        .filter(shift_attendances::state.eq(AttendanceState::Done.as_str()))
        .filter(diesel::dsl::not(shift_attendances::attendance_id.eq_any(given)))
        .order(shift_attendances::attendance_id.asc())
        .select(AttendanceRow::as_select())
        .first(conn)
        .optional()?
        .map(AttendanceRow::into_attendance)
        .transpose()
}
