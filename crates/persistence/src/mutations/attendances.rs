// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Attendance writes.
//!
//! The partial unique index on `shift_attendances(slot_id)` rejects a
//! second valid attendance on a slot, so callers must release a slot
//! before handing it to someone else.

use coop_shifts_domain::Attendance;
use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::debug;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::{format_datetime, to_flag};
use crate::diesel_schema::shift_attendances;
use crate::error::PersistenceError;

/// Inserts an attendance.
///
/// # Errors
///
/// Returns `PersistenceError::ConstraintViolation` if the slot already has
/// a valid attendance.
pub fn insert_attendance(
    conn: &mut SqliteConnection,
    attendance: &Attendance,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(shift_attendances::table)
        .values((
            shift_attendances::member_id.eq(attendance.member_id),
            shift_attendances::slot_id.eq(attendance.slot_id),
            shift_attendances::state.eq(attendance.state.as_str()),
            shift_attendances::origin.eq(attendance.origin.as_str()),
            shift_attendances::excused_reason.eq(&attendance.excused_reason),
            shift_attendances::account_entry_id.eq(attendance.account_entry_id),
            shift_attendances::last_state_update.eq(format_datetime(attendance.last_state_update)?),
            shift_attendances::reminder_sent.eq(to_flag(attendance.reminder_sent)),
        ))
        .execute(conn)?;

    let attendance_id: i64 = get_last_insert_rowid(conn)?;
    debug!(
        attendance_id,
        member_id = attendance.member_id,
        slot_id = attendance.slot_id,
        "Created attendance"
    );
    Ok(attendance_id)
}

/// Rewrites the mutable columns of a stored attendance.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the attendance does not exist.
pub fn update_attendance(
    conn: &mut SqliteConnection,
    attendance_id: i64,
    attendance: &Attendance,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(
        shift_attendances::table.filter(shift_attendances::attendance_id.eq(attendance_id)),
    )
    .set((
        shift_attendances::member_id.eq(attendance.member_id),
        shift_attendances::state.eq(attendance.state.as_str()),
        shift_attendances::origin.eq(attendance.origin.as_str()),
        shift_attendances::excused_reason.eq(&attendance.excused_reason),
        shift_attendances::account_entry_id.eq(attendance.account_entry_id),
        shift_attendances::last_state_update.eq(format_datetime(attendance.last_state_update)?),
        shift_attendances::reminder_sent.eq(to_flag(attendance.reminder_sent)),
    ))
    .execute(conn)?;
    if updated == 0 {
        return Err(PersistenceError::NotFound(format!("attendance {attendance_id}")));
    }
    debug!(attendance_id, state = %attendance.state, "Updated attendance");
    Ok(())
}

/// Deletes an attendance.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the attendance does not exist.
pub fn delete_attendance(
    conn: &mut SqliteConnection,
    attendance_id: i64,
) -> Result<(), PersistenceError> {
    let deleted: usize = diesel::delete(
        shift_attendances::table.filter(shift_attendances::attendance_id.eq(attendance_id)),
    )
    .execute(conn)?;
    if deleted == 0 {
        return Err(PersistenceError::NotFound(format!("attendance {attendance_id}")));
    }
    Ok(())
}

/// Marks the reminder of an attendance as sent.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn mark_reminder_sent(
    conn: &mut SqliteConnection,
    attendance_id: i64,
) -> Result<(), PersistenceError> {
    diesel::update(
        shift_attendances::table.filter(shift_attendances::attendance_id.eq(attendance_id)),
    )
    .set(shift_attendances::reminder_sent.eq(1))
    .execute(conn)?;
    Ok(())
}
