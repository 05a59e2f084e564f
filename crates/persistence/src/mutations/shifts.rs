// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shift and slot writes.

use coop_shifts_domain::{Shift, Slot, join_capabilities};
use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::debug;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::{format_datetime, to_flag};
use crate::diesel_schema::{shift_slots, shifts};
use crate::error::PersistenceError;

/// Inserts a shift.
///
/// # Errors
///
/// Returns `PersistenceError::ConstraintViolation` if the template already
/// has a shift at this start.
pub fn insert_shift(conn: &mut SqliteConnection, shift: &Shift) -> Result<i64, PersistenceError> {
    let num_required_attendances: i32 =
        i32::try_from(shift.num_required_attendances).map_err(|_| {
            PersistenceError::SerializationError(format!(
                "required attendances {} out of range",
                shift.num_required_attendances
            ))
        })?;

    diesel::insert_into(shifts::table)
        .values((
            shifts::shift_template_id.eq(shift.shift_template_id),
            shifts::name.eq(&shift.name),
            shifts::description.eq(&shift.description),
            shifts::num_required_attendances.eq(num_required_attendances),
            shifts::start_time.eq(format_datetime(shift.start_time)?),
            shifts::end_time.eq(format_datetime(shift.end_time)?),
            shifts::cancelled.eq(to_flag(shift.cancelled)),
            shifts::cancelled_reason.eq(&shift.cancelled_reason),
        ))
        .execute(conn)?;

    let shift_id: i64 = get_last_insert_rowid(conn)?;
    debug!(shift_id, name = %shift.name, start = %shift.start_time, "Created shift");
    Ok(shift_id)
}

/// Writes the cancellation flag and reason of a shift.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the shift does not exist.
pub fn update_shift_cancellation(
    conn: &mut SqliteConnection,
    shift_id: i64,
    cancelled: bool,
    cancelled_reason: Option<&str>,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(shifts::table.filter(shifts::shift_id.eq(shift_id)))
        .set((
            shifts::cancelled.eq(to_flag(cancelled)),
            shifts::cancelled_reason.eq(cancelled_reason),
        ))
        .execute(conn)?;
    if updated == 0 {
        return Err(PersistenceError::NotFound(format!("shift {shift_id}")));
    }
    Ok(())
}

/// Inserts a slot.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_slot(conn: &mut SqliteConnection, slot: &Slot) -> Result<i64, PersistenceError> {
    diesel::insert_into(shift_slots::table)
        .values((
            shift_slots::shift_id.eq(slot.shift_id),
            shift_slots::slot_template_id.eq(slot.slot_template_id),
            shift_slots::name.eq(&slot.name),
            shift_slots::required_capabilities.eq(join_capabilities(&slot.required_capabilities)),
        ))
        .execute(conn)?;
    get_last_insert_rowid(conn)
}
