// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use coop_shifts_domain::SolidarityShift;
use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::debug;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::{format_date, format_optional_date};
use crate::diesel_schema::solidarity_shifts;
use crate::error::PersistenceError;

/// Adds a shift to the solidarity pool.
///
/// # Errors
///
/// Returns `PersistenceError::ConstraintViolation` if the attendance was
/// already given away.
pub fn insert_solidarity_shift(
    conn: &mut SqliteConnection,
    shift: &SolidarityShift,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(solidarity_shifts::table)
        .values((
            solidarity_shifts::gifted_attendance_id.eq(shift.gifted_attendance_id),
            solidarity_shifts::date_gifted.eq(format_date(shift.date_gifted)?),
            solidarity_shifts::used_by_member_id.eq(shift.used_by_member_id),
            solidarity_shifts::date_used.eq(format_optional_date(shift.date_used)?),
        ))
        .execute(conn)?;
    let solidarity_shift_id: i64 = get_last_insert_rowid(conn)?;
    debug!(
        solidarity_shift_id,
        attendance_id = shift.gifted_attendance_id,
        "Added solidarity shift"
    );
    Ok(solidarity_shift_id)
}

/// Records who used a solidarity shift.
///
/// Only an unused shift is updated.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if no unused shift has this ID.
pub fn mark_solidarity_shift_used(
    conn: &mut SqliteConnection,
    solidarity_shift_id: i64,
    shift: &SolidarityShift,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(
        solidarity_shifts::table
            .filter(solidarity_shifts::solidarity_shift_id.eq(solidarity_shift_id))
            .filter(solidarity_shifts::used_by_member_id.is_null()),
    )
    .set((
        solidarity_shifts::used_by_member_id.eq(shift.used_by_member_id),
        solidarity_shifts::date_used.eq(format_optional_date(shift.date_used)?),
    ))
    .execute(conn)?;
    if updated == 0 {
        return Err(PersistenceError::NotFound(format!(
            "unused solidarity shift {solidarity_shift_id}"
        )));
    }
    Ok(())
}
