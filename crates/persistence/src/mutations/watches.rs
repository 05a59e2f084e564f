// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shift watch writes.

use coop_shifts_domain::{
    RecurringShiftWatch, ShiftWatch, StaffingStatus, WeekGroup, join_staffing_statuses,
};
use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::debug;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::{join_list, join_weekdays};
use crate::diesel_schema::{recurring_shift_watches, shift_watches};
use crate::error::PersistenceError;

/// Inserts a shift watch.
///
/// # Errors
///
/// Returns `PersistenceError::ConstraintViolation` if the member already
/// watches the shift.
pub fn insert_shift_watch(
    conn: &mut SqliteConnection,
    watch: &ShiftWatch,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(shift_watches::table)
        .values((
            shift_watches::member_id.eq(watch.member_id),
            shift_watches::shift_id.eq(watch.shift_id),
            shift_watches::watched_statuses.eq(join_staffing_statuses(&watch.watched_statuses)),
            shift_watches::last_status.eq(watch.last_status.as_ref().map(StaffingStatus::as_str)),
            shift_watches::recurring_watch_id.eq(watch.recurring_watch_id),
        ))
        .execute(conn)?;
    let shift_watch_id: i64 = get_last_insert_rowid(conn)?;
    debug!(
        shift_watch_id,
        member_id = watch.member_id,
        shift_id = watch.shift_id,
        "Created shift watch"
    );
    Ok(shift_watch_id)
}

/// Stores the status last seen by a watch.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the watch does not exist.
pub fn update_shift_watch_status(
    conn: &mut SqliteConnection,
    shift_watch_id: i64,
    last_status: Option<StaffingStatus>,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(
        shift_watches::table.filter(shift_watches::shift_watch_id.eq(shift_watch_id)),
    )
    .set(shift_watches::last_status.eq(last_status.as_ref().map(StaffingStatus::as_str)))
    .execute(conn)?;
    if updated == 0 {
        return Err(PersistenceError::NotFound(format!("shift watch {shift_watch_id}")));
    }
    Ok(())
}

/// Inserts a recurring shift watch.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_recurring_shift_watch(
    conn: &mut SqliteConnection,
    watch: &RecurringShiftWatch,
) -> Result<i64, PersistenceError> {
    let groups: Vec<&str> = watch.week_groups.iter().map(WeekGroup::as_str).collect();
    diesel::insert_into(recurring_shift_watches::table)
        .values((
            recurring_shift_watches::member_id.eq(watch.member_id),
            recurring_shift_watches::weekdays.eq(join_weekdays(&watch.weekdays)),
            recurring_shift_watches::week_groups.eq(join_list(&groups)),
            recurring_shift_watches::shift_template_ids.eq(join_list(&watch.shift_template_ids)),
            recurring_shift_watches::watched_statuses
                .eq(join_staffing_statuses(&watch.watched_statuses)),
        ))
        .execute(conn)?;
    get_last_insert_rowid(conn)
}
