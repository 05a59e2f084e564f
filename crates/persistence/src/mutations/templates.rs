// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Recurring definition writes.

use coop_shifts_domain::{
    AttendanceTemplate, ShiftTemplate, SlotTemplate, WeekGroup, join_capabilities,
};
use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::info;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::{format_optional_date, format_time};
use crate::diesel_schema::{attendance_templates, shift_templates, slot_templates};
use crate::error::PersistenceError;

/// Inserts a shift template.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_shift_template(
    conn: &mut SqliteConnection,
    template: &ShiftTemplate,
) -> Result<i64, PersistenceError> {
    let num_required_attendances: i32 = i32::try_from(template.num_required_attendances)
        .map_err(|_| {
            PersistenceError::SerializationError(format!(
                "required attendances {} out of range",
                template.num_required_attendances
            ))
        })?;
    let weekday: Option<i32> = template
        .weekday
        .map(|weekday| i32::from(weekday.number_days_from_monday()));

    diesel::insert_into(shift_templates::table)
        .values((
            shift_templates::name.eq(&template.name),
            shift_templates::description.eq(&template.description),
            shift_templates::week_group.eq(template.group.as_ref().map(WeekGroup::as_str)),
            shift_templates::num_required_attendances.eq(num_required_attendances),
            shift_templates::weekday.eq(weekday),
            shift_templates::start_time.eq(format_time(template.start_time)?),
            shift_templates::end_time.eq(format_time(template.end_time)?),
            shift_templates::start_date.eq(format_optional_date(template.start_date)?),
        ))
        .execute(conn)?;

    let shift_template_id: i64 = get_last_insert_rowid(conn)?;
    info!(shift_template_id, name = %template.name, "Created shift template");
    Ok(shift_template_id)
}

/// Inserts a slot template.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_slot_template(
    conn: &mut SqliteConnection,
    slot_template: &SlotTemplate,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(slot_templates::table)
        .values((
            slot_templates::shift_template_id.eq(slot_template.shift_template_id),
            slot_templates::name.eq(&slot_template.name),
            slot_templates::required_capabilities
                .eq(join_capabilities(&slot_template.required_capabilities)),
        ))
        .execute(conn)?;
    get_last_insert_rowid(conn)
}

/// Inserts an attendance template.
///
/// # Errors
///
/// Returns `PersistenceError::ConstraintViolation` if the slot template is
/// already held.
pub fn insert_attendance_template(
    conn: &mut SqliteConnection,
    attendance_template: &AttendanceTemplate,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(attendance_templates::table)
        .values((
            attendance_templates::member_id.eq(attendance_template.member_id),
            attendance_templates::slot_template_id.eq(attendance_template.slot_template_id),
        ))
        .execute(conn)?;
    get_last_insert_rowid(conn)
}

/// Deletes an attendance template.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the template does not exist.
pub fn delete_attendance_template(
    conn: &mut SqliteConnection,
    attendance_template_id: i64,
) -> Result<(), PersistenceError> {
    let deleted: usize = diesel::delete(
        attendance_templates::table
            .filter(attendance_templates::attendance_template_id.eq(attendance_template_id)),
    )
    .execute(conn)?;
    if deleted == 0 {
        return Err(PersistenceError::NotFound(format!(
            "attendance template {attendance_template_id}"
        )));
    }
    Ok(())
}
