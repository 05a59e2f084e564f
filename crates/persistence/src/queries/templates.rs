// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shift template, slot template and attendance template queries.

use coop_shifts_domain::{
    AttendanceTemplate, ShiftTemplate, SlotTemplate, WeekGroup, parse_capabilities,
    weekday_from_index,
};
use diesel::SqliteConnection;
use diesel::prelude::*;
use time::Weekday;

use crate::data_models::{parse_optional_date, parse_time};
use crate::diesel_schema::{attendance_templates, shift_templates, slot_templates};
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = shift_templates)]
struct ShiftTemplateRow {
    shift_template_id: i64,
    name: String,
    description: String,
    week_group: Option<String>,
    num_required_attendances: i32,
    weekday: Option<i32>,
    start_time: String,
    end_time: String,
    start_date: Option<String>,
}

impl ShiftTemplateRow {
    fn into_shift_template(self) -> Result<ShiftTemplate, PersistenceError> {
        let group: Option<WeekGroup> = self
            .week_group
            .as_deref()
            .map(str::parse::<WeekGroup>)
            .transpose()?;
        let weekday: Option<Weekday> = self
            .weekday
            .map(|index| {
                u8::try_from(index)
                    .map_err(|_| {
                        PersistenceError::ReconstructionError(format!(
                            "weekday index {index} out of range"
                        ))
                    })
                    .and_then(|index| Ok(weekday_from_index(index)?))
            })
            .transpose()?;
        let num_required_attendances: u32 =
            u32::try_from(self.num_required_attendances).map_err(|_| {
                PersistenceError::ReconstructionError(format!(
                    "negative required attendances on shift template {}",
                    self.shift_template_id
                ))
            })?;

        Ok(ShiftTemplate {
            shift_template_id: Some(self.shift_template_id),
            name: self.name,
            description: self.description,
            group,
            num_required_attendances,
            weekday,
            start_time: parse_time(&self.start_time)?,
            end_time: parse_time(&self.end_time)?,
            start_date: parse_optional_date(self.start_date.as_deref())?,
        })
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = slot_templates)]
struct SlotTemplateRow {
    slot_template_id: i64,
    shift_template_id: i64,
    name: String,
    required_capabilities: String,
}

impl SlotTemplateRow {
    fn into_slot_template(self) -> SlotTemplate {
        SlotTemplate {
            slot_template_id: Some(self.slot_template_id),
            shift_template_id: self.shift_template_id,
            name: self.name,
            required_capabilities: parse_capabilities(&self.required_capabilities),
        }
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = attendance_templates)]
struct AttendanceTemplateRow {
    attendance_template_id: i64,
    member_id: i64,
    slot_template_id: i64,
}

impl From<AttendanceTemplateRow> for AttendanceTemplate {
    fn from(row: AttendanceTemplateRow) -> Self {
        Self {
            attendance_template_id: Some(row.attendance_template_id),
            member_id: row.member_id,
            slot_template_id: row.slot_template_id,
        }
    }
}

/// Retrieves a shift template by ID.
///
/// # Errors
///
/// Returns an error if the query fails or the row is malformed.
pub fn get_shift_template(
    conn: &mut SqliteConnection,
    shift_template_id: i64,
) -> Result<Option<ShiftTemplate>, PersistenceError> {
    shift_templates::table
        .filter(shift_templates::shift_template_id.eq(shift_template_id))
        .select(ShiftTemplateRow::as_select())
        .first(conn)
        .optional()?
        .map(ShiftTemplateRow::into_shift_template)
        .transpose()
}

/// Lists every shift template ordered by ID.
///
/// # Errors
///
/// Returns an error if the query fails or a row is malformed.
pub fn list_shift_templates(
    conn: &mut SqliteConnection,
) -> Result<Vec<ShiftTemplate>, PersistenceError> {
    shift_templates::table
        .order(shift_templates::shift_template_id.asc())
        .select(ShiftTemplateRow::as_select())
        .load(conn)?
        .into_iter()
        .map(ShiftTemplateRow::into_shift_template)
        .collect()
}

/// Retrieves a slot template by ID.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_slot_template(
    conn: &mut SqliteConnection,
    slot_template_id: i64,
) -> Result<Option<SlotTemplate>, PersistenceError> {
    Ok(slot_templates::table
        .filter(slot_templates::slot_template_id.eq(slot_template_id))
        .select(SlotTemplateRow::as_select())
        .first(conn)
        .optional()?
        .map(SlotTemplateRow::into_slot_template))
}

/// Lists the slot templates of a shift template.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_slot_templates(
    conn: &mut SqliteConnection,
    shift_template_id: i64,
) -> Result<Vec<SlotTemplate>, PersistenceError> {
    Ok(slot_templates::table
        .filter(slot_templates::shift_template_id.eq(shift_template_id))
        .order(slot_templates::slot_template_id.asc())
        .select(SlotTemplateRow::as_select())
        .load(conn)?
        .into_iter()
        .map(SlotTemplateRow::into_slot_template)
        .collect())
}

/// Retrieves an attendance template by ID.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_attendance_template(
    conn: &mut SqliteConnection,
    attendance_template_id: i64,
) -> Result<Option<AttendanceTemplate>, PersistenceError> {
    Ok(attendance_templates::table
        .filter(attendance_templates::attendance_template_id.eq(attendance_template_id))
        .select(AttendanceTemplateRow::as_select())
        .first(conn)
        .optional()?
        .map(AttendanceTemplate::from))
}

/// Retrieves the holder of a slot template, if any.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_attendance_template_for_slot_template(
    conn: &mut SqliteConnection,
    slot_template_id: i64,
) -> Result<Option<AttendanceTemplate>, PersistenceError> {
    Ok(attendance_templates::table
        .filter(attendance_templates::slot_template_id.eq(slot_template_id))
        .select(AttendanceTemplateRow::as_select())
        .first(conn)
        .optional()?
        .map(AttendanceTemplate::from))
}

/// Lists the attendance templates held by a member.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_attendance_templates_for_member(
    conn: &mut SqliteConnection,
    member_id: i64,
) -> Result<Vec<AttendanceTemplate>, PersistenceError> {
    Ok(attendance_templates::table
        .filter(attendance_templates::member_id.eq(member_id))
        .order(attendance_templates::attendance_template_id.asc())
        .select(AttendanceTemplateRow::as_select())
        .load(conn)?
        .into_iter()
        .map(AttendanceTemplate::from)
        .collect())
}

/// Returns `true` if the member holds any slot template of the shift template.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn member_has_attendance_template_in_shift_template(
    conn: &mut SqliteConnection,
    member_id: i64,
    shift_template_id: i64,
) -> Result<bool, PersistenceError> {
    let count: i64 = attendance_templates::table
        .inner_join(slot_templates::table)
        .filter(attendance_templates::member_id.eq(member_id))
        .filter(slot_templates::shift_template_id.eq(shift_template_id))
        .count()
        .get_result(conn)?;
    Ok(count > 0)
}
