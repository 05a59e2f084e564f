// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shift and slot queries.

use coop_shifts_domain::{Shift, Slot, WeekGroup, parse_capabilities};
use diesel::SqliteConnection;
use diesel::prelude::*;
use time::PrimitiveDateTime;
use tracing::debug;

use crate::data_models::{flag, format_datetime, parse_datetime};
use crate::diesel_schema::{shift_slots, shift_templates, shifts};
use crate::error::PersistenceError;

/// Diesel Queryable struct for shift rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = shifts)]
pub(crate) struct ShiftRow {
    shift_id: i64,
    shift_template_id: Option<i64>,
    name: String,
    description: String,
    num_required_attendances: i32,
    start_time: String,
    end_time: String,
    cancelled: i32,
    cancelled_reason: Option<String>,
}

impl ShiftRow {
    pub(crate) fn into_shift(self) -> Result<Shift, PersistenceError> {
        let num_required_attendances: u32 =
            u32::try_from(self.num_required_attendances).map_err(|_| {
                PersistenceError::ReconstructionError(format!(
                    "negative required attendances on shift {}",
                    self.shift_id
                ))
            })?;
        Ok(Shift {
            shift_id: Some(self.shift_id),
            shift_template_id: self.shift_template_id,
            name: self.name,
            description: self.description,
            num_required_attendances,
            start_time: parse_datetime(&self.start_time)?,
            end_time: parse_datetime(&self.end_time)?,
            cancelled: flag(self.cancelled),
            cancelled_reason: self.cancelled_reason,
        })
    }
}

/// Diesel Queryable struct for slot rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = shift_slots)]
struct SlotRow {
    slot_id: i64,
    shift_id: i64,
    slot_template_id: Option<i64>,
    name: String,
    required_capabilities: String,
}

impl From<SlotRow> for Slot {
    fn from(row: SlotRow) -> Self {
        Self {
            slot_id: Some(row.slot_id),
            shift_id: row.shift_id,
            slot_template_id: row.slot_template_id,
            name: row.name,
            required_capabilities: parse_capabilities(&row.required_capabilities),
        }
    }
}

/// Retrieves a shift by ID.
///
/// # Errors
///
/// Returns an error if the query fails or the row is malformed.
pub fn get_shift(
    conn: &mut SqliteConnection,
    shift_id: i64,
) -> Result<Option<Shift>, PersistenceError> {
    shifts::table
        .filter(shifts::shift_id.eq(shift_id))
        .select(ShiftRow::as_select())
        .first(conn)
        .optional()?
        .map(ShiftRow::into_shift)
        .transpose()
}

/// Finds the shift generated from a template at the given start.
///
/// # Errors
///
/// Returns an error if the query fails or the row is malformed.
pub fn find_shift(
    conn: &mut SqliteConnection,
    shift_template_id: i64,
    start_time: PrimitiveDateTime,
) -> Result<Option<Shift>, PersistenceError> {
    shifts::table
        .filter(shifts::shift_template_id.eq(shift_template_id))
        .filter(shifts::start_time.eq(format_datetime(start_time)?))
        .select(ShiftRow::as_select())
        .first(conn)
        .optional()?
        .map(ShiftRow::into_shift)
        .transpose()
}

/// Lists the shifts of a template starting after `now`, soonest first.
///
/// # Errors
///
/// Returns an error if the query fails or a row is malformed.
pub fn list_future_shifts_for_template(
    conn: &mut SqliteConnection,
    shift_template_id: i64,
    now: PrimitiveDateTime,
) -> Result<Vec<Shift>, PersistenceError> {
    shifts::table
        .filter(shifts::shift_template_id.eq(shift_template_id))
        .filter(shifts::start_time.gt(format_datetime(now)?))
        .order(shifts::start_time.asc())
        .select(ShiftRow::as_select())
        .load(conn)?
        .into_iter()
        .map(ShiftRow::into_shift)
        .collect()
}

/// Lists shifts starting in `[from, until)`, cancelled ones included.
///
/// # Errors
///
/// Returns an error if the query fails or a row is malformed.
pub fn list_shifts_starting_between(
    conn: &mut SqliteConnection,
    from: PrimitiveDateTime,
    until: PrimitiveDateTime,
) -> Result<Vec<Shift>, PersistenceError> {
    shifts::table
        .filter(shifts::start_time.ge(format_datetime(from)?))
        .filter(shifts::start_time.lt(format_datetime(until)?))
        .order((shifts::start_time.asc(), shifts::shift_id.asc()))
        .select(ShiftRow::as_select())
        .load(conn)?
        .into_iter()
        .map(ShiftRow::into_shift)
        .collect()
}

/// Lists live shifts starting after `from`.
///
/// # Errors
///
/// Returns an error if the query fails or a row is malformed.
pub fn list_live_shifts_after(
    conn: &mut SqliteConnection,
    from: PrimitiveDateTime,
) -> Result<Vec<Shift>, PersistenceError> {
    shifts::table
        .filter(shifts::cancelled.eq(0))
        .filter(shifts::start_time.gt(format_datetime(from)?))
        .order((shifts::start_time.asc(), shifts::shift_id.asc()))
        .select(ShiftRow::as_select())
        .load(conn)?
        .into_iter()
        .map(ShiftRow::into_shift)
        .collect()
}

/// Returns the start of the earliest shift.
///
/// Shifts generated from week group A templates are preferred, since the
/// cycle calendar is anchored on them. Without any, the earliest shift of
/// any kind is used.
///
/// # Errors
///
/// Returns an error if the query fails or the stored value is malformed.
pub fn get_earliest_shift_start(
    conn: &mut SqliteConnection,
) -> Result<Option<PrimitiveDateTime>, PersistenceError> {
    let group_a: Option<String> = shifts::table
        .inner_join(shift_templates::table)
        .filter(shift_templates::week_group.eq(WeekGroup::A.as_str()))
        .order(shifts::start_time.asc())
        .select(shifts::start_time)
        .first(conn)
        .optional()?;

    let earliest: Option<String> = match group_a {
        Some(start) => Some(start),
        None => {
            debug!("No week group A shift found, falling back to the earliest shift");
            shifts::table
                .order(shifts::start_time.asc())
                .select(shifts::start_time)
                .first(conn)
                .optional()?
        }
    };

    earliest.as_deref().map(parse_datetime).transpose()
}

/// Retrieves a slot by ID.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_slot(
    conn: &mut SqliteConnection,
    slot_id: i64,
) -> Result<Option<Slot>, PersistenceError> {
    Ok(shift_slots::table
        .filter(shift_slots::slot_id.eq(slot_id))
        .select(SlotRow::as_select())
        .first(conn)
        .optional()?
        .map(Slot::from))
}

/// Lists the slots of a shift.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_slots_for_shift(
    conn: &mut SqliteConnection,
    shift_id: i64,
) -> Result<Vec<Slot>, PersistenceError> {
    Ok(shift_slots::table
        .filter(shift_slots::shift_id.eq(shift_id))
        .order(shift_slots::slot_id.asc())
        .select(SlotRow::as_select())
        .load(conn)?
        .into_iter()
        .map(Slot::from)
        .collect())
}

/// Finds the slot of a shift generated from the given slot template.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn find_slot_for_slot_template(
    conn: &mut SqliteConnection,
    shift_id: i64,
    slot_template_id: i64,
) -> Result<Option<Slot>, PersistenceError> {
    Ok(shift_slots::table
        .filter(shift_slots::shift_id.eq(shift_id))
        .filter(shift_slots::slot_template_id.eq(slot_template_id))
        .select(SlotRow::as_select())
        .first(conn)
        .optional()?
        .map(Slot::from))
}
