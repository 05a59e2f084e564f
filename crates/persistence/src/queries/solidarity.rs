// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Solidarity pool queries.

use coop_shifts_domain::SolidarityShift;
use diesel::SqliteConnection;
use diesel::prelude::*;

use crate::data_models::{parse_date, parse_optional_date};
use crate::diesel_schema::solidarity_shifts;
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = solidarity_shifts)]
struct SolidarityShiftRow {
    solidarity_shift_id: i64,
    gifted_attendance_id: i64,
    date_gifted: String,
    used_by_member_id: Option<i64>,
    date_used: Option<String>,
}

impl SolidarityShiftRow {
    fn into_solidarity_shift(self) -> Result<SolidarityShift, PersistenceError> {
        Ok(SolidarityShift {
            solidarity_shift_id: Some(self.solidarity_shift_id),
            gifted_attendance_id: self.gifted_attendance_id,
            date_gifted: parse_date(&self.date_gifted)?,
            used_by_member_id: self.used_by_member_id,
            date_used: parse_optional_date(self.date_used.as_deref())?,
        })
    }
}

/// Returns the oldest unused solidarity shift.
///
/// # Errors
///
/// Returns an error if the query fails or the row is malformed.
pub fn first_available_solidarity_shift(
    conn: &mut SqliteConnection,
) -> Result<Option<SolidarityShift>, PersistenceError> {
    solidarity_shifts::table
        .filter(solidarity_shifts::used_by_member_id.is_null())
        .order(solidarity_shifts::solidarity_shift_id.asc())
        .select(SolidarityShiftRow::as_select())
        .first(conn)
        .optional()?
        .map(SolidarityShiftRow::into_solidarity_shift)
        .transpose()
}

/// Counts the unused solidarity shifts.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_available_solidarity_shifts(
    conn: &mut SqliteConnection,
) -> Result<i64, PersistenceError> {
    Ok(solidarity_shifts::table
        .filter(solidarity_shifts::used_by_member_id.is_null())
        .count()
        .get_result(conn)?)
}

/// Lists the solidarity shifts a member received.
///
/// # Errors
///
/// Returns an error if the query fails or a row is malformed.
pub fn list_solidarity_shifts_used_by(
    conn: &mut SqliteConnection,
    member_id: i64,
) -> Result<Vec<SolidarityShift>, PersistenceError> {
    solidarity_shifts::table
        .filter(solidarity_shifts::used_by_member_id.eq(member_id))
        .order(solidarity_shifts::solidarity_shift_id.asc())
        .select(SolidarityShiftRow::as_select())
        .load(conn)?
        .into_iter()
        .map(SolidarityShiftRow::into_solidarity_shift)
        .collect()
}
