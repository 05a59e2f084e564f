// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use coop_shifts_domain::ShiftPartnerChange;
use diesel::SqliteConnection;
use diesel::prelude::*;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::format_datetime;
use crate::diesel_schema::shift_partner_changes;
use crate::error::PersistenceError;

/// Appends a shift partner change.
///
/// # Errors
///
/// Returns `PersistenceError::ConstraintViolation` if a member is named as
/// their own partner.
pub fn insert_shift_partner_change(
    conn: &mut SqliteConnection,
    change: &ShiftPartnerChange,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(shift_partner_changes::table)
        .values((
            shift_partner_changes::member_id.eq(change.member_id),
            shift_partner_changes::partner_id.eq(change.partner_id),
            shift_partner_changes::changed_at.eq(format_datetime(change.changed_at)?),
        ))
        .execute(conn)?;
    get_last_insert_rowid(conn)
}
