// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use coop_shifts_domain::ShiftPartnerChange;
use diesel::SqliteConnection;
use diesel::prelude::*;

use crate::data_models::parse_datetime;
use crate::diesel_schema::shift_partner_changes;
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = shift_partner_changes)]
struct ShiftPartnerChangeRow {
    change_id: i64,
    member_id: i64,
    partner_id: Option<i64>,
    changed_at: String,
}

/// Lists a member's shift partner changes, oldest first.
///
/// # Errors
///
/// Returns an error if the query fails or a row is malformed.
pub fn list_shift_partner_changes(
    conn: &mut SqliteConnection,
    member_id: i64,
) -> Result<Vec<ShiftPartnerChange>, PersistenceError> {
    shift_partner_changes::table
        .filter(shift_partner_changes::member_id.eq(member_id))
        .order((
            shift_partner_changes::changed_at.asc(),
            shift_partner_changes::change_id.asc(),
        ))
        .select(ShiftPartnerChangeRow::as_select())
        .load(conn)?
        .into_iter()
        .map(|row: ShiftPartnerChangeRow| {
            Ok(ShiftPartnerChange {
                change_id: Some(row.change_id),
                member_id: row.member_id,
                partner_id: row.partner_id,
                changed_at: parse_datetime(&row.changed_at)?,
            })
        })
        .collect()
}
