// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use coop_shifts_domain::NotificationLogEntry;
use diesel::SqliteConnection;
use diesel::prelude::*;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::format_datetime;
use crate::diesel_schema::notification_log;
use crate::error::PersistenceError;

/// Records a sent notification.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_notification_log(
    conn: &mut SqliteConnection,
    entry: &NotificationLogEntry,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(notification_log::table)
        .values((
            notification_log::member_id.eq(entry.member_id),
            notification_log::kind.eq(entry.kind.id()),
            notification_log::shift_id.eq(entry.shift_id),
            notification_log::created_at.eq(format_datetime(entry.created_at)?),
        ))
        .execute(conn)?;
    get_last_insert_rowid(conn)
}
