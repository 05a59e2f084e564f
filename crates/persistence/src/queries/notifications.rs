// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Notification log queries.

use coop_shifts_domain::{NotificationKind, NotificationLogEntry};
use diesel::SqliteConnection;
use diesel::prelude::*;
use time::PrimitiveDateTime;

use crate::data_models::{format_datetime, parse_datetime};
use crate::diesel_schema::notification_log;
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = notification_log)]
struct NotificationLogRow {
    log_id: i64,
    member_id: i64,
    kind: String,
    shift_id: Option<i64>,
    created_at: String,
}

impl NotificationLogRow {
    fn into_entry(self) -> Result<NotificationLogEntry, PersistenceError> {
        Ok(NotificationLogEntry {
            log_id: Some(self.log_id),
            member_id: self.member_id,
            kind: self.kind.parse::<NotificationKind>()?,
            shift_id: self.shift_id,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

/// Returns the most recent notification of `kind` sent to the member.
///
/// # Errors
///
/// Returns an error if the query fails or the row is malformed.
pub fn latest_notification(
    conn: &mut SqliteConnection,
    member_id: i64,
    kind: NotificationKind,
) -> Result<Option<NotificationLogEntry>, PersistenceError> {
    notification_log::table
        .filter(notification_log::member_id.eq(member_id))
        .filter(notification_log::kind.eq(kind.id()))
        .order((
            notification_log::created_at.desc(),
            notification_log::log_id.desc(),
        ))
        .select(NotificationLogRow::as_select())
        .first(conn)
        .optional()?
        .map(NotificationLogRow::into_entry)
        .transpose()
}

/// Returns `true` if a notification of `kind` about `shift_id` was sent to
/// the member at or after `since`.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn notification_exists(
    conn: &mut SqliteConnection,
    member_id: i64,
    kind: NotificationKind,
    shift_id: Option<i64>,
    since: PrimitiveDateTime,
) -> Result<bool, PersistenceError> {
    let base = notification_log::table
        .filter(notification_log::member_id.eq(member_id))
        .filter(notification_log::kind.eq(kind.id()))
        .filter(notification_log::created_at.ge(format_datetime(since)?));
    let count: i64 = match shift_id {
        Some(shift_id) => base
            .filter(notification_log::shift_id.eq(shift_id))
            .count()
            .get_result(conn)?,
        None => base
            .filter(notification_log::shift_id.is_null())
            .count()
            .get_result(conn)?,
    };
    Ok(count > 0)
}

/// Lists every notification sent to a member, oldest first.
///
/// # Errors
///
/// Returns an error if the query fails or a row is malformed.
pub fn list_notifications(
    conn: &mut SqliteConnection,
    member_id: i64,
) -> Result<Vec<NotificationLogEntry>, PersistenceError> {
    notification_log::table
        .filter(notification_log::member_id.eq(member_id))
        .order((
            notification_log::created_at.asc(),
            notification_log::log_id.asc(),
        ))
        .select(NotificationLogRow::as_select())
        .load(conn)?
        .into_iter()
        .map(NotificationLogRow::into_entry)
        .collect()
}
