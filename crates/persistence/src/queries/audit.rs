// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Audit event queries.

use coop_shifts_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::debug;

use crate::data_models::{ActionData, ActorData, CauseData, StateSnapshotData, parse_datetime};
use crate::diesel_schema::audit_events;
use crate::error::PersistenceError;

/// Diesel Queryable struct for audit event rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = audit_events)]
struct AuditEventRow {
    event_id: i64,
    member_id: Option<i64>,
    #[allow(dead_code)]
    action_name: String,
    actor_json: String,
    cause_json: String,
    action_json: String,
    before_snapshot_json: String,
    after_snapshot_json: String,
    occurred_at: String,
}

impl AuditEventRow {
    fn into_event(self) -> Result<AuditEvent, PersistenceError> {
        let actor_data: ActorData = serde_json::from_str(&self.actor_json)?;
        let cause_data: CauseData = serde_json::from_str(&self.cause_json)?;
        let action_data: ActionData = serde_json::from_str(&self.action_json)?;
        let before_data: StateSnapshotData = serde_json::from_str(&self.before_snapshot_json)?;
        let after_data: StateSnapshotData = serde_json::from_str(&self.after_snapshot_json)?;

        let event: AuditEvent = AuditEvent::new(
            Actor::new(actor_data.id, actor_data.actor_type),
            Cause::new(cause_data.id, cause_data.description),
            Action::new(action_data.name, action_data.details),
            StateSnapshot::new(before_data.data),
            StateSnapshot::new(after_data.data),
            self.member_id,
            parse_datetime(&self.occurred_at)?,
        );
        Ok(event.with_id(self.event_id))
    }
}

/// Retrieves an audit event by ID.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the event does not exist, or an
/// error if it cannot be deserialized.
pub fn get_audit_event(
    conn: &mut SqliteConnection,
    event_id: i64,
) -> Result<AuditEvent, PersistenceError> {
    let result: Result<AuditEventRow, diesel::result::Error> = audit_events::table
        .filter(audit_events::event_id.eq(event_id))
        .select(AuditEventRow::as_select())
        .first(conn);

    match result {
        Ok(row) => row.into_event(),
        Err(diesel::result::Error::NotFound) => Err(PersistenceError::NotFound(format!(
            "audit event {event_id}"
        ))),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Lists a member's audit events with one of the given action names,
/// oldest first.
///
/// # Errors
///
/// Returns an error if the query fails or an event cannot be deserialized.
pub fn list_member_audit_events(
    conn: &mut SqliteConnection,
    member_id: i64,
    action_names: &[&str],
) -> Result<Vec<AuditEvent>, PersistenceError> {
    debug!(member_id, ?action_names, "Loading audit history");
    let names: Vec<&str> = action_names.to_vec();

    audit_events::table
        .filter(audit_events::member_id.eq(member_id))
        .filter(audit_events::action_name.eq_any(names))
        .order((audit_events::occurred_at.asc(), audit_events::event_id.asc()))
        .select(AuditEventRow::as_select())
        .load(conn)?
        .into_iter()
        .map(AuditEventRow::into_event)
        .collect()
}
