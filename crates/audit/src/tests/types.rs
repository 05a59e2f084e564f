// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use time::macros::datetime;

fn create_test_event() -> AuditEvent {
    AuditEvent::new(
        Actor::new(String::from("manager-7"), String::from("manager")),
        Cause::new(String::from("req-456"), String::from("Manager request")),
        Action::new(String::from("UpdateFrozenStatus"), None),
        StateSnapshot::new(String::from("is_frozen=false")),
        StateSnapshot::new(String::from("is_frozen=true")),
        Some(12),
        datetime!(2024-05-01 10:00),
    )
}

#[test]
fn test_actor_creation_requires_all_fields() {
    let actor: Actor = Actor::new(String::from("member-123"), String::from("member"));

    assert_eq!(actor.id, "member-123");
    assert_eq!(actor.actor_type, "member");
}

#[test]
fn test_system_actor() {
    let actor: Actor = Actor::system("run_freeze_checks");

    assert_eq!(actor.id, "run_freeze_checks");
    assert_eq!(actor.actor_type, "system");
}

#[test]
fn test_cause_creation_requires_all_fields() {
    let cause: Cause = Cause::new(String::from("req-456"), String::from("Member request"));

    assert_eq!(cause.id, "req-456");
    assert_eq!(cause.description, "Member request");
}

#[test]
fn test_action_creation_with_details() {
    let action: Action = Action::new(
        String::from("DeleteAttendanceTemplate"),
        Some(String::from("Unregistered because frozen")),
    );

    assert_eq!(action.name, "DeleteAttendanceTemplate");
    assert_eq!(
        action.details,
        Some(String::from("Unregistered because frozen"))
    );
}

#[test]
fn test_state_snapshot_field_lookup() {
    let snapshot: StateSnapshot =
        StateSnapshot::new(String::from("state=done; account_entry=14"));

    assert_eq!(snapshot.field("state"), Some("done"));
    assert_eq!(snapshot.field("account_entry"), Some("14"));
    assert_eq!(snapshot.field("is_frozen"), None);
}

#[test]
fn test_state_snapshot_field_lookup_ignores_malformed_pairs() {
    let snapshot: StateSnapshot = StateSnapshot::new(String::from("garbage;is_frozen=true"));

    assert_eq!(snapshot.field("is_frozen"), Some("true"));
    assert_eq!(snapshot.field("garbage"), None);
}

#[test]
fn test_audit_event_creation_requires_all_fields() {
    let event: AuditEvent = create_test_event();

    assert_eq!(event.event_id, None);
    assert_eq!(event.actor.id, "manager-7");
    assert_eq!(event.action.name, "UpdateFrozenStatus");
    assert_eq!(event.before.field("is_frozen"), Some("false"));
    assert_eq!(event.after.field("is_frozen"), Some("true"));
    assert_eq!(event.member_id, Some(12));
    assert_eq!(event.occurred_at, datetime!(2024-05-01 10:00));
}

#[test]
fn test_audit_event_equality() {
    assert_eq!(create_test_event(), create_test_event());
}

#[test]
fn test_audit_event_with_id() {
    let event: AuditEvent = create_test_event().with_id(42);

    assert_eq!(event.event_id, Some(42));
    assert_ne!(event, create_test_event());
}
