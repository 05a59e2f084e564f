// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use coop_shifts_domain::{Member, NotificationKind, NotificationLogEntry, Shift};
use time::Duration;

use crate::tests::{NOW, create_test_persistence, insert_test_member, insert_test_shift};
use crate::Persistence;

fn log_entry(
    member_id: i64,
    kind: NotificationKind,
    shift_id: Option<i64>,
    days_ago: i64,
) -> NotificationLogEntry {
    NotificationLogEntry {
        log_id: None,
        member_id,
        kind,
        shift_id,
        created_at: NOW - Duration::days(days_ago),
    }
}

#[test]
fn test_latest_notification_of_kind() {
    let mut persistence: Persistence = create_test_persistence();
    let member: Member = insert_test_member(&mut persistence, "mail@example.org");
    let member_id: i64 = member.member_id.unwrap();

    persistence
        .record_notification(&log_entry(member_id, NotificationKind::FreezeWarning, None, 20))
        .unwrap();
    persistence
        .record_notification(&log_entry(member_id, NotificationKind::FreezeWarning, None, 5))
        .unwrap();
    persistence
        .record_notification(&log_entry(member_id, NotificationKind::MemberFrozen, None, 1))
        .unwrap();

    let latest: NotificationLogEntry = persistence
        .latest_notification(member_id, NotificationKind::FreezeWarning)
        .unwrap()
        .unwrap();
    assert_eq!(latest.created_at, NOW - Duration::days(5));
    assert_eq!(persistence.list_notifications(member_id).unwrap().len(), 3);
}

#[test]
fn test_notification_exists_distinguishes_shifts() {
    let mut persistence: Persistence = create_test_persistence();
    let member: Member = insert_test_member(&mut persistence, "mail@example.org");
    let member_id: i64 = member.member_id.unwrap();
    let first: Shift = insert_test_shift(&mut persistence, 3);
    let second: Shift = insert_test_shift(&mut persistence, 4);

    persistence
        .record_notification(&log_entry(
            member_id,
            NotificationKind::ShiftUnderstaffed,
            first.shift_id,
            0,
        ))
        .unwrap();

    let since: time::PrimitiveDateTime = NOW - Duration::days(1);
    assert!(
        persistence
            .notification_exists(
                member_id,
                NotificationKind::ShiftUnderstaffed,
                first.shift_id,
                since
            )
            .unwrap()
    );
    assert!(
        !persistence
            .notification_exists(
                member_id,
                NotificationKind::ShiftUnderstaffed,
                second.shift_id,
                since
            )
            .unwrap()
    );
    assert!(
        !persistence
            .notification_exists(member_id, NotificationKind::ShiftUnderstaffed, None, since)
            .unwrap()
    );
}
