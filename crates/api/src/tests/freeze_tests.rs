// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use coop_shifts_domain::{
    Attendance, AttendanceMode, AttendanceState, Member, NotificationKind, Shift, ShiftPolicy,
    ShiftTemplate, SlotTemplate,
};
use coop_shifts_persistence::Persistence;
use time::Duration;
use time::macros::date;

use crate::tests::helpers::{
    NOW, RecordingTransport, create_test_actor, create_test_cause, create_test_persistence,
    insert_test_entry, insert_test_member, insert_test_templates,
};
use crate::{
    FreezeCheckSummary, create_shift, get_attendance_mode, register_member_to_slot_template,
    run_freeze_checks, should_freeze_member, should_send_freeze_warning, should_unfreeze_member,
};

#[test]
fn test_long_deficit_freezes_and_withdraws_recurring_slot() {
    let mut persistence: Persistence = create_test_persistence();
    let transport: RecordingTransport = RecordingTransport::default();
    let policy: ShiftPolicy = ShiftPolicy::default();
    let member: Member = insert_test_member(&mut persistence, "ada@example.org");
    let member_id: i64 = member.member_id.unwrap();
    let (template, slot_template): (ShiftTemplate, SlotTemplate) =
        insert_test_templates(&mut persistence);
    register_member_to_slot_template(
        &mut persistence,
        member_id,
        slot_template.slot_template_id.unwrap(),
        &create_test_actor(),
        &create_test_cause(),
        NOW,
    )
    .unwrap();
    let shift: Shift = create_shift(
        &mut persistence,
        template.shift_template_id.unwrap(),
        date!(2024 - 03 - 11),
        NOW,
    )
    .unwrap();
    insert_test_entry(&mut persistence, member_id, -5, 20);

    assert!(should_freeze_member(&mut persistence, member_id, &policy, NOW).unwrap());
    let summary: FreezeCheckSummary =
        run_freeze_checks(&mut persistence, &transport, &policy, NOW).unwrap();

    assert_eq!(summary.frozen, 1);
    assert_eq!(summary.failed, 0);
    assert!(persistence.get_member(member_id).unwrap().unwrap().is_frozen);
    assert!(
        persistence
            .list_attendance_templates_for_member(member_id)
            .unwrap()
            .is_empty()
    );
    let attendances: Vec<(Attendance, Shift)> = persistence
        .list_member_attendances_from(member_id, NOW)
        .unwrap();
    assert_eq!(attendances.len(), 1);
    assert_eq!(attendances[0].1.shift_id, shift.shift_id);
    assert_eq!(attendances[0].0.state, AttendanceState::Cancelled);
    assert_eq!(transport.delivered_kinds(), vec![NotificationKind::MemberFrozen]);
    assert_eq!(
        get_attendance_mode(&mut persistence, member_id, NOW + Duration::minutes(1)).unwrap(),
        AttendanceMode::Frozen
    );
}

#[test]
fn test_recent_deficit_warns_once() {
    let mut persistence: Persistence = create_test_persistence();
    let transport: RecordingTransport = RecordingTransport::default();
    let policy: ShiftPolicy = ShiftPolicy::default();
    let member: Member = insert_test_member(&mut persistence, "ada@example.org");
    let member_id: i64 = member.member_id.unwrap();
    insert_test_entry(&mut persistence, member_id, -4, 2);

    assert!(!should_freeze_member(&mut persistence, member_id, &policy, NOW).unwrap());
    assert!(should_send_freeze_warning(&mut persistence, member_id, &policy, NOW).unwrap());

    let first: FreezeCheckSummary =
        run_freeze_checks(&mut persistence, &transport, &policy, NOW).unwrap();
    let second: FreezeCheckSummary =
        run_freeze_checks(&mut persistence, &transport, &policy, NOW).unwrap();

    assert_eq!(first.warned, 1);
    assert_eq!(second.warned, 0);
    assert_eq!(transport.delivered_kinds(), vec![NotificationKind::FreezeWarning]);
    assert!(!persistence.get_member(member_id).unwrap().unwrap().is_frozen);
}

#[test]
fn test_failed_warning_is_retried_on_the_next_run() {
    let mut persistence: Persistence = create_test_persistence();
    let policy: ShiftPolicy = ShiftPolicy::default();
    let member: Member = insert_test_member(&mut persistence, "ada@example.org");
    let member_id: i64 = member.member_id.unwrap();
    insert_test_entry(&mut persistence, member_id, -4, 2);

    let refused: FreezeCheckSummary = run_freeze_checks(
        &mut persistence,
        &RecordingTransport::refusing(),
        &policy,
        NOW,
    )
    .unwrap();
    assert_eq!(refused.failed, 1);
    assert!(persistence.list_notifications(member_id).unwrap().is_empty());

    let transport: RecordingTransport = RecordingTransport::default();
    let retried: FreezeCheckSummary =
        run_freeze_checks(&mut persistence, &transport, &policy, NOW).unwrap();
    assert_eq!(retried.warned, 1);
}

#[test]
fn test_upcoming_registrations_prevent_freezing() {
    let mut persistence: Persistence = create_test_persistence();
    let policy: ShiftPolicy = ShiftPolicy::default();
    let member: Member = insert_test_member(&mut persistence, "ada@example.org");
    let member_id: i64 = member.member_id.unwrap();
    let (template, slot_template): (ShiftTemplate, SlotTemplate) =
        insert_test_templates(&mut persistence);
    register_member_to_slot_template(
        &mut persistence,
        member_id,
        slot_template.slot_template_id.unwrap(),
        &create_test_actor(),
        &create_test_cause(),
        NOW,
    )
    .unwrap();
    for week_start in [date!(2024 - 03 - 11), date!(2024 - 03 - 18)] {
        create_shift(
            &mut persistence,
            template.shift_template_id.unwrap(),
            week_start,
            NOW,
        )
        .unwrap();
    }
    insert_test_entry(&mut persistence, member_id, -5, 20);

    assert!(!should_freeze_member(&mut persistence, member_id, &policy, NOW).unwrap());
}

#[test]
fn test_recovered_balance_unfreezes() {
    let mut persistence: Persistence = create_test_persistence();
    let transport: RecordingTransport = RecordingTransport::default();
    let policy: ShiftPolicy = ShiftPolicy::default();
    let member: Member = insert_test_member(&mut persistence, "ada@example.org");
    let member_id: i64 = member.member_id.unwrap();
    persistence.update_member_frozen(member_id, true).unwrap();
    insert_test_entry(&mut persistence, member_id, -1, 5);

    assert!(should_unfreeze_member(&mut persistence, member_id, &policy, NOW).unwrap());
    let summary: FreezeCheckSummary =
        run_freeze_checks(&mut persistence, &transport, &policy, NOW).unwrap();

    assert_eq!(summary.unfrozen, 1);
    assert!(!persistence.get_member(member_id).unwrap().unwrap().is_frozen);
    assert_eq!(transport.delivered_kinds(), vec![NotificationKind::Unfrozen]);
}

#[test]
fn test_frozen_member_below_threshold_stays_frozen() {
    let mut persistence: Persistence = create_test_persistence();
    let transport: RecordingTransport = RecordingTransport::default();
    let policy: ShiftPolicy = ShiftPolicy::default();
    let member: Member = insert_test_member(&mut persistence, "ada@example.org");
    let member_id: i64 = member.member_id.unwrap();
    persistence.update_member_frozen(member_id, true).unwrap();
    insert_test_entry(&mut persistence, member_id, -6, 30);

    let summary: FreezeCheckSummary =
        run_freeze_checks(&mut persistence, &transport, &policy, NOW).unwrap();

    assert_eq!(summary, FreezeCheckSummary::default());
    assert!(transport.delivered().is_empty());
}
