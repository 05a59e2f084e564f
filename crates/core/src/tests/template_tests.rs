// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{
    NOW, create_test_actor, create_test_attendance, create_test_cause, create_test_member,
    create_test_shift, create_test_slot,
};
use crate::{
    AttendanceTemplatePlan, CoreError, SlotReconciliation, SlotReconciliationFacts,
    TemplateWithdrawal, plan_attendance_template_creation, plan_slot_reconciliation,
    plan_template_withdrawal,
};
use coop_shifts_domain::{
    Attendance, AttendanceOrigin, AttendanceState, AttendanceTemplate, Capability, Member,
    RegistrationBlocker, Shift, Slot, SlotTemplate,
};
use time::Duration;

fn reconcile(
    shift: &Shift,
    slot: &Slot,
    attendances: &[Attendance],
    template_member_id: Option<i64>,
    exempted: bool,
) -> SlotReconciliation {
    plan_slot_reconciliation(
        &SlotReconciliationFacts {
            shift,
            slot,
            attendances,
            template_member_id,
            template_member_exempted: exempted,
        },
        NOW,
    )
    .unwrap()
}

/// Applies a plan to an in-memory attendance list.
fn apply(attendances: &mut Vec<Attendance>, plan: SlotReconciliation, next_id: i64) {
    attendances.retain(|attendance| {
        !plan
            .delete_attendance_ids
            .contains(&attendance.attendance_id.unwrap())
    });
    if let Some(reactivated) = plan.reactivate {
        for attendance in attendances.iter_mut() {
            if attendance.attendance_id == reactivated.attendance_id {
                *attendance = reactivated.clone();
            }
        }
    }
    if let Some(mut created) = plan.create {
        created.attendance_id = Some(next_id);
        attendances.push(created);
    }
}

#[test]
fn test_creates_attendance_for_template_member() {
    let shift: Shift = create_test_shift(1, 3);
    let slot: Slot = create_test_slot(3, 1, Some(9));

    let plan: SlotReconciliation = reconcile(&shift, &slot, &[], Some(10), false);

    let created: Attendance = plan.create.unwrap();
    assert_eq!(created.member_id, 10);
    assert_eq!(created.slot_id, 3);
    assert_eq!(created.origin, AttendanceOrigin::Template);
    assert_eq!(created.state, AttendanceState::Pending);
}

#[test]
fn test_past_shifts_are_never_touched() {
    let shift: Shift = create_test_shift(1, -3);
    let slot: Slot = create_test_slot(3, 1, Some(9));

    assert!(reconcile(&shift, &slot, &[], Some(10), false).is_empty());
}

#[test]
fn test_cancelled_shifts_are_never_touched() {
    let mut shift: Shift = create_test_shift(1, 3);
    shift.cancelled = true;
    let slot: Slot = create_test_slot(3, 1, Some(9));

    assert!(reconcile(&shift, &slot, &[], Some(10), false).is_empty());
}

#[test]
fn test_exempted_template_member_gets_no_attendance() {
    let shift: Shift = create_test_shift(1, 3);
    let slot: Slot = create_test_slot(3, 1, Some(9));

    assert!(reconcile(&shift, &slot, &[], Some(10), true).is_empty());
}

#[test]
fn test_member_who_left_the_template_loses_attendance() {
    let shift: Shift = create_test_shift(1, 3);
    let slot: Slot = create_test_slot(3, 1, Some(9));
    let attendances: Vec<Attendance> = vec![create_test_attendance(
        4,
        11,
        3,
        AttendanceState::Pending,
        AttendanceOrigin::Template,
    )];

    let plan: SlotReconciliation = reconcile(&shift, &slot, &attendances, Some(10), false);

    assert_eq!(plan.delete_attendance_ids, vec![4]);
    assert_eq!(plan.create.unwrap().member_id, 10);
}

#[test]
fn test_flying_registration_blocks_template_member() {
    let shift: Shift = create_test_shift(1, 3);
    let slot: Slot = create_test_slot(3, 1, Some(9));
    let attendances: Vec<Attendance> = vec![create_test_attendance(
        4,
        11,
        3,
        AttendanceState::Pending,
        AttendanceOrigin::Registration,
    )];

    assert!(reconcile(&shift, &slot, &attendances, Some(10), false).is_empty());
}

#[test]
fn test_cancelled_attendance_is_reactivated() {
    let shift: Shift = create_test_shift(1, 3);
    let slot: Slot = create_test_slot(3, 1, Some(9));
    let attendances: Vec<Attendance> = vec![create_test_attendance(
        4,
        10,
        3,
        AttendanceState::Cancelled,
        AttendanceOrigin::Registration,
    )];

    let plan: SlotReconciliation = reconcile(&shift, &slot, &attendances, Some(10), false);

    let reactivated: Attendance = plan.reactivate.unwrap();
    assert_eq!(reactivated.attendance_id, Some(4));
    assert_eq!(reactivated.state, AttendanceState::Pending);
    assert_eq!(reactivated.origin, AttendanceOrigin::Template);
    assert!(plan.create.is_none());
}

#[test]
fn test_reconciliation_converges() {
    let shift: Shift = create_test_shift(1, 3);
    let slot: Slot = create_test_slot(3, 1, Some(9));
    let mut attendances: Vec<Attendance> = vec![create_test_attendance(
        4,
        11,
        3,
        AttendanceState::LookingForStandIn,
        AttendanceOrigin::Template,
    )];

    let first: SlotReconciliation = reconcile(&shift, &slot, &attendances, Some(10), false);
    apply(&mut attendances, first, 5);
    let second: SlotReconciliation = reconcile(&shift, &slot, &attendances, Some(10), false);
    apply(&mut attendances, second.clone(), 6);

    assert!(second.is_empty());
    assert_eq!(attendances.len(), 1);
    assert_eq!(attendances[0].member_id, 10);
    assert_eq!(attendances[0].attendance_id, Some(5));
}

#[test]
fn test_template_creation_checks_holder_and_capabilities() {
    let member: Member = create_test_member(10);
    let mut slot_template: SlotTemplate =
        SlotTemplate::new(2, "Cashier", vec![Capability::new("cashier")]);
    slot_template.slot_template_id = Some(9);
    let holder: AttendanceTemplate = AttendanceTemplate::new(11, 9);

    let result: Result<AttendanceTemplatePlan, CoreError> = plan_attendance_template_creation(
        &member,
        &slot_template,
        Some(&holder),
        true,
        create_test_actor(),
        create_test_cause(),
        NOW,
    );

    assert_eq!(
        result,
        Err(CoreError::RegistrationRefused(vec![
            RegistrationBlocker::SlotTaken,
            RegistrationBlocker::AlreadyRegisteredToShift,
            RegistrationBlocker::MissingCapabilities,
        ]))
    );
}

#[test]
fn test_template_creation_is_audited() {
    let member: Member = create_test_member(10);
    let mut slot_template: SlotTemplate = SlotTemplate::new(2, "Cashier", Vec::new());
    slot_template.slot_template_id = Some(9);

    let plan: AttendanceTemplatePlan = plan_attendance_template_creation(
        &member,
        &slot_template,
        None,
        false,
        create_test_actor(),
        create_test_cause(),
        NOW,
    )
    .unwrap();

    assert_eq!(plan.attendance_template, AttendanceTemplate::new(10, 9));
    assert_eq!(plan.audit_event.action.name, "CreateAttendanceTemplate");
    assert_eq!(plan.audit_event.member_id, Some(10));
}

#[test]
fn test_withdrawal_cancels_only_expected_attendances_from_date() {
    let mut attendance_template: AttendanceTemplate = AttendanceTemplate::new(10, 9);
    attendance_template.attendance_template_id = Some(1);
    let attendances: Vec<(Attendance, Shift)> = vec![
        (
            create_test_attendance(4, 10, 3, AttendanceState::Pending, AttendanceOrigin::Template),
            create_test_shift(1, -7),
        ),
        (
            create_test_attendance(5, 10, 6, AttendanceState::Pending, AttendanceOrigin::Template),
            create_test_shift(2, 7),
        ),
        (
            create_test_attendance(6, 10, 8, AttendanceState::Done, AttendanceOrigin::Template),
            create_test_shift(3, 14),
        ),
    ];

    let withdrawal: TemplateWithdrawal = plan_template_withdrawal(
        &attendance_template,
        &attendances,
        NOW - Duration::days(1),
        "Unregistered because frozen",
        &create_test_actor(),
        &create_test_cause(),
        NOW,
    )
    .unwrap();

    assert_eq!(withdrawal.cancellations.len(), 1);
    let cancelled: &Attendance = &withdrawal.cancellations[0].attendance;
    assert_eq!(cancelled.attendance_id, Some(5));
    assert_eq!(cancelled.state, AttendanceState::Cancelled);
    assert_eq!(
        cancelled.excused_reason.as_deref(),
        Some("Unregistered because frozen")
    );
    assert_eq!(withdrawal.audit_event.action.name, "DeleteAttendanceTemplate");
    assert_eq!(withdrawal.audit_event.member_id, Some(10));
}
