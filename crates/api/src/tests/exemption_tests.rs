// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use coop_shifts_domain::{
    Attendance, AttendanceState, DateInterval, Exemption, MembershipPause, Shift, ShiftPolicy,
    ShiftTemplate, SlotTemplate,
};
use coop_shifts_persistence::Persistence;
use time::macros::{date, datetime};

use crate::tests::helpers::{
    NOW, create_test_actor, create_test_cause, create_test_persistence, insert_test_member,
    insert_test_templates,
};
use crate::{
    ApiError, create_exemption, create_membership_pause, create_shift,
    is_member_expected_to_do_shifts, register_member_to_slot_template, update_exemption,
};

/// A template holder with attendances on the shifts of 2024-03-11 and
/// 2024-03-18. Returns the member id.
fn setup_template_holder(persistence: &mut Persistence) -> i64 {
    let member_id: i64 = insert_test_member(persistence, "ada@example.org")
        .member_id
        .unwrap();
    let (template, slot_template): (ShiftTemplate, SlotTemplate) =
        insert_test_templates(persistence);
    register_member_to_slot_template(
        persistence,
        member_id,
        slot_template.slot_template_id.unwrap(),
        &create_test_actor(),
        &create_test_cause(),
        NOW,
    )
    .unwrap();
    for week_start in [date!(2024 - 03 - 11), date!(2024 - 03 - 18)] {
        create_shift(
            persistence,
            template.shift_template_id.unwrap(),
            week_start,
            NOW,
        )
        .unwrap();
    }
    member_id
}

fn states(persistence: &mut Persistence, member_id: i64) -> Vec<AttendanceState> {
    let attendances: Vec<(Attendance, Shift)> = persistence
        .list_member_attendances_from(member_id, NOW)
        .unwrap();
    attendances
        .iter()
        .map(|(attendance, _)| attendance.state)
        .collect()
}

fn exemption(member_id: i64, start: time::Date, end: Option<time::Date>) -> Exemption {
    Exemption::new(
        member_id,
        DateInterval::new(start, end).unwrap(),
        String::from("Parental leave"),
    )
}

#[test]
fn test_short_exemption_cancels_covered_attendances_only() {
    let mut persistence: Persistence = create_test_persistence();
    let member_id: i64 = setup_template_holder(&mut persistence);

    let saved: Exemption = create_exemption(
        &mut persistence,
        exemption(member_id, date!(2024 - 03 - 10), Some(date!(2024 - 03 - 12))),
        &ShiftPolicy::default(),
        &create_test_actor(),
        &create_test_cause(),
        NOW,
    )
    .unwrap();

    assert!(saved.exemption_id.is_some());
    assert_eq!(
        states(&mut persistence, member_id),
        vec![AttendanceState::Cancelled, AttendanceState::Pending]
    );
    assert_eq!(
        persistence
            .list_attendance_templates_for_member(member_id)
            .unwrap()
            .len(),
        1
    );
}

#[test]
fn test_open_ended_exemption_removes_recurring_slot() {
    let mut persistence: Persistence = create_test_persistence();
    let member_id: i64 = setup_template_holder(&mut persistence);

    create_exemption(
        &mut persistence,
        exemption(member_id, date!(2024 - 03 - 10), None),
        &ShiftPolicy::default(),
        &create_test_actor(),
        &create_test_cause(),
        NOW,
    )
    .unwrap();

    assert_eq!(
        states(&mut persistence, member_id),
        vec![AttendanceState::Cancelled, AttendanceState::Cancelled]
    );
    assert!(
        persistence
            .list_attendance_templates_for_member(member_id)
            .unwrap()
            .is_empty()
    );
    assert!(
        !is_member_expected_to_do_shifts(&mut persistence, member_id, datetime!(2024-04-01 09:00))
            .unwrap()
    );
}

#[test]
fn test_extending_an_exemption_cancels_newly_covered_attendances() {
    let mut persistence: Persistence = create_test_persistence();
    let member_id: i64 = setup_template_holder(&mut persistence);
    let saved: Exemption = create_exemption(
        &mut persistence,
        exemption(member_id, date!(2024 - 03 - 10), Some(date!(2024 - 03 - 12))),
        &ShiftPolicy::default(),
        &create_test_actor(),
        &create_test_cause(),
        NOW,
    )
    .unwrap();

    let extended: Exemption = update_exemption(
        &mut persistence,
        saved.exemption_id.unwrap(),
        DateInterval::new(date!(2024 - 03 - 10), Some(date!(2024 - 03 - 20))).unwrap(),
        String::from("Parental leave, extended"),
        &ShiftPolicy::default(),
        &create_test_actor(),
        &create_test_cause(),
        NOW,
    )
    .unwrap();

    assert_eq!(extended.interval.end_date(), Some(date!(2024 - 03 - 20)));
    assert_eq!(
        states(&mut persistence, member_id),
        vec![AttendanceState::Cancelled, AttendanceState::Cancelled]
    );
    let stored: Exemption = persistence
        .get_exemption(saved.exemption_id.unwrap())
        .unwrap()
        .unwrap();
    assert_eq!(stored.description, "Parental leave, extended");
}

#[test]
fn test_updating_a_missing_exemption_is_not_found() {
    let mut persistence: Persistence = create_test_persistence();

    let result: Result<Exemption, ApiError> = update_exemption(
        &mut persistence,
        42,
        DateInterval::new(date!(2024 - 03 - 10), None).unwrap(),
        String::from("Unknown"),
        &ShiftPolicy::default(),
        &create_test_actor(),
        &create_test_cause(),
        NOW,
    );

    assert!(matches!(result, Err(ApiError::ResourceNotFound { .. })));
}

#[test]
fn test_membership_pause_withdraws_every_recurring_slot() {
    let mut persistence: Persistence = create_test_persistence();
    let member_id: i64 = setup_template_holder(&mut persistence);
    let interval: DateInterval =
        DateInterval::new(date!(2024 - 03 - 15), Some(date!(2024 - 03 - 25))).unwrap();

    let pause: MembershipPause = create_membership_pause(
        &mut persistence,
        MembershipPause::new(member_id, interval, String::from("Abroad")),
        &create_test_actor(),
        &create_test_cause(),
        NOW,
    )
    .unwrap();

    assert!(pause.pause_id.is_some());
    assert_eq!(
        states(&mut persistence, member_id),
        vec![AttendanceState::Pending, AttendanceState::Cancelled]
    );
    assert!(
        persistence
            .list_attendance_templates_for_member(member_id)
            .unwrap()
            .is_empty()
    );
    assert!(
        !is_member_expected_to_do_shifts(&mut persistence, member_id, datetime!(2024-03-20 09:00))
            .unwrap()
    );
}
