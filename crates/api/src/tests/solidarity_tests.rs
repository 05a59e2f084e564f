// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use coop_shifts_domain::{Attendance, AttendanceState, ShiftPolicy, Slot, SolidarityShift};
use coop_shifts_persistence::Persistence;
use time::{Duration, PrimitiveDateTime};

use crate::tests::helpers::{
    NOW, create_test_actor, create_test_cause, create_test_persistence, insert_test_attendance,
    insert_test_member, insert_test_shift,
};
use crate::{
    ApiError, count_available_solidarity_shifts, get_balance, give_solidarity_shift,
    use_solidarity_shift,
};

fn insert_done_attendance(persistence: &mut Persistence, member_id: i64) -> Attendance {
    let (_, slot): (_, Slot) = insert_test_shift(persistence, -3);
    let mut attendance: Attendance =
        insert_test_attendance(persistence, member_id, slot.slot_id.unwrap());
    attendance.state = AttendanceState::Done;
    persistence.update_attendance(&attendance).unwrap();
    attendance
}

fn give(persistence: &mut Persistence, member_id: i64) -> Result<SolidarityShift, ApiError> {
    give_solidarity_shift(
        persistence,
        member_id,
        &create_test_actor(),
        &create_test_cause(),
        NOW,
    )
}

fn receive(
    persistence: &mut Persistence,
    member_id: i64,
    now: PrimitiveDateTime,
) -> Result<SolidarityShift, ApiError> {
    use_solidarity_shift(
        persistence,
        member_id,
        &ShiftPolicy::default(),
        &create_test_actor(),
        &create_test_cause(),
        now,
    )
}

#[test]
fn test_gift_moves_a_point_into_the_pool() {
    let mut persistence: Persistence = create_test_persistence();
    let giver_id: i64 = insert_test_member(&mut persistence, "giver@example.org")
        .member_id
        .unwrap();
    let attendance: Attendance = insert_done_attendance(&mut persistence, giver_id);

    let gifted: SolidarityShift = give(&mut persistence, giver_id).unwrap();

    assert_eq!(gifted.gifted_attendance_id, attendance.attendance_id.unwrap());
    assert!(gifted.solidarity_shift_id.is_some());
    assert_eq!(count_available_solidarity_shifts(&mut persistence).unwrap(), 1);
    assert_eq!(get_balance(&mut persistence, giver_id, NOW).unwrap(), -1);
}

#[test]
fn test_an_attendance_is_given_only_once() {
    let mut persistence: Persistence = create_test_persistence();
    let giver_id: i64 = insert_test_member(&mut persistence, "giver@example.org")
        .member_id
        .unwrap();
    insert_done_attendance(&mut persistence, giver_id);
    give(&mut persistence, giver_id).unwrap();

    let result: Result<SolidarityShift, ApiError> = give(&mut persistence, giver_id);

    assert!(matches!(
        result,
        Err(ApiError::DomainRuleViolation { ref rule, .. }) if rule == "no_attendance_to_give"
    ));
    assert_eq!(get_balance(&mut persistence, giver_id, NOW).unwrap(), -1);
}

#[test]
fn test_empty_pool_is_refused() {
    let mut persistence: Persistence = create_test_persistence();
    let member_id: i64 = insert_test_member(&mut persistence, "needy@example.org")
        .member_id
        .unwrap();

    let result: Result<SolidarityShift, ApiError> = receive(&mut persistence, member_id, NOW);

    assert!(matches!(
        result,
        Err(ApiError::DomainRuleViolation { ref rule, .. })
            if rule == "no_solidarity_shift_available"
    ));
}

#[test]
fn test_receiver_is_credited_up_to_the_yearly_limit() {
    let mut persistence: Persistence = create_test_persistence();
    let giver_id: i64 = insert_test_member(&mut persistence, "giver@example.org")
        .member_id
        .unwrap();
    let receiver_id: i64 = insert_test_member(&mut persistence, "needy@example.org")
        .member_id
        .unwrap();
    for _ in 0..3 {
        insert_done_attendance(&mut persistence, giver_id);
        give(&mut persistence, giver_id).unwrap();
    }

    let first: SolidarityShift = receive(&mut persistence, receiver_id, NOW).unwrap();
    receive(&mut persistence, receiver_id, NOW).unwrap();
    let third: Result<SolidarityShift, ApiError> = receive(&mut persistence, receiver_id, NOW);

    assert_eq!(first.used_by_member_id, Some(receiver_id));
    assert_eq!(first.date_used, Some(NOW.date()));
    assert!(matches!(
        third,
        Err(ApiError::DomainRuleViolation { ref rule, .. }) if rule == "solidarity_yearly_limit"
    ));
    assert_eq!(get_balance(&mut persistence, receiver_id, NOW).unwrap(), 2);
    assert_eq!(count_available_solidarity_shifts(&mut persistence).unwrap(), 1);

    let next_year: PrimitiveDateTime = NOW + Duration::days(365);
    receive(&mut persistence, receiver_id, next_year).unwrap();
    assert_eq!(count_available_solidarity_shifts(&mut persistence).unwrap(), 0);
}
