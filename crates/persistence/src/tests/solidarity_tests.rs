// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use coop_shifts_domain::{Attendance, AttendanceState, Member, Shift, SolidarityShift};
use time::macros::date;

use crate::error::PersistenceError;
use crate::tests::{
    create_test_persistence, insert_test_attendance, insert_test_member, insert_test_shift,
    insert_test_slot,
};
use crate::Persistence;

fn insert_done_attendance(persistence: &mut Persistence, member_id: i64) -> Attendance {
    let shift: Shift = insert_test_shift(persistence, -3);
    let slot_id: i64 = insert_test_slot(persistence, shift.shift_id.unwrap())
        .slot_id
        .unwrap();
    let mut attendance: Attendance = insert_test_attendance(persistence, member_id, slot_id);
    attendance.state = AttendanceState::Done;
    persistence.update_attendance(&attendance).unwrap();
    attendance
}

#[test]
fn test_given_attendance_is_not_offered_again() {
    let mut persistence: Persistence = create_test_persistence();
    let member: Member = insert_test_member(&mut persistence, "giver@example.org");
    let member_id: i64 = member.member_id.unwrap();
    let first: Attendance = insert_done_attendance(&mut persistence, member_id);
    let second: Attendance = insert_done_attendance(&mut persistence, member_id);

    let offered: Attendance = persistence
        .first_done_attendance_not_given(member_id)
        .unwrap()
        .unwrap();
    assert_eq!(offered.attendance_id, first.attendance_id);

    persistence
        .create_solidarity_shift(&SolidarityShift::new(
            first.attendance_id.unwrap(),
            date!(2024 - 03 - 04),
        ))
        .unwrap();
    let offered: Attendance = persistence
        .first_done_attendance_not_given(member_id)
        .unwrap()
        .unwrap();
    assert_eq!(offered.attendance_id, second.attendance_id);

    let twice: Result<i64, PersistenceError> = persistence.create_solidarity_shift(
        &SolidarityShift::new(first.attendance_id.unwrap(), date!(2024 - 03 - 05)),
    );
    assert!(matches!(twice, Err(PersistenceError::ConstraintViolation(_))));
}

#[test]
fn test_used_shift_leaves_the_pool() {
    let mut persistence: Persistence = create_test_persistence();
    let giver: Member = insert_test_member(&mut persistence, "giver@example.org");
    let receiver: Member = insert_test_member(&mut persistence, "receiver@example.org");
    let receiver_id: i64 = receiver.member_id.unwrap();
    let attendance: Attendance =
        insert_done_attendance(&mut persistence, giver.member_id.unwrap());
    persistence
        .create_solidarity_shift(&SolidarityShift::new(
            attendance.attendance_id.unwrap(),
            date!(2024 - 03 - 04),
        ))
        .unwrap();
    assert_eq!(persistence.count_available_solidarity_shifts().unwrap(), 1);

    let available: SolidarityShift = persistence
        .first_available_solidarity_shift()
        .unwrap()
        .unwrap();
    let used: SolidarityShift = available.used_by(receiver_id, date!(2024 - 03 - 10));
    persistence.mark_solidarity_shift_used(&used).unwrap();

    assert_eq!(persistence.count_available_solidarity_shifts().unwrap(), 0);
    assert!(persistence.first_available_solidarity_shift().unwrap().is_none());
    assert_eq!(
        persistence.list_solidarity_shifts_used_by(receiver_id).unwrap(),
        vec![used.clone()]
    );
    assert!(matches!(
        persistence.mark_solidarity_shift_used(&used),
        Err(PersistenceError::NotFound(_))
    ));
}
