// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use coop_shifts_audit::{Actor, Cause};
use coop_shifts_domain::{
    Attendance, AttendanceOrigin, AttendanceState, Member, ShareOwner, Shift, Slot,
};
use time::macros::{date, datetime};
use time::{Duration, PrimitiveDateTime};

pub const NOW: PrimitiveDateTime = datetime!(2024-03-04 09:00);

pub fn create_test_actor() -> Actor {
    Actor::new(String::from("manager-1"), String::from("manager"))
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("req-456"), String::from("Manager request"))
}

pub fn create_test_member(member_id: i64) -> Member {
    let mut member: Member =
        Member::new("Ada Lovelace", "ada@example.org", date!(2023 - 01 - 02)).unwrap();
    member.member_id = Some(member_id);
    member
}

pub fn create_test_share_owner(member_id: i64) -> ShareOwner {
    ShareOwner::new(member_id, date!(2023 - 01 - 02))
}

/// A two-hour shift starting `days_ahead` days after [`NOW`].
pub fn create_test_shift(shift_id: i64, days_ahead: i64) -> Shift {
    let start: PrimitiveDateTime = NOW + Duration::days(days_ahead);
    let mut shift: Shift = Shift::new("Morning", start, start + Duration::hours(2), 2).unwrap();
    shift.shift_id = Some(shift_id);
    shift
}

pub fn create_test_slot(slot_id: i64, shift_id: i64, slot_template_id: Option<i64>) -> Slot {
    let mut slot: Slot = Slot::new(shift_id, "Cashier", Vec::new());
    slot.slot_id = Some(slot_id);
    slot.slot_template_id = slot_template_id;
    slot
}

pub fn create_test_attendance(
    attendance_id: i64,
    member_id: i64,
    slot_id: i64,
    state: AttendanceState,
    origin: AttendanceOrigin,
) -> Attendance {
    let mut attendance: Attendance =
        Attendance::new(member_id, slot_id, origin, NOW - Duration::days(30));
    attendance.attendance_id = Some(attendance_id);
    attendance.state = state;
    attendance
}
