// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod initialization_tests;
mod ledger_tests;
mod notification_tests;
mod solidarity_tests;
mod watch_tests;

use coop_shifts_audit::{Actor, Cause};
use coop_shifts_domain::{
    Attendance, AttendanceOrigin, Member, ShareOwner, Shift, ShiftTemplate, Slot, SlotTemplate,
    WeekGroup,
};
use time::macros::{date, datetime, time};
use time::{Duration, PrimitiveDateTime, Weekday};

use crate::Persistence;

pub const NOW: PrimitiveDateTime = datetime!(2024-03-04 09:00);

pub fn create_test_actor() -> Actor {
    Actor::new(String::from("test-actor"), String::from("system"))
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("test-cause"), String::from("Test operation"))
}

pub fn create_test_persistence() -> Persistence {
    Persistence::new_in_memory().expect("in-memory database")
}

/// Inserts a working share owner and returns the member.
pub fn insert_test_member(persistence: &mut Persistence, email: &str) -> Member {
    let mut member: Member =
        Member::new("Grace Hopper", email, date!(2023 - 01 - 02)).expect("valid member");
    let member_id: i64 = persistence.create_member(&member).unwrap();
    member.member_id = Some(member_id);
    persistence
        .set_share_owner(&ShareOwner::new(member_id, date!(2023 - 01 - 02)))
        .unwrap();
    member
}

/// Inserts a one-off shift starting `days_ahead` days after [`NOW`].
pub fn insert_test_shift(persistence: &mut Persistence, days_ahead: i64) -> Shift {
    let start: PrimitiveDateTime = NOW + Duration::days(days_ahead);
    let mut shift: Shift = Shift::new("Morning", start, start + Duration::hours(3), 2).unwrap();
    shift.shift_id = Some(persistence.create_shift(&shift).unwrap());
    shift
}

pub fn insert_test_slot(persistence: &mut Persistence, shift_id: i64) -> Slot {
    let mut slot: Slot = Slot::new(shift_id, "Cashier", Vec::new());
    slot.slot_id = Some(persistence.create_slot(&slot).unwrap());
    slot
}

/// Inserts a group A Monday template with a single slot template.
pub fn insert_test_templates(persistence: &mut Persistence) -> (ShiftTemplate, SlotTemplate) {
    let mut template: ShiftTemplate = ShiftTemplate::new(
        "Monday morning",
        Some(WeekGroup::A),
        Some(Weekday::Monday),
        time!(9:00),
        time!(12:00),
        2,
    )
    .unwrap();
    template.shift_template_id = Some(persistence.create_shift_template(&template).unwrap());

    let mut slot_template: SlotTemplate =
        SlotTemplate::new(template.shift_template_id.unwrap(), "Cashier", Vec::new());
    slot_template.slot_template_id =
        Some(persistence.create_slot_template(&slot_template).unwrap());
    (template, slot_template)
}

pub fn insert_test_attendance(
    persistence: &mut Persistence,
    member_id: i64,
    slot_id: i64,
) -> Attendance {
    let mut attendance: Attendance =
        Attendance::new(member_id, slot_id, AttendanceOrigin::Registration, NOW);
    attendance.attendance_id = Some(persistence.create_attendance(&attendance).unwrap());
    attendance
}
