// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use std::sync::Mutex;

use coop_shifts_audit::{Actor, Cause};
use coop_shifts_domain::{
    AccountEntry, Attendance, AttendanceOrigin, Member, Notification, NotificationKind,
    ShareOwner, Shift, ShiftTemplate, Slot, SlotTemplate, WeekGroup,
};
use coop_shifts_persistence::Persistence;
use time::macros::{date, datetime, time};
use time::{Duration, PrimitiveDateTime, Weekday};

use crate::{MailTransport, TransportError};

/// A Monday morning.
pub const NOW: PrimitiveDateTime = datetime!(2024-03-04 09:00);

/// Keeps every delivered notification, or refuses all of them.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    delivered: Mutex<Vec<Notification>>,
    refuse: bool,
}

impl RecordingTransport {
    pub fn refusing() -> Self {
        Self {
            delivered: Mutex::new(Vec::new()),
            refuse: true,
        }
    }

    pub fn delivered(&self) -> Vec<Notification> {
        self.delivered.lock().unwrap().clone()
    }

    pub fn delivered_kinds(&self) -> Vec<NotificationKind> {
        self.delivered()
            .iter()
            .map(|notification| notification.kind)
            .collect()
    }
}

impl MailTransport for RecordingTransport {
    fn deliver(&self, notification: &Notification) -> Result<(), TransportError> {
        if self.refuse {
            return Err(TransportError {
                message: String::from("mailbox unavailable"),
            });
        }
        self.delivered.lock().unwrap().push(notification.clone());
        Ok(())
    }
}

pub fn create_test_actor() -> Actor {
    Actor::new(String::from("manager-1"), String::from("manager"))
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("req-789"), String::from("Manager request"))
}

pub fn create_test_persistence() -> Persistence {
    Persistence::new_in_memory().expect("in-memory database")
}

/// Inserts a working share owner who joined early 2023.
pub fn insert_test_member(persistence: &mut Persistence, email: &str) -> Member {
    let mut member: Member =
        Member::new("Ada Lovelace", email, date!(2023 - 01 - 02)).expect("valid member");
    member.member_id = Some(persistence.create_member(&member).unwrap());
    persistence
        .set_share_owner(&ShareOwner::new(
            member.member_id.unwrap(),
            date!(2023 - 01 - 02),
        ))
        .unwrap();
    member
}

/// Inserts a one-off shift starting `days_ahead` days after [`NOW`] with
/// one slot.
pub fn insert_test_shift(persistence: &mut Persistence, days_ahead: i64) -> (Shift, Slot) {
    let start: PrimitiveDateTime = NOW + Duration::days(days_ahead);
    let mut shift: Shift = Shift::new("Morning", start, start + Duration::hours(3), 2).unwrap();
    shift.shift_id = Some(persistence.create_shift(&shift).unwrap());
    let mut slot: Slot = Slot::new(shift.shift_id.unwrap(), "Cashier", Vec::new());
    slot.slot_id = Some(persistence.create_slot(&slot).unwrap());
    (shift, slot)
}

/// Inserts a group A Monday template with a single slot template.
pub fn insert_test_templates(persistence: &mut Persistence) -> (ShiftTemplate, SlotTemplate) {
    let mut template: ShiftTemplate = ShiftTemplate::new(
        "Monday morning",
        Some(WeekGroup::A),
        Some(Weekday::Monday),
        time!(9:00),
        time!(12:00),
        1,
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
    let mut attendance: Attendance = Attendance::new(
        member_id,
        slot_id,
        AttendanceOrigin::Registration,
        NOW - Duration::days(30),
    );
    attendance.attendance_id = Some(persistence.create_attendance(&attendance).unwrap());
    attendance
}

/// Appends a ledger entry dated `days_ago` days before [`NOW`].
pub fn insert_test_entry(
    persistence: &mut Persistence,
    member_id: i64,
    value: i32,
    days_ago: i64,
) {
    persistence
        .create_account_entry(&AccountEntry::new(
            member_id,
            value,
            NOW - Duration::days(days_ago),
            String::from("Manual correction"),
        ))
        .unwrap();
}
