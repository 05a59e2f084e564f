// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod attendance;
mod attendance_mode;
mod calendar;
mod error;
mod expectation;
mod ledger;
mod notification;
mod partner;
mod policy;
mod shift;
mod solidarity;
mod types;
mod watch;

#[cfg(test)]
mod tests;

pub use attendance::{
    Attendance, AttendanceOrigin, AttendanceState, RegistrationBlocker, SelfUnregisterBlocker,
};
pub use attendance_mode::{
    AttendanceMode, AttendanceTemplateChange, FrozenStatusChange, TemplateChangeKind,
    compute_attendance_mode, is_frozen_at,
};
pub use calendar::{
    add_days, cycle_start_dates_between, end_of_day, format_short_date, monday_of,
    mondays_between, next_cycle_start_date, start_of_day, week_group_at,
};
pub use error::DomainError;
pub use expectation::{
    ExpectationFacts, credit_requirement_for_cycle, is_member_expected_to_do_shifts,
};
pub use ledger::{
    AccountEntry, ShiftCycleEntry, balance_at, is_below_threshold_since_long_enough,
    registrations_compensate,
};
pub use notification::{Notification, NotificationKind, NotificationLogEntry};
pub use partner::{ShiftPartnerChange, has_shift_partner_at, shift_partner_at};
pub use policy::ShiftPolicy;
pub use shift::{AttendanceTemplate, Shift, ShiftTemplate, Slot, SlotTemplate, weekday_from_index};
pub use solidarity::{SolidarityBlocker, SolidarityShift, solidarity_shifts_used_in_year};
pub use types::{
    Capability, DateInterval, Exemption, Member, MembershipPause, ShareOwner, ShareOwnerStatus,
    WeekGroup, join_capabilities, parse_capabilities,
};
pub use watch::{
    RecurringShiftWatch, ShiftWatch, StaffingCounts, StaffingStatus, calculate_staffing_status,
    initial_staffing_status, join_staffing_statuses, parse_staffing_statuses,
    staffing_status_if_changed,
};
