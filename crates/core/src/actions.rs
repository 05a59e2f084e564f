// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Audit action names written by the planners.
//!
//! History readers match on these names, so they must never change once
//! events carrying them were persisted.

pub const UPDATE_FROZEN_STATUS: &str = "UpdateFrozenStatus";
pub const CREATE_ATTENDANCE_TEMPLATE: &str = "CreateAttendanceTemplate";
pub const DELETE_ATTENDANCE_TEMPLATE: &str = "DeleteAttendanceTemplate";
pub const UPDATE_ATTENDANCE_STATE: &str = "UpdateAttendanceState";
pub const CREATE_ATTENDANCE: &str = "CreateAttendance";
pub const ATTENDANCE_TAKEN_OVER: &str = "AttendanceTakenOver";
pub const CREATE_EXEMPTION: &str = "CreateExemption";
pub const UPDATE_EXEMPTION: &str = "UpdateExemption";
pub const CREATE_MEMBERSHIP_PAUSE: &str = "CreateMembershipPause";
pub const CANCEL_SHIFT: &str = "CancelShift";
pub const GIVE_SOLIDARITY_SHIFT: &str = "GiveSolidarityShift";
pub const USE_SOLIDARITY_SHIFT: &str = "UseSolidarityShift";
pub const UPDATE_SHIFT_PARTNER: &str = "UpdateShiftPartner";
