// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Giving and receiving solidarity shifts.

use crate::actions;
use crate::error::CoreError;
use coop_shifts_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use coop_shifts_domain::{
    AccountEntry, Attendance, AttendanceState, ShiftPolicy, SolidarityBlocker, SolidarityShift,
    solidarity_shifts_used_in_year,
};
use time::PrimitiveDateTime;

pub const SOLIDARITY_GIVEN: &str = "Solidarity shift given";
pub const SOLIDARITY_RECEIVED: &str = "Solidarity shift received";

/// The writes of one solidarity gift or use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolidarityPlan {
    pub solidarity_shift: SolidarityShift,
    pub entry: AccountEntry,
    pub audit_event: AuditEvent,
}

/// Plans giving `attendance` to the solidarity pool.
///
/// `attendance` is the member's oldest done attendance not given yet.
///
/// # Errors
///
/// Returns `CoreError::SolidarityRefused` if there is nothing to give, or
/// `CoreError::Internal` if the attendance is not done.
pub fn plan_solidarity_gift(
    member_id: i64,
    attendance: Option<&Attendance>,
    actor: Actor,
    cause: Cause,
    now: PrimitiveDateTime,
) -> Result<SolidarityPlan, CoreError> {
    let attendance: &Attendance =
        attendance.ok_or(CoreError::SolidarityRefused(SolidarityBlocker::NoAttendanceToGive))?;
    if attendance.state != AttendanceState::Done || attendance.member_id != member_id {
        return Err(CoreError::Internal(format!(
            "attendance {:?} cannot be given by member {member_id}",
            attendance.attendance_id
        )));
    }
    let attendance_id: i64 = attendance.id()?;

    let audit_event: AuditEvent = AuditEvent::new(
        actor,
        cause,
        Action::new(
            actions::GIVE_SOLIDARITY_SHIFT.to_string(),
            Some(format!("attendance={attendance_id}")),
        ),
        StateSnapshot::new(format!("attendance={attendance_id};given=false")),
        StateSnapshot::new(format!("attendance={attendance_id};given=true")),
        Some(member_id),
        now,
    );
    Ok(SolidarityPlan {
        solidarity_shift: SolidarityShift::new(attendance_id, now.date()),
        entry: AccountEntry::new(member_id, -1, now, SOLIDARITY_GIVEN.to_string()),
        audit_event,
    })
}

/// Plans `member_id` receiving a shift from the pool.
///
/// `available` is the oldest unused shift. `received` lists every shift the
/// member received so far.
///
/// # Errors
///
/// Returns `CoreError::SolidarityRefused` if the pool is empty or the
/// member reached the yearly maximum.
pub fn plan_solidarity_use(
    member_id: i64,
    available: Option<&SolidarityShift>,
    received: &[SolidarityShift],
    policy: &ShiftPolicy,
    actor: Actor,
    cause: Cause,
    now: PrimitiveDateTime,
) -> Result<SolidarityPlan, CoreError> {
    let available: &SolidarityShift =
        available.ok_or(CoreError::SolidarityRefused(SolidarityBlocker::NoneAvailable))?;
    let used: usize = solidarity_shifts_used_in_year(received, member_id, now.year());
    let limit: usize = policy.max_solidarity_shifts_per_year;
    if used >= limit {
        return Err(CoreError::SolidarityRefused(
            SolidarityBlocker::YearlyLimitReached { used, limit },
        ));
    }
    let solidarity_shift_id: i64 = available.id()?;

    let audit_event: AuditEvent = AuditEvent::new(
        actor,
        cause,
        Action::new(
            actions::USE_SOLIDARITY_SHIFT.to_string(),
            Some(format!("solidarity_shift={solidarity_shift_id}")),
        ),
        StateSnapshot::new(format!("used_this_year={used}")),
        StateSnapshot::new(format!("used_this_year={}", used + 1)),
        Some(member_id),
        now,
    );
    Ok(SolidarityPlan {
        solidarity_shift: available.used_by(member_id, now.date()),
        entry: AccountEntry::new(member_id, 1, now, SOLIDARITY_RECEIVED.to_string()),
        audit_event,
    })
}
