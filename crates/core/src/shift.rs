// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shift cancellation.

use crate::actions;
use crate::attendance::{AttendanceTransition, plan_attendance_transition};
use crate::error::CoreError;
use coop_shifts_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use coop_shifts_domain::{AccountEntry, Attendance, AttendanceState, Shift, Slot};
use time::PrimitiveDateTime;

/// Excused reason written on recurring attendances of a cancelled shift.
pub const SHIFT_CANCELLED_REASON: &str = "Shift cancelled";

/// One slot of a shift being cancelled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotAttendances {
    pub slot: Slot,
    /// The slot's attendances with their attached entries.
    pub attendances: Vec<(Attendance, Option<AccountEntry>)>,
    /// The member holding the slot's slot template, if any.
    pub template_member_id: Option<i64>,
}

/// Cancelling a shift.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftCancellationPlan {
    pub shift: Shift,
    pub transitions: Vec<AttendanceTransition>,
    pub audit_event: AuditEvent,
}

/// Plans cancelling a shift.
///
/// Valid attendances of members holding the slot's recurring assignment
/// are excused, so the cycle debit is neutralized. Every other valid
/// attendance is cancelled.
///
/// Returns `Ok(None)` when the shift already is cancelled.
///
/// # Errors
///
/// Returns an error if an attendance cannot reach its target state.
pub fn plan_shift_cancellation(
    shift: &Shift,
    slots: &[SlotAttendances],
    reason: &str,
    actor: &Actor,
    cause: &Cause,
    now: PrimitiveDateTime,
) -> Result<Option<ShiftCancellationPlan>, CoreError> {
    if shift.cancelled {
        return Ok(None);
    }

    let mut transitions: Vec<AttendanceTransition> = Vec::new();
    for slot in slots {
        for (attendance, entry) in &slot.attendances {
            if !attendance.state.is_valid() {
                continue;
            }
            let (target, excused_reason): (AttendanceState, Option<String>) =
                if slot.template_member_id == Some(attendance.member_id) {
                    (
                        AttendanceState::MissedExcused,
                        Some(SHIFT_CANCELLED_REASON.to_string()),
                    )
                } else {
                    (AttendanceState::Cancelled, Some(reason.to_string()))
                };
            if let Some(transition) = plan_attendance_transition(
                attendance,
                entry.as_ref(),
                shift,
                target,
                excused_reason,
                actor.clone(),
                cause.clone(),
                now,
            )? {
                transitions.push(transition);
            }
        }
    }

    let mut cancelled: Shift = shift.clone();
    cancelled.cancelled = true;
    cancelled.cancelled_reason = Some(reason.to_string());

    let audit_event: AuditEvent = AuditEvent::new(
        actor.clone(),
        cause.clone(),
        Action::new(
            actions::CANCEL_SHIFT.to_string(),
            Some(format!("Cancelled shift '{}': {reason}", shift.name)),
        ),
        StateSnapshot::new(String::from("cancelled=false")),
        StateSnapshot::new(String::from("cancelled=true")),
        None,
        now,
    );

    Ok(Some(ShiftCancellationPlan {
        shift: cancelled,
        transitions,
        audit_event,
    }))
}
