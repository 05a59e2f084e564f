// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Attendance state transitions and their ledger effects.

use crate::actions;
use crate::error::CoreError;
use coop_shifts_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use coop_shifts_domain::{
    AccountEntry, Attendance, AttendanceOrigin, AttendanceState, Member, RegistrationBlocker,
    SelfUnregisterBlocker, Shift, ShiftPolicy, Slot, format_short_date,
};
use time::{Duration, PrimitiveDateTime};

/// The outcome of moving one attendance to a new state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceTransition {
    /// The attendance in its new state.
    pub attendance: Attendance,
    /// Cancels the previously attached entry, if its value no longer applies.
    pub reversal_entry: Option<AccountEntry>,
    /// The entry to attach to the attendance once persisted.
    pub new_entry: Option<AccountEntry>,
    pub audit_event: AuditEvent,
}

fn state_snapshot(state: AttendanceState) -> StateSnapshot {
    StateSnapshot::new(format!("state={}", state.as_str()))
}

fn entry_description(shift: &Shift, state: AttendanceState) -> String {
    format!(
        "Shift '{}' on {}: {}",
        shift.name,
        format_short_date(shift.date()),
        state.ledger_label()
    )
}

#[allow(clippy::too_many_arguments)]
fn build_transition(
    attendance: &Attendance,
    current_entry: Option<&AccountEntry>,
    shift: &Shift,
    target: AttendanceState,
    excused_reason: Option<String>,
    action_name: &str,
    actor: Actor,
    cause: Cause,
    now: PrimitiveDateTime,
) -> Result<AttendanceTransition, CoreError> {
    attendance.state.validate_transition(target)?;

    let new_value: i32 = target.ledger_value();
    let mut updated: Attendance = attendance.clone();
    let mut reversal_entry: Option<AccountEntry> = None;
    let mut keeps_entry: bool = false;

    if let Some(entry) = current_entry {
        if entry.value == new_value {
            keeps_entry = true;
        } else {
            reversal_entry = Some(entry.reversal(shift.start_time));
            updated.account_entry_id = None;
        }
    }

    let new_entry: Option<AccountEntry> = (new_value != 0 && !keeps_entry).then(|| {
        AccountEntry::new(
            attendance.member_id,
            new_value,
            shift.start_time,
            entry_description(shift, target),
        )
    });

    updated.state = target;
    updated.excused_reason.clone_from(&excused_reason);
    updated.last_state_update = now;

    let audit_event: AuditEvent = AuditEvent::new(
        actor,
        cause,
        Action::new(action_name.to_string(), excused_reason),
        state_snapshot(attendance.state),
        state_snapshot(target),
        Some(attendance.member_id),
        now,
    );

    Ok(AttendanceTransition {
        attendance: updated,
        reversal_entry,
        new_entry,
        audit_event,
    })
}

/// Plans moving an attendance to `target`.
///
/// Entries are dated at the shift start. An attendance whose attached entry
/// no longer matches the ledger value of the target state gets a reversal
/// entry before the new one is attached.
///
/// # Returns
///
/// * `Ok(None)` if the attendance already is in `target`
/// * `Ok(Some(transition))` otherwise
///
/// # Errors
///
/// Returns an error if the transition is not allowed or the attached entry
/// does not belong to the attendance.
#[allow(clippy::too_many_arguments)]
pub fn plan_attendance_transition(
    attendance: &Attendance,
    current_entry: Option<&AccountEntry>,
    shift: &Shift,
    target: AttendanceState,
    excused_reason: Option<String>,
    actor: Actor,
    cause: Cause,
    now: PrimitiveDateTime,
) -> Result<Option<AttendanceTransition>, CoreError> {
    if attendance.state == target {
        return Ok(None);
    }
    if let Some(entry) = current_entry
        && (entry.member_id != attendance.member_id
            || entry.entry_id != attendance.account_entry_id)
    {
        return Err(CoreError::Internal(format!(
            "account entry {:?} is not attached to attendance {:?}",
            entry.entry_id, attendance.attendance_id
        )));
    }
    build_transition(
        attendance,
        current_entry,
        shift,
        target,
        excused_reason,
        actions::UPDATE_ATTENDANCE_STATE,
        actor,
        cause,
        now,
    )
    .map(Some)
}

/// Checks that moving `attendance` to `target` keeps the slot to a single
/// valid attendance.
///
/// Only a move from an invalid state to a valid one can collide.
///
/// # Errors
///
/// Returns `CoreError::SlotOccupied` if another attendance validly holds
/// the slot.
pub fn check_slot_free_for_transition(
    attendance: &Attendance,
    target: AttendanceState,
    slot_attendances: &[Attendance],
) -> Result<(), CoreError> {
    if attendance.state.is_valid() || !target.is_valid() {
        return Ok(());
    }
    match slot_attendances.iter().find(|other: &&Attendance| {
        other.attendance_id != attendance.attendance_id && other.state.is_valid()
    }) {
        Some(holder) => Err(CoreError::SlotOccupied {
            slot_id: attendance.slot_id,
            holder_id: holder.member_id,
        }),
        None => Ok(()),
    }
}

/// Lists the reasons a member may not unregister from an attendance.
///
/// An empty list means the member may unregister.
#[must_use]
pub fn self_unregister_blockers(
    member_id: i64,
    attendance: &Attendance,
    shift: &Shift,
    holds_attendance_template: bool,
    policy: &ShiftPolicy,
    now: PrimitiveDateTime,
) -> Vec<SelfUnregisterBlocker> {
    let mut blockers: Vec<SelfUnregisterBlocker> = Vec::new();
    if attendance.member_id != member_id {
        blockers.push(SelfUnregisterBlocker::NotOwnAttendance);
    }
    if !attendance.state.is_expected_to_show_up() {
        blockers.push(SelfUnregisterBlocker::NotRegistered);
    }
    if holds_attendance_template {
        blockers.push(SelfUnregisterBlocker::IsAbcdAttendance);
    }
    if (shift.date() - now.date()).whole_days() <= policy.nb_days_for_self_unregister {
        blockers.push(SelfUnregisterBlocker::TooCloseToShift);
    }
    blockers
}

/// Plans a member cancelling their own attendance.
///
/// # Errors
///
/// Returns `CoreError::SelfUnregisterRefused` listing every blocker.
#[allow(clippy::too_many_arguments)]
pub fn plan_self_unregister(
    member_id: i64,
    attendance: &Attendance,
    shift: &Shift,
    holds_attendance_template: bool,
    policy: &ShiftPolicy,
    actor: Actor,
    cause: Cause,
    now: PrimitiveDateTime,
) -> Result<AttendanceTransition, CoreError> {
    let blockers: Vec<SelfUnregisterBlocker> = self_unregister_blockers(
        member_id,
        attendance,
        shift,
        holds_attendance_template,
        policy,
        now,
    );
    if !blockers.is_empty() {
        return Err(CoreError::SelfUnregisterRefused(blockers));
    }
    build_transition(
        attendance,
        None,
        shift,
        AttendanceState::Cancelled,
        None,
        actions::UPDATE_ATTENDANCE_STATE,
        actor,
        cause,
        now,
    )
}

/// Plans a member offering their attendance to a stand-in.
///
/// # Errors
///
/// Returns `CoreError::StandInRefused` if the attendance is not the member's
/// pending attendance or the shift starts too soon.
pub fn plan_look_for_stand_in(
    member_id: i64,
    attendance: &Attendance,
    shift: &Shift,
    policy: &ShiftPolicy,
    actor: Actor,
    cause: Cause,
    now: PrimitiveDateTime,
) -> Result<AttendanceTransition, CoreError> {
    if attendance.member_id != member_id {
        return Err(CoreError::StandInRefused {
            reason: String::from("the attendance belongs to another member"),
        });
    }
    if attendance.state != AttendanceState::Pending {
        return Err(CoreError::StandInRefused {
            reason: format!("the attendance is {}", attendance.state),
        });
    }
    if shift.start_time - now < Duration::days(policy.nb_days_for_self_look_for_stand_in) {
        return Err(CoreError::StandInRefused {
            reason: String::from("the shift starts too soon"),
        });
    }
    build_transition(
        attendance,
        None,
        shift,
        AttendanceState::LookingForStandIn,
        None,
        actions::UPDATE_ATTENDANCE_STATE,
        actor,
        cause,
        now,
    )
}

/// Plans a member withdrawing their stand-in search.
///
/// # Errors
///
/// Returns `CoreError::StandInRefused` if the member is not looking for a
/// stand-in on this attendance.
pub fn plan_cancel_look_for_stand_in(
    member_id: i64,
    attendance: &Attendance,
    shift: &Shift,
    actor: Actor,
    cause: Cause,
    now: PrimitiveDateTime,
) -> Result<AttendanceTransition, CoreError> {
    if attendance.member_id != member_id
        || attendance.state != AttendanceState::LookingForStandIn
    {
        return Err(CoreError::StandInRefused {
            reason: String::from("the member is not looking for a stand-in here"),
        });
    }
    build_transition(
        attendance,
        None,
        shift,
        AttendanceState::Pending,
        None,
        actions::UPDATE_ATTENDANCE_STATE,
        actor,
        cause,
        now,
    )
}

/// Who asks for a registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationMode {
    /// The member registers themselves; every rule applies.
    SelfService,
    /// A shift manager registers the member; only slot occupancy is checked.
    Manager,
}

/// Everything needed to decide a slot registration.
#[derive(Debug, Clone, Copy)]
pub struct RegistrationFacts<'a> {
    pub member: &'a Member,
    pub slot: &'a Slot,
    pub shift: &'a Shift,
    /// Every attendance of the slot, whatever its state.
    pub slot_attendances: &'a [Attendance],
    /// Whether the member holds a valid attendance anywhere on the shift.
    pub member_registered_to_shift: bool,
}

/// Lists the reasons the member may not take the slot.
#[must_use]
pub fn registration_blockers(
    facts: &RegistrationFacts<'_>,
    mode: RegistrationMode,
    now: PrimitiveDateTime,
) -> Vec<RegistrationBlocker> {
    let mut blockers: Vec<RegistrationBlocker> = Vec::new();
    let taken: bool = facts.slot_attendances.iter().any(|attendance| {
        attendance.state.is_valid() && attendance.state != AttendanceState::LookingForStandIn
    });
    if taken {
        blockers.push(RegistrationBlocker::SlotTaken);
    }
    if mode == RegistrationMode::Manager {
        return blockers;
    }
    if facts.member_registered_to_shift {
        blockers.push(RegistrationBlocker::AlreadyRegisteredToShift);
    }
    if !facts
        .member
        .has_capabilities(&facts.slot.required_capabilities)
    {
        blockers.push(RegistrationBlocker::MissingCapabilities);
    }
    if !facts.shift.is_in_future(now) {
        blockers.push(RegistrationBlocker::ShiftInPast);
    }
    if facts.shift.cancelled {
        blockers.push(RegistrationBlocker::ShiftCancelled);
    }
    blockers
}

/// The outcome of a slot registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationPlan {
    /// The new attendance, or a reactivated cancelled one carrying its id.
    pub attendance: Attendance,
    /// The attendance of the member who was looking for a stand-in.
    pub taken_over: Option<AttendanceTransition>,
    pub audit_event: AuditEvent,
}

/// Plans registering a member to a slot.
///
/// A slot whose holder looks for a stand-in is taken over: the holder's
/// attendance is cancelled first. A cancelled attendance of the member on
/// the same slot is reactivated instead of creating a second row.
///
/// # Errors
///
/// Returns `CoreError::RegistrationRefused` listing every blocker.
pub fn plan_registration(
    facts: &RegistrationFacts<'_>,
    mode: RegistrationMode,
    actor: &Actor,
    cause: &Cause,
    now: PrimitiveDateTime,
) -> Result<RegistrationPlan, CoreError> {
    let blockers: Vec<RegistrationBlocker> = registration_blockers(facts, mode, now);
    if !blockers.is_empty() {
        return Err(CoreError::RegistrationRefused(blockers));
    }

    let member_id: i64 = facts.member.id()?;
    let slot_id: i64 = facts.slot.id()?;

    let taken_over: Option<AttendanceTransition> = facts
        .slot_attendances
        .iter()
        .find(|attendance| attendance.state == AttendanceState::LookingForStandIn)
        .map(|attendance| {
            build_transition(
                attendance,
                None,
                facts.shift,
                AttendanceState::Cancelled,
                None,
                actions::ATTENDANCE_TAKEN_OVER,
                actor.clone(),
                cause.clone(),
                now,
            )
        })
        .transpose()?;

    let (attendance, before): (Attendance, StateSnapshot) = match facts
        .slot_attendances
        .iter()
        .find(|attendance| {
            attendance.member_id == member_id && attendance.state == AttendanceState::Cancelled
        }) {
        Some(cancelled) => {
            let mut reactivated: Attendance = cancelled.clone();
            reactivated.state = AttendanceState::Pending;
            reactivated.origin = AttendanceOrigin::Registration;
            reactivated.excused_reason = None;
            reactivated.last_state_update = now;
            (reactivated, state_snapshot(AttendanceState::Cancelled))
        }
        None => (
            Attendance::new(member_id, slot_id, AttendanceOrigin::Registration, now),
            StateSnapshot::new(String::from("state=none")),
        ),
    };

    let audit_event: AuditEvent = AuditEvent::new(
        actor.clone(),
        cause.clone(),
        Action::new(
            actions::CREATE_ATTENDANCE.to_string(),
            Some(format!(
                "Registered to slot '{}' of shift '{}'",
                facts.slot.name, facts.shift.name
            )),
        ),
        before,
        state_snapshot(AttendanceState::Pending),
        Some(member_id),
        now,
    );

    Ok(RegistrationPlan {
        attendance,
        taken_over,
        audit_event,
    })
}

/// Plans cancelling an expected attendance with a reason.
///
/// Used whenever an attendance is withdrawn on the member's behalf.
///
/// # Errors
///
/// Returns an error if the attendance is not expected to show up.
pub(crate) fn plan_cancellation(
    attendance: &Attendance,
    shift: &Shift,
    reason: &str,
    actor: Actor,
    cause: Cause,
    now: PrimitiveDateTime,
) -> Result<AttendanceTransition, CoreError> {
    if !attendance.state.is_expected_to_show_up() {
        return Err(CoreError::Internal(format!(
            "attendance {:?} is {} and cannot be withdrawn",
            attendance.attendance_id, attendance.state
        )));
    }
    build_transition(
        attendance,
        None,
        shift,
        AttendanceState::Cancelled,
        Some(reason.to_string()),
        actions::UPDATE_ATTENDANCE_STATE,
        actor,
        cause,
        now,
    )
}
