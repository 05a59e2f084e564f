// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Attendance operations.
//!
//! Every operation loads its facts, asks the core planner for the
//! transition, and writes the result inside one transaction. Notifications
//! go out after the commit.

use crate::error::{ApiError, not_found};
use crate::members::require_member;
use crate::notifications::{self, MailTransport, send_notification};
use coop_shifts::{
    AttendanceTransition, RegistrationFacts, RegistrationMode, RegistrationPlan,
    check_slot_free_for_transition, plan_attendance_transition, plan_cancel_look_for_stand_in,
    plan_look_for_stand_in, plan_registration, plan_self_unregister,
};
use coop_shifts_audit::{Actor, Cause};
use coop_shifts_domain::{
    AccountEntry, Attendance, AttendanceState, AttendanceTemplate, Member, Notification, Shift,
    ShiftPolicy, Slot,
};
use coop_shifts_persistence::Persistence;
use time::PrimitiveDateTime;
use tracing::{info, warn};

/// An attendance together with the slot and shift it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceContext {
    pub attendance: Attendance,
    pub slot: Slot,
    pub shift: Shift,
}

pub fn require_shift(
    persistence: &mut Persistence,
    shift_id: i64,
) -> Result<Shift, ApiError> {
    persistence
        .get_shift(shift_id)?
        .ok_or_else(|| not_found("Shift", shift_id))
}

pub fn require_slot(
    persistence: &mut Persistence,
    slot_id: i64,
) -> Result<Slot, ApiError> {
    persistence
        .get_slot(slot_id)?
        .ok_or_else(|| not_found("Slot", slot_id))
}

pub fn load_attendance_context(
    persistence: &mut Persistence,
    attendance_id: i64,
) -> Result<AttendanceContext, ApiError> {
    let attendance: Attendance = persistence
        .get_attendance(attendance_id)?
        .ok_or_else(|| not_found("Attendance", attendance_id))?;
    let slot: Slot = require_slot(persistence, attendance.slot_id)?;
    let shift: Shift = require_shift(persistence, slot.shift_id)?;
    Ok(AttendanceContext {
        attendance,
        slot,
        shift,
    })
}

/// Loads the ledger entry currently attached to an attendance.
pub fn load_attached_entry(
    persistence: &mut Persistence,
    attendance: &Attendance,
) -> Result<Option<AccountEntry>, ApiError> {
    let Some(entry_id) = attendance.account_entry_id else {
        return Ok(None);
    };
    let entry: AccountEntry = persistence
        .get_account_entry(entry_id)?
        .ok_or_else(|| ApiError::Internal {
            message: format!(
                "attendance {:?} points at missing account entry {entry_id}",
                attendance.attendance_id
            ),
        })?;
    Ok(Some(entry))
}

/// Writes a planned transition.
///
/// The reversal entry is appended before the new entry, the new entry id is
/// attached to the attendance, and the audit event goes last.
pub fn persist_transition(
    persistence: &mut Persistence,
    transition: &AttendanceTransition,
) -> Result<Attendance, ApiError> {
    let mut attendance: Attendance = transition.attendance.clone();
    if let Some(reversal) = &transition.reversal_entry {
        persistence.create_account_entry(reversal)?;
    }
    if let Some(entry) = &transition.new_entry {
        attendance.account_entry_id = Some(persistence.create_account_entry(entry)?);
    }
    persistence.update_attendance(&attendance)?;
    persistence.persist_audit_event(&transition.audit_event)?;
    Ok(attendance)
}

/// Delivers a notification in its own transaction after a commit.
pub fn notify_after_commit(
    persistence: &mut Persistence,
    transport: &dyn MailTransport,
    notification: &Notification,
    now: PrimitiveDateTime,
) -> Result<(), ApiError> {
    persistence
        .transaction::<_, ApiError, _>(|tx: &mut Persistence| {
            send_notification(tx, transport, notification, now)
        })
        .inspect_err(|err: &ApiError| {
            warn!(
                member_id = notification.member_id,
                kind = notification.kind.id(),
                error = %err,
                "Notification failed after the change was committed"
            );
        })
}

/// Moves an attendance to `target` on behalf of a shift manager.
///
/// A transition to `Missed` sends the shift-missed notification once the
/// change is committed.
///
/// # Returns
///
/// * `Ok(None)` if the attendance already is in `target`
/// * `Ok(Some(attendance))` with the updated attendance otherwise
///
/// # Errors
///
/// Returns an error if the attendance does not exist, the transition is not
/// allowed, or the notification cannot be delivered. In the last case the
/// state change is already committed.
#[allow(clippy::too_many_arguments)]
pub fn update_attendance_state(
    persistence: &mut Persistence,
    transport: &dyn MailTransport,
    attendance_id: i64,
    target: AttendanceState,
    excused_reason: Option<String>,
    actor: Actor,
    cause: Cause,
    now: PrimitiveDateTime,
) -> Result<Option<Attendance>, ApiError> {
    let outcome: Option<(Attendance, Shift)> = persistence
        .transaction::<_, ApiError, _>(|tx: &mut Persistence| {
            let context: AttendanceContext = load_attendance_context(tx, attendance_id)?;
            let current_entry: Option<AccountEntry> = load_attached_entry(tx, &context.attendance)?;
            let slot_attendances: Vec<Attendance> =
                tx.list_attendances_for_slot(context.attendance.slot_id)?;
            check_slot_free_for_transition(&context.attendance, target, &slot_attendances)?;
            let Some(transition) = plan_attendance_transition(
                &context.attendance,
                current_entry.as_ref(),
                &context.shift,
                target,
                excused_reason,
                actor,
                cause,
                now,
            )?
            else {
                return Ok(None);
            };
            let updated: Attendance = persist_transition(tx, &transition)?;
            Ok(Some((updated, context.shift)))
        })?;

    let Some((attendance, shift)) = outcome else {
        return Ok(None);
    };
    info!(
        attendance_id,
        member_id = attendance.member_id,
        state = %attendance.state,
        "Updated attendance state"
    );

    if attendance.state == AttendanceState::Missed {
        let member: Member = require_member(persistence, attendance.member_id)?;
        let notification: Notification = notifications::shift_missed(&member, &shift)?;
        notify_after_commit(persistence, transport, &notification, now)?;
    }
    Ok(Some(attendance))
}

fn holds_template_for_slot(
    persistence: &mut Persistence,
    member_id: i64,
    slot: &Slot,
) -> Result<bool, ApiError> {
    let Some(slot_template_id) = slot.slot_template_id else {
        return Ok(false);
    };
    let holder: Option<AttendanceTemplate> =
        persistence.get_attendance_template_for_slot_template(slot_template_id)?;
    Ok(holder.is_some_and(|template| template.member_id == member_id))
}

/// Cancels a member's own attendance.
///
/// # Errors
///
/// Returns `ApiError::SelfUnregisterNotAllowed` listing every reason the
/// member may not unregister, or another error if a lookup fails.
pub fn self_unregister(
    persistence: &mut Persistence,
    member_id: i64,
    attendance_id: i64,
    policy: &ShiftPolicy,
    actor: Actor,
    cause: Cause,
    now: PrimitiveDateTime,
) -> Result<Attendance, ApiError> {
    persistence.transaction::<_, ApiError, _>(|tx: &mut Persistence| {
        let context: AttendanceContext = load_attendance_context(tx, attendance_id)?;
        let holds_template: bool = holds_template_for_slot(tx, member_id, &context.slot)?;
        let transition: AttendanceTransition = plan_self_unregister(
            member_id,
            &context.attendance,
            &context.shift,
            holds_template,
            policy,
            actor,
            cause,
            now,
        )?;
        let updated: Attendance = persist_transition(tx, &transition)?;
        info!(member_id, attendance_id, "Member unregistered from shift");
        Ok(updated)
    })
}

/// Offers a member's attendance to a stand-in.
///
/// The member stays responsible until someone takes the slot.
///
/// # Errors
///
/// Returns an error if the attendance is not the member's pending
/// attendance or the shift starts too soon.
pub fn look_for_stand_in(
    persistence: &mut Persistence,
    member_id: i64,
    attendance_id: i64,
    policy: &ShiftPolicy,
    actor: Actor,
    cause: Cause,
    now: PrimitiveDateTime,
) -> Result<Attendance, ApiError> {
    persistence.transaction::<_, ApiError, _>(|tx: &mut Persistence| {
        let context: AttendanceContext = load_attendance_context(tx, attendance_id)?;
        let transition: AttendanceTransition = plan_look_for_stand_in(
            member_id,
            &context.attendance,
            &context.shift,
            policy,
            actor,
            cause,
            now,
        )?;
        persist_transition(tx, &transition)
    })
}

/// Withdraws a stand-in search.
///
/// # Errors
///
/// Returns an error if the member is not looking for a stand-in on this
/// attendance.
pub fn cancel_look_for_stand_in(
    persistence: &mut Persistence,
    member_id: i64,
    attendance_id: i64,
    actor: Actor,
    cause: Cause,
    now: PrimitiveDateTime,
) -> Result<Attendance, ApiError> {
    persistence.transaction::<_, ApiError, _>(|tx: &mut Persistence| {
        let context: AttendanceContext = load_attendance_context(tx, attendance_id)?;
        let transition: AttendanceTransition = plan_cancel_look_for_stand_in(
            member_id,
            &context.attendance,
            &context.shift,
            actor,
            cause,
            now,
        )?;
        persist_transition(tx, &transition)
    })
}

/// Registers a member to a slot.
///
/// When the slot holder was looking for a stand-in, their attendance is
/// cancelled first and they get the stand-in-found notification once the
/// registration is committed.
///
/// # Errors
///
/// Returns an error if a registration rule blocks the member, a lookup
/// fails, or the stand-in notification cannot be delivered.
#[allow(clippy::too_many_arguments)]
pub fn register_member_to_slot(
    persistence: &mut Persistence,
    transport: &dyn MailTransport,
    member_id: i64,
    slot_id: i64,
    mode: RegistrationMode,
    actor: &Actor,
    cause: &Cause,
    now: PrimitiveDateTime,
) -> Result<Attendance, ApiError> {
    let (attendance, shift, replaced_member_id): (Attendance, Shift, Option<i64>) = persistence
        .transaction::<_, ApiError, _>(|tx: &mut Persistence| {
            let member: Member = require_member(tx, member_id)?;
            let slot: Slot = require_slot(tx, slot_id)?;
            let shift: Shift = require_shift(tx, slot.shift_id)?;
            let slot_attendances: Vec<Attendance> = tx.list_attendances_for_slot(slot_id)?;
            let member_registered_to_shift: bool =
                tx.member_has_valid_attendance_on_shift(member_id, shift.id()?)?;

            let plan: RegistrationPlan = plan_registration(
                &RegistrationFacts {
                    member: &member,
                    slot: &slot,
                    shift: &shift,
                    slot_attendances: &slot_attendances,
                    member_registered_to_shift,
                },
                mode,
                actor,
                cause,
                now,
            )?;

            // The holder's attendance must leave the slot before the new one takes it.
            let replaced_member_id: Option<i64> = match &plan.taken_over {
                Some(transition) => {
                    persist_transition(tx, transition)?;
                    Some(transition.attendance.member_id)
                }
                None => None,
            };

            let mut attendance: Attendance = plan.attendance;
            if attendance.attendance_id.is_some() {
                tx.update_attendance(&attendance)?;
            } else {
                attendance.attendance_id = Some(tx.create_attendance(&attendance)?);
            }
            tx.persist_audit_event(&plan.audit_event)?;
            Ok((attendance, shift, replaced_member_id))
        })?;

    info!(member_id, slot_id, mode = ?mode, "Registered member to slot");

    if let Some(replaced) = replaced_member_id {
        let holder: Member = require_member(persistence, replaced)?;
        let notification: Notification = notifications::stand_in_found(&holder, &shift)?;
        notify_after_commit(persistence, transport, &notification, now)?;
    }
    Ok(attendance)
}
