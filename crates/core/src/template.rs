// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Keeping generated shifts in sync with recurring attendance templates.

use crate::actions;
use crate::attendance::{AttendanceTransition, plan_cancellation};
use crate::error::CoreError;
use coop_shifts_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use coop_shifts_domain::{
    Attendance, AttendanceOrigin, AttendanceState, AttendanceTemplate, Member,
    RegistrationBlocker, Shift, Slot, SlotTemplate,
};
use time::PrimitiveDateTime;

/// What a slot of a generated shift looks like right now.
#[derive(Debug, Clone, Copy)]
pub struct SlotReconciliationFacts<'a> {
    pub shift: &'a Shift,
    pub slot: &'a Slot,
    /// Every attendance of the slot, whatever its state.
    pub attendances: &'a [Attendance],
    /// The member holding the slot template, if any.
    pub template_member_id: Option<i64>,
    /// Whether that member is exempted on the shift date.
    pub template_member_exempted: bool,
}

/// The writes that bring a slot in line with its slot template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotReconciliation {
    /// Template attendances of members who left the template.
    pub delete_attendance_ids: Vec<i64>,
    /// A cancelled attendance of the template member, set back to pending.
    pub reactivate: Option<Attendance>,
    /// A fresh pending attendance for the template member.
    pub create: Option<Attendance>,
}

impl SlotReconciliation {
    /// Returns `true` if the slot already matches its template.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.delete_attendance_ids.is_empty() && self.reactivate.is_none() && self.create.is_none()
    }
}

/// Plans the reconciliation of one slot with its slot template.
///
/// Past and cancelled shifts are never touched. Running the plan and
/// planning again yields an empty reconciliation.
///
/// # Errors
///
/// Returns an error if a stale attendance has no identifier.
pub fn plan_slot_reconciliation(
    facts: &SlotReconciliationFacts<'_>,
    now: PrimitiveDateTime,
) -> Result<SlotReconciliation, CoreError> {
    let mut plan: SlotReconciliation = SlotReconciliation::default();
    if !facts.shift.is_in_future(now)
        || facts.shift.cancelled
        || facts.slot.slot_template_id.is_none()
    {
        return Ok(plan);
    }

    let mut remaining: Vec<&Attendance> = Vec::new();
    for attendance in facts.attendances {
        let stale: bool = attendance.origin == AttendanceOrigin::Template
            && attendance.state.is_expected_to_show_up()
            && attendance.account_entry_id.is_none()
            && Some(attendance.member_id) != facts.template_member_id;
        if stale {
            plan.delete_attendance_ids.push(attendance.id()?);
        } else {
            remaining.push(attendance);
        }
    }

    let Some(member_id) = facts.template_member_id else {
        return Ok(plan);
    };
    if facts.template_member_exempted
        || remaining
            .iter()
            .any(|attendance| attendance.state.is_valid())
    {
        return Ok(plan);
    }

    if let Some(cancelled) = remaining.iter().find(|attendance| {
        attendance.member_id == member_id && attendance.state == AttendanceState::Cancelled
    }) {
        let mut reactivated: Attendance = (*cancelled).clone();
        reactivated.state = AttendanceState::Pending;
        reactivated.origin = AttendanceOrigin::Template;
        reactivated.excused_reason = None;
        reactivated.last_state_update = now;
        plan.reactivate = Some(reactivated);
    } else {
        plan.create = Some(Attendance::new(
            member_id,
            facts.slot.id()?,
            AttendanceOrigin::Template,
            now,
        ));
    }
    Ok(plan)
}

/// Lists the reasons the member may not take over a slot template.
#[must_use]
pub fn slot_template_registration_blockers(
    member: &Member,
    slot_template: &SlotTemplate,
    current_holder: Option<&AttendanceTemplate>,
    member_in_shift_template: bool,
) -> Vec<RegistrationBlocker> {
    let mut blockers: Vec<RegistrationBlocker> = Vec::new();
    if current_holder.is_some() {
        blockers.push(RegistrationBlocker::SlotTaken);
    }
    if member_in_shift_template {
        blockers.push(RegistrationBlocker::AlreadyRegisteredToShift);
    }
    if !member.has_capabilities(&slot_template.required_capabilities) {
        blockers.push(RegistrationBlocker::MissingCapabilities);
    }
    blockers
}

/// A new recurring assignment and its audit event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceTemplatePlan {
    pub attendance_template: AttendanceTemplate,
    pub audit_event: AuditEvent,
}

/// Plans assigning a member to a slot template.
///
/// # Errors
///
/// Returns `CoreError::RegistrationRefused` listing every blocker.
pub fn plan_attendance_template_creation(
    member: &Member,
    slot_template: &SlotTemplate,
    current_holder: Option<&AttendanceTemplate>,
    member_in_shift_template: bool,
    actor: Actor,
    cause: Cause,
    now: PrimitiveDateTime,
) -> Result<AttendanceTemplatePlan, CoreError> {
    let blockers: Vec<RegistrationBlocker> = slot_template_registration_blockers(
        member,
        slot_template,
        current_holder,
        member_in_shift_template,
    );
    if !blockers.is_empty() {
        return Err(CoreError::RegistrationRefused(blockers));
    }

    let member_id: i64 = member.id()?;
    let slot_template_id: i64 = slot_template.id()?;
    let audit_event: AuditEvent = AuditEvent::new(
        actor,
        cause,
        Action::new(
            actions::CREATE_ATTENDANCE_TEMPLATE.to_string(),
            Some(format!("Registered to slot template '{}'", slot_template.name)),
        ),
        StateSnapshot::new(String::from("slot_template=none")),
        StateSnapshot::new(format!("slot_template={slot_template_id}")),
        Some(member_id),
        now,
    );

    Ok(AttendanceTemplatePlan {
        attendance_template: AttendanceTemplate::new(member_id, slot_template_id),
        audit_event,
    })
}

/// Removing a member from a slot template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateWithdrawal {
    pub attendance_template: AttendanceTemplate,
    /// Cancellations of the member's attendances on the template's slots.
    pub cancellations: Vec<AttendanceTransition>,
    pub audit_event: AuditEvent,
}

/// Plans deleting an attendance template.
///
/// `attendances` are the member's attendances on slots generated from the
/// template's slot template. Those starting at or after `from` and still
/// expected to show up are cancelled with `reason`.
///
/// # Errors
///
/// Returns an error if the template has no identifier.
pub fn plan_template_withdrawal(
    attendance_template: &AttendanceTemplate,
    attendances: &[(Attendance, Shift)],
    from: PrimitiveDateTime,
    reason: &str,
    actor: &Actor,
    cause: &Cause,
    now: PrimitiveDateTime,
) -> Result<TemplateWithdrawal, CoreError> {
    attendance_template.id()?;

    let cancellations: Vec<AttendanceTransition> = attendances
        .iter()
        .filter(|(attendance, shift)| {
            attendance.member_id == attendance_template.member_id
                && shift.start_time >= from
                && attendance.state.is_expected_to_show_up()
        })
        .map(|(attendance, shift)| {
            plan_cancellation(attendance, shift, reason, actor.clone(), cause.clone(), now)
        })
        .collect::<Result<Vec<AttendanceTransition>, CoreError>>()?;

    let audit_event: AuditEvent = AuditEvent::new(
        actor.clone(),
        cause.clone(),
        Action::new(
            actions::DELETE_ATTENDANCE_TEMPLATE.to_string(),
            Some(reason.to_string()),
        ),
        StateSnapshot::new(format!(
            "slot_template={}",
            attendance_template.slot_template_id
        )),
        StateSnapshot::new(String::from("slot_template=none")),
        Some(attendance_template.member_id),
        now,
    );

    Ok(TemplateWithdrawal {
        attendance_template: attendance_template.clone(),
        cancellations,
        audit_event,
    })
}
