// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Generated shifts and their recurring assignments.
//!
//! Shift templates produce one shift per week of their group. Attendance
//! templates bind a member to a slot template, and every future shift
//! generated from it is kept in line with that binding.

use crate::attendance::{load_attached_entry, persist_transition, require_shift};
use crate::error::{ApiError, not_found};
use crate::members::require_member;
use crate::watches::create_watches_for_shift;
use coop_shifts::{
    AttendanceTemplatePlan, SHIFT_CANCELLED_REASON, ShiftCancellationPlan, ShiftOccurrence,
    SlotAttendances, SlotReconciliation, SlotReconciliationFacts, TemplateAttendances,
    TemplateWithdrawal, plan_attendance_template_creation, plan_attendance_transition,
    plan_generation, plan_shift_cancellation, plan_slot_reconciliation, plan_template_withdrawal,
};
use coop_shifts_audit::{Actor, Cause};
use coop_shifts_domain::{
    AccountEntry, Attendance, AttendanceOrigin, AttendanceState, AttendanceTemplate, Capability,
    Exemption, Member, Shift, ShiftTemplate, Slot, SlotTemplate,
};
use coop_shifts_persistence::Persistence;
use time::{Date, PrimitiveDateTime};
use tracing::{debug, info};

fn require_shift_template(
    persistence: &mut Persistence,
    shift_template_id: i64,
) -> Result<ShiftTemplate, ApiError> {
    persistence
        .get_shift_template(shift_template_id)?
        .ok_or_else(|| not_found("Shift template", shift_template_id))
}

fn require_slot_template(
    persistence: &mut Persistence,
    slot_template_id: i64,
) -> Result<SlotTemplate, ApiError> {
    persistence
        .get_slot_template(slot_template_id)?
        .ok_or_else(|| not_found("Slot template", slot_template_id))
}

/// Loads every attendance template of a member with the member's
/// attendances on the slots generated from it.
///
/// # Errors
///
/// Returns an error if a query fails.
pub fn load_template_attendances(
    persistence: &mut Persistence,
    member_id: i64,
) -> Result<Vec<TemplateAttendances>, ApiError> {
    let templates: Vec<AttendanceTemplate> =
        persistence.list_attendance_templates_for_member(member_id)?;
    let mut loaded: Vec<TemplateAttendances> = Vec::with_capacity(templates.len());
    for attendance_template in templates {
        let attendances: Vec<(Attendance, Shift)> = persistence
            .list_member_attendances_for_slot_template(
                member_id,
                attendance_template.slot_template_id,
            )?;
        loaded.push(TemplateAttendances {
            attendance_template,
            attendances,
        });
    }
    Ok(loaded)
}

/// Writes a planned template withdrawal: the cancellations, the deletion
/// of the attendance template, and its audit event.
///
/// # Errors
///
/// Returns an error if a write fails.
pub fn apply_withdrawal(
    persistence: &mut Persistence,
    withdrawal: &TemplateWithdrawal,
) -> Result<(), ApiError> {
    for cancellation in &withdrawal.cancellations {
        persist_transition(persistence, cancellation)?;
    }
    persistence.delete_attendance_template(withdrawal.attendance_template.id()?)?;
    persistence.persist_audit_event(&withdrawal.audit_event)?;
    Ok(())
}

fn is_exempted_at(
    persistence: &mut Persistence,
    member_id: i64,
    date: Date,
) -> Result<bool, ApiError> {
    let exemptions: Vec<Exemption> = persistence.list_exemptions(member_id)?;
    Ok(exemptions.iter().any(|exemption| exemption.is_active_at(date)))
}

/// Brings every slot of a shift in line with its slot template.
///
/// Deletions run first so the template member's attendance never collides
/// with a stale one on the slot.
fn reconcile_shift(
    persistence: &mut Persistence,
    shift: &Shift,
    now: PrimitiveDateTime,
) -> Result<usize, ApiError> {
    let mut changes: usize = 0;
    for slot in persistence.list_slots_for_shift(shift.id()?)? {
        let template_member_id: Option<i64> = match slot.slot_template_id {
            Some(slot_template_id) => persistence
                .get_attendance_template_for_slot_template(slot_template_id)?
                .map(|template| template.member_id),
            None => None,
        };
        let template_member_exempted: bool = match template_member_id {
            Some(member_id) => is_exempted_at(persistence, member_id, shift.date())?,
            None => false,
        };
        let attendances: Vec<Attendance> = persistence.list_attendances_for_slot(slot.id()?)?;

        let plan: SlotReconciliation = plan_slot_reconciliation(
            &SlotReconciliationFacts {
                shift,
                slot: &slot,
                attendances: &attendances,
                template_member_id,
                template_member_exempted,
            },
            now,
        )?;
        if plan.is_empty() {
            continue;
        }

        for attendance_id in &plan.delete_attendance_ids {
            persistence.delete_attendance(*attendance_id)?;
            changes += 1;
        }
        if let Some(reactivated) = &plan.reactivate {
            persistence.update_attendance(reactivated)?;
            changes += 1;
        }
        if let Some(created) = &plan.create {
            persistence.create_attendance(created)?;
            changes += 1;
        }
    }
    if changes > 0 {
        debug!(shift_id = ?shift.shift_id, changes, "Reconciled shift attendances");
    }
    Ok(changes)
}

/// Creates the shift of a template for one week, with its slots.
///
/// Returns the shift and whether it was created by this call.
fn create_shift_in(
    persistence: &mut Persistence,
    template: &ShiftTemplate,
    week_start: Date,
    now: PrimitiveDateTime,
) -> Result<(Shift, bool), ApiError> {
    let mut shift: Shift = template.build_shift(week_start)?;
    if let Some(existing) = persistence.find_shift(template.id()?, shift.start_time)? {
        return Ok((existing, false));
    }

    shift.shift_id = Some(persistence.create_shift(&shift)?);
    let shift_id: i64 = shift.id()?;
    for slot_template in persistence.list_slot_templates(template.id()?)? {
        let slot: Slot = slot_template.build_slot(shift_id)?;
        persistence.create_slot(&slot)?;
    }
    reconcile_shift(persistence, &shift, now)?;
    create_watches_for_shift(persistence, &shift, template.group)?;
    Ok((shift, true))
}

/// Creates the shift of a template in the week starting at `week_start`.
///
/// If the shift already exists it is returned unchanged. Otherwise the
/// shift and one slot per slot template are created and the attendance
/// templates are applied.
///
/// # Errors
///
/// Returns an error if the template does not exist or a write fails.
pub fn create_shift(
    persistence: &mut Persistence,
    shift_template_id: i64,
    week_start: Date,
    now: PrimitiveDateTime,
) -> Result<Shift, ApiError> {
    persistence.transaction::<_, ApiError, _>(|tx: &mut Persistence| {
        let template: ShiftTemplate = require_shift_template(tx, shift_template_id)?;
        let (shift, created): (Shift, bool) = create_shift_in(tx, &template, week_start, now)?;
        if created {
            info!(shift_template_id, %week_start, "Created shift from template");
        }
        Ok(shift)
    })
}

/// Outcome counts of a generation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationSummary {
    pub created: usize,
    pub existing: usize,
}

/// Generates the shifts of every week group template from `start` to `end`.
///
/// `anchors` are the dates on which an A week starts. Each shift is
/// created in its own transaction; existing shifts are left alone.
///
/// # Errors
///
/// Returns an error if the templates cannot be loaded or a shift cannot be
/// created.
pub fn generate_shifts_up_to(
    persistence: &mut Persistence,
    start: Date,
    end: Date,
    anchors: &[Date],
    now: PrimitiveDateTime,
) -> Result<GenerationSummary, ApiError> {
    let templates: Vec<ShiftTemplate> = persistence.list_shift_templates()?;
    let occurrences: Vec<ShiftOccurrence> = plan_generation(&templates, start, end, anchors)?;

    let mut summary: GenerationSummary = GenerationSummary::default();
    for occurrence in occurrences {
        let Some(template) = templates
            .iter()
            .find(|template| template.shift_template_id == Some(occurrence.shift_template_id))
        else {
            continue;
        };
        let (_, created): (Shift, bool) = persistence
            .transaction::<_, ApiError, _>(|tx: &mut Persistence| {
                create_shift_in(tx, template, occurrence.week_start, now)
            })?;
        if created {
            summary.created += 1;
        } else {
            summary.existing += 1;
        }
    }
    info!(
        %start,
        %end,
        created = summary.created,
        existing = summary.existing,
        "Generated shifts"
    );
    Ok(summary)
}

/// Applies the attendance templates to one shift.
///
/// Past and cancelled shifts are left alone. Running it twice changes
/// nothing the second time.
///
/// # Errors
///
/// Returns an error if the shift does not exist or a write fails.
pub fn update_attendances_from_shift_template(
    persistence: &mut Persistence,
    shift_id: i64,
    now: PrimitiveDateTime,
) -> Result<usize, ApiError> {
    persistence.transaction::<_, ApiError, _>(|tx: &mut Persistence| {
        let shift: Shift = require_shift(tx, shift_id)?;
        reconcile_shift(tx, &shift, now)
    })
}

/// Applies the attendance templates to every future shift of a template.
///
/// # Errors
///
/// Returns an error if a query or write fails.
pub fn update_future_shift_attendances(
    persistence: &mut Persistence,
    shift_template_id: i64,
    now: PrimitiveDateTime,
) -> Result<usize, ApiError> {
    persistence.transaction::<_, ApiError, _>(|tx: &mut Persistence| {
        let mut changes: usize = 0;
        for shift in tx.list_future_shifts_for_template(shift_template_id, now)? {
            changes += reconcile_shift(tx, &shift, now)?;
        }
        Ok(changes)
    })
}

/// Credits the new template holder for future shifts that were cancelled
/// before they joined, as if the shift had been cancelled under them.
fn credit_cancelled_shifts(
    persistence: &mut Persistence,
    member_id: i64,
    slot_template: &SlotTemplate,
    actor: &Actor,
    cause: &Cause,
    now: PrimitiveDateTime,
) -> Result<(), ApiError> {
    let slot_template_id: i64 = slot_template.id()?;
    for shift in persistence.list_future_shifts_for_template(slot_template.shift_template_id, now)?
    {
        if !shift.cancelled {
            continue;
        }
        let Some(slot) = persistence.find_slot_for_slot_template(shift.id()?, slot_template_id)?
        else {
            continue;
        };
        let slot_id: i64 = slot.id()?;
        let slot_attendances: Vec<Attendance> = persistence.list_attendances_for_slot(slot_id)?;
        let already_credited: bool = slot_attendances.iter().any(|attendance| {
            attendance.member_id == member_id && attendance.state != AttendanceState::Cancelled
        });
        // A manager may have filled the slot after the cancellation.
        let occupied: bool = slot_attendances
            .iter()
            .any(|attendance| attendance.state.is_valid());
        if already_credited || occupied {
            continue;
        }

        let mut attendance: Attendance =
            Attendance::new(member_id, slot_id, AttendanceOrigin::Template, now);
        attendance.attendance_id = Some(persistence.create_attendance(&attendance)?);
        if let Some(transition) = plan_attendance_transition(
            &attendance,
            None,
            &shift,
            AttendanceState::MissedExcused,
            Some(SHIFT_CANCELLED_REASON.to_string()),
            actor.clone(),
            cause.clone(),
            now,
        )? {
            persist_transition(persistence, &transition)?;
        }
    }
    Ok(())
}

/// Assigns a member to a slot template.
///
/// The member gets a pending attendance on every future shift generated
/// from the template, and an excused attendance on every future shift that
/// already was cancelled.
///
/// # Errors
///
/// Returns an error if the slot template is taken, the member already
/// holds a slot of the same shift template, lacks a capability, or a write
/// fails.
pub fn register_member_to_slot_template(
    persistence: &mut Persistence,
    member_id: i64,
    slot_template_id: i64,
    actor: &Actor,
    cause: &Cause,
    now: PrimitiveDateTime,
) -> Result<AttendanceTemplate, ApiError> {
    persistence.transaction::<_, ApiError, _>(|tx: &mut Persistence| {
        let member: Member = require_member(tx, member_id)?;
        let slot_template: SlotTemplate = require_slot_template(tx, slot_template_id)?;
        let current_holder: Option<AttendanceTemplate> =
            tx.get_attendance_template_for_slot_template(slot_template_id)?;
        let in_shift_template: bool = tx
            .member_has_attendance_template_in_shift_template(
                member_id,
                slot_template.shift_template_id,
            )?;

        let plan: AttendanceTemplatePlan = plan_attendance_template_creation(
            &member,
            &slot_template,
            current_holder.as_ref(),
            in_shift_template,
            actor.clone(),
            cause.clone(),
            now,
        )?;
        let mut attendance_template: AttendanceTemplate = plan.attendance_template;
        attendance_template.attendance_template_id =
            Some(tx.create_attendance_template(&attendance_template)?);
        tx.persist_audit_event(&plan.audit_event)?;

        for shift in tx.list_future_shifts_for_template(slot_template.shift_template_id, now)? {
            reconcile_shift(tx, &shift, now)?;
        }
        credit_cancelled_shifts(tx, member_id, &slot_template, actor, cause, now)?;

        info!(member_id, slot_template_id, "Registered member to slot template");
        Ok(attendance_template)
    })
}

/// Removes a member from a slot template.
///
/// The member's attendances on future shifts of the template that are
/// still expected are cancelled with `reason`.
///
/// # Errors
///
/// Returns an error if the attendance template does not exist or a write
/// fails.
pub fn delete_attendance_template(
    persistence: &mut Persistence,
    attendance_template_id: i64,
    reason: &str,
    actor: &Actor,
    cause: &Cause,
    now: PrimitiveDateTime,
) -> Result<(), ApiError> {
    persistence.transaction::<_, ApiError, _>(|tx: &mut Persistence| {
        let attendance_template: AttendanceTemplate = tx
            .get_attendance_template(attendance_template_id)?
            .ok_or_else(|| not_found("Attendance template", attendance_template_id))?;
        let attendances: Vec<(Attendance, Shift)> = tx.list_member_attendances_for_slot_template(
            attendance_template.member_id,
            attendance_template.slot_template_id,
        )?;
        let withdrawal: TemplateWithdrawal = plan_template_withdrawal(
            &attendance_template,
            &attendances,
            now,
            reason,
            actor,
            cause,
            now,
        )?;
        apply_withdrawal(tx, &withdrawal)?;
        info!(
            attendance_template_id,
            member_id = attendance_template.member_id,
            cancelled = withdrawal.cancellations.len(),
            "Deleted attendance template"
        );
        Ok(())
    })
}

/// Adds a slot template to a shift template.
///
/// Every future shift already generated from the template gets the new
/// slot.
///
/// # Errors
///
/// Returns an error if the shift template does not exist or a write fails.
pub fn add_slot_template(
    persistence: &mut Persistence,
    shift_template_id: i64,
    name: &str,
    required_capabilities: Vec<Capability>,
    now: PrimitiveDateTime,
) -> Result<SlotTemplate, ApiError> {
    persistence.transaction::<_, ApiError, _>(|tx: &mut Persistence| {
        require_shift_template(tx, shift_template_id)?;
        let mut slot_template: SlotTemplate =
            SlotTemplate::new(shift_template_id, name, required_capabilities);
        slot_template.slot_template_id = Some(tx.create_slot_template(&slot_template)?);

        let mut slots_added: usize = 0;
        for shift in tx.list_future_shifts_for_template(shift_template_id, now)? {
            let slot: Slot = slot_template.build_slot(shift.id()?)?;
            tx.create_slot(&slot)?;
            slots_added += 1;
        }
        info!(
            shift_template_id,
            slot_template_id = ?slot_template.slot_template_id,
            slots_added,
            "Added slot template"
        );
        Ok(slot_template)
    })
}

fn load_slot_attendances(
    persistence: &mut Persistence,
    slot: Slot,
) -> Result<SlotAttendances, ApiError> {
    let template_member_id: Option<i64> = match slot.slot_template_id {
        Some(slot_template_id) => persistence
            .get_attendance_template_for_slot_template(slot_template_id)?
            .map(|template| template.member_id),
        None => None,
    };
    let mut attendances: Vec<(Attendance, Option<AccountEntry>)> = Vec::new();
    for attendance in persistence.list_attendances_for_slot(slot.id()?)? {
        let entry: Option<AccountEntry> = load_attached_entry(persistence, &attendance)?;
        attendances.push((attendance, entry));
    }
    Ok(SlotAttendances {
        slot,
        attendances,
        template_member_id,
    })
}

/// Cancels a shift.
///
/// Template holders are excused, everyone else is unregistered. Cancelling
/// a cancelled shift changes nothing.
///
/// # Errors
///
/// Returns an error if the shift does not exist or a write fails.
pub fn cancel_shift(
    persistence: &mut Persistence,
    shift_id: i64,
    reason: &str,
    actor: &Actor,
    cause: &Cause,
    now: PrimitiveDateTime,
) -> Result<Shift, ApiError> {
    persistence.transaction::<_, ApiError, _>(|tx: &mut Persistence| {
        let shift: Shift = require_shift(tx, shift_id)?;
        let mut slots: Vec<SlotAttendances> = Vec::new();
        for slot in tx.list_slots_for_shift(shift_id)? {
            slots.push(load_slot_attendances(tx, slot)?);
        }

        let Some(plan) = plan_shift_cancellation(&shift, &slots, reason, actor, cause, now)?
        else {
            debug!(shift_id, "Shift already cancelled");
            return Ok(shift);
        };
        let ShiftCancellationPlan {
            shift: cancelled,
            transitions,
            audit_event,
        } = plan;

        tx.update_shift_cancellation(shift_id, true, cancelled.cancelled_reason.as_deref())?;
        for transition in &transitions {
            persist_transition(tx, transition)?;
        }
        tx.persist_audit_event(&audit_event)?;
        info!(shift_id, attendances = transitions.len(), "Cancelled shift");
        Ok(cancelled)
    })
}
