// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shift exemptions and membership pauses.

use crate::attendance::persist_transition;
use crate::error::{ApiError, not_found};
use crate::members::require_member;
use crate::shifts::{apply_withdrawal, load_template_attendances};
use coop_shifts::{
    AbsenceEffects, ExemptionPlan, PausePlan, TemplateAttendances, plan_exemption,
    plan_membership_pause,
};
use coop_shifts_audit::{Actor, Cause};
use coop_shifts_domain::{
    Attendance, DateInterval, Exemption, MembershipPause, Shift, ShiftPolicy, start_of_day,
};
use coop_shifts_persistence::Persistence;
use time::PrimitiveDateTime;
use tracing::info;

fn apply_absence_effects(
    persistence: &mut Persistence,
    effects: &AbsenceEffects,
) -> Result<(), ApiError> {
    for withdrawal in &effects.withdrawals {
        apply_withdrawal(persistence, withdrawal)?;
    }
    for cancellation in &effects.cancellations {
        persist_transition(persistence, cancellation)?;
    }
    Ok(())
}

/// The member's attendances on shifts from the start of `interval` on,
/// and their attendance templates.
fn load_absence_facts(
    persistence: &mut Persistence,
    member_id: i64,
    interval: &DateInterval,
) -> Result<(Vec<(Attendance, Shift)>, Vec<TemplateAttendances>), ApiError> {
    let from: PrimitiveDateTime = start_of_day(interval.start_date());
    let attendances: Vec<(Attendance, Shift)> =
        persistence.list_member_attendances_from(member_id, from)?;
    let templates: Vec<TemplateAttendances> = load_template_attendances(persistence, member_id)?;
    Ok((attendances, templates))
}

/// Creates a shift exemption.
///
/// Expected attendances inside the exemption are cancelled. A long or
/// open-ended exemption also removes the member's recurring slots from its
/// start date on.
///
/// # Errors
///
/// Returns an error if the member does not exist or a write fails.
pub fn create_exemption(
    persistence: &mut Persistence,
    exemption: Exemption,
    policy: &ShiftPolicy,
    actor: &Actor,
    cause: &Cause,
    now: PrimitiveDateTime,
) -> Result<Exemption, ApiError> {
    persistence.transaction::<_, ApiError, _>(|tx: &mut Persistence| {
        require_member(tx, exemption.member_id)?;
        let (attendances, templates): (Vec<(Attendance, Shift)>, Vec<TemplateAttendances>) =
            load_absence_facts(tx, exemption.member_id, &exemption.interval)?;

        let plan: ExemptionPlan = plan_exemption(
            exemption,
            None,
            &attendances,
            &templates,
            policy,
            actor,
            cause,
            now,
        )?;
        apply_absence_effects(tx, &plan.effects)?;

        let mut exemption: Exemption = plan.exemption;
        exemption.exemption_id = Some(tx.create_exemption(&exemption)?);
        tx.persist_audit_event(&plan.audit_event)?;
        info!(
            member_id = exemption.member_id,
            cancelled = plan.effects.cancellations.len(),
            templates_removed = plan.effects.withdrawals.len(),
            "Created shift exemption"
        );
        Ok(exemption)
    })
}

/// Changes the interval or description of an exemption.
///
/// The new interval has the same effects as on creation. Attendances
/// cancelled under the old interval stay cancelled.
///
/// # Errors
///
/// Returns an error if the exemption does not exist or a write fails.
#[allow(clippy::too_many_arguments)]
pub fn update_exemption(
    persistence: &mut Persistence,
    exemption_id: i64,
    interval: DateInterval,
    description: String,
    policy: &ShiftPolicy,
    actor: &Actor,
    cause: &Cause,
    now: PrimitiveDateTime,
) -> Result<Exemption, ApiError> {
    persistence.transaction::<_, ApiError, _>(|tx: &mut Persistence| {
        let previous: Exemption = tx
            .get_exemption(exemption_id)?
            .ok_or_else(|| not_found("Exemption", exemption_id))?;
        let mut updated: Exemption = Exemption::new(previous.member_id, interval, description);
        updated.exemption_id = Some(exemption_id);

        let (attendances, templates): (Vec<(Attendance, Shift)>, Vec<TemplateAttendances>) =
            load_absence_facts(tx, updated.member_id, &updated.interval)?;
        let plan: ExemptionPlan = plan_exemption(
            updated,
            Some(&previous),
            &attendances,
            &templates,
            policy,
            actor,
            cause,
            now,
        )?;
        apply_absence_effects(tx, &plan.effects)?;
        tx.update_exemption(exemption_id, &plan.exemption)?;
        tx.persist_audit_event(&plan.audit_event)?;
        info!(exemption_id, member_id = previous.member_id, "Updated shift exemption");
        Ok(plan.exemption)
    })
}

/// Pauses a membership.
///
/// Every recurring slot of the member is removed from the pause start on,
/// and expected attendances inside the pause are cancelled.
///
/// # Errors
///
/// Returns an error if the member does not exist or a write fails.
pub fn create_membership_pause(
    persistence: &mut Persistence,
    pause: MembershipPause,
    actor: &Actor,
    cause: &Cause,
    now: PrimitiveDateTime,
) -> Result<MembershipPause, ApiError> {
    persistence.transaction::<_, ApiError, _>(|tx: &mut Persistence| {
        require_member(tx, pause.member_id)?;
        let (attendances, templates): (Vec<(Attendance, Shift)>, Vec<TemplateAttendances>) =
            load_absence_facts(tx, pause.member_id, &pause.interval)?;

        let plan: PausePlan =
            plan_membership_pause(pause, &attendances, &templates, actor, cause, now)?;
        apply_absence_effects(tx, &plan.effects)?;

        let mut pause: MembershipPause = plan.pause;
        pause.pause_id = Some(tx.create_membership_pause(&pause)?);
        tx.persist_audit_event(&plan.audit_event)?;
        info!(
            member_id = pause.member_id,
            templates_removed = plan.effects.withdrawals.len(),
            "Created membership pause"
        );
        Ok(pause)
    })
}
