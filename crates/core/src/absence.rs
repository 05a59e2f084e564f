// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Effects of shift exemptions and membership pauses on attendances.

use crate::actions;
use crate::attendance::{AttendanceTransition, plan_cancellation};
use crate::error::CoreError;
use crate::template::{TemplateWithdrawal, plan_template_withdrawal};
use coop_shifts_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use coop_shifts_domain::{
    Attendance, AttendanceTemplate, DateInterval, Exemption, MembershipPause, Shift,
    ShiftPolicy, start_of_day,
};
use time::PrimitiveDateTime;

/// Reason written on attendances withdrawn by a membership pause.
pub const PAUSE_REASON: &str = "Unregistered because of membership pause";

/// A member's attendances on the slots of one attendance template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateAttendances {
    pub attendance_template: AttendanceTemplate,
    pub attendances: Vec<(Attendance, Shift)>,
}

/// The attendance effects of an absence interval.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AbsenceEffects {
    /// Cancellations of single attendances inside the interval.
    pub cancellations: Vec<AttendanceTransition>,
    /// Templates removed because the absence is too long to keep them.
    pub withdrawals: Vec<TemplateWithdrawal>,
}

fn interval_snapshot(interval: &DateInterval) -> StateSnapshot {
    let end: String = interval
        .end_date()
        .map_or_else(|| String::from("open"), |end| end.to_string());
    StateSnapshot::new(format!("start={};end={end}", interval.start_date()))
}

#[allow(clippy::too_many_arguments)]
fn plan_absence_effects(
    interval: &DateInterval,
    reason: &str,
    withdraw_templates: bool,
    attendances: &[(Attendance, Shift)],
    templates: &[TemplateAttendances],
    actor: &Actor,
    cause: &Cause,
    now: PrimitiveDateTime,
) -> Result<AbsenceEffects, CoreError> {
    let mut effects: AbsenceEffects = AbsenceEffects::default();
    let mut handled: Vec<Option<i64>> = Vec::new();

    if withdraw_templates {
        let from: PrimitiveDateTime = start_of_day(interval.start_date());
        for template in templates {
            let withdrawal: TemplateWithdrawal = plan_template_withdrawal(
                &template.attendance_template,
                &template.attendances,
                from,
                reason,
                actor,
                cause,
                now,
            )?;
            handled.extend(
                withdrawal
                    .cancellations
                    .iter()
                    .map(|transition| transition.attendance.attendance_id),
            );
            effects.withdrawals.push(withdrawal);
        }
    }

    for (attendance, shift) in attendances {
        if !attendance.state.is_expected_to_show_up()
            || !interval.contains(shift.date())
            || handled.contains(&attendance.attendance_id)
        {
            continue;
        }
        effects.cancellations.push(plan_cancellation(
            attendance,
            shift,
            reason,
            actor.clone(),
            cause.clone(),
            now,
        )?);
    }
    Ok(effects)
}

/// Creating or editing an exemption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExemptionPlan {
    pub exemption: Exemption,
    pub effects: AbsenceEffects,
    pub audit_event: AuditEvent,
}

/// Plans saving an exemption.
///
/// Expected attendances inside the interval are cancelled. An exemption
/// that is open-ended or lasts at least the recurring-slot threshold also
/// withdraws the member's attendance templates from its start date on.
/// Shorter exemptions leave the templates untouched.
///
/// `previous` is the stored version when the exemption is edited.
///
/// # Errors
///
/// Returns an error if an affected attendance cannot be cancelled.
#[allow(clippy::too_many_arguments)]
pub fn plan_exemption(
    exemption: Exemption,
    previous: Option<&Exemption>,
    attendances: &[(Attendance, Shift)],
    templates: &[TemplateAttendances],
    policy: &ShiftPolicy,
    actor: &Actor,
    cause: &Cause,
    now: PrimitiveDateTime,
) -> Result<ExemptionPlan, CoreError> {
    let reason: String = format!("Is covered by shift exemption: {}", exemption.description);
    let threshold_days: i64 = policy.abcd_unregister_threshold_days()?;
    let withdraw: bool = exemption.requires_unregister_from_recurring_slots(threshold_days);
    let effects: AbsenceEffects = plan_absence_effects(
        &exemption.interval,
        &reason,
        withdraw,
        attendances,
        templates,
        actor,
        cause,
        now,
    )?;

    let (action_name, before): (&str, StateSnapshot) = match previous {
        Some(stored) => (actions::UPDATE_EXEMPTION, interval_snapshot(&stored.interval)),
        None => (
            actions::CREATE_EXEMPTION,
            StateSnapshot::new(String::from("exemption=none")),
        ),
    };
    let audit_event: AuditEvent = AuditEvent::new(
        actor.clone(),
        cause.clone(),
        Action::new(action_name.to_string(), Some(exemption.description.clone())),
        before,
        interval_snapshot(&exemption.interval),
        Some(exemption.member_id),
        now,
    );

    Ok(ExemptionPlan {
        exemption,
        effects,
        audit_event,
    })
}

/// Creating a membership pause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PausePlan {
    pub pause: MembershipPause,
    pub effects: AbsenceEffects,
    pub audit_event: AuditEvent,
}

/// Plans creating a membership pause.
///
/// A paused member keeps no recurring slot: every attendance template is
/// withdrawn from the pause start, and pending attendances inside the
/// pause are cancelled.
///
/// # Errors
///
/// Returns an error if an affected attendance cannot be cancelled.
pub fn plan_membership_pause(
    pause: MembershipPause,
    attendances: &[(Attendance, Shift)],
    templates: &[TemplateAttendances],
    actor: &Actor,
    cause: &Cause,
    now: PrimitiveDateTime,
) -> Result<PausePlan, CoreError> {
    let effects: AbsenceEffects = plan_absence_effects(
        &pause.interval,
        PAUSE_REASON,
        true,
        attendances,
        templates,
        actor,
        cause,
        now,
    )?;
    let audit_event: AuditEvent = AuditEvent::new(
        actor.clone(),
        cause.clone(),
        Action::new(
            actions::CREATE_MEMBERSHIP_PAUSE.to_string(),
            Some(pause.description.clone()),
        ),
        StateSnapshot::new(String::from("pause=none")),
        interval_snapshot(&pause.interval),
        Some(pause.member_id),
        now,
    );
    Ok(PausePlan {
        pause,
        effects,
        audit_event,
    })
}
