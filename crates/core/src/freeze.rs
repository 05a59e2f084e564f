// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Freeze and unfreeze decisions.
//!
//! A member whose balance stays at or below the freeze threshold for long
//! enough, without registrations that would make up for it, loses the
//! right to shop until the balance recovers.

use crate::actions;
use crate::error::CoreError;
use crate::template::TemplateWithdrawal;
use coop_shifts_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use coop_shifts_domain::{
    AccountEntry, ExpectationFacts, Member, ShiftPolicy, balance_at,
    is_below_threshold_since_long_enough, is_member_expected_to_do_shifts,
    registrations_compensate,
};
use time::PrimitiveDateTime;

/// Reason written on attendances withdrawn by a freeze.
pub const FREEZE_REASON: &str = "Unregistered because frozen";

/// Everything the freeze controller looks at for one member.
#[derive(Debug, Clone, Copy)]
pub struct FreezeFacts<'a> {
    /// The expectation facts at the check instant.
    pub expectation: ExpectationFacts<'a>,
    pub entries: &'a [AccountEntry],
    /// Pending or stand-in attendances starting inside the make-up window.
    pub upcoming_attendances: usize,
    /// When the last freeze warning was sent.
    pub last_freeze_warning: Option<PrimitiveDateTime>,
}

impl FreezeFacts<'_> {
    fn balance(&self, now: PrimitiveDateTime) -> i64 {
        balance_at(self.entries, now)
    }

    fn compensated(&self, policy: &ShiftPolicy, now: PrimitiveDateTime) -> bool {
        registrations_compensate(
            self.balance(now),
            self.upcoming_attendances,
            policy.freeze_threshold,
        )
    }
}

/// Decides whether a member must be frozen now.
#[must_use]
pub fn should_freeze_member(
    facts: &FreezeFacts<'_>,
    policy: &ShiftPolicy,
    now: PrimitiveDateTime,
) -> bool {
    if facts.expectation.member.is_frozen {
        return false;
    }
    if !is_member_expected_to_do_shifts(&facts.expectation, now.date()) {
        return false;
    }
    if !is_below_threshold_since_long_enough(
        facts.entries,
        policy.freeze_threshold,
        policy.freeze_after_days,
        now,
    ) {
        return false;
    }
    !facts.compensated(policy, now)
}

/// Decides whether a frozen member may be unfrozen now.
#[must_use]
pub fn should_unfreeze_member(
    facts: &FreezeFacts<'_>,
    policy: &ShiftPolicy,
    now: PrimitiveDateTime,
) -> bool {
    if !facts.expectation.member.is_frozen {
        return false;
    }
    let active: bool = facts
        .expectation
        .share_owner
        .is_some_and(|owner| owner.is_active_at(now.date(), facts.expectation.pauses));
    if !active {
        return false;
    }
    facts.balance(now) > i64::from(policy.freeze_threshold) || facts.compensated(policy, now)
}

/// Decides whether a member should be warned about an upcoming freeze.
#[must_use]
pub fn should_send_freeze_warning(
    facts: &FreezeFacts<'_>,
    policy: &ShiftPolicy,
    now: PrimitiveDateTime,
) -> bool {
    if facts.balance(now) > i64::from(policy.freeze_threshold) {
        return false;
    }
    if !is_member_expected_to_do_shifts(&facts.expectation, now.date()) {
        return false;
    }
    facts
        .last_freeze_warning
        .is_none_or(|sent_at: PrimitiveDateTime| {
            (now.date() - sent_at.date()).whole_days() > policy.freeze_after_days
        })
}

/// A flip of the frozen flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrozenStatusUpdate {
    pub member: Member,
    pub audit_event: AuditEvent,
}

/// Plans setting the frozen flag to `frozen`.
///
/// Returns `Ok(None)` if the flag already has that value.
///
/// # Errors
///
/// Returns an error if the member has no identifier.
pub fn plan_frozen_status_change(
    member: &Member,
    frozen: bool,
    actor: Actor,
    cause: Cause,
    now: PrimitiveDateTime,
) -> Result<Option<FrozenStatusUpdate>, CoreError> {
    if member.is_frozen == frozen {
        return Ok(None);
    }
    let member_id: i64 = member.id()?;
    let mut updated: Member = member.clone();
    updated.is_frozen = frozen;

    let audit_event: AuditEvent = AuditEvent::new(
        actor,
        cause,
        Action::new(actions::UPDATE_FROZEN_STATUS.to_string(), None),
        StateSnapshot::new(format!("is_frozen={}", member.is_frozen)),
        StateSnapshot::new(format!("is_frozen={frozen}")),
        Some(member_id),
        now,
    );
    Ok(Some(FrozenStatusUpdate {
        member: updated,
        audit_event,
    }))
}

/// Freezing a member together with the withdrawal of their templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreezePlan {
    pub status: FrozenStatusUpdate,
    pub withdrawals: Vec<TemplateWithdrawal>,
}

/// Plans freezing a member.
///
/// The withdrawals must have been planned with [`FREEZE_REASON`].
///
/// # Errors
///
/// Returns `CoreError::Internal` if the member already is frozen.
pub fn plan_freeze(
    member: &Member,
    withdrawals: Vec<TemplateWithdrawal>,
    actor: Actor,
    cause: Cause,
    now: PrimitiveDateTime,
) -> Result<FreezePlan, CoreError> {
    let status: FrozenStatusUpdate = plan_frozen_status_change(member, true, actor, cause, now)?
        .ok_or_else(|| {
            CoreError::Internal(format!("member {:?} is already frozen", member.member_id))
        })?;
    Ok(FreezePlan {
        status,
        withdrawals,
    })
}
