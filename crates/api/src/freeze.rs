// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Freezing and unfreezing members.

use crate::attendance::notify_after_commit;
use crate::error::ApiError;
use crate::members::{MemberFacts, load_member_facts};
use crate::notifications::{self, MailTransport, send_notification};
use crate::shifts::{apply_withdrawal, load_template_attendances};
use coop_shifts::{
    FREEZE_REASON, FreezeFacts, FreezePlan, FrozenStatusUpdate, TemplateAttendances,
    TemplateWithdrawal, plan_freeze, plan_frozen_status_change, plan_template_withdrawal,
};
use coop_shifts_audit::{Actor, Cause};
use coop_shifts_domain::{
    AccountEntry, Member, Notification, NotificationKind, ShiftPolicy, balance_at,
};
use coop_shifts_persistence::Persistence;
use time::{Duration, PrimitiveDateTime};
use tracing::{error, info};

/// The stored inputs of the freeze rules for one member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreezeInputs {
    pub facts: MemberFacts,
    pub entries: Vec<AccountEntry>,
    pub upcoming_attendances: usize,
    pub last_freeze_warning: Option<PrimitiveDateTime>,
}

impl FreezeInputs {
    /// Borrows the inputs as the core freeze rules expect them.
    #[must_use]
    pub fn facts_at(&self, now: PrimitiveDateTime) -> FreezeFacts<'_> {
        FreezeFacts {
            expectation: self.facts.expectation_at(now),
            entries: &self.entries,
            upcoming_attendances: self.upcoming_attendances,
            last_freeze_warning: self.last_freeze_warning,
        }
    }

    #[must_use]
    pub fn balance(&self, now: PrimitiveDateTime) -> i64 {
        balance_at(&self.entries, now)
    }
}

/// Loads the freeze inputs of a member.
///
/// Upcoming attendances are counted over the make-up window starting at
/// `now`.
///
/// # Errors
///
/// Returns an error if the member does not exist or a query fails.
pub fn load_freeze_inputs(
    persistence: &mut Persistence,
    member_id: i64,
    policy: &ShiftPolicy,
    now: PrimitiveDateTime,
) -> Result<FreezeInputs, ApiError> {
    let facts: MemberFacts = load_member_facts(persistence, member_id)?;
    let entries: Vec<AccountEntry> = persistence.list_account_entries(member_id)?;
    let until: PrimitiveDateTime = now + Duration::weeks(policy.make_up_weeks);
    let upcoming_attendances: usize =
        persistence.count_upcoming_expected_attendances(member_id, now, until)?;
    let last_freeze_warning: Option<PrimitiveDateTime> = persistence
        .latest_notification(member_id, NotificationKind::FreezeWarning)?
        .map(|entry| entry.created_at);
    Ok(FreezeInputs {
        facts,
        entries,
        upcoming_attendances,
        last_freeze_warning,
    })
}

/// # Errors
///
/// Returns an error if the member does not exist or a query fails.
pub fn should_freeze_member(
    persistence: &mut Persistence,
    member_id: i64,
    policy: &ShiftPolicy,
    now: PrimitiveDateTime,
) -> Result<bool, ApiError> {
    let inputs: FreezeInputs = load_freeze_inputs(persistence, member_id, policy, now)?;
    Ok(coop_shifts::should_freeze_member(
        &inputs.facts_at(now),
        policy,
        now,
    ))
}

/// # Errors
///
/// Returns an error if the member does not exist or a query fails.
pub fn should_unfreeze_member(
    persistence: &mut Persistence,
    member_id: i64,
    policy: &ShiftPolicy,
    now: PrimitiveDateTime,
) -> Result<bool, ApiError> {
    let inputs: FreezeInputs = load_freeze_inputs(persistence, member_id, policy, now)?;
    Ok(coop_shifts::should_unfreeze_member(
        &inputs.facts_at(now),
        policy,
        now,
    ))
}

/// # Errors
///
/// Returns an error if the member does not exist or a query fails.
pub fn should_send_freeze_warning(
    persistence: &mut Persistence,
    member_id: i64,
    policy: &ShiftPolicy,
    now: PrimitiveDateTime,
) -> Result<bool, ApiError> {
    let inputs: FreezeInputs = load_freeze_inputs(persistence, member_id, policy, now)?;
    Ok(coop_shifts::should_send_freeze_warning(
        &inputs.facts_at(now),
        policy,
        now,
    ))
}

/// Freezes a member and tells them.
///
/// Every attendance template of the member is removed and their future
/// attendances on those slots are cancelled. The notification goes out
/// after the commit.
///
/// # Errors
///
/// Returns an error if the member is already frozen, a write fails, or the
/// notification cannot be delivered. In the last case the freeze is
/// already committed.
pub fn freeze_member_and_send_email(
    persistence: &mut Persistence,
    transport: &dyn MailTransport,
    member_id: i64,
    actor: &Actor,
    cause: &Cause,
    now: PrimitiveDateTime,
) -> Result<Member, ApiError> {
    let (member, balance): (Member, i64) = persistence
        .transaction::<_, ApiError, _>(|tx: &mut Persistence| {
            let facts: MemberFacts = load_member_facts(tx, member_id)?;
            let templates: Vec<TemplateAttendances> = load_template_attendances(tx, member_id)?;
            let withdrawals: Vec<TemplateWithdrawal> = templates
                .iter()
                .map(|loaded: &TemplateAttendances| {
                    plan_template_withdrawal(
                        &loaded.attendance_template,
                        &loaded.attendances,
                        now,
                        FREEZE_REASON,
                        actor,
                        cause,
                        now,
                    )
                })
                .collect::<Result<Vec<TemplateWithdrawal>, _>>()?;

            let plan: FreezePlan =
                plan_freeze(&facts.member, withdrawals, actor.clone(), cause.clone(), now)?;
            tx.update_member_frozen(member_id, true)?;
            tx.persist_audit_event(&plan.status.audit_event)?;
            for withdrawal in &plan.withdrawals {
                apply_withdrawal(tx, withdrawal)?;
            }

            let entries: Vec<AccountEntry> = tx.list_account_entries(member_id)?;
            info!(
                member_id,
                templates_removed = plan.withdrawals.len(),
                "Froze member"
            );
            Ok((plan.status.member, balance_at(&entries, now)))
        })?;

    let notification: Notification = notifications::member_frozen(&member, balance)?;
    notify_after_commit(persistence, transport, &notification, now)?;
    Ok(member)
}

/// Unfreezes a member and tells them.
///
/// # Returns
///
/// * `Ok(None)` if the member was not frozen
/// * `Ok(Some(member))` with the updated member otherwise
///
/// # Errors
///
/// Returns an error if the member does not exist, a write fails, or the
/// notification cannot be delivered.
pub fn unfreeze_and_send_notification_email(
    persistence: &mut Persistence,
    transport: &dyn MailTransport,
    member_id: i64,
    actor: &Actor,
    cause: &Cause,
    now: PrimitiveDateTime,
) -> Result<Option<Member>, ApiError> {
    let updated: Option<Member> = persistence.transaction::<_, ApiError, _>(|tx: &mut Persistence| {
        let facts: MemberFacts = load_member_facts(tx, member_id)?;
        let Some(update) =
            plan_frozen_status_change(&facts.member, false, actor.clone(), cause.clone(), now)?
        else {
            return Ok(None);
        };
        let FrozenStatusUpdate {
            member,
            audit_event,
        } = update;
        tx.update_member_frozen(member_id, false)?;
        tx.persist_audit_event(&audit_event)?;
        info!(member_id, "Unfroze member");
        Ok(Some(member))
    })?;

    let Some(member) = updated else {
        return Ok(None);
    };
    let notification: Notification = notifications::unfrozen(&member)?;
    notify_after_commit(persistence, transport, &notification, now)?;
    Ok(Some(member))
}

/// Warns a member that they will be frozen unless they register.
///
/// The log entry and the delivery share a transaction, so a failed
/// delivery leaves no trace and the warning is retried on the next run.
///
/// # Errors
///
/// Returns an error if the member does not exist or delivery fails.
pub fn send_freeze_warning_email(
    persistence: &mut Persistence,
    transport: &dyn MailTransport,
    member_id: i64,
    policy: &ShiftPolicy,
    now: PrimitiveDateTime,
) -> Result<(), ApiError> {
    persistence.transaction::<_, ApiError, _>(|tx: &mut Persistence| {
        let facts: MemberFacts = load_member_facts(tx, member_id)?;
        let entries: Vec<AccountEntry> = tx.list_account_entries(member_id)?;
        let notification: Notification = notifications::freeze_warning(
            &facts.member,
            balance_at(&entries, now),
            policy.freeze_after_days,
        )?;
        send_notification(tx, transport, &notification, now)?;
        info!(member_id, "Sent freeze warning");
        Ok(())
    })
}

/// What a freeze check did to one member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FreezeOutcome {
    Frozen,
    Warned,
    Unfrozen,
    Unchanged,
}

/// Outcome counts of a freeze check run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FreezeCheckSummary {
    pub frozen: usize,
    pub warned: usize,
    pub unfrozen: usize,
    pub failed: usize,
}

/// Applies the freeze rules to one member.
///
/// Freezing takes precedence over warning. Only frozen members are
/// considered for unfreezing.
///
/// # Errors
///
/// Returns an error if a query, a write, or a delivery fails.
pub fn check_member_freeze_status(
    persistence: &mut Persistence,
    transport: &dyn MailTransport,
    member_id: i64,
    policy: &ShiftPolicy,
    actor: &Actor,
    cause: &Cause,
    now: PrimitiveDateTime,
) -> Result<FreezeOutcome, ApiError> {
    let inputs: FreezeInputs = load_freeze_inputs(persistence, member_id, policy, now)?;
    let facts: FreezeFacts<'_> = inputs.facts_at(now);

    if inputs.facts.member.is_frozen {
        if coop_shifts::should_unfreeze_member(&facts, policy, now) {
            unfreeze_and_send_notification_email(
                persistence,
                transport,
                member_id,
                actor,
                cause,
                now,
            )?;
            return Ok(FreezeOutcome::Unfrozen);
        }
        return Ok(FreezeOutcome::Unchanged);
    }
    if coop_shifts::should_freeze_member(&facts, policy, now) {
        freeze_member_and_send_email(persistence, transport, member_id, actor, cause, now)?;
        return Ok(FreezeOutcome::Frozen);
    }
    if coop_shifts::should_send_freeze_warning(&facts, policy, now) {
        send_freeze_warning_email(persistence, transport, member_id, policy, now)?;
        return Ok(FreezeOutcome::Warned);
    }
    Ok(FreezeOutcome::Unchanged)
}

/// Runs the freeze check for every member.
///
/// A failure for one member is logged and counted, and the loop continues.
///
/// # Errors
///
/// Returns an error only if the member list cannot be loaded.
pub fn run_freeze_checks(
    persistence: &mut Persistence,
    transport: &dyn MailTransport,
    policy: &ShiftPolicy,
    now: PrimitiveDateTime,
) -> Result<FreezeCheckSummary, ApiError> {
    let actor: Actor = Actor::system("freeze_checks");
    let cause: Cause = Cause::new(
        format!("freeze_checks:{now}"),
        String::from("Scheduled freeze check"),
    );
    let member_ids: Vec<i64> = persistence
        .list_members()?
        .iter()
        .filter_map(|member: &Member| member.member_id)
        .collect();

    let mut summary: FreezeCheckSummary = FreezeCheckSummary::default();
    for member_id in member_ids {
        match check_member_freeze_status(
            persistence,
            transport,
            member_id,
            policy,
            &actor,
            &cause,
            now,
        ) {
            Ok(FreezeOutcome::Frozen) => summary.frozen += 1,
            Ok(FreezeOutcome::Warned) => summary.warned += 1,
            Ok(FreezeOutcome::Unfrozen) => summary.unfrozen += 1,
            Ok(FreezeOutcome::Unchanged) => {}
            Err(err) => {
                error!(member_id, error = %err, "Freeze check failed");
                summary.failed += 1;
            }
        }
    }
    info!(
        frozen = summary.frozen,
        warned = summary.warned,
        unfrozen = summary.unfrozen,
        failed = summary.failed,
        "Freeze checks finished"
    );
    Ok(summary)
}
