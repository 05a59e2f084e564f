// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shift cycle starts.
//!
//! Every member owes one shift per cycle. Starting a cycle writes a cycle
//! marker per member and, for members expected to work at that date, a
//! debit entry attached to it. The marker makes the operation idempotent.

use crate::error::ApiError;
use crate::members::{MemberFacts, load_member_facts};
use coop_shifts::{CycleStartPlan, plan_cycle_start};
use coop_shifts_domain::{
    Member, ShiftPolicy, cycle_start_dates_between, next_cycle_start_date, start_of_day,
};
use coop_shifts_persistence::Persistence;
use time::{Date, PrimitiveDateTime};
use tracing::{debug, error, info};

/// Per-member outcome counts of one or more cycle starts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleSummary {
    /// Members for whom a cycle entry was written.
    pub applied: usize,
    /// Members who already had an entry for the cycle.
    pub skipped: usize,
    /// Members whose transaction failed.
    pub failed: usize,
}

impl CycleSummary {
    fn merge(&mut self, other: Self) {
        self.applied += other.applied;
        self.skipped += other.skipped;
        self.failed += other.failed;
    }
}

/// Computes the start of the next cycle to apply.
///
/// That is the latest applied cycle start plus one cycle, or the Monday of
/// the earliest generated shift when no cycle was applied yet.
///
/// # Returns
///
/// * `Ok(None)` if no cycle was applied and no shift exists
///
/// # Errors
///
/// Returns an error if a query fails or the date overflows.
pub fn get_next_cycle_start_date(
    persistence: &mut Persistence,
    policy: &ShiftPolicy,
) -> Result<Option<Date>, ApiError> {
    let latest: Option<Date> = persistence.get_latest_cycle_start_date()?;
    let first_shift: Option<Date> = persistence
        .get_earliest_shift_start()?
        .map(|start| start.date());
    Ok(next_cycle_start_date(
        latest,
        first_shift,
        policy.cycle_duration_days,
    )?)
}

/// Returns the start of the cycle `today` belongs to, if any was applied.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_start_date_of_current_cycle(
    persistence: &mut Persistence,
    today: Date,
) -> Result<Option<Date>, ApiError> {
    Ok(persistence.get_latest_cycle_start_on_or_before(today)?)
}

fn apply_cycle_start_for_member(
    persistence: &mut Persistence,
    member_id: i64,
    cycle_start_date: Date,
) -> Result<bool, ApiError> {
    persistence.transaction::<_, ApiError, _>(|tx: &mut Persistence| {
        let already_applied: bool = tx.cycle_entry_exists(member_id, cycle_start_date)?;
        let facts: MemberFacts = load_member_facts(tx, member_id)?;
        let at: PrimitiveDateTime = start_of_day(cycle_start_date);
        let Some(plan) = plan_cycle_start(
            member_id,
            &facts.expectation_at(at),
            cycle_start_date,
            already_applied,
        ) else {
            return Ok(false);
        };

        let CycleStartPlan {
            mut cycle_entry,
            debit,
        } = plan;
        if let Some(debit) = debit {
            cycle_entry.account_entry_id = Some(tx.create_account_entry(&debit)?);
        }
        tx.create_cycle_entry(&cycle_entry)?;
        Ok(true)
    })
}

/// Starts the cycle beginning at `cycle_start_date`.
///
/// Each member is handled in its own transaction. A failure for one member
/// is logged and counted, and the loop continues.
///
/// # Arguments
///
/// * `member_ids` - The members to handle, or every member if `None`
///
/// # Errors
///
/// Returns an error only if the member list cannot be loaded.
pub fn apply_cycle_start(
    persistence: &mut Persistence,
    cycle_start_date: Date,
    member_ids: Option<&[i64]>,
) -> Result<CycleSummary, ApiError> {
    let ids: Vec<i64> = match member_ids {
        Some(ids) => ids.to_vec(),
        None => persistence
            .list_members()?
            .iter()
            .filter_map(|member: &Member| member.member_id)
            .collect(),
    };

    let mut summary: CycleSummary = CycleSummary::default();
    for member_id in ids {
        match apply_cycle_start_for_member(persistence, member_id, cycle_start_date) {
            Ok(true) => summary.applied += 1,
            Ok(false) => summary.skipped += 1,
            Err(err) => {
                error!(member_id, %cycle_start_date, error = %err, "Failed to apply cycle start");
                summary.failed += 1;
            }
        }
    }
    info!(
        %cycle_start_date,
        applied = summary.applied,
        skipped = summary.skipped,
        failed = summary.failed,
        "Applied cycle start"
    );
    Ok(summary)
}

/// Applies every cycle start from `start` up to and including `end`.
///
/// Re-running over the same range changes nothing.
///
/// # Errors
///
/// Returns an error if the policy cycle length is invalid or the member
/// list cannot be loaded.
pub fn apply_cycles_from(
    persistence: &mut Persistence,
    policy: &ShiftPolicy,
    start: Date,
    end: Date,
) -> Result<CycleSummary, ApiError> {
    let mut summary: CycleSummary = CycleSummary::default();
    for cycle_start_date in cycle_start_dates_between(start, end, policy.cycle_duration_days)? {
        debug!(%cycle_start_date, "Applying cycle start");
        summary.merge(apply_cycle_start(persistence, cycle_start_date, None)?);
    }
    Ok(summary)
}

/// Applies every cycle that started on or before `today` and is missing.
///
/// # Errors
///
/// Returns an error if a query fails.
pub fn apply_pending_cycles(
    persistence: &mut Persistence,
    policy: &ShiftPolicy,
    today: Date,
) -> Result<CycleSummary, ApiError> {
    match get_next_cycle_start_date(persistence, policy)? {
        Some(next) => apply_cycles_from(persistence, policy, next, today),
        None => {
            info!("No shift exists yet, no cycle to start");
            Ok(CycleSummary::default())
        }
    }
}
