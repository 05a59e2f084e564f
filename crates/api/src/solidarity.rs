// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Giving and receiving solidarity shifts.

use crate::error::ApiError;
use crate::members::require_member;
use coop_shifts::{SolidarityPlan, plan_solidarity_gift, plan_solidarity_use};
use coop_shifts_audit::{Actor, Cause};
use coop_shifts_domain::{Attendance, ShiftPolicy, SolidarityShift};
use coop_shifts_persistence::Persistence;
use time::PrimitiveDateTime;
use tracing::info;

fn apply_plan(persistence: &mut Persistence, plan: &SolidarityPlan) -> Result<(), ApiError> {
    persistence.create_account_entry(&plan.entry)?;
    persistence.persist_audit_event(&plan.audit_event)?;
    Ok(())
}

/// Gives one of the member's done attendances to the solidarity pool.
///
/// The member loses one point and the pool gains one shift.
///
/// # Errors
///
/// Returns an error if the member does not exist, has no done attendance
/// left to give, or a write fails.
pub fn give_solidarity_shift(
    persistence: &mut Persistence,
    member_id: i64,
    actor: &Actor,
    cause: &Cause,
    now: PrimitiveDateTime,
) -> Result<SolidarityShift, ApiError> {
    persistence.transaction::<_, ApiError, _>(|tx: &mut Persistence| {
        require_member(tx, member_id)?;
        let attendance: Option<Attendance> = tx.first_done_attendance_not_given(member_id)?;
        let plan: SolidarityPlan = plan_solidarity_gift(
            member_id,
            attendance.as_ref(),
            actor.clone(),
            cause.clone(),
            now,
        )?;

        let mut solidarity_shift: SolidarityShift = plan.solidarity_shift.clone();
        solidarity_shift.solidarity_shift_id = Some(tx.create_solidarity_shift(&solidarity_shift)?);
        apply_plan(tx, &plan)?;
        info!(
            member_id,
            attendance_id = solidarity_shift.gifted_attendance_id,
            "Gave solidarity shift"
        );
        Ok(solidarity_shift)
    })
}

/// Hands one shift from the solidarity pool to the member.
///
/// The member gains one point. A member may receive at most
/// `policy.max_solidarity_shifts_per_year` shifts per calendar year.
///
/// # Errors
///
/// Returns an error if the member does not exist, the pool is empty, the
/// yearly limit is reached, or a write fails.
pub fn use_solidarity_shift(
    persistence: &mut Persistence,
    member_id: i64,
    policy: &ShiftPolicy,
    actor: &Actor,
    cause: &Cause,
    now: PrimitiveDateTime,
) -> Result<SolidarityShift, ApiError> {
    persistence.transaction::<_, ApiError, _>(|tx: &mut Persistence| {
        require_member(tx, member_id)?;
        let available: Option<SolidarityShift> = tx.first_available_solidarity_shift()?;
        let received: Vec<SolidarityShift> = tx.list_solidarity_shifts_used_by(member_id)?;
        let plan: SolidarityPlan = plan_solidarity_use(
            member_id,
            available.as_ref(),
            &received,
            policy,
            actor.clone(),
            cause.clone(),
            now,
        )?;

        tx.mark_solidarity_shift_used(&plan.solidarity_shift)?;
        apply_plan(tx, &plan)?;
        info!(
            member_id,
            solidarity_shift_id = ?plan.solidarity_shift.solidarity_shift_id,
            "Used solidarity shift"
        );
        Ok(plan.solidarity_shift)
    })
}

/// Returns the number of unused shifts in the solidarity pool.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_available_solidarity_shifts(persistence: &mut Persistence) -> Result<i64, ApiError> {
    Ok(persistence.count_available_solidarity_shifts()?)
}
