// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shift partners.

use crate::error::ApiError;
use crate::members::require_member;
use coop_shifts::{ShiftPartnerPlan, plan_shift_partner_change};
use coop_shifts_audit::{Actor, Cause};
use coop_shifts_domain::{ShiftPartnerChange, shift_partner_at};
use coop_shifts_persistence::Persistence;
use time::PrimitiveDateTime;
use tracing::info;

/// Sets or clears the member's shift partner.
///
/// Returns `false` if the partner was already the requested one.
///
/// # Errors
///
/// Returns an error if the member or partner does not exist, the member
/// names themselves, or a write fails.
pub fn set_shift_partner(
    persistence: &mut Persistence,
    member_id: i64,
    partner_id: Option<i64>,
    actor: &Actor,
    cause: &Cause,
    now: PrimitiveDateTime,
) -> Result<bool, ApiError> {
    persistence.transaction::<_, ApiError, _>(|tx: &mut Persistence| {
        require_member(tx, member_id)?;
        if let Some(partner_id) = partner_id {
            require_member(tx, partner_id)?;
        }
        let changes: Vec<ShiftPartnerChange> = tx.list_shift_partner_changes(member_id)?;
        let current: Option<i64> = shift_partner_at(&changes, now);
        let plan: Option<ShiftPartnerPlan> = plan_shift_partner_change(
            member_id,
            current,
            partner_id,
            actor.clone(),
            cause.clone(),
            now,
        )?;
        let Some(plan) = plan else {
            return Ok(false);
        };
        tx.record_shift_partner_change(&plan.change)?;
        tx.persist_audit_event(&plan.audit_event)?;
        info!(member_id, ?partner_id, "Changed shift partner");
        Ok(true)
    })
}

/// Returns the member's shift partner at `at`.
///
/// # Errors
///
/// Returns an error if the member does not exist or the query fails.
pub fn get_shift_partner_at(
    persistence: &mut Persistence,
    member_id: i64,
    at: PrimitiveDateTime,
) -> Result<Option<i64>, ApiError> {
    require_member(persistence, member_id)?;
    let changes: Vec<ShiftPartnerChange> = persistence.list_shift_partner_changes(member_id)?;
    Ok(shift_partner_at(&changes, at))
}
