// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::actions;
use crate::error::CoreError;
use coop_shifts_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use coop_shifts_domain::ShiftPartnerChange;
use time::PrimitiveDateTime;

/// A shift partner change and its audit event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftPartnerPlan {
    pub change: ShiftPartnerChange,
    pub audit_event: AuditEvent,
}

fn describe(partner_id: Option<i64>) -> String {
    partner_id.map_or_else(|| String::from("partner=none"), |id| format!("partner={id}"))
}

/// Plans replacing `current` with `partner_id` as the member's partner.
///
/// Returns `Ok(None)` if the partner does not change.
///
/// # Errors
///
/// Returns `CoreError::InvalidShiftPartner` if the member names themselves.
pub fn plan_shift_partner_change(
    member_id: i64,
    current: Option<i64>,
    partner_id: Option<i64>,
    actor: Actor,
    cause: Cause,
    now: PrimitiveDateTime,
) -> Result<Option<ShiftPartnerPlan>, CoreError> {
    if partner_id == Some(member_id) {
        return Err(CoreError::InvalidShiftPartner { member_id });
    }
    if current == partner_id {
        return Ok(None);
    }
    let audit_event: AuditEvent = AuditEvent::new(
        actor,
        cause,
        Action::new(actions::UPDATE_SHIFT_PARTNER.to_string(), None),
        StateSnapshot::new(describe(current)),
        StateSnapshot::new(describe(partner_id)),
        Some(member_id),
        now,
    );
    Ok(Some(ShiftPartnerPlan {
        change: ShiftPartnerChange::new(member_id, partner_id, now),
        audit_event,
    }))
}
