// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shift partner history.
//!
//! A member may name a shift partner who can stand in for them. Every
//! change is kept, so the partner at any past instant can be recovered.

use time::PrimitiveDateTime;

/// One change of a member's shift partner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftPartnerChange {
    pub change_id: Option<i64>,
    pub member_id: i64,
    /// The new partner, `None` when the partnership ended.
    pub partner_id: Option<i64>,
    pub changed_at: PrimitiveDateTime,
}

impl ShiftPartnerChange {
    #[must_use]
    pub const fn new(
        member_id: i64,
        partner_id: Option<i64>,
        changed_at: PrimitiveDateTime,
    ) -> Self {
        Self {
            change_id: None,
            member_id,
            partner_id,
            changed_at,
        }
    }
}

/// Returns the partner in effect at `at`.
///
/// The latest change at or before `at` wins. Changes sharing a timestamp
/// are ordered by ID.
#[must_use]
pub fn shift_partner_at(changes: &[ShiftPartnerChange], at: PrimitiveDateTime) -> Option<i64> {
    changes
        .iter()
        .filter(|change| change.changed_at <= at)
        .max_by_key(|change| (change.changed_at, change.change_id))
        .and_then(|change| change.partner_id)
}

/// Returns true if the member had a shift partner at `at`.
#[must_use]
pub fn has_shift_partner_at(changes: &[ShiftPartnerChange], at: PrimitiveDateTime) -> bool {
    shift_partner_at(changes, at).is_some()
}
