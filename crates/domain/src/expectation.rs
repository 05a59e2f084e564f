// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Whether a member owes shifts at a given date.

use crate::types::{Exemption, Member, MembershipPause, ShareOwner};
use time::Date;

/// Everything the expectation rule needs to know about one member.
#[derive(Debug, Clone, Copy)]
pub struct ExpectationFacts<'a> {
    pub member: &'a Member,
    pub share_owner: Option<&'a ShareOwner>,
    pub pauses: &'a [MembershipPause],
    pub exemptions: &'a [Exemption],
    /// Whether the member was frozen at the instant being evaluated.
    pub frozen_at: bool,
}

/// Returns true if the member is expected to work shifts at `at`.
///
/// A member is not expected to work if they have no share ownership, are
/// frozen, joined after the date, are not an active share owner (investing,
/// paused or without shares) or are covered by an exemption.
#[must_use]
pub fn is_member_expected_to_do_shifts(facts: &ExpectationFacts<'_>, at: Date) -> bool {
    let Some(share_owner) = facts.share_owner else {
        return false;
    };
    if facts.frozen_at {
        return false;
    }
    if facts.member.date_joined > at {
        return false;
    }
    if !share_owner.is_active_at(at, facts.pauses) {
        return false;
    }
    !facts
        .exemptions
        .iter()
        .any(|exemption| exemption.is_active_at(at))
}

/// Returns how many shift points a member owes for the cycle starting at `cycle_start`.
#[must_use]
pub fn credit_requirement_for_cycle(facts: &ExpectationFacts<'_>, cycle_start: Date) -> i32 {
    i32::from(is_member_expected_to_do_shifts(facts, cycle_start))
}
