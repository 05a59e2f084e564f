// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::{ApiError, not_found};
use coop_shifts::{actions, attendance_template_history, frozen_status_history};
use coop_shifts_audit::AuditEvent;
use coop_shifts_domain::{
    AccountEntry, AttendanceMode, AttendanceTemplateChange, Exemption, ExpectationFacts,
    FrozenStatusChange, Member, MembershipPause, ShareOwner, balance_at, compute_attendance_mode,
    is_frozen_at,
};
use coop_shifts_persistence::Persistence;
use time::PrimitiveDateTime;

/// Everything stored about a member that the expectation rule reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberFacts {
    pub member: Member,
    pub share_owner: Option<ShareOwner>,
    pub pauses: Vec<MembershipPause>,
    pub exemptions: Vec<Exemption>,
    pub frozen_history: Vec<FrozenStatusChange>,
}

impl MemberFacts {
    /// Borrows the facts as they were at `at`.
    #[must_use]
    pub fn expectation_at(&self, at: PrimitiveDateTime) -> ExpectationFacts<'_> {
        ExpectationFacts {
            member: &self.member,
            share_owner: self.share_owner.as_ref(),
            pauses: &self.pauses,
            exemptions: &self.exemptions,
            frozen_at: is_frozen_at(self.member.is_frozen, &self.frozen_history, at),
        }
    }
}

/// Loads a member or fails with `ResourceNotFound`.
///
/// # Errors
///
/// Returns an error if the member does not exist or the query fails.
pub fn require_member(persistence: &mut Persistence, member_id: i64) -> Result<Member, ApiError> {
    persistence
        .get_member(member_id)?
        .ok_or_else(|| not_found("Member", member_id))
}

/// Loads the facts the expectation rule needs for one member.
///
/// # Errors
///
/// Returns an error if the member does not exist or a query fails.
pub fn load_member_facts(
    persistence: &mut Persistence,
    member_id: i64,
) -> Result<MemberFacts, ApiError> {
    let member: Member = require_member(persistence, member_id)?;
    let share_owner: Option<ShareOwner> = persistence.get_share_owner(member_id)?;
    let pauses: Vec<MembershipPause> = persistence.list_membership_pauses(member_id)?;
    let exemptions: Vec<Exemption> = persistence.list_exemptions(member_id)?;
    let events: Vec<AuditEvent> =
        persistence.list_member_audit_events(member_id, &[actions::UPDATE_FROZEN_STATUS])?;

    Ok(MemberFacts {
        member,
        share_owner,
        pauses,
        exemptions,
        frozen_history: frozen_status_history(&events),
    })
}

/// Returns whether the member owes shifts at `at`.
///
/// # Errors
///
/// Returns an error if the member does not exist or a query fails.
pub fn is_member_expected_to_do_shifts(
    persistence: &mut Persistence,
    member_id: i64,
    at: PrimitiveDateTime,
) -> Result<bool, ApiError> {
    let facts: MemberFacts = load_member_facts(persistence, member_id)?;
    Ok(coop_shifts_domain::is_member_expected_to_do_shifts(
        &facts.expectation_at(at),
        at.date(),
    ))
}

/// Derives the member's attendance mode at `at` from the logged history.
///
/// # Errors
///
/// Returns an error if the member does not exist or a query fails.
pub fn get_attendance_mode(
    persistence: &mut Persistence,
    member_id: i64,
    at: PrimitiveDateTime,
) -> Result<AttendanceMode, ApiError> {
    let member: Member = require_member(persistence, member_id)?;
    let events: Vec<AuditEvent> = persistence.list_member_audit_events(
        member_id,
        &[
            actions::UPDATE_FROZEN_STATUS,
            actions::CREATE_ATTENDANCE_TEMPLATE,
            actions::DELETE_ATTENDANCE_TEMPLATE,
        ],
    )?;
    let frozen_history: Vec<FrozenStatusChange> = frozen_status_history(&events);
    let template_history: Vec<AttendanceTemplateChange> = attendance_template_history(&events);
    Ok(compute_attendance_mode(
        member.is_frozen,
        &frozen_history,
        &template_history,
        at,
    ))
}

/// Returns the member's ledger balance at `at`.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_balance(
    persistence: &mut Persistence,
    member_id: i64,
    at: PrimitiveDateTime,
) -> Result<i64, ApiError> {
    let entries: Vec<AccountEntry> = persistence.list_account_entries(member_id)?;
    Ok(balance_at(&entries, at))
}
