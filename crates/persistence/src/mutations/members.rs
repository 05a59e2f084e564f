// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Member, share owner, pause and exemption writes.

use coop_shifts_domain::{Exemption, Member, MembershipPause, ShareOwner, join_capabilities};
use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::{debug, info};

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::{format_date, format_optional_date, to_flag};
use crate::diesel_schema::{members, membership_pauses, share_owners, shift_exemptions};
use crate::error::PersistenceError;

/// Inserts a member.
///
/// # Errors
///
/// Returns an error if the insert fails, e.g. on a duplicate email.
pub fn insert_member(
    conn: &mut SqliteConnection,
    member: &Member,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(members::table)
        .values((
            members::display_name.eq(&member.display_name),
            members::email.eq(&member.email),
            members::date_joined.eq(format_date(member.date_joined)?),
            members::is_frozen.eq(to_flag(member.is_frozen)),
            members::capabilities.eq(join_capabilities(&member.capabilities)),
            members::wants_understaffed_alerts.eq(to_flag(member.wants_understaffed_alerts)),
        ))
        .execute(conn)?;

    let member_id: i64 = get_last_insert_rowid(conn)?;
    info!(member_id, display_name = %member.display_name, "Created member");
    Ok(member_id)
}

/// Sets the frozen flag of a member.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the member does not exist.
pub fn update_member_frozen(
    conn: &mut SqliteConnection,
    member_id: i64,
    is_frozen: bool,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(members::table.filter(members::member_id.eq(member_id)))
        .set(members::is_frozen.eq(to_flag(is_frozen)))
        .execute(conn)?;
    if updated == 0 {
        return Err(PersistenceError::NotFound(format!("member {member_id}")));
    }
    debug!(member_id, is_frozen, "Updated frozen status");
    Ok(())
}

/// Inserts or replaces the share ownership record of a member.
///
/// # Errors
///
/// Returns an error if the write fails.
pub fn upsert_share_owner(
    conn: &mut SqliteConnection,
    share_owner: &ShareOwner,
) -> Result<(), PersistenceError> {
    diesel::replace_into(share_owners::table)
        .values((
            share_owners::member_id.eq(share_owner.member_id),
            share_owners::is_investing.eq(to_flag(share_owner.is_investing)),
            share_owners::membership_start.eq(format_date(share_owner.membership_start)?),
            share_owners::membership_end.eq(format_optional_date(share_owner.membership_end)?),
        ))
        .execute(conn)?;
    Ok(())
}

/// Inserts a membership pause.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_membership_pause(
    conn: &mut SqliteConnection,
    pause: &MembershipPause,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(membership_pauses::table)
        .values((
            membership_pauses::member_id.eq(pause.member_id),
            membership_pauses::start_date.eq(format_date(pause.interval.start_date())?),
            membership_pauses::end_date.eq(format_optional_date(pause.interval.end_date())?),
            membership_pauses::description.eq(&pause.description),
        ))
        .execute(conn)?;
    get_last_insert_rowid(conn)
}

/// Inserts a shift exemption.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_exemption(
    conn: &mut SqliteConnection,
    exemption: &Exemption,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(shift_exemptions::table)
        .values((
            shift_exemptions::member_id.eq(exemption.member_id),
            shift_exemptions::start_date.eq(format_date(exemption.interval.start_date())?),
            shift_exemptions::end_date.eq(format_optional_date(exemption.interval.end_date())?),
            shift_exemptions::description.eq(&exemption.description),
        ))
        .execute(conn)?;
    get_last_insert_rowid(conn)
}

/// Rewrites the interval and description of a stored exemption.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the exemption does not exist.
pub fn update_exemption(
    conn: &mut SqliteConnection,
    exemption_id: i64,
    exemption: &Exemption,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(
        shift_exemptions::table.filter(shift_exemptions::exemption_id.eq(exemption_id)),
    )
    .set((
        shift_exemptions::start_date.eq(format_date(exemption.interval.start_date())?),
        shift_exemptions::end_date.eq(format_optional_date(exemption.interval.end_date())?),
        shift_exemptions::description.eq(&exemption.description),
    ))
    .execute(conn)?;
    if updated == 0 {
        return Err(PersistenceError::NotFound(format!("exemption {exemption_id}")));
    }
    Ok(())
}
