// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Member, share owner, pause and exemption queries.

use coop_shifts_domain::{
    DateInterval, Exemption, Member, MembershipPause, ShareOwner, parse_capabilities,
};
use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::debug;

use crate::data_models::{flag, parse_date, parse_optional_date};
use crate::diesel_schema::{members, membership_pauses, share_owners, shift_exemptions};
use crate::error::PersistenceError;

/// Diesel Queryable struct for member rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = members)]
struct MemberRow {
    member_id: i64,
    display_name: String,
    email: String,
    date_joined: String,
    is_frozen: i32,
    capabilities: String,
    wants_understaffed_alerts: i32,
}

impl MemberRow {
    fn into_member(self) -> Result<Member, PersistenceError> {
        Ok(Member {
            member_id: Some(self.member_id),
            display_name: self.display_name,
            email: self.email,
            date_joined: parse_date(&self.date_joined)?,
            is_frozen: flag(self.is_frozen),
            capabilities: parse_capabilities(&self.capabilities),
            wants_understaffed_alerts: flag(self.wants_understaffed_alerts),
        })
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = share_owners)]
struct ShareOwnerRow {
    member_id: i64,
    is_investing: i32,
    membership_start: String,
    membership_end: Option<String>,
}

/// Diesel Queryable struct for pause and exemption rows, which share a shape.
#[derive(Queryable)]
struct IntervalRow {
    id: i64,
    member_id: i64,
    start_date: String,
    end_date: Option<String>,
    description: String,
}

impl IntervalRow {
    fn interval(&self) -> Result<DateInterval, PersistenceError> {
        Ok(DateInterval::new(
            parse_date(&self.start_date)?,
            parse_optional_date(self.end_date.as_deref())?,
        )?)
    }

    fn into_pause(self) -> Result<MembershipPause, PersistenceError> {
        Ok(MembershipPause {
            pause_id: Some(self.id),
            member_id: self.member_id,
            interval: self.interval()?,
            description: self.description,
        })
    }

    fn into_exemption(self) -> Result<Exemption, PersistenceError> {
        Ok(Exemption {
            exemption_id: Some(self.id),
            member_id: self.member_id,
            interval: self.interval()?,
            description: self.description,
        })
    }
}

/// Retrieves a member by ID.
///
/// # Errors
///
/// Returns an error if the query fails or the row is malformed.
/// Returns `Ok(None)` if the member does not exist.
pub fn get_member(
    conn: &mut SqliteConnection,
    member_id: i64,
) -> Result<Option<Member>, PersistenceError> {
    debug!(member_id, "Looking up member");

    let result: Result<MemberRow, diesel::result::Error> = members::table
        .filter(members::member_id.eq(member_id))
        .select(MemberRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(row.into_member()?)),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Lists every member ordered by ID.
///
/// # Errors
///
/// Returns an error if the query fails or a row is malformed.
pub fn list_members(conn: &mut SqliteConnection) -> Result<Vec<Member>, PersistenceError> {
    members::table
        .order(members::member_id.asc())
        .select(MemberRow::as_select())
        .load(conn)?
        .into_iter()
        .map(MemberRow::into_member)
        .collect()
}

/// Lists the members who asked to hear about understaffed shifts.
///
/// # Errors
///
/// Returns an error if the query fails or a row is malformed.
pub fn list_members_wanting_understaffed_alerts(
    conn: &mut SqliteConnection,
) -> Result<Vec<Member>, PersistenceError> {
    members::table
        .filter(members::wants_understaffed_alerts.eq(1))
        .order(members::member_id.asc())
        .select(MemberRow::as_select())
        .load(conn)?
        .into_iter()
        .map(MemberRow::into_member)
        .collect()
}

/// Retrieves the share ownership record of a member.
///
/// # Errors
///
/// Returns an error if the query fails or the row is malformed.
pub fn get_share_owner(
    conn: &mut SqliteConnection,
    member_id: i64,
) -> Result<Option<ShareOwner>, PersistenceError> {
    let row: Option<ShareOwnerRow> = share_owners::table
        .filter(share_owners::member_id.eq(member_id))
        .select(ShareOwnerRow::as_select())
        .first(conn)
        .optional()?;

    row.map(|row| {
        Ok(ShareOwner {
            member_id: row.member_id,
            is_investing: flag(row.is_investing),
            membership_start: parse_date(&row.membership_start)?,
            membership_end: parse_optional_date(row.membership_end.as_deref())?,
        })
    })
    .transpose()
}

/// Lists the membership pauses of a member, oldest first.
///
/// # Errors
///
/// Returns an error if the query fails or a row is malformed.
pub fn list_membership_pauses(
    conn: &mut SqliteConnection,
    member_id: i64,
) -> Result<Vec<MembershipPause>, PersistenceError> {
    membership_pauses::table
        .filter(membership_pauses::member_id.eq(member_id))
        .order((
            membership_pauses::start_date.asc(),
            membership_pauses::pause_id.asc(),
        ))
        .select((
            membership_pauses::pause_id,
            membership_pauses::member_id,
            membership_pauses::start_date,
            membership_pauses::end_date,
            membership_pauses::description,
        ))
        .load::<IntervalRow>(conn)?
        .into_iter()
        .map(IntervalRow::into_pause)
        .collect()
}

/// Retrieves an exemption by ID.
///
/// # Errors
///
/// Returns an error if the query fails or the row is malformed.
pub fn get_exemption(
    conn: &mut SqliteConnection,
    exemption_id: i64,
) -> Result<Option<Exemption>, PersistenceError> {
    shift_exemptions::table
        .filter(shift_exemptions::exemption_id.eq(exemption_id))
        .select((
            shift_exemptions::exemption_id,
            shift_exemptions::member_id,
            shift_exemptions::start_date,
            shift_exemptions::end_date,
            shift_exemptions::description,
        ))
        .first::<IntervalRow>(conn)
        .optional()?
        .map(IntervalRow::into_exemption)
        .transpose()
}

/// Lists the exemptions of a member, oldest first.
///
/// # Errors
///
/// Returns an error if the query fails or a row is malformed.
pub fn list_exemptions(
    conn: &mut SqliteConnection,
    member_id: i64,
) -> Result<Vec<Exemption>, PersistenceError> {
    shift_exemptions::table
        .filter(shift_exemptions::member_id.eq(member_id))
        .order((
            shift_exemptions::start_date.asc(),
            shift_exemptions::exemption_id.asc(),
        ))
        .select((
            shift_exemptions::exemption_id,
            shift_exemptions::member_id,
            shift_exemptions::start_date,
            shift_exemptions::end_date,
            shift_exemptions::description,
        ))
        .load::<IntervalRow>(conn)?
        .into_iter()
        .map(IntervalRow::into_exemption)
        .collect()
}
