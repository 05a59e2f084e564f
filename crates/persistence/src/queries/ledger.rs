// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Account entry and cycle marker queries.

use coop_shifts_domain::{AccountEntry, ShiftCycleEntry};
use diesel::SqliteConnection;
use diesel::dsl::max;
use diesel::prelude::*;
use time::Date;

use crate::data_models::{format_date, parse_date, parse_datetime};
use crate::diesel_schema::{account_entries, shift_cycle_entries};
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = account_entries)]
struct AccountEntryRow {
    entry_id: i64,
    member_id: i64,
    value: i32,
    date: String,
    description: String,
}

impl AccountEntryRow {
    fn into_entry(self) -> Result<AccountEntry, PersistenceError> {
        Ok(AccountEntry {
            entry_id: Some(self.entry_id),
            member_id: self.member_id,
            value: self.value,
            date: parse_datetime(&self.date)?,
            description: self.description,
        })
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = shift_cycle_entries)]
struct CycleEntryRow {
    cycle_entry_id: i64,
    member_id: i64,
    cycle_start_date: String,
    account_entry_id: Option<i64>,
}

/// Retrieves an account entry by ID.
///
/// # Errors
///
/// Returns an error if the query fails or the row is malformed.
pub fn get_account_entry(
    conn: &mut SqliteConnection,
    entry_id: i64,
) -> Result<Option<AccountEntry>, PersistenceError> {
    account_entries::table
        .filter(account_entries::entry_id.eq(entry_id))
        .select(AccountEntryRow::as_select())
        .first(conn)
        .optional()?
        .map(AccountEntryRow::into_entry)
        .transpose()
}

/// Lists a member's account entries by date, then by insertion order.
///
/// # Errors
///
/// Returns an error if the query fails or a row is malformed.
pub fn list_account_entries(
    conn: &mut SqliteConnection,
    member_id: i64,
) -> Result<Vec<AccountEntry>, PersistenceError> {
    account_entries::table
        .filter(account_entries::member_id.eq(member_id))
        .order((account_entries::date.asc(), account_entries::entry_id.asc()))
        .select(AccountEntryRow::as_select())
        .load(conn)?
        .into_iter()
        .map(AccountEntryRow::into_entry)
        .collect()
}

/// Returns `true` if the cycle starting on `cycle_start_date` was applied
/// to the member.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn cycle_entry_exists(
    conn: &mut SqliteConnection,
    member_id: i64,
    cycle_start_date: Date,
) -> Result<bool, PersistenceError> {
    let count: i64 = shift_cycle_entries::table
        .filter(shift_cycle_entries::member_id.eq(member_id))
        .filter(shift_cycle_entries::cycle_start_date.eq(format_date(cycle_start_date)?))
        .count()
        .get_result(conn)?;
    Ok(count > 0)
}

/// Returns `true` if the member has a cycle marker before `date`.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn member_has_cycle_entry_before(
    conn: &mut SqliteConnection,
    member_id: i64,
    date: Date,
) -> Result<bool, PersistenceError> {
    let count: i64 = shift_cycle_entries::table
        .filter(shift_cycle_entries::member_id.eq(member_id))
        .filter(shift_cycle_entries::cycle_start_date.lt(format_date(date)?))
        .count()
        .get_result(conn)?;
    Ok(count > 0)
}

/// Lists a member's cycle markers, oldest first.
///
/// # Errors
///
/// Returns an error if the query fails or a row is malformed.
pub fn list_cycle_entries(
    conn: &mut SqliteConnection,
    member_id: i64,
) -> Result<Vec<ShiftCycleEntry>, PersistenceError> {
    shift_cycle_entries::table
        .filter(shift_cycle_entries::member_id.eq(member_id))
        .order(shift_cycle_entries::cycle_start_date.asc())
        .select(CycleEntryRow::as_select())
        .load(conn)?
        .into_iter()
        .map(|row| {
            Ok(ShiftCycleEntry {
                cycle_entry_id: Some(row.cycle_entry_id),
                member_id: row.member_id,
                cycle_start_date: parse_date(&row.cycle_start_date)?,
                account_entry_id: row.account_entry_id,
            })
        })
        .collect()
}

/// Returns the most recent cycle start applied to anyone.
///
/// # Errors
///
/// Returns an error if the query fails or the stored value is malformed.
pub fn get_latest_cycle_start_date(
    conn: &mut SqliteConnection,
) -> Result<Option<Date>, PersistenceError> {
    let latest: Option<String> = shift_cycle_entries::table
        .select(max(shift_cycle_entries::cycle_start_date))
        .first(conn)?;
    latest.as_deref().map(parse_date).transpose()
}

/// Returns the most recent cycle start applied on or before `date`.
///
/// # Errors
///
/// Returns an error if the query fails or the stored value is malformed.
pub fn get_latest_cycle_start_on_or_before(
    conn: &mut SqliteConnection,
    date: Date,
) -> Result<Option<Date>, PersistenceError> {
    let latest: Option<String> = shift_cycle_entries::table
        .filter(shift_cycle_entries::cycle_start_date.le(format_date(date)?))
        .select(max(shift_cycle_entries::cycle_start_date))
        .first(conn)?;
    latest.as_deref().map(parse_date).transpose()
}
