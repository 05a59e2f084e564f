// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Ledger writes. Account entries are append-only.

use coop_shifts_domain::{AccountEntry, ShiftCycleEntry};
use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::debug;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::{format_date, format_datetime};
use crate::diesel_schema::{account_entries, shift_cycle_entries};
use crate::error::PersistenceError;

/// Appends an account entry.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_account_entry(
    conn: &mut SqliteConnection,
    entry: &AccountEntry,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(account_entries::table)
        .values((
            account_entries::member_id.eq(entry.member_id),
            account_entries::value.eq(entry.value),
            account_entries::date.eq(format_datetime(entry.date)?),
            account_entries::description.eq(&entry.description),
        ))
        .execute(conn)?;

    let entry_id: i64 = get_last_insert_rowid(conn)?;
    debug!(
        entry_id,
        member_id = entry.member_id,
        value = entry.value,
        "Appended account entry"
    );
    Ok(entry_id)
}

/// Inserts a cycle marker.
///
/// # Errors
///
/// Returns `PersistenceError::ConstraintViolation` if the cycle was already
/// applied to the member.
pub fn insert_cycle_entry(
    conn: &mut SqliteConnection,
    cycle_entry: &ShiftCycleEntry,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(shift_cycle_entries::table)
        .values((
            shift_cycle_entries::member_id.eq(cycle_entry.member_id),
            shift_cycle_entries::cycle_start_date.eq(format_date(cycle_entry.cycle_start_date)?),
            shift_cycle_entries::account_entry_id.eq(cycle_entry.account_entry_id),
        ))
        .execute(conn)?;
    get_last_insert_rowid(conn)
}
