// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The shift point ledger.
//!
//! Every member owns an append-only list of signed account entries. The
//! balance at a reference instant is the sum of the entries dated at or
//! before that instant. Corrections are expressed as reversal entries,
//! never as edits.

use std::cmp::Reverse;
use time::{Date, PrimitiveDateTime};

/// One signed line of a member's shift ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountEntry {
    pub entry_id: Option<i64>,
    pub member_id: i64,
    pub value: i32,
    pub date: PrimitiveDateTime,
    pub description: String,
}

impl AccountEntry {
    /// Creates a new, unpersisted entry.
    #[must_use]
    pub const fn new(
        member_id: i64,
        value: i32,
        date: PrimitiveDateTime,
        description: String,
    ) -> Self {
        Self {
            entry_id: None,
            member_id,
            value,
            date,
            description,
        }
    }

    /// Builds the entry cancelling this one out.
    #[must_use]
    pub fn reversal(&self, date: PrimitiveDateTime) -> Self {
        Self::new(
            self.member_id,
            -self.value,
            date,
            format!("Correction of '{}'", self.description),
        )
    }
}

/// Marker that a cycle start was applied to a member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftCycleEntry {
    pub cycle_entry_id: Option<i64>,
    pub member_id: i64,
    pub cycle_start_date: Date,
    /// The debit entry, absent when nothing was owed.
    pub account_entry_id: Option<i64>,
}

impl ShiftCycleEntry {
    /// Creates a new cycle marker.
    #[must_use]
    pub const fn new(member_id: i64, cycle_start_date: Date) -> Self {
        Self {
            cycle_entry_id: None,
            member_id,
            cycle_start_date,
            account_entry_id: None,
        }
    }
}

/// Sums every entry dated at or before `reference`.
#[must_use]
pub fn balance_at(entries: &[AccountEntry], reference: PrimitiveDateTime) -> i64 {
    entries
        .iter()
        .filter(|entry| entry.date <= reference)
        .map(|entry| i64::from(entry.value))
        .sum()
}

/// Orders entries newest first.
///
/// Entries sharing a timestamp are ordered by descending id, so the entry
/// written last is undone first. Unpersisted entries sort before persisted
/// ones at the same instant.
fn newest_first(entries: &[AccountEntry]) -> Vec<&AccountEntry> {
    let mut sorted: Vec<&AccountEntry> = entries.iter().collect();
    sorted.sort_by_key(|entry| {
        (
            Reverse(entry.date),
            Reverse(entry.entry_id.unwrap_or(i64::MAX)),
        )
    });
    sorted
}

/// Returns true if the balance has stayed at or below `threshold` for more
/// than `freeze_after_days` days.
///
/// Starting from the balance at `now`, entries are undone newest first. As
/// soon as an entry older than `freeze_after_days` is reached the balance
/// was already low back then. If undoing an entry lifts the balance above
/// the threshold, the member only recently dropped below it.
///
/// # Arguments
///
/// * `entries` - All ledger entries of the member
/// * `threshold` - The freeze threshold (e.g. -4)
/// * `freeze_after_days` - Days the balance must stay low
/// * `now` - The reference instant
#[must_use]
pub fn is_below_threshold_since_long_enough(
    entries: &[AccountEntry],
    threshold: i32,
    freeze_after_days: i64,
    now: PrimitiveDateTime,
) -> bool {
    let threshold: i64 = i64::from(threshold);
    let mut balance: i64 = balance_at(entries, now);
    if balance > threshold {
        return false;
    }

    let today: Date = now.date();
    for entry in newest_first(entries)
        .into_iter()
        .filter(|entry| entry.date <= now)
    {
        if (today - entry.date.date()).whole_days() > freeze_after_days {
            return true;
        }
        balance -= i64::from(entry.value);
        if balance > threshold {
            return false;
        }
    }
    false
}

/// Returns true if upcoming registrations would lift the balance above the
/// threshold once attended.
#[must_use]
pub fn registrations_compensate(balance: i64, upcoming_attendances: usize, threshold: i32) -> bool {
    let upcoming: i64 = i64::try_from(upcoming_attendances).unwrap_or(i64::MAX);
    balance.saturating_add(upcoming) > i64::from(threshold)
}
