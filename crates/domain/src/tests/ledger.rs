// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    AccountEntry, balance_at, is_below_threshold_since_long_enough, registrations_compensate,
};
use time::macros::datetime;
use time::{Duration, PrimitiveDateTime};

fn entry(entry_id: i64, value: i32, date: PrimitiveDateTime) -> AccountEntry {
    let mut entry: AccountEntry = AccountEntry::new(1, value, date, String::from("test"));
    entry.entry_id = Some(entry_id);
    entry
}

fn now() -> PrimitiveDateTime {
    datetime!(2024-06-30 12:00)
}

#[test]
fn test_balance_ignores_future_entries() {
    let entries: Vec<AccountEntry> = vec![
        entry(1, -1, now() - Duration::days(10)),
        entry(2, 1, now() - Duration::days(2)),
        entry(3, -1, now() + Duration::days(1)),
    ];
    assert_eq!(balance_at(&entries, now()), 0);
    assert_eq!(balance_at(&entries, now() + Duration::days(2)), -1);
    assert_eq!(balance_at(&[], now()), 0);
}

#[test]
fn test_entry_reversal_negates_value() {
    let original: AccountEntry = entry(1, 1, now());
    let reversal: AccountEntry = original.reversal(now());
    assert_eq!(reversal.value, -1);
    assert_eq!(reversal.entry_id, None);
    assert_eq!(reversal.description, "Correction of 'test'");
}

#[test]
fn test_below_threshold_long_enough() {
    let entries: Vec<AccountEntry> = vec![
        entry(1, -2, now() - Duration::days(20)),
        entry(2, -2, now() - Duration::days(15)),
    ];
    assert!(is_below_threshold_since_long_enough(&entries, -3, 14, now()));
}

#[test]
fn test_below_threshold_not_long_enough() {
    let entries: Vec<AccountEntry> = vec![
        entry(1, -2, now() - Duration::days(20)),
        entry(2, -2, now() - Duration::days(5)),
    ];
    assert!(!is_below_threshold_since_long_enough(&entries, -3, 14, now()));
}

#[test]
fn test_above_threshold_is_never_below() {
    let entries: Vec<AccountEntry> = vec![entry(1, -2, now() - Duration::days(100))];
    assert!(!is_below_threshold_since_long_enough(&entries, -3, 14, now()));
}

#[test]
fn test_below_threshold_with_exhausted_history() {
    // Every entry is recent, so the balance dropped below the threshold too
    // recently to count.
    let entries: Vec<AccountEntry> = vec![
        entry(1, -2, now() - Duration::days(3)),
        entry(2, -2, now() - Duration::days(2)),
    ];
    assert!(!is_below_threshold_since_long_enough(&entries, -3, 14, now()));
}

#[test]
fn test_same_date_entries_are_undone_by_descending_id() {
    let same_day: PrimitiveDateTime = now() - Duration::days(3);
    // Undoing the credit (id 3) first lowers the balance further, undoing
    // the debit (id 2) then lifts it above the threshold.
    let entries: Vec<AccountEntry> = vec![
        entry(1, -4, now() - Duration::days(30)),
        entry(2, -1, same_day),
        entry(3, 1, same_day),
    ];
    assert!(is_below_threshold_since_long_enough(&entries, -4, 14, now()));

    let entries: Vec<AccountEntry> = vec![
        entry(1, -3, now() - Duration::days(30)),
        entry(2, 1, same_day),
        entry(3, -2, same_day),
    ];
    // balance -4, undo id 3 -> -2 which is above -4.
    assert!(!is_below_threshold_since_long_enough(&entries, -4, 14, now()));
}

#[test]
fn test_registrations_compensate() {
    assert!(registrations_compensate(-5, 2, -4));
    assert!(!registrations_compensate(-5, 1, -4));
    assert!(registrations_compensate(-3, 0, -4));
}
