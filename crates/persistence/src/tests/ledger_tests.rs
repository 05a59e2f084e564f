// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use coop_shifts_domain::{AccountEntry, Member, ShiftCycleEntry, balance_at};
use time::macros::{date, datetime};

use crate::error::PersistenceError;
use crate::tests::{NOW, create_test_persistence, insert_test_member};
use crate::Persistence;

#[test]
fn test_account_entries_are_listed_by_date() {
    let mut persistence: Persistence = create_test_persistence();
    let member: Member = insert_test_member(&mut persistence, "ledger@example.org");
    let member_id: i64 = member.member_id.unwrap();

    let later: AccountEntry = AccountEntry::new(
        member_id,
        1,
        datetime!(2024-02-20 10:00),
        String::from("Shift done"),
    );
    let earlier: AccountEntry = AccountEntry::new(
        member_id,
        -1,
        datetime!(2024-02-05 00:00),
        String::from("Shift cycle starting the 05.02.24"),
    );
    persistence.create_account_entry(&later).unwrap();
    let earlier_id: i64 = persistence.create_account_entry(&earlier).unwrap();

    let entries: Vec<AccountEntry> = persistence.list_account_entries(member_id).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].entry_id, Some(earlier_id));
    assert_eq!(balance_at(&entries, NOW), 0);
    assert_eq!(
        persistence.get_account_entry(earlier_id).unwrap().map(|entry| entry.value),
        Some(-1)
    );
}

#[test]
fn test_cycle_entry_is_unique_per_member_and_date() {
    let mut persistence: Persistence = create_test_persistence();
    let member: Member = insert_test_member(&mut persistence, "cycle@example.org");
    let member_id: i64 = member.member_id.unwrap();

    let cycle: ShiftCycleEntry = ShiftCycleEntry::new(member_id, date!(2024 - 02 - 05));
    persistence.create_cycle_entry(&cycle).unwrap();
    let duplicate: Result<i64, PersistenceError> = persistence.create_cycle_entry(&cycle);

    assert!(matches!(duplicate, Err(PersistenceError::ConstraintViolation(_))));
    assert!(
        persistence
            .cycle_entry_exists(member_id, date!(2024 - 02 - 05))
            .unwrap()
    );
    assert!(
        !persistence
            .cycle_entry_exists(member_id, date!(2024 - 03 - 04))
            .unwrap()
    );
}

#[test]
fn test_latest_cycle_start_lookups() {
    let mut persistence: Persistence = create_test_persistence();
    assert_eq!(persistence.get_latest_cycle_start_date().unwrap(), None);

    let member: Member = insert_test_member(&mut persistence, "cycle@example.org");
    let member_id: i64 = member.member_id.unwrap();
    for cycle_start in [date!(2024 - 01 - 08), date!(2024 - 02 - 05), date!(2024 - 03 - 04)] {
        persistence
            .create_cycle_entry(&ShiftCycleEntry::new(member_id, cycle_start))
            .unwrap();
    }

    assert_eq!(
        persistence.get_latest_cycle_start_date().unwrap(),
        Some(date!(2024 - 03 - 04))
    );
    assert_eq!(
        persistence
            .get_latest_cycle_start_on_or_before(date!(2024 - 03 - 01))
            .unwrap(),
        Some(date!(2024 - 02 - 05))
    );
    assert!(
        persistence
            .member_has_cycle_entry_before(member_id, date!(2024 - 02 - 05))
            .unwrap()
    );
    assert!(
        !persistence
            .member_has_cycle_entry_before(member_id, date!(2024 - 01 - 08))
            .unwrap()
    );
    assert_eq!(persistence.list_cycle_entries(member_id).unwrap().len(), 3);
}

#[test]
fn test_cycle_entry_keeps_its_debit() {
    let mut persistence: Persistence = create_test_persistence();
    let member: Member = insert_test_member(&mut persistence, "debit@example.org");
    let member_id: i64 = member.member_id.unwrap();

    let debit_id: i64 = persistence
        .create_account_entry(&AccountEntry::new(
            member_id,
            -1,
            datetime!(2024-03-04 00:00),
            String::from("Shift cycle starting the 04.03.24"),
        ))
        .unwrap();
    let mut cycle: ShiftCycleEntry = ShiftCycleEntry::new(member_id, date!(2024 - 03 - 04));
    cycle.account_entry_id = Some(debit_id);
    persistence.create_cycle_entry(&cycle).unwrap();

    let stored: Vec<ShiftCycleEntry> = persistence.list_cycle_entries(member_id).unwrap();
    assert_eq!(stored[0].account_entry_id, Some(debit_id));
}
