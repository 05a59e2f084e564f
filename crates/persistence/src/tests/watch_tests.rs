// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use coop_shifts_domain::{
    Member, RecurringShiftWatch, Shift, ShiftPartnerChange, ShiftWatch, StaffingStatus,
    WeekGroup,
};
use time::Weekday;

use crate::error::PersistenceError;
use crate::tests::{NOW, create_test_persistence, insert_test_member, insert_test_shift};
use crate::Persistence;

#[test]
fn test_watch_round_trips_and_tracks_status() {
    let mut persistence: Persistence = create_test_persistence();
    let member: Member = insert_test_member(&mut persistence, "watcher@example.org");
    let member_id: i64 = member.member_id.unwrap();
    let shift: Shift = insert_test_shift(&mut persistence, 5);
    let shift_id: i64 = shift.shift_id.unwrap();

    let mut watch: ShiftWatch = ShiftWatch::new(
        member_id,
        shift_id,
        vec![StaffingStatus::Understaffed, StaffingStatus::AllClear],
        Some(StaffingStatus::AllClear),
    );
    watch.shift_watch_id = Some(persistence.create_shift_watch(&watch).unwrap());
    assert!(persistence.shift_watch_exists(member_id, shift_id).unwrap());

    persistence
        .update_shift_watch_status(
            watch.shift_watch_id.unwrap(),
            Some(StaffingStatus::Understaffed),
        )
        .unwrap();
    let pairs: Vec<(ShiftWatch, Shift)> =
        persistence.list_shift_watches_on_shifts_after(NOW).unwrap();
    assert_eq!(pairs.len(), 1);
    assert_eq!(pairs[0].0.last_status, Some(StaffingStatus::Understaffed));
    assert_eq!(pairs[0].0.watched_statuses, watch.watched_statuses);
    assert_eq!(pairs[0].1.shift_id, Some(shift_id));

    let duplicate: Result<i64, PersistenceError> = persistence.create_shift_watch(&watch);
    assert!(matches!(duplicate, Err(PersistenceError::ConstraintViolation(_))));
}

#[test]
fn test_watches_on_past_shifts_are_not_listed() {
    let mut persistence: Persistence = create_test_persistence();
    let member: Member = insert_test_member(&mut persistence, "watcher@example.org");
    let past: Shift = insert_test_shift(&mut persistence, -2);
    let watch: ShiftWatch = ShiftWatch::new(
        member.member_id.unwrap(),
        past.shift_id.unwrap(),
        vec![StaffingStatus::Full],
        None,
    );
    persistence.create_shift_watch(&watch).unwrap();

    assert!(persistence.list_shift_watches_on_shifts_after(NOW).unwrap().is_empty());
    assert_eq!(
        persistence
            .list_shift_watches_for_member(member.member_id.unwrap())
            .unwrap()
            .len(),
        1
    );
}

#[test]
fn test_recurring_watch_criteria_are_stored() {
    let mut persistence: Persistence = create_test_persistence();
    let member: Member = insert_test_member(&mut persistence, "watcher@example.org");
    let mut recurring: RecurringShiftWatch = RecurringShiftWatch {
        recurring_watch_id: None,
        member_id: member.member_id.unwrap(),
        weekdays: vec![Weekday::Monday, Weekday::Saturday],
        week_groups: vec![WeekGroup::C],
        shift_template_ids: Vec::new(),
        watched_statuses: vec![StaffingStatus::AlmostFull],
    };
    recurring.recurring_watch_id =
        Some(persistence.create_recurring_shift_watch(&recurring).unwrap());

    assert_eq!(
        persistence.list_recurring_shift_watches().unwrap(),
        vec![recurring]
    );
}

#[test]
fn test_partner_changes_are_listed_in_order() {
    let mut persistence: Persistence = create_test_persistence();
    let member: Member = insert_test_member(&mut persistence, "member@example.org");
    let partner: Member = insert_test_member(&mut persistence, "partner@example.org");
    let member_id: i64 = member.member_id.unwrap();

    let later: ShiftPartnerChange =
        ShiftPartnerChange::new(member_id, None, NOW + time::Duration::days(3));
    let earlier: ShiftPartnerChange = ShiftPartnerChange::new(member_id, partner.member_id, NOW);
    persistence.record_shift_partner_change(&later).unwrap();
    persistence.record_shift_partner_change(&earlier).unwrap();

    let changes: Vec<ShiftPartnerChange> =
        persistence.list_shift_partner_changes(member_id).unwrap();
    assert_eq!(changes.len(), 2);
    assert_eq!(changes[0].partner_id, partner.member_id);
    assert_eq!(changes[1].partner_id, None);

    let own: Result<i64, PersistenceError> = persistence
        .record_shift_partner_change(&ShiftPartnerChange::new(member_id, Some(member_id), NOW));
    assert!(own.is_err());
}
