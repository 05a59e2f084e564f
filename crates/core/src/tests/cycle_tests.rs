// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{create_test_member, create_test_share_owner};
use crate::{CycleStartPlan, plan_cycle_start};
use coop_shifts_domain::{
    AccountEntry, DateInterval, Exemption, ExpectationFacts, Member, ShareOwner,
};
use time::macros::{date, datetime};

#[test]
fn test_expected_member_is_debited_at_cycle_start() {
    let member: Member = create_test_member(10);
    let share_owner: ShareOwner = create_test_share_owner(10);
    let facts: ExpectationFacts<'_> = ExpectationFacts {
        member: &member,
        share_owner: Some(&share_owner),
        pauses: &[],
        exemptions: &[],
        frozen_at: false,
    };

    let plan: CycleStartPlan = plan_cycle_start(10, &facts, date!(2024 - 03 - 04), false).unwrap();

    assert_eq!(plan.cycle_entry.member_id, 10);
    assert_eq!(plan.cycle_entry.cycle_start_date, date!(2024 - 03 - 04));
    let debit: AccountEntry = plan.debit.unwrap();
    assert_eq!(debit.value, -1);
    assert_eq!(debit.date, datetime!(2024-03-04 00:00));
    assert_eq!(debit.description, "Shift cycle starting the 04.03.24");
}

#[test]
fn test_already_applied_cycle_is_skipped() {
    let member: Member = create_test_member(10);
    let share_owner: ShareOwner = create_test_share_owner(10);
    let facts: ExpectationFacts<'_> = ExpectationFacts {
        member: &member,
        share_owner: Some(&share_owner),
        pauses: &[],
        exemptions: &[],
        frozen_at: false,
    };

    assert!(plan_cycle_start(10, &facts, date!(2024 - 03 - 04), true).is_none());
}

#[test]
fn test_exempted_member_gets_marker_without_debit() {
    let member: Member = create_test_member(10);
    let share_owner: ShareOwner = create_test_share_owner(10);
    let exemptions: Vec<Exemption> = vec![Exemption::new(
        10,
        DateInterval::new(date!(2024 - 03 - 01), None).unwrap(),
        String::from("Parental leave"),
    )];
    let facts: ExpectationFacts<'_> = ExpectationFacts {
        member: &member,
        share_owner: Some(&share_owner),
        pauses: &[],
        exemptions: &exemptions,
        frozen_at: false,
    };

    let plan: CycleStartPlan = plan_cycle_start(10, &facts, date!(2024 - 03 - 04), false).unwrap();

    assert!(plan.debit.is_none());
}

#[test]
fn test_investing_and_frozen_members_owe_nothing() {
    let member: Member = create_test_member(10);
    let mut investing: ShareOwner = create_test_share_owner(10);
    investing.is_investing = true;
    let share_owner: ShareOwner = create_test_share_owner(10);

    let investing_facts: ExpectationFacts<'_> = ExpectationFacts {
        member: &member,
        share_owner: Some(&investing),
        pauses: &[],
        exemptions: &[],
        frozen_at: false,
    };
    let frozen_facts: ExpectationFacts<'_> = ExpectationFacts {
        member: &member,
        share_owner: Some(&share_owner),
        pauses: &[],
        exemptions: &[],
        frozen_at: true,
    };

    for facts in [investing_facts, frozen_facts] {
        let plan: CycleStartPlan =
            plan_cycle_start(10, &facts, date!(2024 - 03 - 04), false).unwrap();
        assert!(plan.debit.is_none());
    }
}
