// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    DateInterval, Exemption, ExpectationFacts, Member, MembershipPause, ShareOwner,
    credit_requirement_for_cycle, is_member_expected_to_do_shifts,
};
use time::macros::date;

fn create_member() -> Member {
    let mut member: Member = Member::new("Ada", "ada@example.org", date!(2021 - 01 - 01)).unwrap();
    member.member_id = Some(1);
    member
}

fn facts<'a>(
    member: &'a Member,
    share_owner: Option<&'a ShareOwner>,
    pauses: &'a [MembershipPause],
    exemptions: &'a [Exemption],
    frozen_at: bool,
) -> ExpectationFacts<'a> {
    ExpectationFacts {
        member,
        share_owner,
        pauses,
        exemptions,
        frozen_at,
    }
}

#[test]
fn test_active_member_is_expected() {
    let member: Member = create_member();
    let owner: ShareOwner = ShareOwner::new(1, date!(2021 - 01 - 01));
    let facts: ExpectationFacts<'_> = facts(&member, Some(&owner), &[], &[], false);

    assert!(is_member_expected_to_do_shifts(&facts, date!(2021 - 01 - 18)));
    assert_eq!(credit_requirement_for_cycle(&facts, date!(2021 - 01 - 18)), 1);
}

#[test]
fn test_member_without_shares_is_not_expected() {
    let member: Member = create_member();
    let facts: ExpectationFacts<'_> = facts(&member, None, &[], &[], false);
    assert_eq!(credit_requirement_for_cycle(&facts, date!(2021 - 01 - 18)), 0);
}

#[test]
fn test_frozen_member_is_not_expected() {
    let member: Member = create_member();
    let owner: ShareOwner = ShareOwner::new(1, date!(2021 - 01 - 01));
    let facts: ExpectationFacts<'_> = facts(&member, Some(&owner), &[], &[], true);
    assert!(!is_member_expected_to_do_shifts(&facts, date!(2021 - 01 - 18)));
}

#[test]
fn test_member_joined_later_is_not_expected() {
    let mut member: Member = create_member();
    member.date_joined = date!(2021 - 02 - 01);
    let owner: ShareOwner = ShareOwner::new(1, date!(2021 - 01 - 01));
    let facts: ExpectationFacts<'_> = facts(&member, Some(&owner), &[], &[], false);

    assert!(!is_member_expected_to_do_shifts(&facts, date!(2021 - 01 - 18)));
    assert!(is_member_expected_to_do_shifts(&facts, date!(2021 - 02 - 15)));
}

#[test]
fn test_investing_member_is_not_expected() {
    let member: Member = create_member();
    let mut owner: ShareOwner = ShareOwner::new(1, date!(2021 - 01 - 01));
    owner.is_investing = true;
    let facts: ExpectationFacts<'_> = facts(&member, Some(&owner), &[], &[], false);
    assert!(!is_member_expected_to_do_shifts(&facts, date!(2021 - 01 - 18)));
}

#[test]
fn test_paused_member_is_not_expected() {
    let member: Member = create_member();
    let owner: ShareOwner = ShareOwner::new(1, date!(2021 - 01 - 01));
    let pauses: Vec<MembershipPause> = vec![MembershipPause::new(
        1,
        DateInterval::new(date!(2021 - 01 - 10), Some(date!(2021 - 01 - 31))).unwrap(),
        String::from("parental leave"),
    )];
    let facts: ExpectationFacts<'_> = facts(&member, Some(&owner), &pauses, &[], false);

    assert!(!is_member_expected_to_do_shifts(&facts, date!(2021 - 01 - 18)));
    assert!(is_member_expected_to_do_shifts(&facts, date!(2021 - 02 - 15)));
}

#[test]
fn test_exempted_member_is_not_expected() {
    let member: Member = create_member();
    let owner: ShareOwner = ShareOwner::new(1, date!(2021 - 01 - 01));
    let exemptions: Vec<Exemption> = vec![Exemption::new(
        1,
        DateInterval::new(date!(2021 - 01 - 18), None).unwrap(),
        String::from("long illness"),
    )];
    let facts: ExpectationFacts<'_> = facts(&member, Some(&owner), &[], &exemptions, false);

    assert!(is_member_expected_to_do_shifts(&facts, date!(2021 - 01 - 17)));
    assert_eq!(credit_requirement_for_cycle(&facts, date!(2021 - 01 - 18)), 0);
}
